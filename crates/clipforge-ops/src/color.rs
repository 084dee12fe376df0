//! Per-pixel color operations.
//!
//! Every operation here preserves sequence length and order and touches each
//! pixel independently of its neighbors.

use crate::kernel::{expand_gray, luma_plane, par_map, par_map_pixels};
use clipforge_core::color::saturate_u8;
use clipforge_core::{ClipforgeError, Frame, FrameSequence, Hsv8, Result};
use image::imageops;
use tracing::debug;

/// Default brightness offset.
pub const DEFAULT_BRIGHTNESS: i32 = 50;
/// Default contrast gain.
pub const DEFAULT_CONTRAST: f64 = 1.5;
/// Default warm/cool intensity.
pub const DEFAULT_TINT: i32 = 20;
/// Default posterize level count.
pub const DEFAULT_POSTERIZE_LEVELS: u32 = 4;

/// Sepia mixing rows, applied to `[b, g, r]` and producing `[b, g, r]`.
const SEPIA: [[f32; 3]; 3] = [
    [0.272, 0.534, 0.131],
    [0.349, 0.686, 0.168],
    [0.393, 0.769, 0.189],
];

/// Luma, replicated into all three channels.
pub fn gray(frames: &[Frame]) -> FrameSequence {
    par_map(frames, |f| expand_gray(&luma_plane(f)))
}

/// Bitwise complement of every channel.
pub fn invert(frames: &[Frame]) -> FrameSequence {
    par_map(frames, |f| {
        let mut out = f.clone();
        imageops::invert(&mut out);
        out
    })
}

/// `out = in * gain + offset`, rounded and saturated.
pub fn affine(frames: &[Frame], gain: f64, offset: f64) -> FrameSequence {
    let (gain, offset) = (gain as f32, offset as f32);
    par_map_pixels(frames, move |px| px.map(|c| saturate_u8(c as f32 * gain + offset)))
}

/// Add `value` to every channel.
pub fn brightness(frames: &[Frame], value: i32) -> FrameSequence {
    debug!("brightness {}", value);
    affine(frames, 1.0, value as f64)
}

/// Multiply every channel by `value`.
pub fn contrast(frames: &[Frame], value: f64) -> FrameSequence {
    debug!("contrast {}", value);
    affine(frames, value, 0.0)
}

/// Rotate hue by `shift` units of two degrees, wrapping into `[0, 180)`.
pub fn hue_shift(frames: &[Frame], shift: i32) -> FrameSequence {
    let range = Hsv8::HUE_RANGE as f64;
    par_map_pixels(frames, move |px| {
        let mut hsv = Hsv8::from_rgb(px);
        let mut h = hsv.h as f64 + shift as f64;
        h -= range * (h / range).floor();
        hsv.h = saturate_u8(h.max(0.0) as f32);
        hsv.to_rgb()
    })
}

/// Scale saturation by `factor`.
pub fn saturation(frames: &[Frame], factor: f64) -> FrameSequence {
    let factor = factor as f32;
    par_map_pixels(frames, move |px| {
        let mut hsv = Hsv8::from_rgb(px);
        hsv.s = saturate_u8(hsv.s as f32 * factor);
        hsv.to_rgb()
    })
}

/// Fixed sepia tone.
pub fn sepia(frames: &[Frame]) -> FrameSequence {
    par_map_pixels(frames, |[r, g, b]| {
        let bgr = [b as f32, g as f32, r as f32];
        let mix = |row: [f32; 3]| saturate_u8(row[0] * bgr[0] + row[1] * bgr[1] + row[2] * bgr[2]);
        let (b, g, r) = (mix(SEPIA[0]), mix(SEPIA[1]), mix(SEPIA[2]));
        [r, g, b]
    })
}

/// Push red up by `intensity` and blue down by half of it.
pub fn warm(frames: &[Frame], intensity: i32) -> FrameSequence {
    let (up, down) = (intensity as f32, intensity as f32 * 0.5);
    par_map_pixels(frames, move |[r, g, b]| {
        [saturate_u8(r as f32 + up), g, saturate_u8(b as f32 - down)]
    })
}

/// Push blue up by `intensity` and red down by half of it.
pub fn cool(frames: &[Frame], intensity: i32) -> FrameSequence {
    let (up, down) = (intensity as f32, intensity as f32 * 0.5);
    par_map_pixels(frames, move |[r, g, b]| {
        [saturate_u8(r as f32 - down), g, saturate_u8(b as f32 + up)]
    })
}

/// Snap each channel down to a multiple of `256 / levels`.
pub fn posterize(frames: &[Frame], levels: u32) -> Result<FrameSequence> {
    if !(1..=256).contains(&levels) {
        return Err(ClipforgeError::invalid(format!(
            "posterize levels must be within 1..=256, got {levels}"
        )));
    }
    let step = (256 / levels) as u16;
    Ok(par_map_pixels(frames, move |px| {
        px.map(|c| ((c as u16 / step) * step).min(255) as u8)
    }))
}
