//! Composite operations: combine two sequences, fade, and draw text.
//!
//! Two-sequence operations zip fully decoded inputs; the second sequence is
//! resampled to the first one's frame size wherever the two must line up.

use crate::geometric::resample;
use crate::glyphs;
use crate::kernel::{par_map, par_map_indexed};
use clipforge_core::{saturate_u8, ClipforgeError, Frame, FrameSequence, Result};
use image::{imageops, Rgb, RgbImage};
use rayon::prelude::*;
use tracing::debug;

/// Default overlay origin.
pub const DEFAULT_OVERLAY_ORIGIN: (i64, i64) = (0, 0);
/// Default fade and crossfade length in frames.
pub const DEFAULT_FADE_DURATION: usize = 30;
/// Default text.
pub const DEFAULT_TEXT: &str = "Text";
/// Default text baseline origin.
pub const DEFAULT_TEXT_ORIGIN: (i64, i64) = (10, 30);

/// Pixel size of one font cell at scale 1.0.
const CELL_PER_SCALE: f64 = 3.0;

// ── Stacking ────────────────────────────────────────────────────

/// Place `b[i]` to the right of `a[i]` for every index both sequences have.
pub fn stack_horizontal(a: &[Frame], b: &[Frame]) -> FrameSequence {
    a.par_iter()
        .zip(b.par_iter())
        .map(|(left, right)| {
            let (w, h) = left.dimensions();
            let right = resample(right, w, h);
            let mut out = RgbImage::new(w * 2, h);
            imageops::replace(&mut out, left, 0, 0);
            imageops::replace(&mut out, &right, w as i64, 0);
            out
        })
        .collect()
}

/// Place `b[i]` below `a[i]` for every index both sequences have.
pub fn stack_vertical(a: &[Frame], b: &[Frame]) -> FrameSequence {
    a.par_iter()
        .zip(b.par_iter())
        .map(|(top, bottom)| {
            let (w, h) = top.dimensions();
            let bottom = resample(bottom, w, h);
            let mut out = RgbImage::new(w, h * 2);
            imageops::replace(&mut out, top, 0, 0);
            imageops::replace(&mut out, &bottom, 0, h as i64);
            out
        })
        .collect()
}

// ── Overlay ─────────────────────────────────────────────────────

/// Paste `b[i]` onto `a[i]` with its top-left corner at `(x, y)`.
///
/// A frame is pasted only when it fits entirely inside the base frame;
/// otherwise, and past the end of `b`, the base frame passes through.
pub fn overlay(a: &[Frame], b: &[Frame], x: i64, y: i64) -> FrameSequence {
    par_map_indexed(a, |i, base| {
        let mut out = base.clone();
        if let Some(top) = b.get(i) {
            let fits = x >= 0
                && y >= 0
                && x + top.width() as i64 <= base.width() as i64
                && y + top.height() as i64 <= base.height() as i64;
            if fits {
                imageops::replace(&mut out, top, x, y);
            }
        }
        out
    })
}

// ── Fades ───────────────────────────────────────────────────────

fn scale_frame(frame: &Frame, alpha: f64) -> Frame {
    if alpha >= 1.0 {
        return frame.clone();
    }
    let mut out = frame.clone();
    for v in out.iter_mut() {
        *v = saturate_u8((*v as f64 * alpha) as f32);
    }
    out
}

/// Ramp the first `duration` frames up from black.
pub fn fade_in(frames: &[Frame], duration: usize) -> FrameSequence {
    let fade = duration.min(frames.len());
    par_map_indexed(frames, |i, f| {
        let alpha = if fade == 0 {
            1.0
        } else {
            (i as f64 / fade as f64).min(1.0)
        };
        scale_frame(f, alpha)
    })
}

/// Ramp the last `duration` frames down towards black.
///
/// The final frame keeps `1 / duration` of its brightness.
pub fn fade_out(frames: &[Frame], duration: usize) -> FrameSequence {
    let fade = duration.min(frames.len());
    let start = frames.len() - fade;
    par_map_indexed(frames, |i, f| {
        let alpha = if i < start {
            1.0
        } else {
            1.0 - (i - start) as f64 / fade as f64
        };
        scale_frame(f, alpha)
    })
}

/// Blend `from` into `to`, weighting `to` by `alpha`.
fn mix(from: &Frame, to: &Frame, alpha: f64) -> Frame {
    let (w, h) = from.dimensions();
    let to = resample(to, w, h);
    let mut out = from.clone();
    for (o, t) in out.iter_mut().zip(to.iter()) {
        let v = *o as f64 * (1.0 - alpha) + *t as f64 * alpha;
        *o = saturate_u8(v as f32);
    }
    out
}

/// Play `a`, blend its last frames with the first frames of `b`, then play
/// the rest of `b`.
///
/// The overlap is `min(duration, a.len(), b.len())` frames, so the output has
/// `a.len() + b.len() - overlap` frames.
pub fn crossfade(a: &[Frame], b: &[Frame], duration: usize) -> FrameSequence {
    let fade = duration.min(a.len()).min(b.len());
    let head = a.len() - fade;
    debug!("crossfade {} + {} frames over {}", a.len(), b.len(), fade);

    let blended: Vec<Frame> = (0..fade)
        .into_par_iter()
        .map(|i| mix(&a[head + i], &b[i], i as f64 / fade as f64))
        .collect();

    let mut out = Vec::with_capacity(a.len() + b.len() - fade);
    out.extend_from_slice(&a[..head]);
    out.extend(blended);
    out.extend_from_slice(&b[fade..]);
    out
}

// ── Text ────────────────────────────────────────────────────────

/// Appearance of text drawn by [`text_overlay`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Glyph scale; 1.0 draws 3-pixel font cells.
    pub scale: f64,
    /// Fill color as RGB.
    pub color: [u8; 3],
    /// Stroke thickness in pixels.
    pub thickness: u32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            scale: 1.0,
            color: [255, 255, 255],
            thickness: 2,
        }
    }
}

impl TextStyle {
    /// Font cell size in pixels.
    pub fn cell_size(&self) -> Result<u32> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ClipforgeError::invalid(format!(
                "text scale must be positive, got {}",
                self.scale
            )));
        }
        Ok(((CELL_PER_SCALE * self.scale).round() as u32).max(1))
    }
}

/// Draw `text` on a copy of every frame with its baseline at `y`.
pub fn text_overlay(
    frames: &[Frame],
    text: &str,
    x: i64,
    y: i64,
    style: &TextStyle,
) -> Result<FrameSequence> {
    let cell = style.cell_size()?;
    let color = Rgb(style.color);
    debug!("text {:?} at ({}, {}) cell {}", text, x, y, cell);
    Ok(par_map(frames, |f| {
        let mut out = f.clone();
        glyphs::draw_text(&mut out, text, x, y, cell, style.thickness, color);
        out
    }))
}
