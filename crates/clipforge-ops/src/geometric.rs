//! Geometric operations: crop, resample, rotate, mirror, zoom and pan.

use crate::kernel::par_map;
use clipforge_core::{ClipforgeError, Frame, FrameSequence, PixelRect, Result};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use rayon::prelude::*;
use tracing::debug;

/// Default flip direction (mirror around the vertical axis).
pub const DEFAULT_FLIP: i32 = 1;
/// Default zoom factor.
pub const DEFAULT_ZOOM: f64 = 1.5;
/// Sentinel for "use the frame center" in `zoom`.
pub const ZOOM_CENTER: i64 = -1;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Bilinear resample of one frame. Same-size requests return a copy.
pub(crate) fn resample(frame: &Frame, width: u32, height: u32) -> Frame {
    if frame.dimensions() == (width, height) {
        return frame.clone();
    }
    imageops::resize(frame, width, height, FilterType::Triangle)
}

/// Cut the `w` x `h` window at `(x, y)` out of every frame.
///
/// The window must be non-empty and lie entirely inside each frame.
pub fn crop(frames: &[Frame], x: i64, y: i64, w: u32, h: u32) -> Result<FrameSequence> {
    let rect = PixelRect::new(x, y, w, h);
    if rect.is_empty() {
        return Err(ClipforgeError::invalid(format!("crop window {rect} is empty")));
    }
    frames
        .par_iter()
        .map(|f| {
            if !rect.fits_within(f.width(), f.height()) {
                return Err(ClipforgeError::invalid(format!(
                    "crop window {rect} exceeds {}x{} frame",
                    f.width(),
                    f.height()
                )));
            }
            Ok(imageops::crop_imm(f, x as u32, y as u32, w, h).to_image())
        })
        .collect()
}

/// Resample every frame to `w` x `h`.
pub fn resize(frames: &[Frame], w: u32, h: u32) -> Result<FrameSequence> {
    if w == 0 || h == 0 {
        return Err(ClipforgeError::invalid(format!(
            "resize target {w}x{h} has no pixels"
        )));
    }
    Ok(par_map(frames, |f| resample(f, w, h)))
}

/// Rotate counter-clockwise by `angle` degrees about `(w / 2, h / 2)` onto a
/// `w` x `h` canvas. Uncovered pixels are black.
pub fn rotate(frames: &[Frame], angle: f64, w: u32, h: u32) -> FrameSequence {
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let projection = Projection::translate(cx, cy)
        * Projection::rotate(-(angle.to_radians() as f32))
        * Projection::translate(-cx, -cy);
    debug!("rotate {} degrees onto {}x{}", angle, w, h);

    par_map(frames, |f| {
        let mut out = RgbImage::from_pixel(w, h, BLACK);
        warp_into(f, &projection, Interpolation::Bilinear, BLACK, &mut out);
        out
    })
}

/// Mirror frames: `0` upside down, positive left-right, negative both.
pub fn flip(frames: &[Frame], direction: i32) -> FrameSequence {
    par_map(frames, |f| match direction.signum() {
        0 => imageops::flip_vertical(f),
        1 => imageops::flip_horizontal(f),
        _ => imageops::rotate180(f),
    })
}

/// Magnify around `(cx, cy)` by `factor`, keeping the frame size.
///
/// A center of [`ZOOM_CENTER`] means the middle of the frame. The source
/// window is clamped to the frame before it is scaled back up.
pub fn zoom(frames: &[Frame], factor: f64, cx: i64, cy: i64) -> Result<FrameSequence> {
    if !(factor.is_finite() && factor > 0.0) {
        return Err(ClipforgeError::invalid(format!(
            "zoom factor must be positive, got {factor}"
        )));
    }
    frames
        .par_iter()
        .map(|f| {
            let (w, h) = f.dimensions();
            let cx = if cx == ZOOM_CENTER { (w / 2) as i64 } else { cx };
            let cy = if cy == ZOOM_CENTER { (h / 2) as i64 } else { cy };
            let win_w = (w as f64 / factor) as i64;
            let win_h = (h as f64 / factor) as i64;
            let rect = PixelRect::centered_window(cx, cy, win_w, win_h, w, h);
            if rect.is_empty() {
                return Err(ClipforgeError::invalid(format!(
                    "zoom window around ({cx}, {cy}) is empty in a {w}x{h} frame"
                )));
            }
            let window =
                imageops::crop_imm(f, rect.x as u32, rect.y as u32, rect.width, rect.height)
                    .to_image();
            Ok(resample(&window, w, h))
        })
        .collect()
}

/// Translate by `(dx, dy)` pixels. Content moved off-frame is lost and the
/// uncovered area is black.
pub fn pan(frames: &[Frame], dx: i64, dy: i64) -> FrameSequence {
    par_map(frames, |f| {
        let mut out = RgbImage::from_pixel(f.width(), f.height(), BLACK);
        imageops::replace(&mut out, f, dx, dy);
        out
    })
}
