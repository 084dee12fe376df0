//! Neighborhood filters: convolution, edge detection, smoothing and masks.
//!
//! All filters are per-frame and run across frames in parallel. Unless noted
//! otherwise borders are handled by reflection without repeating the edge
//! sample.

use crate::kernel::{
    expand_gray, filter2d, filter2d_gray, gaussian_kernel, luma_plane, par_map, reflect101,
    replicate, separable_filter, Kernel,
};
use clipforge_core::color::saturate_u8;
use clipforge_core::{ClipforgeError, Frame, FrameSequence, Result};
use image::{GrayImage, Luma, RgbImage};
use imageproc::{edges, filter as ip_filter};
use rayon::prelude::*;
use tracing::debug;

/// Default Gaussian kernel size for `blur`.
pub const DEFAULT_BLUR_KERNEL: u32 = 15;
/// Default binary threshold.
pub const DEFAULT_THRESHOLD: i32 = 127;
/// Default vignette sigma, as a fraction of the frame dimension.
pub const DEFAULT_VIGNETTE: f64 = 0.3;
/// Default motion blur kernel size.
pub const DEFAULT_MOTION_BLUR_SIZE: u32 = 15;

const SHARPEN: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0];
const EMBOSS: [f32; 9] = [-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0];

const CANNY_LOW: f32 = 100.0;
const CANNY_HIGH: f32 = 200.0;

/// Non-local means settings used by `denoise`.
#[derive(Debug, Clone, Copy)]
pub struct NlMeansParams {
    /// Filter strength; larger values smooth more.
    pub h: f32,
    /// Side of the compared patches (odd).
    pub template: usize,
    /// Side of the search window (odd).
    pub search: usize,
}

impl Default for NlMeansParams {
    fn default() -> Self {
        Self {
            h: 10.0,
            template: 7,
            search: 21,
        }
    }
}

/// Edge-preserving smoothing settings used by `cartoon`.
#[derive(Debug, Clone, Copy)]
pub struct BilateralParams {
    /// Neighborhood diameter.
    pub diameter: u32,
    pub sigma_color: f32,
    pub sigma_space: f32,
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self {
            diameter: 9,
            sigma_color: 300.0,
            sigma_space: 300.0,
        }
    }
}

// ── Convolution filters ─────────────────────────────────────────

/// Separable Gaussian blur with an odd `kernel` size.
pub fn blur(frames: &[Frame], kernel: u32) -> Result<FrameSequence> {
    if kernel == 0 || kernel % 2 == 0 {
        return Err(ClipforgeError::invalid(format!(
            "blur kernel size must be odd and positive, got {kernel}"
        )));
    }
    debug!("gaussian blur, kernel {}", kernel);
    let weights = gaussian_kernel(kernel as usize, 0.0);
    Ok(par_map(frames, |f| separable_filter(f, &weights, &weights)))
}

/// 3x3 sharpening (center 9, neighbors -1).
pub fn sharpen(frames: &[Frame]) -> FrameSequence {
    let kernel = Kernel::square3(SHARPEN);
    par_map(frames, |f| filter2d(f, &kernel))
}

/// Emboss the luma plane.
pub fn emboss(frames: &[Frame]) -> FrameSequence {
    let kernel = Kernel::square3(EMBOSS);
    par_map(frames, |f| expand_gray(&filter2d_gray(&luma_plane(f), &kernel)))
}

/// Canny edges of the luma plane.
pub fn edge(frames: &[Frame]) -> FrameSequence {
    par_map(frames, |f| {
        expand_gray(&edges::canny(&luma_plane(f), CANNY_LOW, CANNY_HIGH))
    })
}

/// Binary threshold of the luma plane: `luma > t` becomes white.
pub fn threshold(frames: &[Frame], t: i32) -> FrameSequence {
    par_map(frames, |f| {
        let mut gray = luma_plane(f);
        for px in gray.pixels_mut() {
            px.0[0] = if px.0[0] as i32 > t { 255 } else { 0 };
        }
        expand_gray(&gray)
    })
}

/// Directional blur along a line of `size` pixels at `angle` degrees.
pub fn motion_blur(frames: &[Frame], size: u32, angle: f64) -> Result<FrameSequence> {
    let kernel = motion_kernel(size as usize, angle)?;
    debug!("motion blur, size {} angle {}", size, angle);
    Ok(par_map(frames, |f| filter2d(f, &kernel)))
}

/// A horizontal unit line through the middle row, rotated about the kernel
/// center and renormalized to sum 1.
pub fn motion_kernel(size: usize, angle: f64) -> Result<Kernel> {
    if size == 0 {
        return Err(ClipforgeError::invalid("motion blur size must be positive"));
    }

    let mid = (size - 1) / 2;
    let line = |x: i64, y: i64| -> f64 {
        let inside = x >= 0 && (x as usize) < size && y >= 0 && (y as usize) < size;
        if inside && y as usize == mid {
            1.0
        } else {
            0.0
        }
    };

    let center = size as f64 / 2.0 - 0.5;
    let (sin, cos) = angle.to_radians().sin_cos();

    // Inverse mapping with bilinear sampling; outside samples are zero
    let mut weights = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let (dx, dy) = (x as f64 - center, y as f64 - center);
            let sx = center + cos * dx - sin * dy;
            let sy = center + sin * dx + cos * dy;
            let (x0, y0) = (sx.floor(), sy.floor());
            let (fx, fy) = (sx - x0, sy - y0);
            let (x0, y0) = (x0 as i64, y0 as i64);
            let value = line(x0, y0) * (1.0 - fx) * (1.0 - fy)
                + line(x0 + 1, y0) * fx * (1.0 - fy)
                + line(x0, y0 + 1) * (1.0 - fx) * fy
                + line(x0 + 1, y0 + 1) * fx * fy;
            weights.push(value);
        }
    }

    let sum: f64 = weights.iter().sum();
    if sum.abs() < 1e-9 {
        return Err(ClipforgeError::invalid(format!(
            "motion blur kernel of size {size} at {angle} degrees has no weight"
        )));
    }
    Kernel::new(
        size,
        size,
        weights.into_iter().map(|w| (w / sum) as f32).collect(),
    )
}

// ── Masks ───────────────────────────────────────────────────────

/// Darken toward the edges with a separable Gaussian mask.
///
/// The mask's sigma is `intensity` times the frame width (horizontally) and
/// height (vertically); its peak is scaled to 1.
pub fn vignette(frames: &[Frame], intensity: f64) -> FrameSequence {
    par_map(frames, |f| {
        let (w, h) = f.dimensions();
        if w == 0 || h == 0 {
            return f.clone();
        }
        let kx = gaussian_kernel(w as usize, w as f64 * intensity);
        let ky = gaussian_kernel(h as usize, h as f64 * intensity);
        let peak = kx.iter().cloned().fold(0.0f32, f32::max)
            * ky.iter().cloned().fold(0.0f32, f32::max);
        let peak = if peak > 0.0 { peak } else { 1.0 };

        let mut out = f.clone();
        for (x, y, px) in out.enumerate_pixels_mut() {
            let weight = kx[x as usize] * ky[y as usize] / peak;
            px.0 = px.0.map(|c| saturate_u8(c as f32 * weight));
        }
        out
    })
}

// ── Smoothing ───────────────────────────────────────────────────

/// Non-local means denoising with the default strength.
pub fn denoise(frames: &[Frame]) -> FrameSequence {
    let params = NlMeansParams::default();
    debug!("nl-means denoise {:?}", params);
    par_map(frames, |f| nl_means(f, &params))
}

/// Non-local means over RGB.
///
/// Every pixel becomes a weighted average of the pixels in its search window,
/// weighted by `exp(-d / h^2)` where `d` is the mean squared difference of
/// the patches around the two pixels.
pub fn nl_means(frame: &Frame, params: &NlMeansParams) -> Frame {
    const MIN_WEIGHT: f32 = 0.001;

    let (w, h) = (frame.width() as usize, frame.height() as usize);
    if w == 0 || h == 0 {
        return frame.clone();
    }

    let tr = params.template / 2;
    let sr = params.search / 2;
    let pad = tr + sr;
    let (pw, ph) = (w + 2 * pad, h + 2 * pad);

    // Reflect-padded copy so every patch lookup is in bounds
    let src = frame.as_raw();
    let mut padded = vec![0.0f32; pw * ph * 3];
    for py in 0..ph {
        let sy = reflect101(py as i64 - pad as i64, h);
        for px in 0..pw {
            let sx = reflect101(px as i64 - pad as i64, w);
            for c in 0..3 {
                padded[(py * pw + px) * 3 + c] = src[(sy * w + sx) * 3 + c] as f32;
            }
        }
    }

    // Patch-difference region: every output pixel plus its template border
    let (rw, rh) = (w + 2 * tr, h + 2 * tr);
    let origin = pad - tr;
    let norm = 1.0 / ((params.template * params.template * 3) as f32 * params.h * params.h);

    let mut accum = vec![0.0f32; w * h * 3];
    let mut weight_sum = vec![0.0f32; w * h];
    let mut diff = vec![0.0f32; rw * rh];
    let mut integral = vec![0.0f64; (rw + 1) * (rh + 1)];

    for dy in -(sr as i64)..=sr as i64 {
        for dx in -(sr as i64)..=sr as i64 {
            for ry in 0..rh {
                for rx in 0..rw {
                    let a = ((origin + ry) * pw + origin + rx) * 3;
                    let by = (origin + ry) as i64 + dy;
                    let bx = (origin + rx) as i64 + dx;
                    let b = (by as usize * pw + bx as usize) * 3;
                    let mut d = 0.0;
                    for c in 0..3 {
                        let delta = padded[a + c] - padded[b + c];
                        d += delta * delta;
                    }
                    diff[ry * rw + rx] = d;
                }
            }

            for ry in 0..rh {
                let mut row = 0.0f64;
                for rx in 0..rw {
                    row += diff[ry * rw + rx] as f64;
                    integral[(ry + 1) * (rw + 1) + rx + 1] = integral[ry * (rw + 1) + rx + 1] + row;
                }
            }

            let t = params.template;
            for y in 0..h {
                for x in 0..w {
                    let at = |yy: usize, xx: usize| integral[yy * (rw + 1) + xx];
                    let ssd = at(y + t, x + t) - at(y, x + t) - at(y + t, x) + at(y, x);
                    let weight = (-(ssd as f32) * norm).exp();
                    if weight < MIN_WEIGHT {
                        continue;
                    }
                    let sy = (pad + y) as i64 + dy;
                    let sx = (pad + x) as i64 + dx;
                    let s = (sy as usize * pw + sx as usize) * 3;
                    let o = (y * w + x) * 3;
                    for c in 0..3 {
                        accum[o + c] += weight * padded[s + c];
                    }
                    weight_sum[y * w + x] += weight;
                }
            }
        }
    }

    let mut out = frame.clone();
    for (i, px) in out.pixels_mut().enumerate() {
        let total = weight_sum[i];
        for c in 0..3 {
            px.0[c] = saturate_u8(accum[i * 3 + c] / total);
        }
    }
    out
}

/// Edge-preserving smoothing of a color frame.
///
/// Neighbors within a disc of radius `diameter / 2` are weighted by spatial
/// distance and by the sum of absolute channel differences.
pub fn bilateral(frame: &Frame, params: &BilateralParams) -> Frame {
    let (w, h) = (frame.width() as usize, frame.height() as usize);
    if w == 0 || h == 0 {
        return frame.clone();
    }
    let radius = (params.diameter / 2).max(1) as i64;
    let color_coeff = -0.5 / (params.sigma_color * params.sigma_color);
    let space_coeff = -0.5 / (params.sigma_space * params.sigma_space);

    let taps: Vec<(i64, i64, f32)> = (-radius..=radius)
        .flat_map(|dy| (-radius..=radius).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| ((dx * dx + dy * dy) as f64).sqrt() <= radius as f64)
        .map(|(dx, dy)| (dx, dy, ((dx * dx + dy * dy) as f32 * space_coeff).exp()))
        .collect();
    let color_weight: Vec<f32> = (0..=255 * 3)
        .map(|d: i32| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let src = frame.as_raw();
    let mut out = vec![0u8; src.len()];
    out.par_chunks_mut(w * 3).enumerate().for_each(|(y, row)| {
        for x in 0..w {
            let center = &src[(y * w + x) * 3..(y * w + x) * 3 + 3];
            let mut acc = [0.0f32; 3];
            let mut total = 0.0f32;
            for &(dx, dy, space) in &taps {
                let sx = reflect101(x as i64 + dx, w);
                let sy = reflect101(y as i64 + dy, h);
                let n = &src[(sy * w + sx) * 3..(sy * w + sx) * 3 + 3];
                let d: i32 = (0..3).map(|c| (n[c] as i32 - center[c] as i32).abs()).sum();
                let weight = space * color_weight[d as usize];
                for c in 0..3 {
                    acc[c] += n[c] as f32 * weight;
                }
                total += weight;
            }
            for c in 0..3 {
                row[x * 3 + c] = saturate_u8(acc[c] / total);
            }
        }
    });

    RgbImage::from_raw(w as u32, h as u32, out).unwrap_or_else(|| frame.clone())
}

/// Binary mask from a local mean: white where `src > mean - c`.
///
/// The mean covers a `block` x `block` window with replicated borders.
pub fn adaptive_threshold_mean(gray: &GrayImage, block: u32, c: i32) -> GrayImage {
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let r = (block / 2) as i64;
    let area = (block * block) as f32;
    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        let mut sum = 0u32;
        for dy in -r..=r {
            let sy = replicate(y as i64 + dy, h) as u32;
            for dx in -r..=r {
                let sx = replicate(x as i64 + dx, w) as u32;
                sum += gray.get_pixel(sx, sy).0[0] as u32;
            }
        }
        let mean = (sum as f32 / area).round() as i32;
        let v = gray.get_pixel(x, y).0[0] as i32;
        Luma([if v > mean - c { 255 } else { 0 }])
    })
}

/// Flat-shaded colors with dark outlines.
///
/// A bilateral-smoothed copy of the frame is kept where an adaptive threshold
/// of the median-filtered luma is white; everything else turns black.
pub fn cartoon(frames: &[Frame]) -> FrameSequence {
    const MEDIAN_RADIUS: u32 = 2;
    const BLOCK: u32 = 9;
    const OFFSET: i32 = 9;

    let params = BilateralParams::default();
    par_map(frames, |f| {
        let smoothed_luma = ip_filter::median_filter(&luma_plane(f), MEDIAN_RADIUS, MEDIAN_RADIUS);
        let mask = adaptive_threshold_mean(&smoothed_luma, BLOCK, OFFSET);
        let mut color = bilateral(f, &params);
        for (x, y, px) in color.enumerate_pixels_mut() {
            if mask.get_pixel(x, y).0[0] == 0 {
                px.0 = [0, 0, 0];
            }
        }
        color
    })
}
