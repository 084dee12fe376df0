//! Shared numeric helpers: parallel frame maps, border handling, kernel
//! construction and correlation.

use clipforge_core::color::{luma_bt601, saturate_u8};
use clipforge_core::{ClipforgeError, Frame, FrameSequence, Result};
use image::{GrayImage, Luma, Rgb, RgbImage};
use rayon::prelude::*;

const CHANNELS: usize = 3;

// ── Parallel frame maps ─────────────────────────────────────────

/// Apply `f` to every frame in parallel, preserving order.
pub fn par_map<F>(frames: &[Frame], f: F) -> FrameSequence
where
    F: Fn(&Frame) -> Frame + Sync + Send,
{
    frames.par_iter().map(f).collect()
}

/// Like [`par_map`] with the frame index passed along.
pub fn par_map_indexed<F>(frames: &[Frame], f: F) -> FrameSequence
where
    F: Fn(usize, &Frame) -> Frame + Sync + Send,
{
    frames
        .par_iter()
        .enumerate()
        .map(|(i, frame)| f(i, frame))
        .collect()
}

/// Apply `f` to every pixel of a frame.
pub fn map_pixels<F>(frame: &Frame, f: F) -> Frame
where
    F: Fn([u8; 3]) -> [u8; 3],
{
    let mut out = frame.clone();
    for px in out.pixels_mut() {
        px.0 = f(px.0);
    }
    out
}

/// Apply a per-pixel map to every frame of a sequence.
pub fn par_map_pixels<F>(frames: &[Frame], f: F) -> FrameSequence
where
    F: Fn([u8; 3]) -> [u8; 3] + Sync + Send,
{
    par_map(frames, |frame| map_pixels(frame, &f))
}

// ── Grayscale planes ────────────────────────────────────────────

/// BT.601 luma plane of a frame.
pub fn luma_plane(frame: &Frame) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let [r, g, b] = frame.get_pixel(x, y).0;
        Luma([luma_bt601(r, g, b)])
    })
}

/// Replicate a single-channel plane into all three channels.
pub fn expand_gray(gray: &GrayImage) -> Frame {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    })
}

// ── Borders ─────────────────────────────────────────────────────

/// Mirror an index into `0..n` without repeating the edge sample
/// (`dcb|abcd|cba`).
#[inline]
pub fn reflect101(mut i: i64, n: usize) -> usize {
    let n = n as i64;
    if n <= 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * (n - 1) - i;
        } else {
            return i as usize;
        }
    }
}

/// Clamp an index into `0..n` (edge sample repeated).
#[inline]
pub fn replicate(i: i64, n: usize) -> usize {
    i.clamp(0, n.saturating_sub(1) as i64) as usize
}

// ── Kernels ─────────────────────────────────────────────────────

/// Sigma derived from the kernel size when none is given.
pub fn default_sigma(size: usize) -> f64 {
    0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian weights of length `size`.
///
/// A non-positive `sigma` is derived from the size; the small odd sizes then
/// use the usual binomial tables.
pub fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f32> {
    const SMALL: [&[f32]; 4] = [
        &[1.0],
        &[0.25, 0.5, 0.25],
        &[0.0625, 0.25, 0.375, 0.25, 0.0625],
        &[0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
    ];

    if sigma <= 0.0 && size % 2 == 1 && size <= 7 {
        return SMALL[size / 2].to_vec();
    }

    let sigma = if sigma > 0.0 { sigma } else { default_sigma(size) };
    let scale = -0.5 / (sigma * sigma);
    let center = (size as f64 - 1.0) * 0.5;

    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - center;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| (w / sum) as f32).collect()
}

/// Dense 2-D correlation kernel with its anchor at `(width / 2, height / 2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    pub width: usize,
    pub height: usize,
    pub weights: Vec<f32>,
}

impl Kernel {
    /// Build from row-major weights.
    pub fn new(width: usize, height: usize, weights: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 || weights.len() != width * height {
            return Err(ClipforgeError::invalid(format!(
                "kernel of {width}x{height} needs {} weights, got {}",
                width * height,
                weights.len()
            )));
        }
        Ok(Self {
            width,
            height,
            weights,
        })
    }

    /// Build a 3x3 kernel from fixed weights.
    pub fn square3(weights: [f32; 9]) -> Self {
        Self {
            width: 3,
            height: 3,
            weights: weights.to_vec(),
        }
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.weights[y * self.width + x]
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

// ── Correlation ─────────────────────────────────────────────────

/// Correlate a 3-channel frame with `kernel`, reflect-101 borders, rounded
/// and saturated to 8 bits.
pub fn filter2d(frame: &Frame, kernel: &Kernel) -> Frame {
    let (w, h) = (frame.width() as usize, frame.height() as usize);
    if w == 0 || h == 0 {
        return frame.clone();
    }
    let src = frame.as_raw();
    let (ax, ay) = (kernel.width / 2, kernel.height / 2);

    // Non-zero taps only; rotated motion kernels are mostly empty
    let taps: Vec<(i64, i64, f32)> = (0..kernel.height)
        .flat_map(|ky| (0..kernel.width).map(move |kx| (kx, ky)))
        .filter_map(|(kx, ky)| {
            let weight = kernel.at(kx, ky);
            (weight != 0.0).then_some((kx as i64 - ax as i64, ky as i64 - ay as i64, weight))
        })
        .collect();

    let mut out = vec![0u8; src.len()];
    out.par_chunks_mut(w * CHANNELS)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w {
                let mut acc = [0.0f32; CHANNELS];
                for &(dx, dy, weight) in &taps {
                    let sx = reflect101(x as i64 + dx, w);
                    let sy = reflect101(y as i64 + dy, h);
                    let idx = (sy * w + sx) * CHANNELS;
                    for c in 0..CHANNELS {
                        acc[c] += src[idx + c] as f32 * weight;
                    }
                }
                for c in 0..CHANNELS {
                    row[x * CHANNELS + c] = saturate_u8(acc[c]);
                }
            }
        });

    RgbImage::from_raw(w as u32, h as u32, out).unwrap_or_else(|| frame.clone())
}

/// Correlate a single-channel plane with `kernel` (reflect-101 borders).
pub fn filter2d_gray(gray: &GrayImage, kernel: &Kernel) -> GrayImage {
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let (ax, ay) = (kernel.width as i64 / 2, kernel.height as i64 / 2);
    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        let mut acc = 0.0f32;
        for ky in 0..kernel.height {
            for kx in 0..kernel.width {
                let sx = reflect101(x as i64 + kx as i64 - ax, w);
                let sy = reflect101(y as i64 + ky as i64 - ay, h);
                acc += gray.get_pixel(sx as u32, sy as u32).0[0] as f32 * kernel.at(kx, ky);
            }
        }
        Luma([saturate_u8(acc)])
    })
}

/// Separable correlation: `row` along x, then `col` along y, reflect-101
/// borders, anchors at the kernel centers.
pub fn separable_filter(frame: &Frame, row: &[f32], col: &[f32]) -> Frame {
    let (w, h) = (frame.width() as usize, frame.height() as usize);
    if w == 0 || h == 0 {
        return frame.clone();
    }
    let src = frame.as_raw();
    let (rx, ry) = ((row.len() / 2) as i64, (col.len() / 2) as i64);

    let mut horizontal = vec![0.0f32; src.len()];
    horizontal
        .par_chunks_mut(w * CHANNELS)
        .enumerate()
        .for_each(|(y, out)| {
            let line = &src[y * w * CHANNELS..(y + 1) * w * CHANNELS];
            for x in 0..w {
                let mut acc = [0.0f32; CHANNELS];
                for (k, &weight) in row.iter().enumerate() {
                    let sx = reflect101(x as i64 + k as i64 - rx, w);
                    for c in 0..CHANNELS {
                        acc[c] += line[sx * CHANNELS + c] as f32 * weight;
                    }
                }
                out[x * CHANNELS..(x + 1) * CHANNELS].copy_from_slice(&acc);
            }
        });

    let mut out = vec![0u8; src.len()];
    out.par_chunks_mut(w * CHANNELS)
        .enumerate()
        .for_each(|(y, line)| {
            for (i, value) in line.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (k, &weight) in col.iter().enumerate() {
                    let sy = reflect101(y as i64 + k as i64 - ry, h);
                    acc += horizontal[sy * w * CHANNELS + i] * weight;
                }
                *value = saturate_u8(acc);
            }
        });

    RgbImage::from_raw(w as u32, h as u32, out).unwrap_or_else(|| frame.clone())
}
