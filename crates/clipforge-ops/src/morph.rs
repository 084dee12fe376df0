//! Morphology with a square structuring element.
//!
//! The element is `size` pixels on a side with its anchor at `size / 2`.
//! Pixels outside the frame are ignored, and each channel is processed on its
//! own. A square element is separable, so each pass runs along rows and then
//! along columns.

use crate::kernel::par_map;
use clipforge_core::{ClipforgeError, Frame, FrameSequence, Result};
use image::RgbImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extremum {
    Max,
    Min,
}

impl Extremum {
    #[inline]
    fn pick(self, a: u8, b: u8) -> u8 {
        match self {
            Self::Max => a.max(b),
            Self::Min => a.min(b),
        }
    }

    #[inline]
    fn identity(self) -> u8 {
        match self {
            Self::Max => u8::MIN,
            Self::Min => u8::MAX,
        }
    }
}

fn check_size(size: u32) -> Result<()> {
    if size == 0 {
        return Err(ClipforgeError::invalid(
            "structuring element size must be at least 1",
        ));
    }
    Ok(())
}

/// One separable max/min pass over a frame.
fn rank_filter(frame: &Frame, size: u32, op: Extremum) -> Frame {
    let (w, h) = (frame.width() as i64, frame.height() as i64);
    let before = (size / 2) as i64;
    let after = size as i64 - 1 - before;
    let src = frame.as_raw();
    let idx = |x: i64, y: i64, c: usize| (y * w + x) as usize * 3 + c;

    let mut rows = vec![0u8; src.len()];
    for y in 0..h {
        for x in 0..w {
            let (lo, hi) = ((x - before).max(0), (x + after).min(w - 1));
            for c in 0..3 {
                let mut val = op.identity();
                for sx in lo..=hi {
                    val = op.pick(val, src[idx(sx, y, c)]);
                }
                rows[idx(x, y, c)] = val;
            }
        }
    }

    let mut out = vec![0u8; src.len()];
    for y in 0..h {
        let (lo, hi) = ((y - before).max(0), (y + after).min(h - 1));
        for x in 0..w {
            for c in 0..3 {
                let mut val = op.identity();
                for sy in lo..=hi {
                    val = op.pick(val, rows[idx(x, sy, c)]);
                }
                out[idx(x, y, c)] = val;
            }
        }
    }

    RgbImage::from_raw(w as u32, h as u32, out).unwrap_or_else(|| frame.clone())
}

/// Local maximum.
pub fn dilate(frames: &[Frame], size: u32) -> Result<FrameSequence> {
    check_size(size)?;
    Ok(par_map(frames, |f| rank_filter(f, size, Extremum::Max)))
}

/// Local minimum.
pub fn erode(frames: &[Frame], size: u32) -> Result<FrameSequence> {
    check_size(size)?;
    Ok(par_map(frames, |f| rank_filter(f, size, Extremum::Min)))
}

/// Erode then dilate: removes bright specks smaller than the element.
pub fn open(frames: &[Frame], size: u32) -> Result<FrameSequence> {
    check_size(size)?;
    Ok(par_map(frames, |f| {
        rank_filter(&rank_filter(f, size, Extremum::Min), size, Extremum::Max)
    }))
}

/// Dilate then erode: fills dark gaps smaller than the element.
pub fn close(frames: &[Frame], size: u32) -> Result<FrameSequence> {
    check_size(size)?;
    Ok(par_map(frames, |f| {
        rank_filter(&rank_filter(f, size, Extremum::Max), size, Extremum::Min)
    }))
}
