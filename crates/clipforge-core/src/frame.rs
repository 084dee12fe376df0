//! Frame types for decoded video in CPU memory.
//!
//! A frame is a packed RGB8 raster. A sequence is an ordered `Vec` of frames in
//! playback order; frame rate and source dimensions travel alongside it in
//! [`SequenceInfo`] instead of being stored per frame.

use crate::error::{ClipforgeError, Result};
use crate::time::FrameRate;
use image::{Rgb, RgbImage};

/// A video frame: 3 channels, 8 bits per channel.
pub type Frame = RgbImage;

/// Frames in playback order.
pub type FrameSequence = Vec<Frame>;

/// Bytes per pixel of a [`Frame`].
pub const BYTES_PER_PIXEL: usize = 3;

/// Sequence-level metadata reported by a frame source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceInfo {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Playback rate
    pub fps: FrameRate,
    /// Frame count as reported by the container (may be an estimate)
    pub frame_count: usize,
}

impl SequenceInfo {
    /// Create metadata for a sequence.
    pub fn new(width: u32, height: u32, fps: FrameRate, frame_count: usize) -> Self {
        Self {
            width,
            height,
            fps,
            frame_count,
        }
    }

    /// Derive metadata from materialized frames (dimensions of the first frame).
    pub fn from_frames(frames: &[Frame], fps: FrameRate) -> Self {
        let (width, height) = frames.first().map(|f| f.dimensions()).unwrap_or((0, 0));
        Self::new(width, height, fps, frames.len())
    }
}

/// Wrap a packed RGB24 buffer as a frame.
pub fn frame_from_rgb24(width: u32, height: u32, data: Vec<u8>) -> Result<Frame> {
    let expected = width as usize * height as usize * BYTES_PER_PIXEL;
    let got = data.len();
    RgbImage::from_raw(width, height, data).ok_or_else(|| {
        ClipforgeError::Decoder(format!(
            "frame buffer holds {got} bytes, {width}x{height} RGB24 needs {expected}"
        ))
    })
}

/// A frame filled with one color.
pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
    RgbImage::from_pixel(width, height, Rgb(rgb))
}

/// Create a test pattern frame (color bars).
pub fn test_pattern(width: u32, height: u32) -> Frame {
    const BARS: [[u8; 3]; 8] = [
        [255, 255, 255], // White
        [255, 255, 0],   // Yellow
        [0, 255, 255],   // Cyan
        [0, 255, 0],     // Green
        [255, 0, 255],   // Magenta
        [255, 0, 0],     // Red
        [0, 0, 255],     // Blue
        [0, 0, 0],       // Black
    ];

    RgbImage::from_fn(width, height, |x, _| {
        let bar = (x as u64 * 8 / width.max(1) as u64) as usize;
        Rgb(BARS[bar.min(7)])
    })
}

/// A short sequence of distinguishable frames, handy for index bookkeeping checks.
pub fn numbered_sequence(count: usize, width: u32, height: u32) -> FrameSequence {
    (0..count)
        .map(|i| solid(width, height, [(i % 256) as u8, (i / 256 % 256) as u8, 7]))
        .collect()
}
