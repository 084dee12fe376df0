//! Clipforge Core - Foundation types for frame-sequence editing
//!
//! This crate provides the fundamental types used throughout clipforge:
//! - Frames and frame sequences (3-channel, 8-bit rasters)
//! - Sequence-level metadata and frame rates
//! - Pixel-space rectangles
//! - Color conversions shared by the operation catalog

pub mod color;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod time;

pub use color::{luma_bt601, saturate_u8, Hsv8};
pub use error::{ClipforgeError, Result};
pub use frame::{Frame, FrameSequence, SequenceInfo};
pub use geometry::PixelRect;
pub use time::FrameRate;
