//! Source and sink traits consumed by the command dispatcher.

use clipforge_core::{Frame, FrameRate, FrameSequence, Result, SequenceInfo};
use std::path::Path;

/// A decoded video that can be read whole, by range, or one frame at a time.
pub trait FrameSource: Send {
    /// Dimensions, rate and frame count of the source.
    fn info(&self) -> SequenceInfo;

    /// Decode every frame.
    fn read_all(&mut self) -> Result<FrameSequence>;

    /// Decode frames `[start, end)`, stopping early at end of stream.
    fn read_range(&mut self, start: usize, end: usize) -> Result<FrameSequence>;

    /// Write frame `index` to `out` as a still image.
    ///
    /// Returns `Ok(false)` when the frame cannot be read.
    fn extract_frame(&mut self, index: usize, out: &Path) -> Result<bool>;
}

/// Opens frame sources by path.
pub trait SourceOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>>;
}

/// Encodes frame sequences.
pub trait FrameSink: Send + Sync {
    /// Encode `frames` at `fps`. An empty sequence writes nothing.
    fn write(&self, path: &Path, frames: &[Frame], fps: FrameRate) -> Result<()>;
}

/// Both halves of a media layer.
pub trait MediaBackend: SourceOpener + FrameSink {}

impl<T: SourceOpener + FrameSink> MediaBackend for T {}

/// Clamp a `[start, end)` request to a sequence of `len` frames.
pub(crate) fn clamp_range(start: usize, end: usize, len: usize) -> std::ops::Range<usize> {
    let start = start.min(len);
    start..end.clamp(start, len)
}
