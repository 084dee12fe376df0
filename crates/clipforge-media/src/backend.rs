//! FFmpeg-backed media layer.

use crate::decoder::VideoDecoder;
use crate::export::VideoEncoder;
use crate::source::{FrameSink, FrameSource, SourceOpener};
use clipforge_core::{Frame, FrameRate, Result};
use std::path::Path;

/// Opens files with ffprobe/ffmpeg and encodes through ffmpeg.
#[derive(Debug, Clone, Default)]
pub struct FfmpegMedia {
    encoder: VideoEncoder,
}

impl SourceOpener for FfmpegMedia {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>> {
        Ok(Box::new(VideoDecoder::open(path)?))
    }
}

impl FrameSink for FfmpegMedia {
    fn write(&self, path: &Path, frames: &[Frame], fps: FrameRate) -> Result<()> {
        self.encoder.write(path, frames, fps)
    }
}
