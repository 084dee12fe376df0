//! Video decoder using FFmpeg via ffmpeg-sidecar.

use crate::probe::MediaProbe;
use crate::source::FrameSource;
use clipforge_core::frame::frame_from_rgb24;
use clipforge_core::{ClipforgeError, FrameSequence, Result, SequenceInfo};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Video decoder using FFmpeg.
///
/// Uses ffmpeg-sidecar to spawn FFmpeg as a subprocess that emits raw RGB24
/// frames on stdout. Every read spawns a fresh process, so reads are
/// independent of each other.
pub struct VideoDecoder {
    path: PathBuf,
    probe: MediaProbe,
}

impl VideoDecoder {
    /// Open a video file for decoding.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let probe = MediaProbe::probe(path)?;

        info!(
            "Opened {}: {}x{} @ {} ({} frames, {})",
            path.display(),
            probe.width,
            probe.height,
            probe.frame_rate,
            probe.frame_count,
            probe.codec
        );

        Ok(Self {
            path: path.to_path_buf(),
            probe,
        })
    }

    /// Decode all frames, or only `[start, end)` when a range is given.
    fn decode(&self, range: Option<(usize, usize)>) -> Result<FrameSequence> {
        let path_str = self.path.to_string_lossy();

        let mut command = FfmpegCommand::new();
        command.hide_banner().input(&*path_str);
        if let Some((start, end)) = range {
            let filter = format!("trim=start_frame={start}:end_frame={end},setpts=PTS-STARTPTS");
            command.args(["-vf", filter.as_str()]);
        }
        command.args(["-an"]).rawvideo();

        debug!("Decoding {} (range {:?})", path_str, range);

        let mut child = command
            .spawn()
            .map_err(|e| ClipforgeError::Decoder(format!("Failed to spawn ffmpeg: {e}")))?;
        let events = child
            .iter()
            .map_err(|e| ClipforgeError::Decoder(format!("Failed to read ffmpeg output: {e}")))?;

        let mut frames = FrameSequence::new();
        let mut last_error = None;
        for event in events {
            match event {
                FfmpegEvent::OutputFrame(frame) => {
                    match frame_from_rgb24(frame.width, frame.height, frame.data) {
                        Ok(frame) => frames.push(frame),
                        Err(err) => {
                            let _ = child.kill();
                            return Err(err);
                        }
                    }
                }
                FfmpegEvent::Error(msg)
                | FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, msg) => {
                    warn!("ffmpeg: {}", msg);
                    last_error = Some(msg);
                }
                _ => {}
            }
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(ClipforgeError::Decoder(format!(
                "ffmpeg exited with {status}: {}",
                last_error.unwrap_or_else(|| "no error output".into())
            )));
        }

        debug!("Decoded {} frames from {}", frames.len(), path_str);
        Ok(frames)
    }
}

impl FrameSource for VideoDecoder {
    fn info(&self) -> SequenceInfo {
        self.probe.sequence_info()
    }

    fn read_all(&mut self) -> Result<FrameSequence> {
        self.decode(None)
    }

    fn read_range(&mut self, start: usize, end: usize) -> Result<FrameSequence> {
        if end <= start {
            return Ok(FrameSequence::new());
        }
        self.decode(Some((start, end)))
    }

    fn extract_frame(&mut self, index: usize, out: &Path) -> Result<bool> {
        let frame = match self.read_range(index, index + 1)?.into_iter().next() {
            Some(frame) => frame,
            None => return Ok(false),
        };
        frame.save(out)?;
        info!("Extracted frame {} to {}", index, out.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_fails_cleanly() {
        let err = VideoDecoder::open("/no/such/video.mp4").err().unwrap();
        assert!(err.is_source_open());
    }
}
