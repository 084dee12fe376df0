//! Export pipeline for encoding frame sequences to video files.
//!
//! Uses FFmpeg as a sidecar process: raw RGB24 frames are piped into its
//! stdin and encoded with fixed settings.

use crate::probe::stderr_tail;
use crate::source::FrameSink;
use clipforge_core::{ClipforgeError, Frame, FrameRate, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

// ── Encode settings ─────────────────────────────────────────────

/// Output codec configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    /// FFmpeg encoder name.
    pub codec: String,
    /// Four-character code written to the container.
    pub tag: String,
    /// Output pixel format.
    pub pixel_format: String,
    /// Fixed quantizer (`-q:v`), lower is better.
    pub quality: u32,
}

impl Default for EncodeSettings {
    /// MPEG-4 Part 2 tagged `mp4v`.
    fn default() -> Self {
        Self {
            codec: "mpeg4".into(),
            tag: "mp4v".into(),
            pixel_format: "yuv420p".into(),
            quality: 5,
        }
    }
}

// ── Export job ───────────────────────────────────────────────────

/// One encode of a frame sequence.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Output file path.
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
    pub settings: EncodeSettings,
}

impl ExportJob {
    /// Create a new export job.
    pub fn new(
        output_path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        frame_rate: FrameRate,
    ) -> Self {
        Self {
            output_path: output_path.into(),
            width,
            height,
            frame_rate,
            settings: EncodeSettings::default(),
        }
    }

    /// Use different encode settings.
    pub fn with_settings(mut self, settings: EncodeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the FFmpeg command arguments.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        args.extend_from_slice(&[
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-nostats".into(),
        ]);

        // Input from pipe (raw frames)
        args.extend_from_slice(&[
            "-y".into(),
            "-f".into(),
            "rawvideo".into(),
            "-pixel_format".into(),
            "rgb24".into(),
            "-video_size".into(),
            format!("{}x{}", self.width, self.height),
            "-framerate".into(),
            self.frame_rate.ffmpeg_arg(),
            "-i".into(),
            "pipe:0".into(),
        ]);

        args.extend_from_slice(&[
            "-c:v".into(),
            self.settings.codec.clone(),
            "-tag:v".into(),
            self.settings.tag.clone(),
            "-q:v".into(),
            self.settings.quality.to_string(),
            "-pix_fmt".into(),
            self.settings.pixel_format.clone(),
        ]);

        // Output
        args.push(self.output_path.to_string_lossy().into_owned());

        args
    }

    /// Run the export, piping `frames` into FFmpeg.
    ///
    /// Every frame must match the job's dimensions.
    pub fn run(&self, frames: &[Frame]) -> Result<()> {
        if frames.is_empty() {
            return Ok(());
        }
        if let Some((i, f)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.dimensions() != (self.width, self.height))
        {
            return Err(ClipforgeError::Encoder(format!(
                "frame {i} is {}x{}, expected {}x{}",
                f.width(),
                f.height(),
                self.width,
                self.height
            )));
        }

        let args = self.ffmpeg_args();
        debug!("ffmpeg {}", args.join(" "));

        let mut child = Command::new(ffmpeg_sidecar::paths::ffmpeg_path())
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ClipforgeError::Encoder(format!("Failed to spawn ffmpeg: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ClipforgeError::Encoder("Failed to open ffmpeg stdin".into()))?;

        for (frame_number, frame) in frames.iter().enumerate() {
            if let Err(e) = stdin.write_all(frame.as_raw()) {
                drop(stdin);
                let output = child.wait_with_output()?;
                return Err(ClipforgeError::Encoder(format!(
                    "Failed to write frame {frame_number}: {e} ({})",
                    stderr_tail(&String::from_utf8_lossy(&output.stderr))
                )));
            }
        }

        // Close stdin to signal end-of-stream
        drop(stdin);

        let output = child
            .wait_with_output()
            .map_err(|e| ClipforgeError::Encoder(format!("Failed to wait for ffmpeg: {e}")))?;

        if !output.status.success() {
            return Err(ClipforgeError::Encoder(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr_tail(&String::from_utf8_lossy(&output.stderr))
            )));
        }

        info!(
            "Wrote {} frames ({}x{} @ {}) to {}",
            frames.len(),
            self.width,
            self.height,
            self.frame_rate,
            self.output_path.display()
        );
        Ok(())
    }
}

/// Frame sink that encodes through FFmpeg.
#[derive(Debug, Clone, Default)]
pub struct VideoEncoder {
    settings: EncodeSettings,
}

impl FrameSink for VideoEncoder {
    fn write(&self, path: &Path, frames: &[Frame], fps: FrameRate) -> Result<()> {
        let Some(first) = frames.first() else {
            debug!("Nothing to write to {}", path.display());
            return Ok(());
        };
        ExportJob::new(path, first.width(), first.height(), fps)
            .with_settings(self.settings.clone())
            .run(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_core::frame::{numbered_sequence, solid};

    #[test]
    fn test_default_settings() {
        let settings = EncodeSettings::default();
        assert_eq!(settings.codec, "mpeg4");
        assert_eq!(settings.tag, "mp4v");
        assert_eq!(settings.pixel_format, "yuv420p");
    }

    #[test]
    fn test_ffmpeg_args() {
        let job = ExportJob::new("/tmp/out.mp4", 640, 360, FrameRate::FPS_29_97);
        let args = job.ffmpeg_args();
        let pos = |s: &str| args.iter().position(|a| a == s).unwrap();

        assert_eq!(args[pos("-video_size") + 1], "640x360");
        assert_eq!(args[pos("-framerate") + 1], "30000/1001");
        assert_eq!(args[pos("-c:v") + 1], "mpeg4");
        assert_eq!(args[pos("-tag:v") + 1], "mp4v");
        assert_eq!(args[pos("-pixel_format") + 1], "rgb24");
        assert_eq!(args.last().unwrap(), "/tmp/out.mp4");
    }

    #[test]
    fn test_empty_sequence_is_noop() {
        let encoder = VideoEncoder::default();
        encoder
            .write(Path::new("/nonexistent/dir/out.mp4"), &[], FrameRate::FPS_30)
            .unwrap();
    }

    #[test]
    fn test_mismatched_frame_sizes_rejected() {
        let mut frames = numbered_sequence(2, 8, 8);
        frames.push(solid(4, 4, [0, 0, 0]));
        let job = ExportJob::new("/tmp/never.mp4", 8, 8, FrameRate::FPS_30);
        let err = job.run(&frames).unwrap_err();
        assert!(err.to_string().contains("frame 2 is 4x4"));
    }
}
