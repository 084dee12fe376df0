//! Media file probing to get metadata without full decode.

use clipforge_core::{ClipforgeError, FrameRate, Result, SequenceInfo};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Information about the primary video stream of a file.
#[derive(Debug, Clone)]
pub struct MediaProbe {
    /// File path
    pub path: String,
    /// Codec name as reported by ffprobe
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
    /// Frame count, read from the stream header or estimated from the duration
    pub frame_count: usize,
    /// Container duration in seconds, when known
    pub duration: Option<f64>,
}

// ── ffprobe JSON shape ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

impl MediaProbe {
    /// Probe a media file with ffprobe.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();

        if !path.exists() {
            return Err(ClipforgeError::SourceOpen {
                path: path.to_path_buf(),
                reason: "file not found".into(),
            });
        }

        let output = Command::new(ffmpeg_sidecar::ffprobe::ffprobe_path())
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=codec_name,width,height,r_frame_rate,avg_frame_rate,nb_frames:format=duration",
                "-of",
                "json",
            ])
            .arg(path)
            .output()
            .map_err(|e| ClipforgeError::SourceOpen {
                path: path.to_path_buf(),
                reason: format!("failed to run ffprobe: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClipforgeError::SourceOpen {
                path: path.to_path_buf(),
                reason: stderr_tail(&stderr),
            });
        }

        let json = String::from_utf8_lossy(&output.stdout);
        debug!("ffprobe output for {}: {}", path_str, json);
        Self::from_json(&path_str, &json)
    }

    /// Build probe data from ffprobe's JSON output.
    pub fn from_json(path: &str, json: &str) -> Result<Self> {
        let parsed: ProbeOutput = serde_json::from_str(json).map_err(|e| {
            ClipforgeError::SourceOpen {
                path: path.into(),
                reason: format!("unreadable ffprobe output: {e}"),
            }
        })?;

        let stream = parsed
            .streams
            .into_iter()
            .next()
            .ok_or_else(|| ClipforgeError::SourceOpen {
                path: path.into(),
                reason: "no video stream".into(),
            })?;

        let (width, height) = match (stream.width, stream.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(ClipforgeError::SourceOpen {
                    path: path.into(),
                    reason: "video stream has no dimensions".into(),
                })
            }
        };

        let frame_rate = stream
            .avg_frame_rate
            .as_deref()
            .and_then(FrameRate::parse)
            .or_else(|| stream.r_frame_rate.as_deref().and_then(FrameRate::parse))
            .unwrap_or_default();

        let duration = parsed
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.parse::<f64>().ok());

        let frame_count = stream
            .nb_frames
            .and_then(|n| n.parse::<usize>().ok())
            .or_else(|| duration.map(|d| (d * frame_rate.to_fps_f64()).round() as usize))
            .unwrap_or(0);

        Ok(Self {
            path: path.to_string(),
            codec: stream.codec_name.unwrap_or_else(|| "unknown".into()),
            width,
            height,
            frame_rate,
            frame_count,
            duration,
        })
    }

    /// Sequence metadata for the probed stream.
    pub fn sequence_info(&self) -> SequenceInfo {
        SequenceInfo::new(self.width, self.height, self.frame_rate, self.frame_count)
    }
}

/// Last non-empty line of a tool's stderr.
pub(crate) fn stderr_tail(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("unknown error")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "programs": [],
        "streams": [
            {
                "codec_name": "h264",
                "width": 640,
                "height": 360,
                "r_frame_rate": "30000/1001",
                "avg_frame_rate": "30000/1001",
                "nb_frames": "300"
            }
        ],
        "format": { "duration": "10.010000" }
    }"#;

    #[test]
    fn test_parse_ffprobe_json() {
        let probe = MediaProbe::from_json("clip.mp4", SAMPLE).unwrap();
        assert_eq!(probe.codec, "h264");
        assert_eq!((probe.width, probe.height), (640, 360));
        assert_eq!(probe.frame_rate, FrameRate::FPS_29_97);
        assert_eq!(probe.frame_count, 300);
        assert!((probe.duration.unwrap() - 10.01).abs() < 1e-9);
    }

    #[test]
    fn test_frame_count_from_duration() {
        let json = r#"{"streams":[{"width":320,"height":240,"avg_frame_rate":"25/1"}],
                       "format":{"duration":"2.0"}}"#;
        let probe = MediaProbe::from_json("clip.mkv", json).unwrap();
        assert_eq!(probe.frame_count, 50);
        assert_eq!(probe.sequence_info().fps, FrameRate::FPS_25);
    }

    #[test]
    fn test_missing_stream_is_open_error() {
        let err = MediaProbe::from_json("audio.wav", r#"{"streams":[]}"#).unwrap_err();
        assert!(err.is_source_open());
    }

    #[test]
    fn test_missing_file() {
        let err = MediaProbe::probe("/definitely/not/here.mp4").unwrap_err();
        assert!(err.is_source_open());
    }

    #[test]
    fn test_stderr_tail() {
        assert_eq!(stderr_tail("a\nb: No such file\n\n"), "b: No such file");
        assert_eq!(stderr_tail(""), "unknown error");
    }
}
