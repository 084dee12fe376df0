//! Integration tests for the media layer as the dispatcher sees it.
//!
//! None of these need an ffmpeg binary: they stay on paths that fail or
//! return before a process is spawned.

use clipforge_cli::{exit_status, Editor};
use clipforge_core::frame::numbered_sequence;
use clipforge_core::FrameRate;
use clipforge_media::{
    FfmpegMedia, FrameSink, FrameSource, MediaBackend, MediaProbe, MemorySource, SourceOpener,
};
use clipforge_ops::{geometric, temporal};
use std::path::Path;
use std::sync::Arc;

const PROBE_JSON: &str = r#"{
    "streams": [{
        "codec_name": "h264",
        "width": 320,
        "height": 240,
        "r_frame_rate": "25/1",
        "avg_frame_rate": "25/1",
        "nb_frames": "250"
    }],
    "format": { "duration": "10.000000" }
}"#;

#[test]
fn ffmpeg_backend_reports_missing_input_as_open_failure() {
    let media: Arc<dyn MediaBackend> = Arc::new(FfmpegMedia::default());
    let err = media
        .open(Path::new("/nonexistent/clipforge/input.mp4"))
        .err()
        .unwrap();
    assert!(err.is_source_open());

    let err = Editor::open("/nonexistent/clipforge/input.mp4", media)
        .err()
        .unwrap();
    assert_eq!(exit_status(&err), 1);
}

#[test]
fn ffmpeg_backend_skips_empty_writes() {
    let media = FfmpegMedia::default();
    media
        .write(Path::new("/nonexistent/out.mp4"), &[], FrameRate::FPS_30)
        .unwrap();
}

#[test]
fn probe_metadata_drives_rotation_canvas() {
    let probe = MediaProbe::from_json("clip.mp4", PROBE_JSON).unwrap();
    let info = probe.sequence_info();
    assert_eq!((info.width, info.height, info.frame_count), (320, 240, 250));
    assert_eq!(info.fps, FrameRate::FPS_25);

    let frames = numbered_sequence(2, info.width, info.height);
    let rotated = geometric::rotate(&frames, 30.0, info.width, info.height);
    assert!(rotated.iter().all(|f| f.dimensions() == (320, 240)));
}

#[test]
fn standalone_source_range_then_reverse() {
    let frames = numbered_sequence(10, 4, 4);
    let mut source = MemorySource::new(frames.clone(), FrameRate::FPS_24);
    assert_eq!(source.info().frame_count, 10);

    let middle = source.read_range(3, 7).unwrap();
    let reversed = temporal::reverse(&middle);
    assert_eq!(reversed.len(), 4);
    assert_eq!(reversed[0], frames[6]);
    assert_eq!(reversed[3], frames[3]);
}
