//! End-to-end dispatch tests.
//!
//! Drives clipforge-cli's editor over the in-memory media backend, checking
//! what each command writes.

use clipforge_cli::registry::COMMANDS;
use clipforge_cli::{exit_status, Editor, Outcome, Request};
use clipforge_core::frame::{numbered_sequence, solid, test_pattern};
use clipforge_core::{ClipforgeError, FrameRate, FrameSequence};
use clipforge_media::MemoryMedia;
use std::sync::Arc;

// ── Helpers ────────────────────────────────────────────────────

const W: u32 = 16;
const H: u32 = 12;

fn input() -> FrameSequence {
    numbered_sequence(6, W, H)
}

fn setup() -> MemoryMedia {
    MemoryMedia::new()
        .with_clip("in.mp4", input(), FrameRate::FPS_25)
        .with_clip("bars.mp4", vec![test_pattern(W, H); 4], FrameRate::FPS_30)
        .with_clip("small.mp4", vec![solid(4, 4, [250, 0, 0]); 6], FrameRate::FPS_30)
}

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn run(media: &MemoryMedia, command: &str, extra: &[&str]) -> Result<Outcome, ClipforgeError> {
    let mut editor = Editor::open("in.mp4", Arc::new(media.clone()))?;
    editor.execute(command, "out.mp4", &args(extra))
}

fn output(media: &MemoryMedia) -> FrameSequence {
    media.written("out.mp4").map(|w| w.frames).unwrap_or_default()
}

// ── Whole-table smoke test ─────────────────────────────────────

#[test]
fn every_defaulted_command_writes_output() {
    for spec in COMMANDS {
        if spec.name == "extract" || spec.params.iter().any(|p| p.is_required()) {
            continue;
        }
        let media = setup();
        let outcome = run(&media, spec.name, &[]).unwrap_or_else(|e| panic!("{}: {e}", spec.name));
        assert!(
            matches!(outcome, Outcome::Written { frames, .. } if frames > 0),
            "{} wrote nothing",
            spec.name
        );
        let written = media.written("out.mp4").unwrap();
        assert_eq!(written.fps, FrameRate::FPS_25, "{} changed the rate", spec.name);
    }
}

#[test]
fn default_lengths_follow_the_table() {
    let cases = [
        ("loop", 12),
        ("duplicate", 12),
        ("freeze", 36),
        ("reverse", 6),
        ("fade_in", 6),
        ("gray", 6),
    ];
    for (command, expected) in cases {
        let media = setup();
        run(&media, command, &[]).unwrap();
        assert_eq!(output(&media).len(), expected, "{command}");
    }
}

// ── Arguments ──────────────────────────────────────────────────

#[test]
fn explicit_arguments_override_defaults() {
    let media = setup();
    run(&media, "crop", &["2", "3", "5", "4"]).unwrap();
    assert!(output(&media).iter().all(|f| f.dimensions() == (5, 4)));

    let media = setup();
    run(&media, "loop", &["3"]).unwrap();
    assert_eq!(output(&media).len(), 18);
}

#[test]
fn surplus_arguments_are_ignored() {
    let media = setup();
    run(&media, "invert", &["1", "2", "3"]).unwrap();
    assert_eq!(output(&media).len(), 6);
}

#[test]
fn conversion_failure_is_exit_two_and_writes_nothing() {
    let media = setup();
    let err = run(&media, "blur", &["15px"]).unwrap_err();
    assert!(matches!(err, ClipforgeError::ArgumentConversion { .. }));
    assert_eq!(exit_status(&err), 2);
    assert!(media.writes().is_empty());
}

#[test]
fn operation_precondition_is_exit_two() {
    let media = setup();
    let err = run(&media, "blur", &["4"]).unwrap_err();
    assert!(matches!(err, ClipforgeError::InvalidParameter(_)));
    assert_eq!(exit_status(&err), 2);

    let err = run(&media, "crop", &["10", "10", "10", "10"]).unwrap_err();
    assert_eq!(exit_status(&err), 2);
    assert!(media.writes().is_empty());
}

#[test]
fn missing_required_argument() {
    let media = setup();
    let err = run(&media, "resize", &["8"]).unwrap_err();
    assert!(matches!(
        err,
        ClipforgeError::MissingArgument { ref command, ref name } if command == "resize" && name == "h"
    ));
}

#[test]
fn text_with_extreme_stroke_still_writes() {
    let media = setup();
    run(&media, "text", &["A", "2", "10", "1", "0", "0", "0", "4294967295"]).unwrap();
    let frames = output(&media);
    assert_eq!(frames.len(), 6);
    assert!(frames[0].pixels().all(|p| p.0 == [0, 0, 0]));
}

// ── Command routing ────────────────────────────────────────────

#[test]
fn unknown_command_exits_zero_without_output() {
    let media = setup();
    let err = run(&media, "sparkle", &[]).unwrap_err();
    assert!(matches!(err, ClipforgeError::UnknownCommand(_)));
    assert_eq!(exit_status(&err), 0);
    assert!(media.writes().is_empty());
}

#[test]
fn missing_input_is_exit_one() {
    let media = MemoryMedia::new();
    let err = Editor::open("gone.mp4", Arc::new(media)).err().unwrap();
    assert_eq!(exit_status(&err), 1);
}

#[test]
fn request_to_editor_round_trip() {
    let line = args(&["in.mp4", "flip", "out.mp4", "0"]);
    let Request::Run(request) = Request::from_args(&line) else {
        panic!("expected a run request");
    };
    let media = setup();
    let mut editor = Editor::open(&request.input, Arc::new(media.clone())).unwrap();
    editor
        .execute(&request.command, &request.output, &request.args)
        .unwrap();
    assert_eq!(output(&media).len(), 6);
}

// ── Multi-source and stills ────────────────────────────────────

#[test]
fn overlay_pastes_smaller_clip() {
    let media = setup();
    run(&media, "overlay", &["small.mp4", "12", "8"]).unwrap();
    let frames = output(&media);
    assert_eq!(frames.len(), 6);
    assert_eq!(frames[0].get_pixel(12, 8).0, [250, 0, 0]);
    assert_eq!(frames[0].get_pixel(0, 0).0, input()[0].get_pixel(0, 0).0);
}

#[test]
fn crossfade_and_vertical_stack() {
    let media = setup();
    run(&media, "crossfade", &["bars.mp4", "3"]).unwrap();
    assert_eq!(output(&media).len(), 6 + 4 - 3);

    let media = setup();
    run(&media, "stack_v", &["small.mp4"]).unwrap();
    let frames = output(&media);
    assert_eq!(frames.len(), 6);
    assert_eq!(frames[0].dimensions(), (W, H * 2));
}

#[test]
fn extract_saves_a_still() {
    let media = setup();
    let mut editor = Editor::open("in.mp4", Arc::new(media.clone())).unwrap();
    let outcome = editor
        .execute("extract", "frame.png", &args(&["2"]))
        .unwrap();
    assert_eq!(outcome, Outcome::Extracted { index: 2, saved: true });
    let stills = media.stills();
    assert_eq!(stills.len(), 1);
    assert_eq!(stills[0].1, input()[2]);
    assert!(media.writes().is_empty());
}
