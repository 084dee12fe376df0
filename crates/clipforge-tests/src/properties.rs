//! Property-based tests for the sequence transforms.

use clipforge_core::frame::{frame_from_rgb24, numbered_sequence, solid};
use clipforge_core::{Frame, FrameSequence};
use clipforge_ops::{color, composite, temporal};
use proptest::prelude::*;

const W: u32 = 6;
const H: u32 = 4;

fn arb_frame() -> impl Strategy<Value = Frame> {
    prop::collection::vec(any::<u8>(), (W * H * 3) as usize)
        .prop_map(|data| frame_from_rgb24(W, H, data).unwrap())
}

fn arb_sequence(max: usize) -> impl Strategy<Value = FrameSequence> {
    prop::collection::vec(arb_frame(), 1..=max)
}

// ── Temporal ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn reverse_is_an_involution(frames in arb_sequence(8)) {
        let back = temporal::reverse(&temporal::reverse(&frames));
        prop_assert_eq!(back, frames);
    }

    #[test]
    fn loop_repeats_the_whole_clip(n in 1usize..12, count in 0usize..5) {
        let frames = numbered_sequence(n, 2, 2);
        let out = temporal::loop_frames(&frames, count);
        prop_assert_eq!(out.len(), n * count);
        for (i, f) in out.iter().enumerate() {
            prop_assert_eq!(f, &frames[i % n]);
        }
    }

    #[test]
    fn duplicate_repeats_each_frame(n in 1usize..12, factor in 1usize..5) {
        let frames = numbered_sequence(n, 2, 2);
        let out = temporal::duplicate(&frames, factor);
        prop_assert_eq!(out.len(), n * factor);
        for (i, f) in out.iter().enumerate() {
            prop_assert_eq!(f, &frames[i / factor]);
        }
    }

    #[test]
    fn freeze_adds_duration_or_nothing(n in 1usize..12, index in 0usize..16, duration in 0usize..10) {
        let frames = numbered_sequence(n, 2, 2);
        let out = temporal::freeze(&frames, index, duration);
        if index < n {
            prop_assert_eq!(out.len(), n + duration);
            prop_assert_eq!(&out[..index], &frames[..index]);
            prop_assert!(out[index..index + duration].iter().all(|f| f == &frames[index]));
            prop_assert_eq!(&out[index + duration..], &frames[index..]);
        } else {
            prop_assert_eq!(out, frames);
        }
    }

    #[test]
    fn speed_up_keeps_every_stride_frame(n in 1usize..30, factor in 1.0f64..6.0) {
        let frames = numbered_sequence(n, 2, 2);
        let stride = factor.floor() as usize;
        let out = temporal::speed_up(&frames, factor);
        prop_assert_eq!(out.len(), n.div_ceil(stride));
        for (i, f) in out.iter().enumerate() {
            prop_assert_eq!(f, &frames[i * stride]);
        }
    }
}

#[test]
fn speed_two_keeps_even_frames() {
    let frames = numbered_sequence(10, 2, 2);
    let out = temporal::speed_up(&frames, 2.0);
    let expected: Vec<Frame> = [0, 2, 4, 6, 8].iter().map(|&i| frames[i].clone()).collect();
    assert_eq!(out, expected);
}

// ── Color ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn invert_is_an_involution(frames in arb_sequence(4)) {
        let back = color::invert(&color::invert(&frames));
        prop_assert_eq!(back, frames);
    }

    #[test]
    fn posterize_snaps_down_to_step(frame in arb_frame(), levels in 1u32..=256) {
        let step = 256 / levels;
        let out = color::posterize(std::slice::from_ref(&frame), levels).unwrap();
        for (o, i) in out[0].iter().zip(frame.iter()) {
            let (o, i) = (*o as u32, *i as u32);
            prop_assert!(o <= i);
            prop_assert!(o % step == 0 || o == 255);
            prop_assert!(i - o < step);
        }
    }

    #[test]
    fn gray_has_equal_channels(frames in arb_sequence(3)) {
        for f in color::gray(&frames) {
            prop_assert!(f.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
        }
    }
}

// ── Composite ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn fade_in_starts_black_and_leaves_the_tail(frames in arb_sequence(10), duration in 1usize..6) {
        let out = composite::fade_in(&frames, duration);
        prop_assert_eq!(out.len(), frames.len());
        prop_assert!(out[0].iter().all(|&c| c == 0));
        for i in duration.min(frames.len())..frames.len() {
            prop_assert_eq!(&out[i], &frames[i]);
        }
    }

    #[test]
    fn stack_horizontal_shape(a in arb_sequence(5), b in arb_sequence(5)) {
        let out = composite::stack_horizontal(&a, &b);
        prop_assert_eq!(out.len(), a.len().min(b.len()));
        prop_assert!(out.iter().all(|f| f.dimensions() == (W * 2, H)));
    }

    #[test]
    fn crossfade_length(a in 1usize..20, b in 1usize..20, duration in 0usize..25) {
        let first = numbered_sequence(a, 2, 2);
        let second = numbered_sequence(b, 2, 2);
        let out = composite::crossfade(&first, &second, duration);
        prop_assert_eq!(out.len(), a + b - duration.min(a).min(b));
    }
}

#[test]
fn crossfade_blends_monotonically() {
    let first = vec![solid(W, H, [0, 0, 0]); 20];
    let second = vec![solid(W, H, [200, 200, 200]); 20];
    let out = composite::crossfade(&first, &second, 5);
    assert_eq!(out.len(), 35);

    assert!(out[..15].iter().all(|f| f == &first[0]));
    assert!(out[20..].iter().all(|f| f == &second[0]));

    let levels: Vec<u8> = out[15..20].iter().map(|f| f.get_pixel(0, 0)[0]).collect();
    assert_eq!(levels[0], 0);
    assert!(levels.windows(2).all(|w| w[0] < w[1]));
    assert!(*levels.last().unwrap() < 200);
}
