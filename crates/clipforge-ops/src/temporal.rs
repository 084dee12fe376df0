//! Temporal edits: reorder, drop and repeat whole frames.
//!
//! These never look inside a frame; only indices and counts change.

use clipforge_core::{ClipforgeError, Frame, FrameSequence, Result};

/// Default freeze index.
pub const DEFAULT_FREEZE_INDEX: usize = 0;
/// Default freeze length in frames.
pub const DEFAULT_FREEZE_DURATION: usize = 30;
/// Default loop count.
pub const DEFAULT_LOOP_COUNT: usize = 2;
/// Default per-frame repeat count.
pub const DEFAULT_DUPLICATE_FACTOR: usize = 2;

/// Frames in reverse order.
pub fn reverse(frames: &[Frame]) -> FrameSequence {
    frames.iter().rev().cloned().collect()
}

/// Keep every `floor(factor)`-th frame starting at 0 (stride at least 1).
pub fn speed_up(frames: &[Frame], factor: f64) -> FrameSequence {
    let stride = if factor.is_finite() && factor >= 1.0 {
        factor.floor() as usize
    } else {
        1
    };
    frames.iter().step_by(stride.max(1)).cloned().collect()
}

/// Insert `duration` copies of frame `index` in front of it.
///
/// Out-of-range indices leave the sequence unchanged.
pub fn freeze(frames: &[Frame], index: usize, duration: usize) -> FrameSequence {
    let Some(held) = frames.get(index) else {
        return frames.to_vec();
    };
    let mut out = Vec::with_capacity(frames.len() + duration);
    out.extend_from_slice(&frames[..index]);
    out.extend(std::iter::repeat(held).take(duration).cloned());
    out.extend_from_slice(&frames[index..]);
    out
}

/// The whole sequence played `count` times back to back.
pub fn loop_frames(frames: &[Frame], count: usize) -> FrameSequence {
    let mut out = Vec::with_capacity(frames.len() * count);
    for _ in 0..count {
        out.extend_from_slice(frames);
    }
    out
}

/// Each frame repeated `factor` times in place.
pub fn duplicate(frames: &[Frame], factor: usize) -> FrameSequence {
    frames
        .iter()
        .flat_map(|f| std::iter::repeat(f).take(factor).cloned())
        .collect()
}

/// Check a playback-rate factor before it is applied.
pub fn check_speed(factor: f64) -> Result<()> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(ClipforgeError::invalid(format!(
            "speed factor must be positive, got {factor}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_core::frame::numbered_sequence;

    #[test]
    fn test_reverse_twice_is_identity() {
        let frames = numbered_sequence(7, 2, 2);
        let reversed = reverse(&frames);
        assert_eq!(reversed[0], frames[6]);
        assert_eq!(reverse(&reversed), frames);
        assert!(reverse(&[]).is_empty());
    }

    #[test]
    fn test_speed_up_by_two() {
        let frames = numbered_sequence(10, 2, 2);
        let out = speed_up(&frames, 2.0);
        let expected: Vec<_> = [0, 2, 4, 6, 8].iter().map(|&i| frames[i].clone()).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_speed_up_stride_rounding() {
        let frames = numbered_sequence(10, 1, 1);
        assert_eq!(speed_up(&frames, 3.9).len(), 4);
        assert_eq!(speed_up(&frames, 1.0).len(), 10);
        assert_eq!(speed_up(&frames, 0.5).len(), 10);
        assert_eq!(speed_up(&frames, 25.0).len(), 1);
    }

    #[test]
    fn test_freeze() {
        let frames = numbered_sequence(5, 1, 1);
        let out = freeze(&frames, 2, 3);
        assert_eq!(out.len(), 8);
        assert_eq!(&out[..2], &frames[..2]);
        assert!(out[2..6].iter().all(|f| *f == frames[2]));
        assert_eq!(&out[5..], &frames[2..]);

        assert_eq!(freeze(&frames, 5, 3), frames);
        assert!(freeze(&[], 0, 3).is_empty());
        assert_eq!(freeze(&frames, 0, 0), frames);
    }

    #[test]
    fn test_loop_and_duplicate() {
        let frames = numbered_sequence(3, 1, 1);
        let looped = loop_frames(&frames, 3);
        assert_eq!(looped.len(), 9);
        assert_eq!(looped[4], frames[1]);
        assert!(loop_frames(&frames, 0).is_empty());

        let doubled = duplicate(&frames, 2);
        assert_eq!(doubled.len(), 6);
        assert_eq!(doubled[3], frames[1]);
        assert_eq!(doubled[4], frames[2]);
    }

    #[test]
    fn test_check_speed() {
        assert!(check_speed(0.5).is_ok());
        assert!(check_speed(0.0).is_err());
        assert!(check_speed(-1.0).is_err());
        assert!(check_speed(f64::NAN).is_err());
    }
}
