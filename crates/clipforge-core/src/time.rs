//! Frame rate representation.
//!
//! Rates are numerator/denominator pairs so that NTSC-style rates such as
//! 30000/1001 survive a decode/encode round trip unchanged.

use crate::error::{ClipforgeError, Result};
use std::fmt;

/// Frame rate as a rational number (e.g., 24000/1001 for 23.976 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRate {
    /// Numerator (e.g., 24000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Approximate a floating point rate. Whole rates stay exact.
    pub fn from_fps_f64(fps: f64) -> Self {
        if !fps.is_finite() || fps <= 0.0 {
            return Self::default();
        }
        if (fps - fps.round()).abs() < 0.001 {
            return Self::new(fps.round() as u32, 1);
        }
        Self::new((fps * 1000.0).round() as u32, 1000).reduced()
    }

    /// Parse ffprobe-style rates: `"30000/1001"`, `"25/1"` or `"29.97"`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.split_once('/') {
            Some((num, den)) => {
                let num: u32 = num.trim().parse().ok()?;
                let den: u32 = den.trim().parse().ok()?;
                (num > 0 && den > 0).then(|| Self::new(num, den).reduced())
            }
            None => {
                let fps: f64 = s.trim().parse().ok()?;
                (fps > 0.0).then(|| Self::from_fps_f64(fps))
            }
        }
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// This rate multiplied by `factor` (used to slow playback without touching frames).
    ///
    /// Fails when the product is not a positive rate at millisecond precision.
    pub fn scaled(self, factor: f64) -> Result<Self> {
        let fps = self.to_fps_f64() * factor;
        let rate = Self::from_fps_f64(fps);
        if !fps.is_finite() || fps <= 0.0 || rate.numerator == 0 {
            return Err(ClipforgeError::invalid(format!(
                "{self} scaled by {factor} is below the lowest encodable rate"
            )));
        }
        Ok(rate)
    }

    /// Rate in the `num/den` form ffmpeg accepts for `-framerate`.
    pub fn ffmpeg_arg(self) -> String {
        format!("{}/{}", self.numerator, self.denominator)
    }

    fn reduced(self) -> Self {
        let g = gcd(self.numerator, self.denominator).max(1);
        Self::new(self.numerator / g, self.denominator / g)
    }

    /// Common frame rates
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}
