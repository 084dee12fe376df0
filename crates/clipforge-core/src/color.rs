//! Pixel-level color conversions shared by the operation catalog.
//!
//! Everything here works on 8-bit RGB triples. Hue uses the compact 8-bit
//! convention where one unit is two degrees, so hue lives in `[0, 180)`.


/// Fixed-point shift used by the luma weights.
const LUMA_SHIFT: u32 = 14;

/// BT.601 luma with 14-bit fixed-point weights.
#[inline]
pub fn luma_bt601(r: u8, g: u8, b: u8) -> u8 {
    let y = (r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868 + (1 << (LUMA_SHIFT - 1)))
        >> LUMA_SHIFT;
    y.min(255) as u8
}

/// Saturate a floating point channel value to `u8`, rounding to nearest.
#[inline]
pub fn saturate_u8(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// 8-bit HSV triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hsv8 {
    /// Hue in half-degrees, `0..180`
    pub h: u8,
    /// Saturation, `0..=255`
    pub s: u8,
    /// Value, `0..=255`
    pub v: u8,
}

impl Hsv8 {
    /// Hue range in 8-bit units.
    pub const HUE_RANGE: u8 = 180;

    /// Create a new HSV triple.
    #[inline]
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Convert from RGB.
    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        let v = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = (v - min) as i32;

        let s = if v == 0 {
            0
        } else {
            ((diff * 255) as f32 / v as f32).round() as u8
        };

        if diff == 0 {
            return Self::new(0, s, v);
        }

        let (r, g, b) = (r as i32, g as i32, b as i32);
        // Hue in sixths of the circle, scaled by `diff`
        let sixths = if v as i32 == r {
            g - b
        } else if v as i32 == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };

        let mut h = (sixths as f32 * 30.0 / diff as f32).round() as i32;
        if h < 0 {
            h += Self::HUE_RANGE as i32;
        }
        if h >= Self::HUE_RANGE as i32 {
            h -= Self::HUE_RANGE as i32;
        }
        Self::new(h as u8, s, v)
    }

    /// Convert back to RGB.
    pub fn to_rgb(self) -> [u8; 3] {
        let v = self.v as f32 / 255.0;
        let s = self.s as f32 / 255.0;
        if self.s == 0 {
            return [self.v; 3];
        }

        let mut h = self.h as f32 * 6.0 / Self::HUE_RANGE as f32;
        while h >= 6.0 {
            h -= 6.0;
        }
        let sector = h.floor();
        let frac = h - sector;

        let p = v * (1.0 - s);
        let q = v * (1.0 - s * frac);
        let t = v * (1.0 - s * (1.0 - frac));

        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        [saturate_u8(r * 255.0), saturate_u8(g * 255.0), saturate_u8(b * 255.0)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_extremes() {
        assert_eq!(luma_bt601(0, 0, 0), 0);
        assert_eq!(luma_bt601(255, 255, 255), 255);
        // Green dominates
        assert!(luma_bt601(0, 255, 0) > luma_bt601(255, 0, 0));
        assert!(luma_bt601(255, 0, 0) > luma_bt601(0, 0, 255));
    }

    #[test]
    fn test_primary_hues() {
        assert_eq!(Hsv8::from_rgb([255, 0, 0]), Hsv8::new(0, 255, 255));
        assert_eq!(Hsv8::from_rgb([0, 255, 0]), Hsv8::new(60, 255, 255));
        assert_eq!(Hsv8::from_rgb([0, 0, 255]), Hsv8::new(120, 255, 255));
    }

    #[test]
    fn test_gray_has_no_saturation() {
        let hsv = Hsv8::from_rgb([90, 90, 90]);
        assert_eq!((hsv.h, hsv.s, hsv.v), (0, 0, 90));
        assert_eq!(hsv.to_rgb(), [90, 90, 90]);
    }

    #[test]
    fn test_round_trip_is_close() {
        for rgb in [[200, 40, 10], [12, 180, 90], [30, 60, 250], [255, 255, 0]] {
            let back = Hsv8::from_rgb(rgb).to_rgb();
            for c in 0..3 {
                assert!(
                    (back[c] as i32 - rgb[c] as i32).abs() <= 4,
                    "{rgb:?} -> {back:?}"
                );
            }
        }
    }

    #[test]
    fn test_saturate_u8() {
        assert_eq!(saturate_u8(-3.0), 0);
        assert_eq!(saturate_u8(254.6), 255);
        assert_eq!(saturate_u8(300.0), 255);
        assert_eq!(saturate_u8(f32::NAN), 0);
    }
}
