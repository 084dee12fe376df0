//! Pixel-space rectangles.


/// Axis-aligned rectangle in integer pixel coordinates.
///
/// The origin may be negative or lie outside a frame; use
/// [`PixelRect::fits_within`] before treating it as a sub-window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(self) -> i64 {
        self.x + self.width as i64
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(self) -> i64 {
        self.y + self.height as i64
    }

    /// Whether the rectangle has no pixels.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True if every pixel of the rectangle lies inside a `frame_w` x `frame_h` frame.
    pub fn fits_within(self, frame_w: u32, frame_h: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.right() <= frame_w as i64
            && self.bottom() <= frame_h as i64
    }

    /// A `width` x `height` window centered on `(cx, cy)`, shifted so its
    /// top-left corner is not negative and then cut at the frame's far edges.
    pub fn centered_window(
        cx: i64,
        cy: i64,
        width: i64,
        height: i64,
        frame_w: u32,
        frame_h: u32,
    ) -> Self {
        let x1 = (cx - width / 2).max(0);
        let y1 = (cy - height / 2).max(0);
        let x2 = (x1 + width).min(frame_w as i64);
        let y2 = (y1 + height).min(frame_h as i64);
        Self::new(x1, y1, (x2 - x1).max(0) as u32, (y2 - y1).max(0) as u32)
    }
}

impl std::fmt::Display for PixelRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_within() {
        assert!(PixelRect::new(0, 0, 10, 10).fits_within(10, 10));
        assert!(PixelRect::new(2, 3, 8, 7).fits_within(10, 10));
        assert!(!PixelRect::new(3, 3, 8, 7).fits_within(10, 10));
        assert!(!PixelRect::new(-1, 0, 2, 2).fits_within(10, 10));
    }

    #[test]
    fn test_centered_window_clamps() {
        let centered = PixelRect::centered_window(50, 50, 20, 10, 100, 100);
        assert_eq!(centered, PixelRect::new(40, 45, 20, 10));

        let corner = PixelRect::centered_window(0, 0, 20, 10, 100, 100);
        assert_eq!(corner, PixelRect::new(0, 0, 20, 10));

        let far = PixelRect::centered_window(99, 99, 20, 10, 100, 100);
        assert_eq!(far, PixelRect::new(89, 94, 11, 6));

        let outside = PixelRect::centered_window(500, 500, 20, 10, 100, 100);
        assert!(outside.is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(PixelRect::new(4, 5, 6, 7).to_string(), "6x7+4+5");
    }
}
