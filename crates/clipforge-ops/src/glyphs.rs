//! Built-in 5x7 bitmap font.
//!
//! Each glyph is five column bytes; bit 0 is the top row. Glyphs are placed on
//! a six-column pitch so adjacent characters keep one blank column.

use clipforge_core::Frame;
use image::Rgb;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Glyph columns.
pub const GLYPH_WIDTH: u32 = 5;
/// Glyph rows.
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal pitch in cells.
pub const ADVANCE: u32 = 6;

const FIRST: char = ' ';
const LAST: char = '~';
const FALLBACK: char = '?';

#[rustfmt::skip]
const FONT: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x04, 0x08, 0x10, 0x08], // ~
];

/// Column bytes for `ch`; characters outside printable ASCII map to `?`.
pub fn glyph(ch: char) -> &'static [u8; 5] {
    let ch = if (FIRST..=LAST).contains(&ch) { ch } else { FALLBACK };
    &FONT[ch as usize - FIRST as usize]
}

/// Whether the glyph for `ch` has its pixel at `(col, row)` set.
pub fn is_set(ch: char, col: u32, row: u32) -> bool {
    col < GLYPH_WIDTH && row < GLYPH_HEIGHT && (glyph(ch)[col as usize] >> row) & 1 == 1
}

/// Draw `text` with its baseline at `y` and its left edge at `x`.
///
/// Each font pixel becomes a `cell` x `cell` square grown by `thickness - 1`
/// pixels. Anything outside the frame is clipped.
pub fn draw_text(
    frame: &mut Frame,
    text: &str,
    x: i64,
    y: i64,
    cell: u32,
    thickness: u32,
    color: Rgb<u8>,
) {
    if cell == 0 {
        return;
    }
    let cell = i64::from(cell);
    let grow = i64::from(thickness.saturating_sub(1));
    let lead = grow / 2;
    let side = cell + grow;
    let advance = i64::from(ADVANCE).saturating_mul(cell);
    let top = y.saturating_sub(i64::from(GLYPH_HEIGHT) * cell);
    let (fw, fh) = (i64::from(frame.width()), i64::from(frame.height()));

    for (i, ch) in text.chars().enumerate() {
        let left = x.saturating_add((i as i64).saturating_mul(advance));
        if left.saturating_sub(lead) >= fw {
            break;
        }
        for col in 0..GLYPH_WIDTH {
            for row in 0..GLYPH_HEIGHT {
                if !is_set(ch, col, row) {
                    continue;
                }
                let px = left.saturating_add(i64::from(col) * cell) - lead;
                let py = top.saturating_add(i64::from(row) * cell) - lead;
                // Clip before narrowing to the rect's i32/u32 coordinates
                let (x0, y0) = (px.max(0), py.max(0));
                let x1 = px.saturating_add(side).min(fw);
                let y1 = py.saturating_add(side).min(fh);
                if x1 <= x0 || y1 <= y0 {
                    continue;
                }
                let rect =
                    Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32);
                draw_filled_rect_mut(frame, rect, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_core::frame::solid;

    #[test]
    fn test_fallback_glyph() {
        assert_eq!(glyph('\u{e9}'), glyph('?'));
        assert_eq!(glyph('\n'), glyph('?'));
        assert_ne!(glyph('A'), glyph('?'));
    }

    #[test]
    fn test_is_set() {
        // '|' is a single full column in the middle
        assert!((0..GLYPH_HEIGHT).all(|r| is_set('|', 2, r)));
        assert!(!is_set('|', 0, 3));
        assert!(!is_set(' ', 2, 3));
        assert!(!is_set('|', 2, GLYPH_HEIGHT));
    }

    #[test]
    fn test_draw_bar_glyph() {
        let mut frame = solid(20, 30, [0, 0, 0]);
        draw_text(&mut frame, "|", 0, 21, 3, 1, Rgb([255, 0, 0]));
        // Column 2 spans x 6..9, rows 0..7 span y 0..21
        assert_eq!(frame.get_pixel(6, 0).0, [255, 0, 0]);
        assert_eq!(frame.get_pixel(8, 20).0, [255, 0, 0]);
        assert_eq!(frame.get_pixel(5, 10).0, [0, 0, 0]);
        assert_eq!(frame.get_pixel(9, 10).0, [0, 0, 0]);
        assert_eq!(frame.get_pixel(7, 21).0, [0, 0, 0]);
    }

    #[test]
    fn test_draw_clips_at_edges() {
        let mut frame = solid(4, 4, [0, 0, 0]);
        draw_text(&mut frame, "WWW", -10, 100, 3, 3, Rgb([1, 2, 3]));
        draw_text(&mut frame, "W", -2, 5, 2, 2, Rgb([1, 2, 3]));
        assert_eq!(frame.dimensions(), (4, 4));
    }
}
