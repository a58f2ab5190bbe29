//! Glyph-based text rendering into the extended frame.
//!
//! Fonts are external collaborators behind the [`GlyphSource`] capability:
//! one lookup method returning a column-major bitmap for a character. A
//! simple table font ships in [`crate::font`]; compressed or generated
//! fonts plug in by implementing the same trait, without touching the
//! renderer.

use crate::frame::ExtendedFrame;
use crate::Color;

/// One character bitmap: column-major bits for a fixed-height font cell.
///
/// `columns[i]` holds column `i`, bit `r` (LSB = top) lighting row `r`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph<'a> {
    columns: &'a [u8],
    height: u8,
}

impl<'a> Glyph<'a> {
    /// Wrap a column-major bitmap of the given cell height.
    #[must_use]
    pub const fn new(columns: &'a [u8], height: u8) -> Self {
        Self { columns, height }
    }

    /// Column bitmaps, one byte per column.
    #[must_use]
    pub const fn columns(&self) -> &'a [u8] {
        self.columns
    }

    /// Glyph width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.columns.len()
    }

    /// Font cell height in pixels.
    #[must_use]
    pub const fn height(&self) -> u8 {
        self.height
    }
}

/// Capability interface for glyph lookup.
///
/// Returning `None` for an unmapped character is not an error: the
/// renderer simply skips it and carries on with the rest of the string.
pub trait GlyphSource {
    /// Look up the bitmap for `ch`.
    fn lookup(&self, ch: char) -> Option<Glyph<'_>>;
}

/// Render `text` into the extended frame with its top-left corner at
/// `(x, y)` (extended coordinates).
///
/// Characters advance the cursor by their glyph width plus a one-pixel
/// inter-character gap; characters the font cannot map are skipped and
/// consume no width. Pixels falling outside the frame are clipped
/// silently, so text may start or end off canvas.
///
/// # Returns
///
/// Total pixel width consumed (excluding the trailing gap), which callers
/// need for centering and scroll-length math.
pub fn draw_text<F, const EXT_W: usize, const EXT_H: usize, const PLANE_BYTES: usize>(
    frame: &mut ExtendedFrame<EXT_W, EXT_H, PLANE_BYTES>,
    font: &F,
    text: &str,
    x: i32,
    y: i32,
    color: Color,
) -> i32
where
    F: GlyphSource + ?Sized,
{
    let mut cursor = x;
    let mut drawn_any = false;
    for ch in text.chars() {
        let Some(glyph) = font.lookup(ch) else {
            continue;
        };
        for (col, &bits) in glyph.columns().iter().enumerate() {
            for row in 0..glyph.height() {
                if bits & (1 << row) != 0 {
                    frame.set_pixel(cursor + col as i32, y + i32::from(row), color);
                }
            }
        }
        cursor += glyph.width() as i32 + 1;
        drawn_any = true;
    }
    if drawn_any {
        cursor - x - 1
    } else {
        0
    }
}

/// Measure the pixel width `draw_text` would consume for `text`, without
/// drawing anything.
pub fn text_width<F>(font: &F, text: &str) -> i32
where
    F: GlyphSource + ?Sized,
{
    let mut width = 0;
    for ch in text.chars() {
        if let Some(glyph) = font.lookup(ch) {
            width += glyph.width() as i32 + 1;
        }
    }
    (width - 1).max(0)
}
