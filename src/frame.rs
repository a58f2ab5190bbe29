//! Extended frame: the chain-wide staging canvas for rendering and
//! scrolling.
//!
//! The extended frame covers the visible surface of the whole chain plus a
//! margin on every side, so content can be drawn or shifted partially (or
//! entirely) off screen before it is clipped into the per-module shadow
//! RAMs. Two bitplanes — red and green — are kept bit-packed row-major:
//! one byte covers 8 horizontal pixels, bit `x % 8` of byte `x / 8` within
//! the row.
//!
//! Buffer sizes are const parameters computed with the helpers in the crate
//! root ([`compute_extended_width`](crate::compute_extended_width),
//! [`compute_extended_height`](crate::compute_extended_height),
//! [`compute_plane_bytes`](crate::compute_plane_bytes)), keeping the whole
//! canvas a fixed-size owned value with no allocation to fail.

use crate::{Color, MODULE_SIZE};

/// Dual-plane bit-packed canvas sized `EXT_W` x `EXT_H` pixels.
///
/// `PLANE_BYTES` must equal
/// [`compute_plane_bytes(EXT_W, EXT_H)`](crate::compute_plane_bytes);
/// [`ExtendedFrame::new`] debug-asserts the relationship.
///
/// # Example
/// ```rust
/// use tm1640_chain::frame::ExtendedFrame;
/// use tm1640_chain::{compute_plane_bytes, Color};
///
/// const EXT_W: usize = 56;
/// const EXT_H: usize = 24;
/// const PLANE_BYTES: usize = compute_plane_bytes(EXT_W, EXT_H);
///
/// let mut frame = ExtendedFrame::<EXT_W, EXT_H, PLANE_BYTES>::new();
/// frame.set_pixel(10, 10, Color::Orange);
/// assert_eq!(frame.pixel(10, 10), Color::Orange);
/// ```
pub struct ExtendedFrame<const EXT_W: usize, const EXT_H: usize, const PLANE_BYTES: usize> {
    red: [u8; PLANE_BYTES],
    green: [u8; PLANE_BYTES],
}

impl<const EXT_W: usize, const EXT_H: usize, const PLANE_BYTES: usize> Default
    for ExtendedFrame<EXT_W, EXT_H, PLANE_BYTES>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const EXT_W: usize, const EXT_H: usize, const PLANE_BYTES: usize>
    ExtendedFrame<EXT_W, EXT_H, PLANE_BYTES>
{
    const BYTES_PER_ROW: usize = (EXT_W + 7) / 8;

    /// Create a cleared frame.
    #[must_use]
    pub fn new() -> Self {
        debug_assert!(PLANE_BYTES == crate::compute_plane_bytes(EXT_W, EXT_H));
        Self {
            red: [0; PLANE_BYTES],
            green: [0; PLANE_BYTES],
        }
    }

    /// Extended width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        EXT_W
    }

    /// Extended height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        EXT_H
    }

    /// Zero both planes.
    pub fn clear(&mut self) {
        self.red = [0; PLANE_BYTES];
        self.green = [0; PLANE_BYTES];
    }

    /// Set a pixel in extended coordinates. Writes outside the extended
    /// bounds (negatives included) are silently dropped — off-canvas draws
    /// are routine during scrolling, not errors.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= EXT_W || y >= EXT_H {
            return;
        }
        let index = y * Self::BYTES_PER_ROW + x / 8;
        let mask = 1u8 << (x % 8);
        if color.has_red() {
            self.red[index] |= mask;
        } else {
            self.red[index] &= !mask;
        }
        if color.has_green() {
            self.green[index] |= mask;
        } else {
            self.green[index] &= !mask;
        }
    }

    /// Read a pixel in extended coordinates; out-of-bounds reads are `Off`.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        if x < 0 || y < 0 {
            return Color::Off;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= EXT_W || y >= EXT_H {
            return Color::Off;
        }
        let index = y * Self::BYTES_PER_ROW + x / 8;
        let mask = 1u8 << (x % 8);
        Color::from_planes(self.red[index] & mask != 0, self.green[index] & mask != 0)
    }

    /// Shift the whole canvas by `(dx, dy)`: pixel `(x, y)` takes the value
    /// previously at `(x - dx, y - dy)`, and positions sourcing from outside
    /// the bounds become `Off`.
    ///
    /// Reads come from a snapshot of both planes so overlapping moves cannot
    /// corrupt themselves.
    pub fn shift(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        let red_snapshot = self.red;
        let green_snapshot = self.green;
        for y in 0..EXT_H as i32 {
            for x in 0..EXT_W as i32 {
                let (sx, sy) = (x - dx, y - dy);
                let color = if sx < 0 || sy < 0 || sx >= EXT_W as i32 || sy >= EXT_H as i32 {
                    Color::Off
                } else {
                    let index = sy as usize * Self::BYTES_PER_ROW + sx as usize / 8;
                    let mask = 1u8 << (sx as usize % 8);
                    Color::from_planes(
                        red_snapshot[index] & mask != 0,
                        green_snapshot[index] & mask != 0,
                    )
                };
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Extract the 8x8 block with top-left corner `(x0, y0)` from both
    /// planes, one byte per row with bit `i` holding pixel `x0 + i`.
    ///
    /// Used when flattening the frame into a module's shadow RAM. Rows are
    /// assembled from at most two plane bytes each rather than 64 pixel
    /// reads.
    #[must_use]
    pub fn window(&self, x0: usize, y0: usize) -> ([u8; MODULE_SIZE], [u8; MODULE_SIZE]) {
        let mut red = [0u8; MODULE_SIZE];
        let mut green = [0u8; MODULE_SIZE];
        for row in 0..MODULE_SIZE {
            let y = y0 + row;
            if y >= EXT_H {
                break;
            }
            red[row] = Self::read_row_byte(&self.red, x0, y);
            green[row] = Self::read_row_byte(&self.green, x0, y);
        }
        (red, green)
    }

    // Read 8 horizontally consecutive bits starting at x0 on row y,
    // stitching two adjacent plane bytes when x0 is not byte aligned.
    fn read_row_byte(plane: &[u8; PLANE_BYTES], x0: usize, y: usize) -> u8 {
        if x0 >= EXT_W {
            return 0;
        }
        let row_base = y * Self::BYTES_PER_ROW;
        let index = row_base + x0 / 8;
        let offset = x0 % 8;
        let mut byte = plane[index] >> offset;
        if offset > 0 && index + 1 < row_base + Self::BYTES_PER_ROW {
            byte |= plane[index + 1] << (8 - offset);
        }
        // mask off columns past the right edge
        if x0 + MODULE_SIZE > EXT_W {
            byte &= (1u8 << (EXT_W - x0)) - 1;
        }
        byte
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    const EXT_W: usize = 56;
    const EXT_H: usize = 24;
    const PLANE_BYTES: usize = crate::compute_plane_bytes(EXT_W, EXT_H);

    type TestFrame = ExtendedFrame<EXT_W, EXT_H, PLANE_BYTES>;

    #[test]
    fn test_new_frame_is_clear() {
        let frame = TestFrame::new();
        for y in 0..EXT_H as i32 {
            for x in 0..EXT_W as i32 {
                assert_eq!(frame.pixel(x, y), Color::Off);
            }
        }
    }

    #[test]
    fn test_set_and_read_pixel_all_colors() {
        let mut frame = TestFrame::new();
        for (i, color) in [Color::Red, Color::Green, Color::Orange, Color::Off]
            .into_iter()
            .enumerate()
        {
            let x = i as i32 * 3;
            frame.set_pixel(x, 5, color);
            assert_eq!(frame.pixel(x, 5), color);
        }
    }

    #[test]
    fn test_set_pixel_overwrites_previous_color() {
        let mut frame = TestFrame::new();
        frame.set_pixel(4, 4, Color::Orange);
        frame.set_pixel(4, 4, Color::Red);
        assert_eq!(frame.pixel(4, 4), Color::Red);
    }

    #[test]
    fn test_out_of_bounds_writes_are_silently_dropped() {
        let mut frame = TestFrame::new();
        frame.set_pixel(-1, 0, Color::Red);
        frame.set_pixel(0, -1, Color::Red);
        frame.set_pixel(EXT_W as i32, 0, Color::Red);
        frame.set_pixel(0, EXT_H as i32, Color::Red);
        for y in 0..EXT_H as i32 {
            for x in 0..EXT_W as i32 {
                assert_eq!(frame.pixel(x, y), Color::Off);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_reads_are_off() {
        let frame = TestFrame::new();
        assert_eq!(frame.pixel(-1, -1), Color::Off);
        assert_eq!(frame.pixel(EXT_W as i32, 0), Color::Off);
    }

    #[test]
    fn test_clear() {
        let mut frame = TestFrame::new();
        frame.set_pixel(1, 1, Color::Orange);
        frame.clear();
        assert_eq!(frame.pixel(1, 1), Color::Off);
    }

    #[test]
    fn test_shift_zero_is_identity() {
        let mut frame = TestFrame::new();
        frame.set_pixel(3, 7, Color::Red);
        frame.set_pixel(20, 2, Color::Green);
        frame.shift(0, 0);
        assert_eq!(frame.pixel(3, 7), Color::Red);
        assert_eq!(frame.pixel(20, 2), Color::Green);
    }

    #[test]
    fn test_shift_moves_content() {
        let mut frame = TestFrame::new();
        frame.set_pixel(10, 10, Color::Orange);
        frame.shift(3, -2);
        assert_eq!(frame.pixel(13, 8), Color::Orange);
        assert_eq!(frame.pixel(10, 10), Color::Off);
    }

    #[test]
    fn test_shift_left_one_clears_vacated_right_edge() {
        let mut frame = TestFrame::new();
        for y in 0..EXT_H as i32 {
            frame.set_pixel(EXT_W as i32 - 1, y, Color::Red);
        }
        frame.shift(-1, 0);
        for y in 0..EXT_H as i32 {
            assert_eq!(frame.pixel(EXT_W as i32 - 1, y), Color::Off);
            assert_eq!(frame.pixel(EXT_W as i32 - 2, y), Color::Red);
        }
    }

    #[test]
    fn test_shift_does_not_self_corrupt_on_overlap() {
        let mut frame = TestFrame::new();
        // a solid horizontal run; shifting right by one must not smear
        for x in 10..20 {
            frame.set_pixel(x, 5, Color::Red);
        }
        frame.shift(1, 0);
        assert_eq!(frame.pixel(10, 5), Color::Off);
        for x in 11..21 {
            assert_eq!(frame.pixel(x, 5), Color::Red);
        }
        assert_eq!(frame.pixel(21, 5), Color::Off);
    }

    #[test]
    fn test_scroll_off_and_back_leaves_visible_clear() {
        // margin 8 on every side of a 40x8 visible area; content in the
        // left half of the surface is fully off-canvas after a
        // visible-width shift and must not reappear on the way back
        const MARGIN: i32 = 8;
        const VISIBLE_W: i32 = 40;
        let mut frame = TestFrame::new();
        for x in 0..16 {
            frame.set_pixel(MARGIN + x, MARGIN + 3, Color::Orange);
        }
        frame.shift(-VISIBLE_W, 0);
        frame.shift(VISIBLE_W, 0);
        for y in 0..8 {
            for x in 0..VISIBLE_W {
                assert_eq!(frame.pixel(MARGIN + x, MARGIN + y), Color::Off);
            }
        }
    }

    #[test]
    fn test_window_byte_aligned() {
        let mut frame = TestFrame::new();
        frame.set_pixel(8, 0, Color::Red);
        frame.set_pixel(15, 7, Color::Green);
        let (red, green) = frame.window(8, 0);
        assert_eq!(red[0], 0x01);
        assert_eq!(green[7], 0x80);
        assert_eq!(red[7], 0);
        assert_eq!(green[0], 0);
    }

    #[test]
    fn test_window_unaligned() {
        let mut frame = TestFrame::new();
        // bits land at window columns (x - x0)
        frame.set_pixel(13, 2, Color::Red);
        frame.set_pixel(18, 2, Color::Red);
        let (red, _) = frame.window(11, 0);
        assert_eq!(red[2], (1 << 2) | (1 << 7));
    }

    #[test]
    fn test_window_matches_pixel_reads() {
        let mut frame = TestFrame::new();
        let seed: &[(i32, i32, Color)] = &[
            (9, 9, Color::Red),
            (10, 9, Color::Green),
            (11, 12, Color::Orange),
            (16, 15, Color::Red),
            (8, 8, Color::Orange),
        ];
        for &(x, y, color) in seed {
            frame.set_pixel(x, y, color);
        }
        let (red, green) = frame.window(8, 8);
        for row in 0..MODULE_SIZE {
            for col in 0..MODULE_SIZE {
                let color = frame.pixel(8 + col as i32, 8 + row as i32);
                assert_eq!(red[row] & (1 << col) != 0, color.has_red());
                assert_eq!(green[row] & (1 << col) != 0, color.has_green());
            }
        }
    }

    #[test]
    fn test_window_clipped_at_bottom_edge_reads_off() {
        let mut frame = TestFrame::new();
        frame.set_pixel(0, EXT_H as i32 - 1, Color::Red);
        let (red, _) = frame.window(0, EXT_H - 4);
        assert_eq!(red[3], 0x01);
        assert_eq!(red[4..], [0u8; 4]);
    }

    #[test]
    fn test_dimensions() {
        let frame = TestFrame::new();
        assert_eq!(frame.width(), EXT_W);
        assert_eq!(frame.height(), EXT_H);
    }
}
