//! Framebuffer, compositor and scroll engine for chains of TM1640 bi-color
//! 8x8 LED dot-matrix modules.
//!
//! ## How TM1640 matrix modules work
//!
//! The TM1640 is a 16-digit LED driver talked to over a two-wire serial
//! interface (SCLK + DIN) with no acknowledge. On the common bi-color 8x8
//! matrix boards the chip's 16 display-RAM bytes are wired as two 8-byte
//! planes: addresses 0..=7 drive the red LEDs and 8..=15 the green LEDs.
//! Lighting both planes at a pixel is perceived as orange.
//!
//! ### Signal protocol
//! - A **start condition** is DIN falling while SCLK is high; a **stop
//!   condition** is DIN rising while SCLK is high.
//! - Bytes are shifted **LSB first**, sampled on the rising SCLK edge.
//! - There is no read path and no acknowledge: correctness rests entirely on
//!   byte order and timing margins.
//!
//! ### Refresh workflow
//! 1. Send the *data command* (`0x40`) selecting address auto-increment mode.
//! 2. Send the *address command* (`0xC0`) followed by the 16 display bytes in
//!    one burst (red rows 0..=7, then green rows 0..=7).
//! 3. Send the *display-control command* (`0x88 | duty`) turning the display
//!    on with the requested PWM duty.
//!
//! Sending data before the address command, or omitting the trailing
//! display-control byte, produces visibly wrong or blank output — the driver
//! in [`module`] fixes this ordering and the tests pin it byte for byte.
//!
//! ## Chains of modules
//!
//! Each module has its own DIN line (SCLK may be shared), so a chain is just
//! N independent 8x8 devices. [`chain::MatrixChain`] composes them into one
//! logical surface: a tiling layout maps global pixels to (module, local)
//! coordinates with per-module rotation (see [`mapping`]), and an
//! [extended frame](frame::ExtendedFrame) — the visible surface plus a
//! margin on every side — stages text and scroll content so pixels can move
//! on and off screen before being clipped into each module's shadow RAM.
//!
//! The scroll engine ([`scroll`]) is a polled, non-blocking state machine
//! with smoothstep easing; a discrete one-step marquee primitive is also
//! available for classic character-by-character message crawls.
//!
//! ## Available Feature Flags
//!
//! ### `defmt` Feature
//! Implements `defmt::Format` for the public types so they can be emitted
//! with the `defmt` logging framework. No functional changes; purely adds
//! trait impls.
#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use embedded_graphics::pixelcolor::raw::RawU2;
use embedded_graphics::pixelcolor::PixelColor;

pub mod chain;
pub mod font;
pub mod frame;
pub mod mapping;
pub mod module;
pub mod scroll;
pub mod text;
pub mod transport;

use mapping::Orientation;

/// Width and height of a single module in pixels.
pub const MODULE_SIZE: usize = 8;

/// Pixel color of a bi-color (red/green) LED matrix.
///
/// `Orange` lights both the red and the green plane of the same pixel; there
/// is never a third plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    /// Both planes off.
    #[default]
    Off,
    /// Red plane only.
    Red,
    /// Green plane only.
    Green,
    /// Red and green planes together.
    Orange,
}

impl Color {
    /// Whether this color lights the red plane.
    #[must_use]
    pub const fn has_red(self) -> bool {
        matches!(self, Color::Red | Color::Orange)
    }

    /// Whether this color lights the green plane.
    #[must_use]
    pub const fn has_green(self) -> bool {
        matches!(self, Color::Green | Color::Orange)
    }

    /// Recombine per-plane bits into a color.
    #[must_use]
    pub const fn from_planes(red: bool, green: bool) -> Self {
        match (red, green) {
            (false, false) => Color::Off,
            (true, false) => Color::Red,
            (false, true) => Color::Green,
            (true, true) => Color::Orange,
        }
    }
}

impl PixelColor for Color {
    type Raw = RawU2;
}

impl From<RawU2> for Color {
    fn from(raw: RawU2) -> Self {
        use embedded_graphics::pixelcolor::raw::RawData;
        let value = raw.into_inner();
        Color::from_planes(value & 0b01 != 0, value & 0b10 != 0)
    }
}

impl From<Color> for RawU2 {
    fn from(color: Color) -> Self {
        RawU2::new(u8::from(color.has_red()) | (u8::from(color.has_green()) << 1))
    }
}

/// Errors returned by fallible chain and module operations.
///
/// Out-of-bounds pixel writes are deliberately *not* errors — they are
/// silently dropped so that partially off-screen draws (scrolling text)
/// stay branch-free for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A parameter was outside the range the protocol or layout accepts.
    /// The rejected operation leaves all state unchanged.
    InvalidArgument,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "invalid argument"),
        }
    }
}

/// Computes the number of module columns in the tiling grid.
///
/// Horizontal-major chains tile `layout_cols` modules per row;
/// vertical-major chains walk modules top to bottom in a single column.
///
/// # Arguments
///
/// * `orientation` - Chain tiling orientation
/// * `layout_cols` - Number of layout columns configured for the chain
///
/// # Returns
///
/// Number of module columns in the grid
#[must_use]
pub const fn compute_grid_cols(orientation: Orientation, layout_cols: usize) -> usize {
    match orientation {
        Orientation::Horizontal => layout_cols,
        Orientation::Vertical => 1,
    }
}

/// Computes the number of module rows in the tiling grid (ceiling division,
/// so a chain whose module count is not an exact multiple of the column
/// count gets a final, partially populated row).
#[must_use]
pub const fn compute_grid_rows(module_count: usize, grid_cols: usize) -> usize {
    (module_count + grid_cols - 1) / grid_cols
}

/// Computes the extended-frame width for a chain.
///
/// The extended frame covers the visible surface plus `margin` pixels on
/// every side, used as staging space for scrolling and clipped rendering.
///
/// # Arguments
///
/// * `orientation` - Chain tiling orientation
/// * `layout_cols` - Number of layout columns configured for the chain
/// * `margin` - Margin in pixels on each side of the visible surface
///
/// # Returns
///
/// Extended-frame width in pixels
#[must_use]
pub const fn compute_extended_width(
    orientation: Orientation,
    layout_cols: usize,
    margin: usize,
) -> usize {
    compute_grid_cols(orientation, layout_cols) * MODULE_SIZE + 2 * margin
}

/// Computes the extended-frame height for a chain.
///
/// # Arguments
///
/// * `orientation` - Chain tiling orientation
/// * `layout_cols` - Number of layout columns configured for the chain
/// * `module_count` - Number of modules in the chain
/// * `margin` - Margin in pixels on each side of the visible surface
///
/// # Returns
///
/// Extended-frame height in pixels
#[must_use]
pub const fn compute_extended_height(
    orientation: Orientation,
    layout_cols: usize,
    module_count: usize,
    margin: usize,
) -> usize {
    let grid_cols = compute_grid_cols(orientation, layout_cols);
    compute_grid_rows(module_count, grid_cols) * MODULE_SIZE + 2 * margin
}

/// Computes the byte size of one extended-frame bitplane.
///
/// Planes are bit-packed row-major: each row occupies `ceil(ext_w / 8)`
/// bytes.
///
/// # Arguments
///
/// * `ext_w` - Extended-frame width in pixels
/// * `ext_h` - Extended-frame height in pixels
///
/// # Returns
///
/// Number of bytes needed for one plane of the extended frame
#[must_use]
pub const fn compute_plane_bytes(ext_w: usize, ext_h: usize) -> usize {
    ((ext_w + 7) / 8) * ext_h
}
