//! Chain orchestrator: one logical drawing surface over N TM1640 modules.
//!
//! [`MatrixChain`] owns the per-module drivers, the layout, the extended
//! frame and the scroll engine, and keeps them consistent: draws land in
//! the extended frame (or directly in a module's shadow RAM), `sync`
//! clips the frame into each module's shadow and pushes only the modules
//! whose content actually changed, and the scroll entry points move the
//! frame under the visible window between syncs.
//!
//! Two drawing paths exist side by side. The frame path (`draw_text`,
//! [`DrawTarget`], [`MatrixChain::frame_mut`]) composes in extended
//! coordinates and survives scrolling; the direct path ([`draw_pixel`],
//! [`draw_bitmap`]) writes straight into module shadow RAM for latency
//! and is overwritten by the next `sync`.
//!
//! [`draw_pixel`]: MatrixChain::draw_pixel
//! [`draw_bitmap`]: MatrixChain::draw_bitmap

use core::convert::Infallible;

use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Size};
use embedded_graphics::Pixel;
use embedded_hal::delay::DelayNs;

use crate::frame::ExtendedFrame;
use crate::mapping::{Layout, Orientation, Rotation};
use crate::module::{DutyScale, Tm1640, DEFAULT_DUTY};
use crate::scroll::{Direction, ScrollAnimation, Tick};
use crate::text::{self, GlyphSource};
use crate::transport::Transport;
use crate::{Color, Error, MODULE_SIZE};

/// Static configuration of a chain of `N` modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChainConfig<const N: usize> {
    /// Tiling orientation of the chain.
    pub orientation: Orientation,
    /// Modules per grid row (ignored for vertical chains).
    pub layout_cols: usize,
    /// Mounting rotation of each module, by chain index.
    pub rotations: [Rotation; N],
    /// Duty-field width of the chips on this chain.
    pub duty_scale: DutyScale,
    /// Initial PWM duty code for every module.
    pub duty: u8,
    /// Extended-frame margin in pixels on each side of the visible
    /// surface. Should be at least the widest glyph that will be
    /// staged off screen; one module width is a comfortable default.
    pub margin: usize,
}

impl<const N: usize> ChainConfig<N> {
    /// A single row of `N` modules, unrotated, full brightness, with a
    /// one-module margin.
    #[must_use]
    pub const fn horizontal() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            layout_cols: N,
            rotations: [Rotation::Deg0; N],
            duty_scale: DutyScale::ThreeBit,
            duty: DEFAULT_DUTY,
            margin: MODULE_SIZE,
        }
    }

    /// A single column of `N` modules, unrotated, full brightness, with a
    /// one-module margin.
    #[must_use]
    pub const fn vertical() -> Self {
        Self {
            orientation: Orientation::Vertical,
            layout_cols: 1,
            rotations: [Rotation::Deg0; N],
            duty_scale: DutyScale::ThreeBit,
            duty: DEFAULT_DUTY,
            margin: MODULE_SIZE,
        }
    }
}

/// A chain of `N` TM1640 modules composed into one drawing surface.
///
/// The extended-frame const parameters must match the configuration;
/// compute them with the crate-root helpers and [`MatrixChain::new`]
/// validates the relationship at construction.
///
/// # Example
/// ```rust
/// use tm1640_chain::chain::{ChainConfig, MatrixChain};
/// use tm1640_chain::font::Font5x7;
/// use tm1640_chain::transport::Transport;
/// use tm1640_chain::{
///     compute_extended_height, compute_extended_width, compute_plane_bytes, Color,
/// };
///
/// struct NoopTransport;
/// impl Transport for NoopTransport {
///     fn write_frame(&mut self, _bytes: &[u8]) {}
/// }
///
/// const N: usize = 5;
/// const CONFIG: ChainConfig<N> = ChainConfig::horizontal();
/// const EXT_W: usize =
///     compute_extended_width(CONFIG.orientation, CONFIG.layout_cols, CONFIG.margin);
/// const EXT_H: usize =
///     compute_extended_height(CONFIG.orientation, CONFIG.layout_cols, N, CONFIG.margin);
/// const PLANE_BYTES: usize = compute_plane_bytes(EXT_W, EXT_H);
///
/// let transports = [
///     NoopTransport,
///     NoopTransport,
///     NoopTransport,
///     NoopTransport,
///     NoopTransport,
/// ];
/// let mut chain =
///     MatrixChain::<_, N, EXT_W, EXT_H, PLANE_BYTES>::new(transports, CONFIG).unwrap();
/// chain.draw_text(&Font5x7, "Hi", 0, 0, Color::Red);
/// chain.sync();
/// ```
pub struct MatrixChain<
    T,
    const N: usize,
    const EXT_W: usize,
    const EXT_H: usize,
    const PLANE_BYTES: usize,
> {
    modules: [Tm1640<T>; N],
    rotations: [Rotation; N],
    layout: Layout,
    frame: ExtendedFrame<EXT_W, EXT_H, PLANE_BYTES>,
    scroll: ScrollAnimation,
    margin: usize,
}

impl<T, const N: usize, const EXT_W: usize, const EXT_H: usize, const PLANE_BYTES: usize>
    MatrixChain<T, N, EXT_W, EXT_H, PLANE_BYTES>
where
    T: Transport,
{
    /// Assemble a chain from one transport per module.
    ///
    /// Transports are taken in chain order: index 0 is the top-left module
    /// of a horizontal layout (the topmost of a vertical one).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when the layout is degenerate,
    /// the duty code exceeds the configured scale, or the extended-frame
    /// const parameters disagree with the configuration.
    pub fn new(transports: [T; N], config: ChainConfig<N>) -> Result<Self, Error> {
        let layout = Layout::new(config.orientation, config.layout_cols, N)
            .ok_or(Error::InvalidArgument)?;
        if config.duty > config.duty_scale.max_duty() {
            return Err(Error::InvalidArgument);
        }
        if EXT_W != crate::compute_extended_width(config.orientation, config.layout_cols, config.margin)
            || EXT_H
                != crate::compute_extended_height(
                    config.orientation,
                    config.layout_cols,
                    N,
                    config.margin,
                )
            || PLANE_BYTES != crate::compute_plane_bytes(EXT_W, EXT_H)
        {
            return Err(Error::InvalidArgument);
        }
        let mut index = 0;
        let modules = transports.map(|transport| {
            let module = Tm1640::with_validated_duty(
                transport,
                config.rotations[index],
                config.duty_scale,
                config.duty,
            );
            index += 1;
            module
        });
        Ok(Self {
            modules,
            rotations: config.rotations,
            layout,
            frame: ExtendedFrame::new(),
            scroll: ScrollAnimation::new(),
            margin: config.margin,
        })
    }

    /// Visible surface width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.layout.width()
    }

    /// Visible surface height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.layout.height()
    }

    /// Extended-frame margin in pixels.
    #[must_use]
    pub const fn margin(&self) -> usize {
        self.margin
    }

    /// Borrow one module driver, for diagnostics.
    #[must_use]
    pub fn module(&self, index: usize) -> Option<&Tm1640<T>> {
        self.modules.get(index)
    }

    /// Borrow the extended frame.
    #[must_use]
    pub fn frame(&self) -> &ExtendedFrame<EXT_W, EXT_H, PLANE_BYTES> {
        &self.frame
    }

    /// Borrow the extended frame mutably, for composition the drawing
    /// helpers do not cover. Remember that extended coordinates include
    /// the margin: visible pixel `(0, 0)` is at `(margin, margin)`.
    pub fn frame_mut(&mut self) -> &mut ExtendedFrame<EXT_W, EXT_H, PLANE_BYTES> {
        &mut self.frame
    }

    /// Write one pixel straight into the owning module's shadow RAM,
    /// applying the layout and the module's rotation. Out-of-bounds
    /// coordinates are silently dropped.
    ///
    /// This is the low-latency path; it bypasses the extended frame, so
    /// the next [`sync`](MatrixChain::sync) overwrites it with the frame
    /// content.
    pub fn draw_pixel(&mut self, gx: i32, gy: i32, color: Color) {
        let Some((index, x, y)) = self.layout.map(&self.rotations, gx, gy) else {
            return;
        };
        self.modules[index].set_pixel(x as usize, y as usize, color);
    }

    /// Overwrite one module's plane(s) with an 8-row bitmap (one byte per
    /// row, bit `x` = column `x`, given unrotated; the module's mounting
    /// rotation is applied here).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `index` is out of range or
    /// `rows` is not exactly 8 bytes.
    pub fn draw_bitmap(&mut self, index: usize, rows: &[u8], color: Color) -> Result<(), Error> {
        let rows: &[u8; MODULE_SIZE] = rows.try_into().map_err(|_| Error::InvalidArgument)?;
        let module = self.modules.get_mut(index).ok_or(Error::InvalidArgument)?;
        let rotated = module.rotation().rotate_rows(rows);
        module.set_rows(&rotated, color);
        Ok(())
    }

    /// Render text into the extended frame at visible coordinates
    /// `(x, y)`, returning the pixel width consumed. Call
    /// [`sync`](MatrixChain::sync) to bring it to the panels.
    pub fn draw_text<F>(&mut self, font: &F, text: &str, x: i32, y: i32, color: Color) -> i32
    where
        F: GlyphSource + ?Sized,
    {
        let margin = self.margin as i32;
        text::draw_text(&mut self.frame, font, text, margin + x, margin + y, color)
    }

    /// Clear the extended frame and every module's shadow RAM.
    pub fn clear(&mut self) {
        self.frame.clear();
        for module in &mut self.modules {
            module.set_rows(&[0; MODULE_SIZE], Color::Off);
        }
    }

    /// Set the PWM duty code on every module.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for codes outside the chain's
    /// duty scale; no module is changed.
    pub fn set_brightness(&mut self, duty: u8) -> Result<(), Error> {
        for module in &mut self.modules {
            module.set_brightness(duty)?;
        }
        Ok(())
    }

    /// Turn display output on or off on every module.
    pub fn set_display_on(&mut self, on: bool) {
        for module in &mut self.modules {
            module.set_display_on(on);
        }
    }

    /// Clip the extended frame into the module shadow RAMs and push the
    /// modules whose content (or control state) changed since their last
    /// push. Unchanged modules cost nothing on the wire.
    pub fn sync(&mut self) {
        self.flatten();
        for module in &mut self.modules {
            if module.is_dirty() {
                module.push();
            }
        }
    }

    /// Like [`sync`](MatrixChain::sync) but pushes every module
    /// unconditionally, re-asserting the full chain state after power
    /// glitches or externally disturbed displays.
    pub fn force_update(&mut self) {
        self.flatten();
        for module in &mut self.modules {
            module.push();
        }
    }

    // Clip the frame's visible region into each module's shadow RAM,
    // pre-rotating for the module's mounting orientation.
    fn flatten(&mut self) {
        let grid_cols = self.layout.grid_cols();
        for index in 0..N {
            let col = index % grid_cols;
            let row = index / grid_cols;
            let (red, green) = self.frame.window(
                self.margin + col * MODULE_SIZE,
                self.margin + row * MODULE_SIZE,
            );
            let rotation = self.modules[index].rotation();
            self.modules[index].set_rows(&rotation.rotate_rows(&red), Color::Red);
            self.modules[index].set_rows(&rotation.rotate_rows(&green), Color::Green);
        }
    }

    /// Begin a non-blocking scroll; see [`ScrollAnimation::start`] for the
    /// travel-distance rules. Returns `false` while a scroll is already
    /// running.
    #[allow(clippy::too_many_arguments)]
    pub fn scroll_start(
        &mut self,
        direction: Direction,
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        duration_ms: u32,
        pixels: u32,
        now_ms: u32,
    ) -> bool {
        self.scroll.start(
            direction, start_x, start_y, end_x, end_y, duration_ms, pixels, now_ms,
        )
    }

    /// Whether a non-blocking scroll is in flight.
    #[must_use]
    pub const fn scroll_is_active(&self) -> bool {
        self.scroll.is_active()
    }

    /// Advance the running scroll to `now_ms`, shifting the frame and
    /// syncing the panels as needed. The final tick of a scroll pushes
    /// every module so the landing frame is fully asserted on the wire.
    pub fn scroll_tick(&mut self, now_ms: u32) -> Tick {
        let tick = self.scroll.tick(now_ms);
        match tick {
            Tick::Idle => {}
            Tick::Shift { dx, dy } => {
                self.frame.shift(dx, dy);
                self.sync();
            }
            Tick::Finished { dx, dy } => {
                self.frame.shift(dx, dy);
                self.force_update();
            }
        }
        tick
    }

    /// Shift the frame one pixel in `direction` and sync. The discrete
    /// building block for externally paced scrolling.
    pub fn scroll_step(&mut self, direction: Direction) {
        let (dx, dy) = direction.step();
        self.frame.shift(dx, dy);
        self.sync();
    }

    /// Blocking marquee: crawl `text` right to left across the chain at
    /// visible row `y`, one pixel every `step_ms` milliseconds, until the
    /// whole message has scrolled off the left edge.
    ///
    /// Each character is staged in the right margin just past the visible
    /// edge and stepped in, so the margin should be at least the widest
    /// glyph in the font.
    pub fn scroll_text<F, D>(
        &mut self,
        font: &F,
        text: &str,
        y: i32,
        color: Color,
        delay: &mut D,
        step_ms: u32,
    ) where
        F: GlyphSource + ?Sized,
        D: DelayNs,
    {
        let stage_x = (self.margin + self.layout.width()) as i32;
        let stage_y = self.margin as i32 + y;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let Some(glyph) = font.lookup(ch) else {
                continue;
            };
            text::draw_text(
                &mut self.frame,
                font,
                ch.encode_utf8(&mut buf),
                stage_x,
                stage_y,
                color,
            );
            for _ in 0..=glyph.width() {
                self.scroll_step(Direction::Left);
                delay.delay_ms(step_ms);
            }
        }
        // let the tail of the message crawl off the left edge
        for _ in 0..self.layout.width() {
            self.scroll_step(Direction::Left);
            delay.delay_ms(step_ms);
        }
    }
}

impl<T, const N: usize, const EXT_W: usize, const EXT_H: usize, const PLANE_BYTES: usize>
    OriginDimensions for MatrixChain<T, N, EXT_W, EXT_H, PLANE_BYTES>
where
    T: Transport,
{
    fn size(&self) -> Size {
        Size::new(self.layout.width() as u32, self.layout.height() as u32)
    }
}

impl<T, const N: usize, const EXT_W: usize, const EXT_H: usize, const PLANE_BYTES: usize>
    DrawTarget for MatrixChain<T, N, EXT_W, EXT_H, PLANE_BYTES>
where
    T: Transport,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let margin = self.margin as i32;
        for Pixel(point, color) in pixels {
            self.frame.set_pixel(margin + point.x, margin + point.y, color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    use super::*;
    use crate::font::Font5x7;

    #[derive(Default)]
    struct RecordingTransport {
        frames: std::rc::Rc<core::cell::RefCell<Vec<Vec<u8>>>>,
    }

    impl Transport for RecordingTransport {
        fn write_frame(&mut self, bytes: &[u8]) {
            self.frames.borrow_mut().push(bytes.to_vec());
        }
    }

    const N: usize = 5;
    const CONFIG: ChainConfig<N> = ChainConfig::horizontal();
    const EXT_W: usize =
        crate::compute_extended_width(CONFIG.orientation, CONFIG.layout_cols, CONFIG.margin);
    const EXT_H: usize =
        crate::compute_extended_height(CONFIG.orientation, CONFIG.layout_cols, N, CONFIG.margin);
    const PLANE_BYTES: usize = crate::compute_plane_bytes(EXT_W, EXT_H);

    type TestChain = MatrixChain<RecordingTransport, N, EXT_W, EXT_H, PLANE_BYTES>;

    // Row bitmaps of the built-in 5x7 'A', bit x = column x.
    const LETTER_A_ROWS: [u8; 8] = [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x00];

    fn transports() -> [RecordingTransport; N] {
        core::array::from_fn(|_| RecordingTransport::default())
    }

    fn new_chain(config: ChainConfig<N>) -> TestChain {
        MatrixChain::new(transports(), config).unwrap()
    }

    fn frame_count(chain: &TestChain, index: usize) -> usize {
        chain
            .module(index)
            .unwrap()
            .transport()
            .frames
            .borrow()
            .len()
    }

    fn red_rows(chain: &TestChain, index: usize) -> [u8; 8] {
        let planes = chain.module(index).unwrap().read_planes();
        planes[..8].try_into().unwrap()
    }

    fn green_rows(chain: &TestChain, index: usize) -> [u8; 8] {
        let planes = chain.module(index).unwrap().read_planes();
        planes[8..].try_into().unwrap()
    }

    #[test]
    fn test_new_rejects_mismatched_duty() {
        let mut config = CONFIG;
        config.duty = 8;
        assert!(MatrixChain::<_, N, EXT_W, EXT_H, PLANE_BYTES>::new(transports(), config).is_err());
    }

    #[test]
    fn test_new_rejects_degenerate_layout() {
        let mut config = CONFIG;
        config.layout_cols = N + 1;
        assert!(MatrixChain::<_, N, EXT_W, EXT_H, PLANE_BYTES>::new(transports(), config).is_err());
    }

    #[test]
    fn test_new_rejects_mismatched_frame_size() {
        // margin changed without recomputing the const parameters
        let mut config = CONFIG;
        config.margin = 4;
        assert!(MatrixChain::<_, N, EXT_W, EXT_H, PLANE_BYTES>::new(transports(), config).is_err());
    }

    #[test]
    fn test_dimensions() {
        let chain = new_chain(CONFIG);
        assert_eq!(chain.width(), 40);
        assert_eq!(chain.height(), 8);
        assert_eq!(chain.margin(), 8);
        assert_eq!(chain.size(), Size::new(40, 8));
    }

    #[test]
    fn test_draw_pixel_routes_to_owning_module() {
        let mut chain = new_chain(CONFIG);
        chain.draw_pixel(9, 2, Color::Red);
        assert_eq!(red_rows(&chain, 1)[2], 0x02);
        assert_eq!(red_rows(&chain, 0), [0; 8]);
        // off the surface: dropped
        chain.draw_pixel(40, 0, Color::Red);
        chain.draw_pixel(-1, 0, Color::Red);
        chain.draw_pixel(0, 8, Color::Red);
    }

    #[test]
    fn test_draw_pixel_applies_module_rotation() {
        let mut config = CONFIG;
        config.rotations[1] = Rotation::Deg90;
        let mut chain = new_chain(config);
        // global (8, 0) is module 1 local (0, 0), rotated to (0, 7)
        chain.draw_pixel(8, 0, Color::Green);
        assert_eq!(green_rows(&chain, 1)[7], 0x01);
    }

    #[test]
    fn test_draw_bitmap_validates_and_rotates() {
        let mut config = CONFIG;
        config.rotations[2] = Rotation::Deg180;
        let mut chain = new_chain(config);

        assert_eq!(
            chain.draw_bitmap(N, &[0; 8], Color::Red),
            Err(Error::InvalidArgument)
        );
        assert_eq!(
            chain.draw_bitmap(0, &[0; 7], Color::Red),
            Err(Error::InvalidArgument)
        );

        let mut rows = [0u8; 8];
        rows[0] = 0x01; // pixel (0, 0)
        chain.draw_bitmap(2, &rows, Color::Red).unwrap();
        // 180 degrees puts it at (7, 7)
        assert_eq!(red_rows(&chain, 2)[7], 0x80);
    }

    #[test]
    fn test_draw_text_then_sync_fills_first_module_only() {
        let mut chain = new_chain(CONFIG);
        let width = chain.draw_text(&Font5x7, "A", 0, 0, Color::Red);
        assert_eq!(width, 5);
        chain.sync();

        assert_eq!(red_rows(&chain, 0), LETTER_A_ROWS);
        assert_eq!(green_rows(&chain, 0), [0; 8]);
        for index in 1..N {
            assert_eq!(red_rows(&chain, index), [0; 8]);
        }
    }

    #[test]
    fn test_sync_skips_clean_modules() {
        let mut chain = new_chain(CONFIG);
        chain.draw_text(&Font5x7, "A", 0, 0, Color::Red);
        // every module starts dirty, so the first sync pushes all of them
        chain.sync();
        let after_first: Vec<_> = (0..N).map(|i| frame_count(&chain, i)).collect();
        assert!(after_first.iter().all(|&count| count == 3));

        // nothing changed: no module may see more traffic
        chain.sync();
        for (index, &count) in after_first.iter().enumerate() {
            assert_eq!(frame_count(&chain, index), count);
        }
    }

    #[test]
    fn test_force_update_pushes_everything() {
        let mut chain = new_chain(CONFIG);
        chain.sync();
        chain.force_update();
        for index in 0..N {
            assert_eq!(frame_count(&chain, index), 6);
        }
    }

    #[test]
    fn test_sync_applies_rotation_consistently_with_draw_pixel() {
        let mut config = CONFIG;
        config.rotations[0] = Rotation::Deg90;
        let mut chain = new_chain(config);

        chain.draw_pixel(3, 1, Color::Red);
        let direct = red_rows(&chain, 0);

        chain.clear();
        chain.frame_mut().set_pixel(8 + 3, 8 + 1, Color::Red);
        chain.sync();
        assert_eq!(red_rows(&chain, 0), direct);
    }

    #[test]
    fn test_clear_blanks_frame_and_modules() {
        let mut chain = new_chain(CONFIG);
        chain.draw_text(&Font5x7, "A", 0, 0, Color::Orange);
        chain.draw_pixel(20, 4, Color::Red);
        chain.clear();
        chain.sync();
        for index in 0..N {
            assert_eq!(chain.module(index).unwrap().read_planes(), [0; 16]);
        }
    }

    #[test]
    fn test_set_brightness_broadcasts() {
        let mut chain = new_chain(CONFIG);
        assert_eq!(chain.set_brightness(9), Err(Error::InvalidArgument));
        chain.set_brightness(2).unwrap();
        chain.sync();
        for index in 0..N {
            let frames = chain.module(index).unwrap().transport().frames.borrow().clone();
            assert_eq!(frames[2], std::vec![0x88 | 0x02]);
        }
    }

    #[test]
    fn test_set_display_on_broadcasts() {
        let mut chain = new_chain(CONFIG);
        chain.set_display_on(false);
        chain.sync();
        for index in 0..N {
            let frames = chain.module(index).unwrap().transport().frames.borrow().clone();
            assert_eq!(frames[2], std::vec![0x80 | 0x07]);
        }
    }

    #[test]
    fn test_scroll_step_carries_content_across_modules() {
        let mut chain = new_chain(CONFIG);
        // letter on module 1; eight left steps move it onto module 0
        chain.draw_text(&Font5x7, "A", 8, 0, Color::Red);
        chain.sync();
        assert_eq!(red_rows(&chain, 1), LETTER_A_ROWS);

        for _ in 0..8 {
            chain.scroll_step(Direction::Left);
        }
        assert_eq!(red_rows(&chain, 0), LETTER_A_ROWS);
        assert_eq!(red_rows(&chain, 1), [0; 8]);
    }

    #[test]
    fn test_scroll_tick_lands_on_exact_travel() {
        let mut chain = new_chain(CONFIG);
        chain.frame_mut().set_pixel(8 + 10, 8 + 3, Color::Red);
        assert!(chain.scroll_start(Direction::Left, 0, 0, 0, 0, 100, 8, 0));
        assert!(chain.scroll_is_active());

        let mut now = 0;
        while chain.scroll_is_active() {
            now += 20;
            chain.scroll_tick(now);
        }
        // pixel moved from visible x 10 to x 2
        assert_eq!(chain.frame().pixel(8 + 2, 8 + 3), Color::Red);
        assert_eq!(red_rows(&chain, 0)[3], 0x04);
    }

    #[test]
    fn test_scroll_tick_idle_without_animation() {
        let mut chain = new_chain(CONFIG);
        assert_eq!(chain.scroll_tick(12345), Tick::Idle);
    }

    #[test]
    fn test_scroll_start_rejected_while_active() {
        let mut chain = new_chain(CONFIG);
        assert!(chain.scroll_start(Direction::Left, 0, 0, 0, 0, 1000, 8, 0));
        assert!(!chain.scroll_start(Direction::Right, 0, 0, 0, 0, 10, 4, 1));
    }

    #[test]
    fn test_scroll_text_marquee_exits_clean() {
        struct NoDelay;
        impl DelayNs for NoDelay {
            fn delay_ns(&mut self, _ns: u32) {}
        }

        let mut chain = new_chain(CONFIG);
        chain.scroll_text(&Font5x7, "AB", 0, Color::Red, &mut NoDelay, 0);
        // the whole message crawled off the left edge
        for index in 0..N {
            assert_eq!(chain.module(index).unwrap().read_planes(), [0; 16]);
        }
        assert!(frame_count(&chain, 0) > 0);
    }

    #[test]
    fn test_draw_target_renders_into_visible_area() {
        let mut chain = new_chain(CONFIG);
        Rectangle::new(Point::new(0, 0), Size::new(2, 2))
            .into_styled(PrimitiveStyle::with_fill(Color::Orange))
            .draw(&mut chain)
            .unwrap();
        chain.sync();
        assert_eq!(red_rows(&chain, 0)[0], 0x03);
        assert_eq!(red_rows(&chain, 0)[1], 0x03);
        assert_eq!(green_rows(&chain, 0)[0], 0x03);
    }

    #[test]
    fn test_vertical_chain_stacks_modules() {
        const VN: usize = 3;
        const VCONFIG: ChainConfig<VN> = ChainConfig::vertical();
        const VEXT_W: usize = crate::compute_extended_width(
            VCONFIG.orientation,
            VCONFIG.layout_cols,
            VCONFIG.margin,
        );
        const VEXT_H: usize = crate::compute_extended_height(
            VCONFIG.orientation,
            VCONFIG.layout_cols,
            VN,
            VCONFIG.margin,
        );
        const VPLANE_BYTES: usize = crate::compute_plane_bytes(VEXT_W, VEXT_H);

        let transports: [RecordingTransport; VN] =
            core::array::from_fn(|_| RecordingTransport::default());
        let mut chain =
            MatrixChain::<_, VN, VEXT_W, VEXT_H, VPLANE_BYTES>::new(transports, VCONFIG).unwrap();
        assert_eq!(chain.width(), 8);
        assert_eq!(chain.height(), 24);

        chain.draw_pixel(0, 16, Color::Red);
        let planes = chain.module(2).unwrap().read_planes();
        assert_eq!(planes[0], 0x01);
    }
}
