//! Driver for a single TM1640 bi-color 8x8 matrix module.
//!
//! Each module owns a 16-byte shadow RAM mirroring the chip's display RAM:
//! addresses 0..=7 are the red plane and 8..=15 the green plane, one byte
//! per row with bit `x` driving column `x`. Draw calls mutate the shadow
//! only; [`Tm1640::push`] serializes the full refresh frame over the
//! [`Transport`].
//!
//! The command bytes are modelled as bitfields over their datasheet
//! layouts. The refresh ordering — data command, address command plus the
//! 16 shadow bytes, display-control command — is load-bearing: the chip
//! latches data relative to the most recent address command, and skipping
//! the trailing display-control byte leaves the panel dark.

use bitfield::bitfield;

use crate::mapping::Rotation;
use crate::transport::Transport;
use crate::{Color, Error, MODULE_SIZE};

/// Data command base: bits 7..6 = `01`.
pub const CMD_DATA_BASE: u8 = 0x40;
/// Address command base: bits 7..6 = `11`.
pub const CMD_ADDRESS_BASE: u8 = 0xC0;
/// Display-control command base: bits 7..6 = `10`.
pub const CMD_DISPLAY_BASE: u8 = 0x80;

/// Number of shadow RAM bytes (red plane + green plane).
pub const SHADOW_BYTES: usize = 2 * MODULE_SIZE;

/// Default duty code: 14/16 PWM on the 3-bit scale.
pub const DEFAULT_DUTY: u8 = 0x07;

bitfield! {
    /// Data command byte.
    ///
    /// The bit layout is as follows:
    /// - Bits 7-6: Command selector (`01`)
    /// - Bit 3: Test mode
    /// - Bit 2: Fixed addressing (cleared = address auto-increment)
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    struct DataCommand(u8);
    impl Debug;
    pub test_mode, set_test_mode: 3;
    pub fixed_address, set_fixed_address: 2;
}

impl DataCommand {
    pub const fn new() -> Self {
        Self(CMD_DATA_BASE)
    }
}

bitfield! {
    /// Address command byte.
    ///
    /// The bit layout is as follows:
    /// - Bits 7-6: Command selector (`11`)
    /// - Bits 3-0: Display RAM address (0..=15)
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    struct AddressCommand(u8);
    impl Debug;
    pub addr, set_addr: 3, 0;
}

impl AddressCommand {
    pub const fn new() -> Self {
        Self(CMD_ADDRESS_BASE)
    }
}

bitfield! {
    /// Display-control command byte, 3-bit duty layout.
    ///
    /// The bit layout is as follows:
    /// - Bits 7-6: Command selector (`10`)
    /// - Bit 3: Display on
    /// - Bits 2-0: PWM duty code (0..=7)
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    struct DisplayControl(u8);
    impl Debug;
    pub on, set_on: 3;
    pub duty, set_duty: 2, 0;
}

impl DisplayControl {
    pub const fn new() -> Self {
        Self(CMD_DISPLAY_BASE)
    }
}

bitfield! {
    /// Display-control command byte, 4-bit duty layout (wider-duty chip
    /// revisions): the duty field widens into bit 3 and the on bit moves
    /// up to bit 4.
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    struct DisplayControlWide(u8);
    impl Debug;
    pub on, set_on: 4;
    pub duty, set_duty: 3, 0;
}

impl DisplayControlWide {
    pub const fn new() -> Self {
        Self(CMD_DISPLAY_BASE)
    }
}

/// Width of the display-control duty field, which differs between chip
/// revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DutyScale {
    /// 3-bit duty field, legal codes `0..=7`.
    #[default]
    ThreeBit,
    /// 4-bit duty field, legal codes `0..=14`.
    FourBit,
}

impl DutyScale {
    /// Largest legal duty code for this scale.
    #[must_use]
    pub const fn max_duty(self) -> u8 {
        match self {
            DutyScale::ThreeBit => 7,
            DutyScale::FourBit => 14,
        }
    }

    fn display_control(self, on: bool, duty: u8) -> u8 {
        match self {
            DutyScale::ThreeBit => {
                let mut ctrl = DisplayControl::new();
                ctrl.set_on(on);
                ctrl.set_duty(duty);
                ctrl.0
            }
            DutyScale::FourBit => {
                let mut ctrl = DisplayControlWide::new();
                ctrl.set_on(on);
                ctrl.set_duty(duty);
                ctrl.0
            }
        }
    }
}

/// Shadow-RAM driver for one TM1640 module.
///
/// # Example
/// ```rust
/// use tm1640_chain::mapping::Rotation;
/// use tm1640_chain::module::Tm1640;
/// use tm1640_chain::transport::Transport;
/// use tm1640_chain::Color;
///
/// struct NoopTransport;
/// impl Transport for NoopTransport {
///     fn write_frame(&mut self, _bytes: &[u8]) {}
/// }
///
/// let mut module = Tm1640::new(NoopTransport, Rotation::Deg0);
/// module.set_pixel(3, 4, Color::Orange);
/// module.push();
/// ```
pub struct Tm1640<T> {
    transport: T,
    planes: [u8; SHADOW_BYTES],
    rotation: Rotation,
    duty_scale: DutyScale,
    duty: u8,
    display_on: bool,
    dirty: bool,
}

impl<T: Transport> Tm1640<T> {
    /// Create a module driver with the default duty (maximum brightness on
    /// the 3-bit scale) and the display enabled.
    ///
    /// The shadow RAM starts cleared and dirty, so the first push blanks
    /// whatever the chip happened to power up with.
    pub fn new(transport: T, rotation: Rotation) -> Self {
        Self {
            transport,
            planes: [0; SHADOW_BYTES],
            rotation,
            duty_scale: DutyScale::ThreeBit,
            duty: DEFAULT_DUTY,
            display_on: true,
            dirty: true,
        }
    }

    /// Create a module driver with an explicit duty scale and code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `duty` exceeds the scale's
    /// legal range.
    pub fn with_duty(
        transport: T,
        rotation: Rotation,
        duty_scale: DutyScale,
        duty: u8,
    ) -> Result<Self, Error> {
        if duty > duty_scale.max_duty() {
            return Err(Error::InvalidArgument);
        }
        Ok(Self::with_validated_duty(transport, rotation, duty_scale, duty))
    }

    // Constructor for callers that have already range-checked the duty.
    pub(crate) fn with_validated_duty(
        transport: T,
        rotation: Rotation,
        duty_scale: DutyScale,
        duty: u8,
    ) -> Self {
        let mut module = Self::new(transport, rotation);
        module.duty_scale = duty_scale;
        module.duty = duty;
        module
    }

    /// Mounting rotation of this module.
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Currently stored duty code.
    #[must_use]
    pub fn duty(&self) -> u8 {
        self.duty
    }

    /// Whether the shadow RAM or control state differs from what was last
    /// pushed to hardware.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Set one local pixel. Out-of-range coordinates are a silent no-op so
    /// hot pixel loops stay branch-free for callers.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x >= MODULE_SIZE || y >= MODULE_SIZE {
            return;
        }
        let mask = 1u8 << x;
        let mut red = self.planes[y] & !mask;
        let mut green = self.planes[MODULE_SIZE + y] & !mask;
        if color.has_red() {
            red |= mask;
        }
        if color.has_green() {
            green |= mask;
        }
        if red != self.planes[y] || green != self.planes[MODULE_SIZE + y] {
            self.planes[y] = red;
            self.planes[MODULE_SIZE + y] = green;
            self.dirty = true;
        }
    }

    /// Bulk row overwrite of one or both planes.
    ///
    /// `Color::Off` clears both planes; `Red` or `Green` overwrite only
    /// that plane, leaving the other untouched; `Orange` overwrites both
    /// with the same rows.
    ///
    /// The module is marked dirty only when the plane content actually
    /// changes, so chain syncs skip pushes to unchanged modules.
    pub fn set_rows(&mut self, rows: &[u8; MODULE_SIZE], color: Color) {
        let mut planes = self.planes;
        match color {
            Color::Off => planes = [0; SHADOW_BYTES],
            Color::Red => planes[..MODULE_SIZE].copy_from_slice(rows),
            Color::Green => planes[MODULE_SIZE..].copy_from_slice(rows),
            Color::Orange => {
                planes[..MODULE_SIZE].copy_from_slice(rows);
                planes[MODULE_SIZE..].copy_from_slice(rows);
            }
        }
        if planes != self.planes {
            self.planes = planes;
            self.dirty = true;
        }
    }

    /// Read back the shadow RAM: red rows 0..=7 followed by green rows
    /// 0..=7. For diagnostics and tests.
    #[must_use]
    pub fn read_planes(&self) -> [u8; SHADOW_BYTES] {
        self.planes
    }

    /// Set the PWM duty code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for codes outside the module's
    /// duty scale; the stored duty is left unchanged.
    pub fn set_brightness(&mut self, duty: u8) -> Result<(), Error> {
        if duty > self.duty_scale.max_duty() {
            return Err(Error::InvalidArgument);
        }
        if duty != self.duty {
            self.duty = duty;
            self.dirty = true;
        }
        Ok(())
    }

    /// Turn the display output on or off without touching the shadow RAM.
    pub fn set_display_on(&mut self, on: bool) {
        if on != self.display_on {
            self.display_on = on;
            self.dirty = true;
        }
    }

    /// Push the full shadow RAM to the chip.
    ///
    /// Serializes three framed bursts, in an order the chip requires:
    /// 1. data command selecting address auto-increment,
    /// 2. address command (base address 0) followed by all 16 shadow bytes,
    /// 3. display-control command carrying the on bit and duty code.
    pub fn push(&mut self) {
        self.transport.write_frame(&[DataCommand::new().0]);

        let mut burst = [0u8; 1 + SHADOW_BYTES];
        burst[0] = AddressCommand::new().0;
        burst[1..].copy_from_slice(&self.planes);
        self.transport.write_frame(&burst);

        self.transport
            .write_frame(&[self.duty_scale.display_control(self.display_on, self.duty)]);
        self.dirty = false;
    }
}
