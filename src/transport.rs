//! Serial transport seam for the TM1640 two-wire protocol.
//!
//! The module driver in [`crate::module`] only decides *which bytes* go out
//! and in *what grouping*; everything below that — start/stop conditions,
//! clock timing, pin wiggling — lives behind the [`Transport`] trait so the
//! core never branches on chip family or pin hardware.
//!
//! [`BitBangTransport`] is the reference implementation over the
//! `embedded-hal` pin and delay capabilities. Test code substitutes a
//! recording transport to pin the exact byte sequence.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// One TM1640 serial link (the DIN line of a single module, plus the clock).
///
/// Each call to [`write_frame`](Transport::write_frame) transfers one
/// start-condition … stop-condition framed burst. The protocol carries no
/// acknowledge, so transmission is infallible by construction: there is
/// nothing the wire could report back.
pub trait Transport {
    /// Send `bytes` as a single framed burst (start condition, each byte
    /// LSB-first, stop condition).
    fn write_frame(&mut self, bytes: &[u8]);
}

/// Bit-banged [`Transport`] over two GPIO output pins.
///
/// SCLK idles high. A start condition pulls DIN low while SCLK is high, a
/// stop condition releases DIN high while SCLK is high, and data bits are
/// presented while SCLK is low and sampled by the chip on the rising edge.
/// Every edge is padded with half a clock period, derived from the clock
/// frequency given at construction.
///
/// The TM1640's maximum clock is 1 MHz with generous margins; 100-500 kHz
/// is a safe default on most boards.
///
/// # Example
/// ```rust,no_run
/// # struct Pin;
/// # impl embedded_hal::digital::ErrorType for Pin { type Error = core::convert::Infallible; }
/// # impl embedded_hal::digital::OutputPin for Pin {
/// #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # struct Delay;
/// # impl embedded_hal::delay::DelayNs for Delay {
/// #     fn delay_ns(&mut self, _ns: u32) {}
/// # }
/// use tm1640_chain::transport::{BitBangTransport, Transport};
///
/// let mut link = BitBangTransport::new(Pin, Pin, Delay, 250_000);
/// link.write_frame(&[0x40]);
/// ```
pub struct BitBangTransport<Clk, Din, D> {
    sclk: Clk,
    din: Din,
    delay: D,
    half_period_ns: u32,
}

impl<Clk, Din, D> BitBangTransport<Clk, Din, D>
where
    Clk: OutputPin,
    Din: OutputPin,
    D: DelayNs,
{
    /// Create a transport over the given pins, clocked at `clock_hz`.
    ///
    /// Both lines are driven to their idle (high) state. A `clock_hz` of
    /// zero falls back to 250 kHz rather than dividing by zero.
    pub fn new(sclk: Clk, din: Din, delay: D, clock_hz: u32) -> Self {
        let clock_hz = if clock_hz == 0 { 250_000 } else { clock_hz };
        let mut transport = Self {
            sclk,
            din,
            delay,
            half_period_ns: 1_000_000_000 / (2 * clock_hz),
        };
        let _ = transport.sclk.set_high();
        let _ = transport.din.set_high();
        transport.delay.delay_ns(transport.half_period_ns);
        transport
    }

    /// Release the pins and the delay provider.
    pub fn release(self) -> (Clk, Din, D) {
        (self.sclk, self.din, self.delay)
    }

    fn start_condition(&mut self) {
        let _ = self.sclk.set_high();
        let _ = self.din.set_high();
        self.delay.delay_ns(self.half_period_ns);
        let _ = self.din.set_low();
        self.delay.delay_ns(self.half_period_ns);
    }

    fn stop_condition(&mut self) {
        let _ = self.sclk.set_high();
        self.delay.delay_ns(self.half_period_ns);
        let _ = self.din.set_high();
        self.delay.delay_ns(self.half_period_ns);
    }

    fn write_byte(&mut self, mut byte: u8) {
        for _ in 0..8 {
            let _ = self.sclk.set_low();
            if byte & 0x01 != 0 {
                let _ = self.din.set_high();
            } else {
                let _ = self.din.set_low();
            }
            self.delay.delay_ns(self.half_period_ns);
            let _ = self.sclk.set_high();
            self.delay.delay_ns(self.half_period_ns);
            byte >>= 1;
        }
    }
}

impl<Clk, Din, D> Transport for BitBangTransport<Clk, Din, D>
where
    Clk: OutputPin,
    Din: OutputPin,
    D: DelayNs,
{
    fn write_frame(&mut self, bytes: &[u8]) {
        self.start_condition();
        for &byte in bytes {
            self.write_byte(byte);
        }
        self.stop_condition();
    }
}
