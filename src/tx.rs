//! Bit-banged serial transmitter.
//!
//! Every byte is sent as an asynchronous 8N1 frame: one low start bit, eight data bits LSB first and
//! one high stop bit. The line idles high. Each level is held by blocking on a [`DelayNs`], so the
//! caller is busy for the whole frame.

use core::convert::Infallible;
use core::iter::FusedIterator;

use embedded_hal::{
    delay::DelayNs,
    digital::{OutputPin, PinState},
};
use fugit::{HertzU32, NanosDurationU32};

use crate::ConfigError;

/// Number of levels in one frame: start, 8 data bits, stop.
pub const FRAME_BITS: usize = 10;

/// How long each level of a frame is held.
///
/// The start bit keeps the nominal duration. Data and stop bits may be shortened with
/// [`BitTiming::compensate`] to make up for the time spent between two levels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitTiming {
    start: NanosDurationU32,
    bit: NanosDurationU32,
}

impl BitTiming {
    /// Creates the nominal timing for `baud`, one bit lasting `1 / baud`.
    ///
    /// # Returns
    /// `Err(ConfigError::InvalidBaud)` if the rate is zero, faster than 1 GHz, or so slow that
    /// one frame does not fit into a [`NanosDurationU32`] (below 3 Hz).
    pub fn from_baud(baud: HertzU32) -> Result<Self, ConfigError> {
        let hz = baud.to_Hz();
        if hz == 0 {
            return Err(ConfigError::InvalidBaud);
        }
        let ns = 1_000_000_000 / hz;
        if ns == 0 || ns.checked_mul(FRAME_BITS as u32).is_none() {
            return Err(ConfigError::InvalidBaud);
        }
        let bit = NanosDurationU32::from_ticks(ns);
        Ok(Self { start: bit, bit })
    }

    /// Shortens data and stop bits by `overhead`, the time the caller loses per bit on
    /// extracting and driving the next level.
    ///
    /// The right value depends on the CPU, clock and compiler settings and has to be measured
    /// on the line. At 9600 baud a start bit of 104 µs and data bits of 103 µs is a typical result.
    ///
    /// # Returns
    /// `Err(ConfigError::OverheadTooLarge)` if nothing of the bit would be left.
    pub fn compensate(self, overhead: NanosDurationU32) -> Result<Self, ConfigError> {
        if overhead.ticks() >= self.bit.ticks() {
            return Err(ConfigError::OverheadTooLarge);
        }
        Ok(Self {
            start: self.start,
            bit: NanosDurationU32::from_ticks(self.bit.ticks() - overhead.ticks()),
        })
    }

    /// Duration of the start bit.
    #[inline]
    pub fn start_bit(&self) -> NanosDurationU32 {
        self.start
    }

    /// Duration of each data bit and the stop bit.
    #[inline]
    pub fn data_bit(&self) -> NanosDurationU32 {
        self.bit
    }

    /// Time spent waiting for one complete frame.
    pub fn frame(&self) -> NanosDurationU32 {
        NanosDurationU32::from_ticks(self.start.ticks() + 9 * self.bit.ticks())
    }
}

/// The line levels of one frame, in transmission order.
#[derive(Debug, Clone)]
pub struct Frame {
    data: u8,
    index: u8,
}

/// Returns the ten levels `byte` is sent as.
pub fn frame_levels(byte: u8) -> Frame {
    Frame {
        data: byte,
        index: 0,
    }
}

impl Iterator for Frame {
    type Item = PinState;

    fn next(&mut self) -> Option<PinState> {
        let level = match self.index {
            0 => PinState::Low,
            1..=8 => {
                let level = PinState::from(self.data & 1 != 0);
                self.data >>= 1;
                level
            }
            9 => PinState::High,
            _ => return None,
        };
        self.index += 1;
        Some(level)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = FRAME_BITS.saturating_sub(self.index as usize);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Frame {}
impl FusedIterator for Frame {}

/// Software UART transmitter driving a single output pin.
///
/// # Type Parameters
/// - `P`: The output pin. Only pins that can not fail are accepted.
/// - `D`: The delay used to hold each level.
pub struct BitBangTx<P, D> {
    pin: P,
    delay: D,
    timing: BitTiming,
}

impl<P, D> BitBangTx<P, D>
where
    P: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    /// Create a new [`BitBangTx`] instance and put the line into its idle (high) state.
    ///
    /// # Arguments
    /// - `pin`: The pin the serial data is written to.
    /// - `delay`: Delay provider used for bit timing.
    /// - `timing`: Bit durations, see [`BitTiming::from_baud`].
    pub fn new(pin: P, delay: D, timing: BitTiming) -> Self {
        let mut tx = Self { pin, delay, timing };
        tx.drive(PinState::High);
        tx
    }

    /// Sends one byte and returns after its stop bit.
    pub fn write_byte(&mut self, byte: u8) {
        #[cfg(feature = "defmt")]
        defmt::trace!("tx {=u8:#x}", byte);
        for (index, level) in frame_levels(byte).enumerate() {
            self.drive(level);
            let hold = if index == 0 {
                self.timing.start
            } else {
                self.timing.bit
            };
            self.delay.delay_ns(hold.ticks());
        }
    }

    /// Sends all bytes of `buf` back to back.
    pub fn write_bytes(&mut self, buf: &[u8]) {
        for &b in buf {
            self.write_byte(b);
        }
    }

    /// The timing in use.
    #[inline]
    pub fn timing(&self) -> BitTiming {
        self.timing
    }

    /// Access to the delay provider, for waiting between transmissions.
    #[inline]
    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Frees the underlying resources.
    ///
    /// # Returns
    /// A tuple containing the pin and the delay.
    pub fn free(self) -> (P, D) {
        (self.pin, self.delay)
    }

    fn drive(&mut self, level: PinState) {
        match self.pin.set_state(level) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
}

impl<P, D> embedded_io::ErrorType for BitBangTx<P, D>
where
    P: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    type Error = Infallible;
}

impl<P, D> embedded_io::Write for BitBangTx<P, D>
where
    P: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.write_bytes(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> Result<(), Self::Error> {
        // Every write has already left the pin when it returns.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fugit::{ExtU32, RateExtU32};

    #[test]
    fn nominal_9600() {
        let timing = BitTiming::from_baud(9600.Hz()).unwrap();
        assert_eq!(timing.start_bit().ticks(), 104_166);
        assert_eq!(timing.data_bit(), timing.start_bit());
        assert_eq!(timing.frame().ticks(), 1_041_660);
    }

    #[test]
    fn compensation_only_touches_data_bits() {
        let timing = BitTiming::from_baud(9600.Hz())
            .unwrap()
            .compensate(1_000.nanos())
            .unwrap();
        assert_eq!(timing.start_bit().ticks(), 104_166);
        assert_eq!(timing.data_bit().ticks(), 103_166);
        assert_eq!(timing.frame().ticks(), 104_166 + 9 * 103_166);
    }

    #[test]
    fn rejects_bad_rates() {
        assert_eq!(BitTiming::from_baud(0.Hz()), Err(ConfigError::InvalidBaud));
        assert_eq!(
            BitTiming::from_baud(2_000_000_000.Hz()),
            Err(ConfigError::InvalidBaud)
        );
        assert_eq!(BitTiming::from_baud(1.Hz()), Err(ConfigError::InvalidBaud));
        assert_eq!(BitTiming::from_baud(2.Hz()), Err(ConfigError::InvalidBaud));
        let timing = BitTiming::from_baud(1_000_000.Hz()).unwrap();
        assert_eq!(
            timing.compensate(1_000.nanos()),
            Err(ConfigError::OverheadTooLarge)
        );
    }

    #[test]
    fn slowest_rate_frame_fits() {
        let timing = BitTiming::from_baud(3.Hz()).unwrap();
        assert_eq!(timing.data_bit().ticks(), 333_333_333);
        assert_eq!(timing.frame().ticks(), 3_333_333_330);
        let shorter = timing.compensate(1_000.nanos()).unwrap();
        assert!(shorter.frame().ticks() < timing.frame().ticks());
    }

    #[test]
    fn frame_of_0xb2() {
        let levels: Vec<bool> = frame_levels(0xB2).map(|l| l == PinState::High).collect();
        let expected = [0, 0, 1, 0, 0, 1, 1, 0, 1, 1].map(|b| b == 1);
        assert_eq!(levels, expected);
    }

    #[test]
    fn frame_is_always_ten_levels() {
        for b in [0x00, 0x55, 0xFF] {
            let frame = frame_levels(b);
            assert_eq!(frame.len(), FRAME_BITS);
            let levels: Vec<PinState> = frame.collect();
            assert_eq!(levels[0], PinState::Low);
            assert_eq!(levels[9], PinState::High);
        }
    }
}
