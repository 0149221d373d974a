//! # AdcSerial Crate
//!
//! This crate samples an analog input, converts the 8-bit result into three decimal digits and
//! writes it out through a software-timed (bit-banged) RS-232 transmitter on any output pin.
//! It is meant for teaching boards, where the serial line is watched with an oscilloscope,
//! a logic analyzer or a terminal.
//!
//! ## Features
//! - Binary to decimal conversion by repeated subtraction
//! - Bit-banged 8N1 serial output, LSB first, idle high
//! - Tunable bit timing to compensate for the overhead of the bit loop
//! - A polling control loop with a manual reset input
//! - Light threshold with hysteresis
//! - RP2040 adapters for the ADC and system reset (feature `rp2040`)
//! - `defmt` support (feature `defmt`)
//!
//! ## Usage
//! The transmitter only needs an [`embedded_hal::digital::OutputPin`] and an
//! [`embedded_hal::delay::DelayNs`], so it works with any HAL. The control loop additionally takes an
//! [`AnalogInput`] and an [`embedded_hal::digital::InputPin`] for the reset button.
//!
//! ## Example
//! ```ignore
//! use adc_serial::{bin_to_dec, BitBangTx, BitTiming};
//! use fugit::{ExtU32, RateExtU32};
//!
//! let timing = BitTiming::from_baud(9600.Hz())?.compensate(1_000.nanos())?;
//! let mut tx = BitBangTx::new(pin, delay, timing);
//!
//! let digits = bin_to_dec(sample);
//! tx.write_bytes(&digits.to_ascii());
//! tx.write_bytes(b"\r\n");
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

pub mod analog;
#[cfg(feature = "rp2040")]
pub mod board;
pub mod decimal;
pub mod sampler;
pub mod threshold;
pub mod tx;

pub use analog::{read_blocking, scale_to_u8, AnalogInput};
pub use decimal::{bin_to_dec, Digits};
pub use sampler::{Config, LineEnding, Reading, Sampler, SerialOutput, Step};
pub use threshold::Threshold;
pub use tx::{frame_levels, BitBangTx, BitTiming, Frame};

/// Represents a rejected configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum ConfigError {
    /// The baud rate is zero or too high to give a bit time of at least one nanosecond.
    InvalidBaud,
    /// The loop overhead is not shorter than one bit.
    OverheadTooLarge,
    /// The dark level of a threshold is above its bright level.
    InvertedThreshold,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidBaud => f.write_str("baud rate out of range"),
            ConfigError::OverheadTooLarge => f.write_str("overhead exceeds the bit duration"),
            ConfigError::InvertedThreshold => f.write_str("dark level above bright level"),
        }
    }
}
