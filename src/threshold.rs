//! On/off decision with hysteresis.

use crate::ConfigError;

/// Switches on above a bright level and off below a dark level.
///
/// Samples between the two levels keep the previous state, so a reading that hovers around a
/// single set point does not make the output flicker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Threshold {
    dark: u8,
    bright: u8,
    on: bool,
}

impl Threshold {
    /// Creates a threshold that starts in the off state.
    ///
    /// # Returns
    /// `Err(ConfigError::InvertedThreshold)` if `dark` is above `bright`.
    pub const fn new(dark: u8, bright: u8) -> Result<Self, ConfigError> {
        if dark > bright {
            return Err(ConfigError::InvertedThreshold);
        }
        Ok(Self {
            dark,
            bright,
            on: false,
        })
    }

    /// Feeds one sample and returns the resulting state.
    pub fn update(&mut self, sample: u8) -> bool {
        if sample > self.bright {
            self.on = true;
        } else if sample < self.dark {
            self.on = false;
        }
        self.on
    }

    /// Current state.
    #[inline]
    pub fn is_on(&self) -> bool {
        self.on
    }
}
