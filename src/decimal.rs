//! Binary to decimal conversion.

use core::fmt;

/// The three decimal digits of an 8-bit value.
///
/// `hundreds` is always 0, 1 or 2 since the largest input is 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Digits {
    /// Hundreds digit.
    pub hundreds: u8,
    /// Tens digit.
    pub tens: u8,
    /// Ones digit.
    pub ones: u8,
}

impl Digits {
    /// Splits `value` into decimal digits.
    ///
    /// Counts how often 100 fits into the value, then how often 10 fits into the rest.
    /// Whatever is left over is the ones digit.
    pub const fn from_u8(value: u8) -> Self {
        let mut rest = value;
        let mut hundreds = 0;
        let mut tens = 0;
        while rest >= 100 {
            hundreds += 1;
            rest -= 100;
        }
        while rest >= 10 {
            tens += 1;
            rest -= 10;
        }
        Self {
            hundreds,
            tens,
            ones: rest,
        }
    }

    /// Recombines the digits into the original value.
    ///
    /// Digits that do not come from [`Digits::from_u8`] may exceed 255; the result wraps.
    pub const fn value(self) -> u8 {
        self.hundreds
            .wrapping_mul(100)
            .wrapping_add(self.tens.wrapping_mul(10))
            .wrapping_add(self.ones)
    }

    /// Returns the ASCII characters of the digits, most significant first.
    ///
    /// Only digits in `0..=9` map to `'0'..='9'`; larger fields wrap.
    pub const fn to_ascii(self) -> [u8; 3] {
        [
            b'0'.wrapping_add(self.hundreds),
            b'0'.wrapping_add(self.tens),
            b'0'.wrapping_add(self.ones),
        ]
    }
}

/// Converts an 8-bit binary value to three decimal digits.
#[inline]
pub const fn bin_to_dec(value: u8) -> Digits {
    Digits::from_u8(value)
}

impl From<u8> for Digits {
    fn from(value: u8) -> Self {
        Self::from_u8(value)
    }
}

impl From<Digits> for u8 {
    fn from(digits: Digits) -> Self {
        digits.value()
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.hundreds, self.tens, self.ones)
    }
}
