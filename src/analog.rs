//! Analog input.

use core::convert::Infallible;

/// A multiplexed analog-to-digital converter delivering 8-bit samples.
///
/// After [`select_channel`](AnalogInput::select_channel) the input usually needs some time to
/// settle before the first [`read`](AnalogInput::read) is accurate. Waiting is left to the caller.
pub trait AnalogInput {
    /// Identifies one of the converter's inputs.
    type Channel: Copy;

    /// Switches the converter to `channel`.
    fn select_channel(&mut self, channel: Self::Channel);

    /// Runs one conversion on the selected channel.
    fn read(&mut self) -> u8;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    type Channel = T::Channel;

    #[inline]
    fn select_channel(&mut self, channel: Self::Channel) {
        (**self).select_channel(channel)
    }

    #[inline]
    fn read(&mut self) -> u8 {
        (**self).read()
    }
}

/// Reduces a conversion result of `resolution_bits` bits to its 8 most significant bits.
///
/// Results narrower than 8 bits are shifted up so that full scale stays near 255.
/// `resolution_bits` is saturated to `1..=16`, the widths a `u16` result can carry.
pub const fn scale_to_u8(counts: u16, resolution_bits: u32) -> u8 {
    let bits = if resolution_bits == 0 {
        1
    } else if resolution_bits > 16 {
        16
    } else {
        resolution_bits
    };
    if bits >= 8 {
        (counts >> (bits - 8)) as u8
    } else {
        (counts << (8 - bits)) as u8
    }
}

/// Waits for a non-blocking conversion to finish.
///
/// `conversion` is called again for as long as it reports [`nb::Error::WouldBlock`].
pub fn read_blocking<W>(mut conversion: impl FnMut() -> nb::Result<W, Infallible>) -> W {
    loop {
        match conversion() {
            Ok(word) => return word,
            Err(nb::Error::WouldBlock) => continue,
            Err(nb::Error::Other(never)) => match never {},
        }
    }
}
