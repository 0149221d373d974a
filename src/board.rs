//! RP2040 adapters.
//!
//! The on-die temperature sensor takes the place of the PIC's temperature indicator and GPIO26
//! carries an optional phototransistor.

use embedded_hal_0_2::adc::OneShot;
use rp2040_hal::{
    adc::{AdcPin, TempSense},
    gpio::{bank0::Gpio26, FunctionSioInput, Pin, PullNone},
    Adc,
};

use crate::analog::{read_blocking, scale_to_u8, AnalogInput};

/// Resolution of the RP2040 ADC.
const ADC_BITS: u32 = 12;

/// The phototransistor input, GPIO26 / ADC0 configured as floating input.
pub type LightPin = AdcPin<Pin<Gpio26, FunctionSioInput, PullNone>>;

/// Analog inputs available on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// On-die temperature sensor.
    Temperature,
    /// Phototransistor on GPIO26.
    Light,
}

/// [`AnalogInput`] on the RP2040 ADC.
pub struct PicoAnalog {
    adc: Adc,
    temperature: TempSense,
    light: Option<LightPin>,
    selected: Channel,
}

impl PicoAnalog {
    /// Create a new [`PicoAnalog`] instance, reading the temperature sensor.
    ///
    /// # Arguments
    /// - `adc`: The enabled ADC.
    /// - `temperature`: Obtained with [`Adc::take_temp_sensor`].
    /// - `light`: The phototransistor pin, if one is fitted.
    pub fn new(adc: Adc, temperature: TempSense, light: Option<LightPin>) -> Self {
        Self {
            adc,
            temperature,
            light,
            selected: Channel::Temperature,
        }
    }

    /// The channel conversions are taken from.
    #[inline]
    pub fn selected(&self) -> Channel {
        self.selected
    }

    /// Frees the underlying resources.
    ///
    /// # Returns
    /// A tuple containing the ADC, the temperature sensor and the light pin.
    pub fn free(self) -> (Adc, TempSense, Option<LightPin>) {
        (self.adc, self.temperature, self.light)
    }
}

impl AnalogInput for PicoAnalog {
    type Channel = Channel;

    /// Selecting [`Channel::Light`] without a light pin keeps the current channel.
    fn select_channel(&mut self, channel: Channel) {
        if channel == Channel::Light && self.light.is_none() {
            #[cfg(feature = "defmt")]
            defmt::warn!("no light sensor fitted, staying on {}", self.selected);
            return;
        }
        self.selected = channel;
    }

    fn read(&mut self) -> u8 {
        let adc = &mut self.adc;
        let counts: u16 = match (self.selected, self.light.as_mut()) {
            (Channel::Light, Some(pin)) => {
                read_blocking(|| OneShot::read(&mut *adc, &mut *pin))
            }
            _ => {
                let temperature = &mut self.temperature;
                read_blocking(|| OneShot::read(&mut *adc, &mut *temperature))
            }
        };
        scale_to_u8(counts, ADC_BITS)
    }
}

/// Restarts the program with a system reset.
pub fn restart() -> ! {
    cortex_m::peripheral::SCB::sys_reset()
}

/// Reboots into the USB mass storage bootloader, ready for a new program.
pub fn restart_to_bootloader() -> ! {
    rp2040_hal::rom_data::reset_to_usb_boot(0, 0);
    // The ROM call does not come back.
    loop {
        cortex_m::asm::nop();
    }
}
