#![no_std]
#![no_main]

use adc_serial::{
    board::{self, Channel, PicoAnalog},
    Config, Sampler, SerialOutput, Step, Threshold,
};
use embedded_hal::digital::OutputPin;
use fugit::ExtU32;
use rp2040_hal::{self as hal, adc::AdcPin, pac};
use rp_pico::entry;

use panic_halt as _;

// Measured medium light level is around 128, keep a few steps on either side.
const DARK: u8 = 120;
const BRIGHT: u8 = 136;

#[entry]
fn main() -> ! {
    let mut pac = pac::Peripherals::take().unwrap();
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
    let clocks = hal::clocks::init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let sio = hal::Sio::new(pac.SIO);
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );
    let timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    // Phototransistor on GPIO26
    let mut adc = hal::Adc::new(pac.ADC, &mut pac.RESETS);
    let temperature = adc.take_temp_sensor().unwrap();
    let light = AdcPin::new(pins.gpio26.into_floating_input()).ok();
    let analog = PicoAnalog::new(adc, temperature, light);

    let config = Config::default()
        .with_output(SerialOutput::Raw)
        .with_interval(50.millis());
    let mut sampler = Sampler::new(
        analog,
        Channel::Light,
        pins.gpio16.into_push_pull_output(),
        timer,
        pins.gpio15.into_pull_up_input(),
        config,
    )
    .unwrap();

    let mut led = pins.led.into_push_pull_output();
    let mut threshold = Threshold::new(DARK, BRIGHT).unwrap();

    sampler.start();
    loop {
        match sampler.poll() {
            Step::Continue(reading) => {
                let lit = threshold.update(reading.sample);
                led.set_state(lit.into()).ok();
            }
            Step::Reset => board::restart(),
        }
    }
}
