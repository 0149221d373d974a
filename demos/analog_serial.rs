#![no_std]
#![no_main]

use adc_serial::{
    board::{self, Channel, PicoAnalog},
    Config, Sampler,
};
use rp2040_hal::{self as hal, pac};
use rp_pico::entry;

use panic_halt as _;

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

    // Sample the on-die temperature sensor
    let mut adc = hal::Adc::new(pac.ADC, &mut pac.RESETS);
    let temperature = adc.take_temp_sensor().unwrap();
    let analog = PicoAnalog::new(adc, temperature, None);

    // Serial output on GPIO16, reset button on GPIO15
    let mut sampler = Sampler::new(
        analog,
        Channel::Temperature,
        pins.gpio16.into_push_pull_output(),
        timer,
        pins.gpio15.into_pull_up_input(),
        Config::default(),
    )
    .unwrap();

    sampler.run(board::restart_to_bootloader)
}
