//! Polling control loop: sample, convert, transmit, wait, check the reset button.

use core::convert::Infallible;

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};
use fugit::{ExtU32, HertzU32, MicrosDurationU32, MillisDurationU32, NanosDurationU32, RateExtU32};

use crate::{
    analog::AnalogInput,
    decimal::{bin_to_dec, Digits},
    tx::{BitBangTx, BitTiming},
    ConfigError,
};

/// What is written to the serial line for each sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialOutput {
    /// Nothing, the line stays idle.
    Off,
    /// The sample as a single binary byte.
    Raw,
    /// Three ASCII digits followed by the configured line ending.
    Decimal,
}

/// Characters sent after a decimal reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEnding {
    /// No terminator.
    None,
    /// Carriage return (13).
    Cr,
    /// Line feed (10).
    Lf,
    /// Carriage return and line feed.
    CrLf,
}

impl LineEnding {
    /// The bytes of the terminator.
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::None => b"",
            LineEnding::Cr => b"\r",
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// Settings of the control loop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Serial bit rate.
    pub baud: HertzU32,
    /// Per-bit loop overhead subtracted from data and stop bits.
    pub overhead: NanosDurationU32,
    /// Serial output format.
    pub output: SerialOutput,
    /// Terminator for [`SerialOutput::Decimal`].
    pub line_ending: LineEnding,
    /// Pause after each sample.
    pub interval: MillisDurationU32,
    /// Settling time after switching the analog channel.
    pub acquisition: MicrosDurationU32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baud: 9600.Hz(),
            overhead: 1_000.nanos(),
            output: SerialOutput::Decimal,
            line_ending: LineEnding::CrLf,
            interval: 100.millis(),
            acquisition: 200.micros(),
        }
    }
}

impl Config {
    /// Sets the serial bit rate.
    pub const fn with_baud(mut self, baud: HertzU32) -> Self {
        self.baud = baud;
        self
    }

    /// Sets the per-bit overhead compensation.
    pub const fn with_overhead(mut self, overhead: NanosDurationU32) -> Self {
        self.overhead = overhead;
        self
    }

    /// Sets the serial output format.
    pub const fn with_output(mut self, output: SerialOutput) -> Self {
        self.output = output;
        self
    }

    /// Sets the terminator of decimal readings.
    pub const fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Sets the pause between two samples.
    pub const fn with_interval(mut self, interval: MillisDurationU32) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the settling time after a channel switch.
    pub const fn with_acquisition(mut self, acquisition: MicrosDurationU32) -> Self {
        self.acquisition = acquisition;
        self
    }

    /// Bit timing derived from `baud` and `overhead`.
    pub fn timing(&self) -> Result<BitTiming, ConfigError> {
        BitTiming::from_baud(self.baud)?.compensate(self.overhead)
    }
}

/// One sample and its decimal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// The 8-bit conversion result.
    pub sample: u8,
    /// `sample` split into decimal digits.
    pub digits: Digits,
}

/// Outcome of one [`Sampler::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// A sample was taken and the reset input is released.
    Continue(Reading),
    /// The reset input is asserted; the caller should restart the program.
    Reset,
}

/// The polling loop tying the analog input to the serial output.
///
/// # Type Parameters
/// - `A`: The analog input.
/// - `P`: The serial output pin.
/// - `D`: The delay used for bit timing and the sample interval.
/// - `R`: The reset button, active low.
pub struct Sampler<A: AnalogInput, P, D, R> {
    adc: A,
    channel: A::Channel,
    tx: BitBangTx<P, D>,
    reset: R,
    config: Config,
}

impl<A, P, D, R> Sampler<A, P, D, R>
where
    A: AnalogInput,
    P: OutputPin<Error = Infallible>,
    D: DelayNs,
    R: InputPin<Error = Infallible>,
{
    /// Create a new [`Sampler`] instance. The serial line is set idle right away.
    ///
    /// # Arguments
    /// - `adc`: The analog input to sample.
    /// - `channel`: Channel selected by [`Sampler::start`].
    /// - `tx_pin`: The serial output pin.
    /// - `delay`: Delay provider.
    /// - `reset`: The reset button, pressed when low.
    /// - `config`: Loop settings.
    ///
    /// # Returns
    /// `Err` if `config` does not give a usable bit timing.
    pub fn new(
        adc: A,
        channel: A::Channel,
        tx_pin: P,
        delay: D,
        reset: R,
        config: Config,
    ) -> Result<Self, ConfigError> {
        let timing = config.timing()?;
        Ok(Self {
            adc,
            channel,
            tx: BitBangTx::new(tx_pin, delay, timing),
            reset,
            config,
        })
    }

    /// Selects the configured channel and waits for the input to settle.
    pub fn start(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::debug!("sampler start: {}", self.config);
        self.settle();
    }

    /// Switches to another channel and waits for the input to settle.
    pub fn select_channel(&mut self, channel: A::Channel) {
        self.channel = channel;
        self.settle();
    }

    /// Runs one iteration of the loop.
    ///
    /// Reads a sample, writes it out as configured, waits for the sample interval and finally
    /// checks the reset input. A press during the transmission or the pause is only seen here.
    pub fn poll(&mut self) -> Step {
        let sample = self.adc.read();
        let digits = bin_to_dec(sample);
        #[cfg(feature = "defmt")]
        defmt::debug!("sample {=u8} ({})", sample, digits);

        match self.config.output {
            SerialOutput::Off => {}
            SerialOutput::Raw => self.tx.write_byte(sample),
            SerialOutput::Decimal => {
                self.tx.write_bytes(&digits.to_ascii());
                self.tx.write_bytes(self.config.line_ending.as_bytes());
            }
        }

        self.tx.delay_mut().delay_ms(self.config.interval.ticks());

        if self.reset_pressed() {
            #[cfg(feature = "defmt")]
            defmt::info!("reset requested");
            return Step::Reset;
        }
        Step::Continue(Reading { sample, digits })
    }

    /// Starts sampling and keeps polling until the reset input is pressed, then calls `restart`.
    pub fn run(&mut self, restart: fn() -> !) -> ! {
        self.start();
        loop {
            if let Step::Reset = self.poll() {
                restart()
            }
        }
    }

    /// The loop settings.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The serial transmitter, for writing additional data between polls.
    #[inline]
    pub fn tx_mut(&mut self) -> &mut BitBangTx<P, D> {
        &mut self.tx
    }

    /// Frees the underlying resources.
    ///
    /// # Returns
    /// A tuple containing the analog input, the serial pin, the delay and the reset input.
    pub fn free(self) -> (A, P, D, R) {
        let (pin, delay) = self.tx.free();
        (self.adc, pin, delay, self.reset)
    }

    fn settle(&mut self) {
        self.adc.select_channel(self.channel);
        self.tx
            .delay_mut()
            .delay_us(self.config.acquisition.ticks());
    }

    fn reset_pressed(&mut self) -> bool {
        match self.reset.is_low() {
            Ok(low) => low,
            Err(never) => match never {},
        }
    }
}
