#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, convert::Infallible, rc::Rc};

use adc_serial::AnalogInput;
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};

/// Simulated time and everything that happened on the serial line.
#[derive(Debug, Default)]
pub struct Trace {
    /// Nanoseconds waited so far.
    pub now: u64,
    /// Every level written to the pin, with the time it was written.
    pub levels: Vec<(u64, bool)>,
    /// Every single call to `delay_ns`.
    pub waits: Vec<u32>,
}

pub type Shared = Rc<RefCell<Trace>>;

pub fn trace() -> Shared {
    Rc::new(RefCell::new(Trace::default()))
}

pub struct FakePin(pub Shared);

impl FakePin {
    fn record(&mut self, level: bool) {
        let mut t = self.0.borrow_mut();
        let now = t.now;
        t.levels.push((now, level));
    }
}

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.record(false);
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.record(true);
        Ok(())
    }
}

pub struct FakeDelay(pub Shared);

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        let mut t = self.0.borrow_mut();
        t.now += u64::from(ns);
        t.waits.push(ns);
    }
}

/// Button returning the queued states, released once the queue is empty.
#[derive(Default)]
pub struct FakeButton {
    pub pressed: VecDeque<bool>,
}

impl ErrorType for FakeButton {
    type Error = Infallible;
}

impl InputPin for FakeButton {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        self.is_low().map(|low| !low)
    }
    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.pressed.pop_front().unwrap_or(false))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Temperature,
    Light,
}

/// Converter returning queued samples, repeating the last one when the queue runs dry.
pub struct FakeAdc {
    pub samples: VecDeque<u8>,
    pub last: u8,
    pub selected: Vec<Input>,
    pub reads: usize,
}

impl FakeAdc {
    pub fn new(samples: &[u8]) -> Self {
        Self {
            samples: samples.iter().copied().collect(),
            last: 0,
            selected: Vec::new(),
            reads: 0,
        }
    }
}

impl AnalogInput for FakeAdc {
    type Channel = Input;

    fn select_channel(&mut self, channel: Input) {
        self.selected.push(channel);
    }

    fn read(&mut self) -> u8 {
        self.reads += 1;
        if let Some(s) = self.samples.pop_front() {
            self.last = s;
        }
        self.last
    }
}

/// Line level at time `t`; idle (high) before the first write.
pub fn level_at(levels: &[(u64, bool)], t: u64) -> bool {
    levels
        .iter()
        .take_while(|&&(at, _)| at <= t)
        .last()
        .map_or(true, |&(_, level)| level)
}

fn next_start(levels: &[(u64, bool)], from: u64) -> Option<u64> {
    let mut prev = true;
    for &(at, level) in levels {
        if at >= from && prev && !level {
            return Some(at);
        }
        prev = level;
    }
    None
}

/// Recovers 8N1 bytes from the recorded line by sampling each bit in its middle,
/// the way a logic analyzer decoder does.
pub fn decode(levels: &[(u64, bool)], bit_ns: u64) -> Vec<u8> {
    let mut out = Vec::new();
    let mut from = 0;
    while let Some(start) = next_start(levels, from) {
        assert!(!level_at(levels, start + bit_ns / 2), "glitch at {start}");
        let mut byte = 0u8;
        for i in 0..8 {
            if level_at(levels, start + bit_ns * (2 * i + 3) / 2) {
                byte |= 1 << i;
            }
        }
        let stop = start + bit_ns * 19 / 2;
        assert!(level_at(levels, stop), "missing stop bit after {start}");
        out.push(byte);
        from = stop;
    }
    out
}
