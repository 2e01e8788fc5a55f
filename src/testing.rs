//! Fake devices for the unit tests.

use core::cell::Cell;

use fugit::{MicrosDurationU32, TimerInstantU64};

use crate::display::DIGITS;
use crate::hal::{ButtonDevice, DisplaySink, Glyph, Monotonic, SwitchDevice, TimerDevice};

pub fn at_ms(ms: u64) -> TimerInstantU64<1_000_000> {
    TimerInstantU64::<1_000_000>::from_ticks(ms * 1_000)
}

#[derive(Debug, Default)]
pub struct FakeTimer {
    pub period: Option<MicrosDurationU32>,
    pub elapsed: bool,
    pub acks: u32,
}

impl TimerDevice for FakeTimer {
    fn configure(&mut self, period: MicrosDurationU32) {
        self.period = Some(period);
    }

    fn is_elapsed(&self) -> bool {
        self.elapsed
    }

    fn acknowledge(&mut self) {
        self.elapsed = false;
        self.acks += 1;
    }
}

#[derive(Debug, Default)]
pub struct FakeButton {
    pub pressed: bool,
    pub edges: u32,
}

impl ButtonDevice for FakeButton {
    fn read_level(&self) -> bool {
        self.pressed
    }

    fn read_and_clear_edge(&mut self) -> u32 {
        core::mem::take(&mut self.edges)
    }
}

#[derive(Debug, Default)]
pub struct FakeSwitches(pub u16);

impl SwitchDevice for FakeSwitches {
    fn read(&self) -> u16 {
        self.0 & crate::input::SWITCH_MASK
    }
}

#[derive(Debug, Default)]
pub struct FakeMonotonic {
    pub now_ms: Cell<u64>,
}

impl FakeMonotonic {
    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Monotonic for FakeMonotonic {
    fn now(&self) -> TimerInstantU64<1_000_000> {
        at_ms(self.now_ms.get())
    }
}

#[derive(Debug)]
pub struct RecordingDisplay {
    pub digits: [Option<Glyph>; DIGITS],
    pub writes: u32,
    pub flushes: u32,
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        Self {
            digits: [None; DIGITS],
            writes: 0,
            flushes: 0,
        }
    }
}

impl RecordingDisplay {
    /// Current contents; positions never written read as blank.
    pub fn shown(&self) -> [Glyph; DIGITS] {
        self.digits.map(|d| d.unwrap_or(Glyph::Blank))
    }
}

impl DisplaySink for RecordingDisplay {
    fn set_digit(&mut self, index: u8, glyph: Glyph) {
        self.digits[index as usize] = Some(glyph);
        self.writes += 1;
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}
