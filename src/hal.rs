//! Capabilities the clock needs from the board.
//!
//! Implementations normalise wiring details (active-low buttons, interrupt
//! cause numbers, register layouts) so the core only sees `pressed` and
//! `elapsed`. None of these calls can fail from the core's point of view;
//! a binding that talks to a fallible bus logs and drops its errors.

use fugit::{MicrosDurationU32, TimerInstantU64};

pub trait TimerDevice {
    /// Starts periodic expiry every `period`.
    fn configure(&mut self, period: MicrosDurationU32);
    fn is_elapsed(&self) -> bool;
    fn acknowledge(&mut self);
}

pub trait ButtonDevice {
    /// True while the button is held.
    fn read_level(&self) -> bool;

    /// Returns captured edges and clears them. Devices without edge capture
    /// report none.
    fn read_and_clear_edge(&mut self) -> u32 {
        0
    }
}

pub trait SwitchDevice {
    /// Switch bank, masked to its 10 implemented bits.
    fn read(&self) -> u16;
}

/// What one digit position shows.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Digit(u8),
    Blank,
}

impl Glyph {
    pub const fn from_value(value: u8) -> Self {
        if value <= 9 {
            Glyph::Digit(value)
        } else {
            Glyph::Blank
        }
    }
}

pub trait DisplaySink {
    /// `index` runs 0..=5, rightmost digit first.
    fn set_digit(&mut self, index: u8, glyph: Glyph);

    /// Called once all six digits of a frame were set.
    fn flush(&mut self) {}
}

/// Free-running microsecond clock.
pub trait Monotonic {
    fn now(&self) -> TimerInstantU64<1_000_000>;
}
