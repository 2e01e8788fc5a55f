use core::fmt;
use core::fmt::Write;

use heapless::String;

use crate::input::{Field, ManualSetRequest};

/// Wall-clock time of day. Every field stays below its modulus.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockTime {
    pub hours: u8,
    pub mins: u8,
    pub secs: u8,
}

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime::new(0, 0, 0);

    /// Builds a time, saturating out-of-range fields to 23:59:59.
    pub const fn new(hours: u8, mins: u8, secs: u8) -> Self {
        Self {
            hours: saturate(hours, Field::Hours.modulus()),
            mins: saturate(mins, Field::Minutes.modulus()),
            secs: saturate(secs, Field::Seconds.modulus()),
        }
    }

    /// Increments the second. Rolls over into minutes and hours.
    pub fn tick(&mut self) {
        self.secs += 1;
        if self.secs >= 60 {
            self.secs = 0;
            self.add_minute();
        }
    }

    /// Increments the minute. Handles rollover to hours.
    pub fn add_minute(&mut self) {
        self.mins += 1;
        if self.mins >= 60 {
            self.mins = 0;
            self.hours = (self.hours + 1) % 24;
        }
    }

    pub fn add_seconds(&mut self, secs: u8) {
        for _ in 0..secs {
            self.tick();
        }
    }

    /// `HH:MM:SS`
    pub fn text(&self) -> String<8> {
        let mut out = String::new();
        // eight bytes always fit
        let _ = write!(out, "{}", self);
        out
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.mins, self.secs)
    }
}

const fn saturate(value: u8, modulus: u8) -> u8 {
    if value < modulus {
        value
    } else {
        modulus - 1
    }
}

/// Timer periods seen since the last whole second.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickAccumulator {
    count: u8,
    threshold: u8,
}

impl TickAccumulator {
    /// A threshold of zero counts as one.
    pub const fn new(periods_per_second: u8) -> Self {
        let threshold = if periods_per_second == 0 {
            1
        } else {
            periods_per_second
        };
        Self {
            count: 0,
            threshold,
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    /// Counts one period. Returns true when a whole second has elapsed.
    pub fn accumulate(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.threshold {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

/// Single writer of the wall-clock time.
#[derive(Debug, Clone)]
pub struct Clock {
    time: ClockTime,
    ticks: TickAccumulator,
}

impl Clock {
    pub const fn new(seed: ClockTime, periods_per_second: u8) -> Self {
        Self {
            time: seed,
            ticks: TickAccumulator::new(periods_per_second),
        }
    }

    /// Called once per hardware timer period. Returns true when the
    /// displayed time moved.
    pub fn on_timer_tick(&mut self) -> bool {
        if self.ticks.accumulate() {
            self.time.tick();
            trace!("tick {}", self.time);
            true
        } else {
            false
        }
    }

    /// Sets one field, saturating to its largest valid value. The tick
    /// accumulator is left alone.
    pub fn apply_manual_set(&mut self, request: ManualSetRequest) -> bool {
        let value = saturate(request.value, request.field.modulus());
        let before = self.time;
        match request.field {
            Field::Seconds => self.time.secs = value,
            Field::Minutes => self.time.mins = value,
            Field::Hours => self.time.hours = value,
        }
        info!("manual set {} = {}, now {}", request.field, value, self.time);
        before != self.time
    }

    pub fn advance(&mut self, secs: u8) -> bool {
        if secs == 0 {
            return false;
        }
        self.time.add_seconds(secs);
        info!("nudged {}s, now {}", secs, self.time);
        true
    }

    pub fn snapshot(&self) -> ClockTime {
        self.time
    }

    pub fn pending_ticks(&self) -> u8 {
        self.ticks.count()
    }
}
