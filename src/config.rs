use fugit::{MicrosDurationU32, MicrosDurationU64};

use crate::clock::ClockTime;

/// How a press of the time-set button is recognised.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonPolicy {
    /// Hardware edge capture, acknowledged on every read.
    Edge,
    /// Live level, with a hold-off after each accepted press.
    LevelCooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    pub seed: ClockTime,
    pub periods_per_second: u8,
    pub timer_period: MicrosDurationU32,
    pub button_policy: ButtonPolicy,
    pub debounce_cooldown: MicrosDurationU64,
    /// Seconds to add when a press selects no field. `None` ignores the press.
    pub nudge_seconds: Option<u8>,
}

impl ClockConfig {
    /// 100 ms timer, ten periods per second, starting at midnight.
    pub const DEFAULT: ClockConfig = ClockConfig {
        seed: ClockTime::MIDNIGHT,
        periods_per_second: 10,
        timer_period: MicrosDurationU32::millis(100),
        button_policy: ButtonPolicy::LevelCooldown,
        debounce_cooldown: MicrosDurationU64::millis(250),
        nudge_seconds: None,
    };

    pub const fn with_seed(mut self, seed: ClockTime) -> Self {
        self.seed = seed;
        self
    }

    pub const fn with_timer(mut self, period: MicrosDurationU32, periods_per_second: u8) -> Self {
        self.timer_period = period;
        self.periods_per_second = periods_per_second;
        self
    }

    pub const fn with_button_policy(mut self, policy: ButtonPolicy) -> Self {
        self.button_policy = policy;
        self
    }

    pub const fn with_debounce_cooldown(mut self, cooldown: MicrosDurationU64) -> Self {
        self.debounce_cooldown = cooldown;
        self
    }

    pub const fn with_nudge(mut self, secs: u8) -> Self {
        self.nudge_seconds = Some(secs);
        self
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
