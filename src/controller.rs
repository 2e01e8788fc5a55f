//! Owns the clock state and routes device events into it.
//!
//! Whoever owns the [`Controller`] (an interrupt task, or the main loop
//! when polling) is the only writer; everybody else reads through
//! [`Controller::time`]. Every entry point takes `&mut self`, so a
//! handler cannot run while another holds the state.

use fugit::MicrosDurationU32;

use crate::clock::{Clock, ClockTime};
use crate::config::ClockConfig;
use crate::display;
use crate::hal::{ButtonDevice, DisplaySink, Monotonic, SwitchDevice, TimerDevice};
use crate::input::{InputDecoder, Press};

#[derive(Debug, Clone)]
pub struct Controller {
    clock: Clock,
    input: InputDecoder,
    timer_period: MicrosDurationU32,
    nudge_seconds: Option<u8>,
}

impl Controller {
    pub const fn new(config: &ClockConfig) -> Self {
        Self {
            clock: Clock::new(config.seed, config.periods_per_second),
            input: InputDecoder::from_config(config),
            timer_period: config.timer_period,
            nudge_seconds: config.nudge_seconds,
        }
    }

    /// Starts the periodic timer and shows the seed time.
    pub fn start<T, D>(&mut self, timer: &mut T, display: &mut D)
    where
        T: TimerDevice,
        D: DisplaySink,
    {
        timer.configure(self.timer_period);
        info!("clock started at {}", self.clock.snapshot());
        display::render(&self.clock.snapshot(), display);
    }

    /// Timer interrupt. Returns true when the display was updated.
    pub fn on_timer_interrupt<T, D>(&mut self, timer: &mut T, display: &mut D) -> bool
    where
        T: TimerDevice,
        D: DisplaySink,
    {
        if !timer.is_elapsed() {
            trace!("timer interrupt without expiry");
            return false;
        }
        timer.acknowledge();

        let changed = self.clock.on_timer_tick();
        if changed {
            display::render(&self.clock.snapshot(), display);
        }
        changed
    }

    /// Button interrupt, or one button evaluation of a polling loop.
    /// Returns true when the display was updated.
    pub fn on_button_interrupt<B, S, M, D>(
        &mut self,
        button: &mut B,
        switches: &S,
        monotonic: &M,
        display: &mut D,
    ) -> bool
    where
        B: ButtonDevice,
        S: SwitchDevice,
        M: Monotonic,
        D: DisplaySink,
    {
        let changed = match self.input.evaluate(button, switches, monotonic.now()) {
            Some(Press::Set(request)) => self.clock.apply_manual_set(request),
            Some(Press::Unselected) => match self.nudge_seconds {
                Some(secs) => self.clock.advance(secs),
                None => false,
            },
            None => false,
        };
        if changed {
            display::render(&self.clock.snapshot(), display);
        }
        changed
    }

    /// One iteration of the polling model: the button first, then the
    /// timer flag. Must run at least once per timer period or ticks are
    /// lost. Also usable from a single shared interrupt vector that has to
    /// check every source.
    pub fn poll<T, B, S, M, D>(
        &mut self,
        timer: &mut T,
        button: &mut B,
        switches: &S,
        monotonic: &M,
        display: &mut D,
    ) -> bool
    where
        T: TimerDevice,
        B: ButtonDevice,
        S: SwitchDevice,
        M: Monotonic,
        D: DisplaySink,
    {
        let set = self.on_button_interrupt(button, switches, monotonic, display);
        let ticked = self.on_timer_interrupt(timer, display);
        set || ticked
    }

    pub fn time(&self) -> ClockTime {
        self.clock.snapshot()
    }
}
