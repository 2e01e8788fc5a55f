//! Clock capabilities on the Raspberry Pi Pico.

use embedded_hal::digital::v2::InputPin;
use max7219::{connectors::Connector, MAX7219};
use rp_pico::hal::{
    fugit::{MicrosDurationU32, TimerInstantU64},
    gpio::{bank0::Gpio15, FunctionSio, Interrupt, Pin, PullUp, SioInput},
    sio::Sio,
    timer::{Alarm, Alarm0, Timer},
};
use wokwi_clock::display::SegmentFrame;
use wokwi_clock::hal::{ButtonDevice, DisplaySink, Glyph, Monotonic, SwitchDevice, TimerDevice};
use wokwi_clock::input::{SET_BUTTON_EDGE, SWITCH_MASK};

pub type ButtonPin = Pin<Gpio15, FunctionSio<SioInput>, PullUp>;

/// Alarm 0 re-armed on every acknowledge.
pub struct TickAlarm {
    alarm: Alarm0,
    period: MicrosDurationU32,
}

impl TickAlarm {
    pub fn new(alarm: Alarm0) -> Self {
        Self {
            alarm,
            period: MicrosDurationU32::millis(100),
        }
    }

    fn schedule(&mut self) {
        if self.alarm.schedule(self.period).is_err() {
            defmt::warn!("tick alarm not scheduled, period {=u32} us", self.period.ticks());
        }
    }
}

impl TimerDevice for TickAlarm {
    fn configure(&mut self, period: MicrosDurationU32) {
        self.period = period;
        self.schedule();
        self.alarm.enable_interrupt();
    }

    fn is_elapsed(&self) -> bool {
        self.alarm.finished()
    }

    fn acknowledge(&mut self) {
        self.alarm.clear_interrupt();
        self.schedule();
    }
}

/// Pulled-up button on GPIO15, low while pressed.
pub struct SetButton {
    pin: ButtonPin,
}

impl SetButton {
    pub fn new(pin: ButtonPin) -> Self {
        Self { pin }
    }
}

impl ButtonDevice for SetButton {
    fn read_level(&self) -> bool {
        self.pin.is_low().unwrap_or(false)
    }

    fn read_and_clear_edge(&mut self) -> u32 {
        if self.pin.interrupt_status(Interrupt::EdgeLow) {
            self.pin.clear_interrupt(Interrupt::EdgeLow);
            SET_BUTTON_EDGE
        } else {
            0
        }
    }
}

/// Slide switches on GPIO0..=9, read in one go from the SIO input register.
pub struct SwitchBank;

impl SwitchDevice for SwitchBank {
    fn read(&self) -> u16 {
        (Sio::read_bank0() & SWITCH_MASK as u32) as u16
    }
}

pub struct PicoMonotonic(pub Timer);

impl Monotonic for PicoMonotonic {
    fn now(&self) -> TimerInstantU64<1_000_000> {
        self.0.get_counter()
    }
}

/// Six seven-segment digits behind a single MAX7219.
pub struct SevenSegment<C: Connector> {
    driver: MAX7219<C>,
    frame: SegmentFrame,
}

impl<C: Connector> SevenSegment<C> {
    pub fn new(driver: MAX7219<C>) -> Self {
        Self {
            driver,
            frame: SegmentFrame::new(),
        }
    }
}

impl<C: Connector> DisplaySink for SevenSegment<C> {
    fn set_digit(&mut self, index: u8, glyph: Glyph) {
        self.frame.set_digit(index, glyph);
    }

    fn flush(&mut self) {
        if self.driver.write_raw(0, self.frame.raw()).is_err() {
            defmt::warn!("display write failed");
        }
    }
}
