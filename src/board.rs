//! Memory-mapped peripherals of the RISC-V lab board.
//!
//! Register map:
//!
//! | device     | base          | registers                                   |
//! |------------|---------------|---------------------------------------------|
//! | switches   | `0x0400_0010` | data (10 bits)                              |
//! | timer      | `0x0400_0020` | status, control, periodl, periodh           |
//! | displays   | `0x0400_0050` | one segment register every `0x10`, 6 digits |
//! | buttons    | `0x0400_00d0` | data, direction, interruptmask, edgecapture |
//!
//! The timer counts the 30 MHz system clock. The board has no free-running
//! counter to read, so it pairs with [`ButtonPolicy::Edge`].
//!
//! [`ButtonPolicy::Edge`]: crate::config::ButtonPolicy::Edge

use core::ptr;

use fugit::MicrosDurationU32;

use crate::font;
use crate::hal::{ButtonDevice, DisplaySink, Glyph, SwitchDevice, TimerDevice};
use crate::input::{EDGE_ACK_ALL, SET_BUTTON_EDGE, SWITCH_MASK};

pub const CPU_HZ: u32 = 30_000_000;

const SWITCH_BASE: usize = 0x0400_0010;
const TIMER_BASE: usize = 0x0400_0020;
const DISPLAY_BASE: usize = 0x0400_0050;
const DISPLAY_STRIDE: usize = 0x10;
const BUTTON_BASE: usize = 0x0400_00d0;

const TIMER_STATUS: usize = 0x0;
const TIMER_CONTROL: usize = 0x4;
const TIMER_PERIODL: usize = 0x8;
const TIMER_PERIODH: usize = 0xC;

const TIMER_TO: u32 = 1 << 0;
const CONTROL_ITO: u32 = 1 << 0;
const CONTROL_CONT: u32 = 1 << 1;
const CONTROL_START: u32 = 1 << 2;

const BUTTON_DATA: usize = 0x0;
const BUTTON_INTERRUPTMASK: usize = 0x8;
const BUTTON_EDGECAPTURE: usize = 0xC;

/// One 32-bit device register.
#[derive(Debug, Clone, Copy)]
struct Reg(*mut u32);

impl Reg {
    /// # Safety
    /// `addr` must be a mapped device register.
    const unsafe fn at(addr: usize) -> Self {
        Reg(addr as *mut u32)
    }

    fn read(self) -> u32 {
        // SAFETY: `Reg::at` callers guarantee the address is a device register.
        unsafe { ptr::read_volatile(self.0) }
    }

    fn write(self, value: u32) {
        // SAFETY: as in `read`.
        unsafe { ptr::write_volatile(self.0, value) }
    }
}

pub struct Timer {
    status: Reg,
    control: Reg,
    periodl: Reg,
    periodh: Reg,
    interrupt: bool,
}

impl Timer {
    /// Cycles of the system clock in `period`.
    pub const fn cycles(period: MicrosDurationU32) -> u32 {
        // 30 cycles per microsecond
        period.ticks() * (CPU_HZ / 1_000_000)
    }
}

impl TimerDevice for Timer {
    fn configure(&mut self, period: MicrosDurationU32) {
        let cycles = Self::cycles(period);
        self.periodl.write(cycles & 0xFFFF);
        self.periodh.write(cycles >> 16);

        let mut control = CONTROL_CONT | CONTROL_START;
        if self.interrupt {
            control |= CONTROL_ITO;
        }
        self.control.write(control);
        self.status.write(0);
    }

    fn is_elapsed(&self) -> bool {
        self.status.read() & TIMER_TO != 0
    }

    fn acknowledge(&mut self) {
        self.status.write(0);
    }
}

pub struct Button {
    data: Reg,
    edges: Reg,
    active_low: bool,
}

impl Button {
    /// Unmasks the edge interrupt of the time-set button and drops stale
    /// edges.
    pub fn enable_interrupt(&mut self) {
        // SAFETY: same button block as `data`.
        let mask = unsafe { Reg::at(BUTTON_BASE + BUTTON_INTERRUPTMASK) };
        mask.write(SET_BUTTON_EDGE);
        self.edges.write(EDGE_ACK_ALL);
    }
}

impl ButtonDevice for Button {
    fn read_level(&self) -> bool {
        // same button the edge path watches
        let high = self.data.read() & SET_BUTTON_EDGE != 0;
        high != self.active_low
    }

    fn read_and_clear_edge(&mut self) -> u32 {
        let edges = self.edges.read();
        if edges != 0 {
            // every captured bit, not only ours, or the line stays asserted
            self.edges.write(EDGE_ACK_ALL);
        }
        edges
    }
}

pub struct Switches {
    data: Reg,
}

impl SwitchDevice for Switches {
    fn read(&self) -> u16 {
        (self.data.read() & SWITCH_MASK as u32) as u16
    }
}

pub struct Displays {
    base: usize,
}

impl DisplaySink for Displays {
    fn set_digit(&mut self, index: u8, glyph: Glyph) {
        if index as usize >= crate::display::DIGITS {
            return;
        }
        // SAFETY: index is bounded to the six display registers.
        let reg = unsafe { Reg::at(self.base + index as usize * DISPLAY_STRIDE) };
        reg.write(font::active_low(glyph) as u32);
    }
}

/// Every device the clock uses.
pub struct Board {
    pub timer: Timer,
    pub button: Button,
    pub switches: Switches,
    pub displays: Displays,
}

impl Board {
    /// # Safety
    /// Must run on the lab board, and only once: the returned handles own
    /// the device registers.
    ///
    /// `timer_interrupt` selects whether the timer raises its interrupt
    /// (interrupt-driven build) or is only polled. `button_active_low`
    /// tells whether the button reads 0 while pressed.
    pub unsafe fn take(timer_interrupt: bool, button_active_low: bool) -> Self {
        Board {
            timer: Timer {
                status: Reg::at(TIMER_BASE + TIMER_STATUS),
                control: Reg::at(TIMER_BASE + TIMER_CONTROL),
                periodl: Reg::at(TIMER_BASE + TIMER_PERIODL),
                periodh: Reg::at(TIMER_BASE + TIMER_PERIODH),
                interrupt: timer_interrupt,
            },
            button: Button {
                data: Reg::at(BUTTON_BASE + BUTTON_DATA),
                edges: Reg::at(BUTTON_BASE + BUTTON_EDGECAPTURE),
                active_low: button_active_low,
            },
            switches: Switches {
                data: Reg::at(SWITCH_BASE),
            },
            displays: Displays { base: DISPLAY_BASE },
        }
    }
}
