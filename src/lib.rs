//! Seven-segment wall clock driven by a periodic hardware timer.
//!
//! The library holds the time-keeping rules: tick accumulation, manual
//! time setting from a button plus switch bank, and digit rendering. The
//! devices are reached through the capability traits in [`hal`], so the
//! same [`controller::Controller`] runs from interrupt handlers or from a
//! polling loop, on the Pico firmware in `main.rs` or on the lab board in
//! [`board`].
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod board;
pub mod clock;
pub mod config;
pub mod controller;
pub mod display;
pub mod font;
pub mod hal;
pub mod input;

#[cfg(test)]
mod testing;

pub use clock::{Clock, ClockTime};
pub use config::{ButtonPolicy, ClockConfig};
pub use controller::Controller;
pub use hal::Glyph;
pub use input::{Field, InputDecoder, ManualSetRequest};
