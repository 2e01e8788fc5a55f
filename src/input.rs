//! Button and switch decoding.
//!
//! Switch bank layout (10 bits):
//!
//! ```text
//!  9 8 | 7 6 | 5 4 3 2 1 0
//!  sel | --- |    value
//! ```
//!
//! `sel` picks the field (0 = none, 1 = seconds, 2 = minutes, 3 = hours)
//! and `value` is the number to load into it.

use fugit::{MicrosDurationU64, TimerInstantU64};

use crate::config::{ButtonPolicy, ClockConfig};
use crate::hal::{ButtonDevice, SwitchDevice};

pub const SWITCH_MASK: u16 = 0x3FF;
const SELECTOR_SHIFT: u16 = 8;
const SELECTOR_MASK: u16 = 0x3;
const VALUE_MASK: u16 = 0x3F;

/// Edge-capture bit of the time-set button.
pub const SET_BUTTON_EDGE: u32 = 1 << 1;
/// Written back to the edge-capture register to acknowledge every edge.
pub const EDGE_ACK_ALL: u32 = 0xFF;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Seconds,
    Minutes,
    Hours,
}

impl Field {
    /// Maps the two selector bits to a field. Zero selects nothing.
    pub const fn from_selector(selector: u16) -> Option<Self> {
        match selector & SELECTOR_MASK {
            1 => Some(Field::Seconds),
            2 => Some(Field::Minutes),
            3 => Some(Field::Hours),
            _ => None,
        }
    }

    pub const fn modulus(self) -> u8 {
        match self {
            Field::Seconds | Field::Minutes => 60,
            Field::Hours => 24,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualSetRequest {
    pub field: Field,
    pub value: u8,
}

impl ManualSetRequest {
    /// Decodes the switch bank. The value is left raw (0..=63); the clock
    /// clamps it.
    pub fn decode(switches: u16) -> Option<Self> {
        let switches = switches & SWITCH_MASK;
        let field = Field::from_selector((switches >> SELECTOR_SHIFT) & SELECTOR_MASK)?;
        Some(Self {
            field,
            value: (switches & VALUE_MASK) as u8,
        })
    }
}

/// Outcome of one accepted button press.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    Set(ManualSetRequest),
    /// Accepted, but the selector chose no field.
    Unselected,
}

/// Debounce bookkeeping between evaluations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceWindow {
    was_pressed: bool,
    last_pressed: Option<TimerInstantU64<1_000_000>>,
}

impl DebounceWindow {
    /// Level policy: fires on a released-to-pressed transition, but only
    /// once the button has not read pressed for `cooldown`. A held button
    /// fires once, and so does the bounce when it is let go.
    pub fn accept_level(
        &mut self,
        pressed: bool,
        now: TimerInstantU64<1_000_000>,
        cooldown: MicrosDurationU64,
    ) -> bool {
        let rising = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        if !pressed {
            return false;
        }

        let quiet = match self.last_pressed {
            // A clock that went backwards counts as quiet.
            Some(last) => now
                .checked_duration_since(last)
                .map_or(true, |elapsed| elapsed >= cooldown),
            None => true,
        };
        self.last_pressed = Some(now);

        if rising && !quiet {
            trace!("press inside cooldown dropped");
        }
        rising && quiet
    }
}

/// Turns raw button and switch readings into manual-set presses.
#[derive(Debug, Clone)]
pub struct InputDecoder {
    policy: ButtonPolicy,
    cooldown: MicrosDurationU64,
    window: DebounceWindow,
}

impl InputDecoder {
    pub const fn new(policy: ButtonPolicy, cooldown: MicrosDurationU64) -> Self {
        Self {
            policy,
            cooldown,
            window: DebounceWindow {
                was_pressed: false,
                last_pressed: None,
            },
        }
    }

    pub const fn from_config(config: &ClockConfig) -> Self {
        Self::new(config.button_policy, config.debounce_cooldown)
    }

    /// Level policy on an already normalized `pressed` signal.
    pub fn evaluate_level(
        &mut self,
        pressed: bool,
        switches: u16,
        now: TimerInstantU64<1_000_000>,
    ) -> Option<Press> {
        if self.window.accept_level(pressed, now, self.cooldown) {
            Some(Self::press(switches))
        } else {
            None
        }
    }

    /// Edge policy on a captured edge mask.
    pub fn evaluate_edge(&mut self, edges: u32, switches: u16) -> Option<Press> {
        if edges & SET_BUTTON_EDGE != 0 {
            Some(Self::press(switches))
        } else {
            None
        }
    }

    /// Reads the devices under the configured policy. Captured edges are
    /// acknowledged by the read itself.
    pub fn evaluate<B, S>(
        &mut self,
        button: &mut B,
        switches: &S,
        now: TimerInstantU64<1_000_000>,
    ) -> Option<Press>
    where
        B: ButtonDevice,
        S: SwitchDevice,
    {
        match self.policy {
            ButtonPolicy::Edge => {
                let edges = button.read_and_clear_edge();
                if edges != 0 {
                    debug!("edges acknowledged {=u32:#x}", edges);
                }
                self.evaluate_edge(edges, switches.read())
            }
            ButtonPolicy::LevelCooldown => {
                let pressed = button.read_level();
                self.evaluate_level(pressed, switches.read(), now)
            }
        }
    }

    fn press(switches: u16) -> Press {
        match ManualSetRequest::decode(switches) {
            Some(request) => Press::Set(request),
            None => {
                debug!("press with no field selected");
                Press::Unselected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at_ms, FakeButton, FakeSwitches};

    const COOLDOWN: MicrosDurationU64 = MicrosDurationU64::millis(250);

    #[test]
    fn test_decode_selector_and_value() {
        assert_eq!(ManualSetRequest::decode(0x0000), None);
        assert_eq!(ManualSetRequest::decode(0x003F), None);
        assert_eq!(
            ManualSetRequest::decode(0x0100 | 42),
            Some(ManualSetRequest { field: Field::Seconds, value: 42 })
        );
        assert_eq!(
            ManualSetRequest::decode(0x0200 | 7),
            Some(ManualSetRequest { field: Field::Minutes, value: 7 })
        );
        assert_eq!(
            ManualSetRequest::decode(0x0300 | 23),
            Some(ManualSetRequest { field: Field::Hours, value: 23 })
        );
    }

    #[test]
    fn test_decode_ignores_bits_6_7_and_above_9() {
        // bits 6 and 7 are not part of the value
        assert_eq!(
            ManualSetRequest::decode(0x01C5),
            Some(ManualSetRequest { field: Field::Seconds, value: 5 })
        );
        assert_eq!(ManualSetRequest::decode(0xFC00), None);
    }

    #[test]
    fn test_bit_six_is_outside_value_field() {
        use crate::clock::{Clock, ClockTime};

        let request = ManualSetRequest::decode(0x0140).unwrap();
        assert_eq!(request.field, Field::Seconds);
        assert_eq!(request.value, 0);

        // largest value the six bits can express
        let request = ManualSetRequest::decode(0x017F).unwrap();
        assert_eq!(request.value, 63);
        let mut clock = Clock::new(ClockTime::MIDNIGHT, 10);
        clock.apply_manual_set(request);
        assert_eq!(clock.snapshot().secs, 59);
    }

    #[test]
    fn test_sustained_press_fires_once() {
        let mut decoder = InputDecoder::new(ButtonPolicy::LevelCooldown, COOLDOWN);
        let mut fired = 0;
        // held for two seconds, sampled every 10 ms
        for ms in (0..2000).step_by(10) {
            if decoder.evaluate_level(true, 0x0105, at_ms(ms)).is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_long_press_released_with_bounce_fires_once() {
        let mut decoder = InputDecoder::new(ButtonPolicy::LevelCooldown, COOLDOWN);
        let mut fired = 0;
        for ms in (0..1000).step_by(10) {
            if decoder.evaluate_level(true, 0x0105, at_ms(ms)).is_some() {
                fired += 1;
            }
        }
        for (ms, pressed) in [(1000, false), (1003, true), (1006, false), (1010, false)] {
            if decoder.evaluate_level(pressed, 0x0105, at_ms(ms)).is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);

        // a real second press once the contacts settled
        assert!(decoder.evaluate_level(true, 0x0105, at_ms(1400)).is_some());
    }

    #[test]
    fn test_bounce_inside_cooldown_is_dropped() {
        let mut decoder = InputDecoder::new(ButtonPolicy::LevelCooldown, COOLDOWN);
        assert!(decoder.evaluate_level(true, 0x0105, at_ms(0)).is_some());
        assert!(decoder.evaluate_level(false, 0x0105, at_ms(3)).is_none());
        assert!(decoder.evaluate_level(true, 0x0105, at_ms(6)).is_none());
        assert!(decoder.evaluate_level(false, 0x0105, at_ms(9)).is_none());
        assert!(decoder.evaluate_level(true, 0x0105, at_ms(12)).is_none());
    }

    #[test]
    fn test_second_press_after_cooldown_fires() {
        let mut decoder = InputDecoder::new(ButtonPolicy::LevelCooldown, COOLDOWN);
        assert!(decoder.evaluate_level(true, 0x0105, at_ms(0)).is_some());
        assert!(decoder.evaluate_level(false, 0x0105, at_ms(100)).is_none());
        assert_eq!(
            decoder.evaluate_level(true, 0x0209, at_ms(400)),
            Some(Press::Set(ManualSetRequest { field: Field::Minutes, value: 9 }))
        );
    }

    #[test]
    fn test_unselected_press_consumes_window() {
        let mut decoder = InputDecoder::new(ButtonPolicy::LevelCooldown, COOLDOWN);
        assert_eq!(
            decoder.evaluate_level(true, 0x0005, at_ms(0)),
            Some(Press::Unselected)
        );
        // moving the selector while still holding does not fire
        assert!(decoder.evaluate_level(true, 0x0105, at_ms(500)).is_none());
    }

    #[test]
    fn test_edge_policy_reads_and_acknowledges() {
        let mut decoder = InputDecoder::new(ButtonPolicy::Edge, COOLDOWN);
        let mut button = FakeButton::default();
        let switches = FakeSwitches(0x0312);

        button.pressed = true;
        button.edges = SET_BUTTON_EDGE;
        assert_eq!(
            decoder.evaluate(&mut button, &switches, at_ms(0)),
            Some(Press::Set(ManualSetRequest { field: Field::Hours, value: 18 }))
        );
        assert_eq!(button.edges, 0);

        // still held, no new edge captured
        assert_eq!(decoder.evaluate(&mut button, &switches, at_ms(10)), None);
    }

    #[test]
    fn test_edge_of_other_button_is_cleared_but_ignored() {
        let mut decoder = InputDecoder::new(ButtonPolicy::Edge, COOLDOWN);
        let mut button = FakeButton::default();
        button.edges = 0b1;
        assert_eq!(decoder.evaluate(&mut button, &FakeSwitches(0x0105), at_ms(0)), None);
        assert_eq!(button.edges, 0);
    }
}
