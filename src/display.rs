use crate::clock::ClockTime;
use crate::font;
use crate::hal::{DisplaySink, Glyph};

pub const DIGITS: usize = 6;

/// Splits the time into digits, index 0 being the ones of the seconds and
/// index 5 the tens of the hours.
pub fn digits(time: &ClockTime) -> [Glyph; DIGITS] {
    [
        Glyph::from_value(time.secs % 10),
        Glyph::from_value(time.secs / 10),
        Glyph::from_value(time.mins % 10),
        Glyph::from_value(time.mins / 10),
        Glyph::from_value(time.hours % 10),
        Glyph::from_value(time.hours / 10),
    ]
}

/// Pushes all six digits to the sink, then flushes it.
pub fn render<D: DisplaySink>(time: &ClockTime, sink: &mut D) {
    for (index, glyph) in digits(time).into_iter().enumerate() {
        sink.set_digit(index as u8, glyph);
    }
    sink.flush();
}

/// Raw digit registers of one MAX7219 in no-decode mode. Digit register 1
/// holds display index 0; the two spare registers stay blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentFrame {
    raw: [u8; 8],
}

impl SegmentFrame {
    pub const fn new() -> Self {
        Self {
            raw: [font::MAX7219_BLANK; 8],
        }
    }

    pub fn raw(&self) -> &[u8; 8] {
        &self.raw
    }
}

impl Default for SegmentFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for SegmentFrame {
    fn set_digit(&mut self, index: u8, glyph: Glyph) {
        if let Some(slot) = self.raw.get_mut(index as usize) {
            *slot = font::max7219(glyph);
        }
    }
}
