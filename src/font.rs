use crate::hal::Glyph;

/// Lab board segment registers, active low: bit 0 = A .. bit 6 = G, bit 7 = DP.
pub const ACTIVE_LOW: [u8; 10] = [
    0xC0, 0xF9, 0xA4, 0xB0, 0x99, //
    0x92, 0x82, 0xF8, 0x80, 0x90,
];
pub const ACTIVE_LOW_BLANK: u8 = 0xFF;

/// MAX7219 no-decode mode: bit 7 = DP, bit 6 = A .. bit 0 = G.
pub const MAX7219: [u8; 10] = [
    0x7E, 0x30, 0x6D, 0x79, 0x33, //
    0x5B, 0x5F, 0x70, 0x7F, 0x7B,
];
pub const MAX7219_BLANK: u8 = 0x00;

pub fn active_low(glyph: Glyph) -> u8 {
    encode(glyph, &ACTIVE_LOW, ACTIVE_LOW_BLANK)
}

pub fn max7219(glyph: Glyph) -> u8 {
    encode(glyph, &MAX7219, MAX7219_BLANK)
}

fn encode(glyph: Glyph, table: &[u8; 10], blank: u8) -> u8 {
    match glyph {
        Glyph::Digit(d) => table.get(d as usize).copied().unwrap_or(blank),
        Glyph::Blank => blank,
    }
}
