//! The Rover's holding-register map and the numeric encodings it uses.
//!
//! Every record the device exposes lives in a fixed span of 16-bit words.
//! The spans below are device-defined constants; a hardware variant with a
//! shifted map gets a new set of constants, not new literals in the decoder.

/// A contiguous run of holding registers backing one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Span {
    pub address: u16,
    pub count: u16,
}

/// Product model string, 8 words of packed character pairs.
pub const PRODUCT_MODEL: Span = Span { address: 0x000C, count: 8 };
/// State of charge, battery voltage/current and the two temperatures.
pub const BATTERY_STATE: Span = Span { address: 0x0100, count: 4 };
/// Panel voltage, current and charging power.
pub const PANEL_STATE: Span = Span { address: 0x0107, count: 3 };
/// Street light switch, write-only from this crate's point of view.
pub const STREET_LIGHT_SWITCH: Span = Span { address: 0x010A, count: 1 };
/// The ten per-day min/max/accumulator fields.
pub const DAY_STATISTICS: Span = Span { address: 0x010B, count: 10 };
/// Lifetime counters: operating days, over-discharges, full charges.
pub const HIST_COUNTERS: Span = Span { address: 0x0115, count: 3 };
/// Lifetime accumulators, four 32-bit values packed into word pairs.
pub const HIST_ACCUMULATORS: Span = Span { address: 0x0118, count: 8 };
/// Street light state/brightness and charging mode, one packed word.
pub const CHARGING_STATE: Span = Span { address: 0x0120, count: 1 };
/// Fault bits; the second word is reserved.
pub const FAULT_BITS: Span = Span { address: 0x0121, count: 2 };

/// Decode a signed-magnitude byte: bit 7 is the sign, the low seven bits
/// are the magnitude. The device uses this for temperatures instead of
/// two's complement. Negative zero (0x80) collapses to 0.
pub fn signed_magnitude(byte: u8) -> i16 {
    let magnitude = i16::from(byte & 0x7F);
    if byte & 0x80 != 0 { -magnitude } else { magnitude }
}

/// Assemble one of the lifetime accumulators from its word pair.
///
/// The device packs these with an 8-bit shift between the two words, not
/// the 16-bit shift a big-endian u32 pair would use. The quirk is kept
/// as-is until hardware testing says otherwise; see `HIST_ACCUMULATORS`.
pub fn accumulator_pair(hi: u16, lo: u16) -> u32 {
    (u32::from(hi) << 8) | u32::from(lo)
}
