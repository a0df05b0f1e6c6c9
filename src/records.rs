//! Typed records decoded from the controller's register spans.
//!
//! Decoding is pure: each record is built from a fixed-length word array
//! and nothing else. The scaling factors and packings in here mirror the
//! Rover's register documentation, including its quirks (signed-magnitude
//! temperatures, the byte-packed charging state word, the 8-bit-shifted
//! lifetime accumulators). `Default` on every record is the zeroed state a
//! caller holds before a successful read.

use crate::registers::{accumulator_pair, signed_magnitude};

/// Decode the product model from its 8-word span.
///
/// Each word carries two ASCII characters, high byte first. The device pads
/// the name with two leading spaces, which are dropped; the result is
/// always 14 characters.
pub fn decode_product_model(words: &[u16; 8]) -> String {
    words
        .iter()
        .flat_map(|word| [(word >> 8) as u8, *word as u8])
        .skip(2)
        .map(char::from)
        .collect()
}

/// Solar panel readings.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct PanelState {
    /// Panel voltage in V.
    pub voltage: f32,
    /// Panel current in A.
    pub current: f32,
    /// Charging power in W.
    pub charging_power: f32,
}

impl PanelState {
    pub fn decode(words: &[u16; 3]) -> Self {
        Self {
            voltage: f32::from(words[0] as i16) * 0.1,
            current: f32::from(words[1] as i16) * 0.01,
            charging_power: f32::from(words[2] as i16),
        }
    }
}

/// Battery readings, including both temperature probes.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct BatteryState {
    /// State of charge in percent.
    pub state_of_charge: i16,
    /// Battery voltage in V.
    pub battery_voltage: f32,
    /// Charging current in A.
    pub charging_current: f32,
    /// Controller case temperature in °C.
    pub controller_temperature: f32,
    /// Battery probe temperature in °C.
    pub battery_temperature: f32,
}

impl BatteryState {
    pub fn decode(words: &[u16; 4]) -> Self {
        // The last word packs both temperatures, one signed-magnitude byte
        // each: battery in the low byte, controller in the high byte.
        Self {
            state_of_charge: words[0] as i16,
            battery_voltage: f32::from(words[1] as i16) * 0.1,
            charging_current: f32::from(words[2] as i16) * 0.01,
            controller_temperature: f32::from(signed_magnitude((words[3] >> 8) as u8)),
            battery_temperature: f32::from(signed_magnitude(words[3] as u8)),
        }
    }
}

/// Extremes and accumulators for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct DayStatistics {
    /// Lowest battery voltage of the day in V.
    pub battery_voltage_min: f32,
    /// Highest battery voltage of the day in V.
    pub battery_voltage_max: f32,
    /// Highest charge current of the day in A.
    pub max_charge_current: f32,
    /// Highest discharge current of the day in A.
    pub max_discharge_current: f32,
    /// Highest charge power of the day in W.
    pub max_charge_power: f32,
    /// Highest discharge power of the day in W.
    pub max_discharge_power: f32,
    /// Amp-hours charged into the battery today.
    pub charging_amp_hours: f32,
    /// Amp-hours drawn from the battery today.
    pub discharging_amp_hours: f32,
    /// Power generated today in Wh.
    pub power_generation: f32,
    /// Power consumed today in Wh.
    pub power_consumption: f32,
}

impl DayStatistics {
    pub fn decode(words: &[u16; 10]) -> Self {
        Self {
            battery_voltage_min: f32::from(words[0] as i16) * 0.1,
            battery_voltage_max: f32::from(words[1] as i16) * 0.1,
            max_charge_current: f32::from(words[2] as i16) * 0.01,
            max_discharge_current: f32::from(words[3] as i16) * 0.01,
            max_charge_power: f32::from(words[4] as i16),
            max_discharge_power: f32::from(words[5] as i16),
            charging_amp_hours: f32::from(words[6] as i16),
            discharging_amp_hours: f32::from(words[7] as i16),
            power_generation: f32::from(words[8] as i16),
            power_consumption: f32::from(words[9] as i16),
        }
    }
}

/// Lifetime statistics, assembled from two separate register spans.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct HistStatistics {
    /// Days the controller has been operating.
    pub operating_days: i16,
    /// Number of battery over-discharges.
    pub bat_over_discharges: i16,
    /// Number of battery full charges.
    pub bat_full_charges: i16,
    /// Cumulative amp-hours charged into the battery.
    pub bat_charging_amp_hours: u32,
    /// Cumulative amp-hours drawn from the battery.
    pub bat_discharging_amp_hours: u32,
    /// Cumulative power generated in kWh.
    pub power_generated: f32,
    /// Cumulative power consumed in kWh.
    pub power_consumed: f32,
}

impl HistStatistics {
    pub fn decode(counters: &[u16; 3], accumulators: &[u16; 8]) -> Self {
        Self {
            operating_days: counters[0] as i16,
            bat_over_discharges: counters[1] as i16,
            bat_full_charges: counters[2] as i16,
            bat_charging_amp_hours: accumulator_pair(accumulators[0], accumulators[1]),
            bat_discharging_amp_hours: accumulator_pair(accumulators[2], accumulators[3]),
            power_generated: accumulator_pair(accumulators[4], accumulators[5]) as f32 / 10000.0,
            power_consumed: accumulator_pair(accumulators[6], accumulators[7]) as f32 / 10000.0,
        }
    }
}

/// The charging mode reported in the low byte of the charging state word.
///
/// The enumeration is open: firmware revisions may report bytes this crate
/// does not know about, and those are carried through as [`Unrecognized`]
/// rather than rejected.
///
/// [`Unrecognized`]: ChargingMode::Unrecognized
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, serde::Serialize,
)]
pub enum ChargingMode {
    /// No read has populated this value yet.
    #[default]
    Undefined,
    Deactivated,
    Activated,
    Mppt,
    Equalizing,
    Boost,
    Floating,
    Overpower,
    /// A mode byte this crate does not know about.
    Unrecognized(u8),
}

impl From<u8> for ChargingMode {
    fn from(byte: u8) -> Self {
        match byte {
            0 => Self::Deactivated,
            1 => Self::Activated,
            2 => Self::Mppt,
            3 => Self::Equalizing,
            4 => Self::Boost,
            5 => Self::Floating,
            6 => Self::Overpower,
            other => Self::Unrecognized(other),
        }
    }
}

/// Street light and charging mode, packed into a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct ChargingState {
    /// Whether the street light output is switched on (bit 15).
    pub street_light_on: bool,
    /// Street light brightness, 0–100 (bits 8–14).
    pub street_light_brightness: u8,
    /// Charging mode (low byte).
    pub charging_mode: ChargingMode,
}

impl ChargingState {
    pub fn decode(words: &[u16; 1]) -> Self {
        let word = words[0];
        Self {
            street_light_on: word & (1 << 15) != 0,
            street_light_brightness: ((word >> 8) & 0x7F) as u8,
            charging_mode: ChargingMode::from(word as u8),
        }
    }
}

/// The set of fault flags raised by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[repr(transparent)]
pub struct FaultMask(u16);

impl FaultMask {
    pub const BAT_OVER_DISCHARGE: Self = Self(1 << 0);
    pub const BAT_OVER_VOLTAGE: Self = Self(1 << 1);
    pub const BAT_UNDER_VOLTAGE_WARNING: Self = Self(1 << 2);
    pub const LOAD_SHORT: Self = Self(1 << 3);
    pub const LOAD_OVERPOWER: Self = Self(1 << 4);
    pub const CONTROLLER_TEMP_HIGH: Self = Self(1 << 5);
    pub const AMBIENT_TEMP_HIGH: Self = Self(1 << 6);
    pub const PV_OVERPOWER: Self = Self(1 << 7);
    pub const PV_SHORT: Self = Self(1 << 8);
    pub const PV_OVER_VOLTAGE: Self = Self(1 << 9);
    pub const PV_COUNTER_CURRENT: Self = Self(1 << 10);
    pub const PV_WP_OVER_VOLTAGE: Self = Self(1 << 11);
    pub const PV_REVERSE_CONNECTED: Self = Self(1 << 12);
    pub const ANTI_REVERSE_MOS_SHORT: Self = Self(1 << 13);
    pub const CHARGE_MOS_SHORT: Self = Self(1 << 14);

    const NAMES: [(Self, &'static str); 15] = [
        (Self::BAT_OVER_DISCHARGE, "battery over-discharge"),
        (Self::BAT_OVER_VOLTAGE, "battery over-voltage"),
        (Self::BAT_UNDER_VOLTAGE_WARNING, "battery under-voltage warning"),
        (Self::LOAD_SHORT, "load short circuit"),
        (Self::LOAD_OVERPOWER, "load overpower"),
        (Self::CONTROLLER_TEMP_HIGH, "controller temperature too high"),
        (Self::AMBIENT_TEMP_HIGH, "ambient temperature too high"),
        (Self::PV_OVERPOWER, "PV overpower"),
        (Self::PV_SHORT, "PV short circuit"),
        (Self::PV_OVER_VOLTAGE, "PV over-voltage"),
        (Self::PV_COUNTER_CURRENT, "PV counter-current"),
        (Self::PV_WP_OVER_VOLTAGE, "PV working point over-voltage"),
        (Self::PV_REVERSE_CONNECTED, "PV reverse connected"),
        (Self::ANTI_REVERSE_MOS_SHORT, "anti-reverse MOS short"),
        (Self::CHARGE_MOS_SHORT, "charge MOS short"),
    ];

    /// Decode the two-word fault span. Only the first word carries flags
    /// and its top bit is reserved; the second word is reserved entirely.
    pub fn decode(words: &[u16; 2]) -> Self {
        Self(words[0] & !(1 << 15))
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// Human-readable names of the flags currently set.
    pub fn iter_names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl std::fmt::Display for FaultMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("no faults");
        }
        let mut first = true;
        for name in self.iter_names() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}
