//! Magnitude-scaled byte size formatting.
//!
//! Converts raw byte counts into human-readable values for log lines and
//! diagnostics (`format_size(1536)` -> `"1.50 KB"`). Binary magnitudes only:
//! each unit is 1024x the previous.

use serde::{Deserialize, Serialize};

/// A binary size magnitude, from bytes up to pebibytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeUnit {
    #[serde(rename = "B")]
    Byte,
    #[serde(rename = "KB")]
    KiloByte,
    #[serde(rename = "MB")]
    MegaByte,
    #[serde(rename = "GB")]
    GigaByte,
    #[serde(rename = "TB")]
    TeraByte,
    #[serde(rename = "PB")]
    PetaByte,
}

impl SizeUnit {
    /// Short label used in formatted output.
    pub fn abbrev(self) -> &'static str {
        match self {
            SizeUnit::Byte => "B",
            SizeUnit::KiloByte => "KB",
            SizeUnit::MegaByte => "MB",
            SizeUnit::GigaByte => "GB",
            SizeUnit::TeraByte => "TB",
            SizeUnit::PetaByte => "PB",
        }
    }

    /// Picks the largest unit that keeps the scaled value below 1024,
    /// capped at [`SizeUnit::PetaByte`].
    pub fn for_size(bytes: u64) -> SizeUnit {
        let mut unit = SizeUnit::Byte;
        let mut value = bytes as f64;
        while value >= 1024.0 && unit < SizeUnit::PetaByte {
            value /= 1024.0;
            unit = match unit {
                SizeUnit::Byte => SizeUnit::KiloByte,
                SizeUnit::KiloByte => SizeUnit::MegaByte,
                SizeUnit::MegaByte => SizeUnit::GigaByte,
                SizeUnit::GigaByte => SizeUnit::TeraByte,
                _ => SizeUnit::PetaByte,
            };
        }
        unit
    }

    fn exponent(self) -> i32 {
        match self {
            SizeUnit::Byte => 0,
            SizeUnit::KiloByte => 1,
            SizeUnit::MegaByte => 2,
            SizeUnit::GigaByte => 3,
            SizeUnit::TeraByte => 4,
            SizeUnit::PetaByte => 5,
        }
    }
}

/// Returns `bytes` expressed in `unit` (floating point, unrounded).
pub fn scaled_value(bytes: u64, unit: SizeUnit) -> f64 {
    bytes as f64 / 1024f64.powi(unit.exponent())
}

/// Formats `bytes` with two decimals and the auto-selected unit label.
///
/// Rounding follows Rust's `{:.2}` float formatting (round half to even).
pub fn format_size(bytes: u64) -> String {
    let unit = SizeUnit::for_size(bytes);
    format!("{:.2} {}", scaled_value(bytes, unit), unit.abbrev())
}
