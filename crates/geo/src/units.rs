//! Distance units accepted in shape links.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance unit for radii in shape parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// Nautical miles (the default)
    #[default]
    #[serde(rename = "nm")]
    NauticalMile,
    /// Kilometers
    #[serde(rename = "km")]
    Kilometer,
    /// Meters
    #[serde(rename = "m")]
    Meter,
}

impl DistanceUnit {
    /// Parses a unit name case-insensitively; anything unrecognised is nautical miles.
    pub fn from_param(unit: Option<&str>) -> Self {
        match unit.map(|u| u.trim().to_ascii_lowercase()).as_deref() {
            Some("km") => Self::Kilometer,
            Some("m") => Self::Meter,
            _ => Self::NauticalMile,
        }
    }

    /// Kilometers per one unit.
    pub fn km_per_unit(self) -> f64 {
        match self {
            Self::NauticalMile => 1.852,
            Self::Kilometer => 1.0,
            Self::Meter => 0.001,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NauticalMile => "nm",
            Self::Kilometer => "km",
            Self::Meter => "m",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kilometers per unit for a unit name.
///
/// Total: unknown or empty names behave like `nm`.
pub fn unit_to_km(unit: &str) -> f64 {
    DistanceUnit::from_param(Some(unit)).km_per_unit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_units() {
        assert_eq!(unit_to_km("km"), 1.0);
        assert_eq!(unit_to_km("m"), 0.001);
        assert_eq!(unit_to_km("nm"), 1.852);
    }

    #[test]
    fn test_unknown_defaults_to_nautical_miles() {
        assert_eq!(unit_to_km("bogus"), unit_to_km("nm"));
        assert_eq!(unit_to_km(""), 1.852);
        assert_eq!(DistanceUnit::from_param(None), DistanceUnit::NauticalMile);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(unit_to_km("KM"), 1.0);
        assert_eq!(DistanceUnit::from_param(Some(" M ")), DistanceUnit::Meter);
    }
}
