//! Ebike battery state of charge
//!
//! Operators report battery charge either as a percentage or as a raw pack
//! voltage. [`BatteryCurve`] converts voltage into an estimated percentage
//! using an inverse logistic discharge curve; [`BatteryLevel`] keeps an
//! unknown reading distinct from an empty battery.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Battery state of charge in percent, or unknown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum BatteryLevel {
    /// Percentage in `[0, 100]`
    Known(f64),
    /// No usable reading, never the same as 0%
    Unknown,
}

impl BatteryLevel {
    /// Build a level from a percentage, clamping into `[0, 100]`
    ///
    /// NaN maps to [`BatteryLevel::Unknown`].
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage.is_nan() {
            Self::Unknown
        } else {
            Self::Known(percentage.clamp(0.0, 100.0))
        }
    }

    /// Interpret a percentage as reported by a percentage-native operator
    ///
    /// A missing or zero reading is the operator's "no data" sentinel.
    #[must_use]
    pub fn from_reported_percentage(reported: Option<f64>) -> Self {
        match reported {
            Some(p) if p != 0.0 => Self::from_percentage(p),
            _ => Self::Unknown,
        }
    }

    /// The percentage, if known
    #[must_use]
    pub const fn percentage(&self) -> Option<f64> {
        match self {
            Self::Known(p) => Some(*p),
            Self::Unknown => None,
        }
    }

    /// Round a known level to a whole percent
    #[must_use]
    pub fn rounded(self) -> Self {
        match self {
            Self::Known(p) => Self::Known(p.round()),
            Self::Unknown => Self::Unknown,
        }
    }

    /// Ordering with the fullest battery first and unknown levels last
    #[must_use]
    pub fn cmp_descending(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Known(a), Self::Known(b)) => b.total_cmp(a),
            (Self::Known(_), Self::Unknown) => Ordering::Less,
            (Self::Unknown, Self::Known(_)) => Ordering::Greater,
            (Self::Unknown, Self::Unknown) => Ordering::Equal,
        }
    }
}

impl From<Option<f64>> for BatteryLevel {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unknown, Self::from_percentage)
    }
}

impl From<BatteryLevel> for Option<f64> {
    fn from(level: BatteryLevel) -> Self {
        level.percentage()
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(p) => write!(f, "{p:.0}%"),
            Self::Unknown => write!(f, "?"),
        }
    }
}

/// Logistic voltage-to-charge curve for a battery pack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryCurve {
    /// Fully charged voltage
    #[serde(default = "default_v_max")]
    pub v_max: f64,
    /// Fully discharged voltage
    #[serde(default = "default_v_min")]
    pub v_min: f64,
    /// Steepness factor of the logistic curve
    #[serde(default = "default_steepness")]
    pub steepness: f64,
    /// State of charge at the curve midpoint, in percent
    #[serde(default = "default_midpoint")]
    pub midpoint: f64,
}

const fn default_v_max() -> f64 {
    BatteryCurve::PACK_36V.v_max
}

const fn default_v_min() -> f64 {
    BatteryCurve::PACK_36V.v_min
}

const fn default_steepness() -> f64 {
    BatteryCurve::PACK_36V.steepness
}

const fn default_midpoint() -> f64 {
    BatteryCurve::PACK_36V.midpoint
}

impl Default for BatteryCurve {
    fn default() -> Self {
        Self::PACK_36V
    }
}

impl BatteryCurve {
    /// Empirical fit for the 36V packs used by voltage-native operators
    pub const PACK_36V: Self = Self {
        v_max: 42.3,
        v_min: 34.0,
        steepness: 0.03,
        midpoint: 50.0,
    };

    /// Estimate the state of charge for a voltage reading
    #[must_use]
    pub fn estimate(&self, voltage: Option<f64>) -> BatteryLevel {
        let Some(voltage) = voltage.filter(|v| !v.is_nan()) else {
            return BatteryLevel::Unknown;
        };
        if voltage >= self.v_max {
            return BatteryLevel::Known(100.0);
        }
        if voltage <= self.v_min {
            return BatteryLevel::Known(0.0);
        }
        let ratio = (self.v_max - voltage) / (voltage - self.v_min);
        BatteryLevel::from_percentage(self.midpoint - ratio.ln() / self.steepness)
    }

    /// Check the curve parameters
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` when the voltage range is empty
    /// or the steepness is not positive.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.v_max.partial_cmp(&self.v_min) != Some(Ordering::Greater) {
            return Err(DomainError::ValidationError(
                "v_max must be greater than v_min".to_string(),
            ));
        }
        if self.steepness.partial_cmp(&0.0) != Some(Ordering::Greater) {
            return Err(DomainError::ValidationError(
                "steepness must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
