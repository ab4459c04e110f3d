//! Bike-sharing operator identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// A bike-sharing operator whose station data is merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// PubliBike, reports ebike battery as a percentage
    PubliBike,
    /// Velospot, reports raw ebike battery voltage
    Velospot,
}

impl Operator {
    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PubliBike => "PubliBike",
            Self::Velospot => "Velospot",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Operator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "publibike" => Ok(Self::PubliBike),
            "velospot" => Ok(Self::Velospot),
            _ => Err(DomainError::UnknownOperator(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("PubliBike".parse::<Operator>().ok(), Some(Operator::PubliBike));
        assert_eq!("VELOSPOT".parse::<Operator>().ok(), Some(Operator::Velospot));
        assert!("nextbike".parse::<Operator>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Operator::PubliBike).expect("serialize");
        assert_eq!(json, "\"publibike\"");
        let op: Operator = serde_json::from_str("\"velospot\"").expect("deserialize");
        assert_eq!(op, Operator::Velospot);
    }

    #[test]
    fn test_display() {
        assert_eq!(Operator::Velospot.to_string(), "Velospot");
    }
}
