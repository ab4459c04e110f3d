//! Bike-sharing stations as reported by a single operator

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::{BatteryLevel, Coordinate, Operator};

/// Operator-scoped station identity
///
/// Station ids are only unique within one operator's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StationKey {
    /// Operator owning the station
    pub operator: Operator,
    /// Station id within the operator's namespace
    pub id: String,
}

impl StationKey {
    /// Create a new station key
    pub fn new(operator: Operator, id: impl Into<String>) -> Self {
        Self {
            operator,
            id: id.into(),
        }
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operator, self.id)
    }
}

/// Minimal station record used for proximity ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationStub {
    /// Station identity
    pub key: StationKey,
    /// Station position
    pub coordinate: Coordinate,
}

impl StationStub {
    /// Create a new station stub
    pub fn new(operator: Operator, id: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            key: StationKey::new(operator, id),
            coordinate,
        }
    }
}

/// An electric bike parked at a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EBike {
    /// Operator owning the bike
    pub operator: Operator,
    /// Display name (usually a fleet number)
    pub name: String,
    /// Battery state of charge
    pub battery: BatteryLevel,
}

impl EBike {
    /// Create a new ebike
    pub fn new(operator: Operator, name: impl Into<String>, battery: BatteryLevel) -> Self {
        Self {
            operator,
            name: name.into(),
            battery,
        }
    }
}

/// Sort ebikes with the fullest battery first and unknown batteries last
///
/// The sort is stable: bikes with equal or unknown levels keep their
/// relative order.
pub fn sort_by_battery(ebikes: &mut [EBike]) {
    ebikes.sort_by(|a, b| a.battery.cmp_descending(&b.battery));
}

/// Full station snapshot from a single operator
///
/// Immutable once built; the ebike list is always ordered by
/// [`sort_by_battery`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    key: StationKey,
    name: String,
    coordinate: Coordinate,
    bikes: u32,
    ebikes: Vec<EBike>,
}

impl Station {
    /// Create a station snapshot
    #[must_use]
    pub fn new(
        key: StationKey,
        name: impl Into<String>,
        coordinate: Coordinate,
        bikes: u32,
        mut ebikes: Vec<EBike>,
    ) -> Self {
        sort_by_battery(&mut ebikes);
        Self {
            key,
            name: name.into(),
            coordinate,
            bikes,
            ebikes,
        }
    }

    /// Station identity
    #[must_use]
    pub const fn key(&self) -> &StationKey {
        &self.key
    }

    /// Operator owning the station
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.key.operator
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Station position
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Number of plain bicycles
    #[must_use]
    pub const fn bikes(&self) -> u32 {
        self.bikes
    }

    /// Ebikes ordered by descending battery
    #[must_use]
    pub fn ebikes(&self) -> &[EBike] {
        &self.ebikes
    }

    /// Take the ebikes out of the station
    #[must_use]
    pub fn into_ebikes(self) -> Vec<EBike> {
        self.ebikes
    }
}
