//! Stations after cross-operator reconciliation

use serde::{Deserialize, Serialize};

use super::station::{EBike, Station, StationKey};
use crate::value_objects::Coordinate;

/// A station that may combine records from several operators
///
/// `sources` lists every operator-specific station that went into this
/// record, the identity station first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedStation {
    /// Identity taken from the preferred operator
    pub key: StationKey,
    /// Display name
    pub name: String,
    /// Station position
    pub coordinate: Coordinate,
    /// Number of plain bicycles
    pub bikes: u32,
    /// Ebikes of all sources, ordered by descending battery
    pub ebikes: Vec<EBike>,
    /// Operator-specific stations represented by this record
    pub sources: Vec<StationKey>,
}

impl MergedStation {
    /// Whether this record combines more than one operator station
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.sources.len() > 1
    }

    /// Number of ebikes
    #[must_use]
    pub fn ebike_count(&self) -> usize {
        self.ebikes.len()
    }
}

impl From<Station> for MergedStation {
    fn from(station: Station) -> Self {
        let key = station.key().clone();
        let name = station.name().to_string();
        let coordinate = station.coordinate();
        let bikes = station.bikes();
        Self {
            sources: vec![key.clone()],
            key,
            name,
            coordinate,
            bikes,
            ebikes: station.into_ebikes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{BatteryLevel, Operator};

    #[test]
    fn test_passthrough_keeps_station_data() {
        let station = Station::new(
            StationKey::new(Operator::Velospot, "v1"),
            "Rathaus",
            Coordinate::new_unchecked(47.1, 8.1),
            0,
            vec![EBike::new(Operator::Velospot, "117", BatteryLevel::Known(64.0))],
        );

        let merged = MergedStation::from(station);
        assert_eq!(merged.name, "Rathaus");
        assert_eq!(merged.ebike_count(), 1);
        assert_eq!(merged.sources, vec![StationKey::new(Operator::Velospot, "v1")]);
        assert!(!merged.is_merged());
    }
}
