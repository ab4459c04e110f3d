//! Nearest-station selection
//!
//! Annotates station stubs with their distance to the user, drops the ones
//! that are too far away and keeps the closest few.

use domain::{Coordinate, Ranked, StationStub, sort_by_distance};
use serde::{Deserialize, Serialize};

/// Default radius around the user in meters
pub const DEFAULT_MAX_DISTANCE_METERS: f64 = 1000.0;

/// Default number of stations kept per operator
pub const DEFAULT_MAX_STATIONS: usize = 10;

/// Rank stubs by distance to `user`
///
/// Stubs further than `max_distance_meters` are discarded, the rest are
/// sorted ascending (ties keep input order) and truncated to `max_count`.
#[must_use]
pub fn rank(
    stubs: impl IntoIterator<Item = StationStub>,
    user: &Coordinate,
    max_distance_meters: f64,
    max_count: usize,
) -> Vec<Ranked<StationStub>> {
    let mut ranked: Vec<Ranked<StationStub>> = stubs
        .into_iter()
        .map(|stub| {
            let distance = user.distance_meters(&stub.coordinate);
            Ranked::new(stub, distance)
        })
        .filter(|entry| entry.distance_meters <= max_distance_meters)
        .collect();

    sort_by_distance(&mut ranked);
    ranked.truncate(max_count);
    ranked
}

/// Ranking limits applied to every operator's catalog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityRanker {
    /// Stations further away than this are ignored
    #[serde(default = "default_max_distance_meters")]
    pub max_distance_meters: f64,
    /// Number of closest stations to keep
    #[serde(default = "default_max_stations")]
    pub max_stations: usize,
}

const fn default_max_distance_meters() -> f64 {
    DEFAULT_MAX_DISTANCE_METERS
}

const fn default_max_stations() -> usize {
    DEFAULT_MAX_STATIONS
}

impl Default for ProximityRanker {
    fn default() -> Self {
        Self {
            max_distance_meters: DEFAULT_MAX_DISTANCE_METERS,
            max_stations: DEFAULT_MAX_STATIONS,
        }
    }
}

impl ProximityRanker {
    /// Create a ranker with explicit limits
    #[must_use]
    pub const fn new(max_distance_meters: f64, max_stations: usize) -> Self {
        Self {
            max_distance_meters,
            max_stations,
        }
    }

    /// Rank stubs with this ranker's limits
    #[must_use]
    pub fn rank(
        &self,
        stubs: impl IntoIterator<Item = StationStub>,
        user: &Coordinate,
    ) -> Vec<Ranked<StationStub>> {
        rank(stubs, user, self.max_distance_meters, self.max_stations)
    }
}
