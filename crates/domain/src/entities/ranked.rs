//! Distance-annotated values

use serde::{Deserialize, Serialize};

/// A value paired with its distance from the user in meters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked<T> {
    /// The ranked value
    pub item: T,
    /// Great-circle distance from the user in meters
    pub distance_meters: f64,
}

impl<T> Ranked<T> {
    /// Pair a value with its distance
    pub const fn new(item: T, distance_meters: f64) -> Self {
        Self {
            item,
            distance_meters,
        }
    }

    /// Replace the value, keeping the distance
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Ranked<U> {
        Ranked {
            item: f(self.item),
            distance_meters: self.distance_meters,
        }
    }
}

/// Stable ascending sort by distance
///
/// Entries at equal distance keep their relative order.
pub fn sort_by_distance<T>(entries: &mut [Ranked<T>]) {
    entries.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
}
