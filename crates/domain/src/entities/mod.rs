//! Domain entities

mod merged_station;
mod ranked;
mod station;

pub use merged_station::MergedStation;
pub use ranked::{Ranked, sort_by_distance};
pub use station::{EBike, Station, StationKey, StationStub, sort_by_battery};
