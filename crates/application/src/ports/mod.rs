//! Ports - Interfaces to external collaborators
//!
//! Implemented by adapters in the infrastructure layer.

mod location_port;
mod station_catalog_port;

pub use location_port::LocationPort;
pub use station_catalog_port::StationCatalogPort;

#[cfg(test)]
pub use location_port::MockLocationPort;
#[cfg(test)]
pub use station_catalog_port::MockStationCatalogPort;
