//! Domain layer for BikeLocator
//!
//! Contains the station model, coordinates with great-circle distance, and
//! the battery state-of-charge estimator. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
