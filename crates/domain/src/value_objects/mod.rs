//! Value Objects - Immutable, identity-less domain primitives

mod battery;
mod coordinate;
mod operator;

pub use battery::{BatteryCurve, BatteryLevel};
pub use coordinate::{Coordinate, EARTH_DIAMETER_METERS};
pub use operator::Operator;
