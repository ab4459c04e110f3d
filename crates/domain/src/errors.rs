//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinates outside the valid latitude/longitude range
    #[error(
        "Invalid coordinates ({latitude}, {longitude}): latitude must be -90 to 90, longitude must be -180 to 180"
    )]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Operator name not recognized
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
