//! Application-level errors

use domain::{DomainError, Operator};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The user's position could not be determined
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// An operator's station list could not be fetched or parsed
    #[error("{operator} station list unavailable: {reason}")]
    CatalogUnavailable {
        /// Operator whose catalog failed
        operator: Operator,
        /// Human-readable cause
        reason: String,
    },

    /// A single station's details could not be fetched or parsed
    #[error("{operator} station {station_id} unavailable: {reason}")]
    StationUnavailable {
        /// Operator owning the station
        operator: Operator,
        /// Operator-scoped station id
        station_id: String,
        /// Human-readable cause
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Create a catalog error for an operator
    pub fn catalog_unavailable(operator: Operator, reason: impl Into<String>) -> Self {
        Self::CatalogUnavailable {
            operator,
            reason: reason.into(),
        }
    }

    /// Create a station error for an operator-scoped id
    pub fn station_unavailable(
        operator: Operator,
        station_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::StationUnavailable {
            operator,
            station_id: station_id.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error aborts a whole locator run
    ///
    /// Only station-level failures are recovered locally.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::StationUnavailable { .. })
    }
}
