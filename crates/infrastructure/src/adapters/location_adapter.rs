//! Location adapter - Implements LocationPort from a fixed position

use application::error::ApplicationError;
use application::ports::LocationPort;
use async_trait::async_trait;
use domain::Coordinate;

/// Location source backed by a position given on the command line or in
/// configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLocationAdapter {
    location: Option<Coordinate>,
}

impl StaticLocationAdapter {
    /// Create an adapter that always reports `location`
    pub const fn new(location: Coordinate) -> Self {
        Self {
            location: Some(location),
        }
    }

    /// Create an adapter from an optional position
    pub const fn from_option(location: Option<Coordinate>) -> Self {
        Self { location }
    }
}

#[async_trait]
impl LocationPort for StaticLocationAdapter {
    async fn current_location(&self) -> Result<Coordinate, ApplicationError> {
        self.location.ok_or_else(|| {
            ApplicationError::LocationUnavailable(
                "no position given; pass --lat/--lon or set [location] in the config".to_string(),
            )
        })
    }
}
