//! Smaller configuration sections: user position, display and logging

use domain::{Coordinate, DomainError};
use serde::{Deserialize, Serialize};

/// Default user position used when none is given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl LocationConfig {
    /// Convert into a validated coordinate
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if the position is out of range.
    pub fn to_coordinate(self) -> Result<Coordinate, DomainError> {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Output settings for the station table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Ebikes shown per station in the battery column
    #[serde(default = "default_max_shown_ebikes")]
    pub max_shown_ebikes: usize,
}

const fn default_max_shown_ebikes() -> usize {
    6
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_shown_ebikes: default_max_shown_ebikes(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit logs as JSON lines instead of human-readable text
    #[serde(default)]
    pub json: bool,
}
