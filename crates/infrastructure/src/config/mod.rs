//! Application configuration
//!
//! Sources are layered, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. `bikelocator.toml` in the working directory, or an explicit file
//! 3. `BIKELOCATOR_*` environment variables, with `__` between nested keys
//!    (e.g. `BIKELOCATOR_LOCATOR__MAX_STATIONS=5`)

mod sections;

use std::path::Path;

use application::LocatorConfig;
use domain::Coordinate;
use integration_bikeshare::{PubliBikeConfig, VelospotConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use sections::{DisplayConfig, LocationConfig, LoggingConfig};

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "bikelocator";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "BIKELOCATOR";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Ranking and merge policy
    #[serde(default)]
    pub locator: LocatorConfig,

    /// PubliBike API settings
    #[serde(default)]
    pub publibike: PubliBikeConfig,

    /// Velospot API settings, including its battery curve
    #[serde(default)]
    pub velospot: VelospotConfig,

    /// Default user position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationConfig>,

    /// Station table settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from defaults, a file and the environment
    ///
    /// With `path` set the file must exist; otherwise `bikelocator.toml` is
    /// read if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or parsed, or if the
    /// merged configuration fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(?path, "Configuration loaded");
        Ok(config)
    }

    /// Check every section
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` naming the first invalid section.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        self.locator
            .validate()
            .map_err(|e| invalid("locator", &e))?;
        self.publibike
            .validate()
            .map_err(|e| invalid("publibike", &e))?;
        self.velospot
            .validate()
            .map_err(|e| invalid("velospot", &e))?;
        self.default_location()?;
        if self.display.max_shown_ebikes == 0 {
            return Err(config::ConfigError::Message(
                "[display] max_shown_ebikes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured default user position, if any
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` if the position is out of range.
    pub fn default_location(&self) -> Result<Option<Coordinate>, config::ConfigError> {
        self.location
            .map(|l| l.to_coordinate().map_err(|e| invalid("location", &e)))
            .transpose()
    }

    /// Render the effective configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be represented in TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn invalid(section: &str, error: &dyn std::fmt::Display) -> config::ConfigError {
    config::ConfigError::Message(format!("[{section}] {error}"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use domain::Operator;

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.location.is_none());
        assert_eq!(config.locator.ranking.max_stations, 10);
        assert_eq!(config.locator.reconciler.preferred_operator, Operator::Velospot);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[locator]
max_distance_meters = 500
max_stations = 4
preferred_operator = "publibike"

[velospot]
timeout_secs = 3

[velospot.battery]
v_max = 41.0

[location]
latitude = 46.948
longitude = 7.447

[display]
max_shown_ebikes = 3

[logging]
json = true
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert!((config.locator.ranking.max_distance_meters - 500.0).abs() < f64::EPSILON);
        assert_eq!(config.locator.ranking.max_stations, 4);
        assert_eq!(config.locator.reconciler.preferred_operator, Operator::PubliBike);
        assert!((config.locator.reconciler.merge_threshold_meters - 12.0).abs() < f64::EPSILON);
        assert_eq!(config.velospot.timeout_secs, 3);
        assert!((config.velospot.battery.v_max - 41.0).abs() < f64::EPSILON);
        assert_eq!(config.publibike.timeout_secs, 10);
        assert!(config.default_location().unwrap().is_some());
        assert_eq!(config.display.max_shown_ebikes, 3);
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[locator]\nmax_stations = 0").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("[locator]"));
    }

    #[test]
    fn test_invalid_location_is_rejected() {
        let config = AppConfig {
            location: Some(LocationConfig {
                latitude: 120.0,
                longitude: 8.0,
            }),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[location]"));
    }

    #[test]
    fn test_zero_shown_ebikes_is_rejected() {
        let config = AppConfig {
            display: DisplayConfig {
                max_shown_ebikes: 0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip_keeps_sections() {
        let config = AppConfig {
            location: Some(LocationConfig {
                latitude: 47.0,
                longitude: 8.0,
            }),
            ..Default::default()
        };
        let rendered = config.to_toml().unwrap();

        assert!(rendered.contains("[locator]"));
        assert!(rendered.contains("max_distance_meters"));
        assert!(rendered.contains("preferred_operator = \"velospot\""));
        assert!(rendered.contains("[velospot.battery]"));
        assert!(rendered.contains("[location]"));

        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.locator, config.locator);
        assert_eq!(parsed.location, config.location);
    }

    #[test]
    fn test_toml_omits_unset_location() {
        let rendered = AppConfig::default().to_toml().unwrap();
        assert!(!rendered.contains("[location]"));
    }
}
