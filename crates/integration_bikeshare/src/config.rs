//! Operator API configuration

use domain::BatteryCurve;
use serde::{Deserialize, Serialize};

use crate::error::BikeshareError;

/// Configuration for the PubliBike public API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubliBikeConfig {
    /// Base URL of the API (without the `/v1/public` path)
    #[serde(default = "default_publibike_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How long the station list is cached, in seconds (0 to disable)
    #[serde(default = "default_catalog_cache_ttl_secs")]
    pub catalog_cache_ttl_secs: u64,
}

/// Configuration for the Velospot public API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelospotConfig {
    /// Base URL of the API
    #[serde(default = "default_velospot_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How long the station list is cached, in seconds (0 to disable)
    #[serde(default = "default_catalog_cache_ttl_secs")]
    pub catalog_cache_ttl_secs: u64,

    /// Voltage-to-charge curve for the fleet's battery packs
    #[serde(default)]
    pub battery: BatteryCurve,
}

fn default_publibike_base_url() -> String {
    "https://publibike-api.delroth.net".to_string()
}

fn default_velospot_base_url() -> String {
    "https://velospot.info/customer/public/api/pbvsng".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_catalog_cache_ttl_secs() -> u64 {
    300
}

impl Default for PubliBikeConfig {
    fn default() -> Self {
        Self {
            base_url: default_publibike_base_url(),
            timeout_secs: default_timeout_secs(),
            catalog_cache_ttl_secs: default_catalog_cache_ttl_secs(),
        }
    }
}

impl Default for VelospotConfig {
    fn default() -> Self {
        Self {
            base_url: default_velospot_base_url(),
            timeout_secs: default_timeout_secs(),
            catalog_cache_ttl_secs: default_catalog_cache_ttl_secs(),
            battery: BatteryCurve::default(),
        }
    }
}

impl PubliBikeConfig {
    /// Create a configuration pointing at a test server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 5,
            catalog_cache_ttl_secs: 0,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), BikeshareError> {
        validate_endpoint(&self.base_url, self.timeout_secs)
    }
}

impl VelospotConfig {
    /// Create a configuration pointing at a test server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 5,
            catalog_cache_ttl_secs: 0,
            battery: BatteryCurve::default(),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), BikeshareError> {
        validate_endpoint(&self.base_url, self.timeout_secs)?;
        self.battery
            .validate()
            .map_err(|e| BikeshareError::ConfigurationError(e.to_string()))
    }
}

fn validate_endpoint(base_url: &str, timeout_secs: u64) -> Result<(), BikeshareError> {
    if base_url.is_empty() {
        return Err(BikeshareError::ConfigurationError(
            "base_url must not be empty".to_string(),
        ));
    }
    url::Url::parse(base_url)
        .map_err(|e| BikeshareError::ConfigurationError(format!("invalid base_url: {e}")))?;

    if timeout_secs == 0 {
        return Err(BikeshareError::ConfigurationError(
            "timeout_secs must be greater than 0".to_string(),
        ));
    }
    Ok(())
}
