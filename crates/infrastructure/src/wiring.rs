//! Assembly of the locator pipeline from configuration

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{LocationPort, StationCatalogPort};
use application::LocatorService;
use domain::Coordinate;
use integration_bikeshare::{PubliBikeClient, VelospotClient};
use tracing::debug;

use crate::adapters::{CatalogAdapter, StaticLocationAdapter};
use crate::config::AppConfig;

/// Build a locator service with PubliBike as the `a` side and Velospot as
/// the `b` side
///
/// `location` overrides the configured default position.
///
/// # Errors
///
/// Returns `ApplicationError::Configuration` if an operator client cannot be
/// created or the configured position is invalid.
pub fn build_locator_service(
    config: &AppConfig,
    location: Option<Coordinate>,
) -> Result<LocatorService, ApplicationError> {
    let location = match location {
        Some(location) => Some(location),
        None => config
            .default_location()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?,
    };

    let publibike = PubliBikeClient::new(config.publibike.clone())
        .map_err(|e| ApplicationError::Configuration(format!("publibike: {e}")))?;
    let velospot = VelospotClient::new(config.velospot.clone())
        .map_err(|e| ApplicationError::Configuration(format!("velospot: {e}")))?;

    let location: Arc<dyn LocationPort> = Arc::new(StaticLocationAdapter::from_option(location));
    let catalog_a: Arc<dyn StationCatalogPort> = Arc::new(CatalogAdapter::new(publibike));
    let catalog_b: Arc<dyn StationCatalogPort> = Arc::new(CatalogAdapter::new(velospot));

    debug!("Locator service assembled");
    Ok(LocatorService::new(location, catalog_a, catalog_b).with_config(config.locator.clone()))
}
