//! Catalog adapter - Implements StationCatalogPort using integration_bikeshare

use application::error::ApplicationError;
use application::ports::StationCatalogPort;
use async_trait::async_trait;
use domain::{Operator, Station, StationStub};
use integration_bikeshare::{BikeshareClient, BikeshareError};
use tracing::{debug, instrument};

/// Adapter exposing one operator client as a station catalog
pub struct CatalogAdapter<C> {
    client: C,
}

impl<C: BikeshareClient> std::fmt::Debug for CatalogAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogAdapter")
            .field("operator", &self.client.operator())
            .finish()
    }
}

impl<C: BikeshareClient> CatalogAdapter<C> {
    /// Wrap an operator client
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    fn station_error(operator: Operator, id: &str, error: &BikeshareError) -> ApplicationError {
        let reason = match error {
            BikeshareError::StationNotFound(_) => "unknown station".to_string(),
            other => other.to_string(),
        };
        ApplicationError::station_unavailable(operator, id, reason)
    }
}

#[async_trait]
impl<C: BikeshareClient> StationCatalogPort for CatalogAdapter<C> {
    fn operator(&self) -> Operator {
        self.client.operator()
    }

    #[instrument(skip(self), fields(operator = %self.client.operator()))]
    async fn list_stations(&self) -> Result<Vec<StationStub>, ApplicationError> {
        let stations = self.client.list_stations().await.map_err(|e| {
            ApplicationError::catalog_unavailable(self.client.operator(), e.to_string())
        })?;
        debug!(count = stations.len(), "Station catalog loaded");
        Ok(stations)
    }

    #[instrument(skip(self), fields(operator = %self.client.operator()))]
    async fn station_detail(&self, id: &str) -> Result<Station, ApplicationError> {
        self.client
            .station_detail(id)
            .await
            .map_err(|e| Self::station_error(self.client.operator(), id, &e))
    }
}
