//! Station catalog port
//!
//! One implementation per bike-sharing operator. Adapters in the
//! infrastructure layer translate operator-specific APIs into domain stations.

use async_trait::async_trait;
use domain::{Operator, Station, StationStub};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for listing and inspecting one operator's stations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StationCatalogPort: Send + Sync {
    /// Operator served by this catalog
    fn operator(&self) -> Operator;

    /// List all in-service stations
    ///
    /// Fails with [`ApplicationError::CatalogUnavailable`].
    async fn list_stations(&self) -> Result<Vec<StationStub>, ApplicationError>;

    /// Fetch the full snapshot of one station
    ///
    /// Fails with [`ApplicationError::StationUnavailable`].
    async fn station_detail(&self, id: &str) -> Result<Station, ApplicationError>;
}
