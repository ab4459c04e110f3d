//! Station locator pipeline
//!
//! Orchestrates one point-in-time lookup:
//!
//! 1. user location and both operators' station lists are fetched
//!    concurrently; any failure aborts the run,
//! 2. each operator's stubs are ranked by proximity,
//! 3. details for all selected stations are fetched concurrently; a failed
//!    station is dropped and the run continues,
//! 4. both detailed lists are reconciled into one distance-ordered list.
//!
//! Runs share no mutable state, so the service can be invoked repeatedly and
//! concurrently (e.g. on refresh while a previous run is still in flight).

use std::sync::Arc;
use std::time::Duration;

use domain::{Coordinate, MergedStation, Operator, Ranked, Station, StationStub};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{LocationPort, StationCatalogPort};
use crate::services::proximity_ranker::ProximityRanker;
use crate::services::reconciler::Reconciler;

/// Default time allowed for acquiring the user's position
const DEFAULT_LOCATION_TIMEOUT_SECS: u64 = 10;

/// Configuration for a locator run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Distance and count limits per operator
    #[serde(flatten)]
    pub ranking: ProximityRanker,

    /// Cross-operator merge policy
    #[serde(flatten)]
    pub reconciler: Reconciler,

    /// Seconds allowed for acquiring the user's position
    #[serde(default = "default_location_timeout_secs")]
    pub location_timeout_secs: u64,
}

const fn default_location_timeout_secs() -> u64 {
    DEFAULT_LOCATION_TIMEOUT_SECS
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            ranking: ProximityRanker::default(),
            reconciler: Reconciler::default(),
            location_timeout_secs: DEFAULT_LOCATION_TIMEOUT_SECS,
        }
    }
}

impl LocatorConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if a limit is out of range.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if !self.ranking.max_distance_meters.is_finite() || self.ranking.max_distance_meters < 0.0
        {
            return Err(ApplicationError::Configuration(
                "max_distance_meters must be a non-negative number".to_string(),
            ));
        }
        if self.ranking.max_stations == 0 {
            return Err(ApplicationError::Configuration(
                "max_stations must be greater than 0".to_string(),
            ));
        }
        if !self.reconciler.merge_threshold_meters.is_finite()
            || self.reconciler.merge_threshold_meters < 0.0
        {
            return Err(ApplicationError::Configuration(
                "merge_threshold_meters must be a non-negative number".to_string(),
            ));
        }
        if self.location_timeout_secs == 0 {
            return Err(ApplicationError::Configuration(
                "location_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Progress notifications emitted while a run advances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// The user's position is known
    LocationReady {
        /// Acquired position
        location: Coordinate,
    },
    /// An operator's station list was fetched
    CatalogReady {
        /// Operator
        operator: Operator,
        /// Number of in-service stations listed
        stations: usize,
    },
    /// Detail fetches for an operator settled
    DetailsReady {
        /// Operator
        operator: Operator,
        /// Stations fetched successfully
        fetched: usize,
        /// Stations dropped after a failed fetch
        failed: usize,
    },
    /// Both operators' stations were reconciled
    Reconciled {
        /// Stations in the final list
        stations: usize,
        /// Records combining two operators
        merged: usize,
    },
}

/// Per-operator counts for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSummary {
    /// Operator
    pub operator: Operator,
    /// In-service stations in the catalog
    pub listed: usize,
    /// Stations selected by proximity
    pub candidates: usize,
    /// Stations whose details were fetched
    pub fetched: usize,
    /// Stations dropped after a failed detail fetch
    pub failed: usize,
}

/// Counts describing one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Per-operator counts, in catalog order
    pub operators: Vec<OperatorSummary>,
    /// Records combining two operators
    pub merged: usize,
}

/// Outcome of a locator run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorResult {
    /// Position the ranking was computed from
    pub user_location: Coordinate,
    /// Reconciled stations, nearest first
    pub stations: Vec<Ranked<MergedStation>>,
    /// Run counts
    pub summary: RunSummary,
}

/// Stations that survived the detail fetch for one operator
struct DetailBatch {
    stations: Vec<Ranked<Station>>,
    summary: OperatorSummary,
}

/// Nearby-station locator across two operators
pub struct LocatorService {
    location: Arc<dyn LocationPort>,
    catalog_a: Arc<dyn StationCatalogPort>,
    catalog_b: Arc<dyn StationCatalogPort>,
    config: LocatorConfig,
}

impl std::fmt::Debug for LocatorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocatorService")
            .field("location", &"<LocationPort>")
            .field("catalog_a", &self.catalog_a.operator())
            .field("catalog_b", &self.catalog_b.operator())
            .field("config", &self.config)
            .finish()
    }
}

impl LocatorService {
    /// Create a locator over two operator catalogs
    ///
    /// `catalog_a` and `catalog_b` are passed to the reconciler in that order.
    #[must_use]
    pub fn new(
        location: Arc<dyn LocationPort>,
        catalog_a: Arc<dyn StationCatalogPort>,
        catalog_b: Arc<dyn StationCatalogPort>,
    ) -> Self {
        Self {
            location,
            catalog_a,
            catalog_b,
            config: LocatorConfig::default(),
        }
    }

    /// Set the locator configuration
    #[must_use]
    pub fn with_config(mut self, config: LocatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration
    #[must_use]
    pub const fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Run the pipeline once
    ///
    /// # Errors
    ///
    /// Returns `LocationUnavailable` or `CatalogUnavailable` when a mandatory
    /// input cannot be fetched. Station-level failures are not errors.
    pub async fn locate(&self) -> Result<LocatorResult, ApplicationError> {
        self.locate_with_progress(None).await
    }

    /// Run the pipeline once, publishing progress events
    ///
    /// # Errors
    ///
    /// See [`LocatorService::locate`].
    #[instrument(skip(self, progress))]
    pub async fn locate_with_progress(
        &self,
        progress: Option<&UnboundedSender<PipelineEvent>>,
    ) -> Result<LocatorResult, ApplicationError> {
        let (user_location, stubs_a, stubs_b) = tokio::try_join!(
            self.user_location(progress),
            Self::list_catalog(self.catalog_a.as_ref(), progress),
            Self::list_catalog(self.catalog_b.as_ref(), progress),
        )?;

        let listed_a = stubs_a.len();
        let listed_b = stubs_b.len();
        let candidates_a = self.config.ranking.rank(stubs_a, &user_location);
        let candidates_b = self.config.ranking.rank(stubs_b, &user_location);
        debug!(
            candidates_a = candidates_a.len(),
            candidates_b = candidates_b.len(),
            "Ranked station candidates"
        );

        let (batch_a, batch_b) = tokio::join!(
            Self::fetch_details(self.catalog_a.as_ref(), candidates_a, listed_a, progress),
            Self::fetch_details(self.catalog_b.as_ref(), candidates_b, listed_b, progress),
        );

        let stations = self
            .config
            .reconciler
            .reconcile(batch_a.stations, batch_b.stations);
        let merged = stations.iter().filter(|s| s.item.is_merged()).count();

        emit(
            progress,
            PipelineEvent::Reconciled {
                stations: stations.len(),
                merged,
            },
        );
        info!(stations = stations.len(), merged, "Locator run complete");

        Ok(LocatorResult {
            user_location,
            stations,
            summary: RunSummary {
                operators: vec![batch_a.summary, batch_b.summary],
                merged,
            },
        })
    }

    /// Acquire the user's position within the configured timeout
    async fn user_location(
        &self,
        progress: Option<&UnboundedSender<PipelineEvent>>,
    ) -> Result<Coordinate, ApplicationError> {
        let secs = self.config.location_timeout_secs;
        let location = timeout(Duration::from_secs(secs), self.location.current_location())
            .await
            .map_err(|_| {
                ApplicationError::LocationUnavailable(format!("timed out after {secs} seconds"))
            })?
            .map_err(|e| match e {
                ApplicationError::LocationUnavailable(_) => e,
                other => ApplicationError::LocationUnavailable(other.to_string()),
            })?;

        debug!(%location, "User location acquired");
        emit(progress, PipelineEvent::LocationReady { location });
        Ok(location)
    }

    /// List one operator's stations
    async fn list_catalog(
        catalog: &dyn StationCatalogPort,
        progress: Option<&UnboundedSender<PipelineEvent>>,
    ) -> Result<Vec<StationStub>, ApplicationError> {
        let operator = catalog.operator();
        let stubs = catalog.list_stations().await.map_err(|e| match e {
            ApplicationError::CatalogUnavailable { .. } => e,
            other => ApplicationError::catalog_unavailable(operator, other.to_string()),
        })?;

        debug!(%operator, count = stubs.len(), "Station list fetched");
        emit(
            progress,
            PipelineEvent::CatalogReady {
                operator,
                stations: stubs.len(),
            },
        );
        Ok(stubs)
    }

    /// Fetch details for every candidate, dropping the ones that fail
    async fn fetch_details(
        catalog: &dyn StationCatalogPort,
        candidates: Vec<Ranked<StationStub>>,
        listed: usize,
        progress: Option<&UnboundedSender<PipelineEvent>>,
    ) -> DetailBatch {
        let operator = catalog.operator();
        let candidate_count = candidates.len();

        let results = join_all(candidates.into_iter().map(|candidate| async move {
            let result = catalog.station_detail(&candidate.item.key.id).await;
            (candidate, result)
        }))
        .await;

        let mut stations = Vec::with_capacity(results.len());
        let mut failed = 0;
        for (candidate, result) in results {
            match result {
                Ok(station) => stations.push(Ranked::new(station, candidate.distance_meters)),
                Err(e) => {
                    failed += 1;
                    warn!(
                        %operator,
                        station_id = %candidate.item.key.id,
                        error = %e,
                        "Dropping station after failed detail fetch"
                    );
                },
            }
        }

        emit(
            progress,
            PipelineEvent::DetailsReady {
                operator,
                fetched: stations.len(),
                failed,
            },
        );

        DetailBatch {
            summary: OperatorSummary {
                operator,
                listed,
                candidates: candidate_count,
                fetched: stations.len(),
                failed,
            },
            stations,
        }
    }
}

/// Publish a progress event if anyone is listening
fn emit(progress: Option<&UnboundedSender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = progress {
        // A dropped receiver only means nobody is watching progress.
        let _ = tx.send(event);
    }
}
