//! Application services - Use case implementations

pub mod locator_service;
pub mod proximity_ranker;
pub mod reconciler;

pub use locator_service::{
    LocatorConfig, LocatorResult, LocatorService, OperatorSummary, PipelineEvent, RunSummary,
};
pub use proximity_ranker::{
    DEFAULT_MAX_DISTANCE_METERS, DEFAULT_MAX_STATIONS, ProximityRanker, rank,
};
pub use reconciler::{DEFAULT_MERGE_THRESHOLD_METERS, Reconciler};
