//! Application layer for BikeLocator
//!
//! Contains the use cases (proximity ranking, cross-operator reconciliation
//! and the locator pipeline) and the ports they need from the outside world.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::{LocationPort, StationCatalogPort};
pub use services::{
    LocatorConfig, LocatorResult, LocatorService, OperatorSummary, PipelineEvent,
    ProximityRanker, Reconciler, RunSummary,
};
