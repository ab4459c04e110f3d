//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the operator HTTP clients,
//! loads configuration and sets up logging.

pub mod adapters;
pub mod config;
pub mod telemetry;
pub mod wiring;

pub use adapters::{CatalogAdapter, StaticLocationAdapter};
pub use config::{AppConfig, DisplayConfig, LocationConfig, LoggingConfig};
pub use telemetry::{LoggingError, init_logging};
pub use wiring::build_locator_service;
