//! Adapters implementing application ports

mod catalog_adapter;
mod location_adapter;

pub use catalog_adapter::CatalogAdapter;
pub use location_adapter::StaticLocationAdapter;
