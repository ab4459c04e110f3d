//! Bike-sharing operator integration
//!
//! HTTP clients for the two operators whose stations are merged by the
//! locator:
//!
//! - [PubliBike](https://publibike-api.delroth.net), which reports ebike
//!   charge as a percentage
//! - [Velospot](https://velospot.info), which reports raw pack voltage
//!
//! # Architecture
//!
//! Both clients implement [`BikeshareClient`]: a station list used for
//! proximity ranking and a per-station detail call returning bike counts and
//! ebikes. Station lists are cached for `catalog_cache_ttl_secs`.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_bikeshare::{BikeshareClient, VelospotClient, VelospotConfig};
//!
//! let client = VelospotClient::new(VelospotConfig::default())?;
//! let stations = client.list_stations().await?;
//! let detail = client.station_detail(&stations[0].key.id).await?;
//! ```

mod client;
mod config;
mod error;
mod publibike;
mod velospot;

pub use client::BikeshareClient;
pub use config::{PubliBikeConfig, VelospotConfig};
pub use error::BikeshareError;
pub use publibike::PubliBikeClient;
pub use velospot::VelospotClient;
