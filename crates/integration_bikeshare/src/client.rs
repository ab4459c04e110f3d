//! Shared client plumbing for operator APIs
//!
//! [`BikeshareClient`] is the interface every operator client implements.
//! [`JsonHttp`] wraps the reqwest client with the error mapping used by all
//! operators, and [`CatalogCache`] keeps a fetched station list for a while.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::{Operator, Station, StationStub};
use moka::future::Cache;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::BikeshareError;

/// Trait for bike-sharing operator clients
#[async_trait]
pub trait BikeshareClient: Send + Sync {
    /// Operator served by this client
    fn operator(&self) -> Operator;

    /// List in-service stations
    async fn list_stations(&self) -> Result<Vec<StationStub>, BikeshareError>;

    /// Fetch the full snapshot of one station
    async fn station_detail(&self, id: &str) -> Result<Station, BikeshareError>;
}

/// Vehicle categories shared by both operators' type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VehicleKind {
    Bike,
    EBike,
}

impl VehicleKind {
    /// Map an operator type code; unknown codes are ignored by callers
    pub(crate) const fn from_type_id(id: u64) -> Option<Self> {
        match id {
            1 => Some(Self::Bike),
            2 => Some(Self::EBike),
            _ => None,
        }
    }

    /// Map a raw JSON type code; missing, null or non-numeric codes are unknown
    pub(crate) fn from_json(code: &Value) -> Option<Self> {
        code.as_u64().and_then(Self::from_type_id)
    }
}

/// Station id that operators encode either as a number or a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// JSON-over-HTTP helper with operator-independent error mapping
#[derive(Debug, Clone)]
pub(crate) struct JsonHttp {
    client: Client,
    timeout_secs: u64,
}

impl JsonHttp {
    pub(crate) fn new(timeout_secs: u64) -> Result<Self, BikeshareError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("BikeLocator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BikeshareError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// GET `url` and return the response body
    ///
    /// A 404 maps to [`BikeshareError::StationNotFound`] carrying `url`.
    pub(crate) async fn get_text(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, BikeshareError> {
        debug!(%url, "Requesting operator API");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BikeshareError::Timeout {
                        timeout_secs: self.timeout_secs,
                    }
                } else {
                    BikeshareError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BikeshareError::StationNotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(BikeshareError::RequestFailed(format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| BikeshareError::ParseError(e.to_string()))
    }
}

/// Time-limited cache for one operator's station list
#[derive(Debug, Clone)]
pub(crate) struct CatalogCache {
    inner: Option<Cache<(), Arc<Vec<StationStub>>>>,
}

impl CatalogCache {
    /// Cache entries for `ttl_secs` seconds; 0 disables caching
    pub(crate) fn new(ttl_secs: u64) -> Self {
        let inner = (ttl_secs > 0).then(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(ttl_secs))
                .build()
        });
        Self { inner }
    }

    pub(crate) async fn get(&self) -> Option<Arc<Vec<StationStub>>> {
        match &self.inner {
            Some(cache) => cache.get(&()).await,
            None => None,
        }
    }

    pub(crate) async fn insert(&self, stations: Arc<Vec<StationStub>>) {
        if let Some(cache) = &self.inner {
            cache.insert((), stations).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use domain::Coordinate;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_vehicle_kind_codes() {
        assert_eq!(VehicleKind::from_type_id(1), Some(VehicleKind::Bike));
        assert_eq!(VehicleKind::from_type_id(2), Some(VehicleKind::EBike));
        assert_eq!(VehicleKind::from_type_id(7), None);
    }

    #[test]
    fn test_vehicle_kind_from_json() {
        assert_eq!(VehicleKind::from_json(&json!(2)), Some(VehicleKind::EBike));
        assert_eq!(VehicleKind::from_json(&json!(9)), None);
        assert_eq!(VehicleKind::from_json(&json!(null)), None);
        assert_eq!(VehicleKind::from_json(&json!("2")), None);
        assert_eq!(VehicleKind::from_json(&json!(-1)), None);
    }

    #[test]
    fn test_raw_id_accepts_numbers_and_strings() {
        let ids: Vec<RawId> = serde_json::from_str(r#"[42, "abc-7"]"#).unwrap();
        assert_eq!(ids[0].to_string(), "42");
        assert_eq!(ids[1].to_string(), "abc-7");
    }

    #[tokio::test]
    async fn test_disabled_cache_never_hits() {
        let cache = CatalogCache::new(0);
        cache.insert(Arc::new(Vec::new())).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_enabled_cache_returns_inserted_list() {
        let cache = CatalogCache::new(60);
        let stations = vec![StationStub::new(
            Operator::PubliBike,
            "1",
            Coordinate::new_unchecked(47.0, 8.0),
        )];
        cache.insert(Arc::new(stations)).await;
        let cached = cache.get().await.expect("cached");
        assert_eq!(cached.len(), 1);
    }
}
