//! PubliBike client
//!
//! PubliBike reports ebike charge directly as a percentage. A reported zero
//! is the API's way of saying it does not know.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{BatteryLevel, Coordinate, EBike, Operator, Station, StationKey, StationStub};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::client::{BikeshareClient, CatalogCache, JsonHttp, RawId, VehicleKind};
use crate::config::PubliBikeConfig;
use crate::error::BikeshareError;

/// Raw station list entry
#[derive(Debug, Deserialize)]
struct RawStationRef {
    id: RawId,
    latitude: f64,
    longitude: f64,
}

/// Raw station detail response
#[derive(Debug, Deserialize)]
struct RawStationDetail {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    vehicles: Vec<RawVehicle>,
}

#[derive(Debug, Deserialize)]
struct RawVehicle {
    #[serde(default)]
    name: Option<RawId>,
    /// `{ "id": 1, "name": "Bike" }`; kept raw so odd entries are skipped
    #[serde(rename = "type", default)]
    kind: Value,
    #[serde(default)]
    ebike_battery_level: Option<f64>,
}

/// Client for the PubliBike public API
#[derive(Debug, Clone)]
pub struct PubliBikeClient {
    http: JsonHttp,
    config: PubliBikeConfig,
    catalog: CatalogCache,
}

impl PubliBikeClient {
    /// Create a new PubliBike client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: PubliBikeConfig) -> Result<Self, BikeshareError> {
        config.validate()?;
        Ok(Self {
            http: JsonHttp::new(config.timeout_secs)?,
            catalog: CatalogCache::new(config.catalog_cache_ttl_secs),
            config,
        })
    }

    fn stations_url(&self) -> String {
        format!(
            "{}/v1/public/stations",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Parse the station list response
    ///
    /// Entries with out-of-range coordinates are skipped.
    ///
    /// # Errors
    ///
    /// Returns `BikeshareError::ParseError` if the body is not a station list.
    pub fn parse_station_list(body: &str) -> Result<Vec<StationStub>, BikeshareError> {
        let raw: Vec<RawStationRef> = serde_json::from_str(body)
            .map_err(|e| BikeshareError::ParseError(format!("station list: {e}")))?;

        Ok(raw
            .into_iter()
            .filter_map(|entry| {
                let id = entry.id.to_string();
                match Coordinate::new(entry.latitude, entry.longitude) {
                    Ok(coordinate) => Some(StationStub::new(Operator::PubliBike, id, coordinate)),
                    Err(e) => {
                        warn!(station_id = %id, error = %e, "Skipping PubliBike station");
                        None
                    },
                }
            })
            .collect())
    }

    /// Parse a station detail response for station `id`
    ///
    /// # Errors
    ///
    /// Returns `BikeshareError::ParseError` if the body is malformed or the
    /// station position is out of range.
    pub fn parse_station_detail(id: &str, body: &str) -> Result<Station, BikeshareError> {
        let raw: RawStationDetail = serde_json::from_str(body)
            .map_err(|e| BikeshareError::ParseError(format!("station {id}: {e}")))?;

        let coordinate = Coordinate::new(raw.latitude, raw.longitude)
            .map_err(|e| BikeshareError::ParseError(format!("station {id}: {e}")))?;

        let mut bikes = 0u32;
        let mut ebikes = Vec::new();
        for vehicle in raw.vehicles {
            match VehicleKind::from_json(&vehicle.kind["id"]) {
                Some(VehicleKind::Bike) => bikes += 1,
                Some(VehicleKind::EBike) => ebikes.push(EBike::new(
                    Operator::PubliBike,
                    vehicle.name.map(|n| n.to_string()).unwrap_or_default(),
                    BatteryLevel::from_reported_percentage(vehicle.ebike_battery_level),
                )),
                None => {},
            }
        }

        Ok(Station::new(
            StationKey::new(Operator::PubliBike, id),
            raw.name,
            coordinate,
            bikes,
            ebikes,
        ))
    }
}

#[async_trait]
impl BikeshareClient for PubliBikeClient {
    fn operator(&self) -> Operator {
        Operator::PubliBike
    }

    #[instrument(skip(self))]
    async fn list_stations(&self) -> Result<Vec<StationStub>, BikeshareError> {
        if let Some(cached) = self.catalog.get().await {
            debug!(count = cached.len(), "PubliBike station list cache hit");
            return Ok(cached.as_ref().clone());
        }

        let body = self.http.get_text(&self.stations_url(), &[]).await?;
        let stations = Self::parse_station_list(&body)?;
        debug!(count = stations.len(), "Fetched PubliBike station list");

        self.catalog.insert(Arc::new(stations.clone())).await;
        Ok(stations)
    }

    #[instrument(skip(self))]
    async fn station_detail(&self, id: &str) -> Result<Station, BikeshareError> {
        let url = format!("{}/{id}", self.stations_url());
        let body = self.http.get_text(&url, &[]).await.map_err(|e| match e {
            BikeshareError::StationNotFound(_) => BikeshareError::StationNotFound(id.to_string()),
            other => other,
        })?;
        Self::parse_station_detail(id, &body)
    }
}
