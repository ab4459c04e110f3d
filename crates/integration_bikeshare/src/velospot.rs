//! Velospot client
//!
//! Velospot reports raw pack voltages instead of charge, so ebike batteries
//! go through the configured [`BatteryCurve`](domain::BatteryCurve). Station
//! names carry a `" - City"` suffix and ebike names a trailing `e` marker,
//! both stripped here.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{Coordinate, EBike, Operator, Station, StationKey, StationStub};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::client::{BikeshareClient, CatalogCache, JsonHttp, RawId, VehicleKind};
use crate::config::VelospotConfig;
use crate::error::BikeshareError;

#[derive(Debug, Deserialize)]
struct RawStationRef {
    id: RawId,
    latitude: f64,
    longitude: f64,
    #[serde(default, rename = "outOfService", alias = "out_of_service")]
    out_of_service: bool,
}

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
    #[serde(rename = "type", default)]
    kind: Value,
    #[serde(default)]
    voltage: Option<f64>,
}

/// Client for the Velospot public API
#[derive(Debug, Clone)]
pub struct VelospotClient {
    http: JsonHttp,
    config: VelospotConfig,
    catalog: CatalogCache,
}

impl VelospotClient {
    /// Create a new Velospot client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: VelospotConfig) -> Result<Self, BikeshareError> {
        config.validate()?;
        Ok(Self {
            http: JsonHttp::new(config.timeout_secs)?,
            catalog: CatalogCache::new(config.catalog_cache_ttl_secs),
            config,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Parse the station list response, dropping out-of-service stations
    ///
    /// # Errors
    ///
    /// Returns `BikeshareError::ParseError` if the body is not a station list.
    pub fn parse_station_list(body: &str) -> Result<Vec<StationStub>, BikeshareError> {
        let raw: Vec<RawStationRef> = serde_json::from_str(body)
            .map_err(|e| BikeshareError::ParseError(format!("station list: {e}")))?;

        Ok(raw
            .into_iter()
            .filter(|entry| !entry.out_of_service)
            .filter_map(|entry| {
                let id = entry.id.to_string();
                match Coordinate::new(entry.latitude, entry.longitude) {
                    Ok(coordinate) => Some(StationStub::new(Operator::Velospot, id, coordinate)),
                    Err(e) => {
                        warn!(station_id = %id, error = %e, "Skipping Velospot station");
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
    pub fn parse_station_detail(&self, id: &str, body: &str) -> Result<Station, BikeshareError> {
        let raw: RawStationDetail = serde_json::from_str(body)
            .map_err(|e| BikeshareError::ParseError(format!("station {id}: {e}")))?;

        let coordinate = Coordinate::new(raw.latitude, raw.longitude)
            .map_err(|e| BikeshareError::ParseError(format!("station {id}: {e}")))?;

        let mut bikes = 0u32;
        let mut ebikes = Vec::new();
        for vehicle in raw.vehicles {
            match VehicleKind::from_json(&vehicle.kind) {
                Some(VehicleKind::Bike) => bikes += 1,
                Some(VehicleKind::EBike) => {
                    let name = vehicle.name.map(|n| n.to_string()).unwrap_or_default();
                    ebikes.push(EBike::new(
                        Operator::Velospot,
                        strip_ebike_marker(&name),
                        self.config.battery.estimate(vehicle.voltage).rounded(),
                    ));
                },
                None => {},
            }
        }

        Ok(Station::new(
            StationKey::new(Operator::Velospot, id),
            strip_city_suffix(&raw.name),
            coordinate,
            bikes,
            ebikes,
        ))
    }
}

#[async_trait]
impl BikeshareClient for VelospotClient {
    fn operator(&self) -> Operator {
        Operator::Velospot
    }

    #[instrument(skip(self))]
    async fn list_stations(&self) -> Result<Vec<StationStub>, BikeshareError> {
        if let Some(cached) = self.catalog.get().await {
            debug!(count = cached.len(), "Velospot station list cache hit");
            return Ok(cached.as_ref().clone());
        }

        let body = self.http.get_text(&self.endpoint("stations"), &[]).await?;
        let stations = Self::parse_station_list(&body)?;
        debug!(count = stations.len(), "Fetched Velospot station list");

        self.catalog.insert(Arc::new(stations.clone())).await;
        Ok(stations)
    }

    #[instrument(skip(self))]
    async fn station_detail(&self, id: &str) -> Result<Station, BikeshareError> {
        let body = self
            .http
            .get_text(&self.endpoint("stationDetails"), &[("stationId", id)])
            .await
            .map_err(|e| match e {
                BikeshareError::StationNotFound(_) => {
                    BikeshareError::StationNotFound(id.to_string())
                },
                other => other,
            })?;
        self.parse_station_detail(id, &body)
    }
}

/// Strip a trailing `" - City"` suffix from a station name
///
/// The suffix is whitespace, a dash, whitespace, then a single word without
/// whitespace or dashes running to the end of the name.
fn strip_city_suffix(name: &str) -> &str {
    let Some((start, _)) = name
        .char_indices()
        .rev()
        .take_while(|(_, c)| !c.is_whitespace() && *c != '-')
        .last()
    else {
        return name;
    };

    let mut head = name[..start].chars().rev();
    match (head.next(), head.next(), head.next()) {
        (Some(after), Some('-'), Some(before)) if after.is_whitespace() && before.is_whitespace() => {
            &name[..start - after.len_utf8() - 1 - before.len_utf8()]
        },
        _ => name,
    }
}

/// Strip the single trailing `e` Velospot appends to ebike names
fn strip_ebike_marker(name: &str) -> &str {
    name.strip_suffix('e').unwrap_or(name)
}
