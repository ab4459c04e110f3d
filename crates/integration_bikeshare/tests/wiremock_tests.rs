//! Integration tests for the operator clients (wiremock-based)

use std::time::Duration;

use domain::{BatteryLevel, Operator, StationKey};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_bikeshare::{
    BikeshareClient, BikeshareError, PubliBikeClient, PubliBikeConfig, VelospotClient,
    VelospotConfig,
};

const fn publibike_stations_json() -> &'static str {
    r#"[
        { "id": 101, "latitude": 47.3875, "longitude": 8.5271, "state": { "id": 1, "name": "Active" } },
        { "id": 102, "latitude": 47.3900, "longitude": 8.5300, "state": { "id": 1, "name": "Active" } }
    ]"#
}

const fn publibike_detail_json() -> &'static str {
    r#"{
        "id": 101,
        "name": "Limmatplatz",
        "latitude": 47.3875,
        "longitude": 8.5271,
        "vehicles": [
            { "id": 1, "name": "500123", "type": { "id": 1, "name": "Bike" } },
            { "id": 2, "name": "700456", "type": { "id": 2, "name": "E-Bike" }, "ebike_battery_level": 72 }
        ]
    }"#
}

const fn velospot_stations_json() -> &'static str {
    r#"[
        { "id": "vs-1", "latitude": 47.3876, "longitude": 8.5272, "outOfService": false },
        { "id": "vs-2", "latitude": 47.3950, "longitude": 8.5400, "outOfService": true }
    ]"#
}

const fn velospot_detail_json() -> &'static str {
    r#"{
        "name": "Limmatplatz - Zürich",
        "latitude": 47.3876,
        "longitude": 8.5272,
        "vehicles": [
            { "name": "3301e", "type": 2, "voltage": 42.5 },
            { "name": "3302e", "type": 2, "voltage": 33.0 }
        ]
    }"#
}

#[tokio::test]
async fn publibike_lists_stations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/public/stations"))
        .respond_with(ResponseTemplate::new(200).set_body_string(publibike_stations_json()))
        .mount(&server)
        .await;

    let client = PubliBikeClient::new(PubliBikeConfig::for_testing(server.uri())).unwrap();
    let stations = client.list_stations().await.unwrap();

    assert_eq!(client.operator(), Operator::PubliBike);
    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0].key, StationKey::new(Operator::PubliBike, "101"));
}

#[tokio::test]
async fn publibike_fetches_station_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/public/stations/101"))
        .respond_with(ResponseTemplate::new(200).set_body_string(publibike_detail_json()))
        .mount(&server)
        .await;

    let client = PubliBikeClient::new(PubliBikeConfig::for_testing(server.uri())).unwrap();
    let station = client.station_detail("101").await.unwrap();

    assert_eq!(station.name(), "Limmatplatz");
    assert_eq!(station.bikes(), 1);
    assert_eq!(station.ebikes().len(), 1);
    assert_eq!(station.ebikes()[0].battery, BatteryLevel::Known(72.0));
}

#[tokio::test]
async fn publibike_unknown_station_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/public/stations/999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = PubliBikeClient::new(PubliBikeConfig::for_testing(server.uri())).unwrap();
    let result = client.station_detail("999").await;

    match result {
        Err(BikeshareError::StationNotFound(id)) => assert_eq!(id, "999"),
        other => panic!("expected StationNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn publibike_server_error_is_request_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/public/stations"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = PubliBikeClient::new(PubliBikeConfig::for_testing(server.uri())).unwrap();
    let result = client.list_stations().await;

    assert!(matches!(result, Err(BikeshareError::RequestFailed(_))));
}

#[tokio::test]
async fn publibike_caches_station_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/public/stations"))
        .respond_with(ResponseTemplate::new(200).set_body_string(publibike_stations_json()))
        .expect(1)
        .mount(&server)
        .await;

    let config = PubliBikeConfig {
        catalog_cache_ttl_secs: 60,
        ..PubliBikeConfig::for_testing(server.uri())
    };
    let client = PubliBikeClient::new(config).unwrap();

    let first = client.list_stations().await.unwrap();
    let second = client.list_stations().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn velospot_lists_in_service_stations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stations"))
        .respond_with(ResponseTemplate::new(200).set_body_string(velospot_stations_json()))
        .mount(&server)
        .await;

    let client = VelospotClient::new(VelospotConfig::for_testing(server.uri())).unwrap();
    let stations = client.list_stations().await.unwrap();

    assert_eq!(client.operator(), Operator::Velospot);
    assert_eq!(stations.len(), 1);
    assert_eq!(stations[0].key, StationKey::new(Operator::Velospot, "vs-1"));
}

#[tokio::test]
async fn velospot_fetches_station_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stationDetails"))
        .and(query_param("stationId", "vs-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(velospot_detail_json()))
        .mount(&server)
        .await;

    let client = VelospotClient::new(VelospotConfig::for_testing(server.uri())).unwrap();
    let station = client.station_detail("vs-1").await.unwrap();

    assert_eq!(station.name(), "Limmatplatz");
    assert_eq!(station.bikes(), 0);
    let ebikes: Vec<(&str, BatteryLevel)> = station
        .ebikes()
        .iter()
        .map(|e| (e.name.as_str(), e.battery))
        .collect();
    assert_eq!(
        ebikes,
        vec![
            ("3301", BatteryLevel::Known(100.0)),
            ("3302", BatteryLevel::Known(0.0)),
        ]
    );
}

#[tokio::test]
async fn velospot_malformed_detail_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stationDetails"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = VelospotClient::new(VelospotConfig::for_testing(server.uri())).unwrap();
    let result = client.station_detail("vs-1").await;

    assert!(matches!(result, Err(BikeshareError::ParseError(_))));
}

#[tokio::test]
async fn slow_operator_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(velospot_stations_json())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = VelospotConfig {
        timeout_secs: 1,
        ..VelospotConfig::for_testing(server.uri())
    };
    let client = VelospotClient::new(config).unwrap();
    let result = client.list_stations().await;

    assert!(matches!(result, Err(BikeshareError::Timeout { timeout_secs: 1 })));
}

#[tokio::test]
async fn unreachable_operator_is_connection_failure() {
    let client =
        PubliBikeClient::new(PubliBikeConfig::for_testing("http://127.0.0.1:1")).unwrap();
    let result = client.list_stations().await;

    assert!(matches!(result, Err(BikeshareError::ConnectionFailed(_))));
}
