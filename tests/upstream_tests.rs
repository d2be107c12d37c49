//! Upstream clients against a fake server.

use std::sync::Arc;

use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::{Value, json};
use site_api::currents::{AggregateOptions, aggregate_currents};
use site_api::directory::Booking;
use site_api::fetch::BasicClient;
use site_api::fetch::auth::{ApiKey, UrlParam};
use site_api::infra::{
    acuity::AcuityClient, google_places::PlacesClient, noaa::NoaaClient, onebusaway::ObaClient,
};
use site_api::services::{PlacesApi, SchedulingApi, TideKind, TidesApi, TransitApi};
use site_api::stations::Station;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn station(id: &str) -> Station {
    Station {
        id: id.to_string(),
        name: format!("Station {id}"),
        lat: 47.5,
        lng: -122.5,
    }
}

fn currents_body(hours: usize) -> Value {
    let cp: Vec<Value> = (0..hours)
        .map(|h| {
            json!({
                "Time": format!("2024-06-01 {h:02}:00"),
                "Velocity_Major": 0.1 * h as f64,
                "meanFloodDir": 190,
                "meanEbbDir": 10,
                "Bin": "1",
                "Depth": "14"
            })
        })
        .collect();
    json!({"current_predictions": {"units": "knots", "cp": cp}})
}

#[tokio::test]
async fn test_currents_aggregation_end_to_end() {
    let server = MockServer::start_async().await;

    let good_a = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/prod/datagetter")
                .query_param("product", "currents_predictions")
                .query_param("station", "PUG1")
                .query_param("begin_date", "20240601")
                .query_param("application", "site-test");
            then.status(200).json_body(currents_body(24));
        })
        .await;
    let server_error = server
        .mock_async(|when, then| {
            when.method(GET).query_param("station", "PUG2");
            then.status(500).body("internal error");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).query_param("station", "PUG3");
            then.status(200)
                .json_body(json!({"error": {"message": "No Predictions data was found."}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).query_param("station", "PUG4");
            then.status(200).json_body(currents_body(12));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).query_param("station", "PUG5");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).query_param("station", "PUG6");
            then.status(200).json_body(currents_body(24));
        })
        .await;

    let api: Arc<dyn TidesApi> = Arc::new(NoaaClient::new(
        BasicClient::new().unwrap(),
        server.base_url(),
        "site-test",
    ));
    let stations: Vec<_> = (1..=6).map(|i| station(&format!("PUG{i}"))).collect();
    let options = AggregateOptions {
        date: day(),
        interval_minutes: 60,
        concurrency: 3,
    };

    let merged = aggregate_currents(api, &stations, &options).await;

    let ids: Vec<_> = merged.iter().map(|s| s.station.id.as_str()).collect();
    assert_eq!(ids, ["PUG1", "PUG6"]);
    assert_eq!(merged[0].predictions.len(), 24);
    assert_eq!(merged[0].predictions[13].time, "2024-06-01T13:00:00");
    assert_eq!(merged[1].station.name, "Station PUG6");

    good_a.assert_async().await;
    server_error.assert_async().await;
}

#[tokio::test]
async fn test_noaa_tide_predictions() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/prod/datagetter")
                .query_param("product", "predictions")
                .query_param("interval", "hilo")
                .query_param("range", "24")
                .query_param("station", "9447130");
            then.status(200).json_body(json!({
                "predictions": [
                    {"t": "2024-06-01 03:10", "v": "-1.502", "type": "L"},
                    {"t": "2024-06-01 10:02", "v": "11.370", "type": "H"}
                ]
            }));
        })
        .await;

    let client = NoaaClient::new(BasicClient::new().unwrap(), server.base_url(), "site-test");
    let events = client.tide_predictions("9447130", day(), 24).await.unwrap();

    mock.assert_async().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, TideKind::Low);
    assert_eq!(events[1].time, "2024-06-01T10:02:00");
    assert!((events[1].height_ft - 11.37).abs() < 1e-9);
}

#[tokio::test]
async fn test_noaa_tide_error_body_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/prod/datagetter");
            then.status(200)
                .json_body(json!({"error": {"message": "Wrong Station ID"}}));
        })
        .await;

    let client = NoaaClient::new(BasicClient::new().unwrap(), server.base_url(), "site-test");
    let err = client.tide_predictions("0000000", day(), 48).await.unwrap_err();
    assert!(err.to_string().contains("Wrong Station ID"));
}

#[tokio::test]
async fn test_onebusaway_arrivals_with_key() {
    let server = MockServer::start_async().await;
    let now = 1_717_250_000_000_i64;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/where/arrivals-and-departures-for-stop/1_75403.json")
                .query_param("key", "test-key")
                .query_param("minutesAfter", "30");
            then.status(200).json_body(json!({
                "code": 200,
                "currentTime": now,
                "text": "OK",
                "version": 2,
                "data": {
                    "entry": {
                        "stopId": "1_75403",
                        "arrivalsAndDepartures": [
                            {
                                "routeShortName": "49",
                                "tripHeadsign": "University District",
                                "scheduledArrivalTime": now + 12 * 60_000,
                                "predictedArrivalTime": 0
                            },
                            {
                                "routeShortName": "8",
                                "tripHeadsign": "Seattle Center",
                                "scheduledArrivalTime": now + 2 * 60_000,
                                "predictedArrivalTime": now + 4 * 60_000
                            }
                        ]
                    },
                    "references": {}
                }
            }));
        })
        .await;

    let authed = UrlParam {
        inner: BasicClient::new().unwrap(),
        param_name: "key".to_string(),
        key: "test-key".to_string(),
    };
    let client = ObaClient::new(authed, server.base_url());
    let arrivals = client.arrivals("1_75403", 30).await.unwrap();

    mock.assert_async().await;
    assert_eq!(arrivals.len(), 2);
    assert_eq!(arrivals[0].route, "8");
    assert!(arrivals[0].realtime);
    assert_eq!(arrivals[0].minutes_away, 4);
    assert_eq!(arrivals[1].route, "49");
    assert!(!arrivals[1].realtime);
    assert_eq!(arrivals[1].minutes_away, 12);
}

#[tokio::test]
async fn test_onebusaway_error_code() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({
                "code": 401,
                "currentTime": 0,
                "text": "permission denied"
            }));
        })
        .await;

    let client = ObaClient::new(BasicClient::new().unwrap(), server.base_url());
    let err = client.arrivals("1_1", 60).await.unwrap_err();
    assert!(err.to_string().contains("permission denied"));
}

#[tokio::test]
async fn test_places_search_sends_key_and_field_mask() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/places:searchText")
                .header("x-goog-api-key", "places-key")
                .header_exists("x-goog-fieldmask")
                .json_body_partial(r#"{"textQuery": "sauna seattle"}"#);
            then.status(200).json_body(json!({
                "places": [{
                    "id": "ChIJ1",
                    "displayName": {"text": "Float Sauna", "languageCode": "en"},
                    "formattedAddress": "1 Alki Ave SW, Seattle",
                    "location": {"latitude": 47.58, "longitude": -122.41},
                    "rating": 4.9
                }]
            }));
        })
        .await;

    let authed = ApiKey::new(BasicClient::new().unwrap(), "X-Goog-Api-Key", "places-key").unwrap();
    let client = PlacesClient::new(authed, server.base_url());
    let places = client.search("sauna seattle").await.unwrap();

    mock.assert_async().await;
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].name, "Float Sauna");
    assert_eq!(places[0].lat, Some(47.58));
}

#[tokio::test]
async fn test_places_empty_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/places:searchText");
            then.status(200).json_body(json!({}));
        })
        .await;

    let client = PlacesClient::new(BasicClient::new().unwrap(), server.base_url());
    assert!(client.search("nothing here").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_acuity_availability_keyed_by_date() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/scheduling/v1/availability/times")
                .query_param("owner", "123")
                .query_param("appointmentTypeId", "456")
                .query_param("calendarId", "789")
                .query_param("startDate", "2024-06-01");
            then.status(200).json_body(json!({
                "2024-06-01": [
                    {"time": "2024-06-01T09:00:00-0700", "slotsAvailable": 5},
                    {"time": "2024-06-01T11:00:00-0700", "slotsAvailable": 0}
                ]
            }));
        })
        .await;

    let booking = Booking {
        owner: "123".to_string(),
        appointment_type_id: "456".to_string(),
        calendar_id: Some("789".to_string()),
        timezone: "America/Los_Angeles".to_string(),
    };
    let client = AcuityClient::new(BasicClient::new().unwrap(), server.base_url());
    let slots = client.availability(&booking, day()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].slots_available, 5);
    assert_eq!(slots[1].time, "2024-06-01T11:00:00-0700");
}

#[tokio::test]
async fn test_acuity_upstream_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(503);
        })
        .await;

    let booking = Booking {
        owner: "1".to_string(),
        appointment_type_id: "2".to_string(),
        calendar_id: None,
        timezone: "UTC".to_string(),
    };
    let client = AcuityClient::new(BasicClient::new().unwrap(), server.base_url());
    let err = client.availability(&booking, day()).await.unwrap_err();
    assert!(err.to_string().contains("503"));
}
