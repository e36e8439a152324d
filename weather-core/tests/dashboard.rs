//! End-to-end flows: coordinator wired to the real client and a mock server.

use std::sync::Arc;

use weather_core::{
    ErrorKind, MemoryStore, PreferenceStore, RunMode, WeatherApiProvider, WeatherCoordinator,
    location::{FixedLocationProvider, UnsupportedLocationProvider},
    provider::mock_weather_data,
    recovery::policy_for,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn coordinator(server: &MockServer, mode: RunMode) -> WeatherCoordinator {
    WeatherCoordinator::new(
        Arc::new(WeatherApiProvider::with_base_url("KEY".to_string(), server.uri())),
        Arc::new(FixedLocationProvider::new(51.52, -0.11)),
        PreferenceStore::open(Box::new(MemoryStore::new())),
        policy_for(mode),
    )
}

#[tokio::test]
async fn startup_resolves_position_and_loads_forecast() {
    let server = MockServer::start().await;

    let mut body = serde_json::to_value(mock_weather_data()).unwrap();
    body["location"]["name"] = "London".into();
    body["location"]["country"] = "United Kingdom".into();

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", "51.52,-0.11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = coordinator(&server, RunMode::Production);
    coordinator.start().await;

    let state = coordinator.state();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    let location = state.current_location.unwrap();
    assert_eq!(location.name, "London");
    assert_eq!(location.country, "United Kingdom");
}

#[tokio::test]
async fn city_failure_in_production_ends_empty_and_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let coordinator = coordinator(&server, RunMode::Production);
    coordinator.fetch_for_city("Dhaka").await;

    let state = coordinator.state();
    assert!(state.payload.is_none());
    assert_eq!(state.error, Some(ErrorKind::Network));
    assert!(!state.loading);
}

#[tokio::test]
async fn city_failure_in_development_keeps_dashboard_populated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let coordinator = coordinator(&server, RunMode::Development);
    coordinator.fetch_for_city("Dhaka").await;

    let state = coordinator.state();
    assert_eq!(state.error, Some(ErrorKind::Parse));
    assert_eq!(
        state.payload.as_ref().map(|p| p.location.name.as_str()),
        Some("San Francisco")
    );
    assert!(!state.loading);
}

#[tokio::test]
async fn unsupported_geolocation_at_startup_reports_error() {
    let server = MockServer::start().await;

    let coordinator = WeatherCoordinator::new(
        Arc::new(WeatherApiProvider::with_base_url("KEY".to_string(), server.uri())),
        Arc::new(UnsupportedLocationProvider),
        PreferenceStore::open(Box::new(MemoryStore::new())),
        policy_for(RunMode::Development),
    );
    coordinator.start().await;

    let state = coordinator.state();
    assert_eq!(state.error, Some(ErrorKind::GeolocationUnsupported));
    assert!(state.payload.is_none());
    assert!(!state.loading);
}
