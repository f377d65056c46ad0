//! Integration tests for the Open-Meteo provider using wiremock.

use skycast_core::{
    ApiConfig, Geocoder, LocationResolver, ResolutionSource, WeatherProvider,
    forecast_statement, model::Location, provider::OpenMeteoProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> OpenMeteoProvider {
    let api = ApiConfig {
        forecast_url: format!("{}/v1/forecast", server.uri()),
        geocoding_url: format!("{}/v1/search", server.uri()),
        timeout_secs: 5,
    };
    OpenMeteoProvider::new(&api).unwrap()
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "latitude": 45.42,
        "longitude": -75.69,
        "timezone": "America/Toronto",
        "utc_offset_seconds": -18000,
        "current": {
            "time": "2025-01-15T18:00",
            "temperature_2m": -8.5,
            "weather_code": 0,
            "relative_humidity_2m": 71,
            "is_day": 0,
            "wind_speed_10m": 12.4
        },
        "hourly": {
            "time": ["2025-01-15T19:00", "2025-01-15T20:00"],
            "temperature_2m": [-9.0, -9.6],
            "weather_code": [0, 1],
            "precipitation_probability": [0, 5]
        },
        "daily": {
            "time": ["2025-01-15", "2025-01-16"],
            "weather_code": [0, 71],
            "temperature_2m_max": [-4.0, -10.0],
            "temperature_2m_min": [-12.0, -15.0],
            "sunrise": ["2025-01-15T07:37", "2025-01-16T07:36"],
            "sunset": ["2025-01-15T16:44", "2025-01-16T16:45"],
            "precipitation_probability_max": [0, 80]
        }
    })
}

#[tokio::test]
async fn test_forecast_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "45.41117"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let ottawa = Location::new(6094817, "Ottawa", 45.41117, -75.69812, Some("Ontario".into()), "Canada");

    let snapshot = provider.forecast(&ottawa).await.unwrap();

    assert_eq!(snapshot.timezone.as_deref(), Some("America/Toronto"));
    assert_eq!(snapshot.current.weather_code, 0);
    assert_eq!(snapshot.hourly.time.len(), 2);
    assert!(snapshot.validate().is_ok());
    assert_eq!(
        forecast_statement(&snapshot),
        "Clear tonight, snow tomorrow, cooling down"
    );
}

#[tokio::test]
async fn test_forecast_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Internal error"
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let place = Location::from_coordinates(1.0, 2.0);

    let err = provider.forecast(&place).await.unwrap_err().to_string();
    assert!(err.contains("500"), "Error should mention 500 status: {}", err);
    assert!(err.contains("Internal error"), "Error should carry the body: {}", err);
}

#[tokio::test]
async fn test_forecast_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"current\": 42}"))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider
        .forecast(&Location::from_coordinates(1.0, 2.0))
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("Failed to parse Open-Meteo forecast JSON"));
}

#[tokio::test]
async fn test_geocoding_maps_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "kingston"))
        .and(query_param("count", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {"id": 3489854, "name": "Kingston", "latitude": 17.99702, "longitude": -76.79358,
                 "country": "Jamaica", "country_code": "JM"},
                {"id": 5992500, "name": "Kingston", "latitude": 44.22976, "longitude": -76.48098,
                 "admin1": "Ontario", "country": "Canada"}
            ],
            "generationtime_ms": 0.8
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let places = provider.search("kingston").await.unwrap();

    assert_eq!(places.len(), 2);
    assert_eq!(places[0].display(), "Kingston, Jamaica");
    assert_eq!(places[1].display(), "Kingston, Ontario, Canada");
    assert_eq!(places[1].slug(), "kingston-ontario-canada");
}

#[tokio::test]
async fn test_geocoding_without_results_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generationtime_ms": 0.3
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    assert!(provider.search("atlantis").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_search_skips_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    assert!(provider.search("   ").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_resolver_geocodes_once_per_term() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "kingston ontario"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {"id": 5992500, "name": "Kingston", "latitude": 44.22976, "longitude": -76.48098,
                 "admin1": "Ontario", "country": "Canada"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = LocationResolver::new(provider_for(&mock_server));

    for _ in 0..3 {
        let resolved = resolver.resolve("kingston-ontario-canada", &[]).await.unwrap();
        assert_eq!(resolved.source, ResolutionSource::Geocoded);
        assert_eq!(resolved.location.id(), 5992500);
    }
}
