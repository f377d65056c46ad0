use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::ApiConfig,
    model::{Location, WeatherSnapshot},
    provider::{Geocoder, WeatherProvider, truncate_body},
};

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,\
precipitation,weather_code,pressure_msl,wind_speed_10m,wind_direction_10m";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code,precipitation_probability";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset,precipitation_probability_max";
const FORECAST_DAYS: &str = "7";
const GEOCODING_RESULTS: &str = "10";
const USER_AGENT: &str = concat!("skycast/", env!("CARGO_PKG_VERSION"));

/// Open-Meteo forecast and geocoding APIs. No key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    forecast_url: String,
    geocoding_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            forecast_url: api.forecast_url.clone(),
            geocoding_url: api.geocoding_url.clone(),
            http,
        })
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)], what: &str) -> Result<String> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to Open-Meteo ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read Open-Meteo {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo {what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OmGeocodingResponse {
    #[serde(default)]
    results: Option<Vec<OmPlace>>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    id: i64,
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    admin1: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl From<OmPlace> for Location {
    fn from(p: OmPlace) -> Self {
        Location::new(
            p.id,
            p.name,
            p.latitude,
            p.longitude,
            p.admin1,
            p.country.unwrap_or_default(),
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn forecast(&self, location: &Location) -> Result<WeatherSnapshot> {
        let latitude = location.latitude().to_string();
        let longitude = location.longitude().to_string();

        tracing::debug!(location = %location, "fetching forecast");

        let body = self
            .get_text(
                &self.forecast_url,
                &[
                    ("latitude", latitude.as_str()),
                    ("longitude", longitude.as_str()),
                    ("current", CURRENT_FIELDS),
                    ("hourly", HOURLY_FIELDS),
                    ("daily", DAILY_FIELDS),
                    ("timezone", "auto"),
                    ("forecast_days", FORECAST_DAYS),
                ],
                "forecast",
            )
            .await?;

        let snapshot: WeatherSnapshot =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo forecast JSON")?;

        if let Err(err) = snapshot.validate() {
            tracing::warn!(%err, location = %location, "forecast arrays are inconsistent");
        }

        Ok(snapshot)
    }
}

#[async_trait]
impl Geocoder for OpenMeteoProvider {
    async fn search(&self, term: &str) -> Result<Vec<Location>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let body = self
            .get_text(
                &self.geocoding_url,
                &[
                    ("name", term),
                    ("count", GEOCODING_RESULTS),
                    ("language", "en"),
                    ("format", "json"),
                ],
                "geocoding",
            )
            .await?;

        let parsed: OmGeocodingResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo geocoding JSON")?;

        let places: Vec<Location> = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Location::from)
            .collect();

        tracing::debug!(term, results = places.len(), "geocoding search");
        Ok(places)
    }
}
