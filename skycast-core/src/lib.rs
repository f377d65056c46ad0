//! Core library for the `skycast` weather app.
//!
//! This crate defines:
//! - The forecast model (current, hourly and daily zones in local time)
//! - A plain-language forecast statement generator
//! - Location slugs and their resolution (known cities, geocoding, coordinates)
//! - Open-Meteo providers behind `WeatherProvider` / `Geocoder` traits
//! - User preferences (units, theme, favorites) persisted as TOML
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod cities;
pub mod config;
pub mod gazetteer;
pub mod model;
pub mod provider;
pub mod resolve;
pub mod slug;
pub mod statement;
pub mod wmo;

pub use config::{ApiConfig, Config, Theme};
pub use model::{Location, SnapshotError, Units, WeatherSnapshot};
pub use provider::{Geocoder, OpenMeteoProvider, WeatherProvider};
pub use resolve::{LocationError, LocationResolver, ResolutionSource, ResolvedLocation};
pub use slug::{ParsedSlug, parse_location_slug};
pub use statement::generate as forecast_statement;
pub use wmo::WeatherBucket;
