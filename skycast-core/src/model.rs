use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::slug;

/// Two points closer than this (in degrees, on both axes) are the same place.
pub const COORDINATE_TOLERANCE: f64 = 0.01;

/// A wall-clock time in the forecast location's own time zone.
///
/// Parsed by splitting `YYYY-MM-DDTHH:MM[:SS]` on its separators; the value is
/// never converted through a time zone, so it reads the same wherever the
/// viewer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalTime {
    pub date: NaiveDate,
    pub hour: u32,
    pub minute: u32,
}

impl LocalTime {
    pub fn parse(raw: &str) -> Option<Self> {
        let (date, clock) = raw.trim().split_once('T')?;
        let date = NaiveDate::from_str(date).ok()?;

        let mut parts = clock.split(':');
        let hour: u32 = parts.next()?.parse().ok()?;
        let minute: u32 = match parts.next() {
            Some(m) => m.get(..2).unwrap_or(m).parse().ok()?,
            None => 0,
        };

        if hour > 23 || minute > 59 {
            return None;
        }

        Some(Self { date, hour, minute })
    }
}

/// Parse the date half of a local timestamp (or a bare `YYYY-MM-DD`).
pub fn parse_local_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.trim().split('T').next()?;
    NaiveDate::from_str(date).ok()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub time: String,
    pub temperature_2m: f64,
    pub weather_code: i32,
    #[serde(default)]
    pub relative_humidity_2m: Option<f64>,
    #[serde(default)]
    pub apparent_temperature: Option<f64>,
    #[serde(default)]
    pub is_day: Option<u8>,
    #[serde(default)]
    pub precipitation: Option<f64>,
    #[serde(default)]
    pub pressure_msl: Option<f64>,
    #[serde(default)]
    pub wind_speed_10m: Option<f64>,
    #[serde(default)]
    pub wind_direction_10m: Option<f64>,
}

impl CurrentConditions {
    pub fn local_time(&self) -> Option<LocalTime> {
        LocalTime::parse(&self.time)
    }

    /// Defaults to daytime when the provider did not say.
    pub fn is_day(&self) -> bool {
        self.is_day.is_none_or(|flag| flag != 0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourlySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<f64>,
    #[serde(default)]
    pub weather_code: Vec<i32>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub weather_code: Vec<i32>,
    #[serde(default)]
    pub temperature_2m_max: Vec<f64>,
    #[serde(default)]
    pub temperature_2m_min: Vec<f64>,
    #[serde(default)]
    pub sunrise: Vec<String>,
    #[serde(default)]
    pub sunset: Vec<String>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
}

impl DailySeries {
    /// Index of the entry whose date is `date`.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.time
            .iter()
            .position(|t| parse_local_date(t) == Some(date))
    }

    pub fn weather_code_at(&self, idx: usize) -> Option<i32> {
        self.weather_code.get(idx).copied()
    }

    pub fn max_at(&self, idx: usize) -> Option<f64> {
        self.temperature_2m_max.get(idx).copied()
    }

    pub fn min_at(&self, idx: usize) -> Option<f64> {
        self.temperature_2m_min.get(idx).copied()
    }
}

/// A forecast as returned by the provider: current conditions plus hourly and
/// daily parallel arrays, all in the location's local time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub utc_offset_seconds: Option<i32>,
    pub current: CurrentConditions,
    #[serde(default)]
    pub hourly: HourlySeries,
    #[serde(default)]
    pub daily: DailySeries,
}

#[derive(Debug, Clone, Copy)]
pub struct HourlySample {
    pub time: LocalTime,
    pub temperature: f64,
    pub weather_code: i32,
    pub precipitation_probability: Option<f64>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SnapshotError {
    #[error("{zone}.{field} has {found} entries, expected {expected}")]
    LengthMismatch {
        zone: &'static str,
        field: &'static str,
        expected: usize,
        found: usize,
    },
}

impl WeatherSnapshot {
    /// Check that every parallel array in a zone has the same length.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        self.validate_hourly()?;

        let d = &self.daily;
        check_parity(
            "daily",
            d.time.len(),
            &[
                ("weather_code", d.weather_code.len()),
                ("temperature_2m_max", d.temperature_2m_max.len()),
                ("temperature_2m_min", d.temperature_2m_min.len()),
                ("sunrise", d.sunrise.len()),
                ("sunset", d.sunset.len()),
                ("precipitation_probability_max", d.precipitation_probability_max.len()),
            ],
        )
    }

    pub fn validate_hourly(&self) -> Result<(), SnapshotError> {
        let h = &self.hourly;
        check_parity(
            "hourly",
            h.time.len(),
            &[
                ("temperature_2m", h.temperature_2m.len()),
                ("weather_code", h.weather_code.len()),
                ("precipitation_probability", h.precipitation_probability.len()),
            ],
        )
    }

    /// Hourly rows zipped by position. Rows with an unparseable timestamp are
    /// skipped. Callers should run [`Self::validate_hourly`] first; this
    /// truncates to the shortest array.
    pub fn hourly_samples(&self) -> impl Iterator<Item = HourlySample> + '_ {
        let h = &self.hourly;
        h.time
            .iter()
            .zip(&h.temperature_2m)
            .zip(&h.weather_code)
            .enumerate()
            .filter_map(move |(idx, ((time, temperature), code))| {
                Some(HourlySample {
                    time: LocalTime::parse(time)?,
                    temperature: *temperature,
                    weather_code: *code,
                    precipitation_probability: h
                        .precipitation_probability
                        .get(idx)
                        .copied()
                        .flatten(),
                })
            })
    }
}

// An empty optional array (the provider omitted the variable) is not a mismatch.
fn check_parity(
    zone: &'static str,
    expected: usize,
    fields: &[(&'static str, usize)],
) -> Result<(), SnapshotError> {
    for &(field, found) in fields {
        if found != expected && found != 0 {
            return Err(SnapshotError::LengthMismatch { zone, field, expected, found });
        }
    }
    Ok(())
}

/// Display units for temperatures and wind. Data is always fetched metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature(&self, celsius: f64) -> f64 {
        match self {
            Units::Metric => celsius,
            Units::Imperial => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn format_temperature(&self, celsius: f64) -> String {
        let symbol = match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        };
        format!("{:.0}{symbol}", self.temperature(celsius))
    }

    pub fn format_wind(&self, kmh: f64) -> String {
        match self {
            Units::Metric => format!("{kmh:.0} km/h"),
            Units::Imperial => format!("{:.0} mph", kmh / 1.609_344),
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Units::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

/// A named place. Immutable; `display` is derived from the name parts when
/// the value is built and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LocationRecord")]
pub struct Location {
    id: i64,
    name: String,
    latitude: f64,
    longitude: f64,
    admin1: Option<String>,
    country: String,
    display: String,
}

#[derive(Deserialize)]
struct LocationRecord {
    #[serde(default)]
    id: i64,
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    admin1: Option<String>,
    #[serde(default)]
    country: String,
}

impl From<LocationRecord> for Location {
    fn from(r: LocationRecord) -> Self {
        Location::new(r.id, r.name, r.latitude, r.longitude, r.admin1, r.country)
    }
}

impl Location {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        admin1: Option<String>,
        country: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let country = country.into();
        let admin1 = admin1.filter(|a| !a.trim().is_empty());

        let mut parts: Vec<&str> = vec![name.as_str()];
        if let Some(a) = admin1.as_deref().filter(|a| *a != name) {
            parts.push(a);
        }
        if !country.is_empty() {
            parts.push(country.as_str());
        }
        let display = parts.join(", ");

        Self { id, name, latitude, longitude, admin1, country, display }
    }

    /// Placeholder for a point we could not put a name to.
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self {
            id: 0,
            name: "Unknown Location".to_string(),
            latitude,
            longitude,
            admin1: None,
            country: "Unknown".to_string(),
            display: format!("{latitude}, {longitude}"),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn admin1(&self) -> Option<&str> {
        self.admin1.as_deref()
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn slug(&self) -> String {
        slug::location_slug(&self.name, self.admin1.as_deref(), &self.country)
    }

    pub fn slug_with_coordinates(&self) -> String {
        slug::with_coordinates(&self.slug(), self.latitude, self.longitude)
    }

    pub fn is_near(&self, latitude: f64, longitude: f64) -> bool {
        (self.latitude - latitude).abs() <= COORDINATE_TOLERANCE
            && (self.longitude - longitude).abs() <= COORDINATE_TOLERANCE
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_time_is_split_not_converted() {
        let t = LocalTime::parse("2025-01-15T18:30").expect("valid timestamp");
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!((t.hour, t.minute), (18, 30));

        let with_seconds = LocalTime::parse("2025-01-15T07:05:00").unwrap();
        assert_eq!((with_seconds.hour, with_seconds.minute), (7, 5));
    }

    #[test]
    fn local_time_rejects_garbage() {
        assert!(LocalTime::parse("2025-01-15").is_none());
        assert!(LocalTime::parse("not a time").is_none());
        assert!(LocalTime::parse("2025-01-15T25:00").is_none());
    }

    #[test]
    fn display_is_derived_from_parts() {
        let loc = Location::new(
            2643743,
            "London",
            51.50853,
            -0.12574,
            Some("England".into()),
            "United Kingdom",
        );
        assert_eq!(loc.display(), "London, England, United Kingdom");

        let no_admin = Location::new(1, "Singapore", 1.28967, 103.85007, None, "Singapore");
        assert_eq!(no_admin.display(), "Singapore, Singapore");

        let same_admin = Location::new(2, "Berlin", 52.52, 13.41, Some("Berlin".into()), "Germany");
        assert_eq!(same_admin.display(), "Berlin, Germany");
    }

    #[test]
    fn deserialize_recomputes_display() {
        let json = r#"{
            "id": 6094817,
            "name": "Ottawa",
            "latitude": 45.41117,
            "longitude": -75.69812,
            "admin1": "Ontario",
            "country": "Canada",
            "display": "Somewhere Else"
        }"#;
        let loc: Location = serde_json::from_str(json).unwrap();
        assert_eq!(loc.display(), "Ottawa, Ontario, Canada");
    }

    #[test]
    fn coordinate_placeholder() {
        let loc = Location::from_coordinates(45.13, -75.46);
        assert_eq!(loc.id(), 0);
        assert_eq!(loc.name(), "Unknown Location");
        assert_eq!(loc.country(), "Unknown");
        assert_eq!(loc.display(), "45.13, -75.46");
    }

    #[test]
    fn coordinate_tolerance_matching() {
        let favorite = Location::new(1, "Ottawa", 45.123, -75.456, None, "Canada");
        assert!(favorite.is_near(45.13, -75.46));
        assert!(!favorite.is_near(45.20, -75.46));
        assert!(!favorite.is_near(45.13, -75.50));
    }

    #[test]
    fn validate_reports_hourly_mismatch() {
        let mut snapshot = WeatherSnapshot::default();
        snapshot.hourly.time = vec!["2025-01-15T10:00".into(), "2025-01-15T11:00".into()];
        snapshot.hourly.temperature_2m = vec![1.0, 2.0];
        snapshot.hourly.weather_code = vec![0];

        let err = snapshot.validate().unwrap_err();
        assert_eq!(
            err,
            SnapshotError::LengthMismatch {
                zone: "hourly",
                field: "weather_code",
                expected: 2,
                found: 1,
            }
        );
        assert!(err.to_string().contains("hourly.weather_code"));
    }

    #[test]
    fn validate_accepts_omitted_optional_arrays() {
        let mut snapshot = WeatherSnapshot::default();
        snapshot.daily.time = vec!["2025-01-15".into(), "2025-01-16".into()];
        snapshot.daily.weather_code = vec![0, 61];
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn deserializes_open_meteo_payload() {
        let json = r#"{
            "latitude": 51.5,
            "longitude": -0.12,
            "timezone": "Europe/London",
            "current": {"time": "2025-01-15T18:00", "temperature_2m": 4.2, "weather_code": 3, "is_day": 0},
            "hourly": {
                "time": ["2025-01-15T19:00"],
                "temperature_2m": [3.9],
                "weather_code": [61],
                "precipitation_probability": [null]
            },
            "daily": {"time": ["2025-01-15"], "weather_code": [61], "temperature_2m_max": [6.0]}
        }"#;
        let snapshot: WeatherSnapshot = serde_json::from_str(json).unwrap();
        assert!(!snapshot.current.is_day());

        let samples: Vec<_> = snapshot.hourly_samples().collect();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].weather_code, 61);
        assert_eq!(samples[0].precipitation_probability, None);
        assert_eq!(snapshot.daily.max_at(0), Some(6.0));
        assert_eq!(snapshot.daily.min_at(0), None);
    }

    #[test]
    fn units_formatting() {
        assert_eq!(Units::Metric.format_temperature(21.4), "21°C");
        assert_eq!(Units::Imperial.format_temperature(0.0), "32°F");
        assert_eq!(Units::try_from("Imperial").unwrap(), Units::Imperial);
        assert!(Units::try_from("kelvin").is_err());
    }
}
