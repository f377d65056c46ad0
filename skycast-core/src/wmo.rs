//! WMO weather interpretation codes as served by Open-Meteo.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmoCode {
    pub code: i32,
    pub description: &'static str,
    pub day_icon: &'static str,
    pub night_icon: &'static str,
}

const fn entry(
    code: i32,
    description: &'static str,
    day_icon: &'static str,
    night_icon: &'static str,
) -> WmoCode {
    WmoCode { code, description, day_icon, night_icon }
}

// Sorted by code for binary search.
static WMO_CODES: [WmoCode; 28] = [
    entry(0, "Clear sky", "sun", "moon"),
    entry(1, "Mainly clear", "sun", "moon"),
    entry(2, "Partly cloudy", "cloud_sun", "cloud_moon"),
    entry(3, "Overcast", "cloud", "cloud"),
    entry(45, "Fog", "cloud_fog", "cloud_fog"),
    entry(48, "Depositing rime fog", "cloud_fog", "cloud_fog"),
    entry(51, "Light drizzle", "cloud_drizzle", "cloud_drizzle"),
    entry(53, "Moderate drizzle", "cloud_drizzle", "cloud_drizzle"),
    entry(55, "Dense drizzle", "cloud_drizzle", "cloud_drizzle"),
    entry(56, "Light freezing drizzle", "cloud_sleet", "cloud_sleet"),
    entry(57, "Dense freezing drizzle", "cloud_sleet", "cloud_sleet"),
    entry(61, "Slight rain", "cloud_rain", "cloud_rain"),
    entry(63, "Moderate rain", "cloud_rain", "cloud_rain"),
    entry(65, "Heavy rain", "cloud_rain_heavy", "cloud_rain_heavy"),
    entry(66, "Light freezing rain", "cloud_sleet", "cloud_sleet"),
    entry(67, "Heavy freezing rain", "cloud_sleet", "cloud_sleet"),
    entry(71, "Slight snow fall", "cloud_snow", "cloud_snow"),
    entry(73, "Moderate snow fall", "cloud_snow", "cloud_snow"),
    entry(75, "Heavy snow fall", "cloud_snow", "cloud_snow"),
    entry(77, "Snow grains", "cloud_snow", "cloud_snow"),
    entry(80, "Slight rain showers", "cloud_sun_rain", "cloud_moon_rain"),
    entry(81, "Moderate rain showers", "cloud_rain", "cloud_rain"),
    entry(82, "Violent rain showers", "cloud_rain_heavy", "cloud_rain_heavy"),
    entry(85, "Slight snow showers", "cloud_snow", "cloud_snow"),
    entry(86, "Heavy snow showers", "cloud_snow", "cloud_snow"),
    entry(95, "Thunderstorm", "cloud_lightning", "cloud_lightning"),
    entry(96, "Thunderstorm with slight hail", "cloud_lightning", "cloud_lightning"),
    entry(99, "Thunderstorm with heavy hail", "cloud_lightning", "cloud_lightning"),
];

pub fn all() -> &'static [WmoCode] {
    &WMO_CODES
}

pub fn describe(code: i32) -> Option<&'static WmoCode> {
    WMO_CODES
        .binary_search_by_key(&code, |c| c.code)
        .ok()
        .map(|idx| &WMO_CODES[idx])
}

/// Human-readable description, "Unknown" for codes outside the table.
pub fn description(code: i32) -> &'static str {
    describe(code).map_or("Unknown", |c| c.description)
}

pub fn icon(code: i32, is_day: bool) -> &'static str {
    match describe(code) {
        Some(c) if is_day => c.day_icon,
        Some(c) => c.night_icon,
        None => "cloud_question",
    }
}

/// Coarse condition used when summarizing a forecast in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherBucket {
    Clear,
    PartlyCloudy,
    Overcast,
    Foggy,
    Rain,
    Snow,
    Storms,
}

impl WeatherBucket {
    /// Bucket a WMO code. Codes outside every range carry no signal.
    pub fn classify(code: i32) -> Option<Self> {
        match code {
            ..=1 => Some(Self::Clear),
            2 => Some(Self::PartlyCloudy),
            3 => Some(Self::Overcast),
            45..=48 => Some(Self::Foggy),
            51..=67 => Some(Self::Rain),
            71..=77 => Some(Self::Snow),
            80..=99 => Some(Self::Storms),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::PartlyCloudy => "partly cloudy",
            Self::Overcast => "overcast",
            Self::Foggy => "foggy",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Storms => "storms",
        }
    }

    pub fn is_precipitation(&self) -> bool {
        matches!(self, Self::Rain | Self::Snow | Self::Storms)
    }
}

impl fmt::Display for WeatherBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finer wording for the "tonight" clause, where drizzle and showers read
/// better than the coarse bucket.
pub fn tonight_phrase(code: i32) -> Option<&'static str> {
    let phrase = match code {
        51..=55 => "drizzle",
        56 | 57 => "freezing drizzle",
        61..=65 => "rain",
        66 | 67 => "freezing rain",
        80..=82 => "showers",
        85 | 86 => "snow showers",
        95..=99 => "storms",
        _ => return WeatherBucket::classify(code).map(|b| b.as_str()),
    };
    Some(phrase)
}
