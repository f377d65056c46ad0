use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use crate::model::{Location, Units};

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Colour scheme preference, kept for front ends that render one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Theme {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "system" => Ok(Theme::System),
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow!("Unknown theme '{value}'. Supported themes: system, light, dark.")),
        }
    }
}

/// Provider endpoints. Overridable for self-hosted Open-Meteo instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub forecast_url: String,
    pub geocoding_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// User preferences stored on disk.
///
/// Example TOML:
/// ```toml
/// units = "imperial"
/// theme = "dark"
///
/// [[favorites]]
/// id = 6094817
/// name = "Ottawa"
/// latitude = 45.41117
/// longitude = -75.69812
/// admin1 = "Ontario"
/// country = "Canada"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub units: Units,
    pub theme: Theme,
    pub api: ApiConfig,
    pub favorites: Vec<Location>,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_units(&mut self, units: Units) {
        self.units = units;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Saved favorite within coordinate tolerance of the given point.
    pub fn favorite_near(&self, latitude: f64, longitude: f64) -> Option<&Location> {
        self.favorites.iter().find(|f| f.is_near(latitude, longitude))
    }

    pub fn is_favorite(&self, location: &Location) -> bool {
        self.favorite_near(location.latitude(), location.longitude()).is_some()
    }

    /// Add a favorite. Returns `false` if one already sits at that spot.
    pub fn add_favorite(&mut self, location: Location) -> bool {
        if self.is_favorite(&location) {
            return false;
        }
        self.favorites.push(location);
        true
    }

    /// Remove favorites matching a slug, with or without a coordinate suffix.
    /// Returns the removed entries.
    pub fn remove_favorite(&mut self, slug: &str) -> Vec<Location> {
        let coords = crate::slug::split_coordinate_suffix(slug);
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.favorites).into_iter().partition(|f| match &coords {
                Some(c) => f.is_near(c.latitude, c.longitude),
                None => f.slug() == slug,
            });
        self.favorites = kept;
        removed
    }
}
