use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::Select;
use skycast_core::{
    Config, Geocoder, Location, LocationResolver, OpenMeteoProvider, Theme, Units,
    WeatherProvider, parse_location_slug, slug,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather forecasts in plain words")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current conditions and the forecast for a location.
    Show {
        /// Location slug (e.g. "paris-ile-de-france-france") or free text.
        location: String,
    },

    /// Search for places by name.
    Search {
        query: String,
    },

    /// Manage saved locations.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Show or change preferences.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show how a slug is read: search term and embedded coordinates.
    Slug {
        slug: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// List saved locations.
    List,
    /// Search for a place and save it.
    Add { query: String },
    /// Remove a saved location by slug (optionally with coordinates).
    Remove { slug: String },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print current preferences and the config file path.
    Show,
    /// Set display units: "metric" or "imperial".
    Units { units: String },
    /// Set theme: "system", "light" or "dark".
    Theme { theme: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { location } => show(&location).await,
            Command::Search { query } => search(&query).await,
            Command::Favorites { action } => favorites(action).await,
            Command::Config { action } => configure(action),
            Command::Slug { slug } => {
                print!("{}", output::slug_report(&slug));
                Ok(())
            }
        }
    }
}

/// Free text ("Kingston, Ontario") becomes a slug; slugs pass through so a
/// coordinate suffix keeps its decimal points.
fn to_slug(input: &str) -> String {
    let input = input.trim();
    if input.contains(char::is_whitespace) || input.contains(',') {
        slug::slugify(input)
    } else {
        input.to_lowercase()
    }
}

async fn show(input: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let resolver = LocationResolver::new(OpenMeteoProvider::new(&config.api)?);

    let resolved = match resolver.resolve(&to_slug(input), &config.favorites).await {
        Ok(resolved) => resolved,
        Err(err) if err.is_not_found() => bail!("Location not found: {input} ({err})"),
        Err(err) => return Err(err.into()),
    };
    tracing::info!(location = %resolved.location, source = ?resolved.source, "resolved");

    let snapshot = resolver
        .geocoder()
        .forecast(&resolved.location)
        .await
        .with_context(|| format!("Failed to fetch forecast for {}", resolved.location))?;

    let report = output::Report {
        location: &resolved.location,
        is_favorite: config.is_favorite(&resolved.location),
        snapshot: &snapshot,
        units: config.units,
    };
    print!("{report}");
    Ok(())
}

async fn search(query: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = OpenMeteoProvider::new(&config.api)?;

    let places = provider.search(query).await?;
    if places.is_empty() {
        println!("No places found for '{query}'.");
        return Ok(());
    }

    print!("{}", output::place_list(&places));
    Ok(())
}

async fn favorites(action: FavoritesAction) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    match action {
        FavoritesAction::List => {
            if config.favorites.is_empty() {
                println!("No favorites saved. Add one with `skycast favorites add <place>`.");
            } else {
                print!("{}", output::place_list(&config.favorites));
            }
        }
        FavoritesAction::Add { query } => {
            let provider = OpenMeteoProvider::new(&config.api)?;
            let term = parse_location_slug(&to_slug(&query)).search_term;
            let mut places = provider.search(&query).await?;
            if places.is_empty() && term != query {
                places = provider.search(&term).await?;
            }

            let place = pick_place(places, &query)?;
            let display = place.display().to_string();
            if config.add_favorite(place) {
                config.save()?;
                println!("Saved {display}.");
            } else {
                println!("{display} is already a favorite.");
            }
        }
        FavoritesAction::Remove { slug } => {
            let removed = config.remove_favorite(&slug);
            if removed.is_empty() {
                bail!("No favorite matches '{slug}'. See `skycast favorites list`.");
            }
            config.save()?;
            for place in removed {
                println!("Removed {place}.");
            }
        }
    }

    Ok(())
}

struct Choice(Location);

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.2}, {:.2})", self.0, self.0.latitude(), self.0.longitude())
    }
}

fn pick_place(mut places: Vec<Location>, query: &str) -> anyhow::Result<Location> {
    match places.len() {
        0 => Err(anyhow!("No places found for '{query}'.")),
        1 => Ok(places.remove(0)),
        _ => {
            let choices: Vec<Choice> = places.into_iter().map(Choice).collect();
            let picked = Select::new("Which place did you mean?", choices)
                .prompt()
                .context("Selection cancelled")?;
            Ok(picked.0)
        }
    }
}

fn configure(action: ConfigAction) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    match action {
        ConfigAction::Show => {
            println!("Config file: {}", Config::config_file_path()?.display());
            println!("Units:       {}", config.units);
            println!("Theme:       {}", config.theme);
            println!("Favorites:   {}", config.favorites.len());
            println!("Forecast:    {}", config.api.forecast_url);
            println!("Geocoding:   {}", config.api.geocoding_url);
        }
        ConfigAction::Units { units } => {
            config.set_units(Units::try_from(units.as_str())?);
            config.save()?;
            println!("Units set to {}.", config.units);
        }
        ConfigAction::Theme { theme } => {
            config.set_theme(Theme::try_from(theme.as_str())?);
            config.save()?;
            println!("Theme set to {}.", config.theme);
        }
    }

    Ok(())
}
