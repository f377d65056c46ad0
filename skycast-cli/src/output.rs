use std::fmt::{self, Write as _};

use skycast_core::{
    Location, Units, WeatherSnapshot, cities, forecast_statement,
    model::parse_local_date,
    parse_location_slug,
    slug::split_coordinate_suffix,
    wmo,
};

const HOURS_SHOWN: usize = 6;

/// Current conditions, summary and the short-range forecast for one place.
pub struct Report<'a> {
    pub location: &'a Location,
    pub is_favorite: bool,
    pub snapshot: &'a WeatherSnapshot,
    pub units: Units,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = &self.snapshot.current;
        let units = self.units;

        write!(f, "{}", self.location)?;
        if self.is_favorite {
            f.write_str(" ★")?;
        }
        writeln!(f)?;

        write!(
            f,
            "Now: {}, {}",
            units.format_temperature(current.temperature_2m),
            wmo::description(current.weather_code),
        )?;
        let mut details = Vec::new();
        if let Some(t) = current.apparent_temperature {
            details.push(format!("feels like {}", units.format_temperature(t)));
        }
        if let Some(h) = current.relative_humidity_2m {
            details.push(format!("humidity {h:.0}%"));
        }
        if let Some(w) = current.wind_speed_10m {
            details.push(format!("wind {}", units.format_wind(w)));
        }
        if !details.is_empty() {
            write!(f, " ({})", details.join(", "))?;
        }
        writeln!(f)?;
        writeln!(f, "{}", forecast_statement(self.snapshot))?;

        if let Some(now) = current.local_time() {
            let hours: Vec<_> = self
                .snapshot
                .hourly_samples()
                .filter(|s| s.time > now)
                .take(HOURS_SHOWN)
                .collect();
            if !hours.is_empty() {
                writeln!(f, "\nNext hours:")?;
                for h in hours {
                    write!(
                        f,
                        "  {:02}:{:02}  {:>5}  {}",
                        h.time.hour,
                        h.time.minute,
                        units.format_temperature(h.temperature),
                        wmo::description(h.weather_code),
                    )?;
                    if let Some(p) = h.precipitation_probability {
                        write!(f, "  {p:.0}%")?;
                    }
                    writeln!(f)?;
                }
            }
        }

        let daily = &self.snapshot.daily;
        if !daily.time.is_empty() {
            writeln!(f, "\nNext days:")?;
            for (idx, day) in daily.time.iter().enumerate() {
                let label = parse_local_date(day)
                    .map(|d| d.format("%a %d %b").to_string())
                    .unwrap_or_else(|| day.clone());
                let high = daily.max_at(idx).map(|t| units.format_temperature(t));
                let low = daily.min_at(idx).map(|t| units.format_temperature(t));
                let condition = daily.weather_code_at(idx).map_or("Unknown", wmo::description);

                write!(
                    f,
                    "  {label}  {:>5} / {:<5}  {condition}",
                    high.as_deref().unwrap_or("-"),
                    low.as_deref().unwrap_or("-"),
                )?;
                if let Some(Some(p)) = daily.precipitation_probability_max.get(idx) {
                    write!(f, "  {p:.0}%")?;
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

pub fn place_list(places: &[Location]) -> String {
    let mut out = String::new();
    for place in places {
        let _ = writeln!(
            out,
            "{}\n    {}  ({:.4}, {:.4})",
            place,
            place.slug_with_coordinates(),
            place.latitude(),
            place.longitude(),
        );
    }
    out
}

pub fn slug_report(slug: &str) -> String {
    let mut out = String::new();
    let (name_slug, coords) = match split_coordinate_suffix(slug) {
        Some(c) => (c.name_slug, Some(c)),
        None => (slug, None),
    };
    let parsed = parse_location_slug(name_slug);

    let _ = writeln!(out, "Slug:        {}", slug);
    let _ = writeln!(out, "Search term: {}", parsed.search_term);
    match coords {
        Some(c) => match c.validate() {
            Ok(()) => {
                let _ = writeln!(out, "Coordinates: {}, {}", c.latitude, c.longitude);
            }
            Err(err) => {
                let _ = writeln!(out, "Coordinates: invalid ({err})");
            }
        },
        None => {
            let _ = writeln!(out, "Coordinates: none");
        }
    }
    if let Some(known) = cities::find_by_slug(name_slug) {
        let _ = writeln!(out, "Known city:  {known}");
    }
    out
}
