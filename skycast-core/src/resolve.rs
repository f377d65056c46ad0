//! Turning a location slug into a [`Location`].
//!
//! Lookup order: saved favorites (only when the slug pins coordinates), the
//! built-in city list, one geocoding search, and finally a bare coordinate
//! placeholder.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::{
    cities,
    model::Location,
    provider::Geocoder,
    slug::{self, CoordinateError},
};

#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("no location matches '{0}'")]
    NotFound(String),
    #[error("invalid coordinates in '{slug}': {source}")]
    InvalidCoordinates {
        slug: String,
        #[source]
        source: CoordinateError,
    },
    #[error("geocoding '{term}' failed: {source}")]
    Geocoding {
        term: String,
        #[source]
        source: anyhow::Error,
    },
}

impl LocationError {
    /// Whether the caller should show its "location not found" state.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidCoordinates { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Favorite,
    KnownCity,
    Geocoded,
    Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub location: Location,
    pub source: ResolutionSource,
}

impl ResolvedLocation {
    fn new(location: Location, source: ResolutionSource) -> Self {
        Self { location, source }
    }
}

/// Resolves slugs against a geocoder, remembering each search so a given
/// term is only ever looked up once.
#[derive(Debug)]
pub struct LocationResolver<G> {
    geocoder: G,
    searches: Mutex<HashMap<String, Vec<Location>>>,
}

impl<G: Geocoder> LocationResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder, searches: Mutex::new(HashMap::new()) }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub async fn resolve(
        &self,
        slug: &str,
        favorites: &[Location],
    ) -> Result<ResolvedLocation, LocationError> {
        let slug = slug.trim().trim_matches('/');

        let (name_slug, coords) = match slug::split_coordinate_suffix(slug) {
            Some(c) => {
                c.validate().map_err(|source| LocationError::InvalidCoordinates {
                    slug: slug.to_string(),
                    source,
                })?;
                (c.name_slug, Some((c.latitude, c.longitude)))
            }
            None => (slug, None),
        };

        if let Some((lat, lon)) = coords {
            if let Some(fav) = favorites.iter().find(|f| f.is_near(lat, lon)) {
                tracing::debug!(slug, favorite = %fav, "resolved from favorites");
                return Ok(ResolvedLocation::new(fav.clone(), ResolutionSource::Favorite));
            }
        }

        if let Some(known) = cities::find_by_slug(name_slug) {
            tracing::debug!(slug, "resolved from known cities");
            return Ok(ResolvedLocation::new(known.clone(), ResolutionSource::KnownCity));
        }

        let term = slug::parse_location_slug(name_slug).search_term;
        match self.search(&term).await {
            Ok(results) => {
                if let Some(found) = pick_candidate(&results, name_slug, coords) {
                    return Ok(ResolvedLocation::new(found.clone(), ResolutionSource::Geocoded));
                }
            }
            Err(err) if coords.is_some() => {
                tracing::warn!(%err, "geocoding failed, using coordinates");
            }
            Err(err) => return Err(err),
        }

        match coords {
            Some((lat, lon)) => Ok(ResolvedLocation::new(
                Location::from_coordinates(lat, lon),
                ResolutionSource::Coordinates,
            )),
            None => Err(LocationError::NotFound(slug.to_string())),
        }
    }

    /// Memoized geocoder search. Failed searches are not remembered.
    pub async fn search(&self, term: &str) -> Result<Vec<Location>, LocationError> {
        let key = term.trim().to_lowercase();
        if key.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(hit) = self.searches.lock().await.get(&key) {
            return Ok(hit.clone());
        }

        let results = self.geocoder.search(term).await.map_err(|source| {
            LocationError::Geocoding { term: term.to_string(), source }
        })?;

        tracing::debug!(term, results = results.len(), "geocoded");
        self.searches.lock().await.insert(key, results.clone());
        Ok(results)
    }
}

fn pick_candidate<'a>(
    results: &'a [Location],
    name_slug: &str,
    coords: Option<(f64, f64)>,
) -> Option<&'a Location> {
    if let Some(exact) = results.iter().find(|r| r.slug() == name_slug) {
        return Some(exact);
    }
    match coords {
        Some((lat, lon)) => results.iter().find(|r| r.is_near(lat, lon)),
        None => results.first(),
    }
}
