//! Location slugs: `{name}-{admin1}-{country}`, optionally followed by
//! `-{lat}-{lon}` to pin the exact point.

use crate::gazetteer;

/// A slug together with the free-text term to geocode it by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSlug {
    pub slug: String,
    pub search_term: String,
}

/// Best-effort inverse of [`location_slug`]: drop the trailing country so the
/// rest can be fed to a geocoder.
///
/// Total: the worst case is the slug itself with hyphens turned into spaces.
pub fn parse_location_slug(slug: &str) -> ParsedSlug {
    let normalized = slug.replace('-', " ");
    let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

    let search_term = if let Some(rest) = gazetteer::strip_country_suffix(&normalized) {
        rest.to_string()
    } else {
        match normalized.rsplit_once(' ') {
            Some((head, _last)) => head.to_string(),
            None => normalized,
        }
    };

    ParsedSlug { slug: slug.to_string(), search_term }
}

/// Lowercase, hyphen-joined slug for a place. Empty parts are skipped.
pub fn location_slug(name: &str, admin1: Option<&str>, country: &str) -> String {
    [Some(name), admin1, Some(country)]
        .into_iter()
        .flatten()
        .map(slugify)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Append a coordinate suffix; a negative value leaves a double hyphen.
pub fn with_coordinates(slug: &str, latitude: f64, longitude: f64) -> String {
    format!("{slug}-{latitude:.4}-{longitude:.4}")
}

/// Lowercase ASCII alphanumerics; any other run of characters becomes one `-`.
pub fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_dash = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            prev_dash = false;
            out.push(ch.to_ascii_lowercase());
            continue;
        }

        if !prev_dash {
            out.push('-');
            prev_dash = true;
        }
    }

    out.trim_matches('-').to_string()
}

/// Coordinates found at the end of a slug, not yet range-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct SlugCoordinates<'a> {
    pub name_slug: &'a str,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside -90..=90")]
    Latitude(f64),
    #[error("longitude {0} is outside -180..=180")]
    Longitude(f64),
    #[error("slug has coordinates but no place name")]
    MissingName,
}

impl SlugCoordinates<'_> {
    pub fn validate(&self) -> Result<(), CoordinateError> {
        if !self.latitude.is_finite() || self.latitude.abs() > 90.0 {
            return Err(CoordinateError::Latitude(self.latitude));
        }
        if !self.longitude.is_finite() || self.longitude.abs() > 180.0 {
            return Err(CoordinateError::Longitude(self.longitude));
        }
        if self.name_slug.is_empty() {
            return Err(CoordinateError::MissingName);
        }
        Ok(())
    }
}

/// Split a trailing `-{lat}-{lon}` off `slug`.
///
/// Both numbers must carry a decimal point, which keeps names like
/// `route-66` from being read as coordinates. A negative number shows up as
/// a doubled hyphen (`45.4215--75.6972`).
pub fn split_coordinate_suffix(slug: &str) -> Option<SlugCoordinates<'_>> {
    let (rest, longitude) = pop_number(slug)?;
    let (name_slug, latitude) = pop_number(rest)?;

    Some(SlugCoordinates { name_slug, latitude, longitude })
}

// Pops `-{number}` (or `--{number}` for a negative one) off the end of `s`.
fn pop_number(s: &str) -> Option<(&str, f64)> {
    let (head, digits) = s.rsplit_once('-').unwrap_or(("", s));
    if !digits.contains('.') || !digits.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let value: f64 = digits.parse().ok()?;

    match head.strip_suffix('-') {
        Some(head) => Some((head, -value)),
        None => Some((head, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_gazetteer_country() {
        let parsed = parse_location_slug("london-england-united-kingdom");
        assert_eq!(parsed.search_term, "london england");
        assert_eq!(parsed.slug, "london-england-united-kingdom");

        assert_eq!(parse_location_slug("paris-france").search_term, "paris");
        assert_eq!(parse_location_slug("sydney-australia").search_term, "sydney");
    }

    #[test]
    fn unknown_suffix_drops_last_word() {
        assert_eq!(
            parse_location_slug("springfield-illinois-atlantis").search_term,
            "springfield illinois"
        );
    }

    #[test]
    fn single_token_is_unchanged() {
        assert_eq!(parse_location_slug("tokyo").search_term, "tokyo");
        assert_eq!(parse_location_slug("france").search_term, "france");
    }

    #[test]
    fn extra_hyphens_collapse() {
        assert_eq!(parse_location_slug("-rio--de-janeiro-brazil-").search_term, "rio de janeiro");
    }

    #[test]
    fn builds_slugs() {
        assert_eq!(
            location_slug("London", Some("England"), "United Kingdom"),
            "london-england-united-kingdom"
        );
        assert_eq!(location_slug("São Paulo", None, "Brazil"), "s-o-paulo-brazil");
        assert_eq!(location_slug("Zürich", Some(""), "Switzerland"), "z-rich-switzerland");
        assert_eq!(slugify("  St. John's  "), "st-john-s");
    }

    #[test]
    fn coordinate_suffix_round_trip() {
        let slug = with_coordinates("ottawa-ontario-canada", 45.42153, -75.69719);
        assert_eq!(slug, "ottawa-ontario-canada-45.4215--75.6972");

        let coords = split_coordinate_suffix(&slug).expect("has coordinates");
        assert_eq!(coords.name_slug, "ottawa-ontario-canada");
        assert_eq!(coords.latitude, 45.4215);
        assert_eq!(coords.longitude, -75.6972);
        assert!(coords.validate().is_ok());
    }

    #[test]
    fn negative_latitude_suffix() {
        let coords = split_coordinate_suffix("sydney-new-south-wales-australia--33.8688-151.2093")
            .expect("has coordinates");
        assert_eq!(coords.name_slug, "sydney-new-south-wales-australia");
        assert_eq!(coords.latitude, -33.8688);
        assert_eq!(coords.longitude, 151.2093);
    }

    #[test]
    fn names_ending_in_numbers_are_not_coordinates() {
        assert!(split_coordinate_suffix("route-66").is_none());
        assert!(split_coordinate_suffix("paris-france").is_none());
        assert!(split_coordinate_suffix("paris-france-48.85").is_none());
        assert!(split_coordinate_suffix("paris-france-48.8a-2.35").is_none());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let coords = split_coordinate_suffix("nowhere-91.0000-10.0000").unwrap();
        assert_eq!(coords.validate(), Err(CoordinateError::Latitude(91.0)));

        let coords = split_coordinate_suffix("nowhere-10.0000--180.5000").unwrap();
        assert_eq!(coords.validate(), Err(CoordinateError::Longitude(-180.5)));

        let coords = split_coordinate_suffix("45.0000-10.0000").unwrap();
        assert_eq!(coords.validate(), Err(CoordinateError::MissingName));
    }
}
