//! Cities resolved without a geocoding round trip.

use std::sync::LazyLock;

use crate::model::Location;

// (geonames id, name, latitude, longitude, admin1, country)
type CityRow = (i64, &'static str, f64, f64, Option<&'static str>, &'static str);

const ROWS: &[CityRow] = &[
    (2643743, "London", 51.50853, -0.12574, Some("England"), "United Kingdom"),
    (5128581, "New York", 40.71427, -74.00597, Some("New York"), "United States"),
    (2988507, "Paris", 48.85341, 2.3488, Some("Ile-de-France"), "France"),
    (1850147, "Tokyo", 35.6895, 139.69171, Some("Tokyo"), "Japan"),
    (2147714, "Sydney", -33.86785, 151.20732, Some("New South Wales"), "Australia"),
    (2950159, "Berlin", 52.52437, 13.41053, Some("Land Berlin"), "Germany"),
    (6167865, "Toronto", 43.70643, -79.39864, Some("Ontario"), "Canada"),
    (5368361, "Los Angeles", 34.05223, -118.24368, Some("California"), "United States"),
    (4887398, "Chicago", 41.85003, -87.65005, Some("Illinois"), "United States"),
    (3117735, "Madrid", 40.4165, -3.70256, Some("Madrid"), "Spain"),
    (3169070, "Rome", 41.89193, 12.51133, Some("Lazio"), "Italy"),
    (6094817, "Ottawa", 45.41117, -75.69812, Some("Ontario"), "Canada"),
    (1275339, "Mumbai", 19.07283, 72.88261, Some("Maharashtra"), "India"),
    (1880252, "Singapore", 1.28967, 103.85007, None, "Singapore"),
    (292223, "Dubai", 25.07725, 55.30927, Some("Dubai"), "United Arab Emirates"),
];

static KNOWN: LazyLock<Vec<(String, Location)>> = LazyLock::new(|| {
    ROWS.iter()
        .map(|&(id, name, lat, lon, admin1, country)| {
            let location = Location::new(id, name, lat, lon, admin1.map(str::to_string), country);
            (location.slug(), location)
        })
        .collect()
});

pub fn all() -> impl Iterator<Item = &'static Location> {
    KNOWN.iter().map(|(_, location)| location)
}

/// Exact slug lookup.
pub fn find_by_slug(slug: &str) -> Option<&'static Location> {
    KNOWN
        .iter()
        .find(|(known, _)| known == slug)
        .map(|(_, location)| location)
}
