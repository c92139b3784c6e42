//! City lookup for coordinate resolution.
//!
//! Uses the `cities` crate, a database of 10,000+ cities worldwide, to turn a
//! name such as `"Berlin"` or `"Portland, United States"` into coordinates.

use crate::error::AutoModeError;

/// Represents a city with its geographic information
#[derive(Debug, Clone, PartialEq)]
pub struct CityInfo {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CityInfo {
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Get all cities with a non-empty name
fn get_all_cities() -> Vec<CityInfo> {
    let iter = IntoIterator::into_iter(cities::all());
    iter.filter_map(|city| {
        if city.city.trim().is_empty() {
            return None;
        }

        Some(CityInfo {
            name: city.city.to_string(),
            country: city.country.to_string(),
            latitude: city.latitude,
            longitude: city.longitude,
        })
    })
    .collect()
}

/// Find all cities whose name matches `name` (case-insensitive).
pub fn find_cities_by_name(name: &str) -> Vec<CityInfo> {
    let wanted = name.trim();
    get_all_cities()
        .into_iter()
        .filter(|city| city.name.eq_ignore_ascii_case(wanted))
        .collect()
}

/// Look up a city by `"Name"` or `"Name, Country"`.
///
/// With several matches and no country the first database entry wins; the
/// country suffix disambiguates.
pub fn find_city(query: &str) -> Result<CityInfo, AutoModeError> {
    let (name, country) = match query.split_once(',') {
        Some((name, country)) => (name.trim(), Some(country.trim())),
        None => (query.trim(), None),
    };

    if name.is_empty() {
        return Err(AutoModeError::configuration("City name must not be empty"));
    }

    let matches = find_cities_by_name(name);
    let found = match country {
        Some(country) if !country.is_empty() => matches
            .into_iter()
            .find(|city| city.country.eq_ignore_ascii_case(country)),
        _ => matches.into_iter().next(),
    };

    found.ok_or_else(|| {
        AutoModeError::configuration(format!("Unknown city '{}'", query.trim()))
    })
}
