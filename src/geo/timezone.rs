//! Timezone-based coordinate detection for automatic location determination.
//!
//! When no coordinates are configured, the system time zone is usually a good
//! enough proxy for the user's location: `Europe/Berlin` puts sunrise within a
//! few minutes of the truth for most of Germany. The zone name comes from the
//! `TZ` environment variable or the `/etc/localtime` symlink, is validated
//! against the IANA database (`chrono-tz`) and its city component is looked up
//! in the city database.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use std::path::Path;

use super::city_lookup::{CityInfo, find_cities_by_name};
use crate::error::AutoModeError;

const LOCALTIME_PATH: &str = "/etc/localtime";

/// Detect coordinates from the system time zone.
///
/// # Returns
/// * `Ok((latitude, longitude, label))` - Coordinates of the zone's reference city
/// * `Err(_)` - If the zone cannot be determined or has no matching city
pub fn detect_coordinates_from_timezone() -> Result<(f64, f64, String)> {
    let zone = detect_system_timezone()?;
    coordinates_for_timezone(&zone)
}

/// Determine the IANA name of the system time zone.
pub fn detect_system_timezone() -> Result<String> {
    if let Ok(tz) = std::env::var("TZ") {
        let tz = tz.trim_start_matches(':').trim();
        if !tz.is_empty() {
            return Ok(tz.to_string());
        }
    }

    let target = std::fs::read_link(LOCALTIME_PATH)
        .with_context(|| format!("Failed to read the {} link", LOCALTIME_PATH))?;
    timezone_name_from_path(&target).with_context(|| {
        format!(
            "{} does not point into a zoneinfo directory ({})",
            LOCALTIME_PATH,
            target.display()
        )
    })
}

/// Extract `Region/City` from a zoneinfo path.
///
/// Handles both `/usr/share/zoneinfo/Europe/London` and macOS's
/// `/var/db/timezone/zoneinfo/Europe/London`.
pub fn timezone_name_from_path(path: &Path) -> Option<String> {
    let path = path.to_string_lossy();
    let (_, name) = path.split_once("zoneinfo/")?;
    let name = name.trim_start_matches("posix/").trim_start_matches("right/");
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Resolve an IANA zone name to the coordinates of its reference city.
pub fn coordinates_for_timezone(zone: &str) -> Result<(f64, f64, String)> {
    if zone.parse::<Tz>().is_err() {
        return Err(AutoModeError::configuration(format!("Unknown time zone '{}'", zone)).into());
    }

    let (region, city) = match zone.rsplit_once('/') {
        Some((region, city)) => (region, city.replace('_', " ")),
        None => anyhow::bail!("Time zone '{}' does not name a city", zone),
    };

    let candidates = find_cities_by_name(&city);
    let chosen = pick_city_for_region(&candidates, region)
        .with_context(|| format!("No city found for time zone '{}'", zone))?;

    Ok((chosen.latitude, chosen.longitude, chosen.label()))
}

/// Prefer a candidate whose longitude fits the zone's region.
///
/// Several cities share names across continents (Santiago, Cordoba, ...), so
/// `America/Santiago` should not resolve to Spain.
fn pick_city_for_region<'a>(candidates: &'a [CityInfo], region: &str) -> Option<&'a CityInfo> {
    let continent = region.split('/').next().unwrap_or(region);
    let longitude_range = match continent {
        "Europe" | "Africa" => Some(-30.0..=60.0),
        "America" => Some(-180.0..=-25.0),
        "Asia" => Some(25.0..=180.0),
        "Australia" => Some(110.0..=160.0),
        _ => None,
    };

    match longitude_range {
        Some(range) => candidates
            .iter()
            .find(|city| range.contains(&city.longitude))
            .or_else(|| candidates.first()),
        None => candidates.first(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn city(name: &str, country: &str, latitude: f64, longitude: f64) -> CityInfo {
        CityInfo {
            name: name.to_string(),
            country: country.to_string(),
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_timezone_name_from_linux_path() {
        let path = PathBuf::from("/usr/share/zoneinfo/Europe/London");
        assert_eq!(timezone_name_from_path(&path), Some("Europe/London".to_string()));
    }

    #[test]
    fn test_timezone_name_from_macos_path() {
        let path = PathBuf::from("/var/db/timezone/zoneinfo/America/New_York");
        assert_eq!(
            timezone_name_from_path(&path),
            Some("America/New_York".to_string())
        );
    }

    #[test]
    fn test_timezone_name_from_relative_and_posix_paths() {
        let relative = PathBuf::from("../usr/share/zoneinfo/Asia/Tokyo");
        assert_eq!(timezone_name_from_path(&relative), Some("Asia/Tokyo".to_string()));

        let posix = PathBuf::from("/usr/share/zoneinfo/posix/Europe/Paris");
        assert_eq!(timezone_name_from_path(&posix), Some("Europe/Paris".to_string()));
    }

    #[test]
    fn test_timezone_name_from_unrelated_path() {
        assert_eq!(timezone_name_from_path(Path::new("/etc/localtime")), None);
        assert_eq!(timezone_name_from_path(Path::new("/usr/share/zoneinfo/")), None);
    }

    #[test]
    fn test_invalid_zone_is_rejected() {
        assert!(coordinates_for_timezone("Mars/Olympus_Mons").is_err());
    }

    #[test]
    fn test_zone_without_city_is_rejected() {
        assert!(coordinates_for_timezone("UTC").is_err());
    }

    #[test]
    fn test_known_zone_resolves_near_city() {
        let (lat, lon, _label) = coordinates_for_timezone("Asia/Tokyo").unwrap();
        assert!((lat - 35.7).abs() < 1.0);
        assert!((lon - 139.7).abs() < 1.0);
    }

    #[test]
    fn test_region_disambiguation() {
        let candidates = vec![
            city("Santiago", "Spain", 42.88, -8.54),
            city("Santiago", "Chile", -33.45, -70.67),
        ];
        assert_eq!(
            pick_city_for_region(&candidates, "America").unwrap().country,
            "Chile"
        );
        assert_eq!(
            pick_city_for_region(&candidates, "Europe").unwrap().country,
            "Spain"
        );
        assert_eq!(
            pick_city_for_region(&candidates, "Pacific").unwrap().country,
            "Spain"
        );
        assert!(pick_city_for_region(&[], "Europe").is_none());
    }
}
