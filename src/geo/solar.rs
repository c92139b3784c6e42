//! Solar calculations for sunrise and sunset times.
//!
//! Sunrise and sunset instants come from the `sunrise` crate. Before asking it,
//! the Almanac for Computers hour-angle test classifies dates on which the sun
//! never crosses the reference zenith: those are reported as
//! [`Daylight::AlwaysDay`] (midnight sun) or [`Daylight::AlwaysNight`] (polar
//! night), since the crate has no answer for them.
//!
//! Each local date is mapped to the solar day whose noon falls on it, so a
//! sunset after local midnight (Reykjavik or Fairbanks in June) still belongs
//! to the day that started with that morning's sunrise.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use sunrise::{Coordinates, SolarDay, SolarEvent};

use crate::constants::*;
use crate::error::AutoModeError;

/// Sunrise and sunset instants for one local calendar day.
///
/// Sunset may fall on the next calendar day at high latitudes; it is always
/// after sunrise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl SolarTimes {
    /// Time between sunrise and sunset.
    pub fn day_length(&self) -> Duration {
        self.sunset - self.sunrise
    }

    /// Midpoint between sunrise and sunset.
    pub fn solar_noon(&self) -> DateTime<Utc> {
        self.sunrise + self.day_length() / 2
    }
}

/// Outcome of the solar calculation for a date and location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Daylight {
    /// The sun rises and sets on this date.
    Regular(SolarTimes),
    /// The sun never sets (midnight sun).
    AlwaysDay,
    /// The sun never rises (polar night).
    AlwaysNight,
}

impl Daylight {
    /// Shift the switch instants by the configured offsets (minutes).
    ///
    /// Polar days are unaffected.
    pub fn with_offsets(self, sunrise_offset_minutes: i64, sunset_offset_minutes: i64) -> Self {
        match self {
            Daylight::Regular(times) => Daylight::Regular(SolarTimes {
                sunrise: times.sunrise + Duration::minutes(sunrise_offset_minutes),
                sunset: times.sunset + Duration::minutes(sunset_offset_minutes),
            }),
            other => other,
        }
    }

    pub fn solar_times(&self) -> Option<&SolarTimes> {
        match self {
            Daylight::Regular(times) => Some(times),
            _ => None,
        }
    }
}

/// Sun geometry at solar noon, used to spot polar days.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NoonGeometry {
    /// Cosine of the hour angle at which the sun crosses the reference zenith.
    /// Outside -1..=1 the crossing does not happen.
    cos_hour_angle: f64,
    sin_declination: f64,
}

impl NoonGeometry {
    fn polar_classification(&self) -> Option<Daylight> {
        if self.cos_hour_angle > 1.0 {
            Some(Daylight::AlwaysNight)
        } else if self.cos_hour_angle < -1.0 {
            Some(Daylight::AlwaysDay)
        } else {
            None
        }
    }

    /// Midnight sun when the sun sits on the observer's side of the equator.
    fn classify_by_hemisphere(&self, latitude: f64) -> Daylight {
        if latitude * self.sin_declination > 0.0 {
            Daylight::AlwaysDay
        } else {
            Daylight::AlwaysNight
        }
    }
}

/// Validate geographic coordinates.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), AutoModeError> {
    if !latitude.is_finite() || !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&latitude) {
        return Err(AutoModeError::configuration(format!(
            "Invalid latitude: {}. Must be between {} and {} degrees",
            latitude, MINIMUM_LATITUDE, MAXIMUM_LATITUDE
        )));
    }
    if !longitude.is_finite() || !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&longitude) {
        return Err(AutoModeError::configuration(format!(
            "Invalid longitude: {}. Must be between {} and {} degrees",
            longitude, MINIMUM_LONGITUDE, MAXIMUM_LONGITUDE
        )));
    }
    Ok(())
}

/// Calculate sunrise and sunset for a local calendar date.
///
/// # Arguments
/// * `latitude` - Geographic latitude in degrees (-90 to +90)
/// * `longitude` - Geographic longitude in degrees (-180 to +180)
/// * `date` - Local calendar date
/// * `tz` - Time zone that defines the local date (the binary uses `chrono::Local`)
///
/// # Returns
/// * `Ok(Daylight)` - Sun times, or the polar classification for the date
/// * `Err(_)` - If the coordinates are out of range
///
/// # Examples
/// ```
/// use chrono::{FixedOffset, NaiveDate};
/// use auto_mode::geo::solar::{Daylight, calculate_daylight};
///
/// let bst = FixedOffset::east_opt(3600).unwrap();
/// let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
/// let daylight = calculate_daylight(51.5, -0.12, date, &bst).unwrap();
/// assert!(matches!(daylight, Daylight::Regular(_)));
/// ```
pub fn calculate_daylight<Tz: TimeZone>(
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
    tz: &Tz,
) -> Result<Daylight> {
    validate_coordinates(latitude, longitude)?;
    let coordinates =
        Coordinates::new(latitude, longitude).context("Failed to create coordinates")?;

    let solar_date = solar_date_for_local_date(longitude, date, tz)?;
    let geometry = noon_geometry(latitude, longitude, solar_date);
    if let Some(polar) = geometry.polar_classification() {
        return Ok(polar);
    }

    let solar_day = SolarDay::new(coordinates, solar_date);
    let sunrise = solar_day.event_time(SolarEvent::Sunrise);
    let sunset = solar_day.event_time(SolarEvent::Sunset);

    // Right at the polar boundary the crate may find no crossing (it then
    // reports the unix epoch) even though the noon test did.
    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    if sunrise == epoch || sunset == epoch || sunrise >= sunset {
        return Ok(geometry.classify_by_hemisphere(latitude));
    }

    Ok(Daylight::Regular(SolarTimes {
        sunrise: round_to_minute(sunrise)?,
        sunset: round_to_minute(sunset)?,
    }))
}

/// Pick the solar day (date-1, date or date+1) whose mean solar noon falls on
/// the requested local date.
///
/// Usually this is the date itself. Zones far from their solar time, such as
/// UTC+14 in the central Pacific, need a neighbour.
fn solar_date_for_local_date<Tz: TimeZone>(
    longitude: f64,
    date: NaiveDate,
    tz: &Tz,
) -> Result<NaiveDate> {
    let candidates = [Some(date), date.pred_opt(), date.succ_opt()];

    for candidate in candidates.into_iter().flatten() {
        let noon = candidate
            .and_hms_opt(12, 0, 0)
            .with_context(|| format!("Failed to build noon for {}", candidate))?
            .and_utc()
            - Duration::seconds((longitude * SECONDS_PER_DEGREE_OF_LONGITUDE).round() as i64);
        if noon.with_timezone(tz).date_naive() == date {
            return Ok(candidate);
        }
    }
    Ok(date)
}

/// Almanac for Computers sun geometry at mean solar noon.
fn noon_geometry(latitude: f64, longitude: f64, date: NaiveDate) -> NoonGeometry {
    let day_of_year = date.ordinal() as f64;
    let t = day_of_year + (12.0 - longitude / 15.0) / 24.0;

    let mean_anomaly = 0.9856 * t - 3.289;
    let true_longitude = (mean_anomaly
        + 1.916 * mean_anomaly.to_radians().sin()
        + 0.020 * (2.0 * mean_anomaly).to_radians().sin()
        + 282.634)
        .rem_euclid(360.0);

    let sin_declination = 0.39782 * true_longitude.to_radians().sin();
    let cos_declination = sin_declination.asin().cos();

    let cos_hour_angle = (SUN_ZENITH_DEGREES.to_radians().cos()
        - sin_declination * latitude.to_radians().sin())
        / (cos_declination * latitude.to_radians().cos());

    NoonGeometry {
        cos_hour_angle,
        sin_declination,
    }
}

fn round_to_minute(instant: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let minutes = (instant.timestamp() + 30).div_euclid(60);
    DateTime::from_timestamp(minutes * 60, 0)
        .with_context(|| format!("Sun time out of range: {}", instant))
}
