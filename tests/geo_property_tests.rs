use chrono::{Duration, FixedOffset, NaiveDate, TimeZone};
use chrono_tz::Tz;
use proptest::prelude::*;

use auto_mode::geo::solar::{Daylight, calculate_daylight};
use auto_mode::time_state::{Appearance, decide_appearance, time_until_next_switch};

/// Generate valid latitude values
fn latitude_strategy() -> impl Strategy<Value = f64> {
    -90.0..=90.0
}

/// Generate valid longitude values
fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

/// Latitudes where the sun rises and sets every day of the year
fn temperate_latitude_strategy() -> impl Strategy<Value = f64> {
    -60.0..=60.0
}

/// Latitudes up to just below the polar circles
fn subpolar_latitude_strategy() -> impl Strategy<Value = f64> {
    -65.5..=65.5
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=365).prop_map(|(year, ordinal)| {
        NaiveDate::from_yo_opt(year, ordinal).unwrap()
    })
}

/// Whole-hour offset closest to local solar time at this longitude
fn solar_zone(longitude: f64) -> FixedOffset {
    let hours = (longitude / 15.0).round() as i32;
    FixedOffset::east_opt(hours * 3600).unwrap()
}

/// A civil zone up to three hours away from solar time, the way real zones drift
fn civil_zone(longitude: f64, shift_hours: i32) -> FixedOffset {
    let hours = ((longitude / 15.0).round() as i32 + shift_hours).clamp(-12, 14);
    FixedOffset::east_opt(hours * 3600).unwrap()
}

proptest! {
    /// Every valid coordinate and date produces a result without panicking
    #[test]
    fn test_valid_coordinates_never_fail(
        lat in latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy()
    ) {
        let result = calculate_daylight(lat, lon, date, &solar_zone(lon));
        prop_assert!(result.is_ok(), "failed for ({}, {}) on {}", lat, lon, date);
    }

    /// Out-of-range latitudes are always rejected
    #[test]
    fn test_invalid_latitude_rejected(
        lat in prop_oneof![-1000.0..-90.001f64, 90.001..1000.0f64],
        lon in longitude_strategy(),
        date in date_strategy()
    ) {
        prop_assert!(calculate_daylight(lat, lon, date, &solar_zone(0.0)).is_err());
    }

    /// Same inputs, same outputs
    #[test]
    fn test_calculation_is_deterministic(
        lat in latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy()
    ) {
        let zone = solar_zone(lon);
        let first = calculate_daylight(lat, lon, date, &zone).unwrap();
        let second = calculate_daylight(lat, lon, date, &zone).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Away from the poles both events land on the requested local date, in order
    #[test]
    fn test_temperate_days_are_regular_and_ordered(
        lat in temperate_latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy()
    ) {
        let zone = solar_zone(lon);
        let daylight = calculate_daylight(lat, lon, date, &zone).unwrap();
        let times = daylight.solar_times().copied();
        prop_assert!(times.is_some(), "expected regular day at ({}, {}) on {}", lat, lon, date);

        let times = times.unwrap();
        prop_assert!(times.sunrise < times.sunset);
        prop_assert_eq!(times.sunrise.with_timezone(&zone).date_naive(), date);
        prop_assert_eq!(times.sunset.with_timezone(&zone).date_naive(), date);
        prop_assert!(times.day_length() > Duration::hours(4));
        prop_assert!(times.day_length() < Duration::hours(20));
    }

    /// Sunrise always precedes sunset, even when sunset is after local midnight
    #[test]
    fn test_subpolar_days_are_ordered_in_civil_zones(
        lat in subpolar_latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy(),
        shift_hours in -3i32..=2
    ) {
        let zone = civil_zone(lon, shift_hours);
        let daylight = calculate_daylight(lat, lon, date, &zone).unwrap();

        if let Daylight::Regular(times) = daylight {
            prop_assert!(
                times.sunrise < times.sunset,
                "({}, {}) on {} in {}: {} / {}",
                lat, lon, date, zone, times.sunrise, times.sunset
            );
            prop_assert!(times.day_length() < Duration::hours(24));
            prop_assert_eq!(times.solar_noon().with_timezone(&zone).date_naive(), date);
            prop_assert_eq!(decide_appearance(times.solar_noon(), &daylight), Appearance::Light);
        }
    }

    /// Light strictly between sunrise and sunset, Dark outside
    #[test]
    fn test_decision_matches_sun_position(
        lat in temperate_latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy(),
        minute_of_day in 0i64..1440
    ) {
        let zone = solar_zone(lon);
        let daylight = calculate_daylight(lat, lon, date, &zone).unwrap();
        let times = *daylight.solar_times().unwrap();

        let midnight = zone
            .from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
            .unwrap();
        let now = (midnight + Duration::minutes(minute_of_day)).to_utc();

        let expected = if now >= times.sunrise && now < times.sunset {
            Appearance::Light
        } else {
            Appearance::Dark
        };
        prop_assert_eq!(decide_appearance(now, &daylight), expected);
    }

    /// The countdown always points at a future switch on the same day
    #[test]
    fn test_next_switch_is_in_the_future(
        lat in temperate_latitude_strategy(),
        date in date_strategy(),
        minute_of_day in 0i64..1440
    ) {
        let zone = solar_zone(0.0);
        let daylight = calculate_daylight(lat, 0.0, date, &zone).unwrap();
        let midnight = zone
            .from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
            .unwrap();
        let now = (midnight + Duration::minutes(minute_of_day)).to_utc();

        if let Some(remaining) = time_until_next_switch(now, &daylight) {
            prop_assert!(remaining > Duration::zero());
            prop_assert_ne!(
                decide_appearance(now, &daylight),
                decide_appearance(now + remaining, &daylight)
            );
        }
    }

    /// Offsets move switch instants by exactly the requested minutes
    #[test]
    fn test_offsets_shift_exactly(
        lat in temperate_latitude_strategy(),
        date in date_strategy(),
        sunrise_offset in -180i64..=180,
        sunset_offset in -180i64..=180
    ) {
        let zone = solar_zone(0.0);
        let base = calculate_daylight(lat, 0.0, date, &zone).unwrap();
        let shifted = base.with_offsets(sunrise_offset, sunset_offset);

        let (base, shifted) = (base.solar_times().unwrap(), shifted.solar_times().unwrap());
        prop_assert_eq!(shifted.sunrise - base.sunrise, Duration::minutes(sunrise_offset));
        prop_assert_eq!(shifted.sunset - base.sunset, Duration::minutes(sunset_offset));
    }
}

#[test]
fn test_polar_extremes_classified() {
    let utc = solar_zone(0.0);
    let june = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
    let december = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();

    for lon in [-150.0, 0.0, 15.0, 120.0] {
        let zone = solar_zone(lon);
        assert_eq!(calculate_daylight(78.0, lon, june, &zone).unwrap(), Daylight::AlwaysDay);
        assert_eq!(calculate_daylight(78.0, lon, december, &zone).unwrap(), Daylight::AlwaysNight);
    }
    assert_eq!(calculate_daylight(-78.0, 0.0, june, &utc).unwrap(), Daylight::AlwaysNight);
    assert_eq!(calculate_daylight(-78.0, 0.0, december, &utc).unwrap(), Daylight::AlwaysDay);
}

#[test]
fn test_london_reference_times() {
    let bst = FixedOffset::east_opt(3600).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
    let daylight = calculate_daylight(51.5, -0.12, date, &bst).unwrap();
    let times = daylight.solar_times().unwrap();

    let noon = bst.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap().to_utc();
    let late = bst.with_ymd_and_hms(2024, 6, 21, 23, 0, 0).unwrap().to_utc();
    assert_eq!(decide_appearance(noon, &daylight), Appearance::Light);
    assert_eq!(decide_appearance(late, &daylight), Appearance::Dark);

    let expected_sunrise = bst.with_ymd_and_hms(2024, 6, 21, 4, 43, 0).unwrap().to_utc();
    let expected_sunset = bst.with_ymd_and_hms(2024, 6, 21, 21, 21, 0).unwrap().to_utc();
    assert!((times.sunrise - expected_sunrise).num_minutes().abs() <= 3);
    assert!((times.sunset - expected_sunset).num_minutes().abs() <= 3);
}

#[test]
fn test_real_zones_through_the_year() {
    let places: [(&str, f64, f64, Tz); 6] = [
        ("Reykjavik", 64.1466, -21.9426, chrono_tz::Atlantic::Reykjavik),
        ("Fairbanks", 64.8378, -147.7164, chrono_tz::America::Anchorage),
        ("Kashgar", 39.4704, 75.9898, chrono_tz::Asia::Shanghai),
        ("Kiritimati", 1.87, -157.4, chrono_tz::Pacific::Kiritimati),
        ("Helsinki", 60.1699, 24.9384, chrono_tz::Europe::Helsinki),
        ("Madrid", 40.4168, -3.7038, chrono_tz::Europe::Madrid),
    ];

    for (name, lat, lon, zone) in places {
        for month in 1..=12 {
            let date = NaiveDate::from_ymd_opt(2024, month, 1).unwrap();
            let daylight = calculate_daylight(lat, lon, date, &zone).unwrap();
            let times = *daylight
                .solar_times()
                .unwrap_or_else(|| panic!("{} on {}: {:?}", name, date, daylight));

            assert!(times.sunrise < times.sunset, "{} on {}", name, date);
            assert_eq!(times.sunrise.with_timezone(&zone).date_naive(), date, "{}", name);
            assert_eq!(
                decide_appearance(times.solar_noon(), &daylight),
                Appearance::Light,
                "{} on {}",
                name,
                date
            );
        }
    }
}

#[test]
fn test_reykjavik_midsummer_is_light_all_day() {
    let zone = chrono_tz::Atlantic::Reykjavik;
    let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
    let daylight = calculate_daylight(64.1466, -21.9426, date, &zone).unwrap();

    for hour in [6, 12, 18, 23] {
        let now = zone.with_ymd_and_hms(2024, 6, 21, hour, 0, 0).unwrap().to_utc();
        assert_eq!(decide_appearance(now, &daylight), Appearance::Light, "{}:00", hour);
    }
    let before_sunrise = zone.with_ymd_and_hms(2024, 6, 21, 2, 0, 0).unwrap().to_utc();
    assert_eq!(decide_appearance(before_sunrise, &daylight), Appearance::Dark);
}

#[test]
fn test_fairbanks_midsummer_noon_is_light() {
    let zone = chrono_tz::America::Anchorage;
    let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
    let daylight = calculate_daylight(64.8378, -147.7164, date, &zone).unwrap();

    let noon = zone.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap().to_utc();
    assert_eq!(decide_appearance(noon, &daylight), Appearance::Light);
    let late_evening = zone.with_ymd_and_hms(2024, 6, 21, 23, 30, 0).unwrap().to_utc();
    assert_eq!(decide_appearance(late_evening, &daylight), Appearance::Light);
}
