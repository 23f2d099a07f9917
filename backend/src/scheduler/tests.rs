//! Tests for next-target selection.
//!
//! The synthetic tests build `TargetSample`s by hand to pin down the
//! selection rules; the sky tests run the whole pipeline for a fixed `now`
//! against the offline catalog.

use chrono::{DateTime, Duration, TimeZone, Utc};
use qtty::{Degrees, Hours, Seconds};

use super::*;
use crate::models::EquatorialCoordinates;
use crate::resolver::CatalogResolver;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap()
}

fn sample(identifier: &str, peak_minutes: i64, altitude: f64, wait: Wait) -> TargetSample {
    TargetSample {
        identifier: identifier.to_string(),
        coordinates: EquatorialCoordinates::new(0.0, 0.0).unwrap(),
        peak_altitude: Degrees::new(altitude.max(30.0)),
        altitude: Degrees::new(altitude),
        peak_index: 0,
        peak_time: now() + Duration::minutes(peak_minutes),
        peak_offset: Seconds::new(peak_minutes as f64 * 60.0),
        wait,
    }
}

fn until(minutes: i64) -> Wait {
    Wait::Until(Seconds::new(minutes as f64 * 60.0))
}

fn stone_edge_scheduler() -> Scheduler<CatalogResolver> {
    Scheduler::new(SchedulerSettings::default(), CatalogResolver::builtin())
}

fn names(list: &[&str]) -> Vec<TargetSpec> {
    list.iter().map(|n| TargetSpec::named(*n)).collect()
}

#[test]
fn test_soonest_peak_picks_earliest_regardless_of_flags() {
    let samples = vec![
        sample("late", 300, 60.0, until(300)),
        sample("early-daytime", 30, 0.0, Wait::NotObservable),
        sample("middle", 120, 55.0, until(120)),
    ];

    let primary = select_primary(&samples, now(), SelectionPolicy::SoonestPeak).unwrap();
    assert_eq!(primary.identifier, "early-daytime");
    assert_eq!(primary.wait, Wait::NotObservable);
}

#[test]
fn test_soonest_peak_first_on_ties() {
    let samples = vec![
        sample("a", 90, 50.0, until(90)),
        sample("b", 60, 50.0, until(60)),
        sample("c", 60, 70.0, until(60)),
    ];

    let primary = select_primary(&samples, now(), SelectionPolicy::SoonestPeak).unwrap();
    assert_eq!(primary.identifier, "b");
}

#[test]
fn test_observable_only_skips_low_and_daytime_targets() {
    let samples = vec![
        sample("daytime", 10, 70.0, Wait::NotObservable),
        sample("low", 20, 0.0, until(20)),
        sample("good-late", 400, 45.0, until(400)),
        sample("good", 200, 65.0, until(200)),
    ];

    let primary = select_primary(&samples, now(), SelectionPolicy::ObservableOnly).unwrap();
    assert_eq!(primary.identifier, "good");
    assert_eq!(primary.wait, until(200));
}

#[test]
fn test_observable_only_none_qualify() {
    let samples = vec![
        sample("daytime", 10, 70.0, Wait::NotObservable),
        sample("low", 20, 0.0, until(20)),
    ];
    assert!(select_primary(&samples, now(), SelectionPolicy::ObservableOnly).is_none());
    assert!(select_primary(&[], now(), SelectionPolicy::SoonestPeak).is_none());
}

#[test]
fn test_empty_target_list() {
    let scheduler = stone_edge_scheduler();
    let err = scheduler.schedule(&[], now()).unwrap_err();
    assert_eq!(err, SchedulerError::EmptyTargetList);
}

#[test]
fn test_unresolvable_target_fails_without_partial_result() {
    let scheduler = stone_edge_scheduler();
    let err = scheduler
        .schedule(&names(&["M31", "NotARealObject"]), now())
        .unwrap_err();
    assert_eq!(
        err,
        SchedulerError::resolution("NotARealObject", "not in local catalog")
    );
}

#[test]
fn test_winter_night_at_stone_edge() {
    let scheduler = stone_edge_scheduler();
    let result = scheduler
        .schedule(&names(&["M31", "M42", "M13", "M81"]), now())
        .unwrap();

    // Dusk (-12°) near 02:15 UT, dawn near 14:24 UT
    assert!((122..=128).contains(&result.night.first), "first = {}", result.night.first);
    assert!((796..=802).contains(&result.night.last), "last = {}", result.night.last);
    assert_eq!(result.samples.len(), 4);

    // M31 culminates at 01:15 UT, before the sky is dark
    let m31 = result.sample("M31").unwrap();
    assert!((m31.peak_index as i64 - 69).abs() <= 3, "M31 peak {}", m31.peak_index);
    assert!((m31.altitude.value() - 87.0).abs() < 0.5);
    assert_eq!(m31.wait, Wait::NotObservable);

    // M42 culminates at 06:06 UT, 46° up
    let m42 = result.sample("M42").unwrap();
    assert!((m42.altitude.value() - 46.3).abs() < 0.5);
    let wait = m42.wait.seconds().unwrap().value();
    assert!((wait - 21989.0).abs() < 200.0, "M42 wait {}", wait);
    assert!(
        (wait - (m42.peak_time - now()).num_milliseconds() as f64 / 1000.0).abs() < 0.01,
        "wait must equal peak_time - now"
    );

    // M13 culminates after dawn
    let m13 = result.sample("M13").unwrap();
    assert!(m13.peak_time > result.night.sunup);
    assert_eq!(m13.wait.as_legacy_seconds(), -1);

    // Soonest peak overall is M31, reported as not observable
    assert_eq!(result.primary_target, "M31");
    assert_eq!(result.wait, Wait::NotObservable);
    assert_eq!(result.primary_sample().unwrap().identifier, "M31");
}

#[test]
fn test_winter_night_observable_only() {
    let mut scheduler = stone_edge_scheduler();
    scheduler.settings_mut().policy = SelectionPolicy::ObservableOnly;

    let result = scheduler
        .schedule(&names(&["M31", "M42", "M13", "M81"]), now())
        .unwrap();

    assert_eq!(result.primary_target, "M42");
    let wait = result.wait.as_legacy_seconds();
    assert!((wait - 21989).abs() < 200, "wait {}", wait);
}

#[test]
fn test_observable_only_falls_back_to_first_in_queue() {
    let mut scheduler = stone_edge_scheduler();
    scheduler.settings_mut().policy = SelectionPolicy::ObservableOnly;

    // Neither target is up during the dark hours in January
    let result = scheduler.schedule(&names(&["M13", "M31"]), now()).unwrap();
    assert_eq!(result.primary_target, "M13");
    assert_eq!(result.wait, Wait::NotObservable);
}

#[test]
fn test_end_time_marks_late_peaks_unobservable() {
    let scheduler = stone_edge_scheduler();
    let end = now() + Duration::hours(8);

    let result = scheduler
        .schedule_until(&names(&["M42", "M81"]), now(), Some(end))
        .unwrap();

    assert!(result.sample("M42").unwrap().wait.is_observable());
    // M81 peaks at 10:26 UT, after the session ends
    assert_eq!(result.sample("M81").unwrap().wait, Wait::NotObservable);
}

#[test]
fn test_fixed_coordinates_need_no_resolver() {
    let scheduler = Scheduler::new(SchedulerSettings::default(), CatalogResolver::new());
    let trapezium = EquatorialCoordinates::parse_sexagesimal("05:35:16.3", "-05:23:23").unwrap();

    let result = scheduler
        .schedule(&[TargetSpec::at("Trapezium", trapezium)], now())
        .unwrap();
    assert_eq!(result.primary_target, "Trapezium");
    assert!(result.wait.is_observable());
}

#[test]
fn test_no_night_in_summer_midday_window() {
    let mut scheduler = stone_edge_scheduler();
    scheduler.settings_mut().lookahead = Hours::new(4.0);

    // 11:00 local time on the solstice
    let now = Utc.with_ymd_and_hms(2026, 6, 21, 18, 0, 0).unwrap();
    let err = scheduler.schedule(&names(&["M42"]), now).unwrap_err();
    assert!(matches!(err, SchedulerError::NoNightWindow { threshold_deg, .. } if threshold_deg == -12.0));
}

#[test]
fn test_no_night_during_arctic_summer() {
    let settings = SchedulerSettings {
        site: Site::new(78.22, 15.65, 0.0).unwrap(),
        ..Default::default()
    };
    let scheduler = Scheduler::new(settings, CatalogResolver::builtin());

    let now = Utc.with_ymd_and_hms(2026, 6, 21, 0, 0, 0).unwrap();
    let err = scheduler.schedule(&names(&["Polaris"]), now).unwrap_err();
    assert!(matches!(err, SchedulerError::NoNightWindow { .. }));
}

#[test]
fn test_unrepresentable_lookahead_fails_instead_of_returning_epoch_dates() {
    for hours in [f64::INFINITY, 1e12] {
        let mut scheduler = stone_edge_scheduler();
        scheduler.settings_mut().lookahead = Hours::new(hours);
        scheduler.settings_mut().samples = 10;

        let err = scheduler
            .schedule(&names(&["M42", "M31"]), now())
            .unwrap_err();
        assert!(
            matches!(err, SchedulerError::Configuration(_)),
            "{} h gave {:?}",
            hours,
            err
        );
    }
}

#[test]
fn test_polaris_at_stone_edge_stays_below_min_altitude() {
    let scheduler = stone_edge_scheduler();
    let result = scheduler.schedule(&names(&["Polaris"]), now()).unwrap();

    let polaris = &result.samples[0];
    // Circumpolar, but only ~39° up at 38.3° N
    assert!((polaris.peak_altitude.value() - 39.0).abs() < 0.3);
    assert_eq!(polaris.altitude.value(), 0.0);
    // Selection does not look at altitude
    assert_eq!(result.primary_target, "Polaris");
}

#[test]
fn test_polaris_from_northern_site() {
    let settings = SchedulerSettings {
        site: Site::new(55.0, -122.504, 0.0).unwrap(),
        ..Default::default()
    };
    let scheduler = Scheduler::new(settings, CatalogResolver::builtin());

    let result = scheduler.schedule(&names(&["Polaris"]), now()).unwrap();
    let polaris = &result.samples[0];
    assert!(polaris.altitude.value() > 40.0);
    assert!((polaris.altitude.value() - 55.7).abs() < 0.3);

    // Upper culmination near 03:04 UT, inside the night window
    assert!(result.night.contains(polaris.peak_time));
    let wait = result.wait.seconds().unwrap().value();
    assert!(wait > 0.0);
    assert!((wait - 11027.0).abs() < 700.0, "wait {}", wait);
}

#[test]
fn test_settings_from_config() {
    let config = SchedulerConfig::from_toml_str(
        "[window]\nsamples = 200\n[selection]\npolicy = \"observable_only\"\nmin_altitude_deg = 30.0\n",
    )
    .unwrap();
    let settings = SchedulerSettings::from_config(&config).unwrap();
    assert_eq!(settings.samples, 200);
    assert_eq!(settings.policy, SelectionPolicy::ObservableOnly);
    assert_eq!(settings.min_altitude.value(), 30.0);
    assert_eq!(settings.site, Site::stone_edge());
    assert_eq!(settings.lookahead.value(), 18.0);
}
