//! Per-target visibility over the time grid.
//!
//! For each target this computes the altitude curve, finds the sample where it
//! culminates and decides whether that peak can be used tonight:
//!
//! - Peak altitude must exceed the minimum altitude to be recorded
//! - Peak must fall strictly inside the night window to get a wait time
//! - Peak must precede the optional session end time

use chrono::{DateTime, Utc};
use log::debug;
use qtty::Degrees;

use crate::astro::to_horizontal;
use crate::models::{EquatorialCoordinates, NightWindow, Site, TargetSample, TimeGrid, Wait};

/// Thresholds applied to every target's peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityCriteria {
    /// Peaks at or below this altitude are recorded as 0
    pub min_altitude: Degrees,
    /// Peaks at or after this instant get no wait time
    pub end_time: Option<DateTime<Utc>>,
}

impl Default for VisibilityCriteria {
    fn default() -> Self {
        Self {
            min_altitude: Degrees::new(40.0),
            end_time: None,
        }
    }
}

/// Target altitude at every grid sample.
pub fn altitude_curve(target: &EquatorialCoordinates, site: &Site, grid: &TimeGrid) -> Vec<Degrees> {
    grid.instants()
        .map(|t| to_horizontal(target, site, t).altitude)
        .collect()
}

/// Index of the highest altitude; the earliest one on ties.
pub fn peak_index(altitudes: &[Degrees]) -> Option<usize> {
    altitudes
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, alt)| match best {
            Some((_, max)) if alt.value() <= max => best,
            _ => Some((i, alt.value())),
        })
        .map(|(i, _)| i)
}

/// Build the sample record for one target from its altitude curve.
///
/// # Panics
///
/// If `altitudes` is empty or shorter than the peak index implies.
pub fn sample_from_altitudes(
    identifier: &str,
    coordinates: EquatorialCoordinates,
    grid: &TimeGrid,
    altitudes: &[Degrees],
    night: &NightWindow,
    criteria: &VisibilityCriteria,
) -> TargetSample {
    let peak_index = peak_index(altitudes).expect("altitude curve is never empty");
    let peak_altitude = altitudes[peak_index];

    let altitude = if peak_altitude.value() > criteria.min_altitude.value() {
        peak_altitude
    } else {
        Degrees::new(0.0)
    };

    let peak_time = grid.datetime(peak_index);
    let peak_offset = grid.offset(peak_index);

    let before_end = criteria.end_time.map_or(true, |end| peak_time < end);
    let wait = if night.contains(peak_time) && before_end {
        Wait::Until(peak_offset)
    } else {
        Wait::NotObservable
    };

    debug!(
        "{}: peak {:.2}° at {} (sample {}), wait {:?}",
        identifier,
        peak_altitude.value(),
        peak_time,
        peak_index,
        wait
    );

    TargetSample {
        identifier: identifier.to_string(),
        coordinates,
        peak_altitude,
        altitude,
        peak_index,
        peak_time,
        peak_offset,
        wait,
    }
}

/// Compute the sample record for a target at `coordinates`.
pub fn compute_target_sample(
    identifier: &str,
    coordinates: EquatorialCoordinates,
    site: &Site,
    grid: &TimeGrid,
    night: &NightWindow,
    criteria: &VisibilityCriteria,
) -> TargetSample {
    let altitudes = altitude_curve(&coordinates, site, grid);
    sample_from_altitudes(identifier, coordinates, grid, &altitudes, night, criteria)
}
