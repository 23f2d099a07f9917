//! Night window detection.
//!
//! Samples the Sun's altitude over the time grid and finds the span during
//! which it stays below the darkness threshold (-12° by default).

use log::debug;
use qtty::Degrees;

use crate::astro::{sun_position, to_horizontal};
use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{NightWindow, Site, TimeGrid};

/// Sun altitude at every grid sample.
pub fn sun_altitudes(site: &Site, grid: &TimeGrid) -> Vec<Degrees> {
    grid.instants()
        .map(|t| to_horizontal(&sun_position(t), site, t).altitude)
        .collect()
}

/// Find the first and last samples with the Sun strictly below `threshold`.
///
/// # Arguments
///
/// * `grid` - Sampling instants
/// * `sun_altitudes` - Sun altitude per sample, same length as `grid`
/// * `threshold` - Darkness threshold
///
/// # Returns
///
/// The night window, or `SchedulerError::NoNightWindow` when no sample
/// qualifies.
pub fn find_night_window(
    grid: &TimeGrid,
    sun_altitudes: &[Degrees],
    threshold: Degrees,
) -> SchedulerResult<NightWindow> {
    debug_assert_eq!(grid.len(), sun_altitudes.len());

    let is_dark = |alt: &Degrees| alt.value() < threshold.value();
    let first = sun_altitudes.iter().position(is_dark);
    let last = sun_altitudes.iter().rposition(is_dark);

    match (first, last) {
        (Some(first), Some(last)) => Ok(NightWindow {
            first,
            last,
            sundown: grid.datetime(first),
            sunup: grid.datetime(last),
        }),
        _ => Err(SchedulerError::NoNightWindow {
            threshold_deg: threshold.value(),
            start: grid.datetime(0),
            end: grid.datetime(grid.len() - 1),
        }),
    }
}

/// Compute the night window for `site` over `grid`.
pub fn compute_night_window(
    site: &Site,
    grid: &TimeGrid,
    threshold: Degrees,
) -> SchedulerResult<NightWindow> {
    let altitudes = sun_altitudes(site, grid);
    let night = find_night_window(grid, &altitudes, threshold)?;
    debug!(
        "Night window {} -> {} ({} min, samples {}..={})",
        night.sundown,
        night.sunup,
        night.duration().num_minutes(),
        night.first,
        night.last
    );
    Ok(night)
}
