//! Next-target selection.
//!
//! The pipeline is linear:
//! 1. Resolve every queued target to coordinates (fail fast)
//! 2. Sample the lookahead window on a fixed grid starting at `now`
//! 3. Find the night window from the Sun's altitude
//! 4. Find each target's peak altitude and its wait time
//! 5. Pick the target whose peak comes first
//!
//! # Example
//!
//! ```rust,no_run
//! use atlas_scheduler::config::SchedulerConfig;
//! use atlas_scheduler::models::TargetSpec;
//! use atlas_scheduler::scheduler::Scheduler;
//!
//! let config = SchedulerConfig::from_default_location()?;
//! let scheduler = Scheduler::from_config(&config)?;
//! let queue = vec![TargetSpec::named("M31"), TargetSpec::named("M42")];
//! let result = scheduler.schedule(&queue, chrono::Utc::now())?;
//! println!("{} in {}s", result.primary_target, result.wait.as_legacy_seconds());
//! # Ok::<(), atlas_scheduler::error::SchedulerError>(())
//! ```

use chrono::{DateTime, Utc};
use log::{info, warn};
use qtty::{Degrees, Hours};
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{ScheduleResult, Site, TargetSample, TargetSpec, TimeGrid, Wait};
use crate::resolver::{resolve_all, ResolverChain, TargetResolver};
use crate::services::astronomical_night::compute_night_window;
use crate::services::visibility_computer::{compute_target_sample, VisibilityCriteria};

/// Which targets may become the primary target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Soonest peak among all targets, even if that target cannot be observed
    /// tonight; its wait is then reported as not observable.
    #[default]
    SoonestPeak,
    /// Soonest peak among targets that clear the minimum altitude inside the
    /// night window; falls back to the first queued target when none do.
    ObservableOnly,
}

/// Parameters of one scheduling deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerSettings {
    pub site: Site,
    pub lookahead: Hours,
    pub samples: usize,
    pub darkness_threshold: Degrees,
    pub min_altitude: Degrees,
    pub policy: SelectionPolicy,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            site: Site::stone_edge(),
            lookahead: Hours::new(18.0),
            samples: 1000,
            darkness_threshold: Degrees::new(-12.0),
            min_altitude: Degrees::new(40.0),
            policy: SelectionPolicy::SoonestPeak,
        }
    }
}

impl SchedulerSettings {
    pub fn from_config(config: &SchedulerConfig) -> SchedulerResult<Self> {
        config.validate()?;
        Ok(Self {
            site: config.site()?,
            lookahead: Hours::new(config.window.lookahead_hours),
            samples: config.window.samples,
            darkness_threshold: Degrees::new(config.window.darkness_threshold_deg),
            min_altitude: Degrees::new(config.selection.min_altitude_deg),
            policy: config.selection.policy,
        })
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Picks the next target for a fixed site.
pub struct Scheduler<R = ResolverChain> {
    settings: SchedulerSettings,
    resolver: R,
}

impl Scheduler<ResolverChain> {
    /// Scheduler with the site, window and resolvers described by `config`.
    pub fn from_config(config: &SchedulerConfig) -> SchedulerResult<Self> {
        Ok(Self::new(
            SchedulerSettings::from_config(config)?,
            config.build_resolver()?,
        ))
    }
}

impl<R: TargetResolver> Scheduler<R> {
    pub fn new(settings: SchedulerSettings, resolver: R) -> Self {
        Self { settings, resolver }
    }

    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SchedulerSettings {
        &mut self.settings
    }

    /// Pick the next target from `targets`, looking ahead from `now`.
    pub fn schedule(&self, targets: &[TargetSpec], now: DateTime<Utc>) -> SchedulerResult<ScheduleResult> {
        self.schedule_until(targets, now, None)
    }

    /// Like [`Scheduler::schedule`], but peaks at or after `end_time` (the end
    /// of the observing session) get no wait time.
    pub fn schedule_until(
        &self,
        targets: &[TargetSpec],
        now: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
    ) -> SchedulerResult<ScheduleResult> {
        schedule(targets, now, end_time, &self.settings, &self.resolver)
    }
}

/// Run the full scheduling pipeline.
///
/// # Arguments
///
/// * `targets` - Queue entries in queue order; must not be empty
/// * `now` - Start of the lookahead window
/// * `end_time` - Optional end of the observing session
/// * `settings` - Site, grid and selection parameters
/// * `resolver` - Name lookup for `TargetSpec::Named` entries
///
/// # Errors
///
/// `EmptyTargetList`, `TargetResolution` for the first unresolvable name, or
/// `NoNightWindow` when the Sun never gets below the darkness threshold.
pub fn schedule(
    targets: &[TargetSpec],
    now: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    settings: &SchedulerSettings,
    resolver: &dyn TargetResolver,
) -> SchedulerResult<ScheduleResult> {
    if targets.is_empty() {
        return Err(SchedulerError::EmptyTargetList);
    }

    let resolved = resolve_all(targets, resolver)?;

    let grid = TimeGrid::new(now, settings.lookahead, settings.samples)?;
    let night = compute_night_window(&settings.site, &grid, settings.darkness_threshold)?;

    let criteria = VisibilityCriteria {
        min_altitude: settings.min_altitude,
        end_time,
    };
    let samples: Vec<TargetSample> = resolved
        .into_iter()
        .map(|(identifier, coordinates)| {
            compute_target_sample(&identifier, coordinates, &settings.site, &grid, &night, &criteria)
        })
        .collect();

    let (primary_target, wait) = match select_primary(&samples, now, settings.policy) {
        Some(sample) => (sample.identifier.clone(), sample.wait),
        None => {
            warn!("Scheduler couldn't pick an object - returning first object in queue");
            (samples[0].identifier.clone(), Wait::NotObservable)
        }
    };

    info!(
        "Next target: {} (wait {} s, {} candidates, night {} -> {})",
        primary_target,
        wait.as_legacy_seconds(),
        samples.len(),
        night.sundown,
        night.sunup
    );

    Ok(ScheduleResult {
        primary_target,
        wait,
        night,
        samples,
    })
}

/// Choose the sample whose peak is closest to `now`; the first one on ties.
///
/// Returns `None` when `samples` is empty or, under
/// `SelectionPolicy::ObservableOnly`, when no sample is observable.
pub fn select_primary(
    samples: &[TargetSample],
    now: DateTime<Utc>,
    policy: SelectionPolicy,
) -> Option<&TargetSample> {
    samples
        .iter()
        .filter(|s| match policy {
            SelectionPolicy::SoonestPeak => true,
            SelectionPolicy::ObservableOnly => s.is_observable(),
        })
        .min_by_key(|s| s.peak_time - now)
}

#[cfg(test)]
mod tests;
