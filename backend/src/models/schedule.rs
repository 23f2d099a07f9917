//! Per-call scheduling records.

use chrono::{DateTime, Utc};
use qtty::{Degrees, Seconds};
use serde::{Deserialize, Serialize};

use super::target::EquatorialCoordinates;

/// Grid interval during which the sun stays below the darkness threshold.
///
/// `first`/`last` are the earliest and latest qualifying grid indices; the
/// window is taken as a single span even if the sun briefly rises in between.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NightWindow {
    pub first: usize,
    pub last: usize,
    /// Instant of the earliest dark sample
    pub sundown: DateTime<Utc>,
    /// Instant of the latest dark sample
    pub sunup: DateTime<Utc>,
}

impl NightWindow {
    /// Strict containment: samples at either edge are outside.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.sundown < t && t < self.sunup
    }

    pub fn duration(&self) -> chrono::Duration {
        self.sunup - self.sundown
    }
}

/// How long to wait before observing a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "seconds")]
pub enum Wait {
    /// Target peaks tonight after this long
    Until(Seconds),
    /// Target does not peak inside tonight's dark window
    NotObservable,
}

impl Wait {
    pub fn is_observable(&self) -> bool {
        matches!(self, Wait::Until(_))
    }

    pub fn seconds(&self) -> Option<Seconds> {
        match self {
            Wait::Until(s) => Some(*s),
            Wait::NotObservable => None,
        }
    }

    /// Whole seconds, or -1 when not observable, as the queue executor expects.
    pub fn as_legacy_seconds(&self) -> i64 {
        match self {
            Wait::Until(s) => s.value() as i64,
            Wait::NotObservable => -1,
        }
    }
}

/// Visibility of one target over the time grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSample {
    pub identifier: String,
    pub coordinates: EquatorialCoordinates,
    /// Highest altitude reached over the grid
    pub peak_altitude: Degrees,
    /// `peak_altitude` when above the minimum altitude, otherwise exactly 0
    pub altitude: Degrees,
    pub peak_index: usize,
    pub peak_time: DateTime<Utc>,
    /// Time from the start of the grid to the peak
    pub peak_offset: Seconds,
    pub wait: Wait,
}

impl TargetSample {
    /// Peak clears the minimum altitude.
    pub fn is_high_enough(&self) -> bool {
        self.altitude.value() > 0.0
    }

    /// High enough and peaking inside the night window.
    pub fn is_observable(&self) -> bool {
        self.is_high_enough() && self.wait.is_observable()
    }
}

/// What to observe next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub primary_target: String,
    pub wait: Wait,
    pub night: NightWindow,
    /// One record per input target, in queue order
    pub samples: Vec<TargetSample>,
}

impl ScheduleResult {
    pub fn primary_sample(&self) -> Option<&TargetSample> {
        self.samples
            .iter()
            .find(|s| s.identifier == self.primary_target)
    }

    pub fn sample(&self, identifier: &str) -> Option<&TargetSample> {
        self.samples
            .iter()
            .find(|s| s.identifier.eq_ignore_ascii_case(identifier))
    }
}
