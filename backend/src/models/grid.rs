use chrono::{DateTime, Duration, Utc};
use qtty::{Hours, Second, Seconds};

use super::time::ModifiedJulianDate;
use crate::error::{SchedulerError, SchedulerResult};

/// End of a lookahead window of `span` starting at `start`.
///
/// Fails with `Configuration` when `span` is not a positive finite length or
/// the end falls outside the representable date range.
pub fn lookahead_end(start: DateTime<Utc>, span: Hours) -> SchedulerResult<DateTime<Utc>> {
    let hours = span.value();
    if !(hours.is_finite() && hours > 0.0) {
        return Err(SchedulerError::Configuration(format!(
            "Lookahead must be a positive finite number of hours, got {}",
            hours
        )));
    }
    let millis = hours * 3_600_000.0;
    (millis < i64::MAX as f64)
        .then(|| Duration::try_milliseconds(millis.round() as i64))
        .flatten()
        .and_then(|d| start.checked_add_signed(d))
        .ok_or_else(|| {
            SchedulerError::Configuration(format!(
                "Lookahead of {} h from {} runs past the supported date range",
                hours, start
            ))
        })
}

/// Evenly spaced sampling instants from `start` to `start + span`, both ends
/// included.
#[derive(Debug, Clone)]
pub struct TimeGrid {
    start: ModifiedJulianDate,
    offsets: Vec<Seconds>,
    times: Vec<DateTime<Utc>>,
}

impl TimeGrid {
    pub fn new(start: DateTime<Utc>, span: Hours, samples: usize) -> SchedulerResult<Self> {
        if samples < 2 {
            return Err(SchedulerError::Configuration(format!(
                "Time grid needs at least 2 samples, got {}",
                samples
            )));
        }
        lookahead_end(start, span)?;

        let span: Seconds = span.to::<Second>();
        let step = span.value() / (samples - 1) as f64;
        let offsets: Vec<Seconds> = (0..samples)
            .map(|i| Seconds::new(step * i as f64))
            .collect();

        let start_mjd = ModifiedJulianDate::from_datetime(start);
        let times = offsets
            .iter()
            .map(|o| start_mjd.plus(*o).to_datetime())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                SchedulerError::Configuration(format!(
                    "Time grid from {} leaves the supported date range",
                    start
                ))
            })?;

        Ok(Self {
            start: start_mjd,
            offsets,
            times,
        })
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn start(&self) -> ModifiedJulianDate {
        self.start
    }

    pub fn end(&self) -> ModifiedJulianDate {
        self.mjd(self.len() - 1)
    }

    /// Spacing between consecutive samples.
    pub fn step(&self) -> Seconds {
        self.offsets[1] - self.offsets[0]
    }

    /// Time since the first sample. Panics if `index` is out of range.
    pub fn offset(&self, index: usize) -> Seconds {
        self.offsets[index]
    }

    pub fn mjd(&self, index: usize) -> ModifiedJulianDate {
        self.start.plus(self.offsets[index])
    }

    pub fn datetime(&self, index: usize) -> DateTime<Utc> {
        self.times[index]
    }

    /// All sampling instants in order.
    pub fn instants(&self) -> impl Iterator<Item = ModifiedJulianDate> + '_ {
        self.offsets.iter().map(move |o| self.start.plus(*o))
    }
}
