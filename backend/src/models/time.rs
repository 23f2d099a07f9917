use chrono::{DateTime, Utc};
use qtty::Seconds;
use serde::{Deserialize, Serialize};

/// MJD of the Unix epoch (1970-01-01 00:00:00 UTC).
const UNIX_EPOCH_MJD: f64 = 40587.0;

/// Offset between Julian Date and Modified Julian Date.
const JD_MJD_OFFSET: f64 = 2_400_000.5;

const SECONDS_PER_DAY: f64 = 86400.0;

/// Modified Julian Date representation.
/// MJD 0 = 1858-11-17 00:00:00 UTC
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ModifiedJulianDate(qtty::Days);

impl ModifiedJulianDate {
    /// Create a new MJD value.
    pub fn new<V: Into<qtty::Days>>(v: V) -> Self {
        Self(v.into())
    }

    /// Raw MJD value as f64.
    pub fn value(&self) -> f64 {
        self.0.value()
    }

    /// Julian Date of this instant.
    pub fn to_julian_date(&self) -> f64 {
        self.value() + JD_MJD_OFFSET
    }

    /// Days elapsed since J2000.0 (JD 2451545.0).
    pub fn days_since_j2000(&self) -> f64 {
        self.to_julian_date() - 2_451_545.0
    }

    /// This instant shifted by `offset`.
    pub fn plus(&self, offset: Seconds) -> Self {
        Self::new(self.value() + offset.value() / SECONDS_PER_DAY)
    }

    /// Convert to Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn to_unix_timestamp(&self) -> f64 {
        (self.value() - UNIX_EPOCH_MJD) * SECONDS_PER_DAY
    }

    /// Create from Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn from_unix_timestamp(timestamp: f64) -> Self {
        Self::new(timestamp / SECONDS_PER_DAY + UNIX_EPOCH_MJD)
    }

    /// Convert to chrono DateTime<Utc>.
    ///
    /// Returns `None` for instants chrono cannot represent.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let secs = self.to_unix_timestamp();
        if !secs.is_finite() || secs.abs() >= i64::MAX as f64 {
            return None;
        }
        let secs_i64 = secs.floor() as i64;
        let nanos = (((secs - secs.floor()) * 1e9) as u32).min(999_999_999);
        DateTime::from_timestamp(secs_i64, nanos)
    }

    /// Create from chrono DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::from_unix_timestamp(dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9)
    }
}

impl From<f64> for ModifiedJulianDate {
    fn from(v: f64) -> Self {
        ModifiedJulianDate::new(v)
    }
}

impl From<DateTime<Utc>> for ModifiedJulianDate {
    fn from(dt: DateTime<Utc>) -> Self {
        ModifiedJulianDate::from_datetime(dt)
    }
}
