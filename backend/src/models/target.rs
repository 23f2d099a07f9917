//! Target descriptions: names that still need resolving and fixed RA/Dec pairs.

use std::fmt;
use std::str::FromStr;

use qtty::{Degree, Degrees, HourAngles};
use serde::{Deserialize, Serialize};

use crate::error::{SchedulerError, SchedulerResult};

/// ICRS (J2000) right ascension and declination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoordinates {
    /// Right ascension in [0, 360)
    pub ra: Degrees,
    /// Declination in [-90, 90]
    pub dec: Degrees,
}

impl EquatorialCoordinates {
    pub fn new(ra_deg: f64, dec_deg: f64) -> SchedulerResult<Self> {
        if !(0.0..360.0).contains(&ra_deg) {
            return Err(SchedulerError::InvalidCoordinates(format!(
                "right ascension {} deg outside [0, 360)",
                ra_deg
            )));
        }
        if !(-90.0..=90.0).contains(&dec_deg) {
            return Err(SchedulerError::InvalidCoordinates(format!(
                "declination {} deg outside [-90, 90]",
                dec_deg
            )));
        }
        Ok(Self {
            ra: Degrees::new(ra_deg),
            dec: Degrees::new(dec_deg),
        })
    }

    /// Parse RA given in hours and Dec given in degrees.
    ///
    /// Both accept `HH:MM:SS.s`, `HH MM SS.s` or a single decimal number.
    ///
    /// ```
    /// use atlas_scheduler::models::EquatorialCoordinates;
    /// let m42 = EquatorialCoordinates::parse_sexagesimal("05:35:17.3", "-05:23:28").unwrap();
    /// assert!((m42.ra.value() - 83.822).abs() < 1e-3);
    /// assert!((m42.dec.value() + 5.391).abs() < 1e-3);
    /// ```
    pub fn parse_sexagesimal(ra: &str, dec: &str) -> SchedulerResult<Self> {
        let (ra_negative, ra_parts) = split_sexagesimal(ra)?;
        if ra_negative {
            return Err(SchedulerError::InvalidCoordinates(format!(
                "right ascension '{}' is negative",
                ra
            )));
        }
        let hours = HourAngles::new(combine(&ra_parts));
        if hours.value() >= 24.0 {
            return Err(SchedulerError::InvalidCoordinates(format!(
                "right ascension '{}' is not below 24h",
                ra
            )));
        }

        let (dec_negative, dec_parts) = split_sexagesimal(dec)?;
        let magnitude = combine(&dec_parts);
        let dec_deg = if dec_negative { -magnitude } else { magnitude };

        Self::new(hours.to::<Degree>().value(), dec_deg)
    }
}

impl fmt::Display for EquatorialCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RA {:.5}° Dec {:+.5}°", self.ra.value(), self.dec.value())
    }
}

/// Splits `"-05:23:28"` into its sign and `[5, 23, 28]`.
fn split_sexagesimal(text: &str) -> SchedulerResult<(bool, Vec<f64>)> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let fields: Vec<&str> = body
        .split(|c: char| c == ':' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if fields.is_empty() || fields.len() > 3 {
        return Err(SchedulerError::InvalidCoordinates(format!(
            "cannot parse '{}' as sexagesimal",
            text
        )));
    }

    let mut parts = Vec::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        let value: f64 = field.parse().map_err(|_| {
            SchedulerError::InvalidCoordinates(format!("bad field '{}' in '{}'", field, text))
        })?;
        if !value.is_finite() || value < 0.0 || (i > 0 && value >= 60.0) {
            return Err(SchedulerError::InvalidCoordinates(format!(
                "field '{}' out of range in '{}'",
                field, text
            )));
        }
        parts.push(value);
    }
    Ok((negative, parts))
}

fn combine(parts: &[f64]) -> f64 {
    parts
        .iter()
        .zip([1.0, 60.0, 3600.0])
        .map(|(v, div)| v / div)
        .sum()
}

/// One entry of the queue as handed to the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetSpec {
    /// Catalog name such as "M31", resolved through a `TargetResolver`
    Named(String),
    /// Fixed position with a label used as the identifier
    Coordinates {
        label: String,
        coordinates: EquatorialCoordinates,
    },
}

impl TargetSpec {
    pub fn named(name: impl Into<String>) -> Self {
        TargetSpec::Named(name.into())
    }

    pub fn at(label: impl Into<String>, coordinates: EquatorialCoordinates) -> Self {
        TargetSpec::Coordinates {
            label: label.into(),
            coordinates,
        }
    }

    /// Identifier reported back in the schedule result.
    pub fn identifier(&self) -> &str {
        match self {
            TargetSpec::Named(name) => name,
            TargetSpec::Coordinates { label, .. } => label,
        }
    }
}

impl From<&str> for TargetSpec {
    fn from(name: &str) -> Self {
        TargetSpec::Named(name.to_string())
    }
}

impl From<String> for TargetSpec {
    fn from(name: String) -> Self {
        TargetSpec::Named(name)
    }
}

/// `"M31"` is a name; `"Trapezium=05:35:16.3,-05:23:23"` carries its own
/// position (RA in hours, Dec in degrees).
impl FromStr for TargetSpec {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SchedulerError::InvalidCoordinates(
                "empty target".to_string(),
            ));
        }
        match s.split_once('=') {
            None => Ok(TargetSpec::Named(s.to_string())),
            Some((label, position)) => {
                let (ra, dec) = position.split_once(',').ok_or_else(|| {
                    SchedulerError::InvalidCoordinates(format!(
                        "expected LABEL=RA,DEC, got '{}'",
                        s
                    ))
                })?;
                let label = label.trim();
                if label.is_empty() {
                    return Err(SchedulerError::InvalidCoordinates(format!(
                        "missing label in '{}'",
                        s
                    )));
                }
                Ok(TargetSpec::at(
                    label,
                    EquatorialCoordinates::parse_sexagesimal(ra, dec)?,
                ))
            }
        }
    }
}
