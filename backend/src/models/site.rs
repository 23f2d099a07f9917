use qtty::{Degrees, Meters};
use serde::{Deserialize, Serialize};

use crate::error::{SchedulerError, SchedulerResult};

/// Geographic location of the observatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Display name, e.g. "Stone Edge Observatory"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Latitude (-90 to 90)
    pub latitude: Degrees,
    /// Longitude, east positive (-180 to 180)
    pub longitude: Degrees,
    /// Elevation above sea level
    pub elevation: Meters,
}

impl Site {
    pub fn new(latitude: f64, longitude: f64, elevation_m: f64) -> SchedulerResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SchedulerError::InvalidSite(
                "Latitude must be between -90 and 90 degrees".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(SchedulerError::InvalidSite(
                "Longitude must be between -180 and 180 degrees".to_string(),
            ));
        }
        if !elevation_m.is_finite() {
            return Err(SchedulerError::InvalidSite(
                "Elevation must be a finite number of meters".to_string(),
            ));
        }
        Ok(Self {
            name: None,
            latitude: Degrees::new(latitude),
            longitude: Degrees::new(longitude),
            elevation: Meters::new(elevation_m),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The Stone Edge Observatory site the queue was built for.
    pub fn stone_edge() -> Self {
        Self {
            name: Some("Stone Edge Observatory".to_string()),
            latitude: Degrees::new(38.2886),
            longitude: Degrees::new(-122.504),
            elevation: Meters::new(60.0),
        }
    }
}

impl Default for Site {
    fn default() -> Self {
        Self::stone_edge()
    }
}
