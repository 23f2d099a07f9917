use qtty::{Degree, Degrees, Radians};
use serde::{Deserialize, Serialize};

use super::sidereal::local_sidereal_time;
use crate::models::{EquatorialCoordinates, ModifiedJulianDate, Site};

/// Altitude/azimuth as seen from a site at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Horizontal {
    pub altitude: Degrees,
    /// Measured from north through east, in [0, 360)
    pub azimuth: Degrees,
}

/// Transform `target` into the site's horizontal frame at `t`.
pub fn to_horizontal(
    target: &EquatorialCoordinates,
    site: &Site,
    t: ModifiedJulianDate,
) -> Horizontal {
    let hour_angle = local_sidereal_time(t, site.longitude) - target.ra;

    let (sin_lat, cos_lat) = site.latitude.sin_cos();
    let (sin_dec, cos_dec) = target.dec.sin_cos();
    let (sin_h, cos_h) = hour_angle.sin_cos();

    let sin_alt = (sin_lat * sin_dec + cos_lat * cos_dec * cos_h).clamp(-1.0, 1.0);
    let altitude = Radians::new(sin_alt.asin()).to::<Degree>();

    let azimuth = Radians::new((-cos_dec * sin_h).atan2(sin_dec * cos_lat - cos_dec * sin_lat * cos_h))
        .to::<Degree>()
        .wrap_pos();

    Horizontal { altitude, azimuth }
}
