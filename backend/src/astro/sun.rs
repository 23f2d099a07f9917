use qtty::{Degree, Degrees, Radians};

use crate::models::{EquatorialCoordinates, ModifiedJulianDate};

/// Apparent geocentric position of the Sun.
///
/// Low-precision formulae from the Astronomical Almanac (good to about
/// 0.01 deg between 1950 and 2050).
pub fn sun_position(t: ModifiedJulianDate) -> EquatorialCoordinates {
    let n = t.days_since_j2000();

    let mean_longitude = Degrees::new(280.460 + 0.985_647_4 * n).wrap_pos();
    let mean_anomaly = Degrees::new(357.528 + 0.985_600_3 * n).wrap_pos();
    let ecliptic_longitude = mean_longitude
        + Degrees::new(1.915 * mean_anomaly.sin() + 0.020 * (mean_anomaly * 2.0).sin());
    let obliquity = Degrees::new(23.439 - 0.000_000_4 * n);

    let (sin_lambda, cos_lambda) = ecliptic_longitude.sin_cos();
    let (sin_eps, cos_eps) = obliquity.sin_cos();

    let ra = Radians::new((cos_eps * sin_lambda).atan2(cos_lambda));
    let dec = Radians::new((sin_eps * sin_lambda).asin());

    EquatorialCoordinates {
        ra: ra.to::<Degree>().wrap_pos(),
        dec: dec.to::<Degree>(),
    }
}
