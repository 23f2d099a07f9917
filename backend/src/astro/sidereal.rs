use qtty::Degrees;

use crate::models::ModifiedJulianDate;

/// Greenwich mean sidereal time (IAU 1982 expression, UT taken as UTC).
pub fn greenwich_mean_sidereal_time(t: ModifiedJulianDate) -> Degrees {
    let d = t.days_since_j2000();
    let centuries = d / 36525.0;
    let gmst = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * centuries * centuries
        - centuries * centuries * centuries / 38_710_000.0;
    Degrees::new(gmst).wrap_pos()
}

/// Local mean sidereal time at east longitude `longitude`.
pub fn local_sidereal_time(t: ModifiedJulianDate, longitude: Degrees) -> Degrees {
    (greenwich_mean_sidereal_time(t) + longitude).wrap_pos()
}
