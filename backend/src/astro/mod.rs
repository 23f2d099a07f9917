//! Minimal positional astronomy for visibility checks.
//!
//! Accuracy targets the scheduler's needs (a few hundredths of a degree, far
//! below one grid step of target motion), not ephemeris-grade work:
//! J2000 positions are used as-of-date and refraction is ignored.

pub mod horizontal;
pub mod sidereal;
pub mod sun;

pub use horizontal::{to_horizontal, Horizontal};
pub use sidereal::{greenwich_mean_sidereal_time, local_sidereal_time};
pub use sun::sun_position;
