//! Visibility computations over a time grid.
//!
//! These functions do not resolve names or pick targets; the scheduler
//! combines them.

pub mod astronomical_night;
pub mod visibility_computer;

pub use astronomical_night::compute_night_window;
pub use visibility_computer::{compute_target_sample, VisibilityCriteria};
