//! # Atlas Scheduler
//!
//! Next-target selection for a single-telescope observing queue.
//!
//! Given the queued targets and the current time, the scheduler samples the
//! next hours on a fixed grid, finds the astronomical night from the Sun's
//! altitude, locates each target's culmination and reports which target to
//! observe next and how long to wait for it.
//!
//! ## Architecture
//!
//! - [`models`]: Time, site, target and result types
//! - [`astro`]: Sidereal time, solar position and horizontal coordinates
//! - [`resolver`]: Target name lookup (local catalog, CDS Sesame)
//! - [`services`]: Night window and per-target visibility computations
//! - [`scheduler`]: The scheduling pipeline and selection policies
//! - [`config`]: TOML configuration
//!
//! ## Example
//!
//! ```rust
//! use atlas_scheduler::models::TargetSpec;
//! use atlas_scheduler::resolver::CatalogResolver;
//! use atlas_scheduler::scheduler::{Scheduler, SchedulerSettings};
//! use chrono::{TimeZone, Utc};
//!
//! let scheduler = Scheduler::new(SchedulerSettings::default(), CatalogResolver::builtin());
//! let now = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
//! let result = scheduler
//!     .schedule(&[TargetSpec::named("M42"), TargetSpec::named("M81")], now)
//!     .unwrap();
//! assert_eq!(result.primary_target, "M42");
//! ```

pub mod astro;
pub mod config;
pub mod error;
pub mod models;
pub mod resolver;
pub mod scheduler;
pub mod services;

pub use config::SchedulerConfig;
pub use error::{SchedulerError, SchedulerResult};
pub use models::{ScheduleResult, TargetSpec, Wait};
pub use scheduler::{schedule, Scheduler, SchedulerSettings, SelectionPolicy};
