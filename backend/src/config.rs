//! Scheduler configuration file support.
//!
//! Configuration is read from TOML. Every section is optional; missing values
//! fall back to the Stone Edge Observatory deployment defaults.
//!
//! ```toml
//! [site]
//! name = "Stone Edge Observatory"
//! latitude = 38.2886
//! longitude = -122.504
//! elevation_m = 60.0
//!
//! [window]
//! lookahead_hours = 18.0
//! samples = 1000
//! darkness_threshold_deg = -12.0
//!
//! [selection]
//! min_altitude_deg = 40.0
//! policy = "soonest_peak"
//!
//! [resolver]
//! online = true
//! timeout_secs = 10
//!
//! [[catalog]]
//! name = "C/2025 A1"
//! ra_deg = 120.5
//! dec_deg = 12.25
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use qtty::Hours;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{lookahead_end, Site};
#[cfg(feature = "sesame")]
use crate::resolver::SesameResolver;
use crate::resolver::{CatalogEntry, CatalogResolver, ResolverChain};
use crate::scheduler::SelectionPolicy;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "ATLAS_SCHEDULER_CONFIG";

/// Scheduler configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub selection: SelectionSettings,
    #[serde(default)]
    pub resolver: ResolverSettings,
    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
}

/// Observatory location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_site_name")]
    pub name: Option<String>,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_elevation_m")]
    pub elevation_m: f64,
}

/// Time grid and darkness threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default = "default_lookahead_hours")]
    pub lookahead_hours: f64,
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_darkness_threshold_deg")]
    pub darkness_threshold_deg: f64,
}

/// Target qualification and tie-breaking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionSettings {
    #[serde(default = "default_min_altitude_deg")]
    pub min_altitude_deg: f64,
    #[serde(default)]
    pub policy: SelectionPolicy,
}

/// Name resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Query the online name service for names missing from the catalog
    #[serde(default = "default_online")]
    pub online: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_sesame_url")]
    pub sesame_url: String,
}

fn default_latitude() -> f64 {
    38.2886
}

fn default_longitude() -> f64 {
    -122.504
}

fn default_elevation_m() -> f64 {
    60.0
}

fn default_lookahead_hours() -> f64 {
    18.0
}

fn default_samples() -> usize {
    1000
}

fn default_darkness_threshold_deg() -> f64 {
    -12.0
}

fn default_min_altitude_deg() -> f64 {
    40.0
}

fn default_online() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_site_name() -> Option<String> {
    Some("Stone Edge Observatory".to_string())
}

fn default_sesame_url() -> String {
    "https://cds.unistra.fr/cgi-bin/nph-sesame/-oI/A".to_string()
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            elevation_m: default_elevation_m(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            lookahead_hours: default_lookahead_hours(),
            samples: default_samples(),
            darkness_threshold_deg: default_darkness_threshold_deg(),
        }
    }
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            min_altitude_deg: default_min_altitude_deg(),
            policy: SelectionPolicy::default(),
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            online: default_online(),
            timeout_secs: default_timeout_secs(),
            sesame_url: default_sesame_url(),
        }
    }
}

impl SchedulerConfig {
    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> SchedulerResult<Self> {
        let config: SchedulerConfig = toml::from_str(content).map_err(|e| {
            SchedulerError::Configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load scheduler configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(SchedulerConfig)` if successful
    /// * `Err(SchedulerError::Configuration)` if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> SchedulerResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            SchedulerError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Uses the file named by `ATLAS_SCHEDULER_CONFIG` when set, otherwise
    /// searches for `scheduler.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to built-in defaults when no file exists.
    pub fn from_default_location() -> SchedulerResult<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(path);
        }

        let search_paths = [
            PathBuf::from("scheduler.toml"),
            PathBuf::from("backend/scheduler.toml"),
            PathBuf::from("../scheduler.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading scheduler config from {}", path.display());
                return Self::from_file(&path);
            }
        }

        log::info!("No scheduler.toml found, using built-in defaults");
        Ok(Self::default())
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> SchedulerResult<()> {
        self.site()?;
        lookahead_end(Utc::now(), Hours::new(self.window.lookahead_hours)).map_err(|e| match e {
            SchedulerError::Configuration(msg) => {
                SchedulerError::Configuration(format!("window.lookahead_hours: {}", msg))
            }
            other => other,
        })?;
        if self.window.samples < 2 {
            return Err(SchedulerError::Configuration(
                "window.samples must be at least 2".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.window.darkness_threshold_deg) {
            return Err(SchedulerError::Configuration(
                "window.darkness_threshold_deg must be between -90 and 90".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.selection.min_altitude_deg) {
            return Err(SchedulerError::Configuration(
                "selection.min_altitude_deg must be between -90 and 90".to_string(),
            ));
        }
        if self.resolver.timeout_secs == 0 {
            return Err(SchedulerError::Configuration(
                "resolver.timeout_secs must be positive".to_string(),
            ));
        }
        CatalogResolver::new().extend_from_entries(&self.catalog)
    }

    /// Validated observation site.
    pub fn site(&self) -> SchedulerResult<Site> {
        let site = Site::new(
            self.site.latitude,
            self.site.longitude,
            self.site.elevation_m,
        )?;
        Ok(match &self.site.name {
            Some(name) => site.with_name(name.clone()),
            None => site,
        })
    }

    pub fn resolver_timeout(&self) -> Duration {
        Duration::from_secs(self.resolver.timeout_secs)
    }

    /// Resolver chain described by this configuration: the built-in catalog
    /// plus `[[catalog]]` entries, then the online service when enabled.
    pub fn build_resolver(&self) -> SchedulerResult<ResolverChain> {
        let mut catalog = CatalogResolver::builtin();
        catalog.extend_from_entries(&self.catalog)?;
        let chain = ResolverChain::new().with(catalog);

        if !self.resolver.online {
            return Ok(chain);
        }
        self.with_online_resolver(chain)
    }

    #[cfg(feature = "sesame")]
    fn with_online_resolver(&self, chain: ResolverChain) -> SchedulerResult<ResolverChain> {
        let sesame = SesameResolver::new(&self.resolver.sesame_url, self.resolver_timeout())?;
        Ok(chain.with(sesame))
    }

    #[cfg(not(feature = "sesame"))]
    fn with_online_resolver(&self, chain: ResolverChain) -> SchedulerResult<ResolverChain> {
        log::warn!("Online name resolution requested but the `sesame` feature is disabled");
        Ok(chain)
    }
}
