//! Turning target names into sky coordinates.
//!
//! Resolvers are tried through a [`ResolverChain`]: the local catalog first,
//! then (with the `sesame` feature) the CDS Sesame name service.

pub mod catalog;
#[cfg(feature = "sesame")]
pub mod sesame;

pub use catalog::{CatalogEntry, CatalogResolver};
#[cfg(feature = "sesame")]
pub use sesame::SesameResolver;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{EquatorialCoordinates, TargetSpec};

/// Looks up the J2000 position of a named object.
pub trait TargetResolver: Send + Sync {
    /// Resolve `name`, failing with `SchedulerError::TargetResolution`.
    fn resolve(&self, name: &str) -> SchedulerResult<EquatorialCoordinates>;

    /// Short label used in log messages
    fn name(&self) -> &str;
}

impl<R: TargetResolver + ?Sized> TargetResolver for Box<R> {
    fn resolve(&self, name: &str) -> SchedulerResult<EquatorialCoordinates> {
        (**self).resolve(name)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Tries each resolver in order and returns the first hit.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn TargetResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resolver: impl TargetResolver + 'static) -> Self {
        self.push(Box::new(resolver));
        self
    }

    pub fn push(&mut self, resolver: Box<dyn TargetResolver>) {
        self.resolvers.push(resolver);
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl TargetResolver for ResolverChain {
    fn resolve(&self, name: &str) -> SchedulerResult<EquatorialCoordinates> {
        let mut last_error = None;
        for resolver in &self.resolvers {
            match resolver.resolve(name) {
                Ok(coordinates) => {
                    log::debug!("Resolved '{}' via {}: {}", name, resolver.name(), coordinates);
                    return Ok(coordinates);
                }
                Err(e) => {
                    log::debug!("{} could not resolve '{}': {}", resolver.name(), name, e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| SchedulerError::resolution(name, "no resolver configured")))
    }

    fn name(&self) -> &str {
        "chain"
    }
}

/// Resolve every target up front, stopping at the first failure.
pub fn resolve_all(
    targets: &[TargetSpec],
    resolver: &dyn TargetResolver,
) -> SchedulerResult<Vec<(String, EquatorialCoordinates)>> {
    targets
        .iter()
        .map(|target| match target {
            TargetSpec::Named(name) => Ok((name.clone(), resolver.resolve(name)?)),
            TargetSpec::Coordinates { label, coordinates } => Ok((label.clone(), *coordinates)),
        })
        .collect()
}
