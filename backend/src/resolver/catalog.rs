//! Offline catalog of frequently requested objects.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::TargetResolver;
use crate::error::{SchedulerError, SchedulerResult};
use crate::models::EquatorialCoordinates;

/// A named position, as listed under `[[catalog]]` in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// J2000 right ascension in degrees
    pub ra_deg: f64,
    /// J2000 declination in degrees
    pub dec_deg: f64,
}

/// (name, aliases, RA deg, Dec deg), J2000
const BUILTIN: &[(&str, &[&str], f64, f64)] = &[
    ("M1", &["Crab Nebula", "NGC1952"], 83.63308, 22.01450),
    ("M8", &["Lagoon Nebula", "NGC6523"], 270.90417, -24.38667),
    ("M13", &["Hercules Cluster", "NGC6205"], 250.42183, 36.45986),
    ("M27", &["Dumbbell Nebula", "NGC6853"], 299.90142, 22.72114),
    ("M31", &["Andromeda Galaxy", "NGC224"], 10.68458, 41.26917),
    ("M33", &["Triangulum Galaxy", "NGC598"], 23.45842, 30.66019),
    ("M42", &["Orion Nebula", "NGC1976"], 83.82208, -5.39111),
    ("M44", &["Beehive Cluster", "Praesepe", "NGC2632"], 130.10000, 19.66667),
    ("M45", &["Pleiades"], 56.85000, 24.11667),
    ("M51", &["Whirlpool Galaxy", "NGC5194"], 202.46958, 47.19528),
    ("M57", &["Ring Nebula", "NGC6720"], 283.39617, 33.02917),
    ("M81", &["Bode's Galaxy", "NGC3031"], 148.88833, 69.06528),
    ("M101", &["Pinwheel Galaxy", "NGC5457"], 210.80250, 54.34917),
    ("M104", &["Sombrero Galaxy", "NGC4594"], 189.99750, -11.62306),
    ("Polaris", &["alf UMi"], 37.95454, 89.26411),
    ("Vega", &["alf Lyr"], 279.23475, 38.78369),
    ("Sirius", &["alf CMa"], 101.28717, -16.71611),
    ("Betelgeuse", &["alf Ori"], 88.79296, 7.40706),
];

/// Case- and whitespace-insensitive lookup key: "m 31" and "M31" match.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// In-memory name → position table.
#[derive(Debug, Clone, Default)]
pub struct CatalogResolver {
    entries: HashMap<String, EquatorialCoordinates>,
}

impl CatalogResolver {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with common Messier objects and bright stars.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (name, aliases, ra, dec) in BUILTIN {
            let coordinates = EquatorialCoordinates {
                ra: qtty::Degrees::new(*ra),
                dec: qtty::Degrees::new(*dec),
            };
            catalog.insert_with_aliases(name, aliases.iter().copied(), coordinates);
        }
        catalog
    }

    pub fn insert(&mut self, name: &str, coordinates: EquatorialCoordinates) {
        self.entries.insert(normalize(name), coordinates);
    }

    fn insert_with_aliases<'a>(
        &mut self,
        name: &str,
        aliases: impl IntoIterator<Item = &'a str>,
        coordinates: EquatorialCoordinates,
    ) {
        self.insert(name, coordinates);
        for alias in aliases {
            self.insert(alias, coordinates);
        }
    }

    /// Add configured entries, replacing built-in positions with the same name.
    pub fn extend_from_entries(&mut self, entries: &[CatalogEntry]) -> SchedulerResult<()> {
        for entry in entries {
            let coordinates = EquatorialCoordinates::new(entry.ra_deg, entry.dec_deg).map_err(|e| {
                SchedulerError::Configuration(format!("catalog entry '{}': {}", entry.name, e))
            })?;
            self.insert_with_aliases(
                &entry.name,
                entry.aliases.iter().map(String::as_str),
                coordinates,
            );
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TargetResolver for CatalogResolver {
    fn resolve(&self, name: &str) -> SchedulerResult<EquatorialCoordinates> {
        self.entries
            .get(&normalize(name))
            .copied()
            .ok_or_else(|| SchedulerError::resolution(name, "not in local catalog"))
    }

    fn name(&self) -> &str {
        "catalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_ignores_case_and_spaces() {
        let catalog = CatalogResolver::builtin();
        let m31 = catalog.resolve("M31").unwrap();
        assert_eq!(catalog.resolve("m 31").unwrap(), m31);
        assert_eq!(catalog.resolve("andromeda galaxy").unwrap(), m31);
        assert!((m31.ra.value() - 10.68458).abs() < 1e-9);
        assert!((m31.dec.value() - 41.26917).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_name() {
        let catalog = CatalogResolver::builtin();
        let err = catalog.resolve("NotARealObject").unwrap_err();
        assert_eq!(
            err,
            SchedulerError::resolution("NotARealObject", "not in local catalog")
        );
    }

    #[test]
    fn test_builtin_positions_are_valid() {
        for (name, _, ra, dec) in BUILTIN {
            assert!(
                EquatorialCoordinates::new(*ra, *dec).is_ok(),
                "bad builtin entry {}",
                name
            );
        }
    }

    #[test]
    fn test_configured_entries_override_builtin() {
        let mut catalog = CatalogResolver::builtin();
        let before = catalog.len();
        catalog
            .extend_from_entries(&[
                CatalogEntry {
                    name: "M31".to_string(),
                    aliases: vec![],
                    ra_deg: 11.0,
                    dec_deg: 41.0,
                },
                CatalogEntry {
                    name: "2024 XY".to_string(),
                    aliases: vec!["Comet XY".to_string()],
                    ra_deg: 120.0,
                    dec_deg: -10.0,
                },
            ])
            .unwrap();

        assert_eq!(catalog.len(), before + 2);
        assert_eq!(catalog.resolve("M31").unwrap().ra.value(), 11.0);
        assert_eq!(catalog.resolve("comet xy").unwrap().dec.value(), -10.0);
    }

    #[test]
    fn test_configured_entry_out_of_range() {
        let mut catalog = CatalogResolver::new();
        let err = catalog
            .extend_from_entries(&[CatalogEntry {
                name: "Bad".to_string(),
                aliases: vec![],
                ra_deg: 400.0,
                dec_deg: 0.0,
            }])
            .unwrap_err();
        assert!(matches!(err, SchedulerError::Configuration(_)));
        assert!(catalog.is_empty());
    }
}
