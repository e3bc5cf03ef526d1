//! Configuration for the campusgraph seeder.
//!
//! Loaded from (in priority order):
//! 1. Command-line flags
//! 2. Environment variables (`CAMPUSGRAPH__SEED__*`, `CAMPUSGRAPH__NEO4J__*`)
//! 3. Config file (`campusgraph.toml`, `[seed]` and `[neo4j]` sections)
//! 4. Defaults

use serde::{Deserialize, Serialize};

use campusgraph_core::EntityKind;
use campusgraph_graph::GraphConfig;

use crate::error::Result;

/// How many entities of each kind to generate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetCounts {
    #[serde(default = "default_universities")]
    pub universities: usize,
    #[serde(default = "default_cities")]
    pub cities: usize,
    #[serde(default = "default_people")]
    pub people: usize,
    #[serde(default = "default_courses")]
    pub courses: usize,
    #[serde(default = "default_campuses")]
    pub campuses: usize,
}

impl DatasetCounts {
    pub fn get(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::University => self.universities,
            EntityKind::City => self.cities,
            EntityKind::Person => self.people,
            EntityKind::Course => self.courses,
            EntityKind::Campus => self.campuses,
        }
    }
}

impl Default for DatasetCounts {
    fn default() -> Self {
        Self {
            universities: default_universities(),
            cities: default_cities(),
            people: default_people(),
            courses: default_courses(),
            campuses: default_campuses(),
        }
    }
}

/// The `[seed]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    #[serde(flatten)]
    pub counts: DatasetCounts,

    /// Fixed RNG seed for reproducible datasets. Unset draws from entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_universities() -> usize {
    5
}

fn default_cities() -> usize {
    10
}

fn default_people() -> usize {
    50
}

fn default_courses() -> usize {
    20
}

fn default_campuses() -> usize {
    15
}

fn builder(file_prefix: &str) -> config::ConfigBuilder<config::builder::DefaultState> {
    config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("CAMPUSGRAPH")
                .separator("__")
                .try_parsing(true),
        )
}

/// Load the `[seed]` section, falling back to defaults when it is absent.
pub fn load_seed_config(file_prefix: &str) -> Result<SeedConfig> {
    let cfg = builder(file_prefix).build()?;

    match cfg.get::<SeedConfig>("seed") {
        Ok(c) => Ok(c),
        Err(config::ConfigError::NotFound(_)) => Ok(SeedConfig::default()),
        Err(e) => Err(e.into()),
    }
}

/// Load Neo4j connection settings from the `[neo4j]` section.
pub fn load_graph_config(file_prefix: &str) -> GraphConfig {
    let defaults = GraphConfig::default();

    match builder(file_prefix).build() {
        Ok(c) => GraphConfig {
            uri: c.get_string("neo4j.uri").unwrap_or(defaults.uri),
            user: c.get_string("neo4j.user").unwrap_or(defaults.user),
            password: c.get_string("neo4j.password").unwrap_or(defaults.password),
            dataset: c.get_string("neo4j.dataset").unwrap_or(defaults.dataset),
            ..GraphConfig::default()
        },
        Err(_) => defaults,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_counts() {
        let counts = DatasetCounts::default();
        assert_eq!(counts.get(EntityKind::University), 5);
        assert_eq!(counts.get(EntityKind::City), 10);
        assert_eq!(counts.get(EntityKind::Person), 50);
        assert_eq!(counts.get(EntityKind::Course), 20);
        assert_eq!(counts.get(EntityKind::Campus), 15);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_seed_config("does-not-exist-campusgraph").unwrap();
        assert_eq!(config.counts, DatasetCounts::default());
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn test_file_overrides_some_counts() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[seed]\npeople = 12\nrng_seed = 42\n\n[neo4j]\ndataset = \"demo\"\n"
        )
        .unwrap();
        let prefix = file.path().with_extension("");
        let prefix = prefix.to_str().unwrap();

        let seed = load_seed_config(prefix).unwrap();
        assert_eq!(seed.counts.people, 12);
        assert_eq!(seed.counts.universities, 5);
        assert_eq!(seed.rng_seed, Some(42));

        let graph = load_graph_config(prefix);
        assert_eq!(graph.dataset, "demo");
        assert_eq!(graph.uri, "bolt://localhost:7687");
    }
}
