//! Configuration management module
//!
//! Holds the explicit sweep configuration passed into the generator and the
//! runner, plus TOML persistence of user preferences.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::runner::CandidateSpec;
use crate::workload::{Distribution, KeyRange, OpKind};
use crate::{Result, TreeBenchError, APP_NAME, CONFIG_FILE};

/// Sweep configuration: everything one generation + benchmark pass needs.
///
/// Passing this explicitly (rather than reading ambient globals) lets several
/// independent sweeps run in one process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Total operation count per quota-governed workload
    pub total_ops: u64,
    /// Lower bound of the key sampling domain, inclusive
    pub key_min: i64,
    /// Upper bound of the key sampling domain, inclusive
    pub key_max: i64,
    /// Directory the generated workload files are written to
    pub test_dir: PathBuf,
    /// RNG seed for reproducible generation; entropy-seeded when absent
    pub seed: Option<u64>,
    /// Named percentage maps, one workload file each
    pub distributions: BTreeMap<String, Distribution>,
    /// Candidate executables under test
    pub candidates: Vec<CandidateSpec>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            total_ops: 1_000_000,
            key_min: -1_000_000_000,
            key_max: 1_000_000_000,
            test_dir: PathBuf::from("tests"),
            seed: None,
            distributions: stock_distributions(),
            candidates: Vec::new(),
        }
    }
}

/// The classic treap-vs-splay sweep mixes
fn stock_distributions() -> BTreeMap<String, Distribution> {
    let mut map = BTreeMap::new();
    map.insert(
        "insert_heavy".to_string(),
        Distribution::new()
            .with(OpKind::Insert, 70)
            .with(OpKind::Delete, 20)
            .with(OpKind::Search, 4)
            .with(OpKind::Predecessor, 2)
            .with(OpKind::Successor, 2)
            .with(OpKind::Range, 2),
    );
    map.insert(
        "delete_heavy".to_string(),
        Distribution::new()
            .with(OpKind::Insert, 20)
            .with(OpKind::Delete, 70)
            .with(OpKind::Search, 4)
            .with(OpKind::Predecessor, 2)
            .with(OpKind::Successor, 2)
            .with(OpKind::Range, 2),
    );
    map.insert(
        "search_heavy".to_string(),
        Distribution::new()
            .with(OpKind::Insert, 10)
            .with(OpKind::Delete, 10)
            .with(OpKind::Search, 68)
            .with(OpKind::Predecessor, 4)
            .with(OpKind::Successor, 4)
            .with(OpKind::Range, 4),
    );
    map.insert(
        "balanced".to_string(),
        Distribution::new()
            .with(OpKind::Insert, 25)
            .with(OpKind::Delete, 25)
            .with(OpKind::Search, 26)
            .with(OpKind::Predecessor, 8)
            .with(OpKind::Successor, 8)
            .with(OpKind::Range, 8),
    );
    map.insert(
        "range_heavy".to_string(),
        Distribution::new()
            .with(OpKind::Insert, 50)
            .with(OpKind::Delete, 10)
            .with(OpKind::Search, 20)
            .with(OpKind::Range, 20),
    );
    map
}

impl SweepConfig {
    /// Create a new sweep configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// The key sampling domain as a range value
    pub fn key_range(&self) -> KeyRange {
        KeyRange::new(self.key_min, self.key_max)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.total_ops == 0 {
            return Err(TreeBenchError::ConfigError(
                "Total operation count must be greater than 0".to_string(),
            ));
        }

        const MAX_TOTAL_OPS: u64 = 100_000_000;
        if self.total_ops > MAX_TOTAL_OPS {
            return Err(TreeBenchError::ConfigError(format!(
                "Total operation count too large: {} (max: {})",
                self.total_ops, MAX_TOTAL_OPS
            )));
        }

        if self.key_min > self.key_max {
            return Err(TreeBenchError::ConfigError(format!(
                "Key range is empty: [{}, {}]",
                self.key_min, self.key_max
            )));
        }

        for (name, dist) in &self.distributions {
            if name.is_empty() {
                return Err(TreeBenchError::ConfigError(
                    "Distribution name must not be empty".to_string(),
                ));
            }
            if dist.is_empty() {
                return Err(TreeBenchError::ConfigError(format!(
                    "Distribution {} has no entries",
                    name
                )));
            }
        }

        for candidate in &self.candidates {
            if candidate.name.is_empty() {
                return Err(TreeBenchError::ConfigError(
                    "Candidate name must not be empty".to_string(),
                ));
            }
            if candidate.command.as_os_str().is_empty() {
                return Err(TreeBenchError::ConfigError(format!(
                    "Candidate {} has no command",
                    candidate.name
                )));
            }
        }

        Ok(())
    }

    /// Set the total operation count per workload
    pub fn with_total_ops(mut self, total_ops: u64) -> Self {
        self.total_ops = total_ops;
        self
    }

    /// Set the key sampling domain
    pub fn with_key_range(mut self, min: i64, max: i64) -> Self {
        self.key_min = min;
        self.key_max = max;
        self
    }

    /// Set the workload output directory
    pub fn with_test_dir(mut self, dir: PathBuf) -> Self {
        self.test_dir = dir;
        self
    }

    /// Fix the RNG seed for reproducible generation
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Add or replace a named distribution
    pub fn with_distribution(mut self, name: impl Into<String>, dist: Distribution) -> Self {
        self.distributions.insert(name.into(), dist);
        self
    }

    /// Register a candidate executable
    pub fn with_candidate(mut self, candidate: CandidateSpec) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Load configuration from the standard config file location
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| {
            TreeBenchError::ConfigError(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            TreeBenchError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the standard config file location
    pub fn save(&self) -> Result<()> {
        self.validate()?;

        let config_path = Self::config_file_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TreeBenchError::ConfigError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(&config_path, content).map_err(|e| {
            TreeBenchError::ConfigError(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/treebench/treebench.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            TreeBenchError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SweepConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.total_ops, 1_000_000);
        assert_eq!(config.distributions.len(), 5);
        assert!(config.candidates.is_empty());
    }

    #[test]
    fn test_builder_setters() {
        let config = SweepConfig::new()
            .with_total_ops(10_000)
            .with_key_range(-100, 100)
            .with_test_dir(PathBuf::from("/tmp/wl"))
            .with_seed(7)
            .with_candidate(CandidateSpec::new("treap", "./treap"));

        assert_eq!(config.total_ops, 10_000);
        assert_eq!(config.key_range(), KeyRange::new(-100, 100));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.candidates.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_ops() {
        let config = SweepConfig::new().with_total_ops(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_key_range() {
        let config = SweepConfig::new().with_key_range(10, -10);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_distribution() {
        let config = SweepConfig::new().with_distribution("noop", Distribution::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unnamed_candidate() {
        let config = SweepConfig::new().with_candidate(CandidateSpec::new("", "./treap"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SweepConfig::new()
            .with_total_ops(5000)
            .with_seed(11)
            .with_candidate(CandidateSpec::new("splay", "./splay"));

        let toml_str = toml::to_string(&config).expect("Failed to serialize to TOML");
        let deserialized: SweepConfig =
            toml::from_str(&toml_str).expect("Failed to deserialize from TOML");

        assert_eq!(config.total_ops, deserialized.total_ops);
        assert_eq!(config.key_min, deserialized.key_min);
        assert_eq!(config.key_max, deserialized.key_max);
        assert_eq!(config.seed, deserialized.seed);
        assert_eq!(config.distributions, deserialized.distributions);
        assert_eq!(config.candidates, deserialized.candidates);
    }

    #[test]
    fn test_config_file_path() {
        let path = SweepConfig::config_file_path();
        assert!(path.is_ok());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("treebench"));
        assert!(path.to_string_lossy().contains("treebench.toml"));
    }
}
