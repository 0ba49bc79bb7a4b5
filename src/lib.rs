//! treebench - ordered-map benchmark harness
//!
//! Generates statistically-controlled workloads of ordered-map operations
//! and measures the wall-clock time external candidate implementations
//! (treaps, splay trees, ...) take to consume them.

use std::fmt;

// Public re-exports
pub mod config;
pub mod models;
pub mod runner;
pub mod util;
pub mod workload;

// Common error types
#[derive(Debug)]
pub enum TreeBenchError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// A percentage map cannot be turned into a quota
    InvalidDistribution(String),
    /// A workload file is missing its count line or otherwise malformed
    WorkloadFormat(String),
    /// Benchmark execution error
    BenchmarkError(String),
}

impl fmt::Display for TreeBenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeBenchError::IoError(err) => write!(f, "I/O error: {}", err),
            TreeBenchError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            TreeBenchError::InvalidDistribution(msg) => {
                write!(f, "Invalid distribution: {}", msg)
            }
            TreeBenchError::WorkloadFormat(msg) => write!(f, "Malformed workload: {}", msg),
            TreeBenchError::BenchmarkError(msg) => write!(f, "Benchmark error: {}", msg),
        }
    }
}

impl std::error::Error for TreeBenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeBenchError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TreeBenchError {
    fn from(err: std::io::Error) -> Self {
        TreeBenchError::IoError(err)
    }
}

impl From<serde_json::Error> for TreeBenchError {
    fn from(err: serde_json::Error) -> Self {
        TreeBenchError::BenchmarkError(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::de::Error> for TreeBenchError {
    fn from(err: toml::de::Error) -> Self {
        TreeBenchError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for TreeBenchError {
    fn from(err: toml::ser::Error) -> Self {
        TreeBenchError::ConfigError(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for treebench operations
pub type Result<T> = std::result::Result<T, TreeBenchError>;

// Common types and constants
pub const APP_NAME: &str = "treebench";
pub const CONFIG_FILE: &str = "treebench.toml";
pub const WORKLOAD_FILE_EXT: &str = "in";
