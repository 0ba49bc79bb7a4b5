//! Benchmark runner module
//!
//! Discovers serialized workloads, executes every candidate against every
//! workload, and aggregates the timed results into a report.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::Report;
use crate::workload::{read_declared_count, WorkloadFile};
use crate::{Result, WORKLOAD_FILE_EXT};

pub mod process;

// Re-export commonly used items
pub use process::run_candidate;

/// An external executable under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSpec {
    /// Display name used in results
    pub name: String,
    /// Command invoked with no arguments; the workload arrives on stdin
    pub command: PathBuf,
}

impl CandidateSpec {
    pub fn new(name: impl Into<String>, command: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
        }
    }
}

/// List the workload files in `dir`, sorted by file name.
///
/// A file whose count line cannot be read is dropped from the sweep with a
/// diagnostic; the remaining workloads are unaffected.
pub fn discover_workloads(dir: &Path) -> Result<Vec<WorkloadFile>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext == WORKLOAD_FILE_EXT)
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut workloads = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        match read_declared_count(&path) {
            Ok(ops) => workloads.push(WorkloadFile { name, path, ops }),
            Err(err) => eprintln!("skipping workload {}: {}", path.display(), err),
        }
    }
    Ok(workloads)
}

/// Sequential sweep executor.
///
/// Exactly one candidate process is live at a time across the whole sweep,
/// so no two timed runs ever share a measurement window.
pub struct SweepRunner {
    candidates: Vec<CandidateSpec>,
}

impl SweepRunner {
    /// Create a runner over a candidate registry
    pub fn new(candidates: Vec<CandidateSpec>) -> Self {
        Self { candidates }
    }

    /// The registered candidates
    pub fn candidates(&self) -> &[CandidateSpec] {
        &self.candidates
    }

    /// Run every candidate against every workload, one invocation at a time.
    ///
    /// A candidate failing on one workload never prevents timing of the
    /// remaining pairs: the report always holds exactly
    /// `workloads.len() * candidates.len()` records.
    pub async fn run_all(&self, workloads: &[WorkloadFile]) -> Report {
        let mut report = Report::new();
        for workload in workloads {
            println!("Running {} ({} ops)", workload.name, workload.ops);
            for candidate in &self.candidates {
                let record = run_candidate(workload, candidate).await;
                println!("   {}", record.summary());
                report.push(record);
            }
        }
        report
    }
}
