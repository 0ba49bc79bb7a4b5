//! Benchmark result data models
//!
//! One record per (workload, candidate) pair, plus the report structure the
//! whole sweep aggregates into.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::units::format_millis;
use crate::Result;

/// Outcome of one candidate invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Process ran to completion with exit status zero
    Completed,
    /// Process ran and exited nonzero; elapsed time was still measured.
    /// `code` is `None` when the process was killed by a signal.
    NonZeroExit { code: Option<i32> },
    /// Process could not be started at all
    LaunchFailed(String),
}

impl RunStatus {
    /// True unless the candidate completed cleanly
    pub fn is_failure(&self) -> bool {
        !matches!(self, RunStatus::Completed)
    }
}

/// One measured data point of the sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Name of the workload the candidate consumed
    pub workload: String,
    /// Name of the candidate under test
    pub candidate: String,
    /// Operation count declared by the workload file
    pub ops: u64,
    /// Wall-clock time from just before launch to process exit.
    /// `None` only when the process never launched.
    #[serde(with = "opt_duration_millis")]
    pub elapsed: Option<Duration>,
    /// Outcome flag; a failure never invalidates the record
    pub status: RunStatus,
    /// When the run was recorded
    pub timestamp: DateTime<Utc>,
}

impl RunRecord {
    /// Record a clean completion
    pub fn completed(
        workload: impl Into<String>,
        candidate: impl Into<String>,
        ops: u64,
        elapsed: Duration,
    ) -> Self {
        Self {
            workload: workload.into(),
            candidate: candidate.into(),
            ops,
            elapsed: Some(elapsed),
            status: RunStatus::Completed,
            timestamp: Utc::now(),
        }
    }

    /// Record a measured run whose process exited nonzero
    pub fn failed_exit(
        workload: impl Into<String>,
        candidate: impl Into<String>,
        ops: u64,
        elapsed: Duration,
        code: Option<i32>,
    ) -> Self {
        Self {
            workload: workload.into(),
            candidate: candidate.into(),
            ops,
            elapsed: Some(elapsed),
            status: RunStatus::NonZeroExit { code },
            timestamp: Utc::now(),
        }
    }

    /// Record a process that never launched; there is no elapsed time
    pub fn launch_failed(
        workload: impl Into<String>,
        candidate: impl Into<String>,
        ops: u64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            workload: workload.into(),
            candidate: candidate.into(),
            ops,
            elapsed: None,
            status: RunStatus::LaunchFailed(reason.into()),
            timestamp: Utc::now(),
        }
    }

    /// Elapsed wall-clock time in whole milliseconds, if measured
    pub fn elapsed_ms(&self) -> Option<u64> {
        self.elapsed.map(|d| d.as_millis() as u64)
    }

    /// Get a human-readable summary of this record
    pub fn summary(&self) -> String {
        let time = match self.elapsed {
            Some(elapsed) => format_millis(elapsed),
            None => "-".to_string(),
        };
        let marker = match &self.status {
            RunStatus::Completed => String::new(),
            RunStatus::NonZeroExit { code: Some(code) } => format!(" [exit {}]", code),
            RunStatus::NonZeroExit { code: None } => " [killed]".to_string(),
            RunStatus::LaunchFailed(reason) => format!(" [launch failed: {}]", reason),
        };
        format!(
            "{} / {} - {} ops - {}{}",
            self.workload, self.candidate, self.ops, time, marker
        )
    }
}

/// The full result set of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// One record per (workload, candidate) pair, in sweep order
    pub records: Vec<RunRecord>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: RunRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Candidate names present in the report, sorted
    pub fn candidates(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.candidate.as_str()).collect()
    }

    /// Workload names present in the report, sorted
    pub fn workloads(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.workload.as_str()).collect()
    }

    /// `(ops, elapsed ms)` points for one candidate, sorted by ops: the raw
    /// material of a size-vs-time comparison. Unmeasured (never-launched)
    /// records carry no point.
    pub fn series_for(&self, candidate: &str) -> Vec<(u64, u64)> {
        let mut points: Vec<(u64, u64)> = self
            .records
            .iter()
            .filter(|r| r.candidate == candidate)
            .filter_map(|r| r.elapsed_ms().map(|ms| (r.ops, ms)))
            .collect();
        points.sort();
        points
    }

    /// Export the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// Custom serde module storing elapsed time as whole milliseconds
mod opt_duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(elapsed: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        elapsed
            .map(|d| d.as_millis() as u64)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<u64>::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}
