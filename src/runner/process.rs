//! Single timed candidate invocation
//!
//! One invocation is a scoped resource acquisition: the workload file handle
//! and the child process handle live only for the duration of the call and
//! are released on every exit path before the next invocation begins.

use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;

use crate::models::RunRecord;
use crate::runner::CandidateSpec;
use crate::workload::WorkloadFile;

/// Launch the candidate with the workload file on stdin, discard its stdout,
/// and measure wall-clock time strictly around the spawn-and-wait.
///
/// Never returns an error: a spawn failure becomes a `LaunchFailed` record
/// with no elapsed time, and a nonzero exit becomes a measured record with
/// the failure flag set. The caller's sweep keeps going either way.
pub async fn run_candidate(workload: &WorkloadFile, candidate: &CandidateSpec) -> RunRecord {
    let input = match std::fs::File::open(&workload.path) {
        Ok(file) => file,
        Err(err) => {
            return RunRecord::launch_failed(
                &workload.name,
                &candidate.name,
                workload.ops,
                format!("cannot open workload file: {}", err),
            )
        }
    };

    let start = Instant::now();
    let spawned = Command::new(&candidate.command)
        .stdin(Stdio::from(input))
        .stdout(Stdio::null())
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(err) => {
            return RunRecord::launch_failed(
                &workload.name,
                &candidate.name,
                workload.ops,
                err.to_string(),
            )
        }
    };

    let status = child.wait().await;
    let elapsed = start.elapsed();

    match status {
        Ok(status) if status.success() => {
            RunRecord::completed(&workload.name, &candidate.name, workload.ops, elapsed)
        }
        Ok(status) => RunRecord::failed_exit(
            &workload.name,
            &candidate.name,
            workload.ops,
            elapsed,
            status.code(),
        ),
        // wait() failing after a successful spawn: the time was still
        // measured, the exit code is unknown
        Err(_) => RunRecord::failed_exit(
            &workload.name,
            &candidate.name,
            workload.ops,
            elapsed,
            None,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunStatus;
    use crate::workload::{write_workload, Operation};
    use tempfile::tempdir;

    fn workload_in(dir: &std::path::Path) -> WorkloadFile {
        let path = dir.join("tiny.in");
        let ops = vec![Operation::Insert(1), Operation::Search(1)];
        write_workload(&path, &ops).unwrap();
        WorkloadFile {
            name: "tiny".to_string(),
            path,
            ops: 2,
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_candidate_is_timed() {
        let dir = tempdir().unwrap();
        let workload = workload_in(dir.path());
        let candidate = CandidateSpec::new("cat", "/bin/cat");

        let record = run_candidate(&workload, &candidate).await;
        assert_eq!(record.status, RunStatus::Completed);
        assert!(record.elapsed.is_some());
        assert_eq!(record.workload, "tiny");
        assert_eq!(record.candidate, "cat");
        assert_eq!(record.ops, 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_still_measured() {
        let dir = tempdir().unwrap();
        let workload = workload_in(dir.path());
        let candidate = CandidateSpec::new("false", "/bin/false");

        let record = run_candidate(&workload, &candidate).await;
        assert_eq!(record.status, RunStatus::NonZeroExit { code: Some(1) });
        assert!(record.elapsed.is_some());
    }

    #[tokio::test]
    async fn test_missing_executable_has_no_elapsed() {
        let dir = tempdir().unwrap();
        let workload = workload_in(dir.path());
        let candidate =
            CandidateSpec::new("ghost", dir.path().join("no_such_binary"));

        let record = run_candidate(&workload, &candidate).await;
        assert!(matches!(record.status, RunStatus::LaunchFailed(_)));
        assert_eq!(record.elapsed, None);
    }

    #[tokio::test]
    async fn test_missing_workload_file_contained_per_pair() {
        let dir = tempdir().unwrap();
        let workload = WorkloadFile {
            name: "gone".to_string(),
            path: dir.path().join("gone.in"),
            ops: 0,
        };
        let candidate = CandidateSpec::new("cat", "/bin/cat");

        let record = run_candidate(&workload, &candidate).await;
        assert!(matches!(record.status, RunStatus::LaunchFailed(_)));
        assert_eq!(record.elapsed, None);
    }
}
