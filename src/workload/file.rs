//! Workload file encoding
//!
//! Plain text, one operation per line:
//!
//! ```text
//! <N>
//! <opcode> <arg1> [<arg2>]
//! ```
//!
//! The first line is the exact operation count; exactly N operation lines
//! follow, no trailing content.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::workload::Operation;
use crate::{Result, TreeBenchError};

/// Serialize an operation sequence to `path`, count line first
pub fn write_workload(path: &Path, ops: &[Operation]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", ops.len())?;
    for op in ops {
        writeln!(writer, "{}", op)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read only the declared operation count from a workload file's first line
pub fn read_declared_count(path: &Path) -> Result<u64> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(TreeBenchError::WorkloadFormat(format!(
            "{}: missing count line",
            path.display()
        )));
    }
    line.trim().parse().map_err(|_| {
        TreeBenchError::WorkloadFormat(format!(
            "{}: invalid count line: {}",
            path.display(),
            line.trim()
        ))
    })
}

/// Parse a full workload file back into operations, checking the declared
/// count against the actual line count
pub fn read_workload(path: &Path) -> Result<Vec<Operation>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let count_line = lines.next().transpose()?.ok_or_else(|| {
        TreeBenchError::WorkloadFormat(format!("{}: missing count line", path.display()))
    })?;
    let declared: u64 = count_line.trim().parse().map_err(|_| {
        TreeBenchError::WorkloadFormat(format!(
            "{}: invalid count line: {}",
            path.display(),
            count_line.trim()
        ))
    })?;

    let mut ops = Vec::with_capacity(declared as usize);
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        ops.push(line.parse()?);
    }

    if ops.len() as u64 != declared {
        return Err(TreeBenchError::WorkloadFormat(format!(
            "{}: declared {} operations but found {}",
            path.display(),
            declared,
            ops.len()
        )));
    }
    Ok(ops)
}
