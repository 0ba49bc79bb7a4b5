//! Workload generation module
//!
//! Contains the operation data model, exact-quota distribution resolution,
//! operation synthesis, and the line-oriented test-file encoding.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SweepConfig;
use crate::{Result, TreeBenchError, WORKLOAD_FILE_EXT};

pub mod file;
pub mod quota;
pub mod synth;

// Re-export commonly used types
pub use file::{read_declared_count, read_workload, write_workload};
pub use quota::Quota;
pub use synth::{insert_search_pattern, synthesize, InsertOrder};

/// Operation categories in wire-code order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Insert a key into the map
    Insert,
    /// Delete a key from the map
    Delete,
    /// Look up a key
    Search,
    /// Largest key strictly below the operand
    Predecessor,
    /// Smallest key strictly above the operand
    Successor,
    /// Query all keys within an inclusive range
    Range,
}

impl OpKind {
    /// All categories in wire-code order (code 1 first)
    pub const ALL: [OpKind; 6] = [
        OpKind::Insert,
        OpKind::Delete,
        OpKind::Search,
        OpKind::Predecessor,
        OpKind::Successor,
        OpKind::Range,
    ];

    /// Wire opcode for this category (1..=6)
    pub fn code(self) -> u8 {
        match self {
            OpKind::Insert => 1,
            OpKind::Delete => 2,
            OpKind::Search => 3,
            OpKind::Predecessor => 4,
            OpKind::Successor => 5,
            OpKind::Range => 6,
        }
    }

    /// Parse a wire opcode back into a category
    pub fn from_code(code: u8) -> Option<OpKind> {
        match code {
            1 => Some(OpKind::Insert),
            2 => Some(OpKind::Delete),
            3 => Some(OpKind::Search),
            4 => Some(OpKind::Predecessor),
            5 => Some(OpKind::Successor),
            6 => Some(OpKind::Range),
            _ => None,
        }
    }
}

/// One workload instruction
///
/// The payload shape is fixed per category: every category carries exactly
/// one key except `Range`, which carries an ordered pair with `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert(i64),
    Delete(i64),
    Search(i64),
    Predecessor(i64),
    Successor(i64),
    Range { low: i64, high: i64 },
}

impl Operation {
    /// The category of this operation
    pub fn kind(&self) -> OpKind {
        match self {
            Operation::Insert(_) => OpKind::Insert,
            Operation::Delete(_) => OpKind::Delete,
            Operation::Search(_) => OpKind::Search,
            Operation::Predecessor(_) => OpKind::Predecessor,
            Operation::Successor(_) => OpKind::Successor,
            Operation::Range { .. } => OpKind::Range,
        }
    }

    /// Build a single-key operation; panics on `OpKind::Range`, which needs a pair
    pub(crate) fn single(kind: OpKind, key: i64) -> Operation {
        match kind {
            OpKind::Insert => Operation::Insert(key),
            OpKind::Delete => Operation::Delete(key),
            OpKind::Search => Operation::Search(key),
            OpKind::Predecessor => Operation::Predecessor(key),
            OpKind::Successor => Operation::Successor(key),
            OpKind::Range => unreachable!("range operations carry a key pair"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Range { low, high } => {
                write!(f, "{} {} {}", OpKind::Range.code(), low, high)
            }
            Operation::Insert(key)
            | Operation::Delete(key)
            | Operation::Search(key)
            | Operation::Predecessor(key)
            | Operation::Successor(key) => write!(f, "{} {}", self.kind().code(), key),
        }
    }
}

impl FromStr for Operation {
    type Err = TreeBenchError;

    fn from_str(line: &str) -> Result<Operation> {
        let mut fields = line.split_whitespace();
        let code: u8 = fields
            .next()
            .ok_or_else(|| TreeBenchError::WorkloadFormat("empty operation line".to_string()))?
            .parse()
            .map_err(|_| {
                TreeBenchError::WorkloadFormat(format!("invalid opcode in line: {}", line))
            })?;
        let kind = OpKind::from_code(code).ok_or_else(|| {
            TreeBenchError::WorkloadFormat(format!("unknown opcode {}: {}", code, line))
        })?;

        let mut next_key = || -> Result<i64> {
            fields
                .next()
                .ok_or_else(|| {
                    TreeBenchError::WorkloadFormat(format!("missing operand in line: {}", line))
                })?
                .parse()
                .map_err(|_| {
                    TreeBenchError::WorkloadFormat(format!("invalid operand in line: {}", line))
                })
        };

        let op = match kind {
            OpKind::Range => {
                let low = next_key()?;
                let high = next_key()?;
                if low > high {
                    return Err(TreeBenchError::WorkloadFormat(format!(
                        "range bounds out of order: {}",
                        line
                    )));
                }
                Operation::Range { low, high }
            }
            _ => Operation::single(kind, next_key()?),
        };

        if fields.next().is_some() {
            return Err(TreeBenchError::WorkloadFormat(format!(
                "trailing content in line: {}",
                line
            )));
        }
        Ok(op)
    }
}

/// Inclusive key domain for uniform sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRange {
    pub min: i64,
    pub max: i64,
}

impl KeyRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Sample a key uniformly from `[min, max]`
    pub fn sample(&self, rng: &mut impl Rng) -> i64 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Percentage map over operation categories
///
/// Percentages need not sum to exactly 100; the quota machinery absorbs the
/// rounding either way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution(BTreeMap<OpKind, u32>);

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a category's percentage (builder style)
    pub fn with(mut self, kind: OpKind, pct: u32) -> Self {
        self.0.insert(kind, pct);
        self
    }

    /// Percentage for a category, zero if unset
    pub fn pct(&self, kind: OpKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// True if the map has no entries at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any category has a nonzero percentage
    pub fn has_nonzero(&self) -> bool {
        self.0.values().any(|&p| p > 0)
    }
}

/// A named, ordered sequence of operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    /// Workload name, used as the file stem
    pub name: String,
    /// The operation sequence, order-significant
    pub ops: Vec<Operation>,
}

impl Workload {
    pub fn new(name: impl Into<String>, ops: Vec<Operation>) -> Self {
        Self {
            name: name.into(),
            ops,
        }
    }

    /// Declared operation count
    pub fn len(&self) -> u64 {
        self.ops.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Descriptor of a workload file on disk, what the runner iterates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadFile {
    /// Workload name (file stem)
    pub name: String,
    /// Path of the serialized workload
    pub path: PathBuf,
    /// Operation count declared on the file's first line
    pub ops: u64,
}

/// Build one quota-governed workload: resolve the quota, synthesize and
/// shuffle the operations
pub fn build_workload(
    name: &str,
    total_ops: u64,
    keys: KeyRange,
    dist: &Distribution,
    rng: &mut impl Rng,
) -> Result<Workload> {
    let quota = Quota::from_percentages(total_ops, dist)?;
    let ops = synthesize(&quota, keys, rng);
    Ok(Workload::new(name, ops))
}

/// Generate the full workload set into the configured test directory:
/// the three insert+search interleaves plus one file per named distribution.
///
/// A distribution that cannot be satisfied is skipped with a diagnostic;
/// the remaining workloads are unaffected.
pub fn generate_workloads(
    config: &SweepConfig,
    rng: &mut impl Rng,
) -> Result<Vec<WorkloadFile>> {
    std::fs::create_dir_all(&config.test_dir)?;
    let mut files = Vec::new();

    let patterns = [
        ("simple_ascending", InsertOrder::Ascending),
        ("simple_descending", InsertOrder::Descending),
        ("simple_random", InsertOrder::Shuffled),
    ];
    for (name, order) in patterns {
        let ops = insert_search_pattern(config.total_ops, order, rng);
        files.push(write_named(config, name, &ops)?);
    }

    let keys = config.key_range();
    for (name, dist) in &config.distributions {
        match build_workload(name, config.total_ops, keys, dist, rng) {
            Ok(workload) => files.push(write_named(config, name, &workload.ops)?),
            Err(err) => eprintln!("skipping workload {}: {}", name, err),
        }
    }

    Ok(files)
}

fn write_named(config: &SweepConfig, name: &str, ops: &[Operation]) -> Result<WorkloadFile> {
    let path = config
        .test_dir
        .join(format!("{}.{}", name, WORKLOAD_FILE_EXT));
    write_workload(&path, ops)?;
    Ok(WorkloadFile {
        name: name.to_string(),
        path,
        ops: ops.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_round_trip() {
        for kind in OpKind::ALL {
            assert_eq!(OpKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(OpKind::from_code(0), None);
        assert_eq!(OpKind::from_code(7), None);
    }

    #[test]
    fn test_operation_line_encoding() {
        assert_eq!(Operation::Insert(42).to_string(), "1 42");
        assert_eq!(Operation::Delete(-7).to_string(), "2 -7");
        assert_eq!(Operation::Search(0).to_string(), "3 0");
        assert_eq!(Operation::Predecessor(5).to_string(), "4 5");
        assert_eq!(Operation::Successor(5).to_string(), "5 5");
        assert_eq!(
            Operation::Range { low: -3, high: 9 }.to_string(),
            "6 -3 9"
        );
    }

    #[test]
    fn test_operation_parse_round_trip() {
        let ops = [
            Operation::Insert(i64::MAX),
            Operation::Delete(i64::MIN),
            Operation::Search(-1),
            Operation::Predecessor(1_000_000_000),
            Operation::Successor(-1_000_000_000),
            Operation::Range { low: 1, high: 1 },
        ];
        for op in ops {
            let parsed: Operation = op.to_string().parse().unwrap();
            assert_eq!(parsed, op);
        }
    }

    #[test]
    fn test_operation_parse_rejects_malformed_lines() {
        assert!("".parse::<Operation>().is_err());
        assert!("7 1".parse::<Operation>().is_err());
        assert!("1".parse::<Operation>().is_err());
        assert!("1 abc".parse::<Operation>().is_err());
        assert!("6 5".parse::<Operation>().is_err());
        assert!("6 9 3".parse::<Operation>().is_err());
        assert!("1 2 3".parse::<Operation>().is_err());
    }

    #[test]
    fn test_key_range_sampling_stays_in_bounds() {
        use rand::rngs::SmallRng;
        use rand::SeedableRng;

        let range = KeyRange::new(-10, 10);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            let key = range.sample(&mut rng);
            assert!(key >= -10 && key <= 10);
        }
    }

    #[test]
    fn test_distribution_accessors() {
        let dist = Distribution::new()
            .with(OpKind::Insert, 70)
            .with(OpKind::Delete, 20);
        assert_eq!(dist.pct(OpKind::Insert), 70);
        assert_eq!(dist.pct(OpKind::Search), 0);
        assert!(!dist.is_empty());
        assert!(dist.has_nonzero());
        assert!(Distribution::new().is_empty());
    }
}
