//! Operation synthesis
//!
//! Materializes a quota into a uniformly shuffled operation sequence, and
//! produces the deterministic insert+search interleaves used to probe
//! worst-case and best-case tree shapes.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::workload::{KeyRange, OpKind, Operation, Quota};

/// Turn a quota into a shuffled operation sequence.
///
/// The category list is shuffled before keys are drawn, so operation types
/// interleave instead of clustering. Single-key categories sample uniformly
/// from the key range; range queries draw two independent keys and swap them
/// into order. The resulting `(low, high)` distribution is order-statistics
/// biased rather than uniform over the triangle; accepted, not corrected.
pub fn synthesize(quota: &Quota, keys: KeyRange, rng: &mut impl Rng) -> Vec<Operation> {
    let mut kinds = Vec::with_capacity(quota.total() as usize);
    for kind in OpKind::ALL {
        for _ in 0..quota.count(kind) {
            kinds.push(kind);
        }
    }
    kinds.shuffle(rng);

    kinds
        .into_iter()
        .map(|kind| match kind {
            OpKind::Range => {
                let a = keys.sample(rng);
                let b = keys.sample(rng);
                Operation::Range {
                    low: a.min(b),
                    high: a.max(b),
                }
            }
            _ => Operation::single(kind, keys.sample(rng)),
        })
        .collect()
}

/// Order in which the insert+search interleave walks the keys `1..=n`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOrder {
    /// Keys in increasing order
    Ascending,
    /// Keys in decreasing order
    Descending,
    /// Keys in a uniformly shuffled order
    Shuffled,
}

/// Insert+search interleave over the keys `1..=n`: each key is inserted and
/// then immediately searched, so the search order mirrors the insert order in
/// the same pass. The order governs only which key comes next; it is what
/// shapes the tree during the run.
pub fn insert_search_pattern(n: u64, order: InsertOrder, rng: &mut impl Rng) -> Vec<Operation> {
    let mut keys: Vec<i64> = (1..=n as i64).collect();
    match order {
        InsertOrder::Ascending => {}
        InsertOrder::Descending => keys.reverse(),
        InsertOrder::Shuffled => keys.shuffle(rng),
    }

    let mut ops = Vec::with_capacity(keys.len() * 2);
    for key in keys {
        ops.push(Operation::Insert(key));
        ops.push(Operation::Search(key));
    }
    ops
}
