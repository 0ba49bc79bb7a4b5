//! Exact-quota resolution of percentage maps
//!
//! Turns a percentage map and a requested total into per-category counts
//! that sum to the total exactly, with no rounding drift.

use crate::workload::{Distribution, OpKind};
use crate::{Result, TreeBenchError};

/// Exact per-category operation counts summing to the requested total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    counts: [u64; 6],
}

impl Quota {
    /// Resolve a percentage map into exact counts.
    ///
    /// Each category gets `floor(total * pct / 100)`. The remaining deficit
    /// (always `< 6`, since each floor rounds down) is handed out one unit at
    /// a time in fixed wire-code order, wrapping around. Maps summing over
    /// 100 leave a surplus instead, which is removed the same way; categories
    /// already at zero are skipped rather than driven negative.
    pub fn from_percentages(total: u64, dist: &Distribution) -> Result<Quota> {
        if dist.is_empty() {
            return Err(TreeBenchError::InvalidDistribution(
                "percentage map has no entries".to_string(),
            ));
        }
        if total == 0 && dist.has_nonzero() {
            return Err(TreeBenchError::InvalidDistribution(
                "zero operations requested against nonzero percentages".to_string(),
            ));
        }

        let mut counts = [0u64; 6];
        for (i, kind) in OpKind::ALL.iter().enumerate() {
            counts[i] = (total as u128 * dist.pct(*kind) as u128 / 100) as u64;
        }

        let mut sum: u64 = counts.iter().sum();
        let mut i = 0;
        while sum < total {
            counts[i] += 1;
            sum += 1;
            i = (i + 1) % counts.len();
        }
        while sum > total {
            if counts[i] > 0 {
                counts[i] -= 1;
                sum -= 1;
            }
            i = (i + 1) % counts.len();
        }

        Ok(Quota { counts })
    }

    /// Count for one category
    pub fn count(&self, kind: OpKind) -> u64 {
        self.counts[kind.code() as usize - 1]
    }

    /// Sum over all categories, always the requested total
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(entries: &[(OpKind, u32)]) -> Distribution {
        entries
            .iter()
            .fold(Distribution::new(), |d, &(kind, pct)| d.with(kind, pct))
    }

    #[test]
    fn test_exact_split_no_correction() {
        let quota = Quota::from_percentages(
            10,
            &dist(&[
                (OpKind::Insert, 70),
                (OpKind::Delete, 20),
                (OpKind::Search, 10),
            ]),
        )
        .unwrap();
        assert_eq!(quota.count(OpKind::Insert), 7);
        assert_eq!(quota.count(OpKind::Delete), 2);
        assert_eq!(quota.count(OpKind::Search), 1);
        assert_eq!(quota.count(OpKind::Predecessor), 0);
        assert_eq!(quota.count(OpKind::Successor), 0);
        assert_eq!(quota.count(OpKind::Range), 0);
        assert_eq!(quota.total(), 10);
    }

    #[test]
    fn test_deficit_distributed_cyclically() {
        // 3 * 33% of 100 floors to 99; the single missing unit lands on Insert.
        let quota = Quota::from_percentages(
            100,
            &dist(&[
                (OpKind::Insert, 33),
                (OpKind::Delete, 33),
                (OpKind::Search, 33),
            ]),
        )
        .unwrap();
        assert_eq!(quota.total(), 100);
        assert_eq!(quota.count(OpKind::Insert), 34);
        assert_eq!(quota.count(OpKind::Delete), 33);
        assert_eq!(quota.count(OpKind::Search), 33);
    }

    #[test]
    fn test_under_100_map_fills_in_order() {
        // Sums to 50; the other 5 ops land one-per-category from Insert on.
        let quota =
            Quota::from_percentages(10, &dist(&[(OpKind::Insert, 50)])).unwrap();
        assert_eq!(quota.total(), 10);
        assert_eq!(quota.count(OpKind::Insert), 6);
        assert_eq!(quota.count(OpKind::Delete), 1);
        assert_eq!(quota.count(OpKind::Successor), 1);
        assert_eq!(quota.count(OpKind::Range), 0);
    }

    #[test]
    fn test_over_100_map_sheds_surplus() {
        let quota = Quota::from_percentages(
            10,
            &dist(&[(OpKind::Insert, 100), (OpKind::Delete, 50)]),
        )
        .unwrap();
        assert_eq!(quota.total(), 10);
        assert_eq!(quota.count(OpKind::Insert), 7);
        assert_eq!(quota.count(OpKind::Delete), 3);
    }

    #[test]
    fn test_surplus_skips_zero_categories() {
        // Floors give Insert 20, Delete 0; surplus removal must not touch
        // Delete on its way around.
        let quota = Quota::from_percentages(
            10,
            &dist(&[(OpKind::Insert, 200), (OpKind::Delete, 4)]),
        )
        .unwrap();
        assert_eq!(quota.total(), 10);
        assert_eq!(quota.count(OpKind::Delete), 0);
        assert_eq!(quota.count(OpKind::Insert), 10);
    }

    #[test]
    fn test_determinism() {
        let d = dist(&[
            (OpKind::Insert, 41),
            (OpKind::Search, 17),
            (OpKind::Range, 13),
        ]);
        let a = Quota::from_percentages(997, &d).unwrap();
        let b = Quota::from_percentages(997, &d).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total(), 997);
    }

    #[test]
    fn test_sum_invariant_across_totals() {
        let d = dist(&[
            (OpKind::Insert, 25),
            (OpKind::Delete, 25),
            (OpKind::Search, 26),
            (OpKind::Predecessor, 8),
            (OpKind::Successor, 8),
            (OpKind::Range, 8),
        ]);
        for total in [1u64, 2, 5, 6, 7, 99, 100, 101, 12345] {
            let quota = Quota::from_percentages(total, &d).unwrap();
            assert_eq!(quota.total(), total, "total {}", total);
        }
    }

    #[test]
    fn test_empty_map_rejected() {
        let err = Quota::from_percentages(10, &Distribution::new()).unwrap_err();
        assert!(matches!(err, TreeBenchError::InvalidDistribution(_)));
    }

    #[test]
    fn test_zero_total_against_nonzero_map_rejected() {
        let err =
            Quota::from_percentages(0, &dist(&[(OpKind::Insert, 70)])).unwrap_err();
        assert!(matches!(err, TreeBenchError::InvalidDistribution(_)));
    }

    #[test]
    fn test_zero_total_all_zero_map_is_empty_quota() {
        let quota = Quota::from_percentages(0, &dist(&[(OpKind::Insert, 0)])).unwrap();
        assert_eq!(quota.total(), 0);
    }
}
