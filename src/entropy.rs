//! Ranking bit positions by how much they tell solutions apart.
//!
//! Each position of a binary solution is treated as a Bernoulli variable over the reference
//! pool. Its [Shannon entropy][] is 1 bit when the pool is split evenly and 0 bits when every
//! solution agrees, so sorting by entropy puts the positions that best distinguish solutions
//! first.
//!
//! [Shannon entropy]: https://en.wikipedia.org/wiki/Entropy_(information_theory)

use crate::config::RetainPercent;
use crate::error::{Error, Result};

/// Statistics for one bit position over the reference pool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionStat {
    /// Zero-based index into the solution string.
    pub position: usize,
    /// Fraction of pool solutions with a `'1'` at this position.
    pub one_frequency: f64,
    /// Binary entropy of `one_frequency`, in bits.
    pub entropy: f64,
}

impl PositionStat {
    /// Computes the statistics for a position where `ones` of `sample_size` solutions have a
    /// `'1'`.
    pub fn new(position: usize, ones: usize, sample_size: usize) -> Self {
        let one_frequency = if sample_size > 0 {
            ones as f64 / sample_size as f64
        } else {
            0.0
        };
        PositionStat {
            position,
            one_frequency,
            entropy: binary_entropy(one_frequency),
        }
    }
}

/// Entropy in bits of a binary variable which is set with probability `p`.
///
/// ```
/// use stn_partition::entropy::binary_entropy;
///
/// assert_eq!(binary_entropy(0.0), 0.0);
/// assert_eq!(binary_entropy(1.0), 0.0);
/// assert_eq!(binary_entropy(0.5), 1.0);
/// assert!((binary_entropy(0.25) - 0.811278).abs() < 1e-6);
/// ```
pub fn binary_entropy(p: f64) -> f64 {
    let q = 1.0 - p;
    let mut entropy = 0.0;
    // 0 * log(0) is taken to be 0.
    if p > 0.0 {
        entropy -= p * p.log2();
    }
    if q > 0.0 {
        entropy -= q * q.log2();
    }
    entropy
}

/// Computes [`PositionStat`]s for every position of the given solutions, in position order.
///
/// Every solution must be exactly `total_nodes` symbols long. Any symbol other than `'1'` counts
/// as a zero.
pub fn position_stats<'s, I>(pool: I, total_nodes: usize) -> Result<Vec<PositionStat>>
where
    I: IntoIterator<Item = &'s str>,
{
    let mut ones = vec![0usize; total_nodes];
    let mut sample_size = 0;
    for solution in pool {
        if solution.len() != total_nodes {
            return Err(Error::InconsistentLength {
                expected: total_nodes,
                found: solution.len(),
            });
        }
        for (count, &bit) in ones.iter_mut().zip(solution.as_bytes()) {
            if bit == b'1' {
                *count += 1;
            }
        }
        sample_size += 1;
    }

    Ok(ones
        .into_iter()
        .enumerate()
        .map(|(position, ones)| PositionStat::new(position, ones, sample_size))
        .collect())
}

/// An ordering of bit positions from most to least informative, and how many of them to keep.
///
/// ```
/// use stn_partition::entropy::{position_stats, CoarseningPlan};
/// use stn_partition::RetainPercent;
///
/// let pool = ["0000", "0100", "1100", "1001"];
/// let stats = position_stats(pool.iter().copied(), 4).unwrap();
/// let plan = CoarseningPlan::new(stats, "50".parse::<RetainPercent>().unwrap());
///
/// // Positions 0 and 1 are split evenly; 3 is set once; 2 never is.
/// assert_eq!(plan.ranking(), &[0, 1, 3, 2]);
/// assert_eq!(plan.retained(), &[0, 1]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoarseningPlan {
    ranking: Vec<usize>,
    retained: usize,
    coarsening: bool,
}

impl CoarseningPlan {
    /// Ranks positions by descending entropy and keeps the prefix selected by `retain`.
    ///
    /// Positions with equal entropy stay in ascending position order.
    pub fn new(mut stats: Vec<PositionStat>, retain: RetainPercent) -> Self {
        stats.sort_by(|a, b| {
            b.entropy
                .total_cmp(&a.entropy)
                .then_with(|| a.position.cmp(&b.position))
        });
        let retained = retain.retained_positions(stats.len());
        CoarseningPlan {
            ranking: stats.into_iter().map(|stat| stat.position).collect(),
            retained,
            coarsening: retain.is_coarsening(),
        }
    }

    /// A plan which keeps every one of `total_nodes` positions in their original order.
    pub fn identity(total_nodes: usize) -> Self {
        CoarseningPlan {
            ranking: (0..total_nodes).collect(),
            retained: total_nodes,
            coarsening: false,
        }
    }

    /// Number of positions in a full solution.
    pub fn total_nodes(&self) -> usize {
        self.ranking.len()
    }

    /// Every position, most informative first.
    pub fn ranking(&self) -> &[usize] {
        &self.ranking
    }

    /// The positions that make up a reduced key, in the order they appear in it.
    pub fn retained(&self) -> &[usize] {
        &self.ranking[..self.retained]
    }

    /// Returns `true` if this plan was built from a nonzero retain percentage.
    ///
    /// A coarsening plan may still retain every position, if the percentage was 100 or more.
    pub fn is_coarsening(&self) -> bool {
        self.coarsening
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequencies_and_entropy() {
        let stats = position_stats(vec!["10", "11", "00", "01"], 2).unwrap();
        assert_eq!(stats[0].one_frequency, 0.5);
        assert_eq!(stats[0].entropy, 1.0);
        assert_eq!(stats[1].one_frequency, 0.5);

        let stats = position_stats(vec!["10", "10", "10"], 2).unwrap();
        assert_eq!(stats[0].one_frequency, 1.0);
        assert_eq!(stats[0].entropy, 0.0);
        assert_eq!(stats[1].one_frequency, 0.0);
        assert_eq!(stats[1].entropy, 0.0);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        assert_eq!(
            position_stats(vec!["101", "10"], 3),
            Err(Error::InconsistentLength {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn empty_pool_has_no_entropy() {
        let stats = position_stats(Vec::<&str>::new(), 3).unwrap();
        assert_eq!(stats.len(), 3);
        assert!(stats.iter().all(|s| s.entropy == 0.0));
    }

    #[test]
    fn ties_keep_position_order() {
        // Every position is constant, so all entropies tie at zero.
        let stats = position_stats(vec!["0110"], 4).unwrap();
        let plan = CoarseningPlan::new(stats, RetainPercent::try_from(75.0).unwrap());
        assert_eq!(plan.ranking(), &[0, 1, 2, 3]);
        assert_eq!(plan.retained(), &[0, 1, 2]);
        assert!(plan.is_coarsening());
    }

    #[test]
    fn max_entropy_position_ranks_first() {
        let pool = vec!["0000", "1000", "0000", "1000"];
        let stats = position_stats(pool, 4).unwrap();
        let plan = CoarseningPlan::new(stats, RetainPercent::try_from(50.0).unwrap());
        assert_eq!(plan.retained()[0], 0);
        assert_eq!(plan.retained().len(), 2);
    }

    #[test]
    fn full_plan_keeps_everything() {
        let stats = position_stats(vec!["0011", "0101"], 4).unwrap();
        let plan = CoarseningPlan::new(stats, RetainPercent::FULL);
        assert_eq!(plan.retained().len(), plan.total_nodes());
        assert!(!plan.is_coarsening());
        assert!(!CoarseningPlan::identity(4).is_coarsening());
    }
}
