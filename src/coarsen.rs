//! Collapsing solutions which agree on the retained positions into one canonical node.

use crate::entropy::CoarseningPlan;
use crate::pool::GlobalPool;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

/// The bits of a solution at a plan's retained positions, in ranking order.
///
/// Note that the bits are read most-informative position first, not left to right, so a key is
/// generally not a subsequence of the solution it came from.
///
/// ```
/// use stn_partition::coarsen::ReducedKey;
/// use stn_partition::entropy::{position_stats, CoarseningPlan};
///
/// let stats = position_stats(vec!["0001", "0011", "0010"], 4).unwrap();
/// let plan = CoarseningPlan::new(stats, "50".parse().unwrap());
/// assert_eq!(plan.retained(), &[2, 3]);
///
/// assert_eq!(ReducedKey::new(&plan, "0001").as_str(), "01");
/// assert_eq!(ReducedKey::new(&plan, "1110").as_str(), "10");
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ReducedKey(String);

impl ReducedKey {
    /// Reads `solution` at the positions `plan` retains.
    ///
    /// # Panics
    ///
    /// This method panics if `solution` is shorter than the plan's solutions. Solutions are
    /// expected to hold only `'0'` and `'1'`, which [`crate::parse::LineParser`] guarantees.
    pub fn new(plan: &CoarseningPlan, solution: &str) -> Self {
        let bits = solution.as_bytes();
        ReducedKey(
            plan.retained()
                .iter()
                .map(|&position| char::from(bits[position]))
                .collect(),
        )
    }

    /// The key's bits as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReducedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A coarsening plan together with the best fitness known for each canonical node.
#[derive(Clone, Debug)]
pub struct Coarsening {
    plan: CoarseningPlan,
    canonical_fitness: HashMap<ReducedKey, i64>,
}

impl Coarsening {
    /// Reduces every pool solution and keeps, per key, the lowest fitness of any solution that
    /// maps to it.
    pub fn new(plan: CoarseningPlan, pool: &GlobalPool<'_>) -> Self {
        let mut canonical_fitness: HashMap<ReducedKey, i64> = HashMap::with_capacity(pool.len());
        for (solution, fitness) in pool.iter() {
            match canonical_fitness.entry(ReducedKey::new(&plan, solution)) {
                Entry::Occupied(mut entry) => {
                    if fitness < *entry.get() {
                        entry.insert(fitness);
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(fitness);
                }
            }
        }
        tracing::debug!(
            solutions = pool.len(),
            nodes = canonical_fitness.len(),
            "coarsened reference pool"
        );
        Coarsening {
            plan,
            canonical_fitness,
        }
    }

    /// The plan keys are built from.
    pub fn plan(&self) -> &CoarseningPlan {
        &self.plan
    }

    /// The canonical node a solution belongs to.
    pub fn key(&self, solution: &str) -> ReducedKey {
        ReducedKey::new(&self.plan, solution)
    }

    /// The lowest fitness among pool solutions that reduce to `key`.
    pub fn canonical_fitness(&self, key: &ReducedKey) -> Option<i64> {
        self.canonical_fitness.get(key).copied()
    }

    /// Number of distinct canonical nodes in the pool.
    pub fn node_count(&self) -> usize {
        self.canonical_fitness.len()
    }
}
