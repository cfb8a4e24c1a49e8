//! Turning each run's recorded transitions into rows of the trajectory network's edge table.

use crate::coarsen::Coarsening;
use crate::pool::{Dataset, Step};
use sha2::{Digest, Sha256};
use std::fmt;

/// First row of every edge table. Downstream tools expect these exact column names, even though
/// the solution columns now carry node identifiers.
pub const HEADER: &str = "Run,Fitness1,Solution1,Fitness2,Solution2";

/// Anonymized, fixed-width identifier for a node: the lowercase hex SHA-256 of its text.
///
/// ```
/// use stn_partition::edges::node_id;
///
/// assert_eq!(
///     node_id("abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn node_id(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// One observed move between two nodes in a run.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Edge {
    /// Run the move was observed in.
    pub run: i64,
    /// Fitness at the source node.
    pub from_fitness: i64,
    /// Identifier of the source node.
    pub from_id: String,
    /// Fitness at the target node.
    pub to_fitness: i64,
    /// Identifier of the target node.
    pub to_id: String,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.run, self.from_fitness, self.from_id, self.to_fitness, self.to_id
        )
    }
}

/// What a node is.
#[derive(Clone, Copy, Debug)]
pub enum Granularity<'a> {
    /// Every full solution is its own node, reported with the fitness from its own line. Moves
    /// from a solution to itself are kept.
    Full,
    /// Nodes are canonical coarse keys, reported with the best fitness in the pool for that key.
    /// Moves which stay on the same key are dropped.
    Coarse(&'a Coarsening),
}

impl<'a> Granularity<'a> {
    /// Picks the granularity a coarsening was planned for.
    pub fn of(coarsening: &'a Coarsening) -> Self {
        if coarsening.plan().is_coarsening() {
            Granularity::Coarse(coarsening)
        } else {
            Granularity::Full
        }
    }

    fn edge(self, data: &Dataset, run: i64, from: Step, to: Step) -> Option<Edge> {
        let from_solution = data.solution(from.solution);
        let to_solution = data.solution(to.solution);
        match self {
            Granularity::Full => Some(Edge {
                run,
                from_fitness: from.fitness,
                from_id: node_id(from_solution),
                to_fitness: to.fitness,
                to_id: node_id(to_solution),
            }),
            Granularity::Coarse(coarsening) => {
                let from_key = coarsening.key(from_solution);
                let to_key = coarsening.key(to_solution);
                if from_key == to_key {
                    tracing::debug!(run, key = %from_key, "dropping coarse self-loop");
                    return None;
                }
                // Trajectory solutions missing from an auxiliary pool may reduce to a key the pool
                // never produced.
                Some(Edge {
                    run,
                    from_fitness: coarsening
                        .canonical_fitness(&from_key)
                        .unwrap_or(from.fitness),
                    from_id: node_id(from_key.as_str()),
                    to_fitness: coarsening.canonical_fitness(&to_key).unwrap_or(to.fitness),
                    to_id: node_id(to_key.as_str()),
                })
            }
        }
    }
}

/// Walks every run's steps in pairs and yields the resulting edges, runs in ascending order.
pub fn emit<'a>(
    data: &'a Dataset,
    granularity: Granularity<'a>,
) -> impl Iterator<Item = Edge> + 'a {
    data.runs().flat_map(move |(run, steps)| {
        steps
            .chunks_exact(2)
            .filter_map(move |pair| granularity.edge(data, run, pair[0], pair[1]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::{position_stats, CoarseningPlan};
    use crate::RetainPercent;

    fn dataset(lines: &[&str]) -> Dataset {
        let mut data = Dataset::new();
        for line in lines {
            data.add_trajectory_line(line);
        }
        data
    }

    fn coarsening(data: &Dataset, retain: f64) -> Coarsening {
        let pool = data.global_pool();
        let total_nodes = data.solution_length().unwrap().unwrap();
        let stats = position_stats(pool.iter().map(|(s, _)| s), total_nodes).unwrap();
        Coarsening::new(
            CoarseningPlan::new(stats, RetainPercent::try_from(retain).unwrap()),
            &pool,
        )
    }

    #[test]
    fn full_granularity_keeps_self_loops_and_line_fitness() {
        let data = dataset(&["1,10,0101,10,0101", "1,10,0101,3,0110"]);
        let coarsening = coarsening(&data, 0.0);
        let granularity = Granularity::of(&coarsening);
        assert!(matches!(granularity, Granularity::Full));

        let edges: Vec<Edge> = emit(&data, granularity).collect();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].from_id, edges[0].to_id);
        assert_eq!(edges[1].from_fitness, 10);
        assert_eq!(edges[1].to_fitness, 3);
        assert_eq!(edges[1].to_id, node_id("0110"));
    }

    #[test]
    fn coarse_granularity_drops_self_loops() {
        // Position 0 wins the entropy tie and is the only one kept, so 1000 and 1011 share a node.
        let data = dataset(&["1,5,0000,4,1000", "1,4,1000,3,1011", "2,6,1011,2,0000"]);
        let coarsening = coarsening(&data, 25.0);
        let edges: Vec<Edge> = emit(&data, Granularity::of(&coarsening)).collect();

        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].run, 1);
        assert_eq!(edges[0].from_id, node_id("0"));
        assert_eq!(edges[0].to_id, node_id("1"));
        // Best fitness among 1000 (4) and 1011 (3).
        assert_eq!(edges[0].to_fitness, 3);
        assert_eq!(edges[1].run, 2);
        assert_eq!(edges[1].from_fitness, 3);
        assert_eq!(edges[1].to_fitness, 2);
    }

    #[test]
    fn formats_as_csv_row() {
        let edge = Edge {
            run: 4,
            from_fitness: -1,
            from_id: "aa".to_owned(),
            to_fitness: 7,
            to_id: "bb".to_owned(),
        };
        assert_eq!(edge.to_string(), "4,-1,aa,7,bb");
    }
}
