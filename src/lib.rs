#![warn(missing_docs)]
#![doc(test(no_crate_inject))]
#![doc(test(attr(deny(unused, future_incompatible))))]

//! This crate prepares the trajectories of a binary-encoded optimization algorithm for display
//! as a Search Trajectory Network, as described by:
//!
//! - Ochoa, Malan, Blum, [Search trajectory networks: A tool for analysing and visualising the
//!   behaviour of metaheuristics][stn], 2021
//!
//! [stn]: https://doi.org/10.1016/j.asoc.2021.107492
//!
//! The input is a list of transitions, one per line, each recording a move within one run of the
//! algorithm from one solution to the next along with the fitness of both. The output is the
//! network's edge table, with each solution replaced by an anonymized node identifier.
//!
//! Long runs visit many solutions which differ in only a few bits, which makes for an unreadable
//! network. So optionally, solutions are coarsened: only the bit positions with the highest
//! entropy over a reference pool of solutions are kept, and solutions which agree on those
//! positions become the same node.
//!
//! ```
//! use stn_partition::{edges::node_id, partition, RetainPercent};
//!
//! let lines = ["1,10,1100,8,1101", "1,8,1101,5,1110"];
//! let table = partition(&lines, None::<&str>, RetainPercent::FULL).unwrap();
//!
//! assert_eq!(table.len(), 3);
//! assert_eq!(table[0], "Run,Fitness1,Solution1,Fitness2,Solution2");
//! assert_eq!(table[1], format!("1,10,{},8,{}", node_id("1100"), node_id("1101")));
//! assert_eq!(table[2], format!("1,8,{},5,{}", node_id("1101"), node_id("1110")));
//! ```

pub mod coarsen;
pub mod config;
pub mod edges;
pub mod entropy;
pub mod error;
pub mod legacy;
pub mod parse;
pub mod pool;

pub use config::RetainPercent;
pub use edges::{Edge, HEADER};
pub use error::{Error, Result};

use coarsen::Coarsening;
use edges::Granularity;
use entropy::CoarseningPlan;
use pool::Dataset;

/// Builds the edge table for one trajectory file.
///
/// `pool` supplies extra lines, in the same shape as the trajectory lines, whose solutions form
/// the reference pool for entropy and canonical fitness. If none of them parse, the solutions
/// visited by the trajectory are used instead.
///
/// Malformed lines in either input are skipped. If no trajectory line is usable the table holds
/// only the header.
pub fn partition<T, P>(trajectory: T, pool: P, retain: RetainPercent) -> Result<Vec<String>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
    P: IntoIterator,
    P::Item: AsRef<str>,
{
    let mut data = Dataset::new();
    for line in trajectory {
        data.add_trajectory_line(line.as_ref());
    }
    for line in pool {
        data.add_pool_line(line.as_ref());
    }
    partition_dataset(&data, retain)
}

/// Builds the edge table for an already collected [`Dataset`].
pub fn partition_dataset(data: &Dataset, retain: RetainPercent) -> Result<Vec<String>> {
    tracing::info!(%retain, "start partitions");
    let mut table = vec![HEADER.to_owned()];

    if data.is_empty() {
        tracing::warn!("no solutions found in trajectory input; returning only the header");
        return Ok(table);
    }
    let total_nodes = match data.solution_length()? {
        Some(total_nodes) => total_nodes,
        None => return Ok(table),
    };

    let pool = data.global_pool();
    let stats = entropy::position_stats(pool.iter().map(|(solution, _)| solution), total_nodes)?;
    let plan = CoarseningPlan::new(stats, retain);
    tracing::info!(
        total_nodes,
        total_vars = plan.retained().len(),
        pool = pool.len(),
        source = ?pool.source(),
        "ranked positions"
    );

    let coarsening = Coarsening::new(plan, &pool);
    table.extend(edges::emit(data, Granularity::of(&coarsening)).map(|edge| edge.to_string()));
    tracing::info!(
        edges = table.len() - 1,
        transitions = data.transition_count(),
        "emitted edges"
    );
    Ok(table)
}

/// Builds one edge table per algorithm, all sharing one reference pool made of every
/// algorithm's lines. This makes node identifiers and canonical fitness comparable when the
/// networks are merged later.
///
/// ```
/// use stn_partition::{partition_algorithms, RetainPercent};
///
/// let a = vec!["1,9,1000,5,1100"];
/// let b = vec!["1,7,0000,3,1100"];
/// let tables = partition_algorithms(&[a, b], RetainPercent::FULL).unwrap();
///
/// assert_eq!(tables.len(), 2);
/// assert_eq!(tables[0][1].split(',').nth(4), tables[1][1].split(',').nth(4));
/// ```
pub fn partition_algorithms<L, S>(
    algorithms: &[L],
    retain: RetainPercent,
) -> Result<Vec<Vec<String>>>
where
    L: AsRef<[S]>,
    S: AsRef<str>,
{
    let pool = || {
        algorithms
            .iter()
            .flat_map(|lines| lines.as_ref().iter().map(|line| line.as_ref()))
    };

    algorithms
        .iter()
        .enumerate()
        .map(|(index, lines)| {
            let _span = tracing::info_span!("algorithm", index).entered();
            partition(lines.as_ref().iter().map(|line| line.as_ref()), pool(), retain)
        })
        .collect()
}
