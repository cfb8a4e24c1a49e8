//! Collecting runs and the reference pool of solutions for one partitioning session.
//!
//! Solution strings are interned so that every distinct solution is stored once, no matter how
//! many runs or pool lines mention it.

use crate::error::{Error, Result};
use crate::parse::{LineParser, Observation};
use lasso::{Rodeo, Spur};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// A solution visited by a run, as recorded in that run's trajectory.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Step {
    /// The fitness reported on the trajectory line itself.
    pub fitness: i64,
    /// Interned solution.
    pub solution: Spur,
}

/// Where the reference pool came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PoolSource {
    /// Lines supplied separately from the trajectories.
    Auxiliary,
    /// No usable auxiliary lines, so the pool is every solution the runs visited.
    Derived,
}

/// Parsed trajectories plus the candidate reference pool, built line by line.
///
/// ```
/// use stn_partition::pool::{Dataset, PoolSource};
///
/// let mut data = Dataset::new();
/// data.add_trajectory_line("1,10,1100,8,1101");
/// data.add_trajectory_line("garbage");
/// assert_eq!(data.transition_count(), 1);
///
/// let pool = data.global_pool();
/// assert_eq!(pool.source(), PoolSource::Derived);
/// assert_eq!(pool.len(), 2);
/// assert_eq!(pool.fitness("1101"), Some(8));
/// ```
#[derive(Default)]
pub struct Dataset {
    parser: LineParser,
    solutions: Rodeo<Spur>,
    runs: BTreeMap<i64, Vec<Step>>,
    visited: HashMap<Spur, i64>,
    auxiliary: HashMap<Spur, i64>,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Dataset::default()
    }

    /// Records one trajectory line. Returns `false` if the line was dropped.
    ///
    /// Both endpoints are appended, in order, to the run named by the line's first field.
    pub fn add_trajectory_line(&mut self, line: &str) -> bool {
        let transition = match self.parser.transition(line) {
            Some(transition) => transition,
            None => {
                tracing::debug!(line, "dropping trajectory line");
                return false;
            }
        };
        let from = self.observe(transition.from);
        let to = self.observe(transition.to);
        self.runs
            .entry(transition.run)
            .or_insert_with(Vec::new)
            .extend_from_slice(&[from, to]);
        true
    }

    /// Records one auxiliary pool line. Returns `false` if the line was dropped.
    pub fn add_pool_line(&mut self, line: &str) -> bool {
        let observations = match self.parser.observations(line) {
            Some(observations) => observations,
            None => {
                tracing::debug!(line, "dropping pool line");
                return false;
            }
        };
        for Observation { fitness, solution } in observations {
            let solution = self.solutions.get_or_intern(solution);
            keep_min(&mut self.auxiliary, solution, fitness);
        }
        true
    }

    fn observe(&mut self, observation: Observation) -> Step {
        let solution = self.solutions.get_or_intern(observation.solution);
        keep_min(&mut self.visited, solution, observation.fitness);
        Step {
            fitness: observation.fitness,
            solution,
        }
    }

    /// Returns `true` if no trajectory line has been accepted.
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Number of accepted trajectory lines, each of which is one transition.
    pub fn transition_count(&self) -> usize {
        self.runs.values().map(|steps| steps.len() / 2).sum()
    }

    /// Iterates over runs in ascending run index, each with its steps in recorded order.
    pub fn runs(&self) -> impl Iterator<Item = (i64, &[Step])> + '_ {
        self.runs.iter().map(|(&run, steps)| (run, steps.as_slice()))
    }

    /// Looks up the text of an interned solution.
    pub fn solution(&self, key: Spur) -> &str {
        self.solutions.resolve(&key)
    }

    /// The pool of solutions used for statistics: the auxiliary lines if any were accepted,
    /// otherwise every solution the runs visited.
    ///
    /// In either case each pool solution carries the lowest fitness seen for it.
    pub fn global_pool(&self) -> GlobalPool<'_> {
        let (source, fitness) = if self.auxiliary.is_empty() {
            (PoolSource::Derived, &self.visited)
        } else {
            (PoolSource::Auxiliary, &self.auxiliary)
        };
        GlobalPool {
            source,
            fitness,
            solutions: &self.solutions,
        }
    }

    /// The length shared by every solution in the session, or `None` if there are none.
    ///
    /// Both visited and auxiliary solutions are checked, since both get indexed by position.
    pub fn solution_length(&self) -> Result<Option<usize>> {
        let mut expected = None;
        for key in self.visited.keys().chain(self.auxiliary.keys()) {
            let found = self.solutions.resolve(key).len();
            match expected {
                None => expected = Some(found),
                Some(expected) if expected != found => {
                    return Err(Error::InconsistentLength { expected, found });
                }
                Some(_) => {}
            }
        }
        Ok(expected)
    }
}

fn keep_min(map: &mut HashMap<Spur, i64>, solution: Spur, fitness: i64) {
    match map.entry(solution) {
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

/// An immutable view of the reference pool.
#[derive(Clone, Copy)]
pub struct GlobalPool<'a> {
    source: PoolSource,
    fitness: &'a HashMap<Spur, i64>,
    solutions: &'a Rodeo<Spur>,
}

impl<'a> GlobalPool<'a> {
    /// Where this pool came from.
    pub fn source(&self) -> PoolSource {
        self.source
    }

    /// Number of distinct solutions in the pool.
    pub fn len(&self) -> usize {
        self.fitness.len()
    }

    /// Returns `true` if the pool has no solutions.
    pub fn is_empty(&self) -> bool {
        self.fitness.is_empty()
    }

    /// Iterates over each distinct pool solution with its lowest known fitness, in no
    /// particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, i64)> + 'a {
        let solutions = self.solutions;
        self.fitness
            .iter()
            .map(move |(key, &fitness)| (solutions.resolve(key), fitness))
    }

    /// The lowest known fitness of a solution, if it is in the pool.
    pub fn fitness(&self, solution: &str) -> Option<i64> {
        let key = self.solutions.get(solution)?;
        self.fitness.get(&key).copied()
    }
}
