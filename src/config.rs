//! The one tunable of the partitioning pipeline: how many bit positions survive coarsening.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Percentage of bit positions to keep when coarsening solutions.
///
/// Zero means no coarsening at all: every solution is its own node. Any positive value selects
/// the most informative `percent`% of positions, and always at least one.
///
/// ```
/// use stn_partition::RetainPercent;
///
/// let half: RetainPercent = "50".parse().unwrap();
/// assert_eq!(half.retained_positions(10), 5);
/// assert_eq!(half.retained_positions(1), 1);
///
/// assert_eq!(RetainPercent::default().retained_positions(10), 10);
/// assert!("-1".parse::<RetainPercent>().is_err());
/// assert!("lots".parse::<RetainPercent>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct RetainPercent(f64);

impl RetainPercent {
    /// Keep whole solutions.
    pub const FULL: RetainPercent = RetainPercent(0.0);

    /// The percentage as given.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Returns `true` if solutions are reduced to a subset of their positions.
    pub fn is_coarsening(self) -> bool {
        self.0 > 0.0
    }

    /// The number of positions kept out of `total_nodes`.
    ///
    /// Percentages above 100 keep every position, but still count as coarsening.
    pub fn retained_positions(self, total_nodes: usize) -> usize {
        if !self.is_coarsening() {
            return total_nodes;
        }
        let kept = (total_nodes as f64 * self.0 / 100.0).floor() as usize;
        kept.max(1).min(total_nodes)
    }
}

impl TryFrom<f64> for RetainPercent {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::invalid_parameter(value, "must be a finite number"));
        }
        if value < 0.0 {
            return Err(Error::invalid_parameter(value, "must not be negative"));
        }
        Ok(RetainPercent(value))
    }
}

impl FromStr for RetainPercent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| Error::invalid_parameter(s, "must be numeric"))?;
        RetainPercent::try_from(value)
    }
}

impl fmt::Display for RetainPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            RetainPercent::try_from(-0.5),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(RetainPercent::try_from(f64::NAN).is_err());
        assert!(RetainPercent::try_from(f64::INFINITY).is_err());
        assert!("".parse::<RetainPercent>().is_err());
    }

    #[test]
    fn retained_positions_round_down_but_keep_one() {
        let third = RetainPercent::try_from(33.0).unwrap();
        assert_eq!(third.retained_positions(10), 3);
        assert_eq!(third.retained_positions(2), 1);
        assert_eq!(third.retained_positions(0), 0);

        let tiny = RetainPercent::try_from(0.001).unwrap();
        assert!(tiny.is_coarsening());
        assert_eq!(tiny.retained_positions(64), 1);
    }

    #[test]
    fn oversized_percentages_keep_everything() {
        let double = RetainPercent::try_from(200.0).unwrap();
        assert_eq!(double.retained_positions(8), 8);
        assert!(double.is_coarsening());
    }
}
