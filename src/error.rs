//! Errors which abort a partitioning session.
//!
//! Malformed input lines are not errors: they are dropped where they are parsed. Only conditions
//! which leave no meaningful result are reported here.

use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conditions for a partitioning session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The retain percentage was not a number, or was negative.
    #[error("invalid retain percentage {value:?}: {reason}")]
    InvalidParameter {
        /// The rejected value, as the caller supplied it.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Two solutions in one session have different lengths, so bit positions can't be compared.
    #[error("solutions have inconsistent lengths: expected {expected} bits, found {found}")]
    InconsistentLength {
        /// The length shared by the solutions checked so far.
        expected: usize,
        /// The length of the first solution that disagreed.
        found: usize,
    },
}

impl Error {
    pub(crate) fn invalid_parameter(value: impl ToString, reason: &'static str) -> Self {
        Error::InvalidParameter {
            value: value.to_string(),
            reason,
        }
    }
}
