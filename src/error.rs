//! Error type for sort configuration.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Error returned when a [`crate::SortConfig`] can't be built or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The insertion threshold must be at least 1.
    ZeroInsertionThreshold,

    /// The insertion threshold could not be parsed as an unsigned integer.
    InvalidInsertionThreshold(String),

    /// The buffer policy is not one of `unbounded`, `in-place` or `limit=<n>`.
    InvalidBufferPolicy(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInsertionThreshold => write!(f, "insertion threshold must be at least 1"),
            Self::InvalidInsertionThreshold(val) => {
                write!(f, "invalid insertion threshold: {val:?}")
            }
            Self::InvalidBufferPolicy(val) => write!(
                f,
                "invalid buffer policy: {val:?}, expected `unbounded`, `in-place` or `limit=<n>`"
            ),
        }
    }
}

impl Error for ConfigError {}
