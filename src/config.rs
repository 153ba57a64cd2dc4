//! Tuning knobs for the sort engine.
//!
//! The defaults reproduce the classic behavior: insertion sort up to 32 elements, and as much
//! scratch memory as the merges can use. Both can be changed in code through
//! [`SortConfig::builder`], or from the environment through [`SortConfig::from_env`]:
//!
//! - `STABLE_MERGE_BUFFER`: `unbounded`, `in-place` or `limit=<n>`
//! - `STABLE_MERGE_ISORT_MAX`: insertion threshold, at least 1

use std::cmp::{self, Ordering};
use std::env;
use std::fmt;
use std::str::FromStr;

use log::warn;
use once_cell::sync::OnceCell;

use crate::error::ConfigError;
use crate::{merge, stable};

/// Runs at or below this length are sorted with insertion sort.
pub const DEFAULT_INSERTION_THRESHOLD: usize = 32;

const BUFFER_ENV_VAR: &str = "STABLE_MERGE_BUFFER";
const ISORT_MAX_ENV_VAR: &str = "STABLE_MERGE_ISORT_MAX";

/// How much scratch memory a sort or merge may request.
///
/// Independent of the policy, allocation is best effort. A shortfall never fails the operation,
/// it only moves work from buffered merges to rotations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BufferPolicy {
    /// Request as much as the algorithm can use, half the input length for a sort.
    #[default]
    Unbounded,

    /// Request at most this many elements.
    Limited(usize),

    /// Never allocate, merge purely by rotation.
    InPlace,
}

impl BufferPolicy {
    /// Number of elements to request when the algorithm would like `wanted`.
    #[inline]
    pub fn scratch_len(self, wanted: usize) -> usize {
        match self {
            Self::Unbounded => wanted,
            Self::Limited(limit) => cmp::min(wanted, limit),
            Self::InPlace => 0,
        }
    }
}

impl FromStr for BufferPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        match s {
            "unbounded" => Ok(Self::Unbounded),
            "in-place" | "inplace" | "none" => Ok(Self::InPlace),
            _ => s
                .strip_prefix("limit=")
                .and_then(|limit| limit.parse().ok())
                .map(Self::Limited)
                .ok_or_else(|| ConfigError::InvalidBufferPolicy(s.to_owned())),
        }
    }
}

impl fmt::Display for BufferPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::Limited(limit) => write!(f, "limit={limit}"),
            Self::InPlace => write!(f, "in-place"),
        }
    }
}

/// A validated set of tuning parameters.
///
/// ```
/// use stable_merge::{BufferPolicy, SortConfig};
///
/// let config = SortConfig::builder()
///     .buffer(BufferPolicy::Limited(256))
///     .build()
///     .unwrap();
///
/// let mut v = vec![5, 1, 4, 2, 3];
/// config.sort(&mut v);
/// assert_eq!(v, [1, 2, 3, 4, 5]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortConfig {
    insertion_threshold: usize,
    buffer: BufferPolicy,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            insertion_threshold: DEFAULT_INSERTION_THRESHOLD,
            buffer: BufferPolicy::Unbounded,
        }
    }
}

impl SortConfig {
    pub fn builder() -> SortConfigBuilder {
        SortConfigBuilder {
            config: Self::default(),
        }
    }

    #[inline]
    pub fn insertion_threshold(&self) -> usize {
        self.insertion_threshold
    }

    #[inline]
    pub fn buffer(&self) -> BufferPolicy {
        self.buffer
    }

    /// Reads `STABLE_MERGE_BUFFER` and `STABLE_MERGE_ISORT_MAX`, falling back to the defaults for
    /// unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`SortConfig::from_env`] with a custom source of variables.
    pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();

        if let Some(val) = lookup(BUFFER_ENV_VAR) {
            builder = builder.buffer(val.parse()?);
        }

        if let Some(val) = lookup(ISORT_MAX_ENV_VAR) {
            let threshold = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidInsertionThreshold(val.clone()))?;
            builder = builder.insertion_threshold(threshold);
        }

        builder.build()
    }

    /// The environment configuration, read once per process. This is what the free functions such
    /// as [`crate::stable_sort`] and [`crate::inplace_merge`] run with.
    ///
    /// An invalid environment is reported with a warning and replaced by the defaults.
    pub fn global() -> &'static SortConfig {
        static GLOBAL: OnceCell<SortConfig> = OnceCell::new();

        GLOBAL.get_or_init(|| {
            Self::from_env().unwrap_or_else(|err| {
                warn!("ignoring sort configuration from environment: {err}");
                Self::default()
            })
        })
    }

    /// Sorts the slice, preserving the order of equal elements. See [`crate::stable_sort`].
    #[inline]
    pub fn sort<T>(&self, v: &mut [T])
    where
        T: Ord,
    {
        stable::sort_with_config(v, self, &mut |a: &T, b: &T| a.lt(b));
    }

    /// Sorts the slice with a comparator function. See [`crate::stable_sort_by`].
    #[inline]
    pub fn sort_by<T, F>(&self, v: &mut [T], mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        stable::sort_with_config(v, self, &mut |a: &T, b: &T| {
            compare(a, b) == Ordering::Less
        });
    }

    /// Merges the sorted runs `v[..mid]` and `v[mid..]`. See [`crate::inplace_merge`].
    #[inline]
    pub fn merge_by<T, F>(&self, v: &mut [T], mid: usize, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        merge::merge_runs(v, mid, self.buffer, &mut |a: &T, b: &T| {
            compare(a, b) == Ordering::Less
        });
    }
}

/// Builder for [`SortConfig`], validates on [`SortConfigBuilder::build`].
#[derive(Clone, Debug)]
pub struct SortConfigBuilder {
    config: SortConfig,
}

impl SortConfigBuilder {
    pub fn insertion_threshold(mut self, threshold: usize) -> Self {
        self.config.insertion_threshold = threshold;
        self
    }

    pub fn buffer(mut self, policy: BufferPolicy) -> Self {
        self.config.buffer = policy;
        self
    }

    pub fn build(self) -> Result<SortConfig, ConfigError> {
        if self.config.insertion_threshold == 0 {
            return Err(ConfigError::ZeroInsertionThreshold);
        }

        Ok(self.config)
    }
}
