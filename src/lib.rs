//! Stable, adaptive merge sort for slices.
//!
//! [`stable_sort`] sorts a slice without reordering equal elements. It requests scratch memory for
//! half of the input and runs in *O*(*n* \* log(*n*)) when it gets it. When it gets less, or none
//! at all, it keeps working with rotation-based merges in *O*(*n* \* log²(*n*)).
//!
//! [`inplace_merge`] exposes the merge step on its own: two adjacent sorted runs `v[..mid]` and
//! `v[mid..]` become one sorted slice.
//!
//! The comparison function may panic. The slice then holds an unspecified permutation of its
//! original elements, nothing is duplicated or leaked. The same holds for comparison functions
//! that don't implement a total order.

pub mod bottom_up;

mod config;
mod error;
mod insertion;
mod merge;
mod scratch;
mod stable;

pub use config::{BufferPolicy, SortConfig, SortConfigBuilder, DEFAULT_INSERTION_THRESHOLD};
pub use error::ConfigError;
pub use insertion::{insertion_sort, insertion_sort_by};
pub use merge::{inplace_merge, inplace_merge_by, inplace_merge_by_in};
pub use scratch::Scratch;
pub use stable::{
    stable_sort, stable_sort_by, stable_sort_by_in, stable_sort_by_key, try_stable_sort_by,
};
