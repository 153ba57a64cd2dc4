//! Bottom-up merge sort with a full length work buffer.
//!
//! Starting from runs of length one, each pass merges pairs of neighbouring runs, alternating
//! between the slice and the work buffer as source and destination. This needs as much scratch
//! memory as the input is long, twice what [`crate::stable_sort`] asks for, in exchange for a
//! simple, non-recursive structure. Without that much memory it hands over to
//! [`crate::stable_sort`]'s engine with whatever could be acquired.

use std::cmp::Ordering;
use std::mem;

use log::debug;

use crate::config::SortConfig;
use crate::scratch::Scratch;
use crate::stable;

/// Sorts the slice, preserving the order of equal elements.
///
/// ```
/// let mut v = [3, 4, 2, 1, 7, 5, 8, 9, 0, 6];
/// stable_merge::bottom_up::sort(&mut v);
/// assert_eq!(v, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
/// ```
#[inline]
pub fn sort<T>(v: &mut [T])
where
    T: Ord,
{
    bottom_up_sort(v, &mut |a: &T, b: &T| a.lt(b));
}

/// Sorts the slice with a comparator function, preserving the order of equal elements.
#[inline]
pub fn sort_by<T, F>(v: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    bottom_up_sort(v, &mut |a: &T, b: &T| compare(a, b) == Ordering::Less);
}

fn bottom_up_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if mem::size_of::<T>() == 0 || len < 2 {
        return;
    }

    let config = SortConfig::global();
    let mut scratch = Scratch::try_acquire(config.buffer().scratch_len(len));

    if scratch.capacity() < len {
        debug!(
            "bottom-up sort: got scratch for {} of {len} elements, using the recursive engine",
            scratch.capacity()
        );
        stable::sort_recursive(v, &mut scratch, config.insertion_threshold(), is_less);
        return;
    }

    stable::buffered_merge_sort(v, &mut scratch, 1, is_less);
}
