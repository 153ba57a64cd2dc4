//! The stable sort engine: recursive halving, insertion sort for short runs, and merges that use
//! as much scratch memory as could be acquired.

use std::cmp::{self, Ordering};
use std::mem;
use std::ptr;

use log::trace;

use crate::config::SortConfig;
use crate::insertion::insertion_sort_shift_left;
use crate::merge::merge_adjacent;
use crate::scratch::Scratch;

/// Sorts the slice, preserving the order of equal elements.
///
/// This sort is stable (i.e., does not reorder equal elements) and *O*(*n* \* log(*n*))
/// worst-case, given scratch memory for half the slice. If that memory can't be allocated, it
/// degrades gracefully to *O*(*n* \* log²(*n*)) using in-place merges.
///
/// # Current implementation
///
/// Runs of up to 32 elements are sorted with insertion sort, see [`SortConfig::global`] for how to
/// change that and the scratch limit from the environment. Longer slices are split in half by
/// count, each half is sorted, and the halves are merged. When a half fits into the scratch
/// buffer it is sorted bottom-up, moving pairs of runs back and forth between the slice and the
/// scratch. Merges stage the shorter run in scratch, or fall back to rotations when it doesn't
/// fit.
///
/// # Examples
///
/// ```
/// let mut v = [-5, 4, 1, -3, 2];
///
/// stable_merge::stable_sort(&mut v);
/// assert!(v == [-5, -3, 1, 2, 4]);
/// ```
#[inline]
pub fn stable_sort<T>(v: &mut [T])
where
    T: Ord,
{
    sort_with_config(v, SortConfig::global(), &mut |a: &T, b: &T| a.lt(b));
}

/// Sorts the slice with a comparator function, preserving the order of equal elements.
///
/// The comparator function must define a total ordering for the elements in the slice. If the
/// ordering is not total, the order of the elements is unspecified, but the slice still holds
/// exactly the elements it started with. If the comparator panics, the same holds.
///
/// See [`stable_sort`].
#[inline]
pub fn stable_sort_by<T, F>(v: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    sort_with_config(v, SortConfig::global(), &mut |a: &T, b: &T| {
        compare(a, b) == Ordering::Less
    });
}

/// Sorts the slice with a key extraction function, preserving the order of equal elements.
///
/// See [`stable_sort`].
#[inline]
pub fn stable_sort_by_key<T, K, F>(v: &mut [T], mut f: F)
where
    F: FnMut(&T) -> K,
    K: Ord,
{
    sort_with_config(v, SortConfig::global(), &mut |a: &T, b: &T| f(a).lt(&f(b)));
}

/// Sorts the slice with a fallible comparator function, preserving the order of equal elements.
///
/// The first error returned by `compare` is handed back to the caller. Once an error was seen,
/// `compare` is not called again and the sort finishes early, leaving the slice in an unspecified
/// order that still holds exactly the elements it started with.
pub fn try_stable_sort_by<T, E, F>(v: &mut [T], mut compare: F) -> Result<(), E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    let mut first_err = None;

    sort_with_config(v, SortConfig::global(), &mut |a: &T, b: &T| {
        if first_err.is_some() {
            return false;
        }

        match compare(a, b) {
            Ok(ord) => ord == Ordering::Less,
            Err(err) => {
                first_err = Some(err);
                false
            }
        }
    });

    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Sorts the slice with a comparator function, using the caller provided `scratch` instead of
/// allocating.
///
/// Any capacity works, including zero. With at least `(v.len() + 1) / 2` elements of capacity the
/// sort is *O*(*n* \* log(*n*)).
pub fn stable_sort_by_in<T, F>(v: &mut [T], scratch: &mut Scratch<T>, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if mem::size_of::<T>() == 0 {
        return;
    }

    sort_recursive(
        v,
        scratch,
        SortConfig::global().insertion_threshold(),
        &mut |a: &T, b: &T| compare(a, b) == Ordering::Less,
    );
}

pub(crate) fn sort_with_config<T, F>(v: &mut [T], config: &SortConfig, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    if mem::size_of::<T>() == 0 {
        // Sorting has no meaningful behavior on zero-sized types. Do nothing.
        return;
    }

    let len = v.len();
    let threshold = config.insertion_threshold();

    if len <= threshold {
        // Also covers `len < 2`. Short inputs never allocate.
        insertion_sort_shift_left(v, 1, is_less);
        return;
    }

    let mut scratch = Scratch::try_acquire(config.buffer().scratch_len((len + 1) / 2));
    trace!(
        "stable sort: len {len}, scratch {}, buffer policy {}",
        scratch.capacity(),
        config.buffer()
    );

    sort_recursive(v, &mut scratch, threshold, is_less);
    // `scratch` is released here, and on unwind.
}

#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn sort_recursive<T, F>(
    v: &mut [T],
    scratch: &mut Scratch<T>,
    threshold: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    if len <= threshold {
        insertion_sort_shift_left(v, 1, is_less);
        return;
    }

    // Split by count, the left half gets the extra element.
    let half = (len + 1) / 2;

    {
        let (left, right) = v.split_at_mut(half);

        if half <= scratch.capacity() {
            buffered_merge_sort(left, scratch, threshold, is_less);
            buffered_merge_sort(right, scratch, threshold, is_less);
        } else {
            sort_recursive(left, scratch, threshold, is_less);
            sort_recursive(right, scratch, threshold, is_less);
        }
    }

    merge_adjacent(v, half, scratch, is_less);
}

/// Sorts `v` bottom-up: first every `run_len` long chunk with insertion sort, then pairs of
/// adjacent runs are merged from `v` into `scratch` and back, doubling the run length with every
/// pass.
///
/// `scratch` must be able to hold all of `v`. `run_len` must be at least 1.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn buffered_merge_sort<T, F>(
    v: &mut [T],
    scratch: &mut Scratch<T>,
    run_len: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    // The passes below write up to `len` elements into the scratch.
    assert!(len <= scratch.capacity() && run_len != 0);

    if run_len > 1 {
        for chunk in v.chunks_mut(run_len) {
            insertion_sort_shift_left(chunk, 1, is_less);
        }
    }

    let arr_ptr = v.as_mut_ptr();
    let buf = scratch.as_mut_ptr();

    let mut run = run_len;
    while run < len {
        // SAFETY: `buf` is valid for `len` elements and doesn't alias `v`. Each pass leaves all
        // elements in its destination, also when unwinding, see `PassGuard`. Passes come in pairs,
        // so the elements always end up back in `v`.
        unsafe {
            merge_pass(arr_ptr, buf, len, run, Pass::IntoScratch, is_less);
            run = run.saturating_mul(2);
            merge_pass(buf, arr_ptr, len, run, Pass::OutOfScratch, is_less);
            run = run.saturating_mul(2);
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Pass {
    // `src` is the slice, `dst` the scratch.
    IntoScratch,
    // `src` is the scratch, `dst` the slice.
    OutOfScratch,
}

/// Progress of a merge pass. The unconsumed elements of `src` are `src[left..left_end]` and
/// `src[right..len]`, everything consumed so far is in `dst[..out]`.
///
/// On drop, moves every element that is not in the slice back into it, so that the slice holds
/// each of its original elements exactly once. This runs if `is_less` panics mid-pass. A pass that
/// completes is `mem::forget`-ed instead.
struct PassGuard<T> {
    src: *mut T,
    dst: *mut T,
    len: usize,
    pass: Pass,
    left: usize,
    left_end: usize,
    right: usize,
    out: usize,
}

impl<T> Drop for PassGuard<T> {
    fn drop(&mut self) {
        let left_rest = self.left_end - self.left;

        // SAFETY: `out + left_rest == right` holds whenever `is_less` can be called. All ranges
        // below are within `len`, and slice and scratch don't alias.
        unsafe {
            match self.pass {
                Pass::IntoScratch => {
                    // The slice has gaps at `..left` and `left_end..right`. Close the second one by
                    // moving the unconsumed left run up against `right`, then fill `..out` from the
                    // scratch.
                    ptr::copy(self.src.add(self.left), self.src.add(self.out), left_rest);
                    ptr::copy_nonoverlapping(self.dst, self.src, self.out);
                }
                Pass::OutOfScratch => {
                    // The slice holds `..out`, the rest is still in the scratch.
                    ptr::copy_nonoverlapping(
                        self.src.add(self.left),
                        self.dst.add(self.out),
                        left_rest,
                    );
                    ptr::copy_nonoverlapping(
                        self.src.add(self.right),
                        self.dst.add(self.right),
                        self.len - self.right,
                    );
                }
            }
        }
    }
}

/// Moves `src[..len]` into `dst[..len]`, merging each pair of adjacent `run` long runs on the
/// way. A trailing unpaired run is moved over as is.
///
/// # Safety
///
/// `src` and `dst` must be valid for `len` elements and must not alias. `pass` must describe which
/// of the two is the slice.
unsafe fn merge_pass<T, F>(
    src: *mut T,
    dst: *mut T,
    len: usize,
    run: usize,
    pass: Pass,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    let mut guard = PassGuard {
        src,
        dst,
        len,
        pass,
        left: 0,
        left_end: 0,
        right: 0,
        out: 0,
    };

    while guard.out < len {
        let start = guard.out;
        let mid = cmp::min(start.saturating_add(run), len);
        let end = cmp::min(mid.saturating_add(run), len);

        guard.left = start;
        guard.left_end = mid;
        guard.right = mid;

        // SAFETY: `left < mid <= right < end <= len`, and `out < right`, so every read is of a live
        // element of `src` and every write lands in a free slot of `dst`.
        unsafe {
            while guard.left < mid && guard.right < end {
                // On ties take from the left run, that's what keeps the merge stable.
                let take_right = is_less(&*src.add(guard.right), &*src.add(guard.left));
                let from = if take_right { guard.right } else { guard.left };
                ptr::copy_nonoverlapping(src.add(from), dst.add(guard.out), 1);

                guard.out += 1;
                if take_right {
                    guard.right += 1;
                } else {
                    guard.left += 1;
                }
            }

            // One side is exhausted, move what is left of the other one.
            let left_rest = mid - guard.left;
            ptr::copy_nonoverlapping(src.add(guard.left), dst.add(guard.out), left_rest);
            guard.out += left_rest;

            let right_rest = end - guard.right;
            ptr::copy_nonoverlapping(src.add(guard.right), dst.add(guard.out), right_rest);
            guard.out += right_rest;
        }

        debug_assert_eq!(guard.out, end);
        guard.left = end;
        guard.left_end = end;
        guard.right = end;
    }

    // Everything is in `dst` now, which is exactly where it should stay.
    mem::forget(guard);
}
