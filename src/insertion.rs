//! Insertion sort, used for every run at or below the insertion threshold.

use std::cmp::Ordering;
use std::mem::{self, ManuallyDrop};
use std::ptr;

/// Sorts the slice with insertion sort.
///
/// This sort is stable, does not allocate, and *O*(*n*²) worst-case. It is the fastest option for
/// very short slices, and is what the stable sort uses for runs of up to 32 elements.
#[inline]
pub fn insertion_sort<T>(v: &mut [T])
where
    T: Ord,
{
    if mem::size_of::<T>() == 0 {
        return;
    }

    insertion_sort_shift_left(v, 1, &mut |a: &T, b: &T| a.lt(b));
}

/// Sorts the slice with insertion sort and a comparator function.
///
/// See [`insertion_sort`].
#[inline]
pub fn insertion_sort_by<T, F>(v: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if mem::size_of::<T>() == 0 {
        return;
    }

    insertion_sort_shift_left(v, 1, &mut |a: &T, b: &T| compare(a, b) == Ordering::Less);
}

// When dropped, copies from `src` into `dest`.
struct InsertionHole<T> {
    src: *const T,
    dest: *mut T,
}

impl<T> Drop for InsertionHole<T> {
    fn drop(&mut self) {
        // SAFETY: `src` is the element held out of the slice and `dest` the single hole left
        // behind, they never overlap.
        unsafe {
            ptr::copy_nonoverlapping(self.src, self.dest, 1);
        }
    }
}

/// Inserts `v[v.len() - 1]` into the sorted prefix `v[..v.len() - 1]`, so that all of `v` is
/// sorted.
///
/// # Safety
///
/// `v.len()` must be at least 2.
unsafe fn insert_tail<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(v.len() >= 2);

    let arr_ptr = v.as_mut_ptr();
    let i = v.len() - 1;

    // SAFETY: the caller guarantees `i >= 1`, every offset below stays in `0..=i`.
    unsafe {
        let tail_ptr = arr_ptr.add(i);

        // Compare through the slot that stays authoritative if we return here.
        if !is_less(&*tail_ptr, &*tail_ptr.sub(1)) {
            return;
        }

        // From here on `tmp` is the only live copy of the tail element, all comparisons must go
        // through it so that whatever `is_less` observed is what gets written back.
        let tmp = ManuallyDrop::new(ptr::read(tail_ptr));

        // If `is_less` panics, `hole` writes `tmp` into the current gap, so `v` still holds every
        // element it started with exactly once.
        let mut hole = InsertionHole {
            src: &*tmp,
            dest: tail_ptr.sub(1),
        };
        ptr::copy_nonoverlapping(hole.dest, tail_ptr, 1);

        for j in (0..(i - 1)).rev() {
            let j_ptr = arr_ptr.add(j);
            if !is_less(&*tmp, &*j_ptr) {
                break;
            }

            ptr::copy_nonoverlapping(j_ptr, hole.dest, 1);
            hole.dest = j_ptr;
        }
        // `hole` gets dropped and fills the gap with `tmp`.
    }
}

/// Sorts `v` assuming `v[..offset]` is already sorted.
///
/// Equal elements are never moved past each other, which keeps this stable.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn insertion_sort_shift_left<T, F>(v: &mut [T], offset: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    // This is a logic but not a safety bug.
    debug_assert!(offset != 0 && offset <= len.max(1));

    if len < 2 || offset == 0 {
        return;
    }

    for i in offset..len {
        // SAFETY: `i >= 1`, so the sub-slice holds at least two elements.
        unsafe {
            insert_tail(&mut v[..=i], is_less);
        }
    }
}
