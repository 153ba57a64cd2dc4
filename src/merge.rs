//! Merging two adjacent sorted runs, with a scratch buffer when one is available and by rotation
//! when it is not.
//!
//! Most helpers below operate on the "trimmed" form of a merge problem `v[..mid]`, `v[mid..]`,
//! produced by [`trim_runs`]:
//!
//! - both runs are sorted,
//! - `v[mid]` is strictly less than `v[0]`, so the right run contributes the lowest element,
//! - `v[len - 1]` is strictly less than `v[mid - 1]`, so the left run contributes the highest
//!   element,
//! - both runs hold at least two elements.

use std::cmp::{self, Ordering};
use std::mem;
use std::ops::Range;
use std::ptr;

use crate::config::{BufferPolicy, SortConfig};
use crate::scratch::Scratch;

/// Merges the sorted runs `v[..mid]` and `v[mid..]` so that all of `v` is sorted.
///
/// The merge is stable: equal elements keep their relative order, and on ties elements of the left
/// run come before elements of the right run.
///
/// Scratch memory for the shorter of the two runs is requested. If it can't be had the merge
/// falls back to rotations and runs in *O*(*n* \* log(*n*)) time without extra memory.
///
/// # Panics
///
/// Panics if `mid > v.len()`. In debug builds, also panics if either run is not sorted.
///
/// # Examples
///
/// ```
/// let mut v = [1, 4, 7, 2, 3, 9];
/// stable_merge::inplace_merge(&mut v, 3);
/// assert_eq!(v, [1, 2, 3, 4, 7, 9]);
/// ```
#[inline]
pub fn inplace_merge<T>(v: &mut [T], mid: usize)
where
    T: Ord,
{
    merge_runs(v, mid, SortConfig::global().buffer(), &mut |a: &T, b: &T| a.lt(b));
}

/// Merges the sorted runs `v[..mid]` and `v[mid..]` with a comparator function.
///
/// See [`inplace_merge`].
#[inline]
pub fn inplace_merge_by<T, F>(v: &mut [T], mid: usize, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    merge_runs(v, mid, SortConfig::global().buffer(), &mut |a: &T, b: &T| {
        compare(a, b) == Ordering::Less
    });
}

/// Merges the sorted runs `v[..mid]` and `v[mid..]` using the caller provided `scratch`.
///
/// Whatever the capacity of `scratch`, including zero, the result is the same. Only the amount of
/// work changes.
pub fn inplace_merge_by_in<T, F>(v: &mut [T], mid: usize, scratch: &mut Scratch<T>, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let is_less = &mut |a: &T, b: &T| compare(a, b) == Ordering::Less;

    check_merge_preconditions(v, mid, is_less);

    if mem::size_of::<T>() == 0 {
        return;
    }

    merge_adjacent(v, mid, scratch, is_less);
}

pub(crate) fn merge_runs<T, F>(v: &mut [T], mid: usize, policy: BufferPolicy, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    check_merge_preconditions(v, mid, is_less);

    if mem::size_of::<T>() == 0 {
        return;
    }

    let Some(range) = trim_runs(v, mid, is_less) else {
        return;
    };

    // Only allocate once the trivial cases have been ruled out.
    let count1 = mid - range.start;
    let count2 = range.end - mid;
    let mut scratch = Scratch::try_acquire(policy.scratch_len(cmp::min(count1, count2)));

    merge_trimmed(&mut v[range], count1, &mut scratch, is_less);
}

fn check_merge_preconditions<T, F>(v: &[T], mid: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    assert!(
        mid <= v.len(),
        "merge split point {mid} is out of range for slice of length {}",
        v.len()
    );

    debug_assert!(
        is_sorted_by(&v[..mid], is_less),
        "left run passed to merge is not sorted"
    );
    debug_assert!(
        is_sorted_by(&v[mid..], is_less),
        "right run passed to merge is not sorted"
    );
}

fn is_sorted_by<T, F>(v: &[T], is_less: &mut F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    v.windows(2).all(|w| !is_less(&w[1], &w[0]))
}

/// Merges `v[..mid]` and `v[mid..]`, neither of which needs to be trimmed. This is the entry point
/// used by the sort engine and by the recursion below.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn merge_adjacent<T, F>(v: &mut [T], mid: usize, scratch: &mut Scratch<T>, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    if let Some(range) = trim_runs(v, mid, is_less) {
        let mid = mid - range.start;
        merge_trimmed(&mut v[range], mid, scratch, is_less);
    }
}

/// Skips the prefix of the left run and the suffix of the right run that are already in their
/// final position.
///
/// Returns the range of `v` that still has to be merged, now in trimmed form, or `None` if the
/// merge got completed on the way, either because nothing was out of place or because one side
/// came down to a single element that could be rotated into place.
fn trim_runs<T, F>(v: &mut [T], mid: usize, is_less: &mut F) -> Option<Range<usize>>
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if mid == len {
        return None;
    }

    let mut first = 0;
    loop {
        if first == mid {
            return None;
        }

        if is_less(&v[mid], &v[first]) {
            // `v[mid]` goes into the position of `v[first]`.
            break;
        }

        first += 1;
    }

    let highest = mid - 1;
    let mut last = len;
    loop {
        last -= 1;
        if last == mid {
            // Only `v[mid]` is left on the right side, and it is the lowest element.
            v[first..=mid].rotate_right(1);
            return None;
        }

        if is_less(&v[last], &v[highest]) {
            // `v[highest]` goes into the position of `v[last]`.
            break;
        }
    }
    last += 1;

    if mid - first == 1 {
        // Only `v[first]` is left on the left side, and it is the highest element.
        v[first..last].rotate_left(1);
        return None;
    }

    Some(first..last)
}

/// Merges a trimmed problem, through `scratch` if the shorter run fits.
fn merge_trimmed<T, F>(v: &mut [T], mid: usize, scratch: &mut Scratch<T>, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let shorter = cmp::min(mid, v.len() - mid);

    if shorter <= scratch.capacity() {
        // SAFETY: both runs are non-empty in trimmed form, and the scratch can hold the shorter
        // one. Zero-sized types never get this far.
        unsafe {
            merge_with_buffer(v, mid, scratch.as_mut_ptr(), is_less);
        }
    } else {
        merge_divide_and_conquer(v, mid, scratch, is_less);
    }
}

/// Halves the shorter run, finds the matching split in the longer one by binary search, rotates
/// the two middle blocks past each other and recurses into the two smaller merges this creates.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
fn merge_divide_and_conquer<T, F>(
    v: &mut [T],
    mid: usize,
    scratch: &mut Scratch<T>,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let count1 = mid;
    let count2 = len - mid;

    let (left_cut, right_cut) = {
        let (left, right) = v.split_at(mid);

        if count1 <= count2 {
            let left_cut = count1 / 2;
            // Everything in `right[..right_cut]` is strictly less than `left[left_cut]`, so those
            // elements can move in front of it without breaking stability.
            let right_cut = lower_bound(right, &left[left_cut], is_less);
            (left_cut, mid + right_cut)
        } else {
            let right_cut = count2 / 2;
            // Everything in `left[left_cut..]` is strictly greater than `right[right_cut]`.
            let left_cut = upper_bound(left, &right[right_cut], is_less);
            (left_cut, mid + right_cut)
        }
    };

    // `v[left_cut..mid]` and `v[mid..right_cut]` trade places.
    let new_mid = left_cut + (right_cut - mid);
    buffered_rotate(&mut v[left_cut..right_cut], mid - left_cut, scratch);

    merge_adjacent(&mut v[..new_mid], left_cut, scratch, is_less);
    merge_adjacent(&mut v[new_mid..], right_cut - new_mid, scratch, is_less);
}

/// Rotates `v` so that `v[mid]` becomes the first element. Uses `scratch` for the smaller block
/// if it fits, otherwise rotates in place.
fn buffered_rotate<T>(v: &mut [T], mid: usize, scratch: &mut Scratch<T>) {
    let len = v.len();
    let count1 = mid;
    let count2 = len - mid;

    if count1 == 0 || count2 == 0 {
        return;
    }

    let arr_ptr = v.as_mut_ptr();
    let buf = scratch.as_mut_ptr();

    if count1 <= count2 && count1 <= scratch.capacity() {
        // SAFETY: the scratch holds at least `count1` elements and doesn't alias `v`. Nothing in
        // between can panic, so the elements are never observable while staged.
        unsafe {
            ptr::copy_nonoverlapping(arr_ptr, buf, count1);
            ptr::copy(arr_ptr.add(mid), arr_ptr, count2);
            ptr::copy_nonoverlapping(buf, arr_ptr.add(count2), count1);
        }
    } else if count2 <= scratch.capacity() {
        // SAFETY: see above, with `count2`.
        unsafe {
            ptr::copy_nonoverlapping(arr_ptr.add(mid), buf, count2);
            ptr::copy(arr_ptr, arr_ptr.add(count2), count1);
            ptr::copy_nonoverlapping(buf, arr_ptr, count2);
        }
    } else {
        v.rotate_left(mid);
    }
}

/// Index of the first element of `v` that is not less than `key`.
fn lower_bound<T, F>(v: &[T], key: &T, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    v.partition_point(|elem| is_less(elem, key))
}

/// Index of the first element of `v` that is greater than `key`.
fn upper_bound<T, F>(v: &[T], key: &T, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    v.partition_point(|elem| !is_less(key, elem))
}

/// Merges non-decreasing runs `v[..mid]` and `v[mid..]` using `buf` as temporary storage, and
/// stores the result into `v[..]`.
///
/// # Safety
///
/// `mid` must be in bounds, `buf` must be valid for writes of `min(mid, v.len() - mid)` elements
/// and must not alias `v`. `T` must not be a zero-sized type.
#[inline(never)]
pub(crate) unsafe fn merge_with_buffer<T, F>(v: &mut [T], mid: usize, buf: *mut T, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if mid == 0 || mid == len {
        return;
    }

    let arr_ptr = v.as_mut_ptr();
    // SAFETY: `mid <= len`.
    let (v_mid, v_end) = unsafe { (arr_ptr.add(mid), arr_ptr.add(len)) };

    // The shorter run is moved into `buf`, leaving a gap of the same size in `v`. The gap is
    // tracked by `hole`: if `is_less` panics, or the longer run runs out first, dropping `hole`
    // moves whatever is left in `buf` into the gap. Either way `v` ends up holding every element
    // exactly once.
    let mut hole;

    if mid <= len - mid {
        // The left run is shorter, merge front to back.
        // SAFETY: `buf` can hold `mid` elements.
        unsafe {
            ptr::copy_nonoverlapping(arr_ptr, buf, mid);
            hole = MergeHole {
                start: buf,
                end: buf.add(mid),
                dest: arr_ptr,
            };
        }

        let left = &mut hole.start;
        let mut right = v_mid;
        let out = &mut hole.dest;

        while *left < hole.end && right < v_end {
            // On ties take from the left run, that's what keeps the merge stable.
            // SAFETY: both pointers are in bounds of their live ranges, and `out` always trails
            // `right`.
            unsafe {
                let to_copy = if is_less(&*right, &**left) {
                    get_and_increment(&mut right)
                } else {
                    get_and_increment(left)
                };
                ptr::copy_nonoverlapping(to_copy, get_and_increment(out), 1);
            }
        }
    } else {
        // The right run is shorter, merge back to front.
        // SAFETY: `buf` can hold `len - mid` elements.
        unsafe {
            ptr::copy_nonoverlapping(v_mid, buf, len - mid);
            hole = MergeHole {
                start: buf,
                end: buf.add(len - mid),
                dest: v_mid,
            };
        }

        let left = &mut hole.dest;
        let right = &mut hole.end;
        let mut out = v_end;

        while arr_ptr < *left && buf < *right {
            // On ties take from the right run, it belongs behind the left one.
            // SAFETY: `left` and `right` point one past a live element, `out` always leads
            // `left`.
            unsafe {
                let to_copy = if is_less(&*right.sub(1), &*left.sub(1)) {
                    decrement_and_get(left)
                } else {
                    decrement_and_get(right)
                };
                ptr::copy_nonoverlapping(to_copy, decrement_and_get(&mut out), 1);
            }
        }
    }
    // `hole` is dropped here and moves the unconsumed rest of `buf` into place.

    unsafe fn get_and_increment<T>(ptr: &mut *mut T) -> *mut T {
        let old = *ptr;
        // SAFETY: the caller keeps `ptr` within or one past its allocation.
        *ptr = unsafe { ptr.add(1) };
        old
    }

    unsafe fn decrement_and_get<T>(ptr: &mut *mut T) -> *mut T {
        // SAFETY: the caller keeps `ptr` within its allocation.
        *ptr = unsafe { ptr.sub(1) };
        *ptr
    }

    // When dropped, copies the range `start..end` into `dest..`.
    struct MergeHole<T> {
        start: *mut T,
        end: *mut T,
        dest: *mut T,
    }

    impl<T> Drop for MergeHole<T> {
        fn drop(&mut self) {
            // SAFETY: `T` is not zero-sized, `start..end` is the unconsumed part of the scratch
            // and `dest..` is a gap of exactly that size in the slice.
            unsafe {
                let len = self.end.offset_from(self.start) as usize;
                ptr::copy_nonoverlapping(self.start, self.dest, len);
            }
        }
    }
}
