//! Best-effort scratch memory shared by the merge helpers.

use std::fmt;
use std::mem;

use log::debug;

/// Uninitialized storage for up to [`Scratch::capacity`] elements of `T`.
///
/// A `Scratch` never owns the elements staged in it. The merge helpers bitwise-move elements in
/// and guarantee, through drop guards, that every one of them is moved back into the slice before
/// control returns to the caller, even if the comparison function panics. Dropping a `Scratch`
/// only releases the allocation.
///
/// A scratch can be reused across calls, see [`crate::stable_sort_by_in`] and
/// [`crate::inplace_merge_by_in`].
pub struct Scratch<T> {
    // Always `len == 0`, only the spare capacity is used.
    buf: Vec<T>,
    capacity: usize,
}

impl<T> Scratch<T> {
    /// A scratch with no capacity. Merges using it run fully in-place.
    pub const fn empty() -> Self {
        Self {
            buf: Vec::new(),
            capacity: 0,
        }
    }

    /// Tries to allocate room for `requested` elements.
    ///
    /// Allocation is best effort: if the allocator refuses the full request, the request is halved
    /// until it succeeds or reaches zero. Callers must be prepared for any capacity in
    /// `0..=requested`.
    pub fn try_acquire(requested: usize) -> Self {
        if mem::size_of::<T>() == 0 {
            // Zero-sized types never need backing storage.
            return Self {
                buf: Vec::new(),
                capacity: requested,
            };
        }

        let mut len = requested;
        while len > 0 {
            let mut buf = Vec::new();
            if buf.try_reserve_exact(len).is_ok() {
                if len < requested {
                    debug!("scratch shortfall: requested {requested} elements, got {len}");
                }

                return Self { buf, capacity: len };
            }

            len /= 2;
        }

        if requested > 0 {
            debug!("scratch allocation of {requested} elements failed, merging in-place");
        }

        Self::empty()
    }

    /// Number of elements that can be staged at once.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pointer to the start of the storage, valid for `capacity` writes.
    #[inline]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }
}

impl<T> Default for Scratch<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> fmt::Debug for Scratch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scratch")
            .field("capacity", &self.capacity)
            .finish()
    }
}
