use std::cmp::Ordering;

/// A stable sort under test.
pub trait Sort {
    fn name() -> String;

    fn sort<T>(arr: &mut [T])
    where
        T: Ord;

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> Ordering;
}

/// A stable merge of the two adjacent sorted runs `arr[..mid]` and `arr[mid..]` under test.
pub trait Merge {
    fn name() -> String;

    fn merge_by<T, F>(arr: &mut [T], mid: usize, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering;
}

pub mod patterns;
pub mod types;
