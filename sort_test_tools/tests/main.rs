//! Runs the generic suites against the standard library, to validate the suites themselves.

use std::cmp::Ordering;

use sort_test_tools::{Merge, Sort};

struct SortImpl {}

impl Sort for SortImpl {
    fn name() -> String {
        "rust_std_stable".into()
    }

    fn sort<T>(arr: &mut [T])
    where
        T: Ord,
    {
        arr.sort();
    }

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        arr.sort_by(compare);
    }
}

struct MergeImpl {}

impl Merge for MergeImpl {
    fn name() -> String {
        "rust_std_stable_as_merge".into()
    }

    fn merge_by<T, F>(arr: &mut [T], mid: usize, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        assert!(mid <= arr.len());
        arr.sort_by(compare);
    }
}

mod sort {
    use super::SortImpl;

    sort_test_tools::instantiate_sort_tests!(SortImpl);
}

mod merge {
    use super::MergeImpl;

    sort_test_tools::instantiate_merge_tests!(MergeImpl);
}
