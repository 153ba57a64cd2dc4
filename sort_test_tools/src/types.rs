//! Value types that stress different properties of a sort implementation.

use std::cmp::Ordering;
use std::fmt;
use std::hint::black_box;

/// Very large stack value, moving it around is expensive.
#[derive(PartialEq, Eq, Clone)]
pub struct OneKiloByte {
    values: [i64; 128],
}

impl OneKiloByte {
    pub fn new(val: i32) -> Self {
        let mut values = [0i64; 128];
        let mut val_i64 = val as i64;

        for elem in &mut values {
            *elem = val_i64;
            val_i64 = black_box(val_i64 + 1);
        }
        Self { values }
    }

    fn key(&self) -> i64 {
        self.values[11] + self.values[55] + self.values[77]
    }
}

impl PartialOrd for OneKiloByte {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OneKiloByte {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Debug for OneKiloByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OneKiloByte({})", self.values[0])
    }
}

/// 16 byte stack value that is `Copy` but has a relatively expensive comparison.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct F128 {
    x: f64,
    y: f64,
}

impl F128 {
    pub fn new(val: i32) -> Self {
        let val_f = (val as f64) + (i32::MAX as f64) + 10.0;

        let x = val_f + 0.1;
        let y = val_f.log(4.1);

        assert!(y < x);
        assert!(x.is_normal() && y.is_normal());

        Self { x, y }
    }
}

// Only normal, comparable floats are ever constructed.
impl Eq for F128 {}

impl PartialOrd for F128 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for F128 {
    fn cmp(&self, other: &Self) -> Ordering {
        let this_div = self.x / self.y;
        let other_div = other.x / other.y;

        this_div.total_cmp(&other_div)
    }
}

/// A sort key paired with the position at which the key occurred in the input, among all elements
/// with the same key. Sorting by `key` alone must leave `occurrence` ascending within each key.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy)]
pub struct Keyed {
    pub key: i32,
    pub occurrence: u32,
}

impl Keyed {
    /// Tags every value with its occurrence count, using `key_of` to bucket the values.
    pub fn tag_all(values: &[i32], key_of: impl Fn(i32) -> i32) -> Vec<Keyed> {
        let mut counts = std::collections::HashMap::<i32, u32>::new();

        values
            .iter()
            .map(|&val| {
                let key = key_of(val);
                let occurrence = counts.entry(key).or_insert(0);
                *occurrence += 1;

                Keyed {
                    key,
                    occurrence: *occurrence,
                }
            })
            .collect()
    }

    pub fn cmp_key(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// True if `v` is sorted by key and, within each key, by occurrence.
pub fn is_stably_sorted(v: &[Keyed]) -> bool {
    v.windows(2).all(|w| w[0] <= w[1])
}
