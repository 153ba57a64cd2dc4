use std::cmp::Ordering;

use stable_merge::{BufferPolicy, SortConfig};

/// Reads `data` as little endian `i32`s, ignoring trailing bytes.
pub fn bytes_as_i32(data: &[u8]) -> Vec<i32> {
    data.chunks_exact(4)
        .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Picks a buffer policy from the first input byte, so that every merge path gets exercised.
pub fn split_policy(data: &[u8]) -> (SortConfig, &[u8]) {
    let (policy, rest) = match data.split_first() {
        Some((&sel, rest)) => {
            let policy = match sel % 3 {
                0 => BufferPolicy::Unbounded,
                1 => BufferPolicy::Limited((sel / 3) as usize),
                _ => BufferPolicy::InPlace,
            };
            (policy, rest)
        }
        None => (BufferPolicy::Unbounded, data),
    };

    let config = SortConfig::builder()
        .buffer(policy)
        .build()
        .unwrap_or_default();

    (config, rest)
}

/// Compares by key only, the index tags the original position of equal keys.
pub fn cmp_key(a: &(i32, usize), b: &(i32, usize)) -> Ordering {
    (a.0 >> 8).cmp(&(b.0 >> 8))
}
