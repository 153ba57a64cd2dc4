#![no_main]

use libfuzzer_sys::fuzz_target;

use fuzz_util::{bytes_as_i32, cmp_key, split_policy};

fuzz_target!(|data: &[u8]| {
    let (config, rest) = split_policy(data);
    let (mid_sel, rest) = match rest.split_first() {
        Some((&sel, rest)) => (sel as usize, rest),
        None => return,
    };

    let mut v: Vec<(i32, usize)> = bytes_as_i32(rest)
        .into_iter()
        .enumerate()
        .map(|(i, val)| (val, i))
        .collect();

    let mid = if v.is_empty() { 0 } else { mid_sel % (v.len() + 1) };
    v[..mid].sort_by(cmp_key);
    v[mid..].sort_by(cmp_key);

    let mut expected = v.clone();
    expected.sort_by(cmp_key);

    config.merge_by(&mut v, mid, cmp_key);
    assert_eq!(v, expected);
});
