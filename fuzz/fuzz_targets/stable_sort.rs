#![no_main]

use libfuzzer_sys::fuzz_target;

use fuzz_util::{bytes_as_i32, cmp_key, split_policy};

fuzz_target!(|data: &[u8]| {
    let (config, rest) = split_policy(data);

    let mut v: Vec<(i32, usize)> = bytes_as_i32(rest)
        .into_iter()
        .enumerate()
        .map(|(i, val)| (val, i))
        .collect();

    let mut expected = v.clone();
    expected.sort_by(cmp_key);

    config.sort_by(&mut v, cmp_key);
    assert_eq!(v, expected);
});
