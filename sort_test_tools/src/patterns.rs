//! Input patterns for testing and benchmarking sorts and merges.
//!
//! All random patterns derive from one seed per process, printed by the test suite. Set the
//! `OVERRIDE_SEED` environment variable to replay a failure.

use std::env;
use std::str::FromStr;
use std::sync::Mutex;

use rand::distributions::Uniform;
use rand::prelude::*;

use zipf::ZipfDistribution;

// --- Public ---

pub fn random(len: usize) -> Vec<i32> {
    //     .
    // : . : :
    // :.:::.::

    let mut rng = new_rng();
    (0..len).map(|_| rng.gen::<i32>()).collect()
}

pub fn random_uniform<R>(len: usize, range: R) -> Vec<i32>
where
    R: Into<Uniform<i32>>,
{
    // :.:.:.::
    let mut rng = new_rng();
    let dist: Uniform<i32> = range.into();

    (0..len).map(|_| dist.sample(&mut rng)).collect()
}

pub fn random_zipf(len: usize, exponent: f64) -> Vec<i32> {
    // https://en.wikipedia.org/wiki/Zipf's_law
    let mut rng = new_rng();
    let dist = ZipfDistribution::new(len, exponent).unwrap();

    (0..len).map(|_| dist.sample(&mut rng) as i32).collect()
}

pub fn random_sorted(len: usize, sorted_percent: f64) -> Vec<i32> {
    //     .:
    //   .:::. :
    // .::::::.::
    // [----][--]
    //  ^      ^
    //  |      |
    // sorted  |
    //     unsorted

    let mut v = random(len);
    let sorted_len = ((len as f64) * (sorted_percent / 100.0)).round() as usize;

    v[0..sorted_len].sort();

    v
}

/// Every value in `0..len` exactly once, shuffled.
pub fn shuffled_distinct(len: usize) -> Vec<i32> {
    let mut v = ascending(len);
    v.shuffle(&mut new_rng());

    v
}

/// `len / copies` distinct keys, each repeated `copies` times, shuffled. A trailing partial group
/// fills up to `len`.
pub fn repeated_keys(len: usize, copies: usize) -> Vec<i32> {
    let copies = copies.max(1);
    let mut v: Vec<i32> = (0..len).map(|i| (i / copies) as i32).collect();
    v.shuffle(&mut new_rng());

    v
}

pub fn all_equal(len: usize) -> Vec<i32> {
    // ......
    // ::::::

    vec![66; len]
}

pub fn ascending(len: usize) -> Vec<i32> {
    //     .:
    //   .:::
    // .:::::

    (0..len as i32).collect()
}

pub fn descending(len: usize) -> Vec<i32> {
    // :.
    // :::.
    // :::::.

    (0..len as i32).rev().collect()
}

pub fn saw_ascending(len: usize, saw_count: usize) -> Vec<i32> {
    //   .:  .:
    // .:::.:::

    saws(len, saw_count, |_| false)
}

pub fn saw_descending(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.
    // :::.:::.

    saws(len, saw_count, |_| true)
}

pub fn saw_mixed(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.    .::.    .:
    // :::.:::..::::::..:::

    let directions = random_uniform(saw_count.max(1) + 1, 0..=1);
    saws(len, saw_count, |i| directions[i % directions.len()] == 1)
}

pub fn pipe_organ(len: usize) -> Vec<i32> {
    //   .:.
    // .:::::.

    let mut v = random(len);

    let (first_half, second_half) = v.split_at_mut(len / 2);
    first_half.sort();
    second_half.sort_by(|a, b| b.cmp(a));

    v
}

/// Two ascending runs, `v[..mid]` and `v[mid..]`, drawn from `0..=max_val`. Input for merges.
pub fn sorted_runs(len: usize, mid: usize, max_val: i32) -> Vec<i32> {
    //   .:  .:
    // .:::.:::
    //     ^
    //    mid

    let mut v = random_uniform(len, 0..=max_val);

    let (left, right) = v.split_at_mut(mid.min(len));
    left.sort();
    right.sort();

    v
}

/// Overwrites the default behavior so that each call to a random derived pattern yields new random
/// values.
///
/// By default `patterns::random(4)` will yield the same values per process invocation.
/// For benchmarks it's advised to call this function.
pub fn use_random_seed_each_time() {
    let (seed_source, _) = seed_source_and_value();
    if seed_source == SeedSource::Override {
        panic!("Using use_random_seed_each_time conflicts with the external seed override.");
    }

    *SEED.lock().unwrap() = Some((SeedSource::EachCall, 0));
}

pub fn random_init_seed() -> u64 {
    seed_source_and_value().1
}

// --- Private ---

#[derive(Copy, Clone, PartialEq, Eq)]
enum SeedSource {
    EachCall,
    OncePerProcess,
    Override,
}

static SEED: Mutex<Option<(SeedSource, u64)>> = Mutex::new(None);

fn seed_source_and_value() -> (SeedSource, u64) {
    let (seed_source, seed_val) = *SEED.lock().unwrap().get_or_insert_with(|| {
        match env::var("OVERRIDE_SEED") {
            Ok(seed) => (SeedSource::Override, u64::from_str(&seed).unwrap()),
            Err(_) => (SeedSource::OncePerProcess, thread_rng().gen()),
        }
    });

    match seed_source {
        SeedSource::EachCall => (seed_source, thread_rng().gen()),
        _ => (seed_source, seed_val),
    }
}

fn new_rng() -> StdRng {
    StdRng::seed_from_u64(random_init_seed())
}

fn saws(len: usize, saw_count: usize, mut descending: impl FnMut(usize) -> bool) -> Vec<i32> {
    if len == 0 {
        return Vec::new();
    }

    let mut v = random(len);
    let chunk_len = (len / saw_count.max(1)).max(1);

    for (i, chunk) in v.chunks_mut(chunk_len).enumerate() {
        if descending(i) {
            chunk.sort_by(|a, b| b.cmp(a));
        } else {
            chunk.sort();
        }
    }

    v
}
