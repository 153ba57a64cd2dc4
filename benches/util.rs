use std::cell::Cell;
use std::rc::Rc;

/// Pins the calling thread to one core, once per thread.
pub fn pin_thread_to_core() {
    let pin_core_id: usize = 2;

    thread_local! {static AFFINITY_ALREADY_SET: Cell<bool> = Cell::new(false); }

    if !AFFINITY_ALREADY_SET.get() {
        if let Some(core_id_2) = core_affinity::get_core_ids()
            .as_ref()
            .and_then(|ids| ids.get(pin_core_id))
        {
            core_affinity::set_for_current(*core_id_2);
        }

        AFFINITY_ALREADY_SET.set(true);
    }
}

/// Runs `instrumented_func` repeatedly and prints the mean of what it accumulated in
/// `comp_count`.
pub fn measure_comp_count(
    name: &str,
    test_size: usize,
    instrumented_func: impl Fn(),
    comp_count: Rc<Cell<u64>>,
) {
    let run_count: usize = if test_size <= 20 {
        100_000
    } else if test_size < 10_000 {
        3000
    } else if test_size < 100_000 {
        1000
    } else {
        100
    };

    comp_count.set(0);
    for _ in 0..run_count {
        instrumented_func();
    }

    // If there is on average less than a single comparison this will be wrong.
    let total = comp_count.get() / (run_count as u64);
    println!("{name}: mean comparisons: {total}");
}
