use tessera::task::{JoinHandle, await_all, join_all, run_task, run_task_with, try_await_all};
use tessera::{Pool, PoolBuilder};

use proptest::prelude::*;

use std::thread;
use std::time::Duration;

fn add((lhs, rhs): (i32, i32)) -> i32 {
    lhs + rhs
}

#[test]
fn await_all_sums_in_order() {
    let handles = vec![
        run_task_with(add, (10, 20)),
        run_task_with(add, (15, 2)),
        run_task_with(add, (1, 20)),
    ];

    assert_eq!(await_all(handles), vec![30, 17, 21]);
}

#[test]
fn await_all_of_nothing_is_empty() {
    let handles: Vec<JoinHandle<i32>> = Vec::new();

    assert!(await_all(handles).is_empty());
}

#[test]
fn await_all_keeps_input_order_when_completion_is_reversed() {
    let handles: Vec<_> = (0..8u64)
        .map(|i| {
            run_task(move || {
                thread::sleep(Duration::from_millis((8 - i) * 5));
                i
            })
        })
        .collect();

    assert_eq!(await_all(handles), (0..8).collect::<Vec<_>>());
}

#[test]
fn await_all_accepts_finished_handles() {
    let handles: Vec<_> = (0..4).map(|i| run_task(move || i)).collect();

    for handle in &handles {
        while !handle.is_finished() {
            thread::yield_now();
        }
    }

    assert_eq!(await_all(handles), vec![0, 1, 2, 3]);
}

#[test]
fn try_await_all_reports_abandoned_tasks() {
    let failing: JoinHandle<i32> = run_task(|| panic!("second task fails"));
    let failing_id = failing.id();

    let handles = vec![run_task(|| 1), failing, run_task(|| 3)];
    let err = try_await_all(handles).unwrap_err();

    assert!(err.is_abandoned());
    assert!(err.to_string().contains(&failing_id.to_string()));
}

#[test]
#[should_panic(expected = "terminated without producing a value")]
fn await_all_panics_on_abandoned_tasks() {
    let handles: Vec<JoinHandle<i32>> = vec![run_task(|| 1), run_task(|| panic!("boom"))];

    await_all(handles);
}

#[test]
fn join_all_defers_blocking() {
    let handles: Vec<_> = (1..=5).map(|i| run_task(move || i * 10)).collect();

    let all = join_all(handles);

    assert_eq!(all.wait(), vec![10, 20, 30, 40, 50]);
}

#[test]
fn join_all_of_nothing_is_already_finished() {
    let all = join_all(Vec::<JoinHandle<String>>::new());

    assert!(all.is_finished());
    assert!(all.wait().is_empty());
}

#[test]
fn join_all_propagates_abandonment() {
    let handles: Vec<JoinHandle<i32>> = vec![run_task(|| panic!("inner failure")), run_task(|| 2)];

    assert!(join_all(handles).join().unwrap_err().is_abandoned());
}

#[test]
fn join_all_on_a_single_worker_pool_does_not_deadlock() {
    let pool = PoolBuilder::new().worker_threads(1).build().unwrap();

    let handles: Vec<_> = (0..16).map(|i| pool.spawn(move || i + 1)).collect();
    let all = pool.join_all(handles);

    assert_eq!(all.wait(), (1..=16).collect::<Vec<_>>());
}

#[test]
fn nested_aggregation_inside_tasks() {
    let pool = PoolBuilder::new().worker_threads(2).build().unwrap();

    let outer: Vec<_> = (0..4)
        .map(|i| {
            pool.spawn(move || {
                let inner: Vec<_> = (0..4).map(|j| run_task(move || i * 10 + j)).collect();
                await_all(inner).into_iter().sum::<i32>()
            })
        })
        .collect();

    assert_eq!(await_all(outer), vec![6, 46, 86, 126]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_await_all_preserves_order(delays in proptest::collection::vec(0u64..6, 0..12)) {
        let expected: Vec<usize> = (0..delays.len()).collect();

        let handles: Vec<_> = delays
            .iter()
            .enumerate()
            .map(|(i, &delay)| {
                run_task(move || {
                    thread::sleep(Duration::from_millis(delay));
                    i
                })
            })
            .collect();

        prop_assert_eq!(await_all(handles), expected);
    }

    #[test]
    fn prop_join_all_matches_await_all(values in proptest::collection::vec(any::<i64>(), 0..12)) {
        let pool: &Pool = Pool::global();

        let direct: Vec<_> = values.iter().map(|&v| pool.spawn(move || v.wrapping_mul(3))).collect();
        let deferred: Vec<_> = values.iter().map(|&v| pool.spawn(move || v.wrapping_mul(3))).collect();

        prop_assert_eq!(join_all(deferred).wait(), await_all(direct));
    }
}
