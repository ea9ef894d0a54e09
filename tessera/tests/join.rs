use tessera::task::{JoinHandle, run_task};
use tessera::{PoolBuilder, join};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn test_join_no_handles() {
    let () = join!();
}

#[test]
fn test_join_single_handle() {
    let a = join!(run_task(|| 42));

    assert_eq!(a, 42);
}

#[test]
fn test_join_two_handles() {
    let result = join!(run_task(|| 10), run_task(|| 20));

    assert_eq!(result, (10, 20));
}

#[test]
fn test_join_three_handles_different_types() {
    let (a, b, c) = join!(
        run_task(|| "hello"),
        run_task(|| 42),
        run_task(|| vec![1, 2, 3])
    );

    assert_eq!(a, "hello");
    assert_eq!(b, 42);
    assert_eq!(c, vec![1, 2, 3]);
}

#[test]
fn test_join_with_trailing_comma() {
    let (a, b) = join!(run_task(|| 1), run_task(|| 2),);

    assert_eq!(a + b, 3);
}

#[test]
fn test_join_accepts_bound_handles() {
    let first: JoinHandle<u8> = run_task(|| 1);
    let second = run_task(|| String::from("test"));

    let (num, text) = join!(first, second);

    assert_eq!(num, 1);
    assert_eq!(text, "test");
}

#[test]
fn test_join_spawns_every_task_before_waiting() {
    let pool = PoolBuilder::new().worker_threads(2).build().unwrap();
    let started = Arc::new(AtomicUsize::new(0));

    let spawn_waiting = |started: Arc<AtomicUsize>| {
        pool.spawn(move || {
            started.fetch_add(1, Ordering::SeqCst);
            while started.load(Ordering::SeqCst) < 2 {
                thread::sleep(Duration::from_millis(1));
            }
        })
    };

    // Each task only finishes once both have started, so waiting on the
    // first before spawning the second would hang.
    join!(spawn_waiting(started.clone()), spawn_waiting(started.clone()));

    assert_eq!(started.load(Ordering::SeqCst), 2);
}

#[test]
fn test_join_on_dedicated_pool() {
    let pool = PoolBuilder::new().worker_threads(2).build().unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));

    let o1 = order.clone();
    let o2 = order.clone();

    let (a, b) = join!(
        pool.spawn(move || {
            o1.lock().unwrap().push(1);
            1
        }),
        pool.spawn(move || {
            o2.lock().unwrap().push(2);
            2
        })
    );

    assert_eq!((a, b), (1, 2));

    let recorded = order.lock().unwrap();
    assert_eq!(recorded.len(), 2);
    assert!(recorded.contains(&1));
    assert!(recorded.contains(&2));
}

#[test]
fn test_join_with_result_values() {
    let (ok, err) = join!(
        run_task(|| Ok::<i32, &str>(100)),
        run_task(|| Err::<i32, &str>("error"))
    );

    assert_eq!(ok, Ok(100));
    assert_eq!(err, Err("error"));
}
