//! Stress tests for worker teams

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use weft::prelude::*;

fn team(n: usize) -> Team {
    Team::new(Config::builder().num_threads(n).build().unwrap()).unwrap()
}

#[test]
#[ignore] // Run with --ignored flag
fn stress_test_many_small_jobs() {
    let team = team(8);
    for round in 0..500 {
        let sum = AtomicUsize::new(0);
        parallel_for(&team, 1000, 16, |_, i| {
            sum.fetch_add(i, Ordering::Relaxed);
            Ok(())
        })
        .unwrap();
        assert_eq!(sum.load(Ordering::Relaxed), 499_500, "round {}", round);
    }
}

#[test]
#[ignore]
fn stress_test_concurrent_failures() {
    let team = team(16);
    for _ in 0..200 {
        let reported = AtomicUsize::new(0);
        let err = parallel_for(&team, 10_000, 1, |_, i| {
            reported.fetch_add(1, Ordering::Relaxed);
            Err(overflow_error().with("row ").with(i))
        })
        .unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::Overflow));
        // every worker fails on its first index, then the job is aborted
        assert!(reported.load(Ordering::Relaxed) <= 16);
    }
}

#[test]
#[ignore]
fn stress_test_queue_growth() {
    let team = team(8);
    let log = Mutex::new(0usize);
    let job = QueueJob::new();
    for _ in 0..10_000 {
        let log = &log;
        job.push(move |_: &WorkerContext| -> Result<()> {
            *log.lock() += 1;
            Ok(())
        });
    }

    team.run(&job).unwrap();

    assert_eq!(*log.lock(), 10_000);
    assert!(job.is_empty());
}

#[test]
#[ignore]
fn stress_test_host_round_trips() {
    let host = LocalHost::initialized();
    for i in 0..10_000 {
        host.raise("KeyError", "k");
        let mut err = Error::capture(&host);
        {
            let _guard = HostErrorGuard::new(&host);
            value_error().with(i).report(&host);
        }
        assert!(!host.error_occurred());
        err.report(&host);
        assert!(host.error_occurred());
        host.take_error();
    }
}
