// worker thread identity + the per-thread task loop
use super::job::Job;
use super::task::{WorkerContext, WorkerId};
use crate::error::Result;
use std::cell::Cell;

thread_local! {
    static THREAD_INDEX: Cell<Option<WorkerId>> = const { Cell::new(None) };
}

/// Identity of the calling worker. Threads that were never given one
/// (the thread that drives a team) are worker 0.
pub fn this_thread_index() -> WorkerId {
    THREAD_INDEX.with(|idx| idx.get()).unwrap_or(0)
}

pub fn set_thread_index(id: WorkerId) {
    THREAD_INDEX.with(|idx| idx.set(Some(id)));
}

pub(crate) fn replace_thread_index(id: Option<WorkerId>) -> Option<WorkerId> {
    THREAD_INDEX.with(|idx| idx.replace(id))
}

/// Run `job`'s share for the calling worker until it runs dry.
///
/// Nothing is caught here: the first failing task ends the loop and its
/// error goes straight to the caller, leaving the rest of this worker's
/// share unexecuted. Deciding whether to abort the job and which failure
/// to keep is the caller's business.
pub fn execute_in_current_thread<J: Job + ?Sized>(job: &J) -> Result<()> {
    let ith = this_thread_index();
    let ctx = WorkerContext::new(ith);
    let mut executed = 0usize;

    tracing::trace!(worker = ith, "worker loop started");
    while let Some(task) = job.get_next_task(ith) {
        task.execute(&ctx)?;
        executed += 1;
    }
    tracing::trace!(worker = ith, executed, "worker loop finished");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{runtime_error, value_error};
    use crate::executor::task::{Task, TaskRef};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // N counting tasks per worker; task `fail_at` (if any) fails.
    struct CountingJob {
        per_worker: usize,
        fail_at: Option<usize>,
        handed: Mutex<Vec<usize>>,
        runs: AtomicUsize,
    }

    struct Step<'a> {
        job: &'a CountingJob,
        index: usize,
    }

    impl Task for Step<'_> {
        fn execute(&self, _ctx: &WorkerContext) -> Result<()> {
            self.job.runs.fetch_add(1, Ordering::SeqCst);
            if self.job.fail_at == Some(self.index) {
                return Err(value_error().with("task ").with(self.index).with(" failed"));
            }
            Ok(())
        }
    }

    impl CountingJob {
        fn new(per_worker: usize, fail_at: Option<usize>) -> Self {
            Self {
                per_worker,
                fail_at,
                handed: Mutex::new(vec![0; 8]),
                runs: AtomicUsize::new(0),
            }
        }
    }

    impl Job for CountingJob {
        fn get_next_task(&self, worker: WorkerId) -> Option<TaskRef<'_>> {
            let mut handed = self.handed.lock();
            let index = handed[worker];
            if index == self.per_worker {
                return None;
            }
            handed[worker] += 1;
            Some(TaskRef::owned(Step { job: self, index }))
        }
    }

    struct EmptyJob;

    impl Job for EmptyJob {
        fn get_next_task(&self, _worker: WorkerId) -> Option<TaskRef<'_>> {
            None
        }
    }

    #[test]
    fn test_runs_all_tasks() {
        let job = CountingJob::new(5, None);
        execute_in_current_thread(&job).unwrap();
        assert_eq!(job.runs.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_stops_after_first_failure() {
        let job = CountingJob::new(10, Some(3));
        let err = execute_in_current_thread(&job).unwrap_err();

        assert_eq!(err.describe(), "task 3 failed");
        assert_eq!(job.runs.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_empty_job_returns_immediately() {
        for id in [0, 1, 7] {
            set_thread_index(id);
            assert!(execute_in_current_thread(&EmptyJob).is_ok());
        }
        replace_thread_index(None);
    }

    #[test]
    fn test_uses_thread_identity() {
        let job = CountingJob::new(2, None);
        let seen = Mutex::new(Vec::new());

        std::thread::scope(|s| {
            s.spawn(|| {
                set_thread_index(4);
                execute_in_current_thread(&job).unwrap();
                seen.lock().push(this_thread_index());
            });
        });

        assert_eq!(*seen.lock(), vec![4]);
        assert_eq!(job.handed.lock()[4], 2);
        assert_eq!(job.handed.lock()[0], 0);
    }

    #[test]
    fn test_unassigned_thread_is_worker_zero() {
        std::thread::spawn(|| assert_eq!(this_thread_index(), 0))
            .join()
            .unwrap();
    }

    #[test]
    fn test_error_is_not_reclassified() {
        struct Failing;
        impl Job for Failing {
            fn get_next_task(&self, _worker: WorkerId) -> Option<TaskRef<'_>> {
                Some(TaskRef::owned(|_: &WorkerContext| -> Result<()> {
                    Err(runtime_error().with("disk full"))
                }))
            }
        }

        let err = execute_in_current_thread(&Failing).unwrap_err();
        assert_eq!(err.kind(), Some(crate::error::ErrorKind::Runtime));
    }
}
