use crate::config::MAX_THREADS;
use crate::error::{index_error, Result};
use crate::executor::{Job, Task, TaskRef, WorkerId};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

type BoxedTask<'t> = Box<dyn Task + Send + Sync + 't>;

struct Share<'t> {
    tasks: Vec<BoxedTask<'t>>,
    cursor: AtomicUsize,
}

impl Share<'_> {
    fn new() -> Self {
        Self {
            tasks: Vec::new(),
            cursor: AtomicUsize::new(0),
        }
    }
}

/// Job whose tasks are assigned to workers up front.
///
/// Worker `i` receives exactly the tasks pushed for `i`, in push order.
/// Tasks are handed out by reference and stay owned by the job.
pub struct PartitionedJob<'t> {
    shares: Vec<Share<'t>>,
    aborted: AtomicBool,
}

impl<'t> PartitionedJob<'t> {
    pub fn new(num_workers: usize) -> Self {
        let shares = (0..num_workers.min(MAX_THREADS)).map(|_| Share::new()).collect();
        Self {
            shares,
            aborted: AtomicBool::new(false),
        }
    }

    /// Queue `task` for `worker`. Workers beyond the size given to `new`
    /// get a share on demand, up to [`MAX_THREADS`]; no team can have a
    /// worker past that, so such a push is an index error.
    pub fn push<T>(&mut self, worker: WorkerId, task: T) -> Result<()>
    where
        T: Task + Send + Sync + 't,
    {
        if worker >= MAX_THREADS {
            return Err(index_error()
                .with("worker ")
                .with(worker)
                .with(" is out of range (max ")
                .with(MAX_THREADS)
                .with(")"));
        }
        if self.shares.len() <= worker {
            self.shares.resize_with(worker + 1, Share::new);
        }
        self.shares[worker].tasks.push(Box::new(task));
        Ok(())
    }

    pub fn num_workers(&self) -> usize {
        self.shares.len()
    }

    /// Tasks not yet handed out to `worker`.
    pub fn remaining(&self, worker: WorkerId) -> usize {
        self.shares.get(worker).map_or(0, |share| {
            let handed = share.cursor.load(Ordering::Acquire);
            share.tasks.len().saturating_sub(handed)
        })
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }
}

impl Job for PartitionedJob<'_> {
    fn get_next_task(&self, worker: WorkerId) -> Option<TaskRef<'_>> {
        if self.is_aborted() {
            return None;
        }
        let share = self.shares.get(worker)?;
        let index = share.cursor.load(Ordering::Acquire);
        let task = share.tasks.get(index)?;
        share.cursor.store(index + 1, Ordering::Release);
        Some(TaskRef::Borrowed(task.as_ref()))
    }

    fn abort_execution(&self) {
        if !self.aborted.swap(true, Ordering::AcqRel) {
            tracing::debug!("partitioned job aborted");
        }
    }
}

impl fmt::Debug for PartitionedJob<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes: Vec<usize> = self.shares.iter().map(|s| s.tasks.len()).collect();
        f.debug_struct("PartitionedJob")
            .field("shares", &sizes)
            .field("aborted", &self.is_aborted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{value_error, ErrorKind};
    use crate::executor::{execute_in_current_thread, WorkerContext};
    use parking_lot::Mutex;

    #[test]
    fn test_hands_out_share_in_order() {
        let log = Mutex::new(Vec::new());
        let mut job = PartitionedJob::new(2);
        for i in 0..3 {
            let log = &log;
            job.push(0, move |_: &WorkerContext| -> Result<()> {
                log.lock().push(i);
                Ok(())
            })
            .unwrap();
        }

        execute_in_current_thread(&job).unwrap();

        assert_eq!(*log.lock(), vec![0, 1, 2]);
        assert_eq!(job.remaining(0), 0);
        assert!(job.get_next_task(1).is_none());
    }

    #[test]
    fn test_failure_leaves_rest_unexecuted() {
        let runs = AtomicUsize::new(0);
        let mut job = PartitionedJob::new(1);
        for i in 0..6 {
            let runs = &runs;
            job.push(0, move |_: &WorkerContext| -> Result<()> {
                runs.fetch_add(1, Ordering::SeqCst);
                if i == 2 {
                    Err(value_error().with("bad row"))
                } else {
                    Ok(())
                }
            })
            .unwrap();
        }

        assert!(execute_in_current_thread(&job).is_err());
        assert_eq!(runs.load(Ordering::SeqCst), 3);
        assert_eq!(job.remaining(0), 3);
    }

    #[test]
    fn test_abort_is_idempotent_and_stops_work() {
        let mut job = PartitionedJob::new(1);
        job.push(0, |_: &WorkerContext| -> Result<()> { Ok(()) })
            .unwrap();

        job.abort_execution();
        job.abort_execution();

        assert!(job.is_aborted());
        assert!(job.get_next_task(0).is_none());
    }

    #[test]
    fn test_unknown_worker_gets_nothing() {
        let job = PartitionedJob::new(1);
        assert!(job.get_next_task(5).is_none());
        assert_eq!(job.remaining(5), 0);
    }

    #[test]
    fn test_push_grows_shares_on_demand() {
        let mut job = PartitionedJob::new(1);
        job.push(3, |_: &WorkerContext| -> Result<()> { Ok(()) })
            .unwrap();

        assert_eq!(job.num_workers(), 4);
        assert_eq!(job.remaining(3), 1);
        assert_eq!(job.remaining(2), 0);
    }

    #[test]
    fn test_push_rejects_worker_past_team_limit() {
        let mut job = PartitionedJob::new(1);
        let err = job
            .push(usize::MAX, |_: &WorkerContext| -> Result<()> { Ok(()) })
            .unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::Index));
        assert!(err.describe().ends_with("is out of range (max 1024)"));
        assert_eq!(job.num_workers(), 1);
        assert!(job
            .push(MAX_THREADS, |_: &WorkerContext| -> Result<()> { Ok(()) })
            .is_err());
    }
}
