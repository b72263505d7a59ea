use crate::executor::{Job, Task, TaskRef, WorkerId};
use crossbeam_deque::{Injector, Steal};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Job backed by one shared queue that every worker pops from.
///
/// Tasks can be pushed while the job is running, including from inside a
/// task, which lets a phase discover its work as it goes.
pub struct QueueJob<'t> {
    queue: Injector<Box<dyn Task + Send + 't>>,
    aborted: AtomicBool,
}

impl<'t> QueueJob<'t> {
    pub fn new() -> Self {
        Self {
            queue: Injector::new(),
            aborted: AtomicBool::new(false),
        }
    }

    pub fn push<T>(&self, task: T)
    where
        T: Task + Send + 't,
    {
        self.queue.push(Box::new(task));
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }
}

impl Default for QueueJob<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Job for QueueJob<'_> {
    fn get_next_task(&self, _worker: WorkerId) -> Option<TaskRef<'_>> {
        loop {
            if self.is_aborted() {
                return None;
            }
            match self.queue.steal() {
                Steal::Success(task) => return Some(TaskRef::Owned(task)),
                Steal::Empty => return None,
                Steal::Retry => continue,
            }
        }
    }

    // queued tasks are left in place and dropped with the job
    fn abort_execution(&self) {
        if !self.aborted.swap(true, Ordering::AcqRel) {
            tracing::debug!(pending = self.queue.len(), "queue job aborted");
        }
    }
}

impl fmt::Debug for QueueJob<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueJob")
            .field("len", &self.len())
            .field("aborted", &self.is_aborted())
            .finish()
    }
}
