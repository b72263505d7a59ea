//! Task representation.

use crate::error::Result;
use crate::status;
use std::fmt;
use std::ops::Deref;

/// Stable identity of a worker thread within a team.
pub type WorkerId = usize;

/// What a task knows about the worker running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerContext {
    worker: WorkerId,
}

impl WorkerContext {
    pub fn new(worker: WorkerId) -> Self {
        Self { worker }
    }

    pub fn worker_id(&self) -> WorkerId {
        self.worker
    }

    /// Whether the user asked to cancel the running operation.
    pub fn is_cancelled(&self) -> bool {
        status::is_cancelled()
    }
}

/// One unit of work.
///
/// A task may fail with a classified [`Error`](crate::Error); the worker
/// loop stops at the first failure and hands it up unchanged.
pub trait Task {
    fn execute(&self, ctx: &WorkerContext) -> Result<()>;
}

impl<F> Task for F
where
    F: Fn(&WorkerContext) -> Result<()>,
{
    fn execute(&self, ctx: &WorkerContext) -> Result<()> {
        self(ctx)
    }
}

/// A task handed out by a [`Job`](super::Job).
///
/// Either borrowed from the job's own storage or produced on demand. The
/// worker drops it before asking the job for the next one.
pub enum TaskRef<'a> {
    Borrowed(&'a (dyn Task + 'a)),
    Owned(Box<dyn Task + 'a>),
}

impl<'a> TaskRef<'a> {
    pub fn owned<T: Task + 'a>(task: T) -> Self {
        TaskRef::Owned(Box::new(task))
    }
}

impl<'a> Deref for TaskRef<'a> {
    type Target = dyn Task + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            TaskRef::Borrowed(task) => *task,
            TaskRef::Owned(task) => task.as_ref(),
        }
    }
}

impl fmt::Debug for TaskRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskRef::Borrowed(_) => f.write_str("TaskRef::Borrowed"),
            TaskRef::Owned(_) => f.write_str("TaskRef::Owned"),
        }
    }
}
