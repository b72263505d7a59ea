use super::task::{TaskRef, WorkerId};

/// A source of tasks for one parallel phase, partitioned by worker.
///
/// How work is split between workers is entirely up to the implementation.
/// `get_next_task` is called concurrently from distinct worker identities,
/// and repeatedly from the same identity; a task returned to worker `i` only
/// has to stay valid until worker `i` asks again.
pub trait Job: Sync {
    /// Next task for `worker`, or `None` once its share is exhausted.
    fn get_next_task(&self, worker: WorkerId) -> Option<TaskRef<'_>>;

    /// Stop handing out work because its results are no longer needed.
    ///
    /// Called from a worker thread when a sibling has failed. Must not
    /// block, must tolerate being called more than once, before any task
    /// was requested, or after all were handed out. The default does
    /// nothing, so every scheduled task still runs.
    fn abort_execution(&self) {}
}
