use crate::error::Result;
use crate::executor::{Job, Task, TaskRef, Team, WorkerContext, WorkerId};
use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Job over the index range `[0, n)`, split into fixed-size chunks that
/// workers claim one at a time.
pub struct ChunkedJob<F> {
    n: usize,
    chunk: usize,
    cursor: AtomicUsize,
    aborted: AtomicBool,
    f: F,
}

struct ChunkTask<'a, F> {
    range: Range<usize>,
    f: &'a F,
}

impl<F> Task for ChunkTask<'_, F>
where
    F: Fn(&WorkerContext, usize) -> Result<()>,
{
    fn execute(&self, ctx: &WorkerContext) -> Result<()> {
        for i in self.range.clone() {
            (self.f)(ctx, i)?;
        }
        Ok(())
    }
}

impl<F> ChunkedJob<F>
where
    F: Fn(&WorkerContext, usize) -> Result<()> + Sync,
{
    /// A `chunk` of 0 is treated as 1.
    pub fn new(n: usize, chunk: usize, f: F) -> Self {
        Self {
            n,
            chunk: chunk.max(1),
            cursor: AtomicUsize::new(0),
            aborted: AtomicBool::new(false),
            f,
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    // the cursor never moves past `n`
    fn claim(&self) -> Option<Range<usize>> {
        let mut start = self.cursor.load(Ordering::Acquire);
        loop {
            if start >= self.n {
                return None;
            }
            let end = start.saturating_add(self.chunk).min(self.n);
            match self
                .cursor
                .compare_exchange_weak(start, end, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Some(start..end),
                Err(current) => start = current,
            }
        }
    }
}

impl<F> Job for ChunkedJob<F>
where
    F: Fn(&WorkerContext, usize) -> Result<()> + Sync,
{
    fn get_next_task(&self, _worker: WorkerId) -> Option<TaskRef<'_>> {
        if self.is_aborted() {
            return None;
        }
        let range = self.claim()?;
        Some(TaskRef::owned(ChunkTask { range, f: &self.f }))
    }

    fn abort_execution(&self) {
        if !self.aborted.swap(true, Ordering::AcqRel) {
            tracing::debug!(n = self.n, "chunked job aborted");
        }
    }
}

impl<F> fmt::Debug for ChunkedJob<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkedJob")
            .field("n", &self.n)
            .field("chunk", &self.chunk)
            .field("aborted", &self.aborted.load(Ordering::Relaxed))
            .finish()
    }
}

/// Call `f(ctx, i)` for every `i` in `[0, n)` on `team`'s workers.
///
/// Returns the first failure; indices in chunks not yet claimed when it
/// happened are skipped.
pub fn parallel_for<F>(team: &Team, n: usize, chunk: usize, f: F) -> Result<()>
where
    F: Fn(&WorkerContext, usize) -> Result<()> + Sync,
{
    if n == 0 {
        return Ok(());
    }
    let job = ChunkedJob::new(n, chunk, f);
    team.run(&job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::{index_error, ErrorKind};
    use crate::executor::execute_in_current_thread;
    use parking_lot::Mutex;

    fn team(n: usize) -> Team {
        Team::new(Config::builder().num_threads(n).build().unwrap()).unwrap()
    }

    #[test]
    fn test_visits_every_index_once() {
        let _serial = crate::executor::team::serial();
        let hits: Vec<AtomicUsize> = (0..1000).map(|_| AtomicUsize::new(0)).collect();

        parallel_for(&team(4), hits.len(), 7, |_, i| {
            hits[i].fetch_add(1, Ordering::Relaxed);
            Ok(())
        })
        .unwrap();

        assert!(hits.iter().all(|h| h.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn test_last_chunk_is_short() {
        let ranges = Mutex::new(Vec::new());
        let job = ChunkedJob::new(10, 4, |_: &WorkerContext, _| Ok(()));
        while let Some(range) = job.claim() {
            ranges.lock().push(range);
        }
        assert_eq!(*ranges.lock(), vec![0..4, 4..8, 8..10]);
    }

    #[test]
    fn test_huge_chunk_claims_range_once() {
        let job = ChunkedJob::new(10, usize::MAX / 2 + 1, |_: &WorkerContext, _| Ok(()));
        assert_eq!(job.claim(), Some(0..10));
        assert_eq!(job.claim(), None);
        assert_eq!(job.claim(), None);
        assert_eq!(job.claim(), None);
    }

    #[test]
    fn test_huge_chunk_visits_every_index_once() {
        let _serial = crate::executor::team::serial();
        let hits: Vec<AtomicUsize> = (0..10).map(|_| AtomicUsize::new(0)).collect();

        parallel_for(&team(3), hits.len(), usize::MAX / 2 + 1, |_, i| {
            hits[i].fetch_add(1, Ordering::Relaxed);
            Ok(())
        })
        .unwrap();

        let counts: Vec<usize> = hits.iter().map(|h| h.load(Ordering::Relaxed)).collect();
        assert_eq!(counts, vec![1; 10]);
    }

    #[test]
    fn test_zero_chunk_means_one() {
        let job = ChunkedJob::new(3, 0, |_: &WorkerContext, _| Ok(()));
        assert_eq!(job.chunk_size(), 1);
    }

    #[test]
    fn test_empty_range_runs_nothing() {
        let runs = AtomicUsize::new(0);
        parallel_for(&team(2), 0, 16, |_, _| {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failure_stops_chunk_and_job() {
        let runs = AtomicUsize::new(0);
        let job = ChunkedJob::new(100, 10, |_: &WorkerContext, i| {
            runs.fetch_add(1, Ordering::SeqCst);
            if i == 3 {
                return Err(index_error().with("row ").with(i).with(" out of bounds"));
            }
            Ok(())
        });

        let err = execute_in_current_thread(&job).unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::Index));
        assert_eq!(err.describe(), "row 3 out of bounds");
        assert_eq!(runs.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_team_failure_aborts() {
        let _serial = crate::executor::team::serial();
        let err = parallel_for(&team(3), 10_000, 1, |_, i| {
            if i % 100 == 42 {
                Err(index_error().with(i))
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Index));
    }
}
