use super::failure::FirstFailure;
use super::job::Job;
use super::panic_handler::PanicHandler;
use super::task::WorkerId;
use super::worker::{execute_in_current_thread, replace_thread_index, set_thread_index};
use crate::config::Config;
use crate::error::{runtime_error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

// number of threads currently inside Team::run, across all teams
static THREADS_IN_TEAM: AtomicUsize = AtomicUsize::new(0);

/// Number of worker threads currently executing a job.
pub fn num_threads_in_team() -> usize {
    THREADS_IN_TEAM.load(Ordering::Acquire)
}

// unit tests that run a team hold this, so the global count is theirs alone
#[cfg(test)]
static SERIAL: parking_lot::Mutex<()> = parking_lot::const_mutex(());

#[cfg(test)]
pub(crate) fn serial() -> parking_lot::MutexGuard<'static, ()> {
    SERIAL.lock()
}

struct TeamSize(usize);

impl TeamSize {
    fn enter(n: usize) -> Self {
        THREADS_IN_TEAM.fetch_add(n, Ordering::AcqRel);
        TeamSize(n)
    }
}

impl Drop for TeamSize {
    fn drop(&mut self) {
        THREADS_IN_TEAM.fetch_sub(self.0, Ordering::AcqRel);
    }
}

#[cfg(target_os = "linux")]
fn pin_thread_to_core(core_id: usize) {
    let ncores = num_cpus::get();
    // SAFETY: cpu_set_t is plain data; zeroed is a valid empty set and
    // sched_setaffinity only reads it.
    let result = unsafe {
        let mut cpuset: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_SET(core_id % ncores, &mut cpuset);
        libc::sched_setaffinity(
            0, // current thread
            std::mem::size_of::<libc::cpu_set_t>(),
            &cpuset,
        )
    };
    if result != 0 {
        tracing::warn!(
            thread = thread::current().name().unwrap_or("unknown"),
            core = core_id % ncores,
            "failed to pin worker thread"
        );
    }
}

/// Runs a [`Job`] on a fixed number of identified threads.
///
/// The thread calling [`run`](Team::run) takes part as worker 0; the rest
/// are scoped threads that live only for the duration of the call. The
/// first failure from any worker aborts the job and is returned once every
/// worker has stopped; failures that arrive later are discarded.
#[derive(Debug)]
pub struct Team {
    config: Config,
    panic_handler: PanicHandler,
}

impl Team {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let panic_handler = PanicHandler::new(config.panic_strategy);
        Ok(Self {
            config,
            panic_handler,
        })
    }

    pub fn num_threads(&self) -> usize {
        self.config.worker_threads()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn panic_count(&self) -> usize {
        self.panic_handler.panic_count()
    }

    pub fn run(&self, job: &dyn Job) -> Result<()> {
        let num_threads = self.num_threads();
        let failure = FirstFailure::new();
        let _team = TeamSize::enter(num_threads);

        let work = |id: WorkerId| {
            let result = self
                .panic_handler
                .execute(|| execute_in_current_thread(job));
            if let Err(err) = result {
                if failure.offer(err) {
                    tracing::debug!(worker = id, "worker failed, aborting job");
                    job.abort_execution();
                }
            }
        };
        let work = &work;

        thread::scope(|s| {
            for id in 1..num_threads {
                let name = format!("{}-{}", self.config.thread_name_prefix, id);
                let mut builder = thread::Builder::new().name(name);
                if let Some(stack_size) = self.config.stack_size {
                    builder = builder.stack_size(stack_size);
                }

                let pin_workers = self.config.pin_workers;
                let spawned = builder.spawn_scoped(s, move || {
                    #[cfg(target_os = "linux")]
                    if pin_workers {
                        pin_thread_to_core(id);
                    }
                    #[cfg(not(target_os = "linux"))]
                    let _ = pin_workers;

                    set_thread_index(id);
                    work(id);
                });

                if let Err(e) = spawned {
                    let err = runtime_error()
                        .with("failed to spawn worker ")
                        .with(id)
                        .with(": ")
                        .with(e.to_string());
                    if failure.offer(err) {
                        job.abort_execution();
                    }
                    break;
                }
            }

            let previous = replace_thread_index(Some(0));
            work(0);
            replace_thread_index(previous);
        });

        match failure.into_inner() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
