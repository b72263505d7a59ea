use crate::error::translate::panic_message;
use crate::error::{runtime_error, Error, Result};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

/// What a team does when a worker panics instead of returning an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanicStrategy {
    Abort,
    /// Turn the panic into an `Error` and treat it as the worker's failure.
    #[default]
    Capture,
}

#[derive(Debug)]
pub struct PanicHandler {
    strategy: PanicStrategy,
    panic_count: AtomicUsize,
}

impl PanicHandler {
    pub fn new(strategy: PanicStrategy) -> Self {
        Self {
            strategy,
            panic_count: AtomicUsize::new(0),
        }
    }

    pub fn execute<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce() -> Result<R>,
    {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(result) => result,
            Err(payload) => {
                self.panic_count.fetch_add(1, Ordering::Relaxed);

                match self.strategy {
                    PanicStrategy::Abort => {
                        tracing::error!(
                            payload = panic_message(&*payload).unwrap_or("<non-string payload>"),
                            "worker panicked (abort strategy)"
                        );
                        std::process::abort();
                    }
                    PanicStrategy::Capture => Err(error_from_panic(payload)),
                }
            }
        }
    }

    pub fn panic_count(&self) -> usize {
        self.panic_count.load(Ordering::Relaxed)
    }

    pub fn strategy(&self) -> PanicStrategy {
        self.strategy
    }
}

impl Default for PanicHandler {
    fn default() -> Self {
        Self::new(PanicStrategy::default())
    }
}

/// An `Error` payload (from `panic_any`) is kept as is; string payloads
/// become runtime errors.
pub fn error_from_panic(payload: Box<dyn Any + Send>) -> Error {
    match payload.downcast::<Error>() {
        Ok(err) => *err,
        Err(payload) => {
            let msg = panic_message(&*payload).unwrap_or("unknown error");
            runtime_error().with("worker panicked: ").with(msg)
        }
    }
}
