use crate::error::Error;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Exchange that keeps only the first failure offered to it.
///
/// Workers of one team offer their error here as they stop. The first
/// offer wins and is told so (it is then responsible for aborting the job);
/// every later offer is dropped.
#[derive(Debug, Default)]
pub struct FirstFailure {
    tripped: AtomicBool,
    slot: Mutex<Option<Error>>,
}

impl FirstFailure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `err`; returns true if it became the reported failure.
    pub fn offer(&self, err: Error) -> bool {
        if self.tripped.swap(true, Ordering::AcqRel) {
            tracing::debug!(error = %err, "suppressed secondary failure");
            return false;
        }
        *self.slot.lock() = Some(err);
        true
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }

    pub fn take(&self) -> Option<Error> {
        self.slot.lock().take()
    }

    pub fn into_inner(self) -> Option<Error> {
        self.slot.into_inner()
    }
}
