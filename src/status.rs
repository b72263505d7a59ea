//! Process-wide progress status.
//!
//! The core only ever moves the status to [`Status::Cancelled`] (when an
//! interruption is captured from the host) and reads it. Resetting between
//! phases is the job of whatever reports progress to the user.

use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Running = 0,
    Finished = 1,
    Error = 2,
    Cancelled = 3,
}

impl Status {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Status::Finished,
            2 => Status::Error,
            3 => Status::Cancelled,
            _ => Status::Running,
        }
    }
}

static STATUS: AtomicU8 = AtomicU8::new(Status::Running as u8);

// unit tests that move the status hold this
#[cfg(test)]
static SERIAL: parking_lot::Mutex<()> = parking_lot::const_mutex(());

#[cfg(test)]
pub(crate) fn serial() -> parking_lot::MutexGuard<'static, ()> {
    SERIAL.lock()
}

pub fn status() -> Status {
    Status::from_u8(STATUS.load(Ordering::Acquire))
}

pub fn set_status(status: Status) {
    STATUS.store(status as u8, Ordering::Release);
}

pub fn set_status_cancelled() {
    set_status(Status::Cancelled);
}

pub fn is_cancelled() -> bool {
    status() == Status::Cancelled
}

pub fn reset_status() {
    set_status(Status::Running);
}
