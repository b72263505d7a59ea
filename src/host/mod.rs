//! Boundary to the embedding host environment.
//!
//! The core never touches a host's global error slot directly. Everything
//! it needs from the host goes through [`HostEnv`]: an error channel with
//! set/take/restore, the targets each classification reports to, fallible
//! textual conversion of host values, and warning emission.

pub mod guard;
pub mod local;
pub mod targets;

pub use guard::HostErrorGuard;
pub use local::{EmittedWarning, ExceptionValue, HostClass, LocalHost, WarningFilter};
pub use targets::{RegistryError, TargetTable};

use crate::error::{ErrorKind, WarningKind};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Reference-counted handle to a value owned by the host.
///
/// Identity is pointer identity: two handles are the same host object
/// only if they share an allocation.
#[derive(Clone)]
pub struct HostObject(Arc<dyn Any + Send + Sync>);

impl HostObject {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        HostObject(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    pub fn ptr_eq(&self, other: &HostObject) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_ptr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for HostObject {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for HostObject {}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.downcast_ref::<HostClass>() {
            Some(class) => write!(f, "HostObject(<class '{}'>)", class.name()),
            None => write!(f, "HostObject({:p})", self.as_ptr()),
        }
    }
}

/// A pending host error: the (type, value, traceback) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostErrorState {
    pub ty: HostObject,
    pub value: Option<HostObject>,
    pub traceback: Option<HostObject>,
}

impl HostErrorState {
    pub fn new(ty: HostObject, value: Option<HostObject>, traceback: Option<HostObject>) -> Self {
        Self {
            ty,
            value,
            traceback,
        }
    }
}

/// Outcome of emitting a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarnStatus {
    Emitted,
    /// The host turned the warning into an error, which is now pending in
    /// its error channel.
    Escalated,
}

/// Failure of a host call that the core must recover from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostCallError {
    #[error("message contains an interior nul byte at position {0}")]
    InteriorNul(usize),

    #[error("host rejected the call: {0}")]
    Rejected(String),
}

/// Capabilities the core requires from the embedding host.
pub trait HostEnv: Send + Sync {
    /// Set the pending error to `target` with `message`.
    fn set_error(&self, target: &HostObject, message: &str) -> Result<(), HostCallError>;

    /// Atomically remove and return the pending error, if any.
    fn take_error(&self) -> Option<HostErrorState>;

    /// Make a previously taken triple pending again.
    fn restore_error(&self, state: HostErrorState);

    fn error_occurred(&self) -> bool;

    fn error_target(&self, kind: ErrorKind) -> HostObject;

    fn warning_target(&self, kind: WarningKind) -> HostObject;

    /// `repr`-style text of an arbitrary host value. On failure the host
    /// may leave a secondary error pending.
    fn repr(&self, value: &HostObject) -> Option<String>;

    /// Decoded text of a native host string.
    fn to_str(&self, value: &HostObject) -> Option<String>;

    fn warn(&self, category: &HostObject, message: &str) -> WarnStatus;

    /// Whether `ty` is the host's interruption (keyboard interrupt) class.
    fn is_interrupt(&self, ty: &HostObject) -> bool;

    fn is_assertion(&self, ty: &HostObject) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_object_identity() {
        let a = HostObject::new(5_i64);
        let b = a.clone();
        let c = HostObject::new(5_i64);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.downcast_ref::<i64>(), Some(&5));
        assert!(a.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_host_call_error_display() {
        let err = HostCallError::InteriorNul(3);
        assert_eq!(
            err.to_string(),
            "message contains an interior nul byte at position 3"
        );
    }
}
