//! Classified, host-reportable failures.
//!
//! An [`Error`] is created where something goes wrong (usually deep inside
//! a task on a worker thread), given a message through ordered appends, and
//! moved up the stack inside a [`Result`]. Its life ends either by being
//! [`report`](Error::report)ed into the host's error channel, once, or by
//! being dropped.
//!
//! ```
//! use weft::error::{value_error, ErrorKind};
//! use weft::types::SType;
//!
//! let err = value_error()
//!     .with("column `")
//!     .with("price")
//!     .with("` has type ")
//!     .with(SType::Float64);
//!
//! assert_eq!(err.kind(), Some(ErrorKind::Value));
//! assert_eq!(err.describe(), "column `price` has type float64");
//! ```

mod builder;
pub mod format;
pub mod kind;
pub mod translate;
pub mod warning;

pub use format::{escape_backticks, escape_char, Errno, Message, Operand};
pub use kind::{ErrorKind, WarningKind};
pub use translate::{translate_panic, translate_to_host};
pub use warning::{deprecation_warning, engine_warning, io_warning, Warning};

use crate::host::{HostCallError, HostEnv, HostErrorState};
use crate::status;
use builder::impl_message_builder;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
enum Origin {
    Engine(ErrorKind),
    Host(Captured),
}

#[derive(Debug)]
struct Captured {
    state: Option<HostErrorState>,
    interrupt: bool,
    assertion: bool,
}

#[derive(Debug)]
pub struct Error {
    origin: Origin,
    message: Message,
}

impl_message_builder!(Error);

impl Error {
    /// Fresh error of classification `kind` with an empty message.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            origin: Origin::Engine(kind),
            message: Message::new(),
        }
    }

    /// Take ownership of whatever error is pending in `host`.
    ///
    /// The host channel is empty afterwards. Capturing an interruption
    /// moves the process status to cancelled.
    pub fn capture(host: &dyn HostEnv) -> Self {
        let state = host.take_error();
        let (interrupt, assertion) = match &state {
            Some(s) => (host.is_interrupt(&s.ty), host.is_assertion(&s.ty)),
            None => (false, false),
        };

        if interrupt {
            tracing::debug!("captured host interruption, marking status cancelled");
            status::set_status_cancelled();
        }

        Self {
            origin: Origin::Host(Captured {
                state,
                interrupt,
                assertion,
            }),
            message: Message::new(),
        }
    }

    /// Classification, or `None` for errors captured from the host.
    pub fn kind(&self) -> Option<ErrorKind> {
        match &self.origin {
            Origin::Engine(kind) => Some(*kind),
            Origin::Host(_) => None,
        }
    }

    pub fn is_captured(&self) -> bool {
        matches!(self.origin, Origin::Host(_))
    }

    /// The captured host triple, until it has been reported.
    pub fn captured_state(&self) -> Option<&HostErrorState> {
        match &self.origin {
            Origin::Host(c) => c.state.as_ref(),
            Origin::Engine(_) => None,
        }
    }

    pub fn is_keyboard_interrupt(&self) -> bool {
        matches!(&self.origin, Origin::Host(c) if c.interrupt)
    }

    pub fn is_assertion_error(&self) -> bool {
        matches!(&self.origin, Origin::Host(c) if c.assertion)
    }

    /// Text of the captured host exception value.
    ///
    /// If the host cannot convert the value, its channel is cleared: the
    /// conversion failure goes, and so does anything else pending there.
    pub fn host_message(&self, host: &dyn HostEnv) -> Option<String> {
        let value = self.captured_state()?.value.as_ref()?;
        let text = host.to_str(value);
        if text.is_none() {
            host.take_error();
        }
        text
    }

    pub fn describe(&self) -> &str {
        self.message.as_str()
    }

    pub fn to_stderr(&self) {
        eprintln!("{}", self.message);
    }

    /// Deposit this error into the host's error channel.
    ///
    /// Engine errors become a host exception of their bound class. If the
    /// host refuses the message, a runtime error describing the refusal is
    /// set instead. Captured errors put their original triple back; the
    /// triple is consumed, so reporting twice does nothing the second time.
    pub fn report(&mut self, host: &dyn HostEnv) {
        match &mut self.origin {
            Origin::Engine(kind) => {
                let target = host.error_target(*kind);
                tracing::debug!(kind = %kind, text = self.message.as_str(), "reporting error to host");
                if let Err(e) = host.set_error(&target, self.message.as_str()) {
                    report_rejection(host, &e);
                }
            }
            Origin::Host(captured) => {
                if let Some(state) = captured.state.take() {
                    host.restore_error(state);
                }
            }
        }
    }
}

fn report_rejection(host: &dyn HostEnv, rejection: &HostCallError) {
    tracing::debug!(error = %rejection, "host rejected error message, reporting runtime error");
    let fallback = host.error_target(ErrorKind::Runtime);
    if let Err(e) = host.set_error(&fallback, &rejection.to_string()) {
        tracing::warn!(error = %e, "host rejected fallback runtime error");
    }
}

/// Copies the message and classification. A captured host triple is never
/// duplicated: the copy of a captured error owns no host state.
impl Clone for Error {
    fn clone(&self) -> Self {
        let origin = match &self.origin {
            Origin::Engine(kind) => Origin::Engine(*kind),
            Origin::Host(c) => Origin::Host(Captured {
                state: None,
                interrupt: c.interrupt,
                assertion: c.assertion,
            }),
        };
        Self {
            origin,
            message: Message::from(self.message.as_str()),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        io_error().with(e.to_string())
    }
}

impl From<HostCallError> for Error {
    fn from(e: HostCallError) -> Self {
        runtime_error().with(e.to_string())
    }
}

impl From<crate::host::RegistryError> for Error {
    fn from(e: crate::host::RegistryError) -> Self {
        import_error().with(e.to_string())
    }
}

pub fn assertion_error() -> Error {
    Error::new(ErrorKind::Assertion)
}

pub fn runtime_error() -> Error {
    Error::new(ErrorKind::Runtime)
}

pub fn import_error() -> Error {
    Error::new(ErrorKind::Import)
}

pub fn index_error() -> Error {
    Error::new(ErrorKind::Index)
}

pub fn io_error() -> Error {
    Error::new(ErrorKind::Io)
}

pub fn key_error() -> Error {
    Error::new(ErrorKind::Key)
}

pub fn memory_error() -> Error {
    Error::new(ErrorKind::Memory)
}

pub fn not_impl_error() -> Error {
    Error::new(ErrorKind::NotImplemented)
}

pub fn overflow_error() -> Error {
    Error::new(ErrorKind::Overflow)
}

pub fn type_error() -> Error {
    Error::new(ErrorKind::Type)
}

pub fn value_error() -> Error {
    Error::new(ErrorKind::Value)
}

/// The call is not valid for the object's current state.
pub fn invalid_operation_error() -> Error {
    Error::new(ErrorKind::InvalidOperation)
}
