use super::builder::impl_message_builder;
use super::{Error, Message, Result, WarningKind};
use crate::host::{HostEnv, WarnStatus};

/// A non-fatal condition to be shown to the user.
///
/// Built like an [`Error`], but its terminal action is [`emit`](Warning::emit)
/// rather than propagation.
#[derive(Debug, Clone)]
pub struct Warning {
    kind: WarningKind,
    message: Message,
}

impl_message_builder!(Warning);

impl Warning {
    pub fn new(kind: WarningKind) -> Self {
        Self {
            kind,
            message: Message::new(),
        }
    }

    pub fn kind(&self) -> WarningKind {
        self.kind
    }

    /// Emit the warning through the host.
    ///
    /// When the host is configured to turn warnings into errors, the
    /// resulting host error is captured and returned; the caller is expected
    /// to propagate it like any other failure.
    pub fn emit(self, host: &dyn HostEnv) -> Result<()> {
        let category = host.warning_target(self.kind);
        match host.warn(&category, self.message.as_str()) {
            WarnStatus::Emitted => {
                tracing::debug!(kind = %self.kind, text = self.message.as_str(), "warning emitted");
                Ok(())
            }
            WarnStatus::Escalated => Err(Error::capture(host)),
        }
    }
}

pub fn deprecation_warning() -> Warning {
    Warning::new(WarningKind::Deprecation)
}

pub fn engine_warning() -> Warning {
    Warning::new(WarningKind::General)
}

pub fn io_warning() -> Warning {
    Warning::new(WarningKind::Io)
}
