//! Failure and warning classifications.

use std::fmt;

/// Classification of a hard failure.
///
/// Each kind is bound to one reporting target in the host environment,
/// looked up by [`ErrorKind::registry_name`] when the target table is
/// initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Assertion,
    Runtime,
    Import,
    Index,
    Io,
    Key,
    Memory,
    NotImplemented,
    Overflow,
    Type,
    Value,
    InvalidOperation,
}

impl ErrorKind {
    /// Number of error classifications.
    pub const COUNT: usize = 12;

    /// All classifications, in slot order.
    pub const ALL: [ErrorKind; Self::COUNT] = [
        ErrorKind::Assertion,
        ErrorKind::Runtime,
        ErrorKind::Import,
        ErrorKind::Index,
        ErrorKind::Io,
        ErrorKind::Key,
        ErrorKind::Memory,
        ErrorKind::NotImplemented,
        ErrorKind::Overflow,
        ErrorKind::Type,
        ErrorKind::Value,
        ErrorKind::InvalidOperation,
    ];

    pub(crate) fn slot(self) -> usize {
        self as usize
    }

    /// Name under which the host registry exposes this classification.
    pub fn registry_name(self) -> &'static str {
        match self {
            ErrorKind::Assertion => "AssertionError",
            ErrorKind::Runtime => "RuntimeError",
            ErrorKind::Import => "ImportError",
            ErrorKind::Index => "IndexError",
            ErrorKind::Io => "IOError",
            ErrorKind::Key => "KeyError",
            ErrorKind::Memory => "MemoryError",
            ErrorKind::NotImplemented => "NotImplementedError",
            ErrorKind::Overflow => "OverflowError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Value => "ValueError",
            ErrorKind::InvalidOperation => "InvalidOperationError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.registry_name())
    }
}

/// Classification of a non-fatal warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    Deprecation,
    General,
    Io,
}

impl WarningKind {
    pub const COUNT: usize = 3;

    pub const ALL: [WarningKind; Self::COUNT] =
        [WarningKind::Deprecation, WarningKind::General, WarningKind::Io];

    pub(crate) fn slot(self) -> usize {
        self as usize
    }

    /// Deprecations are reported as `FutureWarning` so that hosts which
    /// hide plain deprecation warnings by default still show them.
    pub fn registry_name(self) -> &'static str {
        match self {
            WarningKind::Deprecation => "FutureWarning",
            WarningKind::General => "EngineWarning",
            WarningKind::Io => "IOWarning",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.registry_name())
    }
}
