//! Binding of classifications to host reporting targets.

use super::HostObject;
use crate::error::{ErrorKind, WarningKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("host registry has no target named `{name}`")]
    Missing { name: &'static str },
}

/// Fixed-size mapping from every classification to its host target.
///
/// Until [`TargetTable::resolve`] succeeds every slot points to the
/// generic fallback target, so reporting works before initialization.
#[derive(Debug, Clone)]
pub struct TargetTable {
    fallback: HostObject,
    errors: [Option<HostObject>; ErrorKind::COUNT],
    warnings: [Option<HostObject>; WarningKind::COUNT],
}

impl TargetTable {
    pub fn new(fallback: HostObject) -> Self {
        Self {
            fallback,
            errors: Default::default(),
            warnings: Default::default(),
        }
    }

    /// Resolve every classification by its registry name.
    ///
    /// Fails on the first name `lookup` does not know; nothing is bound
    /// partially in that case.
    pub fn resolve<F>(fallback: HostObject, mut lookup: F) -> Result<Self, RegistryError>
    where
        F: FnMut(&str) -> Option<HostObject>,
    {
        let mut table = TargetTable::new(fallback);

        for kind in ErrorKind::ALL {
            let name = kind.registry_name();
            let target = lookup(name).ok_or(RegistryError::Missing { name })?;
            table.errors[kind.slot()] = Some(target);
        }

        for kind in WarningKind::ALL {
            let name = kind.registry_name();
            let target = lookup(name).ok_or(RegistryError::Missing { name })?;
            table.warnings[kind.slot()] = Some(target);
        }

        Ok(table)
    }

    pub fn error_target(&self, kind: ErrorKind) -> &HostObject {
        self.errors[kind.slot()].as_ref().unwrap_or(&self.fallback)
    }

    pub fn warning_target(&self, kind: WarningKind) -> &HostObject {
        self.warnings[kind.slot()].as_ref().unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &HostObject {
        &self.fallback
    }

    pub fn is_resolved(&self) -> bool {
        self.errors.iter().all(Option::is_some) && self.warnings.iter().all(Option::is_some)
    }
}
