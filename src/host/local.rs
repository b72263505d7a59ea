//! In-process host environment.
//!
//! `LocalHost` keeps its own error channel, class registry and warning
//! filter. Embedders without a scripting runtime use it directly, and it
//! is the host the crate's own tests run against.

use super::{HostCallError, HostEnv, HostErrorState, HostObject, RegistryError, TargetTable, WarnStatus};
use crate::error::{ErrorKind, WarningKind};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;

const BUILTIN_CLASSES: &[&str] = &[
    "Exception",
    "Warning",
    "AssertionError",
    "RuntimeError",
    "ImportError",
    "IndexError",
    "IOError",
    "KeyError",
    "MemoryError",
    "NotImplementedError",
    "OverflowError",
    "TypeError",
    "ValueError",
    "KeyboardInterrupt",
    "FutureWarning",
];

// Classes an engine installs on top of the builtins.
const ENGINE_CLASSES: &[&str] = &["InvalidOperationError", "EngineWarning", "IOWarning"];

/// A named exception or warning class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostClass {
    name: String,
}

impl HostClass {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Value of an exception raised through [`LocalHost::set_error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionValue {
    pub class: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarningFilter {
    Ignore,
    #[default]
    Record,
    /// Turn every warning into a pending error.
    Error,
}

#[derive(Debug, Clone)]
pub struct EmittedWarning {
    pub category: HostObject,
    pub message: String,
}

#[derive(Debug)]
pub struct LocalHost {
    classes: RwLock<HashMap<String, HostObject>>,
    targets: RwLock<TargetTable>,
    pending: Mutex<Option<HostErrorState>>,
    filter: Mutex<WarningFilter>,
    warnings: Mutex<Vec<EmittedWarning>>,
    base: HostObject,
    interrupt: HostObject,
    assertion: HostObject,
    type_error: HostObject,
}

impl LocalHost {
    /// Host with builtin classes only. Targets are unresolved, so every
    /// classification reports to the generic `Exception` class.
    pub fn new() -> Self {
        let classes: HashMap<String, HostObject> = BUILTIN_CLASSES
            .iter()
            .map(|name| (name.to_string(), Self::make_class(name)))
            .collect();

        let base = classes["Exception"].clone();
        let interrupt = classes["KeyboardInterrupt"].clone();
        let assertion = classes["AssertionError"].clone();
        let type_error = classes["TypeError"].clone();

        Self {
            classes: RwLock::new(classes),
            targets: RwLock::new(TargetTable::new(base.clone())),
            pending: Mutex::new(None),
            filter: Mutex::new(WarningFilter::default()),
            warnings: Mutex::new(Vec::new()),
            base,
            interrupt,
            assertion,
            type_error,
        }
    }

    /// Host with engine classes installed and all targets resolved.
    pub fn initialized() -> Self {
        let host = Self::new();
        for name in ENGINE_CLASSES {
            host.register_class(name);
        }
        // every registry name is now present
        if let Err(e) = host.init_targets() {
            tracing::warn!(error = %e, "target resolution failed on a fully registered host");
        }
        host
    }

    fn make_class(name: &str) -> HostObject {
        HostObject::new(HostClass {
            name: name.to_string(),
        })
    }

    /// Register a class under `name`, returning the existing one if present.
    pub fn register_class(&self, name: &str) -> HostObject {
        self.classes
            .write()
            .entry(name.to_string())
            .or_insert_with(|| Self::make_class(name))
            .clone()
    }

    pub fn class(&self, name: &str) -> Option<HostObject> {
        self.classes.read().get(name).cloned()
    }

    /// Bind every classification to the registered class of the same name.
    pub fn init_targets(&self) -> Result<(), RegistryError> {
        let table = {
            let classes = self.classes.read();
            TargetTable::resolve(self.base.clone(), |name| classes.get(name).cloned())?
        };
        *self.targets.write() = table;
        Ok(())
    }

    pub fn targets(&self) -> TargetTable {
        self.targets.read().clone()
    }

    /// Make an error of class `class_name` pending, registering the class
    /// if needed.
    pub fn raise(&self, class_name: &str, message: &str) {
        let ty = self.register_class(class_name);
        *self.pending.lock() = Some(Self::exception(ty, message));
    }

    /// Copy of the pending error, leaving it in place.
    pub fn pending(&self) -> Option<HostErrorState> {
        self.pending.lock().clone()
    }

    pub fn set_warning_filter(&self, filter: WarningFilter) {
        *self.filter.lock() = filter;
    }

    pub fn emitted_warnings(&self) -> Vec<EmittedWarning> {
        self.warnings.lock().clone()
    }

    fn exception(ty: HostObject, message: &str) -> HostErrorState {
        let class = ty
            .downcast_ref::<HostClass>()
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let value = HostObject::new(ExceptionValue {
            class,
            message: message.to_string(),
        });
        HostErrorState::new(ty, Some(value), None)
    }

    fn conversion_failed(&self, message: &str) {
        *self.pending.lock() = Some(Self::exception(self.type_error.clone(), message));
    }
}

impl Default for LocalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEnv for LocalHost {
    fn set_error(&self, target: &HostObject, message: &str) -> Result<(), HostCallError> {
        if let Some(pos) = message.find('\0') {
            return Err(HostCallError::InteriorNul(pos));
        }
        *self.pending.lock() = Some(Self::exception(target.clone(), message));
        Ok(())
    }

    fn take_error(&self) -> Option<HostErrorState> {
        self.pending.lock().take()
    }

    fn restore_error(&self, state: HostErrorState) {
        *self.pending.lock() = Some(state);
    }

    fn error_occurred(&self) -> bool {
        self.pending.lock().is_some()
    }

    fn error_target(&self, kind: ErrorKind) -> HostObject {
        self.targets.read().error_target(kind).clone()
    }

    fn warning_target(&self, kind: WarningKind) -> HostObject {
        self.targets.read().warning_target(kind).clone()
    }

    fn repr(&self, value: &HostObject) -> Option<String> {
        if let Some(s) = value.downcast_ref::<String>() {
            return Some(format!("'{}'", s.replace('\'', "\\'")));
        }
        if let Some(s) = value.downcast_ref::<&'static str>() {
            return Some(format!("'{}'", s.replace('\'', "\\'")));
        }
        if let Some(v) = value.downcast_ref::<i64>() {
            return Some(v.to_string());
        }
        if let Some(v) = value.downcast_ref::<f64>() {
            return Some(v.to_string());
        }
        if let Some(v) = value.downcast_ref::<bool>() {
            return Some(if *v { "True" } else { "False" }.to_string());
        }
        if let Some(class) = value.downcast_ref::<HostClass>() {
            return Some(format!("<class '{}'>", class.name));
        }
        if let Some(exc) = value.downcast_ref::<ExceptionValue>() {
            return Some(format!("{}('{}')", exc.class, exc.message));
        }
        self.conversion_failed("object has no textual representation");
        None
    }

    fn to_str(&self, value: &HostObject) -> Option<String> {
        if let Some(s) = value.downcast_ref::<String>() {
            return Some(s.clone());
        }
        if let Some(s) = value.downcast_ref::<&'static str>() {
            return Some(s.to_string());
        }
        if let Some(exc) = value.downcast_ref::<ExceptionValue>() {
            return Some(exc.message.clone());
        }
        self.conversion_failed("expected a string");
        None
    }

    fn warn(&self, category: &HostObject, message: &str) -> WarnStatus {
        let filter = *self.filter.lock();
        match filter {
            WarningFilter::Ignore => WarnStatus::Emitted,
            WarningFilter::Record => {
                self.warnings.lock().push(EmittedWarning {
                    category: category.clone(),
                    message: message.to_string(),
                });
                WarnStatus::Emitted
            }
            WarningFilter::Error => {
                *self.pending.lock() = Some(Self::exception(category.clone(), message));
                WarnStatus::Escalated
            }
        }
    }

    fn is_interrupt(&self, ty: &HostObject) -> bool {
        ty.ptr_eq(&self.interrupt)
    }

    fn is_assertion(&self, ty: &HostObject) -> bool {
        ty.ptr_eq(&self.assertion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_host_reports_to_base_class() {
        let host = LocalHost::new();
        let base = host.class("Exception").unwrap();

        assert_eq!(host.error_target(ErrorKind::Value), base);
        assert_eq!(host.warning_target(WarningKind::General), base);
    }

    #[test]
    fn test_initialized_host_resolves_targets() {
        let host = LocalHost::initialized();

        assert!(host.targets().is_resolved());
        assert_eq!(
            host.error_target(ErrorKind::InvalidOperation),
            host.class("InvalidOperationError").unwrap()
        );
        assert_eq!(
            host.warning_target(WarningKind::Deprecation),
            host.class("FutureWarning").unwrap()
        );
    }

    #[test]
    fn test_init_targets_without_engine_classes_fails() {
        let host = LocalHost::new();
        assert_eq!(
            host.init_targets(),
            Err(RegistryError::Missing {
                name: "InvalidOperationError"
            })
        );
        assert!(!host.targets().is_resolved());
    }

    #[test]
    fn test_set_take_restore() {
        let host = LocalHost::new();
        let target = host.class("KeyError").unwrap();

        host.set_error(&target, "missing").unwrap();
        assert!(host.error_occurred());

        let state = host.take_error().unwrap();
        assert!(!host.error_occurred());
        assert_eq!(state.ty, target);
        assert_eq!(host.to_str(state.value.as_ref().unwrap()).as_deref(), Some("missing"));

        host.restore_error(state.clone());
        assert_eq!(host.pending(), Some(state));
    }

    #[test]
    fn test_set_error_rejects_nul() {
        let host = LocalHost::new();
        let target = host.class("ValueError").unwrap();

        assert_eq!(
            host.set_error(&target, "bad\0message"),
            Err(HostCallError::InteriorNul(3))
        );
        assert!(!host.error_occurred());
    }

    #[test]
    fn test_repr_failure_leaves_type_error() {
        let host = LocalHost::new();
        let opaque = HostObject::new(vec![1u8, 2, 3]);

        assert!(host.repr(&opaque).is_none());
        let pending = host.take_error().unwrap();
        assert_eq!(pending.ty, host.class("TypeError").unwrap());
    }

    #[test]
    fn test_warning_filters() {
        let host = LocalHost::initialized();
        let category = host.warning_target(WarningKind::Io);

        assert_eq!(host.warn(&category, "slow disk"), WarnStatus::Emitted);
        assert_eq!(host.emitted_warnings().len(), 1);

        host.set_warning_filter(WarningFilter::Ignore);
        assert_eq!(host.warn(&category, "ignored"), WarnStatus::Emitted);
        assert_eq!(host.emitted_warnings().len(), 1);

        host.set_warning_filter(WarningFilter::Error);
        assert_eq!(host.warn(&category, "fatal"), WarnStatus::Escalated);
        assert_eq!(host.pending().unwrap().ty, category);
    }
}
