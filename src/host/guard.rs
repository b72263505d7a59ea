use super::{HostEnv, HostErrorState};
use std::fmt;
use std::marker::PhantomData;

/// Hides the host's pending error for the lifetime of the guard.
///
/// On creation any pending error is taken out of the channel; on drop it
/// is put back verbatim, whatever the guarded code did to the channel in
/// between. If nothing was pending on entry, anything the guarded code
/// left pending is discarded, so the channel is empty again on exit.
///
/// The guard is `!Send`: it must be dropped on the thread that created it.
#[must_use = "the pending error is restored when the guard is dropped"]
pub struct HostErrorGuard<'h> {
    host: &'h dyn HostEnv,
    saved: Option<HostErrorState>,
    _not_send: PhantomData<*const ()>,
}

impl<'h> HostErrorGuard<'h> {
    pub fn new(host: &'h dyn HostEnv) -> Self {
        let saved = if host.error_occurred() {
            host.take_error()
        } else {
            None
        };
        Self {
            host,
            saved,
            _not_send: PhantomData,
        }
    }

    pub fn is_hiding(&self) -> bool {
        self.saved.is_some()
    }
}

impl Drop for HostErrorGuard<'_> {
    fn drop(&mut self) {
        match self.saved.take() {
            Some(state) => self.host.restore_error(state),
            None => {
                self.host.take_error();
            }
        }
    }
}

impl fmt::Debug for HostErrorGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostErrorGuard")
            .field("saved", &self.saved)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LocalHost;

    #[test]
    fn test_restores_original_after_overwrite() {
        let host = LocalHost::new();
        host.raise("KeyError", "outer");
        let original = host.pending().unwrap();

        {
            let guard = HostErrorGuard::new(&host);
            assert!(guard.is_hiding());
            assert!(!host.error_occurred());

            host.raise("ValueError", "inner");
        }

        assert_eq!(host.pending(), Some(original));
    }

    #[test]
    fn test_restores_original_after_clear() {
        let host = LocalHost::new();
        host.raise("IndexError", "outer");
        let original = host.pending().unwrap();

        {
            let _guard = HostErrorGuard::new(&host);
            host.raise("TypeError", "inner");
            host.take_error();
        }

        assert_eq!(host.pending(), Some(original));
    }

    #[test]
    fn test_empty_entry_is_empty_on_exit() {
        let host = LocalHost::new();

        {
            let guard = HostErrorGuard::new(&host);
            assert!(!guard.is_hiding());
            host.raise("RuntimeError", "scratch");
        }
        assert!(!host.error_occurred());
    }

    #[test]
    fn test_nested_guards() {
        let host = LocalHost::new();
        host.raise("KeyError", "first");
        let first = host.pending().unwrap();

        {
            let _outer = HostErrorGuard::new(&host);
            host.raise("ValueError", "second");
            let second = host.pending().unwrap();
            {
                let _inner = HostErrorGuard::new(&host);
                assert!(!host.error_occurred());
            }
            assert_eq!(host.pending(), Some(second));
        }

        assert_eq!(host.pending(), Some(first));
    }
}
