//! Handing caught failures over to the host.

use super::{Error, ErrorKind};
use crate::executor::num_threads_in_team;
use crate::host::HostEnv;
use std::any::Any;

const UNKNOWN_ERROR: &str = "unknown error";

/// True if `msg` is empty or only spaces, tabs, CRs and LFs.
pub fn is_blank(msg: &str) -> bool {
    msg.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

/// Text carried by a panic payload, if it is a string.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        Some(s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        Some(s.as_str())
    } else {
        None
    }
}

/// Report any caught failure to the host.
///
/// A [`weft::Error`](Error) reports itself. Anything else becomes a runtime
/// error carrying its `Display` text, unless the host already has an error
/// pending, which then wins.
///
/// Meant to be called once workers have stopped.
pub fn translate_to_host(host: &dyn HostEnv, failure: &mut (dyn std::error::Error + 'static)) {
    check_team_idle();
    if let Some(err) = failure.downcast_mut::<Error>() {
        err.report(host);
        return;
    }
    if !host.error_occurred() {
        report_runtime(host, &failure.to_string());
    }
}

/// Like [`translate_to_host`], for a payload caught with `catch_unwind`.
pub fn translate_panic(host: &dyn HostEnv, payload: Box<dyn Any + Send>) {
    check_team_idle();
    match payload.downcast::<Error>() {
        Ok(mut err) => err.report(host),
        Err(payload) => {
            if !host.error_occurred() {
                report_runtime(host, panic_message(&*payload).unwrap_or(""));
            }
        }
    }
}

fn check_team_idle() {
    let active = num_threads_in_team();
    if active != 0 {
        tracing::warn!(active, "translating a failure while team threads are running");
    }
}

fn report_runtime(host: &dyn HostEnv, msg: &str) {
    let text = if is_blank(msg) { UNKNOWN_ERROR } else { msg };
    let target = host.error_target(ErrorKind::Runtime);
    if let Err(e) = host.set_error(&target, text) {
        tracing::debug!(error = %e, "host rejected failure text");
        let _ = host.set_error(&target, UNKNOWN_ERROR);
    }
}
