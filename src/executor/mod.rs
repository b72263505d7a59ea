//! Task execution infrastructure.
//!
//! This module provides the scheduling abstraction a worker thread uses to
//! pull work ([`Task`], [`Job`], [`execute_in_current_thread`]) and the
//! [`Team`] coordinator that runs a job across threads and keeps only the
//! first failure.

pub mod failure;
pub mod job;
pub mod panic_handler;
pub mod task;
pub mod team;
pub mod worker;

pub use failure::FirstFailure;
pub use job::Job;
pub use panic_handler::{error_from_panic, PanicHandler, PanicStrategy};
pub use task::{Task, TaskRef, WorkerContext, WorkerId};
pub use team::{num_threads_in_team, Team};
pub use worker::{execute_in_current_thread, set_thread_index, this_thread_index};
