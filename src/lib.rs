//! weft - worker teams and host-reportable errors for a columnar engine
//!
//! The crate runs partitioned work on a team of identified worker threads
//! and carries failures back to the embedding host with their
//! classification intact.
//!
//! # Quick Start
//!
//! ```
//! use weft::prelude::*;
//!
//! let team = Team::new(Config::builder().num_threads(4).build().unwrap()).unwrap();
//!
//! let err = parallel_for(&team, 1000, 64, |_ctx, i| {
//!     if i == 500 {
//!         return Err(value_error().with("bad row ").with(i));
//!     }
//!     Ok(())
//! })
//! .unwrap_err();
//!
//! assert_eq!(err.kind(), Some(ErrorKind::Value));
//! assert_eq!(err.describe(), "bad row 500");
//! ```
//!
//! # Overview
//!
//! - **Jobs and tasks**: a [`Job`] hands out [`Task`]s to worker identities
//!   until it runs dry; [`execute_in_current_thread`] is the per-thread loop.
//! - **Teams**: [`Team`] runs one job across threads and keeps only the
//!   first failure.
//! - **Errors**: [`Error`] values carry a classification and a message
//!   built from typed operands, and report once into a [`HostEnv`].
//! - **Host boundary**: [`HostEnv`] abstracts the host's error channel,
//!   [`HostErrorGuard`] hides a pending host error for a scope, and
//!   [`LocalHost`] is an in-process host for tools and tests.

#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod host;
pub mod jobs;
pub mod prelude;
pub mod status;
pub mod types;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, ErrorKind, Result, Warning, WarningKind};
pub use executor::{
    execute_in_current_thread, num_threads_in_team, this_thread_index, Job, PanicStrategy, Task,
    TaskRef, Team, WorkerContext, WorkerId,
};
pub use host::{HostEnv, HostErrorGuard, HostObject, LocalHost};
pub use jobs::{parallel_for, ChunkedJob, PartitionedJob, QueueJob};
