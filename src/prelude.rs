//! Common imports: `use weft::prelude::*;`

pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{
    assertion_error, deprecation_warning, engine_warning, import_error, index_error,
    invalid_operation_error, io_error, io_warning, key_error, memory_error, not_impl_error,
    overflow_error, runtime_error, type_error, value_error, Error, ErrorKind, Result, Warning,
};
pub use crate::executor::{Job, Task, TaskRef, Team, WorkerContext, WorkerId};
pub use crate::host::{HostEnv, HostErrorGuard, LocalHost};
pub use crate::jobs::{parallel_for, ChunkedJob, PartitionedJob, QueueJob};
pub use crate::types::{LType, SType};
