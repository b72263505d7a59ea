//! Ready-made [`Job`](crate::executor::Job) implementations.
//!
//! - [`PartitionedJob`]: tasks assigned to workers up front.
//! - [`QueueJob`]: one shared queue, open for pushes while running.
//! - [`ChunkedJob`] / [`parallel_for`]: an index range claimed chunk by chunk.

pub mod chunked;
pub mod partitioned;
pub mod queue;

pub use chunked::{parallel_for, ChunkedJob};
pub use partitioned::PartitionedJob;
pub use queue::QueueJob;
