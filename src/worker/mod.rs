// Concurrent job execution: bounded queue, executors, result handoff

pub mod handoff;
pub mod pool;

pub use handoff::{CompletionSender, Job, JobHandle};
pub use pool::{PoolState, WorkerPool};
