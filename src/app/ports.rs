use async_trait::async_trait;

use crate::error::Result;
use crate::types::StatusUpdate;

/// Outbound notification of a job's final status to the coordinating
/// service.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    async fn report(&self, job_id: &str, update: &StatusUpdate) -> Result<()>;
}
