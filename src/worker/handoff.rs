//! Per-job result handoff between an executor and the submitter.
//!
//! A [`Job`] carries the sending half of a one-shot channel; the submitter
//! keeps the matching [`JobHandle`]. Delivery consumes the sender, so a job
//! can complete at most once. If the job is dropped undelivered (discarded
//! at shutdown), the handle observes [`HarmonizerError::ResultAbandoned`].

use std::time::Duration;

use tokio::sync::oneshot;

use crate::error::{HarmonizerError, Result};
use crate::types::{JobResult, JobSpec};

/// A queued unit of work: what to run plus where to send the outcome.
#[derive(Debug)]
pub struct Job {
    pub spec: JobSpec,
    pub completion: CompletionSender,
}

impl Job {
    pub fn new(spec: JobSpec) -> (Job, JobHandle) {
        let (tx, rx) = oneshot::channel();
        let job_id = spec.id.clone();
        let job = Job {
            spec,
            completion: CompletionSender { tx },
        };
        (job, JobHandle { job_id, rx })
    }

    pub fn into_parts(self) -> (JobSpec, CompletionSender) {
        (self.spec, self.completion)
    }
}

#[derive(Debug)]
pub struct CompletionSender {
    tx: oneshot::Sender<JobResult>,
}

impl CompletionSender {
    /// Hand the result to the waiting submitter. Returns false if nobody is
    /// listening any more.
    pub fn deliver(self, result: JobResult) -> bool {
        self.tx.send(result).is_ok()
    }
}

/// Receiving end of a submitted job.
#[derive(Debug)]
pub struct JobHandle {
    job_id: String,
    rx: oneshot::Receiver<JobResult>,
}

impl JobHandle {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Wait for the job's result.
    pub async fn wait(self) -> Result<JobResult> {
        let JobHandle { job_id, rx } = self;
        rx.await
            .map_err(|_| HarmonizerError::ResultAbandoned(job_id))
    }

    /// Wait at most `timeout`. The job itself keeps running on timeout.
    pub async fn wait_timeout(self, timeout: Duration) -> Result<JobResult> {
        let JobHandle { job_id, rx } = self;
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(_)) => Err(HarmonizerError::ResultAbandoned(job_id)),
            Err(_) => Err(HarmonizerError::ResultTimeout(job_id)),
        }
    }
}
