use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::app::ports::StatusReporter;
use crate::error::Result;
use crate::metrics::CallbackMetrics;
use crate::types::{JobRequest, JobResult, JobSpec, StatusUpdate};
use crate::worker::{JobHandle, WorkerPool};

/// Front door for job requests: validates them, hands them to the pool, and
/// optionally reports each outcome to the coordinating service.
#[derive(Clone)]
pub struct JobIntake {
    pool: Arc<WorkerPool>,
    reporter: Option<Arc<dyn StatusReporter>>,
}

impl JobIntake {
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self { pool, reporter: None }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn StatusReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// Validate and enqueue a request. Waits while the queue is full.
    pub async fn submit(&self, request: JobRequest) -> Result<JobHandle> {
        request.validate()?;
        let spec = JobSpec::from(request);
        info!(job_id = %spec.id, category = %spec.category, "Job accepted");
        self.pool.submit(spec).await
    }

    /// Enqueue a request and spawn a task that waits for its result and
    /// posts it to the status reporter, if one is configured. The task
    /// yields the result; callback failures are logged and counted only.
    pub async fn submit_with_callback(
        &self,
        request: JobRequest,
    ) -> Result<JoinHandle<Result<JobResult>>> {
        let handle = self.submit(request).await?;
        let reporter = self.reporter.clone();

        Ok(tokio::spawn(async move {
            let result = handle.wait().await?;
            if let Some(reporter) = reporter {
                report_status(reporter.as_ref(), &result).await;
            }
            Ok(result)
        }))
    }
}

async fn report_status(reporter: &dyn StatusReporter, result: &JobResult) {
    let update = StatusUpdate::from(result);
    if let Err(e) = reporter.report(result.job_id(), &update).await {
        warn!(
            job_id = result.job_id(),
            error_kind = %e.kind(),
            "Status callback failed: {}",
            e
        );
        CallbackMetrics::record_failed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarmonizerError;
    use crate::pipeline::{Dispatcher, ProcessorRegistry};
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<(String, StatusUpdate)>>,
        fail: bool,
    }

    #[async_trait]
    impl StatusReporter for Recording {
        async fn report(&self, job_id: &str, update: &StatusUpdate) -> Result<()> {
            self.seen
                .lock()
                .unwrap()
                .push((job_id.to_string(), update.clone()));
            if self.fail {
                return Err(HarmonizerError::Config("callback endpoint down".to_string()));
            }
            Ok(())
        }
    }

    fn started_pool() -> Arc<WorkerPool> {
        let dispatcher = Dispatcher::new(Arc::new(ProcessorRegistry::with_builtin()));
        let pool = WorkerPool::new(dispatcher, 4).unwrap();
        pool.start(1).unwrap();
        Arc::new(pool)
    }

    fn request(job_id: &str, input: &std::path::Path, category: &str) -> JobRequest {
        JobRequest {
            job_id: job_id.to_string(),
            input_file: input.to_path_buf(),
            harmonization_type: category.to_string(),
            output_file: None,
        }
    }

    #[tokio::test]
    async fn invalid_request_rejected_before_queueing() {
        let intake = JobIntake::new(started_pool());
        let err = intake
            .submit(request("", std::path::Path::new("a.csv"), "patients"))
            .await
            .unwrap_err();
        assert!(matches!(err, HarmonizerError::InvalidRequest(_)));
        intake.pool().stop().await;
    }

    #[tokio::test]
    async fn callback_receives_final_status() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("uploads/p.csv");
        fs::create_dir_all(input.parent().unwrap()).unwrap();
        fs::write(&input, "patient_id,dob,gender\n1,1990-02-03,f\n").unwrap();

        let reporter = Arc::new(Recording::default());
        let intake = JobIntake::new(started_pool()).with_reporter(reporter.clone());

        let task = intake
            .submit_with_callback(request("cb-1", &input, "patients"))
            .await
            .unwrap();
        let result = task.await.unwrap().unwrap();
        assert!(result.is_completed());

        let seen = reporter.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "cb-1");
        assert_eq!(seen[0].1, StatusUpdate::from(&result));
        intake.pool().stop().await;
    }

    #[tokio::test]
    async fn callback_failure_does_not_fail_job() {
        let reporter = Arc::new(Recording {
            fail: true,
            ..Default::default()
        });
        let intake = JobIntake::new(started_pool()).with_reporter(reporter.clone());

        let task = intake
            .submit_with_callback(request("cb-2", std::path::Path::new("x.csv"), "unknown"))
            .await
            .unwrap();
        let result = task.await.unwrap().unwrap();
        assert!(!result.is_completed());
        assert_eq!(reporter.seen.lock().unwrap().len(), 1);
        intake.pool().stop().await;
    }
}
