use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::handoff::{Job, JobHandle};
use crate::error::{HarmonizerError, Result};
use crate::pipeline::Dispatcher;
use crate::types::{JobResult, JobSpec};

/// Lifecycle of a [`WorkerPool`]. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    Created,
    Running,
    Draining,
    Stopped,
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PoolState::Created => "created",
            PoolState::Running => "running",
            PoolState::Draining => "draining",
            PoolState::Stopped => "stopped",
        };
        write!(f, "{}", s)
    }
}

type SharedQueue = Arc<tokio::sync::Mutex<mpsc::Receiver<Job>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A fixed set of executors pulling jobs from one bounded FIFO queue.
///
/// Submitting to a full queue waits for space. `stop` lets in-flight jobs
/// finish, discards whatever is still queued, and joins every executor.
pub struct WorkerPool {
    dispatcher: Dispatcher,
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    queue: SharedQueue,
    shutdown: CancellationToken,
    executors: Mutex<Vec<JoinHandle<()>>>,
    state: Mutex<PoolState>,
}

impl WorkerPool {
    /// Create a pool whose queue holds at most `capacity` pending jobs.
    pub fn new(dispatcher: Dispatcher, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(HarmonizerError::Config(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        let (tx, rx) = mpsc::channel(capacity);
        Ok(Self {
            dispatcher,
            sender: Mutex::new(Some(tx)),
            queue: Arc::new(tokio::sync::Mutex::new(rx)),
            shutdown: CancellationToken::new(),
            executors: Mutex::new(Vec::new()),
            state: Mutex::new(PoolState::Created),
        })
    }

    pub fn state(&self) -> PoolState {
        *lock(&self.state)
    }

    /// Spawn `workers` executors. Must be called once, from within a tokio
    /// runtime, on a freshly created pool.
    pub fn start(&self, workers: usize) -> Result<()> {
        if workers == 0 {
            return Err(HarmonizerError::PoolState(
                "worker count must be at least 1".to_string(),
            ));
        }

        let mut state = lock(&self.state);
        if *state != PoolState::Created {
            return Err(HarmonizerError::PoolState(format!(
                "cannot start a pool that is {}",
                *state
            )));
        }

        let mut executors = lock(&self.executors);
        for worker_id in 0..workers {
            executors.push(tokio::spawn(run_executor(
                worker_id,
                self.dispatcher.clone(),
                Arc::clone(&self.queue),
                self.shutdown.clone(),
            )));
        }
        *state = PoolState::Running;
        info!(workers, "Worker pool started");
        Ok(())
    }

    fn intake(&self) -> Result<mpsc::Sender<Job>> {
        let state = lock(&self.state);
        match *state {
            PoolState::Created | PoolState::Running => {}
            _ => return Err(HarmonizerError::PoolClosed),
        }
        lock(&self.sender)
            .as_ref()
            .cloned()
            .ok_or(HarmonizerError::PoolClosed)
    }

    /// Enqueue a job, waiting while the queue is full.
    pub async fn submit(&self, spec: JobSpec) -> Result<JobHandle> {
        let sender = self.intake()?;
        let (job, handle) = Job::new(spec);
        sender
            .send(job)
            .await
            .map_err(|_| HarmonizerError::PoolClosed)?;
        debug!(job_id = handle.job_id(), "Job queued");
        Ok(handle)
    }

    /// Enqueue a job without waiting; a full queue is reported as
    /// [`HarmonizerError::QueueFull`].
    pub fn try_submit(&self, spec: JobSpec) -> Result<JobHandle> {
        let sender = self.intake()?;
        let (job, handle) = Job::new(spec);
        sender.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => HarmonizerError::QueueFull,
            TrySendError::Closed(_) => HarmonizerError::PoolClosed,
        })?;
        debug!(job_id = handle.job_id(), "Job queued");
        Ok(handle)
    }

    /// Stop accepting jobs and shut the executors down.
    ///
    /// Jobs already executing run to completion. Jobs still queued are
    /// dropped and their handles see `ResultAbandoned`. Calling `stop` again
    /// is a no-op.
    pub async fn stop(&self) {
        {
            let mut state = lock(&self.state);
            match *state {
                PoolState::Draining | PoolState::Stopped => return,
                _ => *state = PoolState::Draining,
            }
            // Cancel before releasing the lock: anyone observing Draining
            // also observes the cancelled token.
            self.shutdown.cancel();
        }
        info!("Worker pool draining");

        lock(&self.sender).take();

        let executors = std::mem::take(&mut *lock(&self.executors));
        for handle in executors {
            if let Err(e) = handle.await {
                warn!("Executor task ended abnormally: {}", e);
            }
        }

        let mut queue = self.queue.lock().await;
        queue.close();
        let mut discarded = 0usize;
        while let Ok(job) = queue.try_recv() {
            debug!(job_id = %job.spec.id, "Discarding queued job");
            discarded += 1;
        }

        *lock(&self.state) = PoolState::Stopped;
        info!(discarded, "Worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run_executor(
    worker_id: usize,
    dispatcher: Dispatcher,
    queue: SharedQueue,
    shutdown: CancellationToken,
) {
    debug!(worker_id, "Executor started");
    loop {
        let next = {
            let mut rx = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                rx = queue.lock() => rx,
            };
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                job = rx.recv() => job,
            }
        };

        match next {
            Some(job) => execute(worker_id, &dispatcher, job).await,
            None => break,
        }
    }
    debug!(worker_id, "Executor exited");
}

async fn execute(worker_id: usize, dispatcher: &Dispatcher, job: Job) {
    let (spec, completion) = job.into_parts();
    let job_id = spec.id.clone();
    debug!(worker_id, job_id = %job_id, category = %spec.category, "Job picked up");

    let dispatcher = dispatcher.clone();
    let result = match tokio::task::spawn_blocking(move || dispatcher.dispatch(&spec)).await {
        Ok(result) => result,
        Err(e) => {
            warn!(worker_id, job_id = %job_id, "Dispatch task failed: {}", e);
            JobResult::failed(
                &job_id,
                HarmonizerError::ProcessorPanicked(e.to_string()).to_string(),
            )
        }
    };

    if !completion.deliver(result) {
        debug!(worker_id, job_id = %job_id, "Result receiver dropped");
    }
}
