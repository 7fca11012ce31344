use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use super::registry::ProcessorRegistry;
use crate::constants::{HARMONIZED_SUFFIX, RESULTS_DIR_NAME};
use crate::error::HarmonizerError;
use crate::metrics::JobMetrics;
use crate::types::{JobResult, JobSpec};

/// Output location for a job that did not name one:
/// `<parent of input dir>/results/<stem>_<category>_harmonized<.ext>`.
///
/// Pure path arithmetic; nothing is touched on disk.
pub fn derive_output_path(input: &Path, category: &str) -> PathBuf {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    let results = match dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(grandparent) => grandparent.join(RESULTS_DIR_NAME),
        None => dir.join("..").join(RESULTS_DIR_NAME),
    };
    results.join(output_file_name(input, category))
}

/// Same file name as [`derive_output_path`], placed in `dir`.
pub fn output_path_in(dir: &Path, input: &Path, category: &str) -> PathBuf {
    dir.join(output_file_name(input, category))
}

fn output_file_name(input: &Path, category: &str) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    format!("{}_{}_{}.{}", stem, category, HARMONIZED_SUFFIX, ext)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Routes a job to the processor registered for its category and turns the
/// outcome into a [`JobResult`]. Never retries; never mutates the job.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ProcessorRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ProcessorRegistry>) -> Self {
        Self { registry }
    }

    /// Run one job to completion on the calling thread.
    ///
    /// Every outcome, including a panicking processor, comes back as a
    /// result value.
    pub fn dispatch(&self, spec: &JobSpec) -> JobResult {
        let started = Instant::now();

        let Some(processor) = self.registry.get(&spec.category) else {
            let err = HarmonizerError::UnknownCategory(spec.category.clone());
            warn!(
                job_id = %spec.id,
                category = %spec.category,
                error_kind = %err.kind(),
                "Job rejected: {}",
                err
            );
            JobMetrics::record_failed(&spec.category, started.elapsed().as_secs_f64());
            return JobResult::failed(&spec.id, err.to_string());
        };

        let output = spec
            .output_path
            .clone()
            .unwrap_or_else(|| derive_output_path(&spec.input_path, &spec.category));

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            processor.process(&spec.input_path, &output)
        }))
        .unwrap_or_else(|payload| {
            Err(HarmonizerError::ProcessorPanicked(panic_message(payload.as_ref())))
        });

        let elapsed = started.elapsed();
        match outcome {
            Ok(report) => {
                info!(
                    job_id = %spec.id,
                    category = %spec.category,
                    processor = processor.name(),
                    rows = report.rows,
                    short_rows = report.short_rows,
                    elapsed_ms = elapsed.as_millis() as u64,
                    output = %output.display(),
                    "Job completed"
                );
                JobMetrics::record_completed(&spec.category, elapsed.as_secs_f64());
                JobResult::completed(&spec.id, output)
            }
            Err(err) => {
                warn!(
                    job_id = %spec.id,
                    category = %spec.category,
                    processor = processor.name(),
                    error_kind = %err.kind(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Job failed: {}",
                    err
                );
                JobMetrics::record_failed(&spec.category, elapsed.as_secs_f64());
                JobResult::failed(&spec.id, err.to_string())
            }
        }
    }
}
