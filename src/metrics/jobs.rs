//! Job execution and status callback metrics

use crate::metrics::harmonizer_metric;

/// Metrics for dispatched jobs
pub struct JobMetrics;

impl JobMetrics {
    /// Record a job that produced its output
    pub fn record_completed(category: &str, duration_secs: f64) {
        ::metrics::counter!(harmonizer_metric!(counter, "jobs_completed"), "category" => category.to_string())
            .increment(1);
        ::metrics::histogram!(harmonizer_metric!(histogram, "job_duration_seconds"))
            .record(duration_secs);
    }

    /// Record a job that ended in a failure result
    pub fn record_failed(category: &str, duration_secs: f64) {
        ::metrics::counter!(harmonizer_metric!(counter, "jobs_failed"), "category" => category.to_string())
            .increment(1);
        ::metrics::histogram!(harmonizer_metric!(histogram, "job_duration_seconds"))
            .record(duration_secs);
    }

    pub(crate) fn register_metrics() {
        let _ = ::metrics::counter!(harmonizer_metric!(counter, "jobs_completed"));
        let _ = ::metrics::counter!(harmonizer_metric!(counter, "jobs_failed"));
        let _ = ::metrics::histogram!(harmonizer_metric!(histogram, "job_duration_seconds"));
    }
}

/// Metrics for status callbacks to the coordinating service
pub struct CallbackMetrics;

impl CallbackMetrics {
    pub fn record_failed() {
        ::metrics::counter!(harmonizer_metric!(counter, "status_callbacks_failed")).increment(1);
    }

    pub(crate) fn register_metrics() {
        let _ = ::metrics::counter!(harmonizer_metric!(counter, "status_callbacks_failed"));
    }
}
