//! Prometheus metrics for the worker
//!
//! Job and callback instruments live in [`jobs`]. The recorder is only
//! installed when a listen address is configured; without it every
//! `metrics` macro call is a cheap no-op.

pub mod jobs;

pub use jobs::{CallbackMetrics, JobMetrics};

use std::net::SocketAddr;
use std::sync::Once;
use tracing::{info, warn};

static INIT: Once = Once::new();

/// Build a metric name with the crate prefix
macro_rules! harmonizer_metric {
    (counter, $name:literal) => {
        concat!("harmonizer_", $name, "_total")
    };
    (histogram, $name:literal) => {
        concat!("harmonizer_", $name)
    };
}

pub(crate) use harmonizer_metric;

/// Initialize the global metrics recorder
///
/// Idempotent. Installs a Prometheus recorder with an HTTP listener at
/// `addr`; `None` leaves metrics unrecorded.
pub fn init_metrics(addr: Option<SocketAddr>) {
    let Some(addr) = addr else {
        return;
    };

    INIT.call_once(|| {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
        match builder.install() {
            Ok(()) => {
                JobMetrics::register_metrics();
                CallbackMetrics::register_metrics();
                info!("Prometheus exporter listening at http://{}/metrics", addr);
            }
            Err(e) => {
                warn!("Failed to install Prometheus recorder: {}", e);
            }
        }
    });
}
