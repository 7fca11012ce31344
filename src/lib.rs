pub mod config;
pub mod constants;
pub mod error;
pub mod intake;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod types;
pub mod worker;

// Outbound ports and their adapters
pub mod app;
pub mod infra;

pub use error::{HarmonizerError, Result};
