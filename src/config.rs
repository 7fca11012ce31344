use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{HarmonizerError, Result};

/// Runtime settings for the worker.
///
/// Values come from built-in defaults, then an optional TOML file, then
/// environment variables. Core components never read this directly; the
/// binary hands the relevant fields to their constructors.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Number of concurrent executors in the pool
    pub worker_count: usize,
    /// Capacity of the bounded intake queue
    pub queue_size: usize,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Base URL of the orchestrator receiving status callbacks
    pub status_callback_url: Option<String>,
    pub log_dir: PathBuf,
    /// Address for the Prometheus scrape endpoint, if any
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_count: 3,
            queue_size: 100,
            input_dir: PathBuf::from("../uploads"),
            output_dir: PathBuf::from("../results"),
            status_callback_url: None,
            log_dir: PathBuf::from("logs"),
            metrics_addr: None,
        }
    }
}

impl Config {
    /// Load defaults, overlay `config_path` if given, then overlay the
    /// process environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HarmonizerError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Overlay values from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("WORKER_COUNT") {
            self.worker_count = parse_env("WORKER_COUNT", &v)?;
        }
        if let Some(v) = lookup("QUEUE_SIZE") {
            self.queue_size = parse_env("QUEUE_SIZE", &v)?;
        }
        if let Some(v) = lookup("INPUT_DIR") {
            self.input_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("STATUS_CALLBACK_URL") {
            self.status_callback_url = if v.trim().is_empty() { None } else { Some(v) };
        }
        if let Some(v) = lookup("LOG_DIR") {
            self.log_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("METRICS_ADDR") {
            self.metrics_addr = Some(parse_env("METRICS_ADDR", &v)?);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(HarmonizerError::Config(
                "worker_count must be at least 1".to_string(),
            ));
        }
        if self.queue_size == 0 {
            return Err(HarmonizerError::Config(
                "queue_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Create the input and output directories if they don't exist.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.input_dir, &self.output_dir] {
            fs::create_dir_all(dir).map_err(|source| HarmonizerError::CreateDir {
                path: dir.display().to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| {
        HarmonizerError::Config(format!("Invalid value '{}' for {}: {}", value, key, e))
    })
}
