use thiserror::Error;

/// Broad failure classes, used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Routing,
    Io,
    Config,
    Delivery,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Routing => "routing",
            ErrorKind::Io => "io",
            ErrorKind::Config => "config",
            ErrorKind::Delivery => "delivery",
            ErrorKind::Internal => "internal",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum HarmonizerError {
    #[error("no processor found for harmonization type: {0}")]
    UnknownCategory(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("{0} data is empty or missing header")]
    EmptyDataset(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid job request: {0}")]
    InvalidRequest(String),

    #[error("worker pool is closed to new jobs")]
    PoolClosed,

    #[error("worker pool queue is full")]
    QueueFull,

    #[error("invalid pool state: {0}")]
    PoolState(String),

    #[error("result for job {0} was abandoned before delivery")]
    ResultAbandoned(String),

    #[error("timed out waiting for result of job {0}")]
    ResultTimeout(String),

    #[error("processor panicked: {0}")]
    ProcessorPanicked(String),
}

impl HarmonizerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarmonizerError::UnknownCategory(_)
            | HarmonizerError::ColumnNotFound(_)
            | HarmonizerError::EmptyDataset(_) => ErrorKind::Routing,
            HarmonizerError::Read { .. }
            | HarmonizerError::Write { .. }
            | HarmonizerError::CreateDir { .. }
            | HarmonizerError::Io(_) => ErrorKind::Io,
            HarmonizerError::Toml(_)
            | HarmonizerError::Config(_)
            | HarmonizerError::InvalidRequest(_) => ErrorKind::Config,
            HarmonizerError::Http(_) | HarmonizerError::Json(_) => ErrorKind::Delivery,
            HarmonizerError::PoolClosed
            | HarmonizerError::QueueFull
            | HarmonizerError::PoolState(_)
            | HarmonizerError::ResultAbandoned(_)
            | HarmonizerError::ResultTimeout(_)
            | HarmonizerError::ProcessorPanicked(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarmonizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_message_names_the_category() {
        let err = HarmonizerError::UnknownCategory("imaging".to_string());
        assert!(err.to_string().contains("imaging"));
        assert_eq!(err.kind(), ErrorKind::Routing);
    }

    #[test]
    fn io_errors_classify_as_io() {
        let err = HarmonizerError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.kind().to_string(), "io");
    }
}
