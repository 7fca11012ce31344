use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants;
use crate::error::{HarmonizerError, Result};

/// Built-in data categories.
///
/// The processor registry is keyed by label, so this enum only names the
/// categories that ship with the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Patients,
    Vitals,
    Medications,
    LabResults,
    Generic,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Patients,
        Category::Vitals,
        Category::Medications,
        Category::LabResults,
        Category::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Patients => constants::PATIENTS,
            Category::Vitals => constants::VITALS,
            Category::Medications => constants::MEDICATIONS,
            Category::LabResults => constants::LAB_RESULTS,
            Category::Generic => constants::GENERIC,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = HarmonizerError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| HarmonizerError::UnknownCategory(s.to_string()))
    }
}

/// Terminal status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Completed,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Job intake payload as it arrives from the HTTP front door.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub job_id: String,
    pub input_file: PathBuf,
    pub harmonization_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
}

impl JobRequest {
    pub fn validate(&self) -> Result<()> {
        if self.job_id.trim().is_empty() {
            return Err(HarmonizerError::InvalidRequest("Job ID is required".to_string()));
        }
        if self.input_file.as_os_str().is_empty() {
            return Err(HarmonizerError::InvalidRequest(
                "Input file is required".to_string(),
            ));
        }
        if self.harmonization_type.trim().is_empty() {
            return Err(HarmonizerError::InvalidRequest(
                "Harmonization type is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a job asks for, without its completion channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub id: String,
    pub category: String,
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
}

impl JobSpec {
    pub fn new(id: impl Into<String>, category: impl Into<String>, input: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            input_path: input.into(),
            output_path: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output_path = Some(output.into());
        self
    }
}

impl From<JobRequest> for JobSpec {
    fn from(req: JobRequest) -> Self {
        Self {
            id: req.job_id,
            category: req.harmonization_type,
            input_path: req.input_file,
            output_path: req.output_file,
        }
    }
}

/// Outcome of one job. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    job_id: String,
    status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    completed_at: DateTime<Utc>,
}

impl JobResult {
    pub fn completed(job_id: impl Into<String>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobStatus::Completed,
            output_file: Some(output_file.into()),
            error: None,
            completed_at: Utc::now(),
        }
    }

    pub fn failed(job_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobStatus::Failed,
            output_file: None,
            error: Some(error.into()),
            completed_at: Utc::now(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

/// Body of the status callback sent to the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl From<&JobResult> for StatusUpdate {
    fn from(result: &JobResult) -> Self {
        Self {
            status: result.status,
            output_file: result.output_file.clone(),
            error: result.error.clone(),
            completed_at: result.completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("imaging".parse::<Category>().is_err());
    }

    #[test]
    fn completed_result_carries_output_only() {
        let result = JobResult::completed("job-1", "/tmp/out.csv");
        assert_eq!(result.status(), JobStatus::Completed);
        assert_eq!(result.output_file(), Some(Path::new("/tmp/out.csv")));
        assert!(result.error().is_none());
    }

    #[test]
    fn failed_result_carries_error_only() {
        let result = JobResult::failed("job-2", "column not found: gender");
        assert_eq!(result.status(), JobStatus::Failed);
        assert!(result.output_file().is_none());
        assert_eq!(result.error(), Some("column not found: gender"));
    }

    #[test]
    fn request_deserializes_without_output_file() {
        let req: JobRequest = serde_json::from_value(json!({
            "job_id": "abc",
            "input_file": "uploads/patients.csv",
            "harmonization_type": "patients"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        let spec = JobSpec::from(req);
        assert_eq!(spec.category, "patients");
        assert!(spec.output_path.is_none());
    }

    #[test]
    fn request_without_job_id_is_invalid() {
        let req = JobRequest {
            job_id: " ".to_string(),
            input_file: PathBuf::from("a.csv"),
            harmonization_type: "vitals".to_string(),
            output_file: None,
        };
        assert!(matches!(req.validate(), Err(HarmonizerError::InvalidRequest(_))));
    }

    #[test]
    fn status_update_omits_absent_fields() {
        let result = JobResult::failed("job-3", "boom");
        let body = serde_json::to_value(StatusUpdate::from(&result)).unwrap();
        assert_eq!(body["status"], "failed");
        assert_eq!(body["error"], "boom");
        assert!(body.get("output_file").is_none());
        assert!(body.get("completed_at").is_some());
    }
}
