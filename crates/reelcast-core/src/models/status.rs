use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Canonical job status shared by every provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Queued,
    Started,
    Finished,
    Canceled,
    Failed,
    Unknown,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Status::Queued => write!(f, "queued"),
            Status::Started => write!(f, "started"),
            Status::Finished => write!(f, "finished"),
            Status::Canceled => write!(f, "canceled"),
            Status::Failed => write!(f, "failed"),
            Status::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of submitting or polling a job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobStatus {
    pub provider_name: String,
    pub provider_job_id: String,
    pub status: Status,
    pub progress: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status_message: String,
    /// Raw provider fields kept for debugging
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub provider_status: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub output: JobOutput,
}

impl JobStatus {
    /// Build a status, forcing progress to 100 for finished jobs.
    pub fn new(
        provider_name: impl Into<String>,
        provider_job_id: impl Into<String>,
        status: Status,
        progress: f64,
    ) -> Self {
        let progress = if status == Status::Finished {
            100.0
        } else {
            progress
        };

        Self {
            provider_name: provider_name.into(),
            provider_job_id: provider_job_id.into(),
            status,
            progress,
            status_message: String::new(),
            provider_status: BTreeMap::new(),
            output: JobOutput::default(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.status_message = message.into();
        self
    }

    pub fn with_provider_status(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.provider_status.insert(key.into(), value.into());
        self
    }

    pub fn with_output(mut self, output: JobOutput) -> Self {
        self.output = output;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobOutput {
    pub destination: String,
    #[serde(default)]
    pub files: Vec<OutputFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutputFile {
    pub path: String,
    pub container: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub video_codec: String,
    pub width: i64,
    pub height: i64,
    pub file_size: i64,
}
