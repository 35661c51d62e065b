//! Job records, batch file schema and result records.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BatchError;

/// Quality tier requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Hd,
    Standard,
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Hd => "hd",
            Quality::Standard => "standard",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hd" => Ok(Quality::Hd),
            "standard" => Ok(Quality::Standard),
            other => Err(format!("invalid quality \"{other}\": expected hd or standard")),
        }
    }
}

/// One generation request as read from a batch file.
///
/// `size_preset` is kept as text so that an unknown tag fails only this job
/// (at size resolution) instead of the whole batch file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_filename: Option<String>,
}

impl Job {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            quality: None,
            size_preset: None,
            custom_size: None,
            output_filename: None,
        }
    }
}

/// Batch file: `{ "jobs": [...], "output_directory"?: ..., "concurrency"?: ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchFile {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub output_directory: Option<String>,
    /// Signed so that zero and negative values can be reported rather than
    /// failing as a type error.
    #[serde(default)]
    pub concurrency: Option<i64>,
}

impl BatchFile {
    /// Parses and validates a batch document. Fails closed on any job that
    /// violates the schema.
    pub fn from_json(data: &str) -> Result<Self, BatchError> {
        let file: BatchFile = serde_json::from_str(data)?;
        file.validate()?;
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self, BatchError> {
        let data = fs::read_to_string(path).map_err(|source| BatchError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    pub fn validate(&self) -> Result<(), BatchError> {
        if self.jobs.is_empty() {
            return Err(BatchError::EmptyJobs);
        }
        for (index, job) in self.jobs.iter().enumerate() {
            if job.prompt.trim().is_empty() {
                return Err(BatchError::InvalidJob {
                    index,
                    reason: "prompt must not be empty".to_string(),
                });
            }
        }
        if let Some(n) = self.concurrency {
            if n <= 0 {
                return Err(BatchError::InvalidConcurrency(n));
            }
        }
        Ok(())
    }
}

/// Outcome of one job. Created once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub job: Job,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobResult {
    pub fn succeeded(job: Job, filepath: PathBuf, url: Option<String>) -> Self {
        Self {
            job,
            success: true,
            filepath: Some(filepath),
            url,
            error: None,
        }
    }

    pub fn failed(job: Job, error: impl fmt::Display) -> Self {
        Self {
            job,
            success: false,
            filepath: None,
            url: None,
            error: Some(error.to_string()),
        }
    }
}

/// Aggregate of a batch run. `results` is in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<JobResult>,
}

impl BatchResult {
    pub fn from_results(results: Vec<JobResult>) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            results,
        }
    }
}
