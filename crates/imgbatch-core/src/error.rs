//! Error taxonomy for batch configuration and per-job failures.
//!
//! `BatchError` aborts a run before any job starts. Every other failure is a
//! `JobError`, which the job runner turns into a failed result for that job only.

use std::path::PathBuf;

use crate::size::SizeError;

/// Configuration errors: the batch is structurally invalid and nothing is attempted.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("config must contain a non-empty \"jobs\" array")]
    EmptyJobs,
    #[error("invalid concurrency {0}: must be a positive integer")]
    InvalidConcurrency(i64),
    #[error("job {index}: {reason}")]
    InvalidJob { index: usize, reason: String },
    #[error("invalid batch config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("read batch config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a single job. Rendered into `JobResult::error` via `Display`.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// Requested geometry violates the service limits.
    #[error(transparent)]
    Validation(#[from] SizeError),
    /// Resolved output path escaped the output directory.
    #[error("Invalid output path: path traversal detected")]
    PathTraversal { path: PathBuf },
    /// The service answered with a structured error message.
    #[error("API Error: {0}")]
    Api(String),
    /// The service answered with a non-2xx status and no structured error.
    #[error("HTTP Error {status}: {message}")]
    Http { status: u32, message: String },
    /// 2xx response the client could not use (bad JSON, empty data, bad URL).
    #[error("{0}")]
    MalformedResponse(String),
    /// Connection, DNS, TLS or timeout failure.
    #[error("Network Error: {0}")]
    Network(String),
    #[error("{context}: {source}")]
    Filesystem {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Z_AI_API_KEY is required. Set it via environment variable or config.")]
    MissingApiKey,
    /// The job's task was torn down before producing a result (panic).
    #[error("job aborted: {0}")]
    Aborted(String),
}

impl JobError {
    pub(crate) fn fs(context: impl Into<String>, source: std::io::Error) -> Self {
        JobError::Filesystem {
            context: context.into(),
            source,
        }
    }
}

impl From<curl::Error> for JobError {
    fn from(e: curl::Error) -> Self {
        JobError::Network(e.to_string())
    }
}
