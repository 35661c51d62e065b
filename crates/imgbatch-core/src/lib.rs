pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod output_path;
pub mod report;
pub mod scheduler;
pub mod service;
pub mod size;

pub use error::{BatchError, JobError};
pub use job::{BatchFile, BatchResult, Job, JobResult, Quality};
