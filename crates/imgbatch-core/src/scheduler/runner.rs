//! Run one job end to end: size → service → result. Never fails.

use std::path::Path;
use std::sync::Arc;

use crate::error::JobError;
use crate::job::{Job, JobResult};
use crate::service::{GenerationRequest, ImageService};
use crate::size::resolve_size;

/// Executes `job` and converts every failure into a failed [`JobResult`].
///
/// Size validation happens before the service is touched; an invalid size
/// never costs a network round trip. The blocking service call runs on the
/// blocking pool so a window's jobs overlap while they wait on the network.
pub async fn run_job(service: Arc<dyn ImageService>, job: Job, output_dir: &Path) -> JobResult {
    let size = match resolve_size(job.size_preset.as_deref(), job.custom_size.as_deref()) {
        Ok(size) => size,
        Err(e) => {
            tracing::warn!(prompt = %job.prompt, "size validation failed: {}", e);
            return JobResult::failed(job, JobError::from(e));
        }
    };

    let request = GenerationRequest {
        prompt: job.prompt.clone(),
        quality: job.quality.unwrap_or_default(),
        size,
        output_dir: output_dir.to_path_buf(),
        output_filename: job.output_filename.clone(),
    };

    let outcome = tokio::task::spawn_blocking(move || service.generate(&request)).await;
    match outcome {
        Ok(Ok(image)) => {
            tracing::debug!(path = %image.filepath.display(), "job succeeded");
            JobResult::succeeded(job, image.filepath, image.url)
        }
        Ok(Err(e)) => {
            tracing::warn!(prompt = %job.prompt, "job failed: {}", e);
            JobResult::failed(job, e)
        }
        Err(join) => {
            tracing::error!(prompt = %job.prompt, "job task join: {}", join);
            JobResult::failed(job, JobError::Aborted(join.to_string()))
        }
    }
}
