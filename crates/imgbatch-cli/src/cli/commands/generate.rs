//! `imgbatch generate` – one image through the same job runner as batches.

use anyhow::{Context, Result};
use imgbatch_core::config::{expand_path, AppConfig};
use imgbatch_core::scheduler;
use imgbatch_core::service::ZaiClient;
use imgbatch_core::Job;
use std::path::Path;
use std::sync::Arc;

/// Generates one image and prints the job result as JSON.
pub async fn run_generate(cfg: &AppConfig, job: Job, output_dir: Option<&Path>) -> Result<i32> {
    if job.prompt.trim().is_empty() {
        anyhow::bail!("prompt must not be empty");
    }
    let dir = match output_dir {
        Some(d) => expand_path(&d.to_string_lossy())?,
        None => cfg.output_directory()?,
    };
    let service = Arc::new(ZaiClient::from_env(cfg)?);

    let result = scheduler::run_job(service, job, &dir).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("serialize result")?
    );
    Ok(if result.success { 0 } else { 1 })
}
