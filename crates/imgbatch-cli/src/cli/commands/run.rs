//! `imgbatch run` – run a batch file through the windowed scheduler.

use anyhow::{Context, Result};
use imgbatch_core::config::{expand_path, AppConfig};
use imgbatch_core::report::{self, ReportFormat};
use imgbatch_core::scheduler::{self, BatchProgress, BatchSettings};
use imgbatch_core::service::{ImageService, ZaiClient};
use imgbatch_core::BatchFile;
use std::path::Path;
use std::sync::Arc;

/// Runs every job in the batch file, prints the report on stdout and returns
/// exit code 1 if any job failed.
pub async fn run_batch_file(
    cfg: &AppConfig,
    path: &Path,
    format: ReportFormat,
    output_dir: Option<&Path>,
    concurrency: Option<i64>,
) -> Result<i32> {
    let path = expand_path(&path.to_string_lossy())?;
    eprintln!("Processing batch config: {}", path.display());

    let file = BatchFile::load(&path)?;
    let settings = BatchSettings::resolve(&file, cfg, output_dir, concurrency)?;
    let service: Arc<dyn ImageService> = Arc::new(ZaiClient::from_env(cfg)?);
    tracing::info!(
        jobs = file.jobs.len(),
        concurrency = settings.concurrency,
        dir = %settings.output_dir.display(),
        "running batch {}",
        path.display()
    );

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<BatchProgress>(16);
    let progress_handle = tokio::spawn(async move {
        while let Some(p) = progress_rx.recv().await {
            eprintln!("Progress: {}/{} jobs completed", p.completed, p.total);
        }
    });

    let result = scheduler::run_batch(
        service,
        file.jobs,
        &settings.output_dir,
        settings.concurrency,
        Some(progress_tx),
    )
    .await?;

    let _ = progress_handle.await;

    let rendered = report::render(&result, format).context("render report")?;
    println!("{}", rendered);

    Ok(if result.failed > 0 { 1 } else { 0 })
}
