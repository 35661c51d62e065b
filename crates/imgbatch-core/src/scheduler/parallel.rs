//! Run a batch in fixed-size windows.
//!
//! Each window's jobs are spawned together on a `JoinSet`; the window is a
//! barrier, so at most `concurrency` jobs are ever in flight and job N+1's
//! window cannot start before job N's window has fully settled.

use std::path::Path;
use std::sync::Arc;

use crate::error::{BatchError, JobError};
use crate::job::{BatchResult, Job, JobResult};
use crate::service::ImageService;

use super::progress::BatchProgress;
use super::runner::run_job;

/// Runs every job exactly once and returns results in input order.
///
/// Fails only for configuration problems (no jobs, zero concurrency), and
/// then before any job starts. After each window a [`BatchProgress`] is sent
/// to `progress_tx` if given.
pub async fn run_batch(
    service: Arc<dyn ImageService>,
    jobs: Vec<Job>,
    output_dir: &Path,
    concurrency: usize,
    progress_tx: Option<tokio::sync::mpsc::Sender<BatchProgress>>,
) -> Result<BatchResult, BatchError> {
    if jobs.is_empty() {
        return Err(BatchError::EmptyJobs);
    }
    if concurrency == 0 {
        return Err(BatchError::InvalidConcurrency(0));
    }

    let total = jobs.len();
    let output_dir: Arc<Path> = Arc::from(output_dir);
    let mut results: Vec<JobResult> = Vec::with_capacity(total);

    tracing::info!(
        total,
        concurrency,
        dir = %output_dir.display(),
        "starting batch"
    );

    for (window_index, window) in jobs.chunks(concurrency).enumerate() {
        tracing::debug!(window = window_index, jobs = window.len(), "starting window");

        // Slot per job so completion order cannot reorder results.
        let mut slots: Vec<Option<JobResult>> = vec![None; window.len()];
        let mut join_set = tokio::task::JoinSet::new();
        for (slot, job) in window.iter().cloned().enumerate() {
            let service = Arc::clone(&service);
            let output_dir = Arc::clone(&output_dir);
            join_set.spawn(async move { (slot, run_job(service, job, &output_dir).await) });
        }

        while let Some(res) = join_set.join_next().await {
            match res {
                Ok((slot, result)) => slots[slot] = Some(result),
                Err(e) => tracing::error!("batch task join: {}", e),
            }
        }

        for (job, slot) in window.iter().zip(slots) {
            results.push(slot.unwrap_or_else(|| {
                JobResult::failed(
                    job.clone(),
                    JobError::Aborted("task ended without a result".into()),
                )
            }));
        }

        let progress = BatchProgress {
            completed: results.len(),
            total,
        };
        tracing::info!("Progress: {}/{} jobs completed", progress.completed, progress.total);
        if let Some(tx) = &progress_tx {
            if tx.send(progress).await.is_err() {
                tracing::debug!("progress receiver dropped");
            }
        }
    }

    let batch = BatchResult::from_results(results);
    tracing::info!(
        total = batch.total,
        successful = batch.successful,
        failed = batch.failed,
        "batch finished"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{GeneratedImage, GenerationRequest};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Sleeps longer for earlier jobs so completion order is reversed within a window.
    #[derive(Default)]
    struct ReverseSleeper {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        finished: AtomicUsize,
        /// (job number, jobs finished when it started)
        starts: std::sync::Mutex<Vec<(u64, usize)>>,
    }

    impl ImageService for ReverseSleeper {
        fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage, JobError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            let n: u64 = request.prompt.trim_start_matches("job").parse().unwrap();
            self.starts
                .lock()
                .unwrap()
                .push((n, self.finished.load(Ordering::SeqCst)));
            std::thread::sleep(Duration::from_millis(60 - 8 * (n % 3)));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.finished.fetch_add(1, Ordering::SeqCst);
            if n == 4 {
                return Err(JobError::Api("content policy".into()));
            }
            Ok(GeneratedImage {
                filepath: request.output_dir.join(format!("{}.png", request.prompt)),
                url: None,
            })
        }
    }

    fn jobs(n: usize) -> Vec<Job> {
        (0..n).map(|i| Job::new(format!("job{i}"))).collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn seven_jobs_three_wide() {
        let svc = Arc::new(ReverseSleeper::default());
        let (tx, mut rx) = tokio::sync::mpsc::channel(16);
        let batch = run_batch(svc.clone(), jobs(7), Path::new("/out"), 3, Some(tx))
            .await
            .unwrap();

        let prompts: Vec<&str> = batch.results.iter().map(|r| r.job.prompt.as_str()).collect();
        assert_eq!(prompts, ["job0", "job1", "job2", "job3", "job4", "job5", "job6"]);
        assert_eq!(batch.total, 7);
        assert_eq!(batch.successful, 6);
        assert_eq!(batch.failed, 1);
        assert!(!batch.results[4].success);
        assert!(svc.max_in_flight.load(Ordering::SeqCst) <= 3);
        for (n, finished_at_start) in svc.starts.lock().unwrap().iter() {
            let window_start = (*n as usize / 3) * 3;
            assert!(
                *finished_at_start >= window_start,
                "job{n} started with only {finished_at_start} jobs finished"
            );
        }

        let mut seen = Vec::new();
        while let Some(p) = rx.recv().await {
            seen.push(p.completed);
        }
        assert_eq!(seen, [3, 6, 7]);
    }

    #[tokio::test]
    async fn empty_batch_rejected() {
        let svc = Arc::new(ReverseSleeper::default());
        let err = run_batch(svc, Vec::new(), Path::new("/out"), 3, None)
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::EmptyJobs));
    }

    #[tokio::test]
    async fn zero_concurrency_rejected() {
        let svc = Arc::new(ReverseSleeper::default());
        let err = run_batch(svc, jobs(2), Path::new("/out"), 0, None)
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::InvalidConcurrency(0)));
    }
}
