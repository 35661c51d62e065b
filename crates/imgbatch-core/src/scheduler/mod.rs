//! Job runner and windowed batch scheduler.
//!
//! A batch is split into consecutive windows of `concurrency` jobs. All jobs
//! of a window run at once; the next window starts only after every job of
//! the current one has settled. Results keep input order.

mod parallel;
mod progress;
mod runner;
mod settings;

pub use parallel::run_batch;
pub use progress::BatchProgress;
pub use runner::run_job;
pub use settings::BatchSettings;
