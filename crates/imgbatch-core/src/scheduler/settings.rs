//! Per-run settings derived from the batch file, CLI overrides and config.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::{expand_path, AppConfig};
use crate::error::BatchError;
use crate::job::BatchFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSettings {
    pub output_dir: PathBuf,
    pub concurrency: usize,
}

impl BatchSettings {
    /// Output directory: `dir_override`, then the batch file, then the
    /// environment/config default. Concurrency: `concurrency_override`, then
    /// the batch file, then `cfg.default_concurrency`. Non-positive values are
    /// configuration errors.
    pub fn resolve(
        file: &BatchFile,
        cfg: &AppConfig,
        dir_override: Option<&Path>,
        concurrency_override: Option<i64>,
    ) -> Result<Self> {
        let output_dir = match (dir_override, file.output_directory.as_deref()) {
            (Some(dir), _) => expand_path(&dir.to_string_lossy())?,
            (None, Some(dir)) if !dir.is_empty() => expand_path(dir)?,
            _ => cfg.output_directory()?,
        };

        let concurrency = match concurrency_override.or(file.concurrency) {
            Some(n) if n <= 0 => return Err(BatchError::InvalidConcurrency(n).into()),
            Some(n) => usize::try_from(n).map_err(|_| BatchError::InvalidConcurrency(n))?,
            None if cfg.default_concurrency == 0 => {
                return Err(BatchError::InvalidConcurrency(0).into())
            }
            None => cfg.default_concurrency,
        };

        Ok(Self {
            output_dir,
            concurrency,
        })
    }
}
