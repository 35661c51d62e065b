use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the service API key.
pub const API_KEY_ENV: &str = "Z_AI_API_KEY";
/// Environment variable overriding the configured output directory.
pub const OUTPUT_DIRECTORY_ENV: &str = "OUTPUT_DIRECTORY";

pub const DEFAULT_ENDPOINT: &str = "https://api.z.ai/api/paas/v4/images/generations";
pub const DEFAULT_MODEL: &str = "glm-image";
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Global configuration loaded from `~/.config/imgbatch/config.toml`.
///
/// The API key is not part of the file; it comes from the
/// environment (see [`api_key_from_env`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Image generation endpoint (POST).
    pub api_endpoint: String,
    /// Model name sent with each request.
    pub model: String,
    /// Default output directory; `~` is expanded. None = `~/Downloads/glm-images`.
    #[serde(default)]
    pub output_directory: Option<String>,
    /// Jobs per window when a batch file does not set `concurrency`.
    pub default_concurrency: usize,
    /// Timeout for the generation request in seconds.
    pub request_timeout_secs: u64,
    /// Timeout for the image download in seconds.
    pub download_timeout_secs: u64,
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            output_directory: None,
            default_concurrency: DEFAULT_CONCURRENCY,
            request_timeout_secs: 120,
            download_timeout_secs: 60,
            connect_timeout_secs: 15,
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Output directory from `OUTPUT_DIRECTORY`, then the config file, then
    /// `~/Downloads/glm-images`.
    pub fn output_directory(&self) -> Result<PathBuf> {
        let env_dir = std::env::var(OUTPUT_DIRECTORY_ENV).ok();
        self.output_directory_with(env_dir.as_deref())
    }

    fn output_directory_with(&self, env_dir: Option<&str>) -> Result<PathBuf> {
        if let Some(dir) = env_dir.filter(|d| !d.is_empty()) {
            return expand_path(dir);
        }
        if let Some(dir) = self.output_directory.as_deref().filter(|d| !d.is_empty()) {
            return expand_path(dir);
        }
        Ok(home_dir()?.join("Downloads").join("glm-images"))
    }
}

/// Reads the API key from the environment; None if unset or empty.
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())
}

fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .context("HOME is not set")
}

/// Expands a leading `~` to `$HOME` and makes relative paths absolute.
pub fn expand_path(path: &str) -> Result<PathBuf> {
    if let Some(rest) = path.strip_prefix('~') {
        let rest = rest.trim_start_matches('/');
        return Ok(home_dir()?.join(rest));
    }
    let p = Path::new(path);
    if p.is_absolute() {
        Ok(p.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("resolve current directory")?
            .join(p))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgbatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AppConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AppConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AppConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
