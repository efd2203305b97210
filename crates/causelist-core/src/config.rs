use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::downloader::{Downloader, HttpOptions};
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per PDF (including the first).
    pub max_attempts: u32,
    /// Delay after the first failure in seconds; doubles after each further one.
    pub base_delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 1.0,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        let base = Duration::try_from_secs_f64(self.base_delay_secs).unwrap_or(Duration::ZERO);
        RetryPolicy::new(self.max_attempts, base)
    }
}

/// Global configuration loaded from `~/.config/causelist/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauselistConfig {
    /// Directory receiving PDFs and manifests.
    pub output_root: PathBuf,
    /// Per-attempt network timeout in seconds.
    pub timeout_secs: u64,
    /// Hold an advisory lock on the manifest while appending.
    #[serde(default = "default_lock_manifest")]
    pub lock_manifest: bool,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_lock_manifest() -> bool {
    true
}

impl Default for CauselistConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("output"),
            timeout_secs: 20,
            lock_manifest: true,
            retry: None,
        }
    }
}

impl CauselistConfig {
    pub fn downloader(&self) -> Downloader {
        let timeout = Duration::from_secs(self.timeout_secs);
        Downloader::new(
            self.retry.clone().unwrap_or_default().policy(),
            HttpOptions {
                timeout,
                connect_timeout: timeout,
            },
        )
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("causelist")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CauselistConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CauselistConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: CauselistConfig = toml::from_str(&data)?;
    Ok(cfg)
}
