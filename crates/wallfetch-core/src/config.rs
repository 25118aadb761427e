use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default index endpoint; regional requests add their query on top.
pub const DEFAULT_INDEX_URL: &str = "https://www.bing.com/HPImageArchive.aspx";

/// Locale tags requested when the config does not list any.
pub const DEFAULT_REGIONS: &[&str] = &[
    "de-de", "en-au", "en-ca", "en-gb", "en-in", "en-us", "fr-fr", "ja-jp", "zh-cn",
];

/// HTTP client parameters (optional `[fetch]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Seconds to wait for the TCP/TLS connection.
    pub connect_timeout_secs: u64,
    /// Upper bound in seconds for a whole transfer.
    pub timeout_secs: u64,
    /// Let curl negotiate gzip/deflate/br and decode transparently.
    pub compression: bool,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 120,
            compression: true,
            user_agent: concat!("wallfetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/wallfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallfetchConfig {
    /// Directory that receives downloaded images (flat, shared by all regions).
    pub destination_path: PathBuf,
    /// Locale tags; one index request per tag per cycle.
    pub regions: Vec<String>,
    /// Seconds between the start of two cycles.
    pub poll_interval_secs: u64,
    /// Number of images requested per region.
    pub batch_size: u32,
    /// Index endpoint without the per-region query.
    pub index_url: String,
    pub fetch: FetchConfig,
}

impl Default for WallfetchConfig {
    fn default() -> Self {
        Self {
            destination_path: PathBuf::from("./wallpapers"),
            regions: DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect(),
            poll_interval_secs: 5,
            batch_size: 10,
            index_url: DEFAULT_INDEX_URL.to_string(),
            fetch: FetchConfig::default(),
        }
    }
}

impl WallfetchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Rejects settings the scheduler cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.regions.is_empty() {
            anyhow::bail!("config: `regions` must list at least one locale tag");
        }
        if let Some(blank) = self.regions.iter().find(|r| r.trim().is_empty()) {
            anyhow::bail!("config: blank region tag {:?}", blank);
        }
        if self.poll_interval_secs == 0 {
            anyhow::bail!("config: `poll_interval_secs` must be greater than zero");
        }
        if self.batch_size == 0 {
            anyhow::bail!("config: `batch_size` must be greater than zero");
        }
        url::Url::parse(&self.index_url)
            .with_context(|| format!("config: invalid `index_url` {:?}", self.index_url))?;
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("wallfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WallfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WallfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file. The file must exist.
pub fn load_from_path(path: &Path) -> Result<WallfetchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: WallfetchConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
