mod file_config;

pub use file_config::FileConfig;

use crate::sync::SyncOptions;
use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::path::PathBuf;

pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 30;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub base_url: Option<String>,
    pub request_timeout_sec: u64,
    pub send_image_on_update: bool,
    pub load_on_start: bool,
    pub log_level: Option<String>,
    pub history_file: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_sec: DEFAULT_REQUEST_TIMEOUT_SEC,
            send_image_on_update: false,
            load_on_start: true,
            log_level: None,
            history_file: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub request_timeout_sec: u64,
    pub send_image_on_update: bool,
    pub load_on_start: bool,
    pub log_level: Option<String>,
    pub history_file: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let base_url = file
            .base_url
            .or_else(|| cli.base_url.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("base_url must be specified via --base-url or in config file")
            })?;
        let base_url = validate_base_url(&base_url)?;

        let request_timeout_sec = file
            .request_timeout_sec
            .unwrap_or(cli.request_timeout_sec);
        if request_timeout_sec == 0 {
            bail!("request_timeout_sec must be greater than zero");
        }

        let send_image_on_update = file
            .send_image_on_update
            .unwrap_or(cli.send_image_on_update);
        let load_on_start = file.load_on_start.unwrap_or(cli.load_on_start);
        let log_level = file.log_level.or_else(|| cli.log_level.clone());
        let history_file = file
            .history_file
            .map(PathBuf::from)
            .or_else(|| cli.history_file.clone());

        Ok(Self {
            base_url,
            request_timeout_sec,
            send_image_on_update,
            load_on_start,
            log_level,
            history_file,
        })
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            send_image_on_update: self.send_image_on_update,
        }
    }
}

/// Checks that `raw` is an http(s) URL and strips trailing slashes.
fn validate_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw).with_context(|| format!("Invalid base_url: {}", raw))?;
    match url.scheme() {
        "http" | "https" => {}
        other => bail!("Unsupported base_url scheme '{}', use http or https", other),
    }
    Ok(raw.trim_end_matches('/').to_string())
}
