use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Connection (can override CLI)
    pub base_url: Option<String>,
    pub request_timeout_sec: Option<u64>,

    // Behaviour
    pub send_image_on_update: Option<bool>,
    pub load_on_start: Option<bool>,

    // Front-end
    pub log_level: Option<String>,
    pub history_file: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
