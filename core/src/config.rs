//! Persisted defaults for `say`.
//!
//! File layout:
//! ```json
//! {
//!   "version": "1.0.0",
//!   "config": { "defaultVoice": "Alex", "defaultRate": 200, ... },
//!   "lastUpdated": "2024-05-01T12:00:00Z"
//! }
//! ```
//! Unknown fields are ignored on load and not written back.

use crate::{Result, SayError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Schema version written into every saved file.
pub const CONFIG_VERSION: &str = "1.0.0";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rate: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_quality: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_audio_device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_voices: Option<bool>,
    /// Voice cache lifetime in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_validate: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    version: String,
    #[serde(default)]
    config: SayConfig,
    last_updated: DateTime<Utc>,
}

/// Write `config` to `path` as JSON, creating parent directories.
pub async fn save_config(path: impl AsRef<Path>, config: &SayConfig) -> Result<()> {
    let path = path.as_ref();
    let file = ConfigFile {
        version: CONFIG_VERSION.to_string(),
        config: config.clone(),
        last_updated: Utc::now(),
    };
    let body = serde_json::to_string_pretty(&file)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, body).await?;
    info!(target = "say", path = %path.display(), "Saved say config");
    Ok(())
}

/// Read a config written by `save_config`.
pub async fn load_config(path: impl AsRef<Path>) -> Result<SayConfig> {
    let path = path.as_ref();
    let body = fs::read_to_string(path)
        .await
        .map_err(|e| SayError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
    let file: ConfigFile = serde_json::from_str(&body)
        .map_err(|e| SayError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
    debug!(
        target = "say",
        path = %path.display(),
        version = %file.version,
        last_updated = %file.last_updated,
        "Loaded say config"
    );
    Ok(file.config)
}
