//! Option types accepted by `say`.
//!
//! `SpeechOptions` is a plain record; every field is optional and unset
//! fields contribute nothing to the command line. Domain limits:
//! - rate: words per minute, at least 1
//! - quality: audio converter quality, 0..=127
//! - file_format: AIFF | caff | m4af | WAVE, or any other text `say` accepts
//! - network: `host:port` or a service name

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Lowest accepted speaking rate (words per minute).
pub const MIN_RATE: u32 = 1;
/// Highest audio converter quality `say` understands.
pub const MAX_QUALITY: u8 = 127;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_format: Option<FileFormat>,
}

/// Clamp a raw quality value into the range `say` accepts.
///
/// Negative input maps to 1, not 0. Callers relying on the old behaviour
/// depend on this, so it stays.
pub fn clamp_quality(quality: i32) -> u8 {
    if quality < 0 {
        1
    } else if quality > MAX_QUALITY as i32 {
        MAX_QUALITY
    } else {
        quality as u8
    }
}

/// Clamp a raw rate into `MIN_RATE..`.
pub fn clamp_rate(rate: i64) -> u32 {
    rate.clamp(MIN_RATE as i64, u32::MAX as i64) as u32
}

/// Output container for `--file-format`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileFormat {
    Aiff,
    Caff,
    M4af,
    Wave,
    /// Anything else; passed through untouched.
    Other(String),
}

impl FileFormat {
    pub fn as_str(&self) -> &str {
        match self {
            FileFormat::Aiff => "AIFF",
            FileFormat::Caff => "caff",
            FileFormat::M4af => "m4af",
            FileFormat::Wave => "WAVE",
            FileFormat::Other(s) => s,
        }
    }
}

impl From<&str> for FileFormat {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "aiff" => FileFormat::Aiff,
            "caff" => FileFormat::Caff,
            "m4af" => FileFormat::M4af,
            "wave" => FileFormat::Wave,
            _ => FileFormat::Other(s.to_string()),
        }
    }
}

impl From<String> for FileFormat {
    fn from(s: String) -> Self {
        FileFormat::from(s.as_str())
    }
}

impl From<FileFormat> for String {
    fn from(f: FileFormat) -> Self {
        f.as_str().to_string()
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target for `-n`: either `host:port` or a bare service name.
///
/// The text the target was parsed from is kept and rendered back as-is;
/// `host`/`port` are a read-only view of it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NetworkTarget {
    Address { host: String, port: u16, raw: String },
    Service(String),
}

impl NetworkTarget {
    pub fn address(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        let raw = format!("{}:{}", host, port);
        NetworkTarget::Address { host, port, raw }
    }
}

impl From<&str> for NetworkTarget {
    fn from(s: &str) -> Self {
        if let Some((host, port)) = s.rsplit_once(':') {
            if !host.is_empty() {
                if let Ok(port) = port.parse::<u16>() {
                    return NetworkTarget::Address {
                        host: host.to_string(),
                        port,
                        raw: s.to_string(),
                    };
                }
            }
        }
        NetworkTarget::Service(s.to_string())
    }
}

impl From<String> for NetworkTarget {
    fn from(s: String) -> Self {
        NetworkTarget::from(s.as_str())
    }
}

impl From<NetworkTarget> for String {
    fn from(n: NetworkTarget) -> Self {
        n.to_string()
    }
}

impl fmt::Display for NetworkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkTarget::Address { raw, .. } => f.write_str(raw),
            NetworkTarget::Service(name) => f.write_str(name),
        }
    }
}
