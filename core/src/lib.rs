// Saykit Core Library
// Typed wrapper around the macOS `say` speech utility

pub mod cache;
pub mod config;
pub mod devices;
pub mod executor;
pub mod invocation;
pub mod options;
pub mod say;
pub mod service;
pub mod telemetry;
pub mod voices;

// Export core types
pub use cache::VoiceCache;
pub use config::{load_config, save_config, SayConfig, CONFIG_VERSION};
pub use devices::AudioDevice;
pub use executor::{CommandExecutor, CommandOutput, ExecOptions, SystemExecutor};
pub use invocation::{InvocationDescriptor, SpeechInput};
pub use options::{clamp_quality, FileFormat, NetworkTarget, SpeechOptions};
pub use say::{Say, ValidationResult};
pub use service::{estimate_duration, PreparedSay, SayService, ServiceConfig};
pub use voices::{parse_voice_list, Voice};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SayError {
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    #[error("Failed to fetch voices: {0}")]
    VoiceFetch(String),

    #[error("{program} failed: {message}")]
    ProcessFailed { program: String, message: String },

    #[error("Failed to load config: {0}")]
    ConfigLoad(String),

    #[error("{program} timed out after {timeout_ms}ms")]
    Timeout { program: String, timeout_ms: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
pub type Result<T> = std::result::Result<T, SayError>;
