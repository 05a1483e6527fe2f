//! `Say`: a configured `say` invocation.
//!
//! `Say` is a value type. Setters consume and return it, so a clone can be
//! tweaked for one call without touching the original.
//!
//! Construction is strict and setters are lenient: `Say::new` rejects a
//! rate below 1, while `Say::rate` clamps it. Quality is clamped on both
//! paths (see `clamp_quality`).

use crate::config::SayConfig;
use crate::invocation::{self, InvocationDescriptor, SpeechInput};
use crate::options::{
    clamp_quality, clamp_rate, FileFormat, NetworkTarget, SpeechOptions, MAX_QUALITY, MIN_RATE,
};
use crate::{Result, SayError};
use serde::Serialize;
use std::path::Path;

/// Program name used when none is configured.
pub const SAY_PROGRAM: &str = "say";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Say {
    pub(crate) options: SpeechOptions,
}

impl Say {
    /// Build from a set of options. A rate of 0 is rejected; quality above
    /// 127 is clamped.
    pub fn new(mut options: SpeechOptions) -> Result<Self> {
        if let Some(rate) = options.rate {
            if rate < MIN_RATE {
                return Err(SayError::InvalidOption(format!(
                    "rate must be at least {} words per minute, got {}",
                    MIN_RATE, rate
                )));
            }
        }
        options.quality = options.quality.map(|q| clamp_quality(q as i32));
        Ok(Self { options })
    }

    /// Build from a persisted config. Same rules as `new`.
    pub fn from_config(config: &SayConfig) -> Result<Self> {
        let rate = match config.default_rate {
            Some(rate) if rate < MIN_RATE as i64 => {
                return Err(SayError::InvalidOption(format!(
                    "rate must be at least {} words per minute, got {}",
                    MIN_RATE, rate
                )))
            }
            Some(rate) => Some(clamp_rate(rate)),
            None => None,
        };
        let options = SpeechOptions {
            voice: config.default_voice.clone(),
            rate,
            quality: config.default_quality.map(clamp_quality),
            audio_device: config.default_audio_device.clone(),
            ..Default::default()
        };
        Self::new(options)
    }

    pub fn options(&self) -> &SpeechOptions {
        &self.options
    }

    pub fn into_options(self) -> SpeechOptions {
        self.options
    }

    pub fn voice(mut self, voice: Option<&str>) -> Self {
        self.options.voice = voice.map(str::to_string);
        self
    }

    /// Set the rate in words per minute; values below 1 become 1.
    pub fn rate(mut self, rate: Option<i64>) -> Self {
        self.options.rate = rate.map(clamp_rate);
        self
    }

    pub fn quality(mut self, quality: Option<i32>) -> Self {
        self.options.quality = quality.map(clamp_quality);
        self
    }

    pub fn output_file(mut self, path: Option<&Path>) -> Self {
        self.options.output_file = path.map(Path::to_path_buf);
        self
    }

    pub fn network(mut self, target: Option<NetworkTarget>) -> Self {
        self.options.network = target;
        self
    }

    pub fn audio_device(mut self, device: Option<&str>) -> Self {
        self.options.audio_device = device.map(str::to_string);
        self
    }

    pub fn file_format(mut self, format: Option<FileFormat>) -> Self {
        self.options.file_format = format;
        self
    }

    /// Descriptor for speaking `input` with the default program name.
    pub fn invocation(&self, input: &SpeechInput) -> InvocationDescriptor {
        self.invocation_with(SAY_PROGRAM, input)
    }

    /// Descriptor for speaking `input` with an explicit program path.
    pub fn invocation_with(&self, program: &str, input: &SpeechInput) -> InvocationDescriptor {
        invocation::describe(program, &self.options, input)
    }

    /// Local checks only (rate and quality ranges). Voice existence needs
    /// the catalog and is checked by `SayService::validate`.
    pub(crate) fn check_ranges(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if let Some(rate) = self.options.rate {
            if rate < MIN_RATE {
                errors.push(format!("rate must be at least {}, got {}", MIN_RATE, rate));
            }
        }
        if let Some(quality) = self.options.quality {
            if quality > MAX_QUALITY {
                errors.push(format!(
                    "quality must be between 0 and {}, got {}",
                    MAX_QUALITY, quality
                ));
            }
        }
        errors
    }
}

impl TryFrom<SpeechOptions> for Say {
    type Error = SayError;

    fn try_from(options: SpeechOptions) -> Result<Self> {
        Say::new(options)
    }
}

/// Outcome of validating a `Say` against the host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Collapse failures into a single `InvalidOption` error.
    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(SayError::InvalidOption(self.errors.join("; ")))
        }
    }
}
