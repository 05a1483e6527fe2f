//! Executor-bound operations around `say`.
//!
//! `SayService` owns the process executor, the voice cache and the
//! service settings. It speaks, lists and filters voices, validates a
//! `Say` against the host, and wraps the small helper utilities
//! (`killall`, `pgrep`, `defaults`, `system_profiler`).
//!
//! Env overrides (see `ServiceConfig::default`):
//! - SAY_BIN, SAY_TIMEOUT_MS
//! - SAY_CACHE_VOICES, SAY_VOICE_CACHE_TTL_MS, SAY_AUTO_VALIDATE

use crate::cache::{VoiceCache, DEFAULT_VOICE_CACHE_TTL};
use crate::config::SayConfig;
use crate::devices::{self, AudioDevice};
use crate::executor::{CommandExecutor, CommandOutput, ExecOptions, SystemExecutor};
use crate::invocation::{InvocationDescriptor, SpeechInput};
use crate::say::{Say, ValidationResult, SAY_PROGRAM};
use crate::voices::{self, Voice};
use crate::{Result, SayError};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Speaking rate `say` uses when none is given.
pub const DEFAULT_RATE_WPM: u32 = 175;
/// Voice returned when neither the system preference nor the catalog helps.
pub const FALLBACK_VOICE: &str = "Alex";

const VOICE_PREFS_DOMAIN: &str = "com.apple.speech.voice.prefs";
const VOICE_PREFS_KEY: &str = "SelectedVoiceName";

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Program (or path) for `say`.
    pub say_bin: String,
    /// Per-process timeout; none by default.
    pub timeout_ms: Option<u64>,
    pub cache_voices: bool,
    pub cache_ttl: Duration,
    /// Check ranges and voice existence before every prepared run.
    pub auto_validate: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let say_bin = std::env::var("SAY_BIN")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| SAY_PROGRAM.to_string());
        let timeout_ms = std::env::var("SAY_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());
        let cache_voices = std::env::var("SAY_CACHE_VOICES")
            .ok()
            .and_then(|s| parse_bool(&s))
            .unwrap_or(true);
        let cache_ttl = std::env::var("SAY_VOICE_CACHE_TTL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_VOICE_CACHE_TTL);
        let auto_validate = std::env::var("SAY_AUTO_VALIDATE")
            .ok()
            .and_then(|s| parse_bool(&s))
            .unwrap_or(false);

        Self {
            say_bin,
            timeout_ms,
            cache_voices,
            cache_ttl,
            auto_validate,
        }
    }
}

impl ServiceConfig {
    /// Overlay the service-level fields of a persisted config.
    pub fn apply(mut self, config: &SayConfig) -> Self {
        if let Some(v) = config.cache_voices {
            self.cache_voices = v;
        }
        if let Some(ms) = config.cache_duration {
            self.cache_ttl = Duration::from_millis(ms);
        }
        if let Some(v) = config.auto_validate {
            self.auto_validate = v;
        }
        self
    }

    fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }

    /// Bare program name of `say_bin`, for `killall`/`pgrep`.
    fn say_process_name(&self) -> String {
        Path::new(&self.say_bin)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(SAY_PROGRAM)
            .to_string()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Clone)]
pub struct SayService {
    executor: Arc<dyn CommandExecutor>,
    cache: Arc<VoiceCache>,
    cfg: ServiceConfig,
}

impl SayService {
    pub fn new(executor: Arc<dyn CommandExecutor>, cfg: Option<ServiceConfig>) -> Self {
        let cfg = cfg.unwrap_or_default();
        let cache = Arc::new(VoiceCache::new(cfg.cache_ttl));
        Self::with_cache(executor, cache, cfg)
    }

    /// Share a cache between services (or control it from a test).
    ///
    /// The injected cache keeps its own TTL; `cfg.cache_ttl` is not applied.
    pub fn with_cache(
        executor: Arc<dyn CommandExecutor>,
        cache: Arc<VoiceCache>,
        cfg: ServiceConfig,
    ) -> Self {
        if cache.ttl() != cfg.cache_ttl {
            debug!(
                target = "say",
                cache_ttl_ms = cache.ttl().as_millis() as u64,
                config_ttl_ms = cfg.cache_ttl.as_millis() as u64,
                "Injected voice cache TTL overrides configured cache_ttl"
            );
        }
        debug!(
            target = "say",
            bin = %cfg.say_bin,
            cache_voices = cfg.cache_voices,
            auto_validate = cfg.auto_validate,
            "Created say service"
        );
        Self {
            executor,
            cache,
            cfg,
        }
    }

    /// Service backed by real processes and env-derived settings.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemExecutor::new()), None)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.cfg
    }

    pub fn cache(&self) -> &Arc<VoiceCache> {
        &self.cache
    }

    /// Build the invocation for `input` without running it.
    pub fn prepare(&self, say: &Say, input: SpeechInput) -> PreparedSay {
        let descriptor = say.invocation_with(&self.cfg.say_bin, &input);
        PreparedSay {
            descriptor,
            say: say.clone(),
            service: self.clone(),
        }
    }

    /// Speak `text` and wait for `say` to finish.
    pub async fn speak(&self, text: &str, say: &Say) -> Result<CommandOutput> {
        self.prepare(say, SpeechInput::from(text)).run().await
    }

    /// Speak the contents of a text file (`-f <path>`).
    pub async fn speak_file(&self, path: &Path, say: &Say) -> Result<CommandOutput> {
        self.prepare(say, SpeechInput::File(path.to_path_buf()))
            .run()
            .await
    }

    /// Speak each text in turn, sleeping `delay` between items.
    ///
    /// The first failure aborts the batch; nothing after it runs.
    pub async fn speak_batch<I, S>(
        &self,
        texts: I,
        say: &Say,
        delay: Duration,
    ) -> Result<Vec<CommandOutput>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut outputs = Vec::new();
        for (idx, text) in texts.into_iter().enumerate() {
            if idx > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            debug!(target = "say", index = idx, "Speaking batch item");
            outputs.push(self.speak(text.as_ref(), say).await?);
        }
        Ok(outputs)
    }

    /// Installed voices, served from the cache while it is fresh.
    pub async fn voices(&self) -> Result<Vec<Voice>> {
        if !self.cfg.cache_voices {
            return self.fetch_voices().await;
        }
        self.cache.get_or_fetch(|| self.fetch_voices()).await
    }

    pub async fn invalidate_voice_cache(&self) {
        self.cache.invalidate().await;
    }

    pub async fn voices_by_locale(&self, locale: &str) -> Result<Vec<Voice>> {
        Ok(voices::filter_by_locale(&self.voices().await?, locale))
    }

    /// Voices for a language; accepts `fr` or `fr_CA`.
    pub async fn voices_by_language(&self, language: &str) -> Result<Vec<Voice>> {
        Ok(voices::filter_by_language(&self.voices().await?, language))
    }

    pub async fn find_voice(&self, name: &str) -> Result<Option<Voice>> {
        Ok(self.voices().await?.into_iter().find(|v| v.name == name))
    }

    pub async fn voice_exists(&self, name: &str) -> Result<bool> {
        Ok(self.find_voice(name).await?.is_some())
    }

    /// Check `say` against ranges and the installed catalog. Never fails;
    /// problems (including an unreadable catalog) land in `errors`.
    pub async fn validate(&self, say: &Say) -> ValidationResult {
        let mut errors = say.check_ranges();
        if let Some(voice) = &say.options().voice {
            match self.voice_exists(voice).await {
                Ok(true) => {}
                Ok(false) => errors.push(format!("voice '{}' is not installed", voice)),
                Err(e) => errors.push(format!("could not verify voice '{}': {}", voice, e)),
            }
        }
        ValidationResult::from_errors(errors)
    }

    /// Ask any running `say` to stop. Best effort: returns whether a
    /// process was signalled and never fails.
    pub async fn stop(&self) -> bool {
        let args = vec![self.cfg.say_process_name()];
        match self
            .executor
            .run("killall", &args, &self.cfg.exec_options())
            .await
        {
            Ok(out) => {
                debug!(target = "say", stopped = out.success, "killall finished");
                out.success
            }
            Err(e) => {
                warn!(target = "say", error = %e, "Failed to run killall");
                false
            }
        }
    }

    /// Whether a `say` process is currently running.
    pub async fn is_speaking(&self) -> Result<bool> {
        let args = vec!["-x".to_string(), self.cfg.say_process_name()];
        let out = self
            .executor
            .run("pgrep", &args, &self.cfg.exec_options())
            .await?;
        Ok(out.success)
    }

    /// The system voice, falling back to the first installed voice and
    /// then to `FALLBACK_VOICE`.
    pub async fn default_voice(&self) -> String {
        let args = vec![
            "read".to_string(),
            VOICE_PREFS_DOMAIN.to_string(),
            VOICE_PREFS_KEY.to_string(),
        ];
        match self
            .executor
            .run("defaults", &args, &self.cfg.exec_options())
            .await
        {
            Ok(out) if out.success && !out.stdout.trim().is_empty() => {
                return out.stdout.trim().to_string();
            }
            Ok(out) => {
                debug!(target = "say", error = %out.error_text(), "No voice preference set")
            }
            Err(e) => warn!(target = "say", error = %e, "Failed to read voice preference"),
        }

        match self.voices().await {
            Ok(voices) if !voices.is_empty() => voices[0].name.clone(),
            Ok(_) => FALLBACK_VOICE.to_string(),
            Err(e) => {
                warn!(target = "say", error = %e, "Falling back to built-in default voice");
                FALLBACK_VOICE.to_string()
            }
        }
    }

    pub async fn audio_devices(&self) -> Result<Vec<AudioDevice>> {
        let args: Vec<String> = devices::PROFILER_ARGS
            .iter()
            .map(|s| s.to_string())
            .collect();
        let out = self
            .executor
            .run(devices::PROFILER_PROGRAM, &args, &self.cfg.exec_options())
            .await?;
        if !out.success {
            return Err(SayError::ProcessFailed {
                program: devices::PROFILER_PROGRAM.to_string(),
                message: out.error_text(),
            });
        }
        devices::parse_audio_devices(&out.stdout)
    }

    async fn fetch_voices(&self) -> Result<Vec<Voice>> {
        let args = vec!["-v".to_string(), "?".to_string()];
        let out = self
            .executor
            .run(&self.cfg.say_bin, &args, &self.cfg.exec_options())
            .await?;
        if !out.success {
            return Err(SayError::VoiceFetch(out.error_text()));
        }
        Ok(voices::parse_voice_list(out.lines()))
    }
}

/// A built invocation waiting to be run.
pub struct PreparedSay {
    pub descriptor: InvocationDescriptor,
    say: Say,
    service: SayService,
}

impl PreparedSay {
    pub fn command(&self) -> &str {
        &self.descriptor.command
    }

    /// Run the invocation to completion. A non-zero exit is an error.
    pub async fn run(self) -> Result<CommandOutput> {
        let service = &self.service;
        if service.cfg.auto_validate {
            let errors = self.say.check_ranges();
            if !errors.is_empty() {
                return Err(SayError::InvalidOption(errors.join("; ")));
            }
            if let Some(voice) = &self.say.options().voice {
                if !service.voice_exists(voice).await? {
                    return Err(SayError::VoiceNotFound(voice.clone()));
                }
            }
        }

        info!(target = "say", command = %self.descriptor.command, "Speaking");
        let out = service
            .executor
            .run(
                &self.descriptor.program,
                &self.descriptor.exec_args,
                &service.cfg.exec_options(),
            )
            .await?;
        if !out.success {
            return Err(SayError::ProcessFailed {
                program: self.descriptor.program.clone(),
                message: out.error_text(),
            });
        }
        Ok(out)
    }
}

/// Rough speaking time for `text` at `rate` words per minute
/// (`DEFAULT_RATE_WPM` when unset).
pub fn estimate_duration(text: &str, rate: Option<u32>) -> Duration {
    let words = text.split_whitespace().count() as f64;
    let wpm = rate.unwrap_or(DEFAULT_RATE_WPM).max(1) as f64;
    Duration::from_secs_f64(words * 60.0 / wpm)
}
