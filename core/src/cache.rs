//! Time-bounded cache for the voice catalog.
//!
//! One slot, no key. Timestamps come from `tokio::time::Instant` so tests
//! can pause and advance the clock.

use crate::voices::Voice;
use crate::Result;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

/// Default lifetime of a cached catalog.
pub const DEFAULT_VOICE_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug)]
struct CachedVoices {
    voices: Vec<Voice>,
    fetched_at: Instant,
}

#[derive(Debug)]
pub struct VoiceCache {
    ttl: Duration,
    slot: Mutex<Option<CachedVoices>>,
}

impl Default for VoiceCache {
    fn default() -> Self {
        Self::new(DEFAULT_VOICE_CACHE_TTL)
    }
}

impl VoiceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached catalog if present and younger than the TTL.
    pub async fn get(&self) -> Option<Vec<Voice>> {
        let slot = self.slot.lock().await;
        self.fresh(&slot).map(|c| c.voices.clone())
    }

    pub async fn store(&self, voices: Vec<Voice>) {
        let mut slot = self.slot.lock().await;
        *slot = Some(CachedVoices {
            voices,
            fetched_at: Instant::now(),
        });
    }

    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        if slot.take().is_some() {
            debug!(target = "say", "Voice cache invalidated");
        }
    }

    pub async fn is_fresh(&self) -> bool {
        let slot = self.slot.lock().await;
        self.fresh(&slot).is_some()
    }

    /// Return the cached catalog, or run `fetch` and cache its result.
    ///
    /// The lock is held across `fetch`, so concurrent callers wait for the
    /// first fetch instead of starting their own. Failed fetches are not
    /// cached.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Vec<Voice>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Voice>>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(cached) = self.fresh(&slot) {
            return Ok(cached.voices.clone());
        }

        let voices = fetch().await?;
        info!(target = "say", count = voices.len(), "Voice catalog refreshed");
        *slot = Some(CachedVoices {
            voices: voices.clone(),
            fetched_at: Instant::now(),
        });
        Ok(voices)
    }

    fn fresh<'a>(&self, slot: &'a Option<CachedVoices>) -> Option<&'a CachedVoices> {
        slot.as_ref().filter(|c| c.fetched_at.elapsed() < self.ttl)
    }
}
