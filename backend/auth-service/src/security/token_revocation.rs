//! Token revocation for logout
//!
//! Process-local expiring set of revoked bearer tokens. Each entry lives
//! exactly as long as the token it revokes had left to live, so the set never
//! grows beyond the tokens that could still verify.
//!
//! Expired entries are reclaimed two ways:
//! - lazily, when a lookup finds them expired
//! - by a periodic sweep ([`RevocationCache::spawn_sweeper`]) for entries that
//!   are never looked up again
//!
//! The set is lost on restart.

use chrono::Duration as ChronoDuration;
use crypto_core::hash::token_fingerprint;
use dashmap::DashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Upper bound for an entry's lifetime, equal to the token validity window
pub const MAX_ENTRY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default interval between background sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Revocation marker with its lapse instant
#[derive(Debug, Clone, Copy)]
struct RevokedEntry {
    expires_at: Instant,
}

impl RevokedEntry {
    #[inline]
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug)]
pub struct RevocationCache {
    entries: DashMap<String, RevokedEntry>,
    max_ttl: Duration,
}

impl Default for RevocationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RevocationCache {
    pub fn new() -> Self {
        Self::with_max_ttl(MAX_ENTRY_TTL)
    }

    pub fn with_max_ttl(max_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_ttl,
        }
    }

    /// Mark `token` revoked for `remaining` (the token's remaining lifetime).
    ///
    /// Non-positive durations are ignored: the token is already dead.
    pub fn revoke(&self, token: &str, remaining: ChronoDuration) {
        let ttl = match remaining.to_std() {
            Ok(ttl) if !ttl.is_zero() => ttl.min(self.max_ttl),
            _ => {
                debug!(
                    token = %token_fingerprint(token),
                    "Skipping revocation of token with no remaining lifetime"
                );
                return;
            }
        };

        self.entries.insert(
            token.to_string(),
            RevokedEntry {
                expires_at: Instant::now() + ttl,
            },
        );

        info!(
            token = %token_fingerprint(token),
            ttl_secs = ttl.as_secs(),
            "Token revoked"
        );
    }

    /// Whether `token` is currently revoked. Expired entries read as absent.
    pub fn is_revoked(&self, token: &str) -> bool {
        let now = Instant::now();

        match self.entries.get(token) {
            None => return false,
            Some(entry) if !entry.is_expired(now) => return true,
            Some(_) => {}
        }

        // Re-check under the write lock so a concurrent re-revocation survives.
        self.entries
            .remove_if(token, |_, entry| entry.is_expired(Instant::now()));
        false
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start a background task that purges expired entries every `interval`.
    ///
    /// The task holds a weak reference and exits once the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let Some(cache) = cache.upgrade() else {
                    debug!("Revocation cache dropped, sweeper exiting");
                    break;
                };

                let removed = cache.purge_expired();
                if removed > 0 {
                    info!(
                        event = "revocation_sweep",
                        removed,
                        remaining = cache.len(),
                        "Purged expired revocation entries"
                    );
                }
            }
        })
    }
}
