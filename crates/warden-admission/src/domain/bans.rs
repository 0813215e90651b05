//! Time-bounded ban list with lazy expiry.
//!
//! Bans carry an absolute expiry. Lookups treat an expired entry as absent
//! and remove it inside the same exclusive critical section that observed
//! it, so a concurrent `ban` of the same key can never be lost to the
//! cleanup and readers never see a stale ban as active.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::info;

struct BanRecord {
    until: Instant,
    /// Wall-clock expiry, captured at ban time for the admin surface.
    until_utc: DateTime<Utc>,
}

/// A live ban as reported to administrative callers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BanEntry {
    /// Banned client key
    pub key: String,
    /// When the ban lapses
    pub expires_at: DateTime<Utc>,
}

/// Per-key ban store. One exclusive lock guards the map; all mutation,
/// including expiry-triggered removal, happens under it.
#[derive(Default)]
pub struct BanStore {
    bans: Mutex<HashMap<String, BanRecord>>,
}

impl BanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ban `key` for `duration` from now. Overwrites any existing expiry;
    /// repeated bans do not extend additively.
    pub fn ban(&self, key: &str, duration: Duration) {
        self.ban_at(key, duration, Instant::now());
    }

    fn ban_at(&self, key: &str, duration: Duration, now: Instant) {
        let record = BanRecord {
            until: now + duration,
            until_utc: Utc::now()
                + chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero()),
        };
        self.bans.lock().insert(key.to_string(), record);
        info!(key = key, duration_secs = duration.as_secs(), "key banned");
    }

    /// Whether `key` is currently banned. An expired entry reads as not
    /// banned and is removed in the same critical section.
    pub fn is_banned(&self, key: &str) -> bool {
        self.is_banned_at(key, Instant::now())
    }

    fn is_banned_at(&self, key: &str, now: Instant) -> bool {
        let mut bans = self.bans.lock();
        match bans.get(key) {
            Some(record) if record.until > now => true,
            Some(_) => {
                bans.remove(key);
                false
            }
            None => false,
        }
    }

    /// Lift the ban on `key`, if any.
    pub fn unban(&self, key: &str) {
        if self.bans.lock().remove(key).is_some() {
            info!(key = key, "ban lifted");
        }
    }

    /// Remove every ban.
    pub fn clear(&self) {
        let mut bans = self.bans.lock();
        let count = bans.len();
        bans.clear();
        if count > 0 {
            info!(count = count, "ban list cleared");
        }
    }

    /// Live bans with their expiry. Expired entries are pruned on the way
    /// out, so every listed ban is active.
    pub fn list(&self) -> Vec<BanEntry> {
        self.list_at(Instant::now())
    }

    fn list_at(&self, now: Instant) -> Vec<BanEntry> {
        let mut bans = self.bans.lock();
        bans.retain(|_, record| record.until > now);
        bans.iter()
            .map(|(key, record)| BanEntry {
                key: key.clone(),
                expires_at: record.until_utc,
            })
            .collect()
    }
}
