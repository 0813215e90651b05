//! Per-key sliding-window request counter.
//!
//! Each key maps to the timestamps of its admitted requests within the
//! window. A check prunes stale timestamps first, then compares the
//! remaining count against capacity. A denied request is not recorded, so
//! it is never charged against a future window.
//!
//! This is a fixed window with pruning, not a leaky bucket: a burst that
//! straddles the window edge can admit up to twice the capacity in a short
//! span. Accepted for this system's threat model.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

/// Admission checks between opportunistic idle-key sweeps.
const EVICTION_STRIDE: u64 = 256;

/// Timestamps for one key, plus the last time the key was seen at all
/// (denied attempts included) for idle eviction.
struct KeyWindow {
    stamps: VecDeque<Instant>,
    last_seen: Instant,
}

struct LimiterState {
    windows: HashMap<String, KeyWindow>,
    checks: u64,
}

/// Sliding-window rate limiter keyed by client address.
///
/// All state lives behind one exclusive lock; no lock is held across calls
/// into other components.
pub struct SlidingWindowLimiter {
    window: Duration,
    capacity: usize,
    retention: Duration,
    state: Mutex<LimiterState>,
}

impl SlidingWindowLimiter {
    /// Create a limiter admitting `capacity` requests per key per `window`.
    ///
    /// `retention` is the idle horizon after which a key with an empty
    /// window is dropped from the map.
    pub fn new(window: Duration, capacity: usize, retention: Duration) -> Self {
        Self {
            window,
            capacity,
            retention,
            state: Mutex::new(LimiterState {
                windows: HashMap::new(),
                checks: 0,
            }),
        }
    }

    /// Check and record an admission for `key`.
    ///
    /// Returns `false` when the key is at capacity; the denied attempt is
    /// not recorded.
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut state = self.state.lock();

        state.checks = state.checks.wrapping_add(1);
        if state.checks % EVICTION_STRIDE == 0 {
            Self::evict_idle_locked(&mut state, now, self.window, self.retention);
        }

        let entry = state
            .windows
            .entry(key.to_string())
            .or_insert_with(|| KeyWindow {
                stamps: VecDeque::new(),
                last_seen: now,
            });
        entry.last_seen = now;

        // Prune before the capacity comparison; order matters.
        Self::prune(&mut entry.stamps, now, self.window);

        if entry.stamps.len() >= self.capacity {
            debug!(key = key, in_window = entry.stamps.len(), "admission denied");
            return false;
        }

        entry.stamps.push_back(now);
        true
    }

    /// Drop keys whose window is empty and which have been idle past the
    /// retention horizon. Runs opportunistically during checks; exposed for
    /// callers that want a deterministic sweep.
    pub fn evict_idle(&self) {
        let mut state = self.state.lock();
        Self::evict_idle_locked(&mut state, Instant::now(), self.window, self.retention);
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.state.lock().windows.len()
    }

    fn prune(stamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(&oldest) = stamps.front() {
            if now.duration_since(oldest) >= window {
                stamps.pop_front();
            } else {
                break;
            }
        }
    }

    fn evict_idle_locked(
        state: &mut LimiterState,
        now: Instant,
        window: Duration,
        retention: Duration,
    ) {
        state.windows.retain(|_, entry| {
            Self::prune(&mut entry.stamps, now, window);
            !entry.stamps.is_empty() || now.duration_since(entry.last_seen) < retention
        });
    }
}
