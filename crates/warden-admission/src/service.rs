//! Admission gate: the composed admit-or-reject decision.

use std::net::IpAddr;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::config::AdmissionConfig;
use crate::domain::allowlist::{parse_rules, AllowList};
use crate::domain::bans::{BanEntry, BanStore};
use crate::domain::limiter::SlidingWindowLimiter;
use crate::error::AdmissionResult;

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Key is under an active ban
    Banned,
    /// Key tripped the sliding-window limit on this request
    RateLimited,
    /// Address failed the allow list of a restricted endpoint
    Forbidden,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Banned => "banned",
            RejectReason::RateLimited => "rate_limited",
            RejectReason::Forbidden => "forbidden",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an admission check. A rejection is a decision, not an error;
/// the transport layer maps it to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected(RejectReason),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Composes the ban store, the sliding-window limiter, and the allow list
/// into the request-admission surface consumed by the transport layer.
pub struct AdmissionGate {
    limiter: SlidingWindowLimiter,
    bans: BanStore,
    allow_list: AllowList,
    ban_duration: Duration,
}

impl AdmissionGate {
    /// Build a gate from validated configuration.
    pub fn new(config: &AdmissionConfig) -> AdmissionResult<Self> {
        config.validate()?;
        let rules = parse_rules(&config.allow_rules)?;
        Ok(Self {
            limiter: SlidingWindowLimiter::new(config.window, config.capacity, config.retention),
            bans: BanStore::new(),
            allow_list: AllowList::new(rules),
            ban_duration: config.ban_duration,
        })
    }

    /// Decide admission for general traffic from `addr`.
    ///
    /// Check order is load-bearing:
    /// 1. An already-banned key is rejected without touching the limiter,
    ///    so a ban never charges the key's window.
    /// 2. A key that trips the limiter is banned on that same request and
    ///    rejected; there is no grace period before the first ban.
    /// 3. Otherwise the request is admitted (and counted).
    ///
    /// Each component takes its own lock; the sequence as a whole is not
    /// atomic. Two concurrent requests can both pass the ban check before
    /// either records into the limiter. Immaterial at this window
    /// granularity; do not collapse the steps into one critical section.
    pub fn check(&self, addr: &str) -> Admission {
        if self.bans.is_banned(addr) {
            return Admission::Rejected(RejectReason::Banned);
        }

        if !self.limiter.allow(addr) {
            warn!(
                addr = addr,
                ban_secs = self.ban_duration.as_secs(),
                "rate limit tripped, escalating to ban"
            );
            self.bans.ban(addr, self.ban_duration);
            return Admission::Rejected(RejectReason::RateLimited);
        }

        Admission::Admitted
    }

    /// Independent gate for network-restricted endpoints.
    pub fn check_allowed(&self, addr: IpAddr) -> bool {
        self.allow_list.is_allowed(addr)
    }

    /// Replace the allow rules. Malformed rules reject the whole update;
    /// the live set is untouched on failure.
    pub fn update_allow_list(&self, specs: &[String]) -> AdmissionResult<()> {
        let rules = parse_rules(specs)?;
        self.allow_list.replace(rules);
        Ok(())
    }

    /// Lift every active ban.
    pub fn clear_bans(&self) {
        self.bans.clear();
    }

    /// Lift the ban on one key.
    pub fn unban(&self, addr: &str) {
        self.bans.unban(addr);
    }

    /// Active bans with expiry, for the admin surface.
    pub fn list_bans(&self) -> Vec<BanEntry> {
        self.bans.list()
    }
}
