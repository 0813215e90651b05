//! Admission configuration with validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::allowlist::parse_rules;
use crate::error::AdmissionError;

/// Admission control configuration.
///
/// Loaded by the embedding process; read-only to this crate after
/// [`AdmissionConfig::validate`] has accepted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Sliding window length for the per-key request counter
    #[serde(with = "humantime_serde")]
    pub window: Duration,
    /// Admissions allowed per key per window
    pub capacity: usize,
    /// Ban length applied when a key trips the limiter
    #[serde(with = "humantime_serde")]
    pub ban_duration: Duration,
    /// Idle horizon after which an empty key entry is evicted from the limiter
    #[serde(with = "humantime_serde")]
    pub retention: Duration,
    /// Allow rules for network-restricted endpoints (IP literals or CIDR blocks).
    /// Empty means every address is allowed.
    pub allow_rules: Vec<String>,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            capacity: 100,
            ban_duration: Duration::from_secs(5 * 60),
            retention: Duration::from_secs(10 * 60),
            allow_rules: Vec::new(),
        }
    }
}

impl AdmissionConfig {
    /// Validate configuration.
    ///
    /// Malformed allow rules are rejected here, never mid-request.
    pub fn validate(&self) -> Result<(), AdmissionError> {
        if self.capacity == 0 {
            return Err(AdmissionError::Config("capacity cannot be 0".into()));
        }
        if self.window.is_zero() {
            return Err(AdmissionError::Config("window cannot be 0".into()));
        }
        if self.ban_duration.is_zero() {
            return Err(AdmissionError::Config("ban_duration cannot be 0".into()));
        }
        parse_rules(&self.allow_rules)?;
        Ok(())
    }
}
