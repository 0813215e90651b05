//! Telemetry configuration with validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::TelemetryError;

/// Percentage ceilings that turn a snapshot into alert candidates.
/// Read-only to the evaluator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// CPU utilization ceiling (percent)
    pub cpu_percent: f32,
    /// Memory utilization ceiling (percent)
    pub memory_percent: f32,
    /// Disk utilization ceiling (percent)
    pub disk_percent: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu_percent: 80.0,
            memory_percent: 80.0,
            disk_percent: 90.0,
        }
    }
}

/// Telemetry sampler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Interval between samples
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Mount point whose disk utilization is sampled
    pub disk_mount: String,
    /// Alerting ceilings
    pub thresholds: Thresholds,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            disk_mount: "/".to_string(),
            thresholds: Thresholds::default(),
        }
    }
}

impl TelemetryConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), TelemetryError> {
        if self.interval.is_zero() {
            return Err(TelemetryError::Config("interval cannot be 0".into()));
        }
        for (name, value) in [
            ("cpu_percent", self.thresholds.cpu_percent),
            ("memory_percent", self.thresholds.memory_percent),
            ("disk_percent", self.thresholds.disk_percent),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(TelemetryError::Config(format!(
                    "threshold {} must be within 0..=100, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
