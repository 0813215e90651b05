//! Immutable system snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::probes::ProbeReadings;

/// A fully-formed reading of the host at one instant.
///
/// Snapshots are published by whole-value replacement behind an `Arc`;
/// no field is ever mutated after construction, so a reader holds either
/// the complete old value or the complete new one. Metrics a probe could
/// not supply are zeroed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    /// CPU utilization, percent
    pub cpu_percent: f32,
    /// Memory utilization, percent
    pub memory_percent: f32,
    /// Disk utilization of the configured mount, percent
    pub disk_percent: f32,
    /// Host uptime, seconds
    pub uptime_secs: u64,
    /// 1/5/15-minute load averages
    pub load_avg: [f64; 3],
    /// Cumulative bytes received across interfaces
    pub net_rx_bytes: u64,
    /// Cumulative bytes transmitted across interfaces
    pub net_tx_bytes: u64,
    /// Capture timestamp
    pub captured_at: DateTime<Utc>,
}

impl SystemSnapshot {
    /// Assemble a snapshot from per-field probe readings, zeroing whatever
    /// the probe could not supply.
    pub fn from_readings(readings: ProbeReadings, captured_at: DateTime<Utc>) -> Self {
        Self {
            cpu_percent: readings.cpu_percent.unwrap_or(0.0),
            memory_percent: readings.memory_percent.unwrap_or(0.0),
            disk_percent: readings.disk_percent.unwrap_or(0.0),
            uptime_secs: readings.uptime_secs.unwrap_or(0),
            load_avg: readings.load_avg.unwrap_or([0.0; 3]),
            net_rx_bytes: readings.net_rx_bytes.unwrap_or(0),
            net_tx_bytes: readings.net_tx_bytes.unwrap_or(0),
            captured_at,
        }
    }
}
