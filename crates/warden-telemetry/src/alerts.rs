//! Threshold alerts derived from snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Thresholds;
use crate::snapshot::SystemSnapshot;

/// What breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    CpuHigh,
    MemoryHigh,
    DiskHigh,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::CpuHigh => "cpu_high",
            AlertKind::MemoryHigh => "memory_high",
            AlertKind::DiskHigh => "disk_high",
        }
    }

    /// Severity is fixed per kind: disk exhaustion takes the stack down,
    /// cpu/memory pressure degrades it.
    pub fn severity(&self) -> Severity {
        match self {
            AlertKind::DiskHigh => Severity::Critical,
            AlertKind::CpuHigh | AlertKind::MemoryHigh => Severity::Warning,
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert weight, fixed per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Critical,
}

/// A threshold breach. Never deleted; resolution flips `resolved` and
/// stamps `resolved_at`, after which the same kind may fire again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub kind: AlertKind,
    pub message: String,
    pub severity: Severity,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Alert {
    /// New unresolved alert of `kind`.
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            severity: kind.severity(),
            resolved: false,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }
}

/// Compare a snapshot against the ceilings and produce one candidate per
/// breached metric. Pure; deduplication against unresolved alerts happens
/// at the sink boundary.
pub fn evaluate(snapshot: &SystemSnapshot, thresholds: &Thresholds) -> Vec<Alert> {
    let mut candidates = Vec::new();

    if snapshot.cpu_percent > thresholds.cpu_percent {
        candidates.push(Alert::new(
            AlertKind::CpuHigh,
            format!(
                "CPU utilization {:.1}% exceeds ceiling {:.1}%",
                snapshot.cpu_percent, thresholds.cpu_percent
            ),
        ));
    }
    if snapshot.memory_percent > thresholds.memory_percent {
        candidates.push(Alert::new(
            AlertKind::MemoryHigh,
            format!(
                "memory utilization {:.1}% exceeds ceiling {:.1}%",
                snapshot.memory_percent, thresholds.memory_percent
            ),
        ));
    }
    if snapshot.disk_percent > thresholds.disk_percent {
        candidates.push(Alert::new(
            AlertKind::DiskHigh,
            format!(
                "disk utilization {:.1}% exceeds ceiling {:.1}%",
                snapshot.disk_percent, thresholds.disk_percent
            ),
        ));
    }

    candidates
}
