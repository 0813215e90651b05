//! Outbound ports: persistence collaborators the sampler hands data to.
//!
//! Persistence is owned externally; the traits here are the whole contract.
//! [`MemoryAlertStore`] and [`MemorySnapshotLog`] are in-process reference
//! implementations used by tests and by embedders that have not wired a
//! database yet.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::alerts::{Alert, AlertKind};
use crate::error::TelemetryResult;
use crate::snapshot::SystemSnapshot;

/// Alert persistence. Deduplication depends on the existence check keyed
/// by (kind, unresolved).
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Whether an unresolved alert of `kind` already exists.
    async fn exists_unresolved(&self, kind: AlertKind) -> TelemetryResult<bool>;

    /// Persist a new alert.
    async fn save(&self, alert: &Alert) -> TelemetryResult<()>;

    /// Mark an alert resolved with a resolution timestamp. Returns the
    /// updated alert, or `None` for an unknown id.
    async fn resolve(&self, id: Uuid) -> TelemetryResult<Option<Alert>>;

    /// All unresolved alerts.
    async fn unresolved(&self) -> TelemetryResult<Vec<Alert>>;
}

/// Best-effort snapshot archival.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn save(&self, snapshot: &SystemSnapshot) -> TelemetryResult<()>;
}

/// In-memory alert store. Alerts are appended, never removed; resolution
/// mutates in place under the exclusive lock.
#[derive(Default)]
pub struct MemoryAlertStore {
    alerts: RwLock<Vec<Alert>>,
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every alert ever recorded, resolved included.
    pub fn all(&self) -> Vec<Alert> {
        self.alerts.read().clone()
    }
}

#[async_trait]
impl AlertSink for MemoryAlertStore {
    async fn exists_unresolved(&self, kind: AlertKind) -> TelemetryResult<bool> {
        Ok(self
            .alerts
            .read()
            .iter()
            .any(|a| a.kind == kind && !a.resolved))
    }

    async fn save(&self, alert: &Alert) -> TelemetryResult<()> {
        self.alerts.write().push(alert.clone());
        Ok(())
    }

    async fn resolve(&self, id: Uuid) -> TelemetryResult<Option<Alert>> {
        let mut alerts = self.alerts.write();
        match alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                if !alert.resolved {
                    alert.resolved = true;
                    alert.resolved_at = Some(Utc::now());
                }
                Ok(Some(alert.clone()))
            }
            None => Ok(None),
        }
    }

    async fn unresolved(&self) -> TelemetryResult<Vec<Alert>> {
        Ok(self
            .alerts
            .read()
            .iter()
            .filter(|a| !a.resolved)
            .cloned()
            .collect())
    }
}

/// In-memory snapshot archive, newest last.
#[derive(Default)]
pub struct MemorySnapshotLog {
    snapshots: RwLock<Vec<SystemSnapshot>>,
}

impl MemorySnapshotLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }

    pub fn latest(&self) -> Option<SystemSnapshot> {
        self.snapshots.read().last().cloned()
    }
}

#[async_trait]
impl SnapshotSink for MemorySnapshotLog {
    async fn save(&self, snapshot: &SystemSnapshot) -> TelemetryResult<()> {
        self.snapshots.write().push(snapshot.clone());
        Ok(())
    }
}
