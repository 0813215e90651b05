//! Telemetry sampler: the scheduled background task and its lifecycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::alerts::{evaluate, Alert};
use crate::config::TelemetryConfig;
use crate::error::TelemetryResult;
use crate::ports::outbound::{AlertSink, SnapshotSink};
use crate::probes::SystemProbe;
use crate::snapshot::SystemSnapshot;

/// Bound on how long `stop` waits for the task to acknowledge.
const STOP_GRACE: Duration = Duration::from_secs(5);

/// Shared state the background task and the request paths both touch.
struct SamplerInner {
    config: TelemetryConfig,
    probe: Arc<dyn SystemProbe>,
    alerts: Arc<dyn AlertSink>,
    snapshots: Arc<dyn SnapshotSink>,
    /// Published snapshot. Replaced wholesale; the write lock is held only
    /// for the pointer swap, never while probing.
    current: RwLock<Option<Arc<SystemSnapshot>>>,
}

/// Handle to a running sampling task.
struct SamplerTask {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Periodically samples the host into immutable snapshots, publishes them,
/// and derives deduplicated threshold alerts.
///
/// `start`/`stop` are idempotent from any thread: double-start leaves one
/// task, and stop without a running task (including stop-before-start)
/// returns immediately. The task observes shutdown at its next wake, and
/// `stop` waits for the acknowledgment with a fixed bound.
pub struct TelemetrySampler {
    inner: Arc<SamplerInner>,
    task: Mutex<Option<SamplerTask>>,
}

impl TelemetrySampler {
    /// Build a sampler from validated configuration and collaborators.
    pub fn new(
        config: TelemetryConfig,
        probe: Arc<dyn SystemProbe>,
        alerts: Arc<dyn AlertSink>,
        snapshots: Arc<dyn SnapshotSink>,
    ) -> TelemetryResult<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(SamplerInner {
                config,
                probe,
                alerts,
                snapshots,
                current: RwLock::new(None),
            }),
            task: Mutex::new(None),
        })
    }

    /// Launch the scheduled task. No-op when one is already running.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if let Some(existing) = task.as_ref() {
            if !existing.handle.is_finished() {
                debug!("sampler already running");
                return;
            }
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(run(inner, shutdown_rx));
        *task = Some(SamplerTask {
            shutdown_tx,
            handle,
        });
        info!(
            interval_secs = self.inner.config.interval.as_secs(),
            "telemetry sampler started"
        );
    }

    /// Signal the task to exit and wait (bounded) for the acknowledgment.
    /// No-op when nothing is running, including stop-before-start.
    pub async fn stop(&self) {
        let task = self.task.lock().take();
        let Some(SamplerTask {
            shutdown_tx,
            handle,
        }) = task
        else {
            debug!("sampler not running, stop is a no-op");
            return;
        };

        // The task may already have exited; a dead receiver is fine.
        let _ = shutdown_tx.send(true);

        let abort = handle.abort_handle();
        match tokio::time::timeout(STOP_GRACE, handle).await {
            Ok(_) => info!("telemetry sampler stopped"),
            Err(_) => {
                warn!(
                    grace_secs = STOP_GRACE.as_secs(),
                    "sampler did not acknowledge stop in time, aborting"
                );
                abort.abort();
            }
        }
    }

    /// Whether a sampling task is currently live.
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .map(|t| !t.handle.is_finished())
            .unwrap_or(false)
    }

    /// The most recently published snapshot. Non-blocking: the read lock is
    /// held only to clone the `Arc`.
    pub fn current_snapshot(&self) -> Option<Arc<SystemSnapshot>> {
        self.inner.current.read().clone()
    }

    /// Run one sampling cycle immediately, outside the schedule. Used at
    /// startup for an immediate first reading and heavily by tests.
    pub async fn sample_once(&self) -> Arc<SystemSnapshot> {
        self.inner.sample_once().await
    }

    /// Unresolved alerts, for the reporting surface.
    pub async fn active_alerts(&self) -> TelemetryResult<Vec<Alert>> {
        self.inner.alerts.unresolved().await
    }

    /// Resolve an alert by id. A later breach of the same kind raises a
    /// fresh alert.
    pub async fn resolve_alert(&self, id: Uuid) -> TelemetryResult<Option<Alert>> {
        self.inner.alerts.resolve(id).await
    }
}

/// The scheduled loop. Wakes on the interval, exits on the watch signal.
async fn run(inner: Arc<SamplerInner>, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(inner.config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                inner.sample_once().await;
            }
            _ = shutdown.changed() => {
                debug!("sampler shutdown signal received");
                break;
            }
        }
    }
}

impl SamplerInner {
    async fn sample_once(&self) -> Arc<SystemSnapshot> {
        // OS reads happen before any lock is taken.
        let readings = self.probe.sample();
        let snapshot = Arc::new(SystemSnapshot::from_readings(readings, Utc::now()));

        *self.current.write() = Some(Arc::clone(&snapshot));

        self.process_alerts(&snapshot).await;

        if let Err(e) = self.snapshots.save(&snapshot).await {
            error!(error = %e, "snapshot archival failed");
        }

        snapshot
    }

    /// Persist each candidate unless an unresolved alert of its kind is
    /// already open. Sink failures are reported and swallowed; the
    /// in-memory state and the next cycle are unaffected.
    async fn process_alerts(&self, snapshot: &SystemSnapshot) {
        for candidate in evaluate(snapshot, &self.config.thresholds) {
            match self.alerts.exists_unresolved(candidate.kind).await {
                Ok(true) => {
                    debug!(kind = %candidate.kind, "unresolved alert already open, suppressing");
                }
                Ok(false) => match self.alerts.save(&candidate).await {
                    Ok(()) => warn!(
                        kind = %candidate.kind,
                        severity = ?candidate.severity,
                        message = %candidate.message,
                        "alert raised"
                    ),
                    Err(e) => error!(kind = %candidate.kind, error = %e, "failed to persist alert"),
                },
                Err(e) => {
                    error!(kind = %candidate.kind, error = %e, "alert existence check failed");
                }
            }
        }
    }
}
