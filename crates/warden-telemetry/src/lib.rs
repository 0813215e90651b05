//! System telemetry for the dashboard: a scheduled sampler that reads OS
//! counters into immutable snapshots, publishes them atomically, and derives
//! deduplicated threshold alerts.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TELEMETRY SAMPLER                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  interval tick                                              │
//! │      │                                                      │
//! │      ▼                                                      │
//! │  SystemProbe ──► SystemSnapshot ──► publish (Arc swap)      │
//! │  (no locks held)        │                                   │
//! │                         ├──► AlertEvaluator ──► AlertSink   │
//! │                         └──► SnapshotSink                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Readers of the current snapshot never block on OS reads: probing happens
//! outside every lock and publication is a pointer replacement. Sink
//! failures are logged and never interrupt the next cycle.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod alerts;
pub mod config;
pub mod error;
pub mod ports;
pub mod probes;
pub mod service;
pub mod snapshot;

pub use alerts::{evaluate, Alert, AlertKind, Severity};
pub use config::{TelemetryConfig, Thresholds};
pub use error::TelemetryError;
pub use ports::outbound::{AlertSink, MemoryAlertStore, MemorySnapshotLog, SnapshotSink};
pub use probes::{ProbeReadings, SysinfoProbe, SystemProbe};
pub use service::TelemetrySampler;
pub use snapshot::SystemSnapshot;
