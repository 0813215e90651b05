//! Telemetry subsystem errors.

/// Errors surfaced by the telemetry core and its collaborator sinks.
///
/// Probe failures never appear here: a metric source that cannot be read
/// is tolerated per field (see [`crate::probes`]). Sink variants carry the
/// collaborator's message; the sampler reports them and keeps running.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Alert persistence collaborator failed
    #[error("alert sink failure: {0}")]
    AlertSink(String),

    /// Snapshot archival collaborator failed
    #[error("snapshot sink failure: {0}")]
    SnapshotSink(String),
}

/// Result type for telemetry operations
pub type TelemetryResult<T> = Result<T, TelemetryError>;
