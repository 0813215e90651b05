//! Cross-component integration tests.

pub mod gate_escalation;
pub mod telemetry_pipeline;
