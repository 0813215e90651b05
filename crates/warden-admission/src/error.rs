//! Admission subsystem errors.
//!
//! Rejected requests are not errors; see [`crate::service::Admission`].
//! These variants cover configuration problems only, surfaced at load time.

/// Errors produced while building or reconfiguring the admission components.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Allow rule that is neither an IP literal nor a CIDR block
    #[error("invalid allow rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },
}

/// Result type for admission configuration operations
pub type AdmissionResult<T> = Result<T, AdmissionError>;
