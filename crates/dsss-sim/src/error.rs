//! Simulation errors

use dsss_core::DspError;

/// Result type for engine operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors surfaced by the simulation engine.
///
/// Decoding problems are never errors: a garbled link still produces a
/// (garbled) result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// A request parameter failed validation; nothing was computed
    #[error("invalid parameter '{field}': {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// No stored run has this id (never created, evicted or expired)
    #[error("simulation not found: {0}")]
    RunNotFound(String),

    #[error("unknown stage: {0}")]
    UnknownStage(String),
}

impl SimError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// True for lookups that found nothing (an HTTP layer would answer 404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RunNotFound(_) | Self::UnknownStage(_))
    }

    /// True for rejected requests (an HTTP layer would answer 400)
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

impl From<DspError> for SimError {
    fn from(err: DspError) -> Self {
        match err {
            DspError::InvalidArgument { name, reason } => Self::InvalidParameter {
                field: name,
                reason,
            },
            DspError::UnknownStage(name) => Self::UnknownStage(name),
            DspError::UnknownCodingScheme(name) => Self::InvalidParameter {
                field: "coding_scheme",
                reason: format!("unknown scheme '{name}'"),
            },
        }
    }
}
