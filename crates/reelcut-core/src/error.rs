// crates/reelcut-core/src/error.rs
//
// Typed error taxonomy for the clip production pipeline. Every fallible
// operation in C1–C7 returns one of these; C8 is the only component allowed
// to recover from a subset of them locally (see render orchestrator).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReelcutError {
    #[error("invalid input: {0}")]
    InputInvalid(String),

    #[error("audio decode failed: {0}")]
    DecodeError(String),

    #[error("voice-activity detector unavailable: {0}")]
    DetectorUnavailable(String),

    #[error("edit plan is empty — no segments kept")]
    EmptyPlan,

    #[error("slice [{start}, {end}) out of source bounds [0, {source_duration})")]
    SliceOutOfRange {
        start: f64,
        end: f64,
        source_duration: f64,
    },

    #[error("planner invariant violated: {0}")]
    PlannerInvariant(String),

    #[error("external service '{service}' timed out after {timeout_secs}s")]
    ExternalServiceTimeout { service: String, timeout_secs: f64 },

    #[error("media tool failed (exit {exit_code:?}): {stderr_tail}")]
    MediaToolFailed {
        command: String,
        exit_code: Option<i32>,
        stderr_tail: String,
    },

    #[error("job cancelled")]
    Cancelled,
}

impl ReelcutError {
    /// Stable, driver-visible error code — `§7`'s `{error:{code,message}}`.
    pub fn code(&self) -> &'static str {
        match self {
            ReelcutError::InputInvalid(_) => "InputInvalid",
            ReelcutError::DecodeError(_) => "DecodeError",
            ReelcutError::DetectorUnavailable(_) => "DetectorUnavailable",
            ReelcutError::EmptyPlan => "EmptyPlan",
            ReelcutError::SliceOutOfRange { .. } => "SliceOutOfRange",
            ReelcutError::PlannerInvariant(_) => "PlannerInvariant",
            ReelcutError::ExternalServiceTimeout { .. } => "ExternalServiceTimeout",
            ReelcutError::MediaToolFailed { .. } => "MediaToolFailed",
            ReelcutError::Cancelled => "Cancelled",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReelcutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_stable_per_variant() {
        assert_eq!(ReelcutError::EmptyPlan.code(), "EmptyPlan");
        assert_eq!(
            ReelcutError::SliceOutOfRange { start: 0.0, end: 1.0, source_duration: 0.5 }.code(),
            "SliceOutOfRange"
        );
    }
}
