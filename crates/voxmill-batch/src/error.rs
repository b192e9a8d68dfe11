//! Error types for batch rendering.

use thiserror::Error;
use voxmill_audio::AudioError;
use voxmill_spec::BackendError;

/// Result type for orchestrator operations.
pub type BatchResult<T> = Result<T, BatchError>;

/// Failure reported by a [`Synthesizer`](crate::Synthesizer).
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Nothing to say.
    #[error("item text is empty")]
    EmptyText,

    /// The synthesizer has no such voice.
    #[error("unknown voice '{0}'")]
    UnknownVoice(String),

    /// The synthesis backend failed.
    #[error("synthesis backend failed: {0}")]
    Backend(String),
}

impl BackendError for SynthesisError {
    fn code(&self) -> &'static str {
        match self {
            SynthesisError::EmptyText => "SYNTH_001",
            SynthesisError::UnknownVoice(_) => "SYNTH_002",
            SynthesisError::Backend(_) => "SYNTH_003",
        }
    }

    fn category(&self) -> &'static str {
        "synthesis"
    }
}

/// Failure of a single item. Recorded on the job; never aborts it.
#[derive(Debug, Error)]
pub enum ItemError {
    /// Synthesis of the primary or secondary voice failed.
    #[error("{0}")]
    Synthesis(#[from] SynthesisError),

    /// An effect, mix or watermark stage failed.
    #[error("{0}")]
    Audio(#[from] AudioError),
}

/// Errors surfaced by the orchestrator itself.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The request failed validation.
    #[error("invalid batch request: {0}")]
    InvalidRequest(String),

    /// A job with this id is still running.
    #[error("job '{0}' is already running")]
    DuplicateJob(String),

    /// A fault outside the per-item loop. The job ends `failed`.
    #[error("orchestration failed: {0}")]
    Orchestration(String),

    /// No async runtime to submit onto.
    #[error("async runtime unavailable: {0}")]
    Runtime(String),
}

impl BackendError for BatchError {
    fn code(&self) -> &'static str {
        match self {
            BatchError::InvalidRequest(_) => "BATCH_001",
            BatchError::DuplicateJob(_) => "BATCH_002",
            BatchError::Orchestration(_) => "BATCH_003",
            BatchError::Runtime(_) => "BATCH_004",
        }
    }

    fn category(&self) -> &'static str {
        "batch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(SynthesisError::EmptyText.code(), "SYNTH_001");
        assert_eq!(BatchError::Orchestration("x".into()).code(), "BATCH_003");
        assert_eq!(BatchError::DuplicateJob("x".into()).category(), "batch");
    }

    #[test]
    fn test_item_error_is_transparent() {
        let err = ItemError::from(SynthesisError::UnknownVoice("alto".into()));
        assert_eq!(err.to_string(), "unknown voice 'alto'");
        let err = ItemError::from(AudioError::dimension("1 vs 2 channels"));
        assert_eq!(err.to_string(), "dimension mismatch: 1 vs 2 channels");
    }
}
