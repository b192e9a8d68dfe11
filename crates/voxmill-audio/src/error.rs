//! Error types for the audio core.

use thiserror::Error;
use voxmill_spec::BackendError;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while transforming audio.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Channel counts or lengths do not line up.
    #[error("dimension mismatch: {message}")]
    DimensionMismatch {
        /// What did not match.
        message: String,
    },

    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Two buffers that must share a sample rate do not.
    #[error("sample rate mismatch: {expected} Hz vs {found} Hz")]
    SampleRateMismatch {
        /// Sample rate of the first buffer.
        expected: u32,
        /// Sample rate of the second buffer.
        found: u32,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Unknown watermark method name.
    #[error("unsupported watermark method '{method}'")]
    UnsupportedMethod {
        /// The requested method.
        method: String,
    },

    /// The buffer cannot carry the whole bitstream.
    #[error("insufficient capacity: bitstream needs {required} bits, buffer holds {available}")]
    InsufficientCapacity {
        /// Bits needed.
        required: usize,
        /// Bits the buffer can hold with this method.
        available: usize,
    },

    /// WAV decoding or encoding error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Payload serialization error.
    #[error("payload serialization error: {0}")]
    Payload(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a dimension mismatch error.
    pub fn dimension(message: impl Into<String>) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
        }
    }
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::DimensionMismatch { .. } => "AUDIO_001",
            AudioError::InvalidSampleRate { .. } => "AUDIO_002",
            AudioError::SampleRateMismatch { .. } => "AUDIO_003",
            AudioError::InvalidParameter { .. } => "AUDIO_004",
            AudioError::UnsupportedMethod { .. } => "AUDIO_005",
            AudioError::InsufficientCapacity { .. } => "AUDIO_006",
            AudioError::Wav(_) => "AUDIO_007",
            AudioError::Payload(_) => "AUDIO_008",
            AudioError::Io(_) => "AUDIO_009",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            AudioError::UnsupportedMethod { .. }
            | AudioError::InsufficientCapacity { .. }
            | AudioError::Payload(_) => "watermark",
            _ => "audio",
        }
    }
}
