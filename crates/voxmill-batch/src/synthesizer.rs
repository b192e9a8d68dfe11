//! The text-to-speech collaborator seam.

use std::collections::BTreeMap;

use voxmill_audio::PcmBuffer;
use voxmill_spec::BatchItem;

use crate::error::SynthesisError;

/// What to render for one voice of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    /// Text to speak.
    pub text: String,
    /// Voice to speak it with.
    pub voice_id: String,
    /// Emotion weights.
    pub emotions: BTreeMap<String, f64>,
}

impl SynthesisRequest {
    /// Request for the primary voice of `item`.
    pub fn primary(item: &BatchItem) -> Self {
        Self {
            text: item.text.clone(),
            voice_id: item.voice_id.clone(),
            emotions: item.emotions.clone(),
        }
    }

    /// Request for the same text in a different voice.
    pub fn with_voice(&self, voice_id: impl Into<String>) -> Self {
        Self {
            voice_id: voice_id.into(),
            ..self.clone()
        }
    }
}

/// Renders speech. Implementations may block.
pub trait Synthesizer: Send + Sync {
    /// Renders `request` to a buffer.
    fn synthesize(&self, request: &SynthesisRequest) -> Result<PcmBuffer, SynthesisError>;
}

impl<F> Synthesizer for F
where
    F: Fn(&SynthesisRequest) -> Result<PcmBuffer, SynthesisError> + Send + Sync,
{
    fn synthesize(&self, request: &SynthesisRequest) -> Result<PcmBuffer, SynthesisError> {
        self(request)
    }
}
