//! Per-item rendering: synthesis, effects, mix, watermark.

use std::sync::Arc;

use voxmill_audio::{mix, watermark, EffectChain, PcmBuffer};
use voxmill_spec::{BatchItem, WatermarkRequest};

use crate::error::{ItemError, SynthesisError};
use crate::synthesizer::{SynthesisRequest, Synthesizer};

/// A finished item buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedItem {
    /// Final samples.
    pub buffer: PcmBuffer,
    /// Whether a watermark was embedded.
    pub watermarked: bool,
}

/// Runs one item through every stage it asks for.
pub struct ItemPipeline {
    synthesizer: Arc<dyn Synthesizer>,
    chain: EffectChain,
}

impl ItemPipeline {
    /// Creates a pipeline with the standard effect chain.
    pub fn new(synthesizer: Arc<dyn Synthesizer>) -> Self {
        Self::with_chain(synthesizer, EffectChain::new())
    }

    /// Creates a pipeline with a custom effect chain.
    pub fn with_chain(synthesizer: Arc<dyn Synthesizer>, chain: EffectChain) -> Self {
        Self { synthesizer, chain }
    }

    /// The effect chain used for every voice.
    pub fn chain(&self) -> &EffectChain {
        &self.chain
    }

    /// Renders `item`.
    ///
    /// Each voice is synthesized and run through the item's effects before
    /// mixing. The watermark goes on last.
    pub fn render(
        &self,
        item: &BatchItem,
        mark: Option<&WatermarkRequest>,
    ) -> Result<RenderedItem, ItemError> {
        let request = SynthesisRequest::primary(item);
        let mut buffer = self.voice(&request, item)?;

        if let Some(secondary) = &item.mix {
            let other = self.voice(&request.with_voice(secondary.voice_id.as_str()), item)?;
            buffer = mix(&buffer, &other, &secondary.spec)?;
            log::debug!("mixed '{}' with '{}'", item.voice_id, secondary.voice_id);
        }

        let watermarked = match mark {
            Some(wm) => {
                buffer = watermark::embed(&buffer, &wm.payload, &wm.options)?;
                true
            }
            None => false,
        };

        Ok(RenderedItem {
            buffer,
            watermarked,
        })
    }

    fn voice(&self, request: &SynthesisRequest, item: &BatchItem) -> Result<PcmBuffer, ItemError> {
        if request.text.trim().is_empty() {
            return Err(SynthesisError::EmptyText.into());
        }
        let raw = self.synthesizer.synthesize(request)?;
        log::debug!(
            "synthesized {} samples for voice '{}'",
            raw.len(),
            request.voice_id
        );
        Ok(self.chain.apply(raw, &item.effects)?)
    }
}
