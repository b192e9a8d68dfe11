//! Ordered effect chain with kind-to-processor dispatch.

use std::collections::HashMap;
use std::fmt;

use voxmill_spec::effect::MAX_INTENSITY;
use voxmill_spec::{EffectKind, EffectSpec};

use super::{
    chorus, compressor, distortion, echo, noise_gate, pitch_shift, reverb, time_stretch,
    EffectProcessor,
};
use crate::error::{AudioError, AudioResult};
use crate::pcm::PcmBuffer;

/// Applies lists of effects through a lookup table of processors.
pub struct EffectChain {
    processors: HashMap<EffectKind, Box<dyn EffectProcessor>>,
}

impl EffectChain {
    /// Creates a chain with a processor for every known kind.
    pub fn new() -> Self {
        let mut chain = Self {
            processors: HashMap::new(),
        };
        chain.register(Box::new(reverb::ReverbProcessor));
        chain.register(Box::new(echo::EchoProcessor));
        chain.register(Box::new(chorus::ChorusProcessor));
        chain.register(Box::new(distortion::DistortionProcessor));
        chain.register(Box::new(pitch_shift::PitchShiftProcessor));
        chain.register(Box::new(time_stretch::TimeStretchProcessor));
        chain.register(Box::new(noise_gate::NoiseGateProcessor));
        chain.register(Box::new(compressor::CompressorProcessor));
        chain
    }

    /// Installs `processor` for its kind, returning any processor it replaced.
    pub fn register(
        &mut self,
        processor: Box<dyn EffectProcessor>,
    ) -> Option<Box<dyn EffectProcessor>> {
        self.processors.insert(processor.kind(), processor)
    }

    /// True if the chain has a processor for `kind`.
    pub fn supports(&self, kind: &EffectKind) -> bool {
        self.processors.contains_key(kind)
    }

    /// Applies `effects` in order, each output feeding the next.
    ///
    /// Kinds without a processor are skipped with a warning. An empty list
    /// returns the buffer unchanged.
    pub fn apply(&self, mut buffer: PcmBuffer, effects: &[EffectSpec]) -> AudioResult<PcmBuffer> {
        for effect in effects {
            self.apply_single(&mut buffer, effect)?;
        }
        Ok(buffer)
    }

    /// Applies one effect in place.
    pub fn apply_single(&self, buffer: &mut PcmBuffer, effect: &EffectSpec) -> AudioResult<()> {
        let Some(processor) = self.processors.get(&effect.kind) else {
            log::warn!("skipping unsupported effect '{}'", effect.kind);
            return Ok(());
        };

        if !effect.intensity.is_finite() || !(0.0..=MAX_INTENSITY).contains(&effect.intensity) {
            return Err(AudioError::invalid_param(
                format!("{}.intensity", effect.kind),
                format!("must be 0-100, got {}", effect.intensity),
            ));
        }
        if effect.is_bypassed() {
            log::debug!("effect '{}' bypassed at intensity 0", effect.kind);
            return Ok(());
        }

        log::debug!(
            "applying '{}' at intensity {} to {} samples",
            effect.kind,
            effect.intensity,
            buffer.len()
        );
        processor.process_buffer(buffer, effect)
    }
}

impl Default for EffectChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EffectChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&EffectKind> = self.processors.keys().collect();
        kinds.sort();
        f.debug_struct("EffectChain")
            .field("processors", &kinds)
            .finish()
    }
}
