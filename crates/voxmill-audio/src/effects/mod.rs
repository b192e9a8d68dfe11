//! Signal effects for post-processing synthesized speech.
//!
//! Every effect kind has a processor implementing [`EffectProcessor`]; the
//! [`EffectChain`] maps kinds to processors and applies a list of
//! [`EffectSpec`]s in order.

mod chain;
pub mod chorus;
pub mod compressor;
pub mod delay_line;
pub mod distortion;
pub mod echo;
pub mod level;
pub mod noise_gate;
pub mod pitch_shift;
pub mod reverb;
pub mod time_stretch;

#[cfg(test)]
mod tests_chain;

use voxmill_spec::{EffectKind, EffectSpec};

use crate::error::AudioResult;
use crate::pcm::PcmBuffer;

pub use chain::EffectChain;

/// A buffer-at-a-time effect implementation.
///
/// The chain only calls processors with an intensity in `(0, 100]`.
pub trait EffectProcessor: Send + Sync {
    /// Kind this processor handles.
    fn kind(&self) -> EffectKind;

    /// Transforms `buffer` in place according to `spec`.
    fn process_buffer(&self, buffer: &mut PcmBuffer, spec: &EffectSpec) -> AudioResult<()>;
}

/// Checks that `value` lies in `range`, naming the parameter on failure.
pub(crate) fn check_range(
    name: &str,
    value: f64,
    range: std::ops::RangeInclusive<f64>,
) -> AudioResult<f64> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(crate::error::AudioError::invalid_param(
            name,
            format!("must be {}-{}, got {}", range.start(), range.end(), value),
        ))
    }
}
