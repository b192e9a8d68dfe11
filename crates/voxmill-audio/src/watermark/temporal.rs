//! Amplitude-modulation watermarking. Embed only.

use voxmill_spec::WatermarkMethod;

use super::WatermarkCodec;

/// Relative gain change at strength 100.
const MODULATION_DEPTH: f64 = 0.1;

/// Spreads the bitstream evenly over the buffer and scales each bit's range
/// by `1 + strength/1000` (1) or `1 - strength/1000` (0).
///
/// There is no reader for this codec, so extraction reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalCodec;

impl WatermarkCodec for TemporalCodec {
    fn method(&self) -> WatermarkMethod {
        WatermarkMethod::Temporal
    }

    fn capacity_bits(&self, len: usize, _sample_rate: u32) -> usize {
        len
    }

    fn embed_channel(&self, samples: &mut [f64], bits: &[bool], strength: f64, _sample_rate: u32) {
        if bits.is_empty() || samples.len() < bits.len() {
            return;
        }
        let segment = samples.len() / bits.len();
        let delta = strength / 100.0 * MODULATION_DEPTH;

        for (range, &bit) in samples.chunks_mut(segment).zip(bits) {
            let gain = if bit { 1.0 + delta } else { 1.0 - delta };
            for s in range {
                *s *= gain;
            }
        }
    }
}
