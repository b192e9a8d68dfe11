//! Echo-hiding watermarking. Embed only.

use voxmill_spec::WatermarkMethod;

use super::WatermarkCodec;

/// Echo delay in seconds.
pub const ECHO_DELAY_SECONDS: f64 = 0.001;

/// Echo gain at strength 100.
const MAX_ECHO_GAIN: f64 = 0.3;

/// Echo delay in samples, at least one.
pub fn echo_delay_samples(sample_rate: u32) -> usize {
    ((sample_rate as f64 * ECHO_DELAY_SECONDS).round() as usize).max(1)
}

/// Splits the buffer into one segment per bit and adds a delayed copy of
/// each 1-bit segment onto itself. 0-bit segments are left alone.
///
/// There is no reader for this codec, so extraction reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoCodec;

impl WatermarkCodec for EchoCodec {
    fn method(&self) -> WatermarkMethod {
        WatermarkMethod::Echo
    }

    fn capacity_bits(&self, len: usize, sample_rate: u32) -> usize {
        // Every segment must outlast the echo delay.
        len / (2 * echo_delay_samples(sample_rate))
    }

    fn embed_channel(&self, samples: &mut [f64], bits: &[bool], strength: f64, sample_rate: u32) {
        if bits.is_empty() {
            return;
        }
        let delay = echo_delay_samples(sample_rate);
        let gain = MAX_ECHO_GAIN * strength / 100.0;
        let segment = samples.len() / bits.len();
        let dry = samples.to_vec();

        for (k, _) in bits.iter().enumerate().filter(|(_, &bit)| bit) {
            let start = k * segment;
            for i in (start + delay)..(start + segment) {
                samples[i] += gain * dry[i - delay];
            }
        }
    }
}
