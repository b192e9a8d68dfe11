//! Two-voice mixing.

use voxmill_spec::{MixMode, MixSpec};

use super::processing::{is_secondary_segment, morph_weight, seconds_to_samples, soft_saturate};
use crate::error::{AudioError, AudioResult};
use crate::pcm::PcmBuffer;

/// Mixes `secondary` into `primary`.
///
/// Both buffers must share channel count and sample rate. The output is as
/// long as the longer input; the shorter one is treated as zero-padded.
/// Channels are mixed independently. `morph` and `alternate` ignore the
/// ratio: `morph` fades the secondary fully in and out over
/// `crossfade_seconds`, and `alternate` switches voices every
/// `crossfade_seconds`.
pub fn mix(primary: &PcmBuffer, secondary: &PcmBuffer, spec: &MixSpec) -> AudioResult<PcmBuffer> {
    primary.check_compatible(secondary)?;
    if !spec.mix_ratio.is_finite() || !(0.0..=100.0).contains(&spec.mix_ratio) {
        return Err(AudioError::invalid_param(
            "mix.mix_ratio",
            format!("must be 0-100, got {}", spec.mix_ratio),
        ));
    }
    if !spec.crossfade_seconds.is_finite() || spec.crossfade_seconds < 0.0 {
        return Err(AudioError::invalid_param(
            "mix.crossfade_seconds",
            format!("must be >= 0, got {}", spec.crossfade_seconds),
        ));
    }

    let sample_rate = primary.sample_rate();
    let len = primary.len().max(secondary.len());
    let ratio = spec.weight();
    let crossfade = seconds_to_samples(spec.crossfade_seconds, sample_rate);

    if spec.mode == MixMode::Alternate && crossfade < 1 {
        return Err(AudioError::invalid_param(
            "mix.crossfade_seconds",
            format!(
                "alternate needs a period of at least one sample, got {} s at {} Hz",
                spec.crossfade_seconds, sample_rate
            ),
        ));
    }

    log::debug!(
        "mixing {} + {} samples ({} ch) mode={} ratio={}",
        primary.len(),
        secondary.len(),
        primary.num_channels(),
        spec.mode,
        ratio
    );

    let p = primary.padded_to(len);
    let s = secondary.padded_to(len);

    let channels = p
        .channels()
        .iter()
        .zip(s.channels())
        .map(|(pc, sc)| {
            pc.iter()
                .zip(sc)
                .enumerate()
                .map(|(i, (&a, &b))| match spec.mode {
                    MixMode::Blend => (1.0 - ratio) * a + ratio * b,
                    MixMode::Morph => {
                        let w = morph_weight(i, len, crossfade);
                        (1.0 - w) * a + w * b
                    }
                    MixMode::Alternate => {
                        if is_secondary_segment(i, crossfade) {
                            b
                        } else {
                            a
                        }
                    }
                    MixMode::Layered => soft_saturate(a + ratio * b),
                })
                .collect()
        })
        .collect();

    PcmBuffer::new(channels, sample_rate)
}
