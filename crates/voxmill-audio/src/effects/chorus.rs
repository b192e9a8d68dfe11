//! Chorus with a sine LFO modulated delay.

use std::f64::consts::PI;

use voxmill_spec::{EffectKind, EffectSpec};

use super::delay_line::DelayLine;
use super::{check_range, EffectProcessor};
use crate::error::AudioResult;
use crate::pcm::PcmBuffer;

const TWO_PI: f64 = 2.0 * PI;

/// Default LFO rate in Hz.
pub const DEFAULT_RATE: f64 = 1.5;

/// Default modulation depth (0.0-1.0).
pub const DEFAULT_DEPTH: f64 = 0.5;

const BASE_DELAY_MS: f64 = 20.0;
const MAX_MODULATION_MS: f64 = 10.0;

/// Chorus processor. Intensity is the wet amount, up to an equal dry/wet mix.
///
/// Parameters: `rate` (Hz), `depth`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChorusProcessor;

impl EffectProcessor for ChorusProcessor {
    fn kind(&self) -> EffectKind {
        EffectKind::Chorus
    }

    fn process_buffer(&self, buffer: &mut PcmBuffer, spec: &EffectSpec) -> AudioResult<()> {
        apply(
            buffer,
            spec.param("rate", DEFAULT_RATE),
            spec.param("depth", DEFAULT_DEPTH),
            0.5 * spec.amount(),
        )
    }
}

/// Applies chorus. Each channel's LFO is phase offset for stereo width.
pub fn apply(buffer: &mut PcmBuffer, rate: f64, depth: f64, wet: f64) -> AudioResult<()> {
    check_range("chorus.rate", rate, 0.1..=10.0)?;
    check_range("chorus.depth", depth, 0.0..=1.0)?;
    check_range("chorus.wet", wet, 0.0..=1.0)?;

    let sample_rate = buffer.sample_rate() as f64;
    let base_delay = BASE_DELAY_MS / 1000.0 * sample_rate;
    let max_modulation = MAX_MODULATION_MS / 1000.0 * sample_rate;
    let line_size = (base_delay + max_modulation).ceil() as usize + 3;
    let dry = 1.0 - wet;

    for (ch_idx, channel) in buffer.channels_mut().enumerate() {
        let phase_offset = ch_idx as f64 * PI / 2.0;
        let mut line = DelayLine::new(line_size);

        for (i, s) in channel.iter_mut().enumerate() {
            let t = i as f64 / sample_rate;
            let lfo = (TWO_PI * rate * t + phase_offset).sin();
            let delay = base_delay + depth * max_modulation * (lfo * 0.5 + 0.5);

            let input = *s;
            let delayed = line.read_interpolated(delay);
            line.write(input);
            *s = input * dry + delayed * wet;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chorus_changes_signal_and_keeps_length() {
        let samples: Vec<f64> = (0..8000)
            .map(|i| (TWO_PI * 220.0 * i as f64 / 8000.0).sin() * 0.5)
            .collect();
        let original = PcmBuffer::new(vec![samples.clone(), samples], 8000).unwrap();
        let mut buffer = original.clone();
        apply(&mut buffer, DEFAULT_RATE, DEFAULT_DEPTH, 0.5).unwrap();

        assert_eq!(buffer.len(), original.len());
        assert_ne!(buffer, original);
        // Channels are modulated differently
        assert_ne!(buffer.channel(0), buffer.channel(1));
        assert!(buffer.peak() <= 1.0);
    }

    #[test]
    fn test_rejects_bad_rate() {
        let mut buffer = PcmBuffer::mono(vec![0.0; 10], 8000).unwrap();
        assert!(apply(&mut buffer, 0.0, 0.5, 0.5).is_err());
        assert!(apply(&mut buffer, 1.0, 1.5, 0.5).is_err());
    }
}
