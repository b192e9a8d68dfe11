//! Soft-knee feed-forward compressor.

use voxmill_spec::{EffectKind, EffectSpec};

use super::level::{amp_to_db, db_to_amp, frame_peaks, time_coeff};
use super::{check_range, EffectProcessor};
use crate::error::AudioResult;
use crate::pcm::PcmBuffer;

/// Compressor settings. Times are in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorSettings {
    /// Threshold in dB.
    pub threshold: f64,
    /// Knee width in dB.
    pub knee: f64,
    /// Compression ratio.
    pub ratio: f64,
    /// Attack time.
    pub attack: f64,
    /// Release time.
    pub release: f64,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            threshold: -24.0,
            knee: 30.0,
            ratio: 12.0,
            attack: 0.003,
            release: 0.25,
        }
    }
}

impl CompressorSettings {
    /// Defaults overridden by `spec.parameters`.
    pub fn from_spec(spec: &EffectSpec) -> Self {
        let d = Self::default();
        Self {
            threshold: spec.param("threshold", d.threshold),
            knee: spec.param("knee", d.knee),
            ratio: spec.param("ratio", d.ratio),
            attack: spec.param("attack", d.attack),
            release: spec.param("release", d.release),
        }
    }

    fn validate(&self) -> AudioResult<()> {
        check_range("compressor.threshold", self.threshold, -100.0..=0.0)?;
        check_range("compressor.knee", self.knee, 0.0..=40.0)?;
        check_range("compressor.ratio", self.ratio, 1.0..=20.0)?;
        check_range("compressor.attack", self.attack, 0.0..=1.0)?;
        check_range("compressor.release", self.release, 0.0..=1.0)?;
        Ok(())
    }

    /// Gain change in dB (zero or negative) for an input level in dB.
    pub fn gain_db(&self, input_db: f64) -> f64 {
        let slope = 1.0 / self.ratio - 1.0;
        let half_knee = self.knee / 2.0;
        let over = input_db - self.threshold;

        if self.knee <= 0.0 || over >= half_knee {
            (over * slope).min(0.0)
        } else if over <= -half_knee {
            0.0
        } else {
            // Quadratic through the knee, matching both straight segments.
            let x = over + half_knee;
            slope * x * x / (2.0 * self.knee)
        }
    }
}

/// Compressor processor. Intensity is the dry/wet amount.
///
/// Parameters: `threshold`, `knee`, `ratio`, `attack`, `release`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompressorProcessor;

impl EffectProcessor for CompressorProcessor {
    fn kind(&self) -> EffectKind {
        EffectKind::Compressor
    }

    fn process_buffer(&self, buffer: &mut PcmBuffer, spec: &EffectSpec) -> AudioResult<()> {
        apply(buffer, &CompressorSettings::from_spec(spec), spec.amount())
    }
}

/// Compresses all channels from their combined peak envelope.
pub fn apply(buffer: &mut PcmBuffer, settings: &CompressorSettings, wet: f64) -> AudioResult<()> {
    settings.validate()?;
    check_range("compressor.wet", wet, 0.0..=1.0)?;

    let sample_rate = buffer.sample_rate() as f64;
    let attack = time_coeff(settings.attack, sample_rate);
    let release = time_coeff(settings.release, sample_rate);

    let mut envelope = 0.0_f64;
    let gains: Vec<f64> = frame_peaks(buffer.channels())
        .into_iter()
        .map(|level| {
            let coeff = if level > envelope { attack } else { release };
            envelope = coeff * envelope + (1.0 - coeff) * level;
            let gain = db_to_amp(settings.gain_db(amp_to_db(envelope)));
            (1.0 - wet) + wet * gain
        })
        .collect();

    for channel in buffer.channels_mut() {
        for (s, g) in channel.iter_mut().zip(&gains) {
            *s *= g;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_curve() {
        let s = CompressorSettings::default();
        // Well below the knee
        assert_eq!(s.gain_db(-60.0), 0.0);
        // Above the knee: (over) * (1/12 - 1)
        let g = s.gain_db(0.0);
        assert!((g - 24.0 * (1.0 / 12.0 - 1.0)).abs() < 1e-9);
        // Continuous at both knee edges
        let lo = s.gain_db(s.threshold - s.knee / 2.0);
        let hi = s.gain_db(s.threshold + s.knee / 2.0);
        assert!(lo.abs() < 1e-9);
        assert!((hi - 15.0 * (1.0 / 12.0 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_hard_knee() {
        let s = CompressorSettings {
            knee: 0.0,
            ratio: 4.0,
            threshold: -12.0,
            ..CompressorSettings::default()
        };
        assert_eq!(s.gain_db(-20.0), 0.0);
        assert!((s.gain_db(0.0) + 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_compressor_reduces_loud_signal() {
        let mut buffer = PcmBuffer::mono(vec![0.9; 8000], 8000).unwrap();
        apply(&mut buffer, &CompressorSettings::default(), 1.0).unwrap();
        let tail = buffer.channel(0).unwrap()[7999];
        assert!(tail < 0.3, "tail = {}", tail);
    }

    #[test]
    fn test_from_spec_overrides() {
        let spec = EffectSpec::new(EffectKind::Compressor, 50.0)
            .with_param("ratio", 4.0)
            .with_param("threshold", -10.0);
        let s = CompressorSettings::from_spec(&spec);
        assert_eq!(s.ratio, 4.0);
        assert_eq!(s.threshold, -10.0);
        assert_eq!(s.knee, 30.0);
    }
}
