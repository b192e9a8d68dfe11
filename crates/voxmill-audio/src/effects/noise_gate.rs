//! Noise gate with smoothed open/close transitions.

use voxmill_spec::{EffectKind, EffectSpec};

use super::level::{amp_to_db, db_to_amp, frame_peaks, time_coeff};
use super::{check_range, EffectProcessor};
use crate::error::AudioResult;
use crate::pcm::PcmBuffer;

/// Default gate threshold in dB.
pub const DEFAULT_THRESHOLD_DB: f64 = -40.0;

/// Attenuation of a closed gate at full intensity, in dB.
pub const FULL_RANGE_DB: f64 = -60.0;

/// Default gain smoothing when the gate opens, in milliseconds.
pub const DEFAULT_ATTACK_MS: f64 = 1.0;

/// Default gain smoothing when the gate closes, in milliseconds.
pub const DEFAULT_RELEASE_MS: f64 = 50.0;

/// Envelope follower release; attack is instantaneous.
const DETECTOR_RELEASE_MS: f64 = 10.0;

/// Noise gate processor. Intensity scales how far a closed gate attenuates.
///
/// Parameters: `threshold_db`, `attack_ms`, `release_ms`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseGateProcessor;

impl EffectProcessor for NoiseGateProcessor {
    fn kind(&self) -> EffectKind {
        EffectKind::NoiseGate
    }

    fn process_buffer(&self, buffer: &mut PcmBuffer, spec: &EffectSpec) -> AudioResult<()> {
        apply(
            buffer,
            spec.param("threshold_db", DEFAULT_THRESHOLD_DB),
            FULL_RANGE_DB * spec.amount(),
            spec.param("attack_ms", DEFAULT_ATTACK_MS),
            spec.param("release_ms", DEFAULT_RELEASE_MS),
        )
    }
}

/// Gates all channels together from their combined peak envelope.
pub fn apply(
    buffer: &mut PcmBuffer,
    threshold_db: f64,
    range_db: f64,
    attack_ms: f64,
    release_ms: f64,
) -> AudioResult<()> {
    check_range("noise_gate.threshold_db", threshold_db, -100.0..=0.0)?;
    check_range("noise_gate.range_db", range_db, -100.0..=0.0)?;
    check_range("noise_gate.attack_ms", attack_ms, 0.0..=500.0)?;
    check_range("noise_gate.release_ms", release_ms, 0.0..=2000.0)?;

    let sample_rate = buffer.sample_rate() as f64;
    let detector_release = time_coeff(DETECTOR_RELEASE_MS / 1000.0, sample_rate);
    let attack = time_coeff(attack_ms / 1000.0, sample_rate);
    let release = time_coeff(release_ms / 1000.0, sample_rate);
    let closed_gain = db_to_amp(range_db);

    let peaks = frame_peaks(buffer.channels());
    let mut envelope = 0.0_f64;
    let mut gain = closed_gain;
    let gains: Vec<f64> = peaks
        .iter()
        .map(|&peak| {
            envelope = if peak > envelope {
                peak
            } else {
                detector_release * envelope + (1.0 - detector_release) * peak
            };
            let target = if amp_to_db(envelope) >= threshold_db {
                1.0
            } else {
                closed_gain
            };
            let coeff = if target > gain { attack } else { release };
            gain = coeff * gain + (1.0 - coeff) * target;
            gain
        })
        .collect();

    for channel in buffer.channels_mut() {
        for (s, g) in channel.iter_mut().zip(&gains) {
            *s *= g;
        }
    }

    Ok(())
}
