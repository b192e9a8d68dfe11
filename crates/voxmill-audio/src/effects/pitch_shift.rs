//! Pitch shifting with two crossfaded sweeping delay taps.
//!
//! A tap whose delay changes at a constant rate plays the input back at a
//! different speed, which shifts its pitch. Each tap's delay wraps every
//! window, and the two taps run half a window apart so one is always
//! fading in while the other hides its wrap.

use std::f64::consts::PI;

use voxmill_spec::{EffectKind, EffectSpec};

use super::delay_line::DelayLine;
use super::{check_range, EffectProcessor};
use crate::error::AudioResult;
use crate::pcm::PcmBuffer;

/// Shift at full intensity, in semitones.
pub const DEFAULT_SEMITONES: f64 = 4.0;

/// Default sweep window in milliseconds.
pub const DEFAULT_WINDOW_MS: f64 = 50.0;

/// Pitch shift processor. Intensity scales the shift amount.
///
/// Parameters: `semitones`, `window_ms`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PitchShiftProcessor;

impl EffectProcessor for PitchShiftProcessor {
    fn kind(&self) -> EffectKind {
        EffectKind::PitchShift
    }

    fn process_buffer(&self, buffer: &mut PcmBuffer, spec: &EffectSpec) -> AudioResult<()> {
        apply(
            buffer,
            spec.param("semitones", DEFAULT_SEMITONES) * spec.amount(),
            spec.param("window_ms", DEFAULT_WINDOW_MS),
        )
    }
}

/// Shifts every channel by `semitones`.
pub fn apply(buffer: &mut PcmBuffer, semitones: f64, window_ms: f64) -> AudioResult<()> {
    check_range("pitch_shift.semitones", semitones, -24.0..=24.0)?;
    check_range("pitch_shift.window_ms", window_ms, 10.0..=200.0)?;

    if semitones == 0.0 {
        return Ok(());
    }

    let ratio = 2.0_f64.powf(semitones / 12.0);
    let window = window_ms / 1000.0 * buffer.sample_rate() as f64;
    // Phase advance per sample; delay shrinks when pitching up.
    let step = (1.0 - ratio) / window;
    let line_size = window.ceil() as usize + 4;

    for channel in buffer.channels_mut() {
        let mut line = DelayLine::new(line_size);
        let mut phase = 0.0_f64;

        for s in channel.iter_mut() {
            let input = *s;
            let phase_b = (phase + 0.5).rem_euclid(1.0);

            let tap_a = line.read_interpolated(1.0 + phase * window);
            let tap_b = line.read_interpolated(1.0 + phase_b * window);
            let gain_a = (PI * phase).sin();
            let gain_b = (PI * phase_b).sin();

            line.write(input);
            // sin^2 crossfade, gains sum to 1 in power
            *s = tap_a * gain_a * gain_a + tap_b * gain_b * gain_b;

            phase = (phase + step).rem_euclid(1.0);
        }
    }

    Ok(())
}
