//! Waveshaping distortion through a tanh transfer curve.

use voxmill_spec::{EffectKind, EffectSpec};

use super::EffectProcessor;
use crate::error::{AudioError, AudioResult};
use crate::pcm::PcmBuffer;

/// Number of points in the transfer curve.
pub const CURVE_POINTS: usize = 44_100;

/// Distortion processor.
///
/// Drive is `intensity / 10`, so intensities below 10 soften the signal
/// rather than saturate it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistortionProcessor;

impl EffectProcessor for DistortionProcessor {
    fn kind(&self) -> EffectKind {
        EffectKind::Distortion
    }

    fn process_buffer(&self, buffer: &mut PcmBuffer, spec: &EffectSpec) -> AudioResult<()> {
        apply(buffer, spec.intensity / 10.0)
    }
}

/// Transfer curve `tanh(x * drive)` sampled at `x` evenly spanning [-1, 1].
pub fn make_curve(drive: f64) -> Vec<f64> {
    let last = (CURVE_POINTS - 1) as f64;
    (0..CURVE_POINTS)
        .map(|i| {
            let x = i as f64 * 2.0 / last - 1.0;
            (x * drive).tanh()
        })
        .collect()
}

/// Maps `sample` through `curve`, interpolating between points. Input
/// outside [-1, 1] takes the end values.
#[inline]
pub fn shape(curve: &[f64], sample: f64) -> f64 {
    let last = curve.len() - 1;
    let pos = (sample.clamp(-1.0, 1.0) + 1.0) * 0.5 * last as f64;
    let idx = (pos.floor() as usize).min(last);
    let frac = pos - idx as f64;
    if idx == last {
        curve[last]
    } else {
        curve[idx] * (1.0 - frac) + curve[idx + 1] * frac
    }
}

/// Applies waveshaping with the given drive.
pub fn apply(buffer: &mut PcmBuffer, drive: f64) -> AudioResult<()> {
    if !drive.is_finite() || drive <= 0.0 {
        return Err(AudioError::invalid_param(
            "distortion.drive",
            format!("must be > 0, got {}", drive),
        ));
    }
    let curve = make_curve(drive);
    for channel in buffer.channels_mut() {
        for s in channel.iter_mut() {
            *s = shape(&curve, *s);
        }
    }
    Ok(())
}
