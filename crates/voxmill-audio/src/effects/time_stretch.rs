//! Time stretching by Hann-windowed overlap-add.

use std::f64::consts::PI;

use voxmill_spec::{EffectKind, EffectSpec};

use super::{check_range, EffectProcessor};
use crate::error::AudioResult;
use crate::pcm::PcmBuffer;

/// Stretch factor at full intensity.
pub const DEFAULT_FACTOR: f64 = 1.25;

/// Analysis/synthesis frame length in samples.
pub const FRAME_SIZE: usize = 1024;

/// Synthesis hop (75% overlap).
pub const SYNTHESIS_HOP: usize = FRAME_SIZE / 4;

/// Time stretch processor. The effective factor is
/// `1 + (factor - 1) * intensity / 100`; the buffer length changes by it.
///
/// Parameters: `factor`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeStretchProcessor;

impl EffectProcessor for TimeStretchProcessor {
    fn kind(&self) -> EffectKind {
        EffectKind::TimeStretch
    }

    fn process_buffer(&self, buffer: &mut PcmBuffer, spec: &EffectSpec) -> AudioResult<()> {
        let factor = check_range(
            "time_stretch.factor",
            spec.param("factor", DEFAULT_FACTOR),
            0.25..=4.0,
        )?;
        apply(buffer, effective_factor(factor, spec.amount()))
    }
}

/// Blends `factor` toward 1.0 by `amount`.
pub fn effective_factor(factor: f64, amount: f64) -> f64 {
    1.0 + (factor - 1.0) * amount
}

fn hann(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / len as f64).cos())
        .collect()
}

/// Stretches one channel to `round(len * factor)` samples.
pub fn stretch_channel(input: &[f64], factor: f64) -> Vec<f64> {
    let out_len = (input.len() as f64 * factor).round() as usize;
    if input.is_empty() || out_len == 0 {
        return vec![0.0; out_len];
    }

    let window = hann(FRAME_SIZE);
    let analysis_hop = SYNTHESIS_HOP as f64 / factor;
    let mut output = vec![0.0; out_len];
    let mut norm = vec![0.0; out_len];

    let mut frame = 0usize;
    loop {
        let out_pos = frame * SYNTHESIS_HOP;
        if out_pos >= out_len {
            break;
        }
        let in_pos = (frame as f64 * analysis_hop).round() as usize;

        for (j, &w) in window.iter().enumerate() {
            let o = out_pos + j;
            if o >= out_len {
                break;
            }
            let x = input.get(in_pos + j).copied().unwrap_or(0.0);
            output[o] += x * w;
            norm[o] += w;
        }
        frame += 1;
    }

    // The very first samples only see the window's rising edge.
    for (s, n) in output.iter_mut().zip(&norm) {
        if *n > 1e-3 {
            *s /= n;
        }
    }
    output
}

/// Stretches every channel by `factor`.
pub fn apply(buffer: &mut PcmBuffer, factor: f64) -> AudioResult<()> {
    check_range("time_stretch.factor", factor, 0.25..=4.0)?;
    if factor == 1.0 {
        return Ok(());
    }
    let stretched: Vec<Vec<f64>> = buffer
        .channels()
        .iter()
        .map(|c| stretch_channel(c, factor))
        .collect();
    buffer.replace_channels(stretched)
}
