//! Feedback echo.

use voxmill_spec::{EffectKind, EffectSpec};

use super::delay_line::DelayLine;
use super::{check_range, EffectProcessor};
use crate::error::AudioResult;
use crate::pcm::PcmBuffer;

/// Default delay time in milliseconds.
pub const DEFAULT_DELAY_MS: f64 = 250.0;

/// Feedback at full intensity.
pub const DEFAULT_FEEDBACK: f64 = 0.5;

/// Wet level at full intensity.
pub const DEFAULT_WET: f64 = 0.5;

/// Echo processor. Intensity scales both feedback and wet level.
///
/// Parameters: `delay_ms`, `feedback`, `wet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoProcessor;

impl EffectProcessor for EchoProcessor {
    fn kind(&self) -> EffectKind {
        EffectKind::Echo
    }

    fn process_buffer(&self, buffer: &mut PcmBuffer, spec: &EffectSpec) -> AudioResult<()> {
        let amount = spec.amount();
        apply(
            buffer,
            spec.param("delay_ms", DEFAULT_DELAY_MS),
            spec.param("feedback", DEFAULT_FEEDBACK) * amount,
            spec.param("wet", DEFAULT_WET) * amount,
        )
    }
}

/// Applies a feedback echo to every channel.
pub fn apply(buffer: &mut PcmBuffer, delay_ms: f64, feedback: f64, wet: f64) -> AudioResult<()> {
    check_range("echo.delay_ms", delay_ms, 1.0..=2000.0)?;
    check_range("echo.feedback", feedback, 0.0..=0.95)?;
    check_range("echo.wet", wet, 0.0..=1.0)?;

    let delay_samples = delay_ms / 1000.0 * buffer.sample_rate() as f64;
    let line_size = delay_samples.ceil() as usize + 2;

    for channel in buffer.channels_mut() {
        let mut line = DelayLine::new(line_size);
        for s in channel.iter_mut() {
            let input = *s;
            let delayed = line.read_interpolated(delay_samples);
            line.write(input + delayed * feedback);
            *s = input + delayed * wet;
        }
    }

    Ok(())
}
