//! Convolution reverb with a synthetic noise impulse response.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use voxmill_spec::{EffectKind, EffectSpec};

use super::{check_range, EffectProcessor};
use crate::error::{AudioError, AudioResult};
use crate::pcm::PcmBuffer;
use crate::rng::{create_component_rng, white_noise};

/// Default impulse response length in seconds.
pub const DEFAULT_ROOM_SIZE: f64 = 2.0;

/// Default decay exponent of the impulse response envelope.
pub const DEFAULT_DECAY: f64 = 2.0;

const MAX_ROOM_SIZE: f64 = 10.0;

/// Reverb processor. Intensity is the wet amount.
///
/// Parameters: `room_size` (seconds), `decay`, `seed`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverbProcessor;

impl EffectProcessor for ReverbProcessor {
    fn kind(&self) -> EffectKind {
        EffectKind::Reverb
    }

    fn process_buffer(&self, buffer: &mut PcmBuffer, spec: &EffectSpec) -> AudioResult<()> {
        let room_size = spec.param("room_size", DEFAULT_ROOM_SIZE);
        let decay = spec.param("decay", DEFAULT_DECAY);
        let seed = spec.param("seed", 0.0);
        if !(0.0..=u32::MAX as f64).contains(&seed) {
            return Err(AudioError::invalid_param(
                "reverb.seed",
                format!("must be a non-negative 32-bit integer, got {}", seed),
            ));
        }
        apply(buffer, room_size, decay, spec.amount(), seed as u32)
    }
}

/// Builds an exponentially decaying noise impulse response with unit energy.
///
/// `ir[i] = noise[i] * (1 - i/len)^decay`, `len = sample_rate * room_size`.
pub fn impulse_response(sample_rate: u32, room_size: f64, decay: f64, seed: u32) -> Vec<f64> {
    let len = ((sample_rate as f64 * room_size).round() as usize).max(1);
    let mut rng = create_component_rng(seed, "reverb");
    let mut ir = white_noise(&mut rng, len);

    for (i, s) in ir.iter_mut().enumerate() {
        *s *= (1.0 - i as f64 / len as f64).powf(decay);
    }

    let energy = ir.iter().map(|s| s * s).sum::<f64>().sqrt();
    if energy > 0.0 {
        for s in ir.iter_mut() {
            *s /= energy;
        }
    }
    ir
}

/// Applies reverb to every channel. The tail past the buffer end is dropped.
pub fn apply(
    buffer: &mut PcmBuffer,
    room_size: f64,
    decay: f64,
    wet: f64,
    seed: u32,
) -> AudioResult<()> {
    if !(room_size > 0.0 && room_size <= MAX_ROOM_SIZE) {
        return Err(AudioError::invalid_param(
            "reverb.room_size",
            format!("must be > 0 and <= {}, got {}", MAX_ROOM_SIZE, room_size),
        ));
    }
    check_range("reverb.decay", decay, 0.0..=20.0)?;
    check_range("reverb.wet", wet, 0.0..=1.0)?;

    if buffer.is_empty() {
        return Ok(());
    }

    let ir = impulse_response(buffer.sample_rate(), room_size, decay, seed);
    let dry = 1.0 - wet;

    for channel in buffer.channels_mut() {
        let reverberant = fft_convolve(channel, &ir);
        for (s, r) in channel.iter_mut().zip(reverberant) {
            *s = *s * dry + r * wet;
        }
    }

    Ok(())
}

/// Linear convolution of `signal` with `kernel`, truncated to `signal.len()`.
pub fn fft_convolve(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    if signal.is_empty() || kernel.is_empty() {
        return vec![0.0; signal.len()];
    }
    let n = (signal.len() + kernel.len() - 1).next_power_of_two();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(n);

    let to_complex = |data: &[f64]| -> Vec<Complex<f64>> {
        let mut v: Vec<Complex<f64>> = data.iter().map(|&s| Complex::new(s, 0.0)).collect();
        v.resize(n, Complex::new(0.0, 0.0));
        v
    };

    let mut a = to_complex(signal);
    let mut b = to_complex(kernel);
    fft.process(&mut a);
    fft.process(&mut b);

    for (x, y) in a.iter_mut().zip(&b) {
        *x *= y;
    }
    ifft.process(&mut a);

    // IFFT result needs to be scaled by 1/N
    a.iter().take(signal.len()).map(|c| c.re / n as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_response_unit_energy() {
        let ir = impulse_response(8000, 0.5, 2.0, 3);
        assert_eq!(ir.len(), 4000);
        let energy: f64 = ir.iter().map(|s| s * s).sum();
        assert!((energy - 1.0).abs() < 1e-9);
        // Envelope decays
        let head: f64 = ir[..400].iter().map(|s| s.abs()).sum();
        let tail: f64 = ir[3600..].iter().map(|s| s.abs()).sum();
        assert!(head > tail * 10.0);
    }

    #[test]
    fn test_impulse_response_deterministic() {
        assert_eq!(
            impulse_response(8000, 0.1, 2.0, 9),
            impulse_response(8000, 0.1, 2.0, 9)
        );
        assert_ne!(
            impulse_response(8000, 0.1, 2.0, 9),
            impulse_response(8000, 0.1, 2.0, 10)
        );
    }

    #[test]
    fn test_fft_convolve_matches_direct() {
        let signal = [1.0, 2.0, 3.0, 0.0, -1.0];
        let kernel = [0.5, -0.25, 0.125];
        let fast = fft_convolve(&signal, &kernel);
        for i in 0..signal.len() {
            let mut direct = 0.0;
            for (k, &h) in kernel.iter().enumerate() {
                if i >= k {
                    direct += signal[i - k] * h;
                }
            }
            assert!((fast[i] - direct).abs() < 1e-9, "index {}", i);
        }
    }

    #[test]
    fn test_reverb_spreads_impulse() {
        let mut samples = vec![0.0; 4000];
        samples[0] = 1.0;
        let mut buffer = PcmBuffer::mono(samples, 8000).unwrap();
        apply(&mut buffer, 0.25, 2.0, 1.0, 0).unwrap();
        let ch = buffer.channel(0).unwrap();
        let later_energy: f64 = ch[100..2000].iter().map(|s| s * s).sum();
        assert!(later_energy > 0.01);
    }

    #[test]
    fn test_rejects_non_positive_room_size() {
        let mut buffer = PcmBuffer::mono(vec![0.0; 10], 8000).unwrap();
        for room in [0.0, -1.0, f64::NAN] {
            let err = apply(&mut buffer, room, 2.0, 0.5, 0).unwrap_err();
            assert!(err.to_string().contains("reverb.room_size"));
        }
    }
}
