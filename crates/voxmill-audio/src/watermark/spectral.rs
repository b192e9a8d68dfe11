//! Frequency-domain watermarking.
//!
//! Frames of [`FRAME_SIZE`] samples sit on a hop-[`HOP_SIZE`] grid. Only the
//! even frames carry bits since odd frames overlap both neighbours. Each
//! carrier frame holds [`BITS_PER_FRAME`] bits, one per selected bin: the
//! bin magnitude is set just above (1) or just below (0) the mean magnitude
//! of the two bins on either side.

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;
use voxmill_spec::WatermarkMethod;

use super::bitstream::{bits_to_bytes, frame_bits, parse_header, HEADER_BITS};
use super::WatermarkCodec;

/// Analysis frame length.
pub const FRAME_SIZE: usize = 2048;

/// Frame grid hop (50% overlap).
pub const HOP_SIZE: usize = FRAME_SIZE / 2;

/// Bits per carrier frame.
pub const BITS_PER_FRAME: usize = 32;

/// First carrier bin: skips the lowest 10% of the half spectrum.
pub const FIRST_BIN: usize = 102;

/// Carrier spacing across the next 30% of the half spectrum.
pub const BIN_STRIDE: usize = 9;

/// Relative magnitude offset at strength 100.
const MODULATION_DEPTH: f64 = 0.01;

/// Carrier bin indices, in bit order.
pub fn carrier_bins() -> impl Iterator<Item = usize> {
    (0..BITS_PER_FRAME).map(|k| FIRST_BIN + BIN_STRIDE * k)
}

/// First sample of carrier frame `frame`.
pub fn carrier_start(frame: usize) -> usize {
    2 * frame * HOP_SIZE
}

fn reference_level(spectrum: &[Complex<f64>], bin: usize) -> f64 {
    (spectrum[bin - 2].norm()
        + spectrum[bin - 1].norm()
        + spectrum[bin + 1].norm()
        + spectrum[bin + 2].norm())
        / 4.0
}

struct Transforms {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl Transforms {
    fn new() -> Self {
        let mut planner = FftPlanner::new();
        Self {
            forward: planner.plan_fft_forward(FRAME_SIZE),
            inverse: planner.plan_fft_inverse(FRAME_SIZE),
        }
    }

    fn spectrum(&self, frame: &[f64]) -> Vec<Complex<f64>> {
        let mut spectrum: Vec<Complex<f64>> =
            frame.iter().map(|&s| Complex::new(s, 0.0)).collect();
        self.forward.process(&mut spectrum);
        spectrum
    }

    fn read_frame(&self, samples: &[f64], frame: usize) -> Option<Vec<bool>> {
        let start = carrier_start(frame);
        let window = samples.get(start..start + FRAME_SIZE)?;
        let spectrum = self.spectrum(window);
        Some(
            carrier_bins()
                .map(|bin| spectrum[bin].norm() > reference_level(&spectrum, bin))
                .collect(),
        )
    }
}

/// Spectral bin-magnitude codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralCodec;

impl WatermarkCodec for SpectralCodec {
    fn method(&self) -> WatermarkMethod {
        WatermarkMethod::Spectral
    }

    fn capacity_bits(&self, len: usize, _sample_rate: u32) -> usize {
        (len / FRAME_SIZE) * BITS_PER_FRAME
    }

    fn embed_channel(&self, samples: &mut [f64], bits: &[bool], strength: f64, sample_rate: u32) {
        if bits.len() > self.capacity_bits(samples.len(), sample_rate) {
            return;
        }
        let transforms = Transforms::new();
        let depth = strength / 100.0 * MODULATION_DEPTH;

        for (frame, chunk) in bits.chunks(BITS_PER_FRAME).enumerate() {
            let start = carrier_start(frame);
            let mut spectrum = transforms.spectrum(&samples[start..start + FRAME_SIZE]);

            for (&bit, bin) in chunk.iter().zip(carrier_bins()) {
                let reference = reference_level(&spectrum, bin);
                let target = if bit {
                    reference * (1.0 + depth)
                } else {
                    reference * (1.0 - depth)
                };
                let value = Complex::from_polar(target, spectrum[bin].arg());
                spectrum[bin] = value;
                spectrum[FRAME_SIZE - bin] = value.conj();
            }

            transforms.inverse.process(&mut spectrum);
            for (s, c) in samples[start..start + FRAME_SIZE].iter_mut().zip(&spectrum) {
                *s = c.re / FRAME_SIZE as f64;
            }
        }

        log::debug!(
            "spectral: {} bits over {} carrier frames",
            bits.len(),
            bits.len().div_ceil(BITS_PER_FRAME)
        );
    }

    fn extract_channel(&self, samples: &[f64], sample_rate: u32) -> Option<Vec<u8>> {
        let transforms = Transforms::new();
        let header = transforms.read_frame(samples, 0)?;
        let payload_len = parse_header(&header)?;

        let total = frame_bits(payload_len);
        if total > self.capacity_bits(samples.len(), sample_rate) {
            log::debug!("spectral: header claims {} bits, buffer too short", total);
            return None;
        }

        let mut bits = header;
        let mut frame = 1;
        while bits.len() < total {
            bits.extend(transforms.read_frame(samples, frame)?);
            frame += 1;
        }
        Some(bits_to_bytes(&bits[HEADER_BITS..total]))
    }
}
