//! Least-significant-bit watermarking on the 16-bit grid.
//!
//! The header occupies samples `0..32`. Payload bits go one per sample at an
//! even stride across the remainder. Only carrier samples are rewritten, so
//! everything else keeps its original value.

use voxmill_spec::WatermarkMethod;

use super::bitstream::{bits_to_bytes, frame_bits, parse_header, HEADER_BITS};
use super::WatermarkCodec;
use crate::wav::quantize_16;

const FULL_SCALE: f64 = 32767.0;

fn set_lsb(quantized: i32, bit: bool) -> i32 {
    let v = (quantized & !1) | bit as i32;
    // -32768 is outside the symmetric grid
    if v < -32767 {
        v + 2
    } else {
        v
    }
}

fn read_lsb(sample: f64) -> bool {
    quantize_16(sample) & 1 != 0
}

fn payload_stride(len: usize, payload_bits: usize) -> usize {
    (len - HEADER_BITS) / payload_bits
}

/// 16-bit LSB codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct LsbCodec;

impl WatermarkCodec for LsbCodec {
    fn method(&self) -> WatermarkMethod {
        WatermarkMethod::Lsb
    }

    fn capacity_bits(&self, len: usize, _sample_rate: u32) -> usize {
        len
    }

    fn embed_channel(&self, samples: &mut [f64], bits: &[bool], _strength: f64, _sample_rate: u32) {
        if bits.len() <= HEADER_BITS || bits.len() > samples.len() {
            return;
        }
        let (header, payload) = bits.split_at(HEADER_BITS);
        let stride = payload_stride(samples.len(), payload.len());

        let positions = (0..HEADER_BITS).chain((0..payload.len()).map(|j| HEADER_BITS + j * stride));
        for (pos, &bit) in positions.zip(header.iter().chain(payload)) {
            let q = set_lsb(quantize_16(samples[pos]) as i32, bit);
            samples[pos] = q as f64 / FULL_SCALE;
        }
    }

    fn extract_channel(&self, samples: &[f64], _sample_rate: u32) -> Option<Vec<u8>> {
        let header: Vec<bool> = samples.get(..HEADER_BITS)?.iter().map(|&s| read_lsb(s)).collect();
        let payload_len = parse_header(&header)?;
        let total = frame_bits(payload_len);
        if total > samples.len() {
            log::debug!("lsb: header claims {} bits, buffer holds {}", total, samples.len());
            return None;
        }

        let payload_bits = total - HEADER_BITS;
        let stride = payload_stride(samples.len(), payload_bits);
        let bits: Vec<bool> = (0..payload_bits)
            .map(|j| read_lsb(samples[HEADER_BITS + j * stride]))
            .collect();
        Some(bits_to_bytes(&bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_lsb() {
        assert_eq!(set_lsb(10, true), 11);
        assert_eq!(set_lsb(11, false), 10);
        assert_eq!(set_lsb(-3, false), -4);
        assert_eq!(set_lsb(-4, true), -3);
        assert_eq!(set_lsb(32767, true), 32767);
        assert_eq!(set_lsb(-32767, false), -32766);
        assert_eq!(set_lsb(-32767, true), -32767);
    }

    #[test]
    fn test_change_is_one_step() {
        let mut samples: Vec<f64> = (0..500).map(|i| ((i as f64) * 0.05).sin() * 0.5).collect();
        let original = samples.clone();
        let bits: Vec<bool> = (0..100).map(|i| i % 3 == 0).collect();
        LsbCodec.embed_channel(&mut samples, &bits, 50.0, 8000);
        for (a, b) in samples.iter().zip(&original) {
            assert!((a - b).abs() <= 1.5001 / FULL_SCALE);
        }
    }

    #[test]
    fn test_short_buffer_reads_nothing() {
        assert_eq!(LsbCodec.extract_channel(&[0.0; 16], 8000), None);
    }
}
