//! WAV decoding via hound.

use std::io::Cursor;
use std::path::Path;

use super::format::SampleEncoding;
use crate::error::{AudioError, AudioResult};
use crate::pcm::PcmBuffer;

/// A decoded WAV file.
#[derive(Debug, Clone)]
pub struct DecodedWav {
    /// Samples scaled to [-1, 1].
    pub buffer: PcmBuffer,
    /// Encoding of the source file.
    pub encoding: SampleEncoding,
}

/// Decodes WAV bytes.
///
/// Integer input of 8, 16, 24 or 32 bits is scaled by `2^(bits-1) - 1`, the
/// inverse of the writer's quantization, so 16-bit files round-trip exactly.
pub fn decode_wav(bytes: &[u8]) -> AudioResult<DecodedWav> {
    let reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let (samples, encoding): (Vec<f64>, SampleEncoding) = match spec.sample_format {
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            if !matches!(bits, 8 | 16 | 24 | 32) {
                return Err(AudioError::invalid_param(
                    "wav.bits_per_sample",
                    format!("unsupported bit depth {}", bits),
                ));
            }
            let scale = ((1i64 << (bits - 1)) - 1) as f64;
            let samples = reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<Result<Vec<_>, _>>()?;
            (samples, SampleEncoding::Int(bits))
        }
        hound::SampleFormat::Float => {
            let samples = reader
                .into_samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<Result<Vec<_>, _>>()?;
            (samples, SampleEncoding::Float32)
        }
    };

    let buffer = PcmBuffer::from_interleaved(&samples, channels, spec.sample_rate)?;
    Ok(DecodedWav { buffer, encoding })
}

/// Reads and decodes a WAV file from disk.
pub fn read_wav_file(path: &Path) -> AudioResult<DecodedWav> {
    let bytes = std::fs::read(path)?;
    decode_wav(&bytes)
}
