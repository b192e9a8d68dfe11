//! Core WAV writing and PCM conversion functions.

use std::io::{self, Cursor, Write};

use super::format::WavFormat;
use crate::error::AudioResult;
use crate::pcm::PcmBuffer;

/// Writes a complete 16-bit PCM WAV file to a writer.
///
/// The header carries no timestamps or optional chunks, so identical samples
/// always produce identical bytes.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = pcm_data.len() as u32;
    let file_size = 36 + data_size;

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?; // PCM
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&format.bits_per_sample.to_le_bytes())?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;

    Ok(())
}

/// Writes a WAV file to a byte vector.
pub fn write_wav_to_vec(format: &WavFormat, pcm_data: &[u8]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(44 + pcm_data.len());
    write_wav(&mut buffer, format, pcm_data).expect("writing to Vec should not fail");
    buffer
}

/// Quantizes one sample to 16-bit: `round(clamp(x) * 32767)`.
#[inline]
pub fn quantize_16(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

/// Converts f64 samples to little-endian 16-bit PCM bytes, clipping to [-1, 1].
pub fn samples_to_pcm16(samples: &[f64]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        pcm.extend_from_slice(&quantize_16(sample).to_le_bytes());
    }
    pcm
}

/// Converts a buffer to interleaved 16-bit PCM bytes.
pub fn buffer_to_pcm16(buffer: &PcmBuffer) -> Vec<u8> {
    samples_to_pcm16(&buffer.interleaved())
}

/// Encodes a buffer as a deterministic 16-bit WAV file.
pub fn encode_pcm16(buffer: &PcmBuffer) -> AudioResult<Vec<u8>> {
    let format = WavFormat::for_buffer(buffer)?;
    Ok(write_wav_to_vec(&format, &buffer_to_pcm16(buffer)))
}

/// Encodes a buffer as a 32-bit float WAV file.
pub fn encode_float32(buffer: &PcmBuffer) -> AudioResult<Vec<u8>> {
    let format = WavFormat::for_buffer(buffer)?;
    let spec = hound::WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for sample in buffer.interleaved() {
            writer.write_sample(sample as f32)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}
