//! File helpers shared by commands.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use voxmill_audio::wav::{decode_wav, encode_float32, encode_pcm16, DecodedWav, SampleEncoding};
use voxmill_audio::PcmBuffer;
use voxmill_spec::GenerationError;

/// Reads a file, naming it in the error.
pub fn read_bytes(path: &str) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read file: {}", path))
}

/// Reads and decodes a WAV file.
pub fn read_wav(path: &str) -> Result<DecodedWav> {
    let bytes = read_bytes(path)?;
    decode_wav(&bytes)
        .map_err(GenerationError::from_backend)
        .with_context(|| format!("Failed to decode WAV file: {}", path))
}

/// Writes a file, creating parent directories.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Encodes `buffer` as float if `encoding` is float, else 16-bit PCM.
pub fn encode_as(buffer: &PcmBuffer, encoding: SampleEncoding) -> Result<Vec<u8>> {
    let bytes = match encoding {
        SampleEncoding::Float32 => encode_float32(buffer),
        SampleEncoding::Int(_) => encode_pcm16(buffer),
    };
    bytes.map_err(|e| GenerationError::from_backend(e).into())
}
