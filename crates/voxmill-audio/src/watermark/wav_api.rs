//! Watermarking over WAV bytes.

use serde::{Deserialize, Serialize};
use voxmill_spec::{WatermarkMethod, WatermarkOptions};

use super::{embed, extract};
use crate::error::AudioResult;
use crate::pcm::PcmBuffer;
use crate::wav::{decode_wav, encode_float32, encode_pcm16, SampleEncoding};

/// Outcome of reading a watermark from WAV bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Whether an intact mark was found.
    pub success: bool,
    /// The embedded payload string.
    pub payload: Option<String>,
}

impl ExtractionResult {
    fn from_payload(payload: Option<String>) -> Self {
        Self {
            success: payload.is_some(),
            payload,
        }
    }
}

fn encode_like(buffer: &PcmBuffer, encoding: SampleEncoding) -> AudioResult<Vec<u8>> {
    match encoding {
        SampleEncoding::Float32 => encode_float32(buffer),
        SampleEncoding::Int(_) => encode_pcm16(buffer),
    }
}

/// Decodes WAV bytes, embeds `payload` and re-encodes.
///
/// Float input comes back as 32-bit float. Integer input of any depth comes
/// back as 16-bit PCM.
pub fn embed_wav(bytes: &[u8], options: &WatermarkOptions, payload: &str) -> AudioResult<Vec<u8>> {
    let decoded = decode_wav(bytes)?;
    let marked = embed(&decoded.buffer, payload, options)?;
    encode_like(&marked, decoded.encoding)
}

/// Decodes WAV bytes and reads a watermark.
///
/// Undecodable bytes are an error. A missing or damaged mark is
/// `success: false`.
pub fn extract_wav(bytes: &[u8], method: WatermarkMethod) -> AudioResult<ExtractionResult> {
    let decoded = decode_wav(bytes)?;
    Ok(ExtractionResult::from_payload(extract(&decoded.buffer, method)))
}
