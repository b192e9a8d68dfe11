//! Ownership watermarks.
//!
//! A caller string is wrapped in a [`WatermarkPayload`], framed into a
//! bitstream and written into the buffer by one of four codecs selected by
//! [`WatermarkMethod`]. Spectral and LSB marks can be read back; temporal and
//! echo marks are embed only and [`extract`] returns `None` for them.
//!
//! Multi-channel buffers carry the same bitstream on every channel and are
//! read from channel 0.

mod bitstream;
mod echo;
mod lsb;
mod payload;
mod spectral;
mod temporal;
mod wav_api;


use voxmill_spec::{WatermarkMethod, WatermarkOptions};

use crate::error::{AudioError, AudioResult};
use crate::pcm::PcmBuffer;

pub use bitstream::{
    bits_to_bytes, bytes_to_bits, encode_frame, frame_bits, parse_header, HEADER_BITS,
    MAX_PAYLOAD_BYTES, SYNC_WORD,
};
pub use echo::{echo_delay_samples, EchoCodec, ECHO_DELAY_SECONDS};
pub use lsb::LsbCodec;
pub use payload::WatermarkPayload;
pub use spectral::{carrier_bins, SpectralCodec, BITS_PER_FRAME, FRAME_SIZE, HOP_SIZE};
pub use temporal::TemporalCodec;
pub use wav_api::{embed_wav, extract_wav, ExtractionResult};

/// One embedding strategy over a framed bitstream.
pub trait WatermarkCodec: Send + Sync {
    /// The method this codec implements.
    fn method(&self) -> WatermarkMethod;

    /// Number of bits a channel of `len` samples can carry.
    fn capacity_bits(&self, len: usize, sample_rate: u32) -> usize;

    /// Writes `bits` into one channel. Callers check capacity first.
    fn embed_channel(&self, samples: &mut [f64], bits: &[bool], strength: f64, sample_rate: u32);

    /// Reads payload bytes back from one channel.
    fn extract_channel(&self, _samples: &[f64], _sample_rate: u32) -> Option<Vec<u8>> {
        None
    }
}

/// Returns the codec for `method`.
pub fn codec_for(method: WatermarkMethod) -> &'static dyn WatermarkCodec {
    match method {
        WatermarkMethod::Spectral => &SpectralCodec,
        WatermarkMethod::Temporal => &TemporalCodec,
        WatermarkMethod::Echo => &EchoCodec,
        WatermarkMethod::Lsb => &LsbCodec,
    }
}

/// Parses a method name, failing with [`AudioError::UnsupportedMethod`].
pub fn parse_method(name: &str) -> AudioResult<WatermarkMethod> {
    name.parse()
        .map_err(|method| AudioError::UnsupportedMethod { method })
}

/// Largest `data` + `auxiliary` length in bytes that fits a buffer, or 0.
pub fn capacity_bytes(method: WatermarkMethod, buffer: &PcmBuffer) -> usize {
    // Payload JSON with empty data and auxiliary
    let overhead = WatermarkPayload::new("", "")
        .to_bytes()
        .map(|b| b.len())
        .unwrap_or(0);
    let bits = codec_for(method).capacity_bits(buffer.len(), buffer.sample_rate());
    (bits.saturating_sub(HEADER_BITS) / 8).saturating_sub(overhead)
}

/// Embeds `payload` into a copy of `buffer`.
///
/// # Errors
///
/// - [`AudioError::InvalidParameter`] when strength is outside 0..=100
/// - [`AudioError::InsufficientCapacity`] when the buffer is too short
pub fn embed(
    buffer: &PcmBuffer,
    payload: &str,
    options: &WatermarkOptions,
) -> AudioResult<PcmBuffer> {
    if !options.strength.is_finite() || !(0.0..=100.0).contains(&options.strength) {
        return Err(AudioError::invalid_param(
            "watermark.strength",
            format!("must be 0-100, got {}", options.strength),
        ));
    }

    let record = WatermarkPayload::new(payload, options.auxiliary.as_str());
    let bits = encode_frame(&record.to_bytes()?)?;

    let codec = codec_for(options.method);
    let available = codec.capacity_bits(buffer.len(), buffer.sample_rate());
    if bits.len() > available {
        return Err(AudioError::InsufficientCapacity {
            required: bits.len(),
            available,
        });
    }

    let mut marked = buffer.clone();
    let sample_rate = marked.sample_rate();
    for channel in marked.channels_mut() {
        codec.embed_channel(channel, &bits, options.strength, sample_rate);
    }

    log::debug!(
        "embedded {} watermark {} ({} bits, strength {})",
        options.method,
        record.id,
        bits.len(),
        options.strength
    );
    Ok(marked)
}

/// Reads a watermark back. Returns the original payload string, or `None`
/// when there is no intact mark or the method has no reader.
pub fn extract(buffer: &PcmBuffer, method: WatermarkMethod) -> Option<String> {
    if !method.is_extractable() {
        log::debug!("{} watermarks are embed only", method);
        return None;
    }
    let channel = buffer.channel(0)?;
    let bytes = codec_for(method).extract_channel(channel, buffer.sample_rate())?;
    WatermarkPayload::from_bytes(&bytes).map(|p| p.data)
}
