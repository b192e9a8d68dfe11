//! Bit framing for watermark payloads.
//!
//! A frame is a 32-bit header (16-bit sync word, 16-bit payload byte length,
//! both big endian) followed by the payload bytes. Bits are MSB first.

use crate::error::{AudioError, AudioResult};

/// Header sync word ("VM").
pub const SYNC_WORD: u16 = 0x564D;

/// Header length in bits.
pub const HEADER_BITS: usize = 32;

/// Largest payload a frame can describe.
pub const MAX_PAYLOAD_BYTES: usize = u16::MAX as usize;

/// Expands bytes into bits, MSB first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&b| (0..8).rev().map(move |i| (b >> i) & 1 == 1))
        .collect()
}

/// Packs bits into bytes, MSB first. A trailing partial byte is dropped.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
        .collect()
}

/// Builds the framed bitstream for `payload`.
pub fn encode_frame(payload: &[u8]) -> AudioResult<Vec<bool>> {
    if payload.len() > MAX_PAYLOAD_BYTES {
        return Err(AudioError::InsufficientCapacity {
            required: HEADER_BITS + payload.len() * 8,
            available: HEADER_BITS + MAX_PAYLOAD_BYTES * 8,
        });
    }
    let mut header = Vec::with_capacity(4 + payload.len());
    header.extend_from_slice(&SYNC_WORD.to_be_bytes());
    header.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    header.extend_from_slice(payload);
    Ok(bytes_to_bits(&header))
}

/// Reads a header, returning the payload byte length when the sync word
/// matches.
pub fn parse_header(bits: &[bool]) -> Option<usize> {
    if bits.len() < HEADER_BITS {
        return None;
    }
    let bytes = bits_to_bytes(&bits[..HEADER_BITS]);
    let sync = u16::from_be_bytes([bytes[0], bytes[1]]);
    if sync != SYNC_WORD {
        return None;
    }
    let len = u16::from_be_bytes([bytes[2], bytes[3]]) as usize;
    if len == 0 {
        return None;
    }
    Some(len)
}

/// Total frame length in bits for a payload of `payload_bytes`.
pub fn frame_bits(payload_bytes: usize) -> usize {
    HEADER_BITS + payload_bytes * 8
}
