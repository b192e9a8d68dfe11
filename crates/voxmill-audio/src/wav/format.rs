//! WAV file format parameters.

use crate::error::{AudioError, AudioResult};
use crate::pcm::PcmBuffer;

/// Sample encoding of a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleEncoding {
    /// Signed integer PCM with the given bit depth (8, 16, 24 or 32).
    Int(u16),
    /// 32-bit IEEE float.
    Float32,
}

/// WAV file format parameters for the deterministic 16-bit writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample (always 16 for this writer).
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Creates a 16-bit format with `channels` channels.
    pub fn new(channels: u16, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    /// Creates a mono WAV format.
    pub fn mono(sample_rate: u32) -> Self {
        Self::new(1, sample_rate)
    }

    /// Creates a stereo WAV format.
    pub fn stereo(sample_rate: u32) -> Self {
        Self::new(2, sample_rate)
    }

    /// Format matching a buffer's channel count and rate.
    pub fn for_buffer(buffer: &PcmBuffer) -> AudioResult<Self> {
        let channels = u16::try_from(buffer.num_channels()).map_err(|_| {
            AudioError::dimension(format!(
                "{} channels exceed the WAV limit",
                buffer.num_channels()
            ))
        })?;
        Ok(Self::new(channels, buffer.sample_rate()))
    }

    pub(crate) fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    pub(crate) fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample()
    }

    pub(crate) fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}
