//! Multi-channel PCM buffer.

use crate::error::{AudioError, AudioResult};

/// Multi-channel float audio at a fixed sample rate.
///
/// Every channel has the same length and the sample rate is non-zero. Both
/// are checked on construction and preserved by every method, so stages can
/// index channels in lockstep without re-checking.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    channels: Vec<Vec<f64>>,
    sample_rate: u32,
}

impl PcmBuffer {
    /// Creates a buffer from per-channel samples.
    pub fn new(channels: Vec<Vec<f64>>, sample_rate: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        if channels.is_empty() {
            return Err(AudioError::dimension("buffer needs at least one channel"));
        }
        let len = channels[0].len();
        if let Some((i, ch)) = channels.iter().enumerate().find(|(_, c)| c.len() != len) {
            return Err(AudioError::dimension(format!(
                "channel {} has {} samples, channel 0 has {}",
                i,
                ch.len(),
                len
            )));
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Creates a single-channel buffer.
    pub fn mono(samples: Vec<f64>, sample_rate: u32) -> AudioResult<Self> {
        Self::new(vec![samples], sample_rate)
    }

    /// Creates a zero-filled buffer.
    pub fn silence(num_channels: usize, len: usize, sample_rate: u32) -> AudioResult<Self> {
        Self::new(vec![vec![0.0; len]; num_channels], sample_rate)
    }

    /// De-interleaves `samples` into `num_channels` channels.
    pub fn from_interleaved(
        samples: &[f64],
        num_channels: usize,
        sample_rate: u32,
    ) -> AudioResult<Self> {
        if num_channels == 0 || samples.len() % num_channels != 0 {
            return Err(AudioError::dimension(format!(
                "{} interleaved samples do not divide into {} channels",
                samples.len(),
                num_channels
            )));
        }
        let frames = samples.len() / num_channels;
        let mut channels = vec![Vec::with_capacity(frames); num_channels];
        for frame in samples.chunks_exact(num_channels) {
            for (ch, &s) in channels.iter_mut().zip(frame) {
                ch.push(s);
            }
        }
        Self::new(channels, sample_rate)
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    /// True when the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Samples of channel `index`.
    pub fn channel(&self, index: usize) -> Option<&[f64]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// All channels.
    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    /// Mutable access to every channel's samples. Lengths stay fixed.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f64]> + '_ {
        self.channels.iter_mut().map(Vec::as_mut_slice)
    }

    /// Replaces all channels, e.g. after a length-changing transform.
    pub fn replace_channels(&mut self, channels: Vec<Vec<f64>>) -> AudioResult<()> {
        if channels.len() != self.channels.len() {
            return Err(AudioError::dimension(format!(
                "expected {} channels, got {}",
                self.channels.len(),
                channels.len()
            )));
        }
        *self = Self::new(channels, self.sample_rate)?;
        Ok(())
    }

    /// Consumes the buffer, returning its channels.
    pub fn into_channels(self) -> Vec<Vec<f64>> {
        self.channels
    }

    /// True when `other` has the same channel count and sample rate.
    pub fn same_format(&self, other: &PcmBuffer) -> bool {
        self.num_channels() == other.num_channels() && self.sample_rate == other.sample_rate
    }

    /// Checks that `other` can be combined sample-for-sample with `self`.
    pub fn check_compatible(&self, other: &PcmBuffer) -> AudioResult<()> {
        if self.sample_rate != other.sample_rate {
            return Err(AudioError::SampleRateMismatch {
                expected: self.sample_rate,
                found: other.sample_rate,
            });
        }
        if self.num_channels() != other.num_channels() {
            return Err(AudioError::dimension(format!(
                "{} channels vs {} channels",
                self.num_channels(),
                other.num_channels()
            )));
        }
        Ok(())
    }

    /// Appends `other` after `self`.
    pub fn concat(&self, other: &PcmBuffer) -> AudioResult<Self> {
        self.check_compatible(other)?;
        let channels = self
            .channels
            .iter()
            .zip(&other.channels)
            .map(|(a, b)| {
                let mut joined = Vec::with_capacity(a.len() + b.len());
                joined.extend_from_slice(a);
                joined.extend_from_slice(b);
                joined
            })
            .collect();
        Ok(Self {
            channels,
            sample_rate: self.sample_rate,
        })
    }

    /// Copy zero-padded to at least `len` samples per channel.
    pub fn padded_to(&self, len: usize) -> Self {
        let channels = self
            .channels
            .iter()
            .map(|c| {
                let mut padded = c.clone();
                if padded.len() < len {
                    padded.resize(len, 0.0);
                }
                padded
            })
            .collect();
        Self {
            channels,
            sample_rate: self.sample_rate,
        }
    }

    /// Largest absolute sample value across all channels.
    pub fn peak(&self) -> f64 {
        self.channels
            .iter()
            .flat_map(|c| c.iter())
            .fold(0.0_f64, |a, &b| a.max(b.abs()))
    }

    /// Frame-interleaved samples (`L R L R ...` for stereo).
    pub fn interleaved(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.len() * self.num_channels());
        for i in 0..self.len() {
            for ch in &self.channels {
                out.push(ch[i]);
            }
        }
        out
    }
}
