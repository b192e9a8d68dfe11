//! Offline synthesizer backed by pre-rendered voice clips.
//!
//! Each voice is one WAV file, `<dir>/<voice_id>.wav`. A request renders the
//! clip looped or trimmed to a length proportional to the text.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use voxmill_audio::wav::read_wav_file;
use voxmill_audio::PcmBuffer;
use voxmill_batch::{SynthesisError, SynthesisRequest, Synthesizer};

/// Rendered seconds per character of input text.
pub const SECONDS_PER_CHAR: f64 = 0.06;

/// Synthesizer that plays back voice clips from a directory.
#[derive(Debug)]
pub struct ClipSynthesizer {
    dir: PathBuf,
    seconds_per_char: f64,
    cache: Mutex<HashMap<String, Arc<PcmBuffer>>>,
}

impl ClipSynthesizer {
    /// Creates a synthesizer reading clips from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            seconds_per_char: SECONDS_PER_CHAR,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Overrides the rendered length per character.
    pub fn with_seconds_per_char(mut self, seconds: f64) -> Self {
        self.seconds_per_char = seconds;
        self
    }

    /// Directory clips are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the clip for `voice_id`.
    pub fn clip_path(&self, voice_id: &str) -> PathBuf {
        self.dir.join(format!("{}.wav", voice_id))
    }

    fn load(&self, voice_id: &str) -> Result<Arc<PcmBuffer>, SynthesisError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(clip) = cache.get(voice_id) {
            return Ok(Arc::clone(clip));
        }

        let path = self.clip_path(voice_id);
        if !path.is_file() {
            return Err(SynthesisError::UnknownVoice(voice_id.to_string()));
        }
        let decoded = read_wav_file(&path)
            .map_err(|e| SynthesisError::Backend(format!("{}: {}", path.display(), e)))?;
        if decoded.buffer.is_empty() {
            return Err(SynthesisError::Backend(format!(
                "{}: clip has no samples",
                path.display()
            )));
        }

        log::debug!(
            "loaded voice clip {} ({} samples at {} Hz)",
            path.display(),
            decoded.buffer.len(),
            decoded.buffer.sample_rate()
        );
        let clip = Arc::new(decoded.buffer);
        cache.insert(voice_id.to_string(), Arc::clone(&clip));
        Ok(clip)
    }

    fn rendered_len(&self, text: &str, sample_rate: u32) -> usize {
        let seconds = text.chars().count() as f64 * self.seconds_per_char;
        ((seconds * sample_rate as f64).round() as usize).max(1)
    }
}

impl Synthesizer for ClipSynthesizer {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<PcmBuffer, SynthesisError> {
        let clip = self.load(&request.voice_id)?;
        let len = self.rendered_len(&request.text, clip.sample_rate());
        let channels = clip
            .channels()
            .iter()
            .map(|channel| channel.iter().cycle().take(len).copied().collect())
            .collect();
        PcmBuffer::new(channels, clip.sample_rate())
            .map_err(|e| SynthesisError::Backend(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxmill_audio::encode_pcm16;

    fn write_clip(dir: &Path, voice_id: &str, samples: Vec<f64>) {
        let buffer = PcmBuffer::mono(samples, 1000).unwrap();
        std::fs::write(
            dir.join(format!("{}.wav", voice_id)),
            encode_pcm16(&buffer).unwrap(),
        )
        .unwrap();
    }

    fn request(text: &str, voice_id: &str) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            voice_id: voice_id.to_string(),
            emotions: Default::default(),
        }
    }

    #[test]
    fn test_length_follows_text() {
        let dir = tempfile::tempdir().unwrap();
        write_clip(dir.path(), "narrator", vec![0.25, -0.25, 0.5]);
        let synth = ClipSynthesizer::new(dir.path()).with_seconds_per_char(0.01);

        let short = synth.synthesize(&request("ab", "narrator")).unwrap();
        let long = synth.synthesize(&request("abcd", "narrator")).unwrap();
        assert_eq!(short.len(), 20);
        assert_eq!(long.len(), 40);
        assert_eq!(short.sample_rate(), 1000);

        // Clip is looped
        let samples = short.channel(0).unwrap();
        assert_eq!(samples[0], samples[3]);
        assert_eq!(samples[1], samples[4]);
    }

    #[test]
    fn test_missing_voice() {
        let dir = tempfile::tempdir().unwrap();
        let synth = ClipSynthesizer::new(dir.path());
        let err = synth.synthesize(&request("hi", "ghost")).unwrap_err();
        assert!(matches!(err, SynthesisError::UnknownVoice(ref v) if v == "ghost"));
    }

    #[test]
    fn test_undecodable_clip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.wav"), b"not a wav").unwrap();
        let synth = ClipSynthesizer::new(dir.path());
        let err = synth.synthesize(&request("hi", "broken")).unwrap_err();
        assert!(matches!(err, SynthesisError::Backend(_)));
    }
}
