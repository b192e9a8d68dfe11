//! Rendered job outputs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use voxmill_audio::PcmBuffer;

/// Payload of an artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactContent {
    /// Finished samples, shared read-only.
    Audio(Arc<PcmBuffer>),
    /// M3U playlist text.
    Playlist(String),
}

/// One output of a batch job. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioArtifact {
    /// Unique artifact id.
    pub id: Uuid,
    /// File name under the job's naming options.
    pub file_name: String,
    /// Text the artifact was rendered from.
    pub source_text: String,
    /// Samples or playlist text.
    pub content: ArtifactContent,
    /// Playing time in seconds.
    pub duration_seconds: f64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Whether the audio carries a watermark.
    pub watermarked: bool,
}

impl AudioArtifact {
    /// Wraps a finished buffer.
    pub fn audio(
        file_name: impl Into<String>,
        source_text: impl Into<String>,
        buffer: PcmBuffer,
        watermarked: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            source_text: source_text.into(),
            duration_seconds: buffer.duration_seconds(),
            content: ArtifactContent::Audio(Arc::new(buffer)),
            created_at: Utc::now(),
            watermarked,
        }
    }

    /// Wraps playlist text covering `duration_seconds` of audio.
    pub fn playlist(
        file_name: impl Into<String>,
        source_text: impl Into<String>,
        text: String,
        duration_seconds: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            source_text: source_text.into(),
            content: ArtifactContent::Playlist(text),
            duration_seconds,
            created_at: Utc::now(),
            watermarked: false,
        }
    }

    /// The samples, if this is an audio artifact.
    pub fn buffer(&self) -> Option<&PcmBuffer> {
        match &self.content {
            ArtifactContent::Audio(buffer) => Some(buffer.as_ref()),
            ArtifactContent::Playlist(_) => None,
        }
    }

    /// The playlist text, if this is a playlist artifact.
    pub fn playlist_text(&self) -> Option<&str> {
        match &self.content {
            ArtifactContent::Audio(_) => None,
            ArtifactContent::Playlist(text) => Some(text.as_str()),
        }
    }

    /// Serializable description without the payload.
    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            id: self.id,
            file_name: self.file_name.clone(),
            kind: match self.content {
                ArtifactContent::Audio(_) => ArtifactKind::Audio,
                ArtifactContent::Playlist(_) => ArtifactKind::Playlist,
            },
            source_text: self.source_text.clone(),
            duration_seconds: self.duration_seconds,
            created_at: self.created_at,
            watermarked: self.watermarked,
        }
    }
}

/// Artifact content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Audio,
    Playlist,
}

/// Artifact metadata for reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSummary {
    pub id: Uuid,
    pub file_name: String,
    pub kind: ArtifactKind,
    pub source_text: String,
    pub duration_seconds: f64,
    pub created_at: DateTime<Utc>,
    pub watermarked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_artifact() {
        let buffer = PcmBuffer::mono(vec![0.0; 8000], 16000).unwrap();
        let artifact = AudioArtifact::audio("item_001.wav", "Hello", buffer, true);
        assert_eq!(artifact.duration_seconds, 0.5);
        assert_eq!(artifact.buffer().map(|b| b.len()), Some(8000));
        assert_eq!(artifact.playlist_text(), None);

        let summary = artifact.summary();
        assert_eq!(summary.kind, ArtifactKind::Audio);
        assert!(summary.watermarked);
    }

    #[test]
    fn test_artifact_ids_unique() {
        let buffer = PcmBuffer::mono(vec![0.0; 10], 16000).unwrap();
        let a = AudioArtifact::audio("a.wav", "", buffer.clone(), false);
        let b = AudioArtifact::audio("a.wav", "", buffer, false);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_clone_shares_samples() {
        let buffer = PcmBuffer::mono(vec![0.1; 10], 16000).unwrap();
        let a = AudioArtifact::audio("a.wav", "", buffer, false);
        let b = a.clone();
        match (&a.content, &b.content) {
            (ArtifactContent::Audio(x), ArtifactContent::Audio(y)) => assert!(Arc::ptr_eq(x, y)),
            _ => unreachable!(),
        }
    }
}
