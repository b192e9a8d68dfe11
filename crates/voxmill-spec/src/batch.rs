//! Batch rendering requests and job status.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::effect::EffectSpec;
use crate::mix::MixSpec;
use crate::watermark::WatermarkOptions;

/// How finished items are packaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// One artifact per item.
    #[default]
    Individual,
    /// All items joined into a single artifact.
    Concatenated,
    /// Per-item artifacts plus an M3U playlist.
    Playlist,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputMode::Individual => "individual",
            OutputMode::Concatenated => "concatenated",
            OutputMode::Playlist => "playlist",
        };
        f.write_str(name)
    }
}

fn default_prefix() -> String {
    "item".to_string()
}

fn default_extension() -> String {
    "wav".to_string()
}

/// File naming for packaged items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingOptions {
    /// File name prefix.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// File extension without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl NamingOptions {
    /// File name for a 1-based item index: `{prefix}_{index:03}.{extension}`.
    pub fn file_name(&self, index: usize) -> String {
        format!("{}_{:03}.{}", self.prefix, index, self.extension)
    }

    /// File name for a concatenated or playlist artifact.
    pub fn package_name(&self, extension: &str) -> String {
        format!("{}_all.{}", self.prefix, extension)
    }
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            extension: default_extension(),
        }
    }
}

/// Secondary voice mixed into an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMix {
    /// Voice rendered as the secondary signal.
    pub voice_id: String,
    /// Mixing parameters.
    #[serde(flatten)]
    pub spec: MixSpec,
}

/// A single text to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Text handed to the synthesizer.
    pub text: String,
    /// Primary voice.
    pub voice_id: String,
    /// Effect chain applied after synthesis, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<EffectSpec>,
    /// Emotion weights for the synthesizer.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub emotions: BTreeMap<String, f64>,
    /// Optional second voice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mix: Option<ItemMix>,
}

impl BatchItem {
    /// Creates an item with no effects, emotions, or mix.
    pub fn new(text: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.into(),
            effects: Vec::new(),
            emotions: BTreeMap::new(),
            mix: None,
        }
    }

    /// Appends an effect.
    pub fn effect(mut self, effect: EffectSpec) -> Self {
        self.effects.push(effect);
        self
    }

    /// Sets an emotion weight.
    pub fn emotion(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.emotions.insert(name.into(), weight);
        self
    }

    /// Mixes a second voice into this item.
    pub fn mix(mut self, voice_id: impl Into<String>, spec: MixSpec) -> Self {
        self.mix = Some(ItemMix {
            voice_id: voice_id.into(),
            spec,
        });
        self
    }
}

/// Watermark applied to every item of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkRequest {
    /// Text to embed.
    pub payload: String,
    /// Embedding options.
    #[serde(flatten)]
    pub options: WatermarkOptions,
}

/// A multi-item rendering request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Caller-chosen job identifier.
    pub job_id: String,
    /// Items, rendered in order.
    pub items: Vec<BatchItem>,
    /// Packaging mode.
    #[serde(default)]
    pub output_mode: OutputMode,
    /// Naming for packaged files.
    #[serde(default)]
    pub naming: NamingOptions,
    /// Optional watermark for every item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<WatermarkRequest>,
}

impl BatchRequest {
    /// Creates a new request builder.
    pub fn builder(job_id: impl Into<String>) -> BatchRequestBuilder {
        BatchRequestBuilder::new(job_id)
    }

    /// Parses a request from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the request to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the request to pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the request to a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Total length of all item texts in characters.
    pub fn total_text_chars(&self) -> usize {
        self.items.iter().map(|i| i.text.chars().count()).sum()
    }
}

/// Builder for [`BatchRequest`].
#[derive(Debug, Clone)]
pub struct BatchRequestBuilder {
    job_id: String,
    items: Vec<BatchItem>,
    output_mode: OutputMode,
    naming: NamingOptions,
    watermark: Option<WatermarkRequest>,
}

impl BatchRequestBuilder {
    /// Creates a new request builder.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            items: Vec::new(),
            output_mode: OutputMode::default(),
            naming: NamingOptions::default(),
            watermark: None,
        }
    }

    /// Adds a plain item.
    pub fn item(mut self, text: impl Into<String>, voice_id: impl Into<String>) -> Self {
        self.items.push(BatchItem::new(text, voice_id));
        self
    }

    /// Adds a fully described item.
    pub fn push(mut self, item: BatchItem) -> Self {
        self.items.push(item);
        self
    }

    /// Sets the packaging mode.
    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Sets the naming options.
    pub fn naming(mut self, prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        self.naming = NamingOptions {
            prefix: prefix.into(),
            extension: extension.into(),
        };
        self
    }

    /// Watermarks every item with `payload`.
    pub fn watermark(mut self, payload: impl Into<String>, options: WatermarkOptions) -> Self {
        self.watermark = Some(WatermarkRequest {
            payload: payload.into(),
            options,
        });
        self
    }

    /// Builds the request.
    pub fn build(self) -> BatchRequest {
        BatchRequest {
            job_id: self.job_id,
            items: self.items,
            output_mode: self.output_mode,
            naming: self.naming,
            watermark: self.watermark,
        }
    }
}

/// Lifecycle state of a batch job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// True for `completed`, `failed` and `cancelled`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectKind;
    use crate::mix::MixMode;
    use crate::watermark::WatermarkMethod;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder() {
        let request = BatchRequest::builder("job-0001")
            .item("Hello", "narrator")
            .push(
                BatchItem::new("World", "narrator")
                    .effect(EffectSpec::new(EffectKind::Reverb, 30.0))
                    .emotion("joy", 0.8)
                    .mix("whisper", MixSpec::new(MixMode::Blend, 25.0)),
            )
            .output_mode(OutputMode::Playlist)
            .naming("chapter", "wav")
            .watermark("owner-7", WatermarkOptions::new(WatermarkMethod::Lsb))
            .build();

        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[1].effects.len(), 1);
        assert_eq!(request.items[1].mix.as_ref().unwrap().voice_id, "whisper");
        assert_eq!(request.output_mode, OutputMode::Playlist);
        assert_eq!(request.total_text_chars(), 10);
    }

    #[test]
    fn test_request_json_round_trip() {
        let request = BatchRequest::builder("job-0002")
            .push(
                BatchItem::new("Hi", "narrator")
                    .mix("robot", MixSpec::new(MixMode::Morph, 60.0).with_crossfade(0.5)),
            )
            .watermark("owner", WatermarkOptions::default().strength(80.0))
            .build();
        let json = request.to_json().unwrap();
        let parsed = BatchRequest::from_json(&json).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_minimal_request_json() {
        let json = r#"{
            "job_id": "job-0003",
            "items": [
                {"text": "Hello", "voice_id": "narrator"},
                {"text": "World", "voice_id": "narrator",
                 "mix": {"voice_id": "robot", "mix_ratio": 40, "mode": "layered"}}
            ]
        }"#;
        let request = BatchRequest::from_json(json).unwrap();
        assert_eq!(request.output_mode, OutputMode::Individual);
        assert_eq!(request.naming, NamingOptions::default());
        let mix = request.items[1].mix.as_ref().unwrap();
        assert_eq!(mix.spec.mode, MixMode::Layered);
        assert_eq!(mix.spec.crossfade_seconds, 0.0);

        let json = r#"{"job_id":"j","items":[],"watermark":{"payload":"p"}}"#;
        let request = BatchRequest::from_json(json).unwrap();
        let watermark = request.watermark.unwrap();
        assert_eq!(watermark.options, WatermarkOptions::default());
    }

    #[test]
    fn test_naming() {
        let naming = NamingOptions::default();
        assert_eq!(naming.file_name(1), "item_001.wav");
        assert_eq!(naming.file_name(42), "item_042.wav");
        assert_eq!(naming.package_name("m3u"), "item_all.m3u");
    }

    #[test]
    fn test_job_status() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert_eq!(
            serde_json::to_string(&JobStatus::Cancelled).unwrap(),
            r#""cancelled""#
        );
    }
}
