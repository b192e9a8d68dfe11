//! Effect descriptions for the post-processing chain.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum effect intensity.
pub const MAX_INTENSITY: f64 = 100.0;

/// Kind of signal effect.
///
/// Serialized as a snake_case string. Names the chain does not know are kept
/// as [`EffectKind::Unknown`] so that a request written for a newer engine
/// still deserializes and the effect is simply skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EffectKind {
    Reverb,
    Echo,
    Chorus,
    Distortion,
    PitchShift,
    TimeStretch,
    NoiseGate,
    Compressor,
    /// Unrecognized effect name.
    Unknown(String),
}

impl EffectKind {
    /// All kinds the chain can process, in declaration order.
    pub const KNOWN: [EffectKind; 8] = [
        EffectKind::Reverb,
        EffectKind::Echo,
        EffectKind::Chorus,
        EffectKind::Distortion,
        EffectKind::PitchShift,
        EffectKind::TimeStretch,
        EffectKind::NoiseGate,
        EffectKind::Compressor,
    ];

    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            EffectKind::Reverb => "reverb",
            EffectKind::Echo => "echo",
            EffectKind::Chorus => "chorus",
            EffectKind::Distortion => "distortion",
            EffectKind::PitchShift => "pitch_shift",
            EffectKind::TimeStretch => "time_stretch",
            EffectKind::NoiseGate => "noise_gate",
            EffectKind::Compressor => "compressor",
            EffectKind::Unknown(name) => name,
        }
    }

    /// Returns true for [`EffectKind::Unknown`].
    pub fn is_unknown(&self) -> bool {
        matches!(self, EffectKind::Unknown(_))
    }
}

impl From<String> for EffectKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "reverb" => EffectKind::Reverb,
            "echo" => EffectKind::Echo,
            "chorus" => EffectKind::Chorus,
            "distortion" => EffectKind::Distortion,
            "pitch_shift" => EffectKind::PitchShift,
            "time_stretch" => EffectKind::TimeStretch,
            "noise_gate" => EffectKind::NoiseGate,
            "compressor" => EffectKind::Compressor,
            _ => EffectKind::Unknown(name),
        }
    }
}

impl From<&str> for EffectKind {
    fn from(name: &str) -> Self {
        EffectKind::from(name.to_string())
    }
}

impl From<EffectKind> for String {
    fn from(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Unknown(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One effect in a chain: its kind, how strongly it applies, and optional
/// kind-specific overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    /// Effect kind.
    #[serde(rename = "type")]
    pub kind: EffectKind,
    /// Strength, 0-100. Zero bypasses the effect.
    pub intensity: f64,
    /// Kind-specific parameter overrides (e.g. `room_size`, `delay_ms`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, f64>,
}

impl EffectSpec {
    /// Creates an effect with no parameter overrides.
    pub fn new(kind: impl Into<EffectKind>, intensity: f64) -> Self {
        Self {
            kind: kind.into(),
            intensity,
            parameters: BTreeMap::new(),
        }
    }

    /// Adds a parameter override.
    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Returns `parameters[name]` or `default`.
    pub fn param(&self, name: &str, default: f64) -> f64 {
        self.parameters.get(name).copied().unwrap_or(default)
    }

    /// Intensity as a 0.0-1.0 fraction.
    pub fn amount(&self) -> f64 {
        self.intensity / MAX_INTENSITY
    }

    /// True when the effect leaves the signal untouched.
    pub fn is_bypassed(&self) -> bool {
        self.intensity <= 0.0
    }
}
