//! Two-voice mixing descriptions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the secondary voice is combined with the primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixMode {
    /// Constant weighted sum.
    #[default]
    Blend,
    /// Secondary fades in, holds, then fades out.
    Morph,
    /// Hard switch between voices every crossfade period.
    Alternate,
    /// Sum with soft saturation.
    Layered,
}

impl MixMode {
    /// Returns the wire name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            MixMode::Blend => "blend",
            MixMode::Morph => "morph",
            MixMode::Alternate => "alternate",
            MixMode::Layered => "layered",
        }
    }
}

impl fmt::Display for MixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MixMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blend" => Ok(MixMode::Blend),
            "morph" => Ok(MixMode::Morph),
            "alternate" => Ok(MixMode::Alternate),
            "layered" => Ok(MixMode::Layered),
            other => Err(format!(
                "unknown mix mode '{}', expected blend, morph, alternate or layered",
                other
            )),
        }
    }
}

/// Mixing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixSpec {
    /// Share of the secondary voice, 0-100.
    pub mix_ratio: f64,
    /// Fade length for `morph`, switch period for `alternate`.
    #[serde(default)]
    pub crossfade_seconds: f64,
    /// Combination mode.
    #[serde(default)]
    pub mode: MixMode,
}

impl MixSpec {
    /// Creates a mix spec with no crossfade.
    pub fn new(mode: MixMode, mix_ratio: f64) -> Self {
        Self {
            mix_ratio,
            crossfade_seconds: 0.0,
            mode,
        }
    }

    /// Sets the crossfade length.
    pub fn with_crossfade(mut self, seconds: f64) -> Self {
        self.crossfade_seconds = seconds;
        self
    }

    /// Ratio as a 0.0-1.0 weight of the secondary voice.
    pub fn weight(&self) -> f64 {
        (self.mix_ratio / 100.0).clamp(0.0, 1.0)
    }
}

impl Default for MixSpec {
    fn default() -> Self {
        Self::new(MixMode::Blend, 50.0)
    }
}
