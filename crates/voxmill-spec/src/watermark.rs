//! Watermark embedding options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default embedding strength.
pub const DEFAULT_STRENGTH: f64 = 50.0;

/// Maximum embedding strength.
pub const MAX_STRENGTH: f64 = 100.0;

/// Carrier used to hide the watermark bitstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkMethod {
    /// Bin magnitude offsets in the FFT spectrum.
    #[default]
    Spectral,
    /// Per-bit amplitude scaling. Embed only.
    Temporal,
    /// Short delayed copies on 1-bits. Embed only.
    Echo,
    /// Least significant bit of 16-bit quantized samples.
    Lsb,
}

impl WatermarkMethod {
    /// Returns the wire name of this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            WatermarkMethod::Spectral => "spectral",
            WatermarkMethod::Temporal => "temporal",
            WatermarkMethod::Echo => "echo",
            WatermarkMethod::Lsb => "lsb",
        }
    }

    /// Whether a mark embedded with this method can be read back.
    pub fn is_extractable(&self) -> bool {
        matches!(self, WatermarkMethod::Spectral | WatermarkMethod::Lsb)
    }
}

impl fmt::Display for WatermarkMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatermarkMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spectral" => Ok(WatermarkMethod::Spectral),
            "temporal" => Ok(WatermarkMethod::Temporal),
            "echo" => Ok(WatermarkMethod::Echo),
            "lsb" => Ok(WatermarkMethod::Lsb),
            _ => Err(s.to_string()),
        }
    }
}

fn default_strength() -> f64 {
    DEFAULT_STRENGTH
}

/// Options for a single embed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkOptions {
    /// Carrier method.
    #[serde(default)]
    pub method: WatermarkMethod,
    /// Embedding strength, 0-100. Zero embeds a mark that cannot be recovered.
    #[serde(default = "default_strength")]
    pub strength: f64,
    /// Extra text bound into the payload checksum.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auxiliary: String,
}

impl WatermarkOptions {
    /// Creates options for `method` at the default strength.
    pub fn new(method: WatermarkMethod) -> Self {
        Self {
            method,
            strength: DEFAULT_STRENGTH,
            auxiliary: String::new(),
        }
    }

    /// Sets the strength.
    pub fn strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    /// Sets the auxiliary text.
    pub fn auxiliary(mut self, auxiliary: impl Into<String>) -> Self {
        self.auxiliary = auxiliary.into();
        self
    }
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self::new(WatermarkMethod::default())
    }
}
