//! Engine configuration.
//!
//! Loaded from an explicit path or `<config_dir>/voxmill/config.json`;
//! every field has a default so a partial file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::batch::{NamingOptions, OutputMode};
use crate::budget::ProcessingBudget;
use crate::error::SpecError;
use crate::watermark::WatermarkOptions;

/// File name of the engine config inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

fn default_budget() -> String {
    "default".to_string()
}

/// Engine-wide defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Processing budget profile name.
    pub budget: String,
    /// Default watermark options when a command does not specify them.
    pub watermark: WatermarkOptions,
    /// Default output mode for requests built by tools.
    pub output_mode: OutputMode,
    /// Default file naming.
    pub naming: NamingOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            watermark: WatermarkOptions::default(),
            output_mode: OutputMode::default(),
            naming: NamingOptions::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a config file.
    pub fn from_path(path: &Path) -> Result<Self, SpecError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Default config location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("voxmill").join(CONFIG_FILE_NAME))
    }

    /// Loads `explicit` if given, else the default location if it exists,
    /// else built-in defaults.
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SpecError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Resolves the configured budget profile.
    pub fn budget_profile(&self) -> Result<ProcessingBudget, SpecError> {
        ProcessingBudget::by_name(&self.budget)
            .ok_or_else(|| SpecError::UnknownBudget(self.budget.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watermark::WatermarkMethod;
    use std::io::Write;

    #[test]
    fn test_partial_config() {
        let config = EngineConfig::from_json(r#"{"budget":"strict"}"#).unwrap();
        assert_eq!(config.budget, "strict");
        assert_eq!(config.watermark, WatermarkOptions::default());
        assert_eq!(config.budget_profile().unwrap().name, "strict");
    }

    #[test]
    fn test_unknown_budget() {
        let config = EngineConfig::from_json(r#"{"budget":"huge"}"#).unwrap();
        assert!(matches!(
            config.budget_profile(),
            Err(SpecError::UnknownBudget(name)) if name == "huge"
        ));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"watermark":{{"method":"lsb","strength":30}},"output_mode":"playlist"}}"#
        )
        .unwrap();

        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.watermark.method, WatermarkMethod::Lsb);
        assert_eq!(config.watermark.strength, 30.0);
        assert_eq!(config.output_mode, OutputMode::Playlist);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            EngineConfig::load(Some(&missing)),
            Err(SpecError::Io(_))
        ));
    }
}
