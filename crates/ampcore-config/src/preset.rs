//! Preset file format and operations.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A named, serializable snapshot of the amp's parameter surface plus the
/// currently-loaded model and cabinet file paths.
///
/// # TOML Format
///
/// ```toml
/// name = "Bedroom Crunch"
/// model_path = "models/crunch.json"
/// cabinet_path = "cabinets/4x12.wav"
///
/// [parameters]
/// pregain_db = 6.0
/// bass_db = 2.0
/// mid_db = -1.5
/// treble_db = 3.0
/// presence_db = 0.0
/// master_db = -3.0
/// bypass_mix = 0.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Parameter name -> target value. Applied through the same entry point
    /// a live host call would use, so unknown names are skipped by the
    /// caller rather than rejecting the whole file.
    #[serde(default)]
    pub parameters: BTreeMap<String, f32>,

    /// Path to the neural-network model JSON, if one should be loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,

    /// Path to the cabinet impulse response, if one should be loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cabinet_path: Option<String>,
}

impl Preset {
    /// Create a new, empty preset with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeMap::new(),
            model_path: None,
            cabinet_path: None,
        }
    }

    /// Set a parameter value, returning `self` for chaining.
    pub fn with_parameter(mut self, name: impl Into<String>, value: f32) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Set the model path, returning `self` for chaining.
    pub fn with_model_path(mut self, path: impl Into<String>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Set the cabinet path, returning `self` for chaining.
    pub fn with_cabinet_path(mut self, path: impl Into<String>) -> Self {
        self.cabinet_path = Some(path.into());
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
