//! # Configuration
//!
//! Run settings for the converter. Every field has a default, so a config
//! file only needs the keys it changes:
//!
//! ```yaml
//! input: chords.json
//! output-dir: ./cubase_presets
//! octave-offset: -2
//! product-prefix: Roland J-6
//! extension: chordpads
//! ```
//!
//! Command-line flags override values read from the file.

use crate::error::ChordPadsError;
use crate::preset::RenderOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "chords.json";
pub const DEFAULT_OUTPUT_DIR: &str = "./cubase_presets";
pub const DEFAULT_PRODUCT_PREFIX: &str = "Roland J-6";
pub const DEFAULT_EXTENSION: &str = "chordpads";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub octave_offset: i32,
    pub product_prefix: String,
    pub extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            octave_offset: 0,
            product_prefix: DEFAULT_PRODUCT_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Config {
    /// Parse a YAML config document.
    pub fn from_yaml(content: &str) -> Result<Self, ChordPadsError> {
        // An empty file deserializes as null, not as an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| ChordPadsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ChordPadsError> {
        let content = fs::read_to_string(path).map_err(|e| ChordPadsError::io(path, e))?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<(), ChordPadsError> {
        if self.extension.is_empty() || self.extension.contains(['/', '\\', '.']) {
            return Err(ChordPadsError::Config(format!(
                "extension must be a bare file extension, got \"{}\"",
                self.extension
            )));
        }
        if self.product_prefix.contains(['/', '\\']) {
            return Err(ChordPadsError::Config(format!(
                "product-prefix must not contain path separators, got \"{}\"",
                self.product_prefix
            )));
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            octave_offset: self.octave_offset,
        }
    }

    pub fn naming(&self) -> Naming {
        Naming {
            product_prefix: self.product_prefix.clone(),
            extension: self.extension.clone(),
        }
    }
}

/// How artifact file names are built, see [`crate::pipeline::artifact_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    pub product_prefix: String,
    pub extension: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            product_prefix: DEFAULT_PRODUCT_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.input, PathBuf::from("chords.json"));
        assert_eq!(config.output_dir, PathBuf::from("./cubase_presets"));
        assert_eq!(config.octave_offset, 0);
        assert_eq!(config.naming(), Naming::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("octave-offset: -2\noutput-dir: out\n").unwrap();
        assert_eq!(config.octave_offset, -2);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.render_options().octave_offset, -2);
    }

    #[test]
    fn test_empty_yaml() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::from_yaml("octave_offset: 1\n").unwrap_err();
        assert!(matches!(err, ChordPadsError::Config(_)));
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(Config::from_yaml("octave-offset: low\n").is_err());
    }

    #[test]
    fn test_invalid_extension() {
        assert!(Config::from_yaml("extension: .chordpads\n").is_err());
        assert!(Config::from_yaml("extension: a/b\n").is_err());
        assert!(Config::from_yaml("extension: \"\"\n").is_err());
        assert!(Config::from_yaml("product-prefix: a/b\n").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/chordpads.yaml")).unwrap_err();
        assert!(matches!(err, ChordPadsError::Io { .. }));
    }
}
