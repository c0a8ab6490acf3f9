//! Configuration management for schemabook
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schemabook.toml)
//! - Environment variables (SCHEMABOOK__*)
//!
//! ## Example config file (schemabook.toml):
//! ```toml
//! [[predefined.scalars]]
//! name = "Text"
//! description = "A UTF8 encoded text value"
//!
//! [[predefined.scalars]]
//! name = "Uuid"
//! description = "A 128 bit identifier"
//!
//! [validation]
//! suggest_names = true
//! max_suggestions = 3
//!
//! [output]
//! format = "pretty"
//! ```

use std::path::Path;

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::model::ModelInitOptions;
use crate::registry::PredefinedScalars;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemabookConfig {
    /// Built-in scalar types
    #[serde(default)]
    pub predefined: PredefinedConfig,

    /// Diagnostic settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Predefined scalar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredefinedConfig {
    /// Replaces the built-in set when given
    #[serde(default = "default_scalars")]
    pub scalars: Vec<ScalarEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Suggest similar names for undefined types
    #[serde(default = "default_true")]
    pub suggest_names: bool,

    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

// Default value functions
fn default_scalars() -> Vec<ScalarEntry> {
    PredefinedScalars::default()
        .iter()
        .map(|(name, description)| ScalarEntry {
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect()
}

fn default_true() -> bool {
    true
}

fn default_max_suggestions() -> usize {
    ModelInitOptions::default().max_suggestions
}

impl Default for PredefinedConfig {
    fn default() -> Self {
        Self {
            scalars: default_scalars(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            suggest_names: true,
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl From<&PredefinedConfig> for PredefinedScalars {
    fn from(config: &PredefinedConfig) -> Self {
        config
            .scalars
            .iter()
            .map(|entry| (entry.name.clone(), entry.description.clone()))
            .collect()
    }
}

impl From<&ValidationConfig> for ModelInitOptions {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            suggest_names: config.suggest_names,
            max_suggestions: config.max_suggestions,
        }
    }
}

impl SchemabookConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a required file on top of the defaults
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "schemabook.toml",
            ".schemabook.toml",
            "config/schemabook.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "schemabook", "schemabook") {
            let xdg_config = config_dir.config_dir().join("schemabook.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // SCHEMABOOK__VALIDATION__MAX_SUGGESTIONS=5
        builder = builder.add_source(
            Environment::with_prefix("SCHEMABOOK")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    pub fn predefined_scalars(&self) -> PredefinedScalars {
        PredefinedScalars::from(&self.predefined)
    }

    pub fn model_options(&self) -> ModelInitOptions {
        ModelInitOptions::from(&self.validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchemabookConfig::default();
        assert_eq!(config.predefined.scalars.len(), 3);
        assert!(config.validation.suggest_names);
        assert_eq!(config.output.format, OutputFormat::Pretty);
        assert_eq!(config.predefined_scalars(), PredefinedScalars::default());
        assert_eq!(config.model_options(), ModelInitOptions::default());
    }

    #[test]
    fn test_serialize_config() {
        let config = SchemabookConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[[predefined.scalars]]"));
        assert!(toml_str.contains("[validation]"));
        assert!(toml_str.contains("[output]"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[[predefined.scalars]]
name = "Uuid"
description = "A 128 bit identifier"

[validation]
max_suggestions = 1

[output]
format = "compact"
"#,
        )
        .unwrap();

        let config = SchemabookConfig::load_from(Some(path.as_path())).unwrap();
        let scalars = config.predefined_scalars();
        assert_eq!(scalars.len(), 1);
        assert_eq!(scalars.iter().next(), Some(("Uuid", "A 128 bit identifier")));
        assert_eq!(config.validation.max_suggestions, 1);
        assert!(config.validation.suggest_names);
        assert_eq!(config.output.format, OutputFormat::Compact);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SchemabookConfig::load_from(Some(dir.path().join("absent.toml").as_path())).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");

        let mut config = SchemabookConfig::default();
        config.validation.suggest_names = false;
        config.save(&path).unwrap();

        let loaded = SchemabookConfig::load_from(Some(path.as_path())).unwrap();
        assert!(!loaded.validation.suggest_names);
        assert_eq!(loaded.predefined.scalars, config.predefined.scalars);
    }
}
