//! Configuration management for dxt.
//!
//! Parses `dxt.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [template]
//! primary_part = "word/document.xml"
//!
//! [render]
//! strict = true
//!
//! [layout]
//! section_start = "nextPage"
//! restart_page_numbering = true
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config;
/// layout entries are merged over the `[layout]` table.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the primary part name.
    pub primary_part: Option<String>,
    /// Override strict placeholder handling.
    pub strict: Option<bool>,
    /// Additional or overriding layout options.
    pub layout: Vec<(String, String)>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dxt.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template configuration.
    pub template: TemplateConfig,
    /// Render configuration.
    pub render: RenderConfig,
    /// Layout table as parsed from TOML.
    layout: BTreeMap<String, toml::Value>,

    /// Layout options as strings (set after loading).
    #[serde(skip)]
    pub layout_resolved: BTreeMap<String, String>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Template configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Name of the part whose body is repeated per context.
    pub primary_part: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            primary_part: "word/document.xml".to_owned(),
        }
    }
}

/// Render configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Fail on placeholders with no value in the context.
    pub strict: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dxt.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, so they take precedence over
    /// config file values.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Search for a config file in `start` and its parents.
    #[must_use]
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(primary_part) = &settings.primary_part {
            self.template.primary_part.clone_from(primary_part);
        }
        if let Some(strict) = settings.strict {
            self.render.strict = strict;
        }
        for (name, value) in &settings.layout {
            self.layout_resolved.insert(name.clone(), value.clone());
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.resolve_layout()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Convert the `[layout]` table to string options.
    fn resolve_layout(&mut self) -> Result<(), ConfigError> {
        self.layout_resolved = self
            .layout
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    toml::Value::String(s) => s.clone(),
                    toml::Value::Boolean(b) => b.to_string(),
                    toml::Value::Integer(i) => i.to_string(),
                    other => {
                        return Err(ConfigError::Validation(format!(
                            "layout.{name} must be a string, boolean or integer, got {}",
                            other.type_str()
                        )));
                    }
                };
                Ok((name.clone(), value))
            })
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let primary = &self.template.primary_part;
        if primary.is_empty() {
            return Err(ConfigError::Validation(
                "template.primary_part cannot be empty".to_owned(),
            ));
        }
        if primary.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "template.primary_part must name a file, got `{primary}`"
            )));
        }
        Ok(())
    }
}
