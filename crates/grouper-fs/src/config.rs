//! Format-agnostic configuration loading and saving

use crate::{Error, NormalizedPath, Result, io};
use serde::{Serialize, de::DeserializeOwned};

/// Serialization format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Detect the format from the extension of `path`.
    ///
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn detect(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or("");
        match extension.to_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }

    /// Parse `content` in this format.
    pub fn parse<T: DeserializeOwned>(&self, path: &NormalizedPath, content: &str) -> Result<T> {
        let parsed = match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::ConfigParse {
            path: path.to_native(),
            format: self.name().into(),
            message,
        })
    }

    /// Render `value` in this format.
    pub fn render<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<String> {
        let rendered = match self {
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        };
        rendered.map_err(|message| Error::ConfigSerialize {
            path: path.to_native(),
            format: self.name().into(),
            message,
        })
    }
}

/// Format-agnostic configuration store.
///
/// Detects the format from the file extension and handles
/// serialization transparently. Saves are atomic.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = ConfigFormat::detect(path)?;
        let content = io::read_text(path)?;
        format.parse(path, &content)
    }

    /// Save configuration to a file.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let format = ConfigFormat::detect(path)?;
        let content = format.render(path, value)?;
        io::write_text(path, &content)
    }

    /// Save only when the rendered content differs from what is on disk.
    ///
    /// Returns `true` when the file was written.
    pub fn save_if_changed<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<bool> {
        let format = ConfigFormat::detect(path)?;
        let content = format.render(path, value)?;

        if path.is_file() {
            let current = io::read_text(path)?;
            if crate::checksum::compute_content_checksum(&current)
                == crate::checksum::compute_content_checksum(&content)
            {
                tracing::trace!(path = %path, "config unchanged, skipping write");
                return Ok(false);
            }
        }

        io::write_text(path, &content)?;
        Ok(true)
    }
}
