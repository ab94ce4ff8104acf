//! Descriptor manifests: serialized lists of command descriptors.
//!
//! A manifest is one source of descriptors (typically one module of a bot).
//! Several manifests may declare the same groups; they merge when built.
//!
//! # Examples
//!
//! ```
//! use command_tree_manifest::{DescriptorManifest, ManifestFormat};
//!
//! let json = r#"{
//!     "version": "1.0",
//!     "name": "moderation",
//!     "descriptors": [
//!         { "path": ["mod"], "kind": "group", "description": "Moderation tools" },
//!         { "path": ["mod", "ban"], "parameters": [
//!             { "name": "user", "type": { "entity": "user" }, "required": true }
//!         ] }
//!     ]
//! }"#;
//!
//! let manifest = DescriptorManifest::parse(json, ManifestFormat::Json).unwrap();
//! assert_eq!(manifest.descriptors.len(), 2);
//! assert_eq!(manifest.descriptors[1].parameters[0].name, "user");
//! ```

use std::path::Path;

use command_tree_core::CommandDescriptor;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, Result};

/// Serialization formats understood by the loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

impl ManifestFormat {
    /// Detects the format from a file extension (`json`, `yaml`, `yml`).
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ManifestError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Parses `text` in this format.
    pub fn parse<T: DeserializeOwned>(self, text: &str) -> Result<T> {
        Ok(match self {
            Self::Json => serde_json::from_str(text)?,
            Self::Yaml => serde_yaml::from_str(text)?,
        })
    }

    /// Serializes `value` in this format; JSON is pretty-printed.
    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        Ok(match self {
            Self::Json => serde_json::to_string_pretty(value)?,
            Self::Yaml => serde_yaml::to_string(value)?,
        })
    }

    /// Reads and parses the file at `path`, detecting its format.
    pub fn read<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
        let path = path.as_ref();
        let format = Self::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        format.parse(&text)
    }
}

/// A versioned list of descriptors from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorManifest {
    /// Manifest format version.
    pub version: String,
    /// Source name, used in log output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Descriptors, in registration order.
    #[serde(default)]
    pub descriptors: Vec<CommandDescriptor>,
}

impl DescriptorManifest {
    /// Creates an empty manifest.
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            name: None,
            descriptors: Vec::new(),
        }
    }

    /// Sets the source name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Appends a descriptor.
    pub fn with_descriptor(mut self, descriptor: CommandDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Parses and validates a manifest.
    ///
    /// # Errors
    ///
    /// Returns a parse error, or [`ManifestError::InvalidManifest`] when
    /// [`validate`](Self::validate) fails.
    pub fn parse(text: &str, format: ManifestFormat) -> Result<Self> {
        let manifest: Self = format.parse(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Loads and validates a manifest file, detecting its format from the
    /// extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let manifest: Self = ManifestFormat::read(path)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Saves the manifest in the format implied by the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = ManifestFormat::from_path(path)?.render(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Checks the fields the tree builder cannot check itself.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::InvalidManifest`] when the version is empty
    /// or a descriptor has an empty path segment.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(ManifestError::InvalidManifest(
                "version must not be empty".into(),
            ));
        }
        for (index, descriptor) in self.descriptors.iter().enumerate() {
            if descriptor.path.iter().any(|segment| segment.trim().is_empty()) {
                return Err(ManifestError::InvalidManifest(format!(
                    "descriptor {index} has an empty path segment"
                )));
            }
        }
        Ok(())
    }
}
