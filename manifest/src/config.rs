//! Engine configuration.
//!
//! A small YAML file that tunes how descriptors become a tree: the limits
//! the tree is validated against, the switch prefix used by text dispatch,
//! and command paths to leave out regardless of what the manifests say.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! switch_prefix: "--"
//! limits:
//!   max_depth: 3
//!   max_parameters: 10
//! exclude:
//!   - admin::purge
//!   - debug
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use command_tree_core::{
    CommandDescriptor, DEFAULT_SWITCH_PREFIX, Limits, PATH_SEPARATOR, TokenizerOptions,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

fn default_version() -> String {
    "1.0".to_string()
}

fn default_switch_prefix() -> String {
    DEFAULT_SWITCH_PREFIX.to_string()
}

/// Top-level engine configuration.
///
/// Every field has a default, so an empty document is a valid configuration.
///
/// # Examples
///
/// ```
/// use command_tree_manifest::EngineConfig;
///
/// let config: EngineConfig = serde_yaml::from_str("exclude: [admin]").unwrap();
/// assert!(config.is_excluded("admin"));
/// assert!(config.is_excluded("admin::ban"));
/// assert!(!config.is_excluded("administer"));
/// assert_eq!(config.limits.max_depth, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Configuration format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Validation limits.
    #[serde(default)]
    pub limits: Limits,
    /// Prefix marking a named switch in text input.
    #[serde(default = "default_switch_prefix")]
    pub switch_prefix: String,
    /// Dotted paths (`"admin::purge"`) to exclude, with everything below them.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            limits: Limits::default(),
            switch_prefix: default_switch_prefix(),
            exclude: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ManifestError::Io) if the file cannot be read,
    /// or [`Yaml`](crate::ManifestError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Returns `true` if `path`, or one of its ancestors, is excluded.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude.iter().any(|excluded| {
            path.strip_prefix(excluded.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(PATH_SEPARATOR))
        })
    }

    /// Marks every descriptor under an excluded path as excluded.
    pub fn apply(&self, descriptors: &mut [CommandDescriptor]) {
        for descriptor in descriptors {
            let path = descriptor.path.join(PATH_SEPARATOR);
            if !descriptor.excluded && self.is_excluded(&path) {
                debug!(path = %path, "excluded by configuration");
                descriptor.excluded = true;
            }
        }
    }

    /// Returns the tokenizer options for text dispatch.
    pub fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            switch_prefix: self.switch_prefix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
switch_prefix: "/"
limits:
  max_depth: 2
  max_parameters: 5
exclude:
  - admin::purge
  - debug
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: EngineConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.switch_prefix, "/");
        assert_eq!(config.limits.max_depth, 2);
        assert_eq!(config.limits.max_parameters, 5);
        assert_eq!(config.limits.max_name_length, 32);
        assert_eq!(config.exclude, vec!["admin::purge", "debug"]);
    }

    #[test]
    fn test_deserialize_empty_document() {
        let config: EngineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.switch_prefix, "--");
    }

    #[test]
    fn test_is_excluded_matches_whole_segments() {
        let config: EngineConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert!(config.is_excluded("admin::purge"));
        assert!(config.is_excluded("debug::dump::all"));
        assert!(!config.is_excluded("admin"));
        assert!(!config.is_excluded("admin::purger"));
        assert!(!config.is_excluded("debugger"));
    }

    #[test]
    fn test_apply_marks_descriptors() {
        let config: EngineConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let mut descriptors = vec![
            CommandDescriptor::command(&["admin", "purge"]),
            CommandDescriptor::command(&["admin", "ban"]),
            CommandDescriptor::group(&["debug"]),
        ];
        config.apply(&mut descriptors);

        let excluded: Vec<_> = descriptors.iter().map(|d| d.excluded).collect();
        assert_eq!(excluded, vec![true, false, true]);
    }

    #[test]
    fn test_tokenizer_options() {
        let config: EngineConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.tokenizer_options().switch_prefix, "/");
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let original: EngineConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }
}
