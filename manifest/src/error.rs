//! Error types for manifest, configuration and remote record loading.

use std::path::PathBuf;

use command_tree_core::BuildError;
use thiserror::Error;

/// Errors that can occur while loading inputs or building a tree from them.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension maps to no known format.
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Manifest content is structurally invalid (e.g., missing version).
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// The loaded descriptors do not form a valid tree.
    #[error("build error: {0}")]
    Build(#[from] BuildError),
}

/// Convenience alias for results with [`ManifestError`].
pub type Result<T> = std::result::Result<T, ManifestError>;
