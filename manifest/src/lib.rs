//! Manifest loading and engine configuration for command trees.
//!
//! This crate is the file-facing side of `command-tree-core`: it reads
//! descriptor manifests (JSON or YAML) from files and directories, applies an
//! [`EngineConfig`], builds the [`CommandTree`](command_tree_core::CommandTree)
//! and reads back the remote records used for mapping.
//!
//! # Quick start
//!
//! ```no_run
//! use command_tree_manifest::{DescriptorSet, EngineConfig, load_remote_records};
//!
//! let config = EngineConfig::load("command-tree.yml").unwrap();
//! let set = DescriptorSet::from_dir("commands/").unwrap();
//! let tree = set.build_tree(&config).unwrap();
//!
//! let schema = tree.export().unwrap();
//! println!("{} top-level commands", schema.len());
//!
//! let records = load_remote_records("registered.json").unwrap();
//! for entry in tree.map_remote(&records) {
//!     println!("{} -> {:?}", entry.key.command_id, entry.target);
//! }
//! ```

mod config;
mod error;
mod loader;
mod manifest;

pub use config::EngineConfig;
pub use error::{ManifestError, Result};
pub use loader::{DescriptorSet, DescriptorSetBuilder, ManifestSource, load_remote_records};
pub use manifest::{DescriptorManifest, ManifestFormat};
