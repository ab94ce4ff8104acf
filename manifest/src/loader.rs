//! Loading descriptors from several manifest sources.
//!
//! [`DescriptorSet`] collects manifests from files and directories in the
//! order they are added and concatenates their descriptors, so groups
//! declared by more than one source merge in first-seen order when the tree
//! is built. Unlike a fallback chain, every source must load.
//!
//! ```no_run
//! use command_tree_manifest::{DescriptorSet, EngineConfig};
//!
//! let set = DescriptorSet::builder()
//!     .with_file("commands/core.yaml")
//!     .with_dir("commands/modules/")
//!     .load()
//!     .unwrap();
//!
//! let tree = set.build_tree(&EngineConfig::default()).unwrap();
//! println!("{} nodes", tree.len());
//! ```

use std::path::{Path, PathBuf};

use command_tree_core::{CommandDescriptor, CommandTree, RemoteCommandRecord, TreeBuilder};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::manifest::{DescriptorManifest, ManifestFormat};

/// Where manifests are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// A single manifest file.
    File(PathBuf),
    /// Every `*.json`, `*.yaml` and `*.yml` file of a directory, by file name.
    Directory(PathBuf),
}

/// Manifests loaded from one or more sources, in load order.
#[derive(Debug, Clone, Default)]
pub struct DescriptorSet {
    manifests: Vec<DescriptorManifest>,
    sources: Vec<ManifestSource>,
}

impl DescriptorSet {
    /// Returns a new [`DescriptorSetBuilder`].
    pub fn builder() -> DescriptorSetBuilder {
        DescriptorSetBuilder::new()
    }

    /// Loads a single manifest file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut set = Self::default();
        set.load_file(path)?;
        set.sources.push(ManifestSource::File(path.to_path_buf()));
        Ok(set)
    }

    /// Loads every manifest file of a directory, sorted by file name.
    ///
    /// Files with other extensions are ignored.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut set = Self::default();
        set.load_dir(path)?;
        set.sources.push(ManifestSource::Directory(path.to_path_buf()));
        Ok(set)
    }

    fn load_file(&mut self, path: &Path) -> Result<()> {
        let manifest = DescriptorManifest::load(path)?;
        debug!(
            path = %path.display(),
            name = manifest.name.as_deref().unwrap_or("-"),
            descriptors = manifest.descriptors.len(),
            "loaded manifest"
        );
        self.manifests.push(manifest);
        Ok(())
    }

    fn load_dir(&mut self, path: &Path) -> Result<()> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.is_file() && ManifestFormat::from_path(&file_path).is_ok() {
                files.push(file_path);
            }
        }
        files.sort();

        for file in files {
            self.load_file(&file)?;
        }
        Ok(())
    }

    /// Appends an already loaded manifest.
    pub fn push(&mut self, manifest: DescriptorManifest) {
        self.manifests.push(manifest);
    }

    /// Returns the loaded manifests, in load order.
    pub fn manifests(&self) -> &[DescriptorManifest] {
        &self.manifests
    }

    /// Returns the sources this set was loaded from.
    pub fn sources(&self) -> &[ManifestSource] {
        &self.sources
    }

    /// Returns the number of descriptors across all manifests.
    pub fn len(&self) -> usize {
        self.manifests.iter().map(|m| m.descriptors.len()).sum()
    }

    /// Returns `true` if no manifest declares anything.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every descriptor in load order, with `config`'s exclusions
    /// applied.
    pub fn descriptors(&self, config: &EngineConfig) -> Vec<CommandDescriptor> {
        let mut descriptors: Vec<_> = self
            .manifests
            .iter()
            .flat_map(|manifest| manifest.descriptors.iter().cloned())
            .collect();
        config.apply(&mut descriptors);
        descriptors
    }

    /// Builds a tree from every descriptor, using `config`'s limits and
    /// exclusions.
    ///
    /// # Errors
    ///
    /// Returns [`Build`](crate::ManifestError::Build) when the descriptors do
    /// not form a valid tree.
    pub fn build_tree(&self, config: &EngineConfig) -> Result<CommandTree> {
        let mut builder = TreeBuilder::new().with_limits(config.limits);
        builder.register_all(self.descriptors(config));
        let tree = builder.build()?;
        info!(
            manifests = self.manifests.len(),
            nodes = tree.len(),
            "built tree from manifests"
        );
        Ok(tree)
    }
}

/// Builder collecting manifest sources for a [`DescriptorSet`].
///
/// Sources load in the order they are added; the first failure aborts.
#[derive(Debug, Clone, Default)]
pub struct DescriptorSetBuilder {
    sources: Vec<ManifestSource>,
}

impl DescriptorSetBuilder {
    /// Creates a builder with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a manifest file.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(ManifestSource::File(path.into()));
        self
    }

    /// Adds a directory of manifest files.
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(ManifestSource::Directory(path.into()));
        self
    }

    /// Adds a file or directory, whichever `path` is.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            self.with_dir(path)
        } else {
            self.with_file(path)
        }
    }

    /// Loads every source in order.
    ///
    /// # Errors
    ///
    /// Returns the first I/O, parse or manifest validation error.
    pub fn load(self) -> Result<DescriptorSet> {
        let mut set = DescriptorSet::default();
        for source in &self.sources {
            match source {
                ManifestSource::File(path) => set.load_file(path)?,
                ManifestSource::Directory(path) => set.load_dir(path)?,
            }
        }
        set.sources = self.sources;
        Ok(set)
    }
}

/// Reads remote command records from a JSON or YAML file.
///
/// The file holds the list the platform returned after registration.
pub fn load_remote_records(path: impl AsRef<Path>) -> Result<Vec<RemoteCommandRecord>> {
    let path = path.as_ref();
    let records: Vec<RemoteCommandRecord> = ManifestFormat::read(path)?;
    debug!(path = %path.display(), records = records.len(), "loaded remote records");
    Ok(records)
}
