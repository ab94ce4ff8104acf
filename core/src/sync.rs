//! Mapping remote command registrations back onto the local tree.
//!
//! After the exported schema has been registered, the remote platform reports
//! each top-level record with an identifier. [`map_remote_commands`] walks
//! those records alongside the tree and yields, per record, either the
//! command it names or every command reachable under the group it names.
//! Records and options without a local counterpart are stale registrations
//! and are skipped.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CommandKind, CommandTree, Node, NodeId, PATH_SEPARATOR, Parent, SchemaKind, SchemaNode};

/// Opaque identifier assigned by the remote platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(String);

impl RemoteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RemoteId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RemoteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RemoteId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A top-level command as reported by the remote platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCommandRecord {
    pub id: RemoteId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: SchemaKind,
    #[serde(default)]
    pub options: Vec<RemoteOptionRecord>,
}

impl RemoteCommandRecord {
    /// Builds the record the platform would report for an exported node.
    pub fn from_schema(node: &SchemaNode, id: impl Into<RemoteId>) -> Self {
        Self {
            id: id.into(),
            name: node.name.clone(),
            kind: node.kind,
            options: node.options.iter().map(RemoteOptionRecord::from_schema).collect(),
        }
    }
}

/// A nested, identifier-less option of a remote record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteOptionRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SchemaKind,
    #[serde(default)]
    pub options: Vec<RemoteOptionRecord>,
}

impl RemoteOptionRecord {
    pub fn from_schema(node: &SchemaNode) -> Self {
        Self {
            name: node.name.clone(),
            kind: node.kind,
            options: node.options.iter().map(Self::from_schema).collect(),
        }
    }
}

/// Identifies one mapping entry.
///
/// `group_id` is reserved; the current mapping never populates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappingKey {
    pub group_id: Option<RemoteId>,
    pub command_id: RemoteId,
}

/// What a remote record resolves to locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingTarget {
    /// An ungrouped root-level command.
    Command(NodeId),
    /// Every reached command under a root group, keyed by dotted path, in
    /// the remote record's order.
    Group(IndexMap<String, NodeId>),
}

/// One resolved remote record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub key: MappingKey,
    pub target: MappingTarget,
}

impl MappingEntry {
    /// Returns every command handle this entry maps to.
    pub fn commands(&self) -> Vec<NodeId> {
        match &self.target {
            MappingTarget::Command(id) => vec![*id],
            MappingTarget::Group(paths) => paths.values().copied().collect(),
        }
    }
}

impl CommandTree {
    /// Maps remote records onto this tree. See [`map_remote_commands`].
    pub fn map_remote(&self, records: &[RemoteCommandRecord]) -> Vec<MappingEntry> {
        map_remote_commands(self, records)
    }
}

/// Returns whether a top-level record of `kind` can describe `node`.
fn kind_matches(kind: SchemaKind, node: &Node) -> bool {
    match node {
        Node::Group(_) => kind == SchemaKind::ChatInput,
        Node::Command(command) => command.kind.schema_kind() == kind,
    }
}

/// Maps each remote record to the local node it registers.
///
/// Never fails: unmatched records and options are logged and skipped.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let tree = TreeBuilder::new()
///     .with_descriptor(CommandDescriptor::command(&["a", "b", "c"]))
///     .build()
///     .unwrap();
///
/// let records: Vec<_> = tree
///     .export()
///     .unwrap()
///     .iter()
///     .map(|node| RemoteCommandRecord::from_schema(node, 42u64))
///     .collect();
///
/// let entries = map_remote_commands(&tree, &records);
/// let MappingTarget::Group(paths) = &entries[0].target else { panic!() };
/// assert_eq!(tree.dotted_path(paths["a::b::c"]), "a::b::c");
/// ```
pub fn map_remote_commands(tree: &CommandTree, records: &[RemoteCommandRecord]) -> Vec<MappingEntry> {
    let mut entries = Vec::with_capacity(records.len());

    for record in records {
        let Some(node) = tree
            .children(Parent::Root)
            .find(|node| node.key() == record.name && kind_matches(record.kind, node))
        else {
            debug!(name = %record.name, id = %record.id, "skipping remote command with no local counterpart");
            continue;
        };

        let target = match node {
            Node::Command(command) => MappingTarget::Command(command.id),
            Node::Group(group) => {
                let mut paths = IndexMap::new();
                collect_paths(tree, group.id, &group.key, &record.options, &mut paths);
                MappingTarget::Group(paths)
            }
        };

        entries.push(MappingEntry {
            key: MappingKey {
                group_id: None,
                command_id: record.id.clone(),
            },
            target,
        });
    }

    entries
}

fn collect_paths(
    tree: &CommandTree,
    group: NodeId,
    prefix: &str,
    options: &[RemoteOptionRecord],
    paths: &mut IndexMap<String, NodeId>,
) {
    for option in options {
        let Some(child) = tree.find_child(Parent::Group(group), &option.name) else {
            debug!(prefix, name = %option.name, "skipping remote option with no local counterpart");
            continue;
        };

        let path = format!("{prefix}{PATH_SEPARATOR}{}", option.name);
        match child {
            Node::Command(command) if command.kind == CommandKind::ChatInput => {
                paths.insert(path, command.id);
            }
            Node::Command(_) => {}
            Node::Group(nested) => collect_paths(tree, nested.id, &path, &option.options, paths),
        }
    }
}
