//! Tree assembly from flat descriptors.
//!
//! Descriptors are placed one by one into an owned draft tree: each path
//! segment reuses an existing same-keyed group or creates one, so groups
//! declared by several sources merge into a single node whose children keep
//! first-seen order. Excluded descriptors are dropped, groups left empty are
//! pruned bottom-up, and the draft is then lowered into the arena-backed
//! [`CommandTree`] and validated with [`CheckSet::Build`].
//!
//! # Example
//!
//! ```
//! use command_tree_core::*;
//!
//! let tree = TreeBuilder::new()
//!     .with_descriptor(CommandDescriptor::command(&["admin", "kick"]))
//!     .with_descriptor(CommandDescriptor::command(&["admin", "ban"]))
//!     .with_descriptor(CommandDescriptor::command(&["admin", "purge"]).excluded())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(tree.root().children().len(), 1);
//! let admin = tree.find_child(Parent::Root, "admin").unwrap();
//! assert_eq!(tree.child_ids(Parent::Group(admin.id())).len(), 2);
//! ```

use tracing::{debug, info};

use crate::validate::{BuildError, CheckSet, validate_tree};
use crate::{CommandDescriptor, CommandKind, CommandTree, Limits, PATH_SEPARATOR, Parameter, Parent};

#[derive(Debug)]
struct DraftGroup {
    key: String,
    description: Option<String>,
    default_permission: Option<bool>,
    excluded: bool,
    children: Vec<Draft>,
}

#[derive(Debug)]
struct DraftCommand {
    key: String,
    description: Option<String>,
    parameters: Vec<Parameter>,
    kind: CommandKind,
    default_permission: Option<bool>,
}

#[derive(Debug)]
enum Draft {
    Group(DraftGroup),
    Command(DraftCommand),
}

impl Draft {
    fn key(&self) -> &str {
        match self {
            Self::Group(group) => &group.key,
            Self::Command(command) => &command.key,
        }
    }

    fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

impl DraftGroup {
    fn implicit(key: &str) -> Self {
        Self {
            key: key.to_string(),
            description: None,
            default_permission: None,
            excluded: false,
            children: Vec::new(),
        }
    }
}

/// Collects descriptors and builds a [`CommandTree`] from them.
///
/// Registration order is significant: it fixes the order of root children,
/// of group children, and therefore of dispatch attempts and export output.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    descriptors: Vec<CommandDescriptor>,
    limits: Limits,
}

impl TreeBuilder {
    /// Creates a builder with default [`Limits`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the limits the tree is validated against.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Adds a descriptor.
    pub fn with_descriptor(mut self, descriptor: CommandDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Adds a descriptor in place.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Adds every descriptor of one source, in order.
    pub fn register_all(
        &mut self,
        descriptors: impl IntoIterator<Item = CommandDescriptor>,
    ) -> &mut Self {
        self.descriptors.extend(descriptors);
        self
    }

    /// Returns the number of registered descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Builds and validates the tree.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::EmptyPath`] or [`BuildError::PathConflict`] for
    /// descriptors that cannot be placed,
    /// [`BuildError::DuplicateDefaultPermission`] when two declarations of
    /// one group both carry a default-permission flag, and any error of
    /// [`validate_tree`] with [`CheckSet::Build`].
    pub fn build(self) -> Result<CommandTree, BuildError> {
        let mut root = Vec::new();
        for descriptor in self.descriptors {
            place(&mut root, descriptor)?;
        }

        prune(&mut root, "");

        let mut tree = CommandTree::new(self.limits);
        lower(&mut tree, Parent::Root, root);
        validate_tree(&tree, CheckSet::Build)?;

        info!(
            nodes = tree.len(),
            roots = tree.root().children().len(),
            "built command tree"
        );
        Ok(tree)
    }
}

fn find_group(level: &[Draft], key: &str) -> Option<usize> {
    level
        .iter()
        .position(|draft| draft.is_group() && draft.key() == key)
}

fn descend<'a>(
    level: &'a mut Vec<Draft>,
    segment: &str,
    path: &str,
) -> Result<&'a mut Vec<Draft>, BuildError> {
    let index = match find_group(level, segment) {
        Some(index) => index,
        None => {
            if level.iter().any(|draft| draft.key() == segment) {
                return Err(BuildError::PathConflict(path.to_string()));
            }
            level.push(Draft::Group(DraftGroup::implicit(segment)));
            level.len() - 1
        }
    };

    match level.get_mut(index) {
        Some(Draft::Group(group)) => Ok(&mut group.children),
        _ => Err(BuildError::PathConflict(path.to_string())),
    }
}

fn place(root: &mut Vec<Draft>, descriptor: CommandDescriptor) -> Result<(), BuildError> {
    let full_path = descriptor.path.join(PATH_SEPARATOR);
    let Some((key, parents)) = descriptor.path.split_last() else {
        return Err(BuildError::EmptyPath);
    };

    let command_kind = descriptor.kind.command_kind();
    if descriptor.excluded && command_kind.is_some() {
        debug!(path = %full_path, "skipping excluded command");
        return Ok(());
    }

    let mut level = root;
    let mut walked = String::new();
    for segment in parents {
        if !walked.is_empty() {
            walked.push_str(PATH_SEPARATOR);
        }
        walked.push_str(segment);
        level = descend(level, segment, &walked)?;
    }

    match command_kind {
        Some(kind) => {
            if find_group(level, key).is_some() {
                return Err(BuildError::PathConflict(full_path));
            }
            debug!(path = %full_path, ?kind, "placing command");
            level.push(Draft::Command(DraftCommand {
                key: key.clone(),
                description: descriptor.description,
                parameters: descriptor.parameters,
                kind,
                default_permission: descriptor.default_permission,
            }));
        }
        None => match find_group(level, key) {
            Some(index) => {
                if let Some(Draft::Group(group)) = level.get_mut(index) {
                    merge_group(group, descriptor, &full_path)?;
                }
            }
            None => {
                if level.iter().any(|draft| draft.key() == key) {
                    return Err(BuildError::PathConflict(full_path));
                }
                debug!(path = %full_path, "declaring group");
                level.push(Draft::Group(DraftGroup {
                    key: key.clone(),
                    description: descriptor.description,
                    default_permission: descriptor.default_permission,
                    excluded: descriptor.excluded,
                    children: Vec::new(),
                }));
            }
        },
    }

    Ok(())
}

fn merge_group(
    group: &mut DraftGroup,
    descriptor: CommandDescriptor,
    path: &str,
) -> Result<(), BuildError> {
    debug!(path, "merging group declaration");

    if let Some(allowed) = descriptor.default_permission {
        if group.default_permission.is_some() {
            return Err(BuildError::DuplicateDefaultPermission(path.to_string()));
        }
        group.default_permission = Some(allowed);
    }
    if group.description.is_none() {
        group.description = descriptor.description;
    }
    group.excluded |= descriptor.excluded;

    Ok(())
}

fn prune(level: &mut Vec<Draft>, prefix: &str) {
    level.retain_mut(|draft| {
        let Draft::Group(group) = draft else {
            return true;
        };
        let path = if prefix.is_empty() {
            group.key.clone()
        } else {
            format!("{prefix}{PATH_SEPARATOR}{}", group.key)
        };

        if group.excluded {
            debug!(path = %path, "dropping excluded group");
            return false;
        }

        prune(&mut group.children, &path);
        if group.children.is_empty() {
            debug!(path = %path, "pruning empty group");
            return false;
        }
        true
    });
}

fn lower(tree: &mut CommandTree, parent: Parent, level: Vec<Draft>) {
    for draft in level {
        match draft {
            Draft::Group(group) => {
                let id = tree.push_group(
                    parent,
                    group.key,
                    group.description,
                    group.default_permission,
                );
                lower(tree, Parent::Group(id), group.children);
            }
            Draft::Command(command) => {
                tree.push_command(
                    parent,
                    command.key,
                    command.description,
                    command.parameters,
                    command.kind,
                    command.default_permission,
                );
            }
        }
    }
}
