//! The command tree: an arena of group and command nodes under one root.
//!
//! Nodes live in a flat `Vec` and refer to each other through [`NodeId`]
//! handles. Children are owned, ordered lists of handles; the parent link is
//! a plain [`Parent`] value used for upward navigation only. A tree is built
//! once by [`TreeBuilder`](crate::TreeBuilder) and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::{CommandKind, Limits, Parameter};

/// Separator between keys in a dotted command path (`"a::b::c"`).
pub const PATH_SEPARATOR: &str = "::";

/// Stable handle of a node inside one [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Non-owning link from a node to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    Root,
    Group(NodeId),
}

/// The unique, keyless root of a tree.
#[derive(Debug, Clone, Default)]
pub struct RootNode {
    children: Vec<NodeId>,
}

impl RootNode {
    /// Returns the root's children in declaration order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A named container of groups and commands.
#[derive(Debug, Clone)]
pub struct GroupNode {
    pub id: NodeId,
    pub parent: Parent,
    pub key: String,
    pub description: Option<String>,
    pub default_permission: Option<bool>,
    children: Vec<NodeId>,
}

impl GroupNode {
    /// Returns the group's children in declaration order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// An invocable command; always a leaf.
#[derive(Debug, Clone)]
pub struct CommandNode {
    pub id: NodeId,
    pub parent: Parent,
    pub key: String,
    pub description: Option<String>,
    pub parameters: Vec<Parameter>,
    pub kind: CommandKind,
    pub default_permission: Option<bool>,
}

/// A non-root node.
#[derive(Debug, Clone)]
pub enum Node {
    Group(GroupNode),
    Command(CommandNode),
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Self::Group(group) => group.id,
            Self::Command(command) => command.id,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Group(group) => &group.key,
            Self::Command(command) => &command.key,
        }
    }

    pub fn parent(&self) -> Parent {
        match self {
            Self::Group(group) => group.parent,
            Self::Command(command) => command.parent,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Group(group) => group.description.as_deref(),
            Self::Command(command) => command.description.as_deref(),
        }
    }

    pub fn default_permission(&self) -> Option<bool> {
        match self {
            Self::Group(group) => group.default_permission,
            Self::Command(command) => command.default_permission,
        }
    }

    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            Self::Group(group) => Some(group),
            Self::Command(_) => None,
        }
    }

    pub fn as_command(&self) -> Option<&CommandNode> {
        match self {
            Self::Group(_) => None,
            Self::Command(command) => Some(command),
        }
    }
}

/// A built, immutable command tree.
///
/// Handles returned by one tree are only meaningful for that tree;
/// [`node`](CommandTree::node) panics on a handle from elsewhere, while
/// [`get`](CommandTree::get) returns `None`.
///
/// # Examples
///
/// ```
/// use command_tree_core::{CommandDescriptor, Parent, TreeBuilder};
///
/// let tree = TreeBuilder::new()
///     .with_descriptor(CommandDescriptor::command(&["a", "b"]))
///     .with_descriptor(CommandDescriptor::command(&["a", "c"]))
///     .build()
///     .unwrap();
///
/// let group = tree.find_child(Parent::Root, "a").unwrap();
/// let keys: Vec<_> = tree.children(Parent::Group(group.id())).map(|n| n.key()).collect();
/// assert_eq!(keys, vec!["b", "c"]);
///
/// let c = tree.find_child(Parent::Group(group.id()), "c").unwrap();
/// assert_eq!(tree.dotted_path(c.id()), "a::c");
/// ```
#[derive(Debug, Clone)]
pub struct CommandTree {
    root: RootNode,
    nodes: Vec<Node>,
    limits: Limits,
}

impl CommandTree {
    pub(crate) fn new(limits: Limits) -> Self {
        Self {
            root: RootNode::default(),
            nodes: Vec::new(),
            limits,
        }
    }

    pub(crate) fn push_group(
        &mut self,
        parent: Parent,
        key: String,
        description: Option<String>,
        default_permission: Option<bool>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Group(GroupNode {
            id,
            parent,
            key,
            description,
            default_permission,
            children: Vec::new(),
        }));
        self.attach(parent, id);
        id
    }

    pub(crate) fn push_command(
        &mut self,
        parent: Parent,
        key: String,
        description: Option<String>,
        parameters: Vec<Parameter>,
        kind: CommandKind,
        default_permission: Option<bool>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Command(CommandNode {
            id,
            parent,
            key,
            description,
            parameters,
            kind,
            default_permission,
        }));
        self.attach(parent, id);
        id
    }

    fn attach(&mut self, parent: Parent, child: NodeId) {
        match parent {
            Parent::Root => self.root.children.push(child),
            Parent::Group(group) => {
                if let Some(Node::Group(group)) = self.nodes.get_mut(group.0) {
                    group.children.push(child);
                }
            }
        }
    }

    /// Returns the root node.
    pub fn root(&self) -> &RootNode {
        &self.root
    }

    /// Returns the limits this tree was built and validated against.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Returns the node behind `id`, if it belongs to this tree.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Returns the node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Returns the command behind `id`, if it is one.
    pub fn command(&self, id: NodeId) -> Option<&CommandNode> {
        self.get(id).and_then(Node::as_command)
    }

    /// Returns the group behind `id`, if it is one.
    pub fn group(&self, id: NodeId) -> Option<&GroupNode> {
        self.get(id).and_then(Node::as_group)
    }

    /// Returns the child handles of `parent`.
    ///
    /// A handle that does not name a group has no children.
    pub fn child_ids(&self, parent: Parent) -> &[NodeId] {
        match parent {
            Parent::Root => &self.root.children,
            Parent::Group(id) => self.group(id).map(GroupNode::children).unwrap_or(&[]),
        }
    }

    /// Iterates over the children of `parent` in declaration order.
    pub fn children(&self, parent: Parent) -> impl Iterator<Item = &Node> + '_ {
        self.child_ids(parent).iter().map(|id| self.node(*id))
    }

    /// Returns the first child of `parent` whose key equals `key`.
    pub fn find_child(&self, parent: Parent, key: &str) -> Option<&Node> {
        self.children(parent).find(|node| node.key() == key)
    }

    /// Iterates over every node in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    /// Iterates over every command in pre-order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandNode> + '_ {
        self.nodes.iter().filter_map(Node::as_command)
    }

    /// Returns the number of nodes, excluding the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the root has no children.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns how many levels below the root `id` sits (root children are 1).
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 1;
        let mut parent = self.node(id).parent();
        while let Parent::Group(group) = parent {
            depth += 1;
            parent = self.node(group).parent();
        }
        depth
    }

    /// Returns the keys from the root down to `id`.
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut keys = vec![self.node(id).key()];
        let mut parent = self.node(id).parent();
        while let Parent::Group(group) = parent {
            let node = self.node(group);
            keys.push(node.key());
            parent = node.parent();
        }
        keys.reverse();
        keys
    }

    /// Returns the keys from the root down to `id`, joined with
    /// [`PATH_SEPARATOR`].
    pub fn dotted_path(&self, id: NodeId) -> String {
        self.path(id).join(PATH_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (CommandTree, NodeId, NodeId, NodeId) {
        let mut tree = CommandTree::new(Limits::default());
        let a = tree.push_group(Parent::Root, "a".into(), None, None);
        let b = tree.push_group(Parent::Group(a), "b".into(), None, None);
        let c = tree.push_command(
            Parent::Group(b),
            "c".into(),
            None,
            Vec::new(),
            CommandKind::ChatInput,
            None,
        );
        (tree, a, b, c)
    }

    #[test]
    fn test_parent_links_and_depth() {
        let (tree, a, b, c) = sample();
        assert_eq!(tree.node(c).parent(), Parent::Group(b));
        assert_eq!(tree.node(b).parent(), Parent::Group(a));
        assert_eq!(tree.node(a).parent(), Parent::Root);
        assert_eq!(tree.depth(a), 1);
        assert_eq!(tree.depth(c), 3);
    }

    #[test]
    fn test_dotted_path() {
        let (tree, _, _, c) = sample();
        assert_eq!(tree.path(c), vec!["a", "b", "c"]);
        assert_eq!(tree.dotted_path(c), "a::b::c");
    }

    #[test]
    fn test_children_are_ordered_handles() {
        let (tree, a, b, c) = sample();
        assert_eq!(tree.root().children(), &[a]);
        assert_eq!(tree.child_ids(Parent::Group(a)), &[b]);
        assert_eq!(tree.child_ids(Parent::Group(b)), &[c]);
        assert!(tree.child_ids(Parent::Group(c)).is_empty());
    }

    #[test]
    fn test_commands_only_yields_leaves() {
        let (tree, _, _, c) = sample();
        let ids: Vec<_> = tree.commands().map(|command| command.id).collect();
        assert_eq!(ids, vec![c]);
        assert_eq!(tree.len(), 3);
    }
}
