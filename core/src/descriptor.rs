//! Flat command declarations fed into the [`TreeBuilder`](crate::TreeBuilder).

use serde::{Deserialize, Serialize};

use crate::{CommandKind, Parameter};

/// What a descriptor declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    /// A group; carries metadata for the group at `path`.
    Group,
    /// A chat command (the default).
    #[default]
    Command,
    /// A user context-menu command.
    UserContext,
    /// A message context-menu command.
    MessageContext,
}

impl DescriptorKind {
    /// Returns the command shape, or `None` for groups.
    pub fn command_kind(self) -> Option<CommandKind> {
        match self {
            Self::Group => None,
            Self::Command => Some(CommandKind::ChatInput),
            Self::UserContext => Some(CommandKind::User),
            Self::MessageContext => Some(CommandKind::Message),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One declared command or group.
///
/// `path` is the full key path from the root; its last segment is the key of
/// the declared node. Groups along the path that nobody declares are created
/// implicitly.
///
/// # Examples
///
/// ```
/// use command_tree_core::{CommandDescriptor, DescriptorKind, Parameter, ParameterType, Primitive};
///
/// let ban = CommandDescriptor::command(&["mod", "ban"])
///     .with_description("Ban a member")
///     .with_parameter(Parameter::required("days", ParameterType::Primitive(Primitive::U8)));
/// assert_eq!(ban.key(), Some("ban"));
/// assert_eq!(ban.kind, DescriptorKind::Command);
///
/// let group = CommandDescriptor::group(&["mod"]).with_default_permission(false);
/// assert_eq!(group.default_permission, Some(false));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Key path from the root, including the declared node's own key.
    pub path: Vec<String>,
    /// Declared node kind.
    #[serde(default)]
    pub kind: DescriptorKind,
    /// Parameters, in declaration order (commands only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Platform default-permission flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_permission: Option<bool>,
    /// Excluded descriptors never reach the tree.
    #[serde(default, skip_serializing_if = "is_false")]
    pub excluded: bool,
}

impl CommandDescriptor {
    fn new(path: &[&str], kind: DescriptorKind) -> Self {
        Self {
            path: path.iter().map(|segment| segment.to_string()).collect(),
            kind,
            parameters: Vec::new(),
            description: None,
            default_permission: None,
            excluded: false,
        }
    }

    /// Declares a group at `path`.
    pub fn group(path: &[&str]) -> Self {
        Self::new(path, DescriptorKind::Group)
    }

    /// Declares a chat command at `path`.
    pub fn command(path: &[&str]) -> Self {
        Self::new(path, DescriptorKind::Command)
    }

    /// Declares a user context-menu command.
    pub fn user_context(path: &[&str]) -> Self {
        Self::new(path, DescriptorKind::UserContext)
    }

    /// Declares a message context-menu command.
    pub fn message_context(path: &[&str]) -> Self {
        Self::new(path, DescriptorKind::MessageContext)
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Appends a parameter.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the default-permission flag.
    pub fn with_default_permission(mut self, allowed: bool) -> Self {
        self.default_permission = Some(allowed);
        self
    }

    /// Marks the descriptor as excluded.
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Returns the declared node's own key.
    pub fn key(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }
}
