//! Declarative schema export.
//!
//! Converts a [`CommandTree`] into the nested record format consumed by the
//! remote platform. Export first re-validates the tree with
//! [`CheckSet::Export`], so a tree that dispatches fine may still be rejected
//! here (overloads, collections, switches, size limits).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::validate::{BuildError, CheckSet, validate_tree};
use crate::{
    ChannelType, CommandKind, CommandNode, CommandTree, DEFAULT_DESCRIPTION, GroupNode, Node,
    Parameter, ParameterType, Parent, SchemaKind,
};

/// One named choice of an enumeration option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Label shown to users.
    pub name: String,
    /// Submitted value; the enum member name.
    pub value: String,
}

/// One record of the exported schema.
///
/// Top-level records are commands, groups or context menus; nested records
/// are sub-command groups, sub-commands or typed options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNode {
    pub name: String,
    /// Absent only on context menus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: SchemaKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SchemaNode>,
    /// Set on typed options only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_types: Option<Vec<ChannelType>>,
    /// Set on top-level records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_permission: Option<bool>,
}

impl SchemaNode {
    fn new(name: &str, description: Option<&str>, kind: SchemaKind) -> Self {
        Self {
            name: name.to_string(),
            description: description.map(str::to_string),
            kind,
            options: Vec::new(),
            required: None,
            choices: Vec::new(),
            channel_types: None,
            default_permission: None,
        }
    }

    /// Returns the nested record named `name`, if any.
    pub fn find_option(&self, name: &str) -> Option<&SchemaNode> {
        self.options.iter().find(|option| option.name == name)
    }
}

impl CommandTree {
    /// Exports the tree. See [`export_tree`].
    pub fn export(&self) -> Result<Vec<SchemaNode>, BuildError> {
        export_tree(self)
    }
}

/// Exports `tree` as top-level schema records, in root order.
///
/// # Errors
///
/// Returns the first [`CheckSet::Export`] violation.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let tree = TreeBuilder::new()
///     .with_descriptor(CommandDescriptor::command(&["admin", "ban"]).with_description("Ban a user"))
///     .build()
///     .unwrap();
///
/// let schema = export_tree(&tree).unwrap();
/// assert_eq!(schema[0].kind, SchemaKind::ChatInput);
/// assert_eq!(schema[0].description.as_deref(), Some(DEFAULT_DESCRIPTION));
/// assert_eq!(schema[0].options[0].kind, SchemaKind::SubCommand);
/// assert_eq!(schema[0].options[0].description.as_deref(), Some("Ban a user"));
/// ```
pub fn export_tree(tree: &CommandTree) -> Result<Vec<SchemaNode>, BuildError> {
    validate_tree(tree, CheckSet::Export)?;

    let records: Vec<_> = tree
        .children(Parent::Root)
        .map(|node| {
            let mut record = match node {
                Node::Group(group) => export_group(tree, group, SchemaKind::ChatInput),
                Node::Command(command) => export_command(command, command.kind.schema_kind()),
            };
            record.default_permission = node.default_permission();
            record
        })
        .collect();

    debug!(records = records.len(), "exported command schema");
    Ok(records)
}

fn described(description: Option<&str>) -> Option<&str> {
    Some(description.unwrap_or(DEFAULT_DESCRIPTION))
}

fn export_group(tree: &CommandTree, group: &GroupNode, kind: SchemaKind) -> SchemaNode {
    let mut record = SchemaNode::new(&group.key, described(group.description.as_deref()), kind);
    record.options = tree
        .children(Parent::Group(group.id))
        .map(|child| match child {
            Node::Group(nested) => export_group(tree, nested, SchemaKind::SubCommandGroup),
            Node::Command(command) => export_command(command, SchemaKind::SubCommand),
        })
        .collect();
    record
}

fn export_command(command: &CommandNode, kind: SchemaKind) -> SchemaNode {
    if command.kind != CommandKind::ChatInput {
        return SchemaNode::new(&command.key, None, kind);
    }

    let mut record = SchemaNode::new(&command.key, described(command.description.as_deref()), kind);
    record.options = command.parameters.iter().map(export_parameter).collect();
    record
}

fn export_parameter(parameter: &Parameter) -> SchemaNode {
    let mut record = SchemaNode::new(
        &parameter.name,
        described(parameter.description.as_deref()),
        parameter.schema_kind(),
    );
    record.required = Some(parameter.required);
    record.channel_types = parameter.channel_types.clone();
    if let ParameterType::Enum(members) = &parameter.parameter_type {
        record.choices = members
            .iter()
            .map(|member| Choice {
                name: member.label().to_string(),
                value: member.name.clone(),
            })
            .collect();
    }
    record
}
