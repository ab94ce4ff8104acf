//! Structural checks over a built [`CommandTree`].
//!
//! The checks run in a fixed order and stop at the first failure:
//!
//! 1. nesting depth
//! 2. per-level key and default-permission uniqueness
//! 3. parameter shape (channel-type filters, collections, switches)
//! 4. context-menu shape
//! 5. name/description lengths and entry counts
//!
//! [`CheckSet::Build`] runs the subset every consumer relies on;
//! [`CheckSet::Export`] adds the restrictions of the declarative schema
//! format, which text dispatch does not share (overloads, collections,
//! switches, size limits).

use std::collections::HashMap;

use thiserror::Error;

use crate::{CommandNode, CommandTree, Node, Parameter, ParameterType, Parent};

/// Build and export errors.
///
/// Each variant carries the dotted path of the offending node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A descriptor was declared with no path segments.
    #[error("descriptor path cannot be empty")]
    EmptyPath,
    /// A command and a group would share one path.
    #[error("path is declared both as a command and as a group: {0}")]
    PathConflict(String),
    /// A node sits deeper than the configured maximum depth.
    #[error("command nested too deeply: {0}")]
    TooDeeplyNested(String),
    /// A command declares more parameters than allowed.
    #[error("too many parameters on command: {0}")]
    TooManyParameters(String),
    /// The root holds more entries than allowed.
    #[error("too many root-level entries: {0}")]
    TooManyRootEntries(usize),
    /// A group holds more entries than allowed.
    #[error("too many entries in group: {0}")]
    TooManyGroupEntries(String),
    /// An enumeration parameter has more members than allowed.
    #[error("too many choices for parameter '{parameter}' of command: {command}")]
    TooManyChoices { command: String, parameter: String },
    /// Collection parameters cannot be exported.
    #[error("collection parameter '{parameter}' is not supported on command: {command}")]
    CollectionParameterUnsupported { command: String, parameter: String },
    /// Switch parameters cannot be exported.
    #[error("switch parameter '{parameter}' is not supported on command: {command}")]
    SwitchParameterUnsupported { command: String, parameter: String },
    /// Two root-level entries share a key.
    #[error("overloads are not supported at the root level: {0}")]
    DuplicateRootOverload(String),
    /// Two entries of one group share a key.
    #[error("overloads are not supported inside groups: {0}")]
    DuplicateGroupOverload(String),
    /// A command, group or parameter name is too long.
    #[error("name too long: {0}")]
    NameTooLong(String),
    /// A description or choice label is too long.
    #[error("description too long: {0}")]
    DescriptionTooLong(String),
    /// More than one same-keyed sibling carries a default-permission flag.
    #[error("default permission declared more than once: {0}")]
    DuplicateDefaultPermission(String),
    /// Context-menu commands cannot carry a description.
    #[error("context menu has a description: {0}")]
    ContextMenuHasDescription(String),
    /// Context-menu commands must sit directly under the root.
    #[error("context menu is nested: {0}")]
    ContextMenuIsNested(String),
    /// Context-menu commands cannot take parameters.
    #[error("context menu has parameters: {0}")]
    ContextMenuHasParameters(String),
    /// A channel-type filter is set on a non-channel parameter.
    #[error("channel types set on non-channel parameter '{parameter}' of command: {command}")]
    ChannelTypeFilterOnNonChannelParameter { command: String, parameter: String },
    /// A channel-type filter is present but lists no channel types.
    #[error("empty channel type filter on parameter '{parameter}' of command: {command}")]
    ChannelTypeFilterEmpty { command: String, parameter: String },
}

/// Which checks [`validate_tree`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckSet {
    /// Checks every consumer of the tree relies on.
    Build,
    /// Build checks plus the declarative schema's restrictions.
    Export,
}

impl CheckSet {
    fn is_export(self) -> bool {
        matches!(self, Self::Export)
    }
}

/// Validates `tree` against its own [`Limits`](crate::Limits).
///
/// Returns the first violation found, in the order documented at module
/// level.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let tree = TreeBuilder::new()
///     .with_descriptor(CommandDescriptor::command(&["ping"]))
///     .with_descriptor(CommandDescriptor::command(&["ping"])
///         .with_parameter(Parameter::required("host", ParameterType::Primitive(Primitive::String))))
///     .build()
///     .unwrap();
///
/// // Overloads are fine for text dispatch...
/// assert!(validate_tree(&tree, CheckSet::Build).is_ok());
/// // ...but not for the declarative schema.
/// assert_eq!(
///     validate_tree(&tree, CheckSet::Export),
///     Err(BuildError::DuplicateRootOverload("ping".into()))
/// );
/// ```
pub fn validate_tree(tree: &CommandTree, checks: CheckSet) -> Result<(), BuildError> {
    check_depth(tree)?;
    check_levels(tree, checks)?;
    check_parameters(tree, checks)?;
    check_context_menus(tree)?;
    if checks.is_export() {
        check_sizes(tree)?;
    }
    Ok(())
}

fn check_depth(tree: &CommandTree) -> Result<(), BuildError> {
    let max_depth = tree.limits().max_depth;
    match tree.iter().find(|node| tree.depth(node.id()) > max_depth) {
        Some(node) => Err(BuildError::TooDeeplyNested(tree.dotted_path(node.id()))),
        None => Ok(()),
    }
}

fn levels(tree: &CommandTree) -> impl Iterator<Item = Parent> + '_ {
    std::iter::once(Parent::Root).chain(
        tree.iter()
            .filter_map(Node::as_group)
            .map(|group| Parent::Group(group.id)),
    )
}

fn check_levels(tree: &CommandTree, checks: CheckSet) -> Result<(), BuildError> {
    for level in levels(tree) {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut flagged: HashMap<&str, usize> = HashMap::new();

        for node in tree.children(level) {
            let key = node.key();
            if node.default_permission().is_some() {
                let count = flagged.entry(key).or_default();
                *count += 1;
                if *count > 1 {
                    return Err(BuildError::DuplicateDefaultPermission(
                        tree.dotted_path(node.id()),
                    ));
                }
            }

            let count = seen.entry(key).or_default();
            *count += 1;
            if *count > 1 && checks.is_export() {
                let path = tree.dotted_path(node.id());
                return Err(match level {
                    Parent::Root => BuildError::DuplicateRootOverload(path),
                    Parent::Group(_) => BuildError::DuplicateGroupOverload(path),
                });
            }
        }
    }
    Ok(())
}

fn check_parameters(tree: &CommandTree, checks: CheckSet) -> Result<(), BuildError> {
    for command in tree.commands() {
        for parameter in &command.parameters {
            check_parameter(tree, command, parameter, checks)?;
        }
    }
    Ok(())
}

fn check_parameter(
    tree: &CommandTree,
    command: &CommandNode,
    parameter: &Parameter,
    checks: CheckSet,
) -> Result<(), BuildError> {
    let names = || (tree.dotted_path(command.id), parameter.name.clone());

    if let Some(channel_types) = &parameter.channel_types {
        if !parameter.parameter_type.is_channel() {
            let (command, parameter) = names();
            return Err(BuildError::ChannelTypeFilterOnNonChannelParameter { command, parameter });
        }
        if channel_types.is_empty() {
            let (command, parameter) = names();
            return Err(BuildError::ChannelTypeFilterEmpty { command, parameter });
        }
    }

    if checks.is_export() {
        if parameter.is_collection {
            let (command, parameter) = names();
            return Err(BuildError::CollectionParameterUnsupported { command, parameter });
        }
        if parameter.is_switch {
            let (command, parameter) = names();
            return Err(BuildError::SwitchParameterUnsupported { command, parameter });
        }
    }

    Ok(())
}

fn check_context_menus(tree: &CommandTree) -> Result<(), BuildError> {
    for command in tree.commands().filter(|c| c.kind.is_context_menu()) {
        let path = || tree.dotted_path(command.id);
        if command.description.is_some() {
            return Err(BuildError::ContextMenuHasDescription(path()));
        }
        if !command.parameters.is_empty() {
            return Err(BuildError::ContextMenuHasParameters(path()));
        }
        if command.parent != Parent::Root {
            return Err(BuildError::ContextMenuIsNested(path()));
        }
    }
    Ok(())
}

fn too_long(text: &str, max: usize) -> bool {
    text.chars().count() > max
}

fn check_sizes(tree: &CommandTree) -> Result<(), BuildError> {
    let limits = tree.limits();

    let root_entries = tree.root().children().len();
    if root_entries > limits.max_root_entries {
        return Err(BuildError::TooManyRootEntries(root_entries));
    }

    for node in tree.iter() {
        let path = || tree.dotted_path(node.id());

        if too_long(node.key(), limits.max_name_length) {
            return Err(BuildError::NameTooLong(path()));
        }
        if node
            .description()
            .is_some_and(|desc| too_long(desc, limits.max_description_length))
        {
            return Err(BuildError::DescriptionTooLong(path()));
        }

        match node {
            Node::Group(group) => {
                if group.children().len() > limits.max_group_entries {
                    return Err(BuildError::TooManyGroupEntries(path()));
                }
            }
            Node::Command(command) => {
                if command.parameters.len() > limits.max_parameters {
                    return Err(BuildError::TooManyParameters(path()));
                }
                for parameter in &command.parameters {
                    check_parameter_size(tree, command, parameter)?;
                }
            }
        }
    }

    Ok(())
}

fn check_parameter_size(
    tree: &CommandTree,
    command: &CommandNode,
    parameter: &Parameter,
) -> Result<(), BuildError> {
    let limits = tree.limits();
    let qualified = || format!("{} ({})", tree.dotted_path(command.id), parameter.name);

    if too_long(&parameter.name, limits.max_name_length) {
        return Err(BuildError::NameTooLong(qualified()));
    }
    if parameter
        .description
        .as_deref()
        .is_some_and(|desc| too_long(desc, limits.max_description_length))
    {
        return Err(BuildError::DescriptionTooLong(qualified()));
    }

    if let ParameterType::Enum(members) = &parameter.parameter_type {
        if members.len() > limits.max_choices {
            return Err(BuildError::TooManyChoices {
                command: tree.dotted_path(command.id),
                parameter: parameter.name.clone(),
            });
        }
        if members
            .iter()
            .any(|member| too_long(member.label(), limits.max_description_length))
        {
            return Err(BuildError::DescriptionTooLong(qualified()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ChannelType, CommandDescriptor, Limits, Parameter, ParameterType, Primitive, TreeBuilder,
    };

    fn string_param(name: &str) -> Parameter {
        Parameter::required(name, ParameterType::Primitive(Primitive::String))
    }

    #[test]
    fn test_collection_parameter_rejected_for_export_only() {
        let tree = TreeBuilder::new()
            .with_descriptor(
                CommandDescriptor::command(&["tag"]).with_parameter(string_param("names").allow_multiple()),
            )
            .build()
            .unwrap();

        assert!(validate_tree(&tree, CheckSet::Build).is_ok());
        assert_eq!(
            validate_tree(&tree, CheckSet::Export),
            Err(BuildError::CollectionParameterUnsupported {
                command: "tag".to_string(),
                parameter: "names".to_string(),
            })
        );
    }

    #[test]
    fn test_switch_parameter_rejected_for_export_only() {
        let tree = TreeBuilder::new()
            .with_descriptor(CommandDescriptor::command(&["run"]).with_parameter(Parameter::switch("force")))
            .build()
            .unwrap();

        assert!(validate_tree(&tree, CheckSet::Build).is_ok());
        assert!(matches!(
            validate_tree(&tree, CheckSet::Export),
            Err(BuildError::SwitchParameterUnsupported { .. })
        ));
    }

    #[test]
    fn test_group_overload_rejected_for_export() {
        let tree = TreeBuilder::new()
            .with_descriptor(CommandDescriptor::command(&["a", "b"]))
            .with_descriptor(CommandDescriptor::command(&["a", "b"]).with_parameter(string_param("x")))
            .build()
            .unwrap();

        assert_eq!(
            validate_tree(&tree, CheckSet::Export),
            Err(BuildError::DuplicateGroupOverload("a::b".to_string()))
        );
    }

    #[test]
    fn test_name_too_long() {
        let name = "n".repeat(33);
        let tree = TreeBuilder::new()
            .with_descriptor(CommandDescriptor::command(&[name.as_str()]))
            .build()
            .unwrap();

        assert_eq!(
            validate_tree(&tree, CheckSet::Export),
            Err(BuildError::NameTooLong(name))
        );
    }

    #[test]
    fn test_description_too_long() {
        let tree = TreeBuilder::new()
            .with_descriptor(CommandDescriptor::command(&["long"]).with_description(&"d".repeat(101)))
            .build()
            .unwrap();

        assert_eq!(
            validate_tree(&tree, CheckSet::Export),
            Err(BuildError::DescriptionTooLong("long".to_string()))
        );
    }

    #[test]
    fn test_parameter_description_too_long() {
        let tree = TreeBuilder::new()
            .with_descriptor(
                CommandDescriptor::command(&["cmd"])
                    .with_parameter(string_param("value").with_description(&"d".repeat(101))),
            )
            .build()
            .unwrap();

        assert_eq!(
            validate_tree(&tree, CheckSet::Export),
            Err(BuildError::DescriptionTooLong("cmd (value)".to_string()))
        );
    }

    #[test]
    fn test_too_many_parameters() {
        let mut descriptor = CommandDescriptor::command(&["wide"]);
        for i in 0..26 {
            descriptor = descriptor.with_parameter(string_param(&format!("p{i}")));
        }
        let tree = TreeBuilder::new().with_descriptor(descriptor).build().unwrap();

        assert_eq!(
            validate_tree(&tree, CheckSet::Export),
            Err(BuildError::TooManyParameters("wide".to_string()))
        );
    }

    #[test]
    fn test_too_many_root_entries() {
        let mut builder = TreeBuilder::new();
        for i in 0..101 {
            builder.register(CommandDescriptor::command(&[format!("c{i}").as_str()]));
        }
        let tree = builder.build().unwrap();

        assert_eq!(
            validate_tree(&tree, CheckSet::Export),
            Err(BuildError::TooManyRootEntries(101))
        );
    }

    #[test]
    fn test_too_many_group_entries() {
        let mut builder = TreeBuilder::new();
        for i in 0..26 {
            builder.register(CommandDescriptor::command(&["group", format!("c{i}").as_str()]));
        }
        let tree = builder.build().unwrap();

        assert_eq!(
            validate_tree(&tree, CheckSet::Export),
            Err(BuildError::TooManyGroupEntries("group".to_string()))
        );
    }

    #[test]
    fn test_limits_are_configurable() {
        let limits = Limits {
            max_group_entries: 30,
            ..Limits::default()
        };
        let mut builder = TreeBuilder::new().with_limits(limits);
        for i in 0..26 {
            builder.register(CommandDescriptor::command(&["group", format!("c{i}").as_str()]));
        }
        let tree = builder.build().unwrap();

        assert!(validate_tree(&tree, CheckSet::Export).is_ok());
    }

    #[test]
    fn test_too_many_choices() {
        let members = (0..26)
            .map(|i| crate::EnumMember::new(&format!("M{i}")))
            .collect();
        let tree = TreeBuilder::new()
            .with_descriptor(
                CommandDescriptor::command(&["pick"])
                    .with_parameter(Parameter::required("choice", ParameterType::Enum(members))),
            )
            .build()
            .unwrap();

        assert!(matches!(
            validate_tree(&tree, CheckSet::Export),
            Err(BuildError::TooManyChoices { .. })
        ));
    }

    #[test]
    fn test_channel_filter_checked_in_both_sets() {
        let descriptor = CommandDescriptor::command(&["post"]).with_parameter(
            Parameter::required("where", ParameterType::Channel).with_channel_types(vec![ChannelType::GuildText]),
        );
        let tree = TreeBuilder::new().with_descriptor(descriptor).build().unwrap();

        assert!(validate_tree(&tree, CheckSet::Build).is_ok());
        assert!(validate_tree(&tree, CheckSet::Export).is_ok());
    }
}
