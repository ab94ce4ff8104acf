//! Hierarchical command tree engine.
//!
//! This crate turns a flat list of command declarations into a validated,
//! immutable tree and offers three consumers of that tree:
//!
//! - [`TreeBuilder`] — places [`CommandDescriptor`]s, merges groups declared
//!   by several sources, prunes groups left empty by exclusion and validates
//!   the result.
//! - [`CommandTree::search`] — resolves raw text (`"admin ban alice --silent"`)
//!   to the first [`CommandNode`] whose key path and parameter signature
//!   match, using the forward-only [`Tokenizer`].
//! - [`export_tree`] — produces the nested declarative schema
//!   ([`SchemaNode`]) registered with the remote platform.
//! - [`map_remote_commands`] — maps identifier-bearing
//!   [`RemoteCommandRecord`]s reported back by the platform onto local
//!   commands.
//!
//! Build and export failures are reported as [`BuildError`]; text that
//! matches nothing is a [`SearchError::NoMatch`].
//!
//! # Example
//!
//! ```
//! use command_tree_core::*;
//!
//! let tree = TreeBuilder::new()
//!     .with_descriptor(CommandDescriptor::command(&["ping"]).with_description("Check latency"))
//!     .with_descriptor(
//!         CommandDescriptor::command(&["admin", "ban"])
//!             .with_parameter(Parameter::required("user", ParameterType::Entity(EntityKind::User))),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let ban = tree.search("admin ban alice").unwrap();
//! assert_eq!(tree.dotted_path(ban.id), "admin::ban");
//!
//! let schema = tree.export().unwrap();
//! assert_eq!(schema.len(), 2);
//! assert_eq!(schema[1].options[0].kind, SchemaKind::SubCommand);
//! ```

mod builder;
mod descriptor;
mod export;
mod limits;
mod search;
mod sync;
mod tokenize;
mod tree;
mod types;
mod validate;

pub use builder::TreeBuilder;
pub use descriptor::{CommandDescriptor, DescriptorKind};
pub use export::{Choice, SchemaNode, export_tree};
pub use limits::{DEFAULT_DESCRIPTION, Limits};
pub use search::{SearchError, search};
pub use sync::{
    MappingEntry, MappingKey, MappingTarget, RemoteCommandRecord, RemoteId, RemoteOptionRecord,
    map_remote_commands,
};
pub use tokenize::{
    DEFAULT_SWITCH_PREFIX, Token, TokenKind, TokenizeError, Tokenizer, TokenizerOptions,
};
pub use tree::{CommandNode, CommandTree, GroupNode, Node, NodeId, PATH_SEPARATOR, Parent, RootNode};
pub use types::*;
pub use validate::{BuildError, CheckSet, validate_tree};
