//! Size and depth limits of the declarative schema format.

use serde::{Deserialize, Serialize};

/// Description emitted for chat commands, groups and parameters that declare
/// none; the platform rejects empty descriptions.
pub const DEFAULT_DESCRIPTION: &str = "No description set.";

/// External-format limits enforced at build and export time.
///
/// Defaults mirror the platform's published limits. Every field is optional
/// when deserializing, so a config file only needs to name what it changes.
///
/// # Examples
///
/// ```
/// use command_tree_core::Limits;
///
/// let limits = Limits::default();
/// assert_eq!(limits.max_name_length, 32);
/// assert_eq!(limits.max_depth, 3);
///
/// let relaxed: Limits = serde_json::from_str(r#"{ "max_group_entries": 50 }"#).unwrap();
/// assert_eq!(relaxed.max_group_entries, 50);
/// assert_eq!(relaxed.max_root_entries, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum length of a command, group or parameter name, in characters.
    pub max_name_length: usize,
    /// Maximum length of any description or choice label, in characters.
    pub max_description_length: usize,
    /// Maximum number of levels below the root.
    pub max_depth: usize,
    /// Maximum number of root-level entries.
    pub max_root_entries: usize,
    /// Maximum number of children of a single group.
    pub max_group_entries: usize,
    /// Maximum number of parameters of a single command.
    pub max_parameters: usize,
    /// Maximum number of choices of an enumeration parameter.
    pub max_choices: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_name_length: 32,
            max_description_length: 100,
            max_depth: 3,
            max_root_entries: 100,
            max_group_entries: 25,
            max_parameters: 25,
            max_choices: 25,
        }
    }
}
