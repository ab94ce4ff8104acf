//! Text dispatch: resolving a raw command string to a [`CommandNode`].
//!
//! The search walks the tree level by level. At each level the children are
//! tried in declaration order against the next value token: a matching group
//! is entered, a matching command is accepted only if the rest of the input
//! satisfies its parameter signature. The first full match wins; there is no
//! backtracking once a command is returned.
//!
//! Every candidate is tried against its own copy of the cursor, and the
//! shared cursor only moves forward when a group is entered. A failed
//! candidate therefore never consumes input a later sibling needs.

use thiserror::Error;
use tracing::debug;

use crate::{
    CommandNode, CommandTree, Node, Parameter, Parent, Token, TokenKind, TokenizeError, Tokenizer,
    TokenizerOptions,
};

/// Why a search did not resolve a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// No command matches the input. This is an ordinary outcome.
    #[error("no matching command found")]
    NoMatch,
    /// The input could not be tokenized.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

impl CommandTree {
    /// Resolves `text` to a command using the default tokenizer options.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::{CommandDescriptor, SearchError, TreeBuilder};
    ///
    /// let tree = TreeBuilder::new()
    ///     .with_descriptor(CommandDescriptor::command(&["a", "b"]))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(tree.search("a b").unwrap().key, "b");
    /// assert_eq!(tree.search("a c").unwrap_err(), SearchError::NoMatch);
    /// ```
    pub fn search(&self, text: &str) -> Result<&CommandNode, SearchError> {
        search(self, text, &TokenizerOptions::default())
    }
}

/// Resolves `text` to a command of `tree`.
///
/// # Errors
///
/// Returns [`SearchError::NoMatch`] when no command accepts the input and
/// [`SearchError::Tokenize`] when the input is malformed.
pub fn search<'t>(
    tree: &'t CommandTree,
    text: &str,
    options: &TokenizerOptions,
) -> Result<&'t CommandNode, SearchError> {
    let mut cursor = Tokenizer::with_options(text, options);
    let mut level = Parent::Root;

    'levels: loop {
        for child in tree.children(level) {
            let mut attempt = cursor.clone();
            let Some(token) = attempt.next_significant()? else {
                break 'levels;
            };
            if token.kind != TokenKind::Value || token.text != child.key() {
                continue;
            }

            match child {
                Node::Group(group) => {
                    cursor = attempt;
                    level = Parent::Group(group.id);
                    continue 'levels;
                }
                Node::Command(command) => {
                    if signature_matches(command, attempt)? {
                        return Ok(command);
                    }
                }
            }
        }
        break;
    }

    debug!(input = text, "no command matched");
    Err(SearchError::NoMatch)
}

fn take_values(tokens: &[Token<'_>], parameter: &Parameter) -> usize {
    let values = tokens
        .iter()
        .take_while(|token| token.kind == TokenKind::Value)
        .count();
    if parameter.is_collection {
        values
    } else {
        values.min(1)
    }
}

/// Checks whether the remaining input satisfies `command`'s parameters.
///
/// Positional values fill non-switch parameters in declaration order; a
/// collection takes every consecutive value. `--name` sets a switch, or
/// supplies the following value(s) to the parameter called `name`.
fn signature_matches(command: &CommandNode, rest: Tokenizer<'_>) -> Result<bool, TokenizeError> {
    let tokens = rest
        .filter(|token| !matches!(token, Ok(Token { kind: TokenKind::Separator, .. })))
        .collect::<Result<Vec<_>, _>>()?;

    let parameters = &command.parameters;
    let mut filled = vec![false; parameters.len()];
    let mut index = 0;

    while let Some(token) = tokens.get(index) {
        let slot = match token.kind {
            TokenKind::NamedSwitch => parameters
                .iter()
                .enumerate()
                .position(|(slot, parameter)| !filled[slot] && parameter.name == token.text),
            _ => parameters
                .iter()
                .enumerate()
                .position(|(slot, parameter)| !filled[slot] && !parameter.is_switch),
        };
        let Some(slot) = slot else {
            return Ok(false);
        };
        filled[slot] = true;

        let parameter = &parameters[slot];
        if token.kind == TokenKind::NamedSwitch {
            index += 1;
            if parameter.is_switch {
                continue;
            }
        }

        let taken = take_values(&tokens[index..], parameter);
        if taken == 0 {
            return Ok(false);
        }
        index += taken;
    }

    Ok(parameters
        .iter()
        .zip(&filled)
        .all(|(parameter, filled)| *filled || !parameter.required || parameter.is_switch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandDescriptor, ParameterType, Primitive, TreeBuilder};

    fn text(name: &str) -> Parameter {
        Parameter::required(name, ParameterType::Primitive(Primitive::String))
    }

    fn build(descriptors: Vec<CommandDescriptor>) -> CommandTree {
        let mut builder = TreeBuilder::new();
        builder.register_all(descriptors);
        builder.build().unwrap()
    }

    #[test]
    fn test_resolves_nested_command() {
        let tree = build(vec![CommandDescriptor::command(&["a", "b"])]);
        let command = tree.search("a b").unwrap();
        assert_eq!(tree.dotted_path(command.id), "a::b");
    }

    #[test]
    fn test_unknown_child_is_no_match() {
        let tree = build(vec![CommandDescriptor::command(&["a", "b"])]);
        assert_eq!(tree.search("a c").unwrap_err(), SearchError::NoMatch);
    }

    #[test]
    fn test_group_alone_is_no_match() {
        let tree = build(vec![CommandDescriptor::command(&["a", "b"])]);
        assert_eq!(tree.search("a").unwrap_err(), SearchError::NoMatch);
        assert_eq!(tree.search("").unwrap_err(), SearchError::NoMatch);
    }

    #[test]
    fn test_later_sibling_still_matches() {
        let tree = build(vec![
            CommandDescriptor::command(&["x"]),
            CommandDescriptor::command(&["y"]),
            CommandDescriptor::command(&["g", "p"]),
            CommandDescriptor::command(&["g", "q"]),
        ]);
        assert_eq!(tree.search("y").unwrap().key, "y");
        assert_eq!(tree.search("g q").unwrap().key, "q");
    }

    #[test]
    fn test_key_match_is_case_sensitive() {
        let tree = build(vec![CommandDescriptor::command(&["ping"])]);
        assert_eq!(tree.search("PING").unwrap_err(), SearchError::NoMatch);
    }

    #[test]
    fn test_leftover_tokens_reject_command() {
        let tree = build(vec![CommandDescriptor::command(&["ping"])]);
        assert!(tree.search("ping").is_ok());
        assert_eq!(tree.search("ping extra").unwrap_err(), SearchError::NoMatch);
    }

    #[test]
    fn test_overloads_are_disambiguated_by_signature() {
        let tree = build(vec![
            CommandDescriptor::command(&["g", "echo"]),
            CommandDescriptor::command(&["g", "echo"]).with_parameter(text("value")),
            CommandDescriptor::command(&["g", "echo"])
                .with_parameter(text("first"))
                .with_parameter(text("second")),
        ]);

        assert!(tree.search("g echo").unwrap().parameters.is_empty());
        assert_eq!(tree.search("g echo hi").unwrap().parameters.len(), 1);
        assert_eq!(tree.search(r#"g echo hi "there you""#).unwrap().parameters.len(), 2);
        assert_eq!(tree.search("g echo a b c").unwrap_err(), SearchError::NoMatch);
    }

    #[test]
    fn test_first_structural_match_wins() {
        let tree = build(vec![
            CommandDescriptor::command(&["say"])
                .with_parameter(Parameter::optional("word", ParameterType::Primitive(Primitive::String))),
            CommandDescriptor::command(&["say"]).with_parameter(text("word")),
        ]);
        let command = tree.search("say hi").unwrap();
        assert!(!command.parameters[0].required);
    }

    #[test]
    fn test_optional_parameters_may_be_omitted() {
        let tree = build(vec![CommandDescriptor::command(&["roll"])
            .with_parameter(text("dice"))
            .with_parameter(Parameter::optional("sides", ParameterType::Primitive(Primitive::U8)))]);

        assert!(tree.search("roll 2").is_ok());
        assert!(tree.search("roll 2 6").is_ok());
        assert_eq!(tree.search("roll").unwrap_err(), SearchError::NoMatch);
    }

    #[test]
    fn test_switches_and_named_values() {
        let tree = build(vec![CommandDescriptor::command(&["deploy"])
            .with_parameter(text("target"))
            .with_parameter(Parameter::switch("force"))
            .with_parameter(Parameter::optional("tag", ParameterType::Primitive(Primitive::String)))]);

        assert!(tree.search("deploy prod").is_ok());
        assert!(tree.search("deploy prod --force").is_ok());
        assert!(tree.search("deploy --force prod").is_ok());
        assert!(tree.search("deploy prod --tag v1").is_ok());
        assert!(tree.search("deploy prod --tag=v1 --force").is_ok());
        assert!(tree.search("deploy --target prod").is_ok());
        assert_eq!(tree.search("deploy prod --tag").unwrap_err(), SearchError::NoMatch);
        assert_eq!(tree.search("deploy prod --unknown").unwrap_err(), SearchError::NoMatch);
        assert_eq!(tree.search("deploy prod --force --force").unwrap_err(), SearchError::NoMatch);
    }

    #[test]
    fn test_collection_takes_every_value() {
        let tree = build(vec![CommandDescriptor::command(&["tag"])
            .with_parameter(text("names").allow_multiple())
            .with_parameter(Parameter::switch("dry"))]);

        assert!(tree.search("tag a").is_ok());
        assert!(tree.search("tag a b c --dry").is_ok());
        assert_eq!(tree.search("tag").unwrap_err(), SearchError::NoMatch);
    }

    #[test]
    fn test_switch_token_cannot_be_a_key() {
        let tree = build(vec![CommandDescriptor::command(&["help"])]);
        assert_eq!(tree.search("--help").unwrap_err(), SearchError::NoMatch);
    }

    #[test]
    fn test_tokenize_error_is_surfaced() {
        let tree = build(vec![CommandDescriptor::command(&["say"]).with_parameter(text("word"))]);
        assert_eq!(
            tree.search(r#"say "unterminated"#).unwrap_err(),
            SearchError::Tokenize(TokenizeError::UnterminatedQuote { offset: 4 })
        );
    }

    #[test]
    fn test_custom_switch_prefix() {
        let tree = build(vec![CommandDescriptor::command(&["run"]).with_parameter(Parameter::switch("fast"))]);
        let options = TokenizerOptions {
            switch_prefix: "/".to_string(),
        };
        assert!(search(&tree, "run /fast", &options).is_ok());
        assert_eq!(search(&tree, "run --fast", &options).unwrap_err(), SearchError::NoMatch);
    }
}
