//! Forward-only tokenizer for text invocations.
//!
//! Splits a raw command string into [`Token`]s borrowed from the input:
//! bare words and double-quoted runs become [`TokenKind::Value`], words that
//! start with the switch prefix become [`TokenKind::NamedSwitch`], and runs
//! of whitespace outside quotes become [`TokenKind::Separator`].
//! `--name=value` produces the switch token followed by a value token.
//!
//! # Examples
//!
//! ```
//! use command_tree_core::{TokenKind, Tokenizer};
//!
//! let mut tokenizer = Tokenizer::new(r#"say "hello world" --loud"#);
//! let mut seen = Vec::new();
//! while tokenizer.advance().unwrap() {
//!     let token = tokenizer.current().unwrap();
//!     if token.kind != TokenKind::Separator {
//!         seen.push((token.kind, token.text));
//!     }
//! }
//! assert_eq!(
//!     seen,
//!     vec![
//!         (TokenKind::Value, "say"),
//!         (TokenKind::Value, "hello world"),
//!         (TokenKind::NamedSwitch, "loud"),
//!     ]
//! );
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Switch prefix used when no [`TokenizerOptions`] are given.
pub const DEFAULT_SWITCH_PREFIX: &str = "--";

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Value,
    NamedSwitch,
    Separator,
}

/// A slice of the input with its classification.
///
/// For quoted values `text` excludes the quotes; for switches it excludes
/// the prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Token-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A double quote opened at `offset` is never closed.
    #[error("unterminated quote starting at byte {offset}")]
    UnterminatedQuote { offset: usize },
}

/// Tokenizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerOptions {
    /// Prefix marking a named switch.
    pub switch_prefix: String,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            switch_prefix: DEFAULT_SWITCH_PREFIX.to_string(),
        }
    }
}

/// Single-pass cursor over a command string.
///
/// Cloning copies the cursor position; the input itself is never copied.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    position: usize,
    switch_prefix: &'a str,
    pending_value: Option<&'a str>,
    current: Option<Token<'a>>,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer using [`DEFAULT_SWITCH_PREFIX`].
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            switch_prefix: DEFAULT_SWITCH_PREFIX,
            pending_value: None,
            current: None,
        }
    }

    /// Creates a tokenizer with custom options.
    pub fn with_options(input: &'a str, options: &'a TokenizerOptions) -> Self {
        Self {
            switch_prefix: &options.switch_prefix,
            ..Self::new(input)
        }
    }

    /// Returns the token produced by the last successful
    /// [`advance`](Self::advance).
    pub fn current(&self) -> Option<Token<'a>> {
        self.current
    }

    /// Moves to the next token.
    ///
    /// Returns `Ok(false)` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizeError::UnterminatedQuote`] when a quoted run has no
    /// closing quote. The cursor then sits at the end of the input.
    pub fn advance(&mut self) -> Result<bool, TokenizeError> {
        if let Some(value) = self.pending_value.take() {
            self.current = Some(Token {
                kind: TokenKind::Value,
                text: value,
            });
            return Ok(true);
        }

        let rest = &self.input[self.position..];
        let Some(first) = rest.chars().next() else {
            self.current = None;
            return Ok(false);
        };

        let token = if first.is_whitespace() {
            let len = rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
            self.position += len;
            Token {
                kind: TokenKind::Separator,
                text: &rest[..len],
            }
        } else if let Some(token) = self.scan_switch()? {
            token
        } else {
            let text = self.scan_value()?;
            Token {
                kind: TokenKind::Value,
                text,
            }
        };

        self.current = Some(token);
        Ok(true)
    }

    /// Advances past separators and returns the next value or switch token.
    ///
    /// Returns `Ok(None)` once the input is exhausted.
    pub fn next_significant(&mut self) -> Result<Option<Token<'a>>, TokenizeError> {
        while self.advance()? {
            if let Some(token) = self.current {
                if token.kind != TokenKind::Separator {
                    return Ok(Some(token));
                }
            }
        }
        Ok(None)
    }

    fn fail(&mut self, offset: usize) -> TokenizeError {
        self.position = self.input.len();
        self.pending_value = None;
        self.current = None;
        TokenizeError::UnterminatedQuote { offset }
    }

    fn scan_switch(&mut self) -> Result<Option<Token<'a>>, TokenizeError> {
        let input = self.input;
        let rest = &input[self.position..];
        if self.switch_prefix.is_empty() || !rest.starts_with(self.switch_prefix) {
            return Ok(None);
        }

        let body_start = self.position + self.switch_prefix.len();
        let body = &input[body_start..];
        let name_len = body
            .find(|c: char| c.is_whitespace() || c == '=' || c == '"')
            .unwrap_or(body.len());
        if name_len == 0 {
            return Ok(None);
        }

        self.position = body_start + name_len;
        if body[name_len..].starts_with('=') {
            self.position += 1;
            self.pending_value = Some(self.scan_value()?);
        }

        Ok(Some(Token {
            kind: TokenKind::NamedSwitch,
            text: &body[..name_len],
        }))
    }

    fn scan_value(&mut self) -> Result<&'a str, TokenizeError> {
        let input = self.input;
        let start = self.position;
        let rest = &input[start..];

        if let Some(quoted) = rest.strip_prefix('"') {
            return match quoted.find('"') {
                Some(end) => {
                    self.position = start + end + 2;
                    Ok(&quoted[..end])
                }
                None => Err(self.fail(start)),
            };
        }

        let len = rest
            .find(|c: char| c.is_whitespace() || c == '"')
            .unwrap_or(rest.len());
        self.position = start + len;
        Ok(&rest[..len])
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(true) => self.current.map(Ok),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
