//! URL template parsing and rendering
//!
//! Templates are relative path/query strings with `{name}` placeholders,
//! e.g. `users/{userId}/todos?status={status}`. Placeholders are filled
//! from [`CallArgs`] at resolve time.

use crate::types::CallArgs;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Maximum template length
pub const MAX_TEMPLATE_LENGTH: usize = 2048;

/// Errors that can occur while parsing or rendering a URL template
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Empty template")]
    Empty,

    #[error("Template exceeds {MAX_TEMPLATE_LENGTH} characters")]
    TooLong,

    #[error("Unclosed '{{' at byte {0}")]
    UnclosedBrace(usize),

    #[error("Unmatched '}}' at byte {0}")]
    UnmatchedBrace(usize),

    #[error("Empty placeholder at byte {0}")]
    EmptyPlaceholder(usize),

    #[error("Invalid placeholder name '{0}': only ASCII alphanumerics and '_' are allowed")]
    InvalidPlaceholderName(String),

    #[error("Missing argument for placeholder '{0}'")]
    MissingArgument(String),

    #[error("Argument '{0}' does not match any placeholder")]
    UnusedArgument(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed URL template
///
/// # Examples
///
/// ```rust
/// use opcall_core::{CallArgs, UrlTemplate};
///
/// let template = UrlTemplate::parse("users/{userId}/todos").unwrap();
/// let args = CallArgs::new().with("userId", "1");
/// assert_eq!(template.render(&args).unwrap(), "users/1/todos");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl UrlTemplate {
    /// Parse a template string
    ///
    /// # Errors
    ///
    /// Returns an error if the template is empty, too long, or contains
    /// malformed or invalid placeholders.
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        if raw.is_empty() {
            return Err(TemplateError::Empty);
        }
        if raw.len() > MAX_TEMPLATE_LENGTH {
            return Err(TemplateError::TooLong);
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.char_indices();

        while let Some((pos, ch)) = chars.next() {
            match ch {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    while let Some((_, inner)) = chars.next() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(TemplateError::UnclosedBrace(pos)),
                            _ => name.push(inner),
                        }
                    }
                    if !closed {
                        return Err(TemplateError::UnclosedBrace(pos));
                    }
                    if name.is_empty() {
                        return Err(TemplateError::EmptyPlaceholder(pos));
                    }
                    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                        return Err(TemplateError::InvalidPlaceholderName(name));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                '}' => return Err(TemplateError::UnmatchedBrace(pos)),
                _ => literal.push(ch),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The original template string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in order of appearance
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Whether the template references the given placeholder name
    pub fn has_placeholder(&self, name: &str) -> bool {
        self.placeholders().any(|p| p == name)
    }

    /// Render the template against the given arguments
    ///
    /// Every placeholder must have a matching argument, and every argument
    /// must match a placeholder.
    ///
    /// # Errors
    ///
    /// Returns `MissingArgument` or `UnusedArgument` on a mismatch.
    pub fn render(&self, args: &CallArgs) -> Result<String, TemplateError> {
        for key in args.keys() {
            if !self.has_placeholder(key) {
                return Err(TemplateError::UnusedArgument(key.to_string()));
            }
        }

        let mut rendered = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(name) => {
                    let value = args
                        .get(name)
                        .ok_or_else(|| TemplateError::MissingArgument(name.clone()))?;
                    rendered.push_str(value);
                }
            }
        }
        Ok(rendered)
    }
}

impl Display for UrlTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for UrlTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
