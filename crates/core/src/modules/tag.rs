use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::producers::{INJECT_TAG, PROVIDE_TAG};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("expected a tag key at position {position}")]
    MissingKey { position: usize },

    #[error("expected ':\"' after tag key '{key}' at position {position}")]
    ExpectedQuote { key: String, position: usize },

    #[error("unterminated value for tag key '{key}'")]
    Unterminated { key: String },

    #[error("invalid escape '\\{escape}' in value for tag key '{key}'")]
    InvalidEscape { key: String, escape: char },
}

/// Ordered `key:"value"` pairs annotating a field.
///
/// The order matters: provide fields try producers in the order their keys appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pairs: Vec<(String, String)>,
}

impl Tag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// A tag with a single `provide:"value"` pair
    pub fn provide(value: impl Into<String>) -> Self {
        Self::new().with(PROVIDE_TAG, value)
    }

    /// A tag with a single `inject:"value"` pair
    pub fn inject(value: impl Into<String>) -> Self {
        Self::new().with(INJECT_TAG, value)
    }

    /// Parse space separated `key:"value"` pairs.
    ///
    /// Values are double quoted and may use `\"`, `\\`, `\n`, `\r`, `\t`, `\0`, `\'` and
    /// `\u{..}` escapes.
    pub fn parse(input: &str) -> Result<Self, TagError> {
        let mut pairs = Vec::new();
        let mut chars = input.char_indices().peekable();

        loop {
            while matches!(chars.peek(), Some((_, ' '))) {
                chars.next();
            }
            let Some(&(start, _)) = chars.peek() else {
                break;
            };

            let mut key = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if c == ' ' || c == ':' || c == '"' {
                    break;
                }
                key.push(c);
                chars.next();
            }
            if key.is_empty() {
                return Err(TagError::MissingKey { position: start });
            }

            let quote_at = chars.peek().map_or(input.len(), |&(i, _)| i);
            let opened = matches!(chars.next(), Some((_, ':'))) && matches!(chars.next(), Some((_, '"')));
            if !opened {
                return Err(TagError::ExpectedQuote {
                    key,
                    position: quote_at,
                });
            }

            let mut value = String::new();
            let mut closed = false;
            while let Some((_, c)) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => {
                        let escaped = match chars.next() {
                            Some((_, c)) => c,
                            None => break,
                        };
                        value.push(unescape(&key, escaped, &mut chars)?);
                    }
                    c => value.push(c),
                }
            }
            if !closed {
                return Err(TagError::Unterminated { key });
            }

            pairs.push((key, value));
        }

        Ok(Self { pairs })
    }

    /// Value of the first pair with `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn unescape(
    key: &str,
    escaped: char,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<char, TagError> {
    let invalid = || TagError::InvalidEscape {
        key: key.to_string(),
        escape: escaped,
    };
    match escaped {
        '"' => Ok('"'),
        '\\' => Ok('\\'),
        '\'' => Ok('\''),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        '0' => Ok('\0'),
        'u' => {
            if !matches!(chars.next(), Some((_, '{'))) {
                return Err(invalid());
            }
            let mut hex = String::new();
            loop {
                match chars.next() {
                    Some((_, '}')) => break,
                    Some((_, c)) if c.is_ascii_hexdigit() && hex.len() < 6 => hex.push(c),
                    _ => return Err(invalid()),
                }
            }
            u32::from_str_radix(&hex, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

impl FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:{:?}", key, value)?;
        }
        Ok(())
    }
}

/// Comma separated options following the name in a tag value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagOptions<'a>(&'a str);

impl<'a> TagOptions<'a> {
    pub fn contains(&self, option: &str) -> bool {
        self.iter().any(|o| o == option)
    }

    pub fn first(&self) -> Option<&'a str> {
        self.iter().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> {
        let raw = self.0;
        raw.split(',').filter(|o| !o.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Split a tag value into its name and trailing options.
///
/// `"db,singleton"` becomes `("db", ["singleton"])`.
pub fn parse_tag_value(value: &str) -> (&str, TagOptions<'_>) {
    match value.split_once(',') {
        Some((name, options)) => (name, TagOptions(options)),
        None => (value, TagOptions("")),
    }
}
