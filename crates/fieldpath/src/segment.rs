//! Field path representation and parsing.
//!
//! A field path addresses one value inside a nested document:
//!
//! - `spec.parameters.region` selects nested object fields,
//! - `status.atProvider.ids[0]` selects an array element,
//! - `metadata.labels[example.org/app]` selects a field whose name contains
//!   characters that would otherwise be separators.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single step in a field path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    /// Object field access.
    Field(String),
    /// Array element access.
    Index(usize),
}

impl Segment {
    /// Create a field segment.
    #[inline]
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Create an index segment.
    #[inline]
    pub const fn index(i: usize) -> Self {
        Self::Index(i)
    }

    fn needs_brackets(name: &str) -> bool {
        name.is_empty() || name.contains(['.', '[', ']'])
    }
}

/// A parsed field path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segments(Vec<Segment>);

impl Segments {
    /// Create a path from already-built segments.
    #[inline]
    pub const fn new(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    /// Parse a path expression.
    pub fn parse(path: &str) -> Result<Self> {
        Parser::new(path).run()
    }

    /// The segments of this path.
    #[inline]
    pub fn as_slice(&self) -> &[Segment] {
        &self.0
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the first `n` segments, used to locate traversal errors.
    pub fn prefix(&self, n: usize) -> String {
        Self(self.0.iter().take(n).cloned().collect()).to_string()
    }
}

impl fmt::Display for Segments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(name) if Segment::needs_brackets(name) => write!(f, "[{name}]")?,
                Segment::Field(name) if i == 0 => write!(f, "{name}")?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Segments {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Vec<Segment>> for Segments {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

struct Parser<'a> {
    path: &'a str,
    chars: Peekable<CharIndices<'a>>,
    segments: Vec<Segment>,
    field: String,
}

impl<'a> Parser<'a> {
    fn new(path: &'a str) -> Self {
        Self {
            path,
            chars: path.char_indices().peekable(),
            segments: Vec::new(),
            field: String::new(),
        }
    }

    fn run(mut self) -> Result<Segments> {
        // True right after a closing bracket, where a '.' may follow directly.
        let mut after_bracket = false;

        while let Some((position, c)) = self.chars.next() {
            match c {
                '.' => {
                    if self.field.is_empty() && !after_bracket {
                        return Err(self.error(position, "unexpected '.'"));
                    }
                    self.flush_field();
                    after_bracket = false;
                    match self.chars.peek().copied() {
                        Some((_, next)) if !matches!(next, '.' | '[' | ']') => {}
                        Some((next_position, _)) => {
                            return Err(self.error(next_position, "expected a field name"));
                        }
                        None => return Err(self.error(position, "trailing '.'")),
                    }
                }
                '[' => {
                    self.flush_field();
                    self.bracket(position)?;
                    after_bracket = true;
                    match self.chars.peek().copied() {
                        None | Some((_, '.' | '[')) => {}
                        Some((next_position, _)) => {
                            return Err(self.error(next_position, "unexpected character after ']'"));
                        }
                    }
                }
                ']' => return Err(self.error(position, "unexpected ']'")),
                _ => {
                    after_bracket = false;
                    self.field.push(c);
                }
            }
        }

        self.flush_field();
        if self.segments.is_empty() {
            return Err(Error::EmptyPath);
        }
        Ok(Segments(self.segments))
    }

    fn bracket(&mut self, open: usize) -> Result<()> {
        let mut content = String::new();
        loop {
            match self.chars.next() {
                Some((_, ']')) => break,
                Some((_, c)) => content.push(c),
                None => return Err(self.error(open, "unterminated '['")),
            }
        }
        if content.is_empty() {
            return Err(self.error(open, "empty brackets"));
        }
        let segment = content
            .parse::<usize>()
            .map_or_else(|_| Segment::Field(content), Segment::Index);
        self.segments.push(segment);
        Ok(())
    }

    fn flush_field(&mut self) {
        if !self.field.is_empty() {
            self.segments
                .push(Segment::Field(std::mem::take(&mut self.field)));
        }
    }

    fn error(&self, position: usize, reason: &'static str) -> Error {
        Error::parse(self.path, position, reason)
    }
}
