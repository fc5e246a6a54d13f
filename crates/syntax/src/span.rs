//! Source positions and related helper functions.
//!
//! [`Span`] based on [oxc_span](https://github.com/web-infra-dev/oxc)
//! [`LineIndex`] based on [Ruff](https://github.com/astral-sh/ruff)

use std::fmt;

/// Represents a span of the source code
#[must_use]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
  /// The byte index of the start of the span
  pub start: u32,
  /// The byte index of the end of the span
  pub end: u32,
}

impl Span {
  /// Create a new `Span` from a start and end position
  #[inline]
  pub const fn new(start: u32, end: u32) -> Self {
    Self { start, end }
  }

  /// Combine two `Span`s into one
  pub fn merge(self, other: Self) -> Self {
    if self == Self::default() {
      other
    } else if other == Self::default() {
      self
    } else {
      Self::new(self.start.min(other.start), self.end.max(other.end))
    }
  }

  /// Get the source text for a `Span` from a source string
  #[must_use]
  pub fn source_text(self, source_text: &str) -> &str {
    let start = self.start as usize;
    let end = self.end as usize;

    &source_text[start..end]
  }
}

/// A human readable location in the source, used for diagnostics
///
/// Both lines and columns start at 1, columns are counted in characters
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
  /// The line number
  pub line: u32,
  /// The column on the line
  pub column: u32,
}
impl Position {
  /// Create a new `Position`
  pub const fn new(line: u32, column: u32) -> Self {
    Self { line, column }
  }
}
impl Default for Position {
  fn default() -> Self {
    Self::new(1, 1)
  }
}
impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "line {}, column {}", self.line, self.column)
  }
}

type FilePosition = u32;
type LineNumber = usize;

/// Index for looking up the lines of a source string
///
/// Line numbers given start at 1
#[must_use]
#[derive(Debug)]
pub struct LineIndex {
  line_starts: Vec<FilePosition>,
  file_length: FilePosition,
}
impl LineIndex {
  /// Create a new `LineIndex` from a source string.
  ///
  /// # Panics
  ///
  /// Panics if the source string is longer than `u32::MAX` bytes.
  #[allow(clippy::cast_possible_truncation, reason = "source.len() < u32::MAX")]
  pub fn from_source(source: &str) -> Self {
    assert!(source.len() < u32::MAX as usize);

    let mut line_starts = Vec::with_capacity(source.len() / 50);
    line_starts.push(0);

    for (index, character) in source.as_bytes().iter().enumerate() {
      if *character == b'\n' {
        line_starts.push(index as FilePosition + 1);
      }
    }

    Self {
      line_starts,
      file_length: source.len() as FilePosition,
    }
  }

  /// Get a `Span` for a given line number, if the line exists
  pub fn line_span(&self, line: LineNumber) -> Option<Span> {
    if line == 0 {
      return None;
    }

    let start = *self.line_starts.get(line - 1)?;
    let end = *self.line_starts.get(line).unwrap_or(&self.file_length);

    Some(Span::new(start, end))
  }

  /// Get a `Span` for the entire file
  pub fn file_span(&self) -> Span {
    Span {
      start: 0,
      end: self.file_length,
    }
  }
}
