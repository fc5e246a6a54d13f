use crate::span::{Position, Span};
use std::{fmt, iter};

/// Convert a string of source code into an [Iterator] of [Token]s
///
/// Whitespace and comments are skipped, and the iterator always finishes with a single
/// [`TokenKind::EndOfFile`] token.
pub struct Tokeniser<'source> {
  /// The source code to tokenise
  source: &'source [u8],
  /// The current position in the source code
  position: usize,
  /// The line of the current position
  line: u32,
  /// The column of the current position, counted in characters
  column: u32,
  /// Has the end of file token been emitted
  finished: bool,
}
impl<'source> From<&'source str> for Tokeniser<'source> {
  /// Create a new [Tokeniser] from a source code string
  ///
  /// # Panics
  /// Panics if the length of the source code is greater than `u32::MAX`
  fn from(value: &'source str) -> Self {
    assert!(value.len() < u32::MAX as usize);

    Self {
      source: value.as_ref(),
      position: 0,
      line: 1,
      column: 1,
      finished: false,
    }
  }
}
impl Tokeniser<'_> {
  /// Has the end of the source code been reached?
  fn is_end(&self, position: usize) -> bool {
    position >= self.source.len()
  }

  /// Move forward over a number of bytes, keeping track of lines and columns
  fn advance(&mut self, length: usize) {
    let end = (self.position + length).min(self.source.len());

    for character in &self.source[self.position..end] {
      if *character == b'\n' {
        self.line += 1;
        self.column = 1;
      } else if (character & 0b1100_0000) != 0b1000_0000 {
        self.column += 1;
      }
    }

    self.position = end;
  }

  /// Skip over whitespace and comments
  fn skip_trivia(&mut self) {
    while let Some(character) = self.source.get(self.position) {
      let next_character = self.source.get(self.position + 1);

      match character {
        b' ' | b'\r' | b'\t' | b'\n' => self.advance(1),
        b'#' => self.advance(self.comment_length()),
        b'/' if matches!(next_character, Some(b'/')) => self.advance(self.comment_length()),
        _ => break,
      }
    }
  }

  /// Get the next token from the source code
  fn get_next_token(&self) -> (TokenKind, usize) {
    if self.is_end(self.position) {
      return (TokenKind::EndOfFile, 0);
    }

    let character = &self.source[self.position];
    let next_character = self.source.get(self.position + 1);

    match character {
      // Values
      b'"' => self.string(),
      b'0'..=b'9' => self.number(),
      b'a'..=b'z' | b'A'..=b'Z' => self.identifier(),

      // Brackets + Separators
      b'(' => (TokenKind::LeftParen, 1),
      b')' => (TokenKind::RightParen, 1),
      b'{' => (TokenKind::LeftCurly, 1),
      b'}' => (TokenKind::RightCurly, 1),
      b'[' => (TokenKind::LeftSquare, 1),
      b']' => (TokenKind::RightSquare, 1),
      b',' => (TokenKind::Comma, 1),
      b'.' => (TokenKind::Dot, 1),
      b';' => (TokenKind::Semicolon, 1),

      // Operators
      b'+' => (TokenKind::Plus, 1),
      b'-' => (TokenKind::Minus, 1),
      b'*' => (TokenKind::Star, 1),
      b'/' => (TokenKind::Slash, 1),

      // Equalities
      b'=' if matches!(next_character, Some(b'=')) => (TokenKind::EqualEqual, 2),
      b'=' => (TokenKind::Equal, 1),
      b'>' => (TokenKind::Greater, 1),
      b'<' => (TokenKind::Less, 1),

      // Unknown character
      x if (x & 0b1111_0000) == 0b1111_0000 => (TokenKind::Unknown, 4),
      x if (x & 0b1110_0000) == 0b1110_0000 => (TokenKind::Unknown, 3),
      x if (x & 0b1100_0000) == 0b1100_0000 => (TokenKind::Unknown, 2),
      _ => (TokenKind::Unknown, 1),
    }
  }

  /// The length of a comment, up to but not including the newline
  fn comment_length(&self) -> usize {
    self.source[self.position..]
      .iter()
      .take_while(|c| **c != b'\n')
      .count()
  }

  /// Go to the end of a string token, the closing quote
  fn string(&self) -> (TokenKind, usize) {
    let mut pos = self.position + 1;

    loop {
      if self.is_end(pos) {
        break (TokenKind::UnterminatedString, pos - self.position);
      } else if self.source[pos] == b'"' {
        break (TokenKind::String, pos - self.position + 1);
      }

      pos += 1;
    }
  }

  /// Get a number token, with a possible decimal part
  fn number(&self) -> (TokenKind, usize) {
    let mut position = self.position + 1;

    // Match numbers before the decimal point
    position += self.source[position..]
      .iter()
      .take_while(|c| c.is_ascii_digit())
      .count();

    // Match a decimal point
    if !self.is_end(position + 1)
      && self.source[position] == b'.'
      && self.source[position + 1].is_ascii_digit()
    {
      position += 1;

      // Match numbers after the decimal point
      position += self.source[position..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    }

    (TokenKind::Number, position - self.position)
  }

  /// Get an identifier token, a letter followed by letters and digits
  fn identifier(&self) -> (TokenKind, usize) {
    let length = 1
      + self.source[self.position + 1..]
        .iter()
        .take_while(|c| c.is_ascii_alphanumeric())
        .count();

    (self.identifier_type(length), length)
  }

  /// Determines the type of the identifier, is it a keyword or a standard identifier
  fn identifier_type(&self, length: usize) -> TokenKind {
    match &self.source[self.position..self.position + length] {
      b"do" => TokenKind::Do,
      b"else" => TokenKind::Else,
      b"false" => TokenKind::False,
      b"keep" => TokenKind::Keep,
      b"map" => TokenKind::Map,
      b"return" => TokenKind::Return,
      b"say" => TokenKind::Say,
      b"true" => TokenKind::True,
      b"when" => TokenKind::When,
      _ => TokenKind::Identifier,
    }
  }
}
impl Iterator for Tokeniser<'_> {
  type Item = Token;

  #[allow(clippy::cast_possible_truncation, reason = "source.len() < u32::MAX")]
  fn next(&mut self) -> Option<Self::Item> {
    if self.finished {
      return None;
    }

    self.skip_trivia();

    let (kind, length) = self.get_next_token();
    let token = Token {
      kind,
      start: self.position as u32,
      length: length as u32,
      line: self.line,
      column: self.column,
    };

    self.advance(length);
    self.finished = kind == TokenKind::EndOfFile;

    Some(token)
  }
}
impl iter::FusedIterator for Tokeniser<'_> {}

/// A Token of source code, a lexeme of the language
///
/// With the type of token, the byte range it covers and where it starts as a line and column
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Token {
  /// The type of the token
  pub kind: TokenKind,
  /// The byte index the token starts at
  pub start: u32,
  /// The length of the token in bytes
  pub length: u32,
  /// The line the token starts on
  pub line: u32,
  /// The column the token starts on
  pub column: u32,
}
impl Token {
  /// The line and column of the start of the token
  pub fn position(&self) -> Position {
    Position::new(self.line, self.column)
  }

  /// Get the text of the token from the source code
  #[must_use]
  pub fn text<'source>(&self, source: &'source str) -> &'source str {
    Span::from(*self).source_text(source)
  }
}
impl From<Token> for Span {
  fn from(token: Token) -> Self {
    Self {
      start: token.start,
      end: token.start + token.length,
    }
  }
}

/// The type of a token
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub enum TokenKind {
  // Brackets
  /// `(`
  LeftParen,
  /// `)`
  RightParen,
  /// `{`
  LeftCurly,
  /// `}`
  RightCurly,
  /// `[`
  LeftSquare,
  /// `]`
  RightSquare,

  // Separators
  /// `,`
  Comma,
  /// `.`
  Dot,
  /// `;`
  Semicolon,

  // Operators
  /// `+`
  Plus,
  /// `-`
  Minus,
  /// `*`
  Star,
  /// `/`
  Slash,

  // Comparators
  /// `=`
  Equal,
  /// `==`
  EqualEqual,
  /// `>`
  Greater,
  /// `<`
  Less,

  // Values
  /// A identifier for a variable, a letter followed by letters and digits
  Identifier,
  /// A number, with a possible decimal part
  Number,
  /// A string, any characters between `"`
  String,

  // Keywords
  /// `do`
  Do,
  /// `else`
  Else,
  /// `false`
  False,
  /// `keep`
  Keep,
  /// `map`
  Map,
  /// `return`
  Return,
  /// `say`
  Say,
  /// `true`
  True,
  /// `when`
  When,

  /// A token to indicate the end of the file
  EndOfFile,

  // Error
  /// An unknown character, not known to fit in a [`TokenKind`]
  #[default]
  Unknown,
  /// A string where the end of the file has been reached, thus unterminated
  UnterminatedString,
}
impl TokenKind {
  /// Is the token always the same length, so its text doesn't need displaying
  #[must_use]
  pub fn has_fixed_length(self) -> bool {
    !matches!(
      self,
      Self::Identifier | Self::Number | Self::String | Self::Unknown | Self::UnterminatedString
    )
  }

  /// Can the token be used as a value: a literal or an identifier
  #[must_use]
  pub fn is_value(self) -> bool {
    matches!(
      self,
      Self::String | Self::Number | Self::True | Self::False | Self::Identifier
    )
  }

  /// Is the token a literal: a string, number, or boolean
  #[must_use]
  pub fn is_literal(self) -> bool {
    matches!(self, Self::String | Self::Number | Self::True | Self::False)
  }

  /// Is the token one of the arithmetic operators
  #[must_use]
  pub fn is_binary_operator(self) -> bool {
    matches!(self, Self::Plus | Self::Minus | Self::Star | Self::Slash)
  }

  /// Is the token one of the comparison operators
  #[must_use]
  pub fn is_comparison_operator(self) -> bool {
    matches!(self, Self::Greater | Self::Less | Self::EqualEqual)
  }

  /// A description of the token kind for use in error messages
  #[must_use]
  pub fn description(self) -> String {
    match self {
      Self::Identifier => "an identifier".to_owned(),
      Self::Number => "a number".to_owned(),
      Self::String => "a string".to_owned(),
      Self::EndOfFile => "the end of the file".to_owned(),
      Self::Unknown => "an unknown character".to_owned(),
      Self::UnterminatedString => "an unterminated string".to_owned(),
      kind => format!("`{kind}`"),
    }
  }
}
impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      // Brackets
      Self::LeftParen => write!(f, "("),
      Self::RightParen => write!(f, ")"),
      Self::LeftCurly => write!(f, "{{"),
      Self::RightCurly => write!(f, "}}"),
      Self::LeftSquare => write!(f, "["),
      Self::RightSquare => write!(f, "]"),

      // Separators
      Self::Comma => write!(f, ","),
      Self::Dot => write!(f, "."),
      Self::Semicolon => write!(f, ";"),

      // Operators
      Self::Plus => write!(f, "+"),
      Self::Minus => write!(f, "-"),
      Self::Star => write!(f, "*"),
      Self::Slash => write!(f, "/"),

      // Equalities
      Self::Equal => write!(f, "="),
      Self::EqualEqual => write!(f, "=="),
      Self::Greater => write!(f, ">"),
      Self::Less => write!(f, "<"),

      // With Values
      Self::Identifier => write!(f, "Identifier"),
      Self::Number => write!(f, "Number"),
      Self::String => write!(f, "String"),

      // Keywords
      Self::Do => write!(f, "do"),
      Self::Else => write!(f, "else"),
      Self::False => write!(f, "false"),
      Self::Keep => write!(f, "keep"),
      Self::Map => write!(f, "map"),
      Self::Return => write!(f, "return"),
      Self::Say => write!(f, "say"),
      Self::True => write!(f, "true"),
      Self::When => write!(f, "when"),

      Self::EndOfFile => write!(f, "End of File"),

      // Errors
      Self::Unknown => write!(f, "Unknown Character"),
      Self::UnterminatedString => write!(f, "Unterminated String"),
    }
  }
}
