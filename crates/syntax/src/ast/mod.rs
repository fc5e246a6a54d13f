//! # AST
//!
//! The definition of the Abstract Syntax Tree (AST)

use crate::{
  LineIndex,
  parser::ParseError,
  tokeniser::{Token, TokenKind, Tokeniser},
};
use std::cell::OnceCell;

pub mod expression;
mod prettyprint;
pub mod statement;

pub use expression::{
  Action, ArrayLiteral, Binary, BinaryOperator, Call, ComparisonOperator, Condition, Expression,
  Identifier, IndexAccess, Initializer, MapExpression, Operand, OperandKind,
};
pub use statement::Statement;

/// Abstract Syntax Tree representing the source
#[must_use]
#[derive(Debug)]
pub struct AST<'source> {
  /// The source code which the AST is for
  pub source: &'source str,
  /// Index of line locations, lazily constructed when required
  line_index: OnceCell<LineIndex>,
  /// The tokens of the source
  pub tokens: Vec<Token>,

  /// The main statements of the source
  pub root_statements: Vec<Statement<'source>>,

  /// Errors found during tokenising and parsing
  pub errors: Vec<ParseError>,
}
impl<'source> AST<'source> {
  pub(crate) fn new(source: &'source str) -> Self {
    let tokens: Vec<Token> = Tokeniser::from(source).collect();
    let errors = tokens
      .iter()
      .filter_map(|token| match token.kind {
        TokenKind::Unknown => Some(ParseError::UnknownCharacter(*token)),
        TokenKind::UnterminatedString => Some(ParseError::UnterminatedString(*token)),
        _ => None,
      })
      .collect();

    Self {
      source,
      line_index: OnceCell::new(),
      tokens,
      root_statements: Vec::new(),
      errors,
    }
  }

  /// Is the parsed AST valid, with no errors found during parsing?
  #[must_use]
  pub fn is_valid(&self) -> bool {
    self.errors.is_empty()
  }

  /// Was an error found which stops the source from being parsed at all?
  #[must_use]
  pub fn has_fatal_error(&self) -> bool {
    self.errors.iter().any(ParseError::is_fatal)
  }

  /// Does the source contain nothing but whitespace and comments?
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.tokens.len() <= 1
  }

  /// The line index for the AST, the locations of the new lines in the source code
  ///
  /// It is lazily initialised, and will be initialised on the first call
  pub fn line_index(&self) -> &LineIndex {
    self
      .line_index
      .get_or_init(|| LineIndex::from_source(self.source))
  }
}
