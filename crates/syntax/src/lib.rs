//! # Syntax
//! Parse Jech source code into an Abstract Syntax Tree
//!
//! The source is first tokenised, and then statements are recognised from the tokens.
//! Each kind of statement has a recogniser which looks at a fixed window of tokens, and
//! either builds a node for the statement or reports the token it didn't expect.
//!
//! Parsing is best effort: at the first error parsing stops, but the statements parsed
//! before the error are kept. An unterminated string is fatal, and stops parsing
//! before it begins.

pub mod ast;
mod parser;
mod span;
mod tokeniser;

#[cfg(test)]
mod test;

/// Parses a source code string into an AST.
///
/// # Examples
/// ```
/// use jech_syntax::parse;
/// let ast = parse("say(5 + 3);");
///
/// assert!(ast.is_valid());
/// ```
pub fn parse(source: &str) -> AST<'_> {
  let mut ast = AST::new(source);

  if !ast.has_fatal_error() {
    let (statements, error) = parser::Parser::new(source, &ast.tokens).parse();
    ast.root_statements = statements;
    ast.errors.extend(error);
  }

  ast
}

/// Get the tokens from a source code string
pub fn tokenise(source: &str) -> impl Iterator<Item = tokeniser::Token> + '_ {
  tokeniser::Tokeniser::from(source)
}

/// Get all the tokens from a source code string, ending with a single `EndOfFile`
pub fn lex(source: &str) -> Vec<Token> {
  tokenise(source).collect()
}

pub use ast::AST;
pub use parser::ParseError;
pub use span::{LineIndex, Position, Span};
pub use tokeniser::{Token, TokenKind};
