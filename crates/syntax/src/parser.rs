use crate::{
  ast::{expression::*, statement::*},
  span::Position,
  tokeniser::{Token, TokenKind},
};
use std::{error, fmt};
use thin_vec::ThinVec;

/// A recognised node, and how many tokens were used to make it
struct Parsed<T> {
  node: T,
  consumed: usize,
}
impl<T> Parsed<T> {
  fn new(node: T, consumed: usize) -> Self {
    Self { node, consumed }
  }
}

/// Why parsing stopped early
#[derive(Debug)]
enum Halt {
  /// An error which needs reporting
  Error(ParseError),
  /// Reached an unknown character, which has already been reported by the tokeniser
  UnknownCharacter,
}
impl From<ParseError> for Halt {
  fn from(error: ParseError) -> Self {
    if error.token().kind == TokenKind::Unknown {
      Self::UnknownCharacter
    } else {
      Self::Error(error)
    }
  }
}

type ParseResult<T> = Result<Parsed<T>, Halt>;

/// Parses a sequence of tokens into statements
///
/// Each statement is recognised by looking at a fixed window of tokens from the current
/// position. A recogniser either builds a node and says how many tokens it used, or
/// reports the token it didn't expect. Parsing stops at the first error, keeping the
/// statements already parsed.
pub struct Parser<'source, 'tokens> {
  /// The source code the tokens are from
  source: &'source str,
  /// The tokens being parsed, not including the end token
  tokens: &'tokens [Token],
  /// The token returned when reading past the end of the tokens, the end of the file or
  /// the `}` closing a function body
  end: Token,

  /// The current token
  position: usize,
}
impl<'source, 'tokens> Parser<'source, 'tokens> {
  pub fn new(source: &'source str, tokens: &'tokens [Token]) -> Self {
    match tokens.split_last() {
      Some((end, rest)) if end.kind == TokenKind::EndOfFile => Self::with_end(source, rest, *end),
      _ => {
        let end = Token {
          kind: TokenKind::EndOfFile,
          line: 1,
          column: 1,
          ..Token::default()
        };
        Self::with_end(source, tokens, end)
      }
    }
  }

  fn with_end(source: &'source str, tokens: &'tokens [Token], end: Token) -> Self {
    Self {
      source,
      tokens,
      end,
      position: 0,
    }
  }

  pub fn parse(self) -> (Vec<Statement<'source>>, Option<ParseError>) {
    let (statements, halt) = self.parse_statements();

    match halt {
      Some(Halt::Error(error)) => (statements, Some(error)),
      Some(Halt::UnknownCharacter) | None => (statements, None),
    }
  }

  fn parse_statements(mut self) -> (Vec<Statement<'source>>, Option<Halt>) {
    let mut statements = Vec::new();

    while self.position < self.tokens.len() {
      let result = match (self.kind(0), self.kind(1), self.kind(2)) {
        (TokenKind::Say, _, _) => self.say(),
        (TokenKind::Keep, _, _) => self.keep(),
        (TokenKind::When, _, _) => self.when(),
        (TokenKind::Identifier, TokenKind::Dot, TokenKind::Map) => self.map_statement(),
        (TokenKind::Do, _, _) => self.function_declaration(),
        (TokenKind::Return, _, _) => self.return_statement(),
        (TokenKind::Identifier, TokenKind::LeftParen, _) => self.function_call(),
        (TokenKind::Identifier, TokenKind::Equal, _) => self.assignment(),
        (TokenKind::Identifier, _, _) => Err(ParseError::UnknownStatement(self.peek(0)).into()),
        _ => Err(ParseError::ExpectedStatement(self.peek(0)).into()),
      };

      match result {
        Ok(Parsed { node, consumed }) => {
          statements.push(node);
          self.position += consumed;
        }
        Err(halt) => return (statements, Some(halt)),
      }
    }

    (statements, None)
  }

  fn peek(&self, offset: usize) -> Token {
    self
      .tokens
      .get(self.position + offset)
      .copied()
      .unwrap_or(self.end)
  }

  fn kind(&self, offset: usize) -> TokenKind {
    self.peek(offset).kind
  }

  fn expect(
    &self,
    offset: usize,
    expected: TokenKind,
    context: &'static str,
  ) -> Result<Token, ParseError> {
    let token = self.peek(offset);

    if token.kind == expected {
      Ok(token)
    } else {
      Err(ParseError::Expected {
        expected,
        received: token,
        context,
      })
    }
  }

  fn identifier(&self, offset: usize, context: &'static str) -> Result<Identifier<'source>, ParseError> {
    let token = self.expect(offset, TokenKind::Identifier, context)?;

    Ok(Identifier {
      name: token.text(self.source),
      position: token.position(),
    })
  }

  fn operand(&self, offset: usize) -> Result<Operand<'source>, ParseError> {
    let token = self.peek(offset);
    let text = token.text(self.source);

    let (kind, text) = match token.kind {
      TokenKind::String => (OperandKind::String, &text[1..text.len() - 1]),
      TokenKind::Number => (OperandKind::Number, text),
      TokenKind::True | TokenKind::False => (OperandKind::Boolean, text),
      TokenKind::Identifier => (OperandKind::Identifier, text),
      _ => return Err(ParseError::ExpectedValue(token)),
    };

    Ok(Operand {
      kind,
      text,
      position: token.position(),
    })
  }

  fn literal(&self, offset: usize) -> Result<Operand<'source>, ParseError> {
    if self.kind(offset).is_literal() {
      self.operand(offset)
    } else {
      Err(ParseError::InvalidArrayElement(self.peek(offset)))
    }
  }

  fn number(&self, offset: usize, context: &'static str) -> Result<Operand<'source>, ParseError> {
    self.expect(offset, TokenKind::Number, context)?;
    self.operand(offset)
  }

  fn binary_operator(&self, offset: usize) -> Result<BinaryOperator, ParseError> {
    BinaryOperator::from_token(self.kind(offset))
      .ok_or_else(|| ParseError::ExpectedOperator(self.peek(offset)))
  }

  fn say(&self) -> ParseResult<Statement<'source>> {
    let position = self.peek(0).position();
    self.expect(1, TokenKind::LeftParen, "after `say`")?;

    if self.kind(2) == TokenKind::Identifier && self.kind(3) == TokenKind::LeftSquare {
      let access = self.index_access(2)?;
      self.expect(6, TokenKind::RightParen, "to close `say`")?;
      self.expect(7, TokenKind::Semicolon, "after `say` statement")?;

      let statement = Statement::SayIndexed(SayIndexed { access, position });
      return Ok(Parsed::new(statement, 8));
    }

    let left = self.operand(2)?;
    let (value, next) = if self.kind(3).is_binary_operator() {
      let operator = self.binary_operator(3)?;
      let right = self.operand(4)?;
      (Expression::Binary(Binary { left, operator, right }), 5)
    } else {
      (Expression::Operand(left), 3)
    };

    self.expect(next, TokenKind::RightParen, "to close `say`")?;
    self.expect(next + 1, TokenKind::Semicolon, "after `say` statement")?;

    Ok(Parsed::new(Statement::Say(Say { value, position }), next + 2))
  }

  fn keep(&self) -> ParseResult<Statement<'source>> {
    let position = self.peek(0).position();
    let name = self.identifier(1, "for the variable name after `keep`")?;
    self.expect(2, TokenKind::Equal, "after the variable name")?;

    let Parsed { node, consumed } = self.initializer(3)?;
    let end = 3 + consumed;
    self.expect(end, TokenKind::Semicolon, "after `keep` statement")?;

    let statement = Statement::Keep(Keep {
      name,
      initializer: node,
      position,
    });
    Ok(Parsed::new(statement, end + 1))
  }

  fn assignment(&self) -> ParseResult<Statement<'source>> {
    let name = self.identifier(0, "for the variable name")?;
    self.expect(1, TokenKind::Equal, "after the variable name")?;

    let Parsed { node, consumed } = self.initializer(2)?;
    let end = 2 + consumed;
    self.expect(end, TokenKind::Semicolon, "after assignment")?;

    let statement = Statement::Assign(Assign {
      name,
      initializer: node,
    });
    Ok(Parsed::new(statement, end + 1))
  }

  fn initializer(&self, start: usize) -> ParseResult<Initializer<'source>> {
    match (self.kind(start), self.kind(start + 1)) {
      (TokenKind::LeftSquare, _) => {
        let Parsed { node, consumed } = self.array_literal(start)?;
        Ok(Parsed::new(Initializer::Array(node), consumed))
      }
      (TokenKind::Identifier, TokenKind::Dot) => {
        let Parsed { node, consumed } = self.map_expression(start)?;
        Ok(Parsed::new(Initializer::Map(node), consumed))
      }
      (TokenKind::Identifier, TokenKind::LeftSquare) => {
        let access = self.index_access(start)?;
        Ok(Parsed::new(Initializer::Index(access), 4))
      }
      (TokenKind::Identifier, TokenKind::LeftParen) => {
        let Parsed { node, consumed } = self.call(start)?;
        Ok(Parsed::new(Initializer::Call(node), consumed))
      }
      (left, operator) if left.is_value() && operator.is_binary_operator() => {
        let left = self.operand(start)?;
        let operator = self.binary_operator(start + 1)?;
        let right = self.operand(start + 2)?;

        Ok(Parsed::new(Initializer::Binary(Binary { left, operator, right }), 3))
      }
      _ => Ok(Parsed::new(Initializer::Value(self.operand(start)?), 1)),
    }
  }

  fn array_literal(&self, start: usize) -> ParseResult<ArrayLiteral<'source>> {
    let position = self.peek(start).position();
    let mut elements = ThinVec::new();
    let mut offset = start + 1;

    if self.kind(offset) != TokenKind::RightSquare {
      loop {
        elements.push(self.literal(offset)?);
        offset += 1;

        match self.kind(offset) {
          TokenKind::Comma => offset += 1,
          TokenKind::RightSquare => break,
          _ => {
            return Err(
              ParseError::ExpectedSeparator {
                closing: TokenKind::RightSquare,
                received: self.peek(offset),
              }
              .into(),
            );
          }
        }
      }
    }

    let array = ArrayLiteral { elements, position };
    Ok(Parsed::new(array, offset + 1 - start))
  }

  fn map_expression(&self, start: usize) -> ParseResult<MapExpression<'source>> {
    let array = self.identifier(start, "for the array to map over")?;
    self.expect(start + 1, TokenKind::Dot, "after the array name")?;
    self.expect(start + 2, TokenKind::Map, "after `.`")?;
    self.expect(start + 3, TokenKind::LeftParen, "after `map`")?;
    let operator = self.binary_operator(start + 4)?;
    let operand = self.number(start + 5, "after the operator in `map`")?;
    self.expect(start + 6, TokenKind::RightParen, "to close `map`")?;

    let map = MapExpression {
      array,
      operator,
      operand,
    };
    Ok(Parsed::new(map, 7))
  }

  fn index_access(&self, start: usize) -> Result<IndexAccess<'source>, ParseError> {
    let array = self.identifier(start, "for the array name")?;
    self.expect(start + 1, TokenKind::LeftSquare, "after the array name")?;
    let index = self.number(start + 2, "for the index")?;
    self.expect(start + 3, TokenKind::RightSquare, "after the index")?;

    Ok(IndexAccess { array, index })
  }

  fn call(&self, start: usize) -> ParseResult<Call<'source>> {
    let function = self.identifier(start, "for the function name")?;
    self.expect(start + 1, TokenKind::LeftParen, "after the function name")?;

    let mut arguments = ThinVec::new();
    let mut offset = start + 2;

    if self.kind(offset) != TokenKind::RightParen {
      loop {
        if !self.kind(offset).is_value() {
          return Err(ParseError::InvalidArgument(self.peek(offset)).into());
        }
        arguments.push(self.operand(offset)?);
        offset += 1;

        match self.kind(offset) {
          TokenKind::Comma => offset += 1,
          TokenKind::RightParen => break,
          _ => {
            return Err(
              ParseError::ExpectedSeparator {
                closing: TokenKind::RightParen,
                received: self.peek(offset),
              }
              .into(),
            );
          }
        }
      }
    }

    let call = Call {
      function,
      arguments,
    };
    Ok(Parsed::new(call, offset + 1 - start))
  }

  fn when(&self) -> ParseResult<Statement<'source>> {
    let position = self.peek(0).position();
    self.expect(1, TokenKind::LeftParen, "after `when`")?;

    let (condition, next) = match (self.kind(2), self.kind(3)) {
      (TokenKind::Identifier, operator) if operator.is_comparison_operator() => {
        let left = self.identifier(2, "for the variable to compare")?;
        let operator = ComparisonOperator::from_token(operator)
          .ok_or_else(|| ParseError::ExpectedCondition(self.peek(3)))?;
        let right = self.operand(4)?;

        (Condition::Comparison { left, operator, right }, 5)
      }
      (TokenKind::Identifier | TokenKind::True | TokenKind::False, _) => {
        (Condition::Truthy(self.operand(2)?), 3)
      }
      _ => return Err(ParseError::ExpectedCondition(self.peek(2)).into()),
    };
    self.expect(next, TokenKind::RightParen, "after the condition")?;

    let Parsed { node: then_branch, consumed } = self.branch(next + 1)?;
    let mut end = next + 1 + consumed;

    let else_branch = if self.kind(end) == TokenKind::Else {
      let Parsed { node, consumed } = self.branch(end + 1)?;
      end += 1 + consumed;
      Some(node)
    } else {
      None
    };

    let statement = Statement::When(When {
      condition,
      then_branch,
      else_branch,
      position,
    });
    Ok(Parsed::new(statement, end))
  }

  fn branch(&self, start: usize) -> ParseResult<Action<'source>> {
    self.expect(start, TokenKind::LeftCurly, "to start the block")?;

    let action = match self.kind(start + 1) {
      TokenKind::Say => {
        self.expect(start + 2, TokenKind::LeftParen, "after `say`")?;
        let value = self.operand(start + 3)?;
        self.expect(start + 4, TokenKind::RightParen, "to close `say`")?;
        Action::Say(value)
      }
      TokenKind::Keep => {
        let name = self.identifier(start + 2, "for the variable name after `keep`")?;
        self.expect(start + 3, TokenKind::Equal, "after the variable name")?;
        let value = self.operand(start + 4)?;
        Action::Keep { name, value }
      }
      _ => return Err(ParseError::ExpectedAction(self.peek(start + 1)).into()),
    };

    self.expect(start + 5, TokenKind::Semicolon, "after the statement")?;
    self.expect(start + 6, TokenKind::RightCurly, "to close the block")?;

    Ok(Parsed::new(action, 7))
  }

  fn map_statement(&self) -> ParseResult<Statement<'source>> {
    let Parsed { node, consumed } = self.map_expression(0)?;
    self.expect(consumed, TokenKind::Semicolon, "after `map`")?;

    let statement = Statement::Map(MapStatement { expression: node });
    Ok(Parsed::new(statement, consumed + 1))
  }

  fn function_declaration(&self) -> ParseResult<Statement<'source>> {
    let position = self.peek(0).position();
    let name = self.identifier(1, "for the function name after `do`")?;
    self.expect(2, TokenKind::LeftParen, "after the function name")?;

    let mut parameters = ThinVec::new();
    let mut offset = 3;

    if self.kind(offset) != TokenKind::RightParen {
      loop {
        parameters.push(self.identifier(offset, "for the parameter name")?);
        offset += 1;

        match self.kind(offset) {
          TokenKind::Comma => offset += 1,
          TokenKind::RightParen => break,
          _ => {
            return Err(
              ParseError::ExpectedSeparator {
                closing: TokenKind::RightParen,
                received: self.peek(offset),
              }
              .into(),
            );
          }
        }
      }
    }

    let open = self.expect(offset + 1, TokenKind::LeftCurly, "to start the function body")?;
    let body_start = offset + 2;

    let mut body_end = body_start;
    let mut depth = 1;
    loop {
      if self.position + body_end >= self.tokens.len() {
        return Err(ParseError::UnmatchedBrace(open).into());
      }

      match self.kind(body_end) {
        TokenKind::LeftCurly => depth += 1,
        TokenKind::RightCurly if depth == 1 => break,
        TokenKind::RightCurly => depth -= 1,
        _ => {}
      }
      body_end += 1;
    }

    let close = self.peek(body_end);
    let body_tokens = &self.tokens[self.position + body_start..self.position + body_end];

    let (body, halt) = Parser::with_end(self.source, body_tokens, close).parse_statements();
    if let Some(halt) = halt {
      return Err(halt);
    }

    let statement = Statement::FunctionDecl(FunctionDecl {
      name,
      parameters,
      body,
      position,
    });
    Ok(Parsed::new(statement, body_end + 1))
  }

  fn function_call(&self) -> ParseResult<Statement<'source>> {
    let Parsed { node, consumed } = self.call(0)?;
    self.expect(consumed, TokenKind::Semicolon, "after function call")?;

    let statement = Statement::FunctionCall(FunctionCall { call: node });
    Ok(Parsed::new(statement, consumed + 1))
  }

  fn return_statement(&self) -> ParseResult<Statement<'source>> {
    let position = self.peek(0).position();

    let (value, next) = match (self.kind(1), self.kind(2)) {
      (TokenKind::Semicolon, _) => (None, 1),
      (left, operator) if left.is_value() && operator.is_binary_operator() => {
        let left = self.operand(1)?;
        let operator = self.binary_operator(2)?;
        let right = self.operand(3)?;
        (Some(Expression::Binary(Binary { left, operator, right })), 4)
      }
      _ => (Some(Expression::Operand(self.operand(1)?)), 2),
    };
    self.expect(next, TokenKind::Semicolon, "after `return` statement")?;

    let statement = Statement::Return(Return { value, position });
    Ok(Parsed::new(statement, next + 1))
  }
}

/// An error found whilst tokenising or parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  /// An unknown character
  UnknownCharacter(Token),
  /// A string without a closing quote
  UnterminatedString(Token),

  /// Expected a token of a certain kind
  Expected {
    /// Expected Token Kind to be
    expected: TokenKind,
    /// Received this Token instead
    received: Token,
    /// Where the token was expected
    context: &'static str,
  },
  /// Expected a comma or the end of a list
  ExpectedSeparator {
    /// The token which closes the list
    closing: TokenKind,
    /// Received this Token instead
    received: Token,
  },
  /// Expected a value, a literal or a variable
  ExpectedValue(Token),
  /// Expected an arithmetic operator
  ExpectedOperator(Token),
  /// Expected a condition in a `when` statement
  ExpectedCondition(Token),
  /// Expected a `say` or `keep` in a `when` block
  ExpectedAction(Token),
  /// Expected the start of a statement
  ExpectedStatement(Token),
  /// An identifier at the start of a statement which isn't a call or an assignment
  UnknownStatement(Token),
  /// Array literals can only contain literals
  InvalidArrayElement(Token),
  /// Function arguments can only be literals or variables
  InvalidArgument(Token),
  /// A function body which is never closed
  UnmatchedBrace(Token),
}
impl ParseError {
  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> String {
    match self {
      Self::UnknownCharacter(_) => "Unknown Character".into(),
      Self::UnterminatedString(_) => "Unterminated String".into(),
      Self::Expected { expected, .. } => format!("Expected {expected}"),
      Self::ExpectedSeparator { closing, .. } => format!("Expected , or {closing}"),
      Self::ExpectedValue(_) => "Expected Value".into(),
      Self::ExpectedOperator(_) => "Expected Operator".into(),
      Self::ExpectedCondition(_) => "Expected Condition".into(),
      Self::ExpectedAction(_) => "Expected Action".into(),
      Self::ExpectedStatement(_) => "Expected Statement".into(),
      Self::UnknownStatement(_) => "Unknown Statement".into(),
      Self::InvalidArrayElement(_) => "Invalid Array Element".into(),
      Self::InvalidArgument(_) => "Invalid Argument".into(),
      Self::UnmatchedBrace(_) => "Unmatched Brace".into(),
    }
  }

  /// The body of the error message describing what has gone wrong
  #[must_use]
  pub fn message(&self) -> String {
    match self {
      Self::UnknownCharacter(_) => "got unknown character".into(),
      Self::UnterminatedString(_) => "missing closing quote for string".into(),
      Self::Expected {
        expected,
        received,
        context,
      } => format!(
        "expected {} {context} but got {}",
        expected.description(),
        received.kind.description()
      ),
      Self::ExpectedSeparator { closing, received } => format!(
        "expected `,` or `{closing}` but got {}",
        received.kind.description()
      ),
      Self::ExpectedValue(t) => {
        format!("expected a string, number, boolean or variable but got {}", t.kind.description())
      }
      Self::ExpectedOperator(t) => {
        format!("expected an operator (+, -, *, /) but got {}", t.kind.description())
      }
      Self::ExpectedCondition(t) => {
        format!("expected a boolean, variable or comparison but got {}", t.kind.description())
      }
      Self::ExpectedAction(t) => {
        format!("expected a `say` or `keep` statement but got {}", t.kind.description())
      }
      Self::ExpectedStatement(t) => {
        format!("expected the start of a statement but got {}", t.kind.description())
      }
      Self::UnknownStatement(_) => "an identifier on its own is not a statement".into(),
      Self::InvalidArrayElement(t) => {
        format!("array elements must be literals, but got {}", t.kind.description())
      }
      Self::InvalidArgument(t) => {
        format!("arguments must be literals or variables, but got {}", t.kind.description())
      }
      Self::UnmatchedBrace(_) => "function body is missing a closing `}`".into(),
    }
  }

  /// A suggestion for how to fix the error
  #[must_use]
  pub fn suggestion(&self) -> Option<String> {
    match self {
      Self::UnknownStatement(_) => Some(
        "did you mean to call it as a function `name(...);` or assign a value `name = ...;`?"
          .to_owned(),
      ),
      Self::ExpectedAction(_) => {
        Some("a `when` block holds a single `say` or `keep` statement".to_owned())
      }
      _ => None,
    }
  }

  /// The token which caused the error
  #[must_use]
  pub fn token(&self) -> Token {
    match self {
      Self::Expected { received, .. } | Self::ExpectedSeparator { received, .. } => *received,
      Self::UnknownCharacter(token)
      | Self::UnterminatedString(token)
      | Self::ExpectedValue(token)
      | Self::ExpectedOperator(token)
      | Self::ExpectedCondition(token)
      | Self::ExpectedAction(token)
      | Self::ExpectedStatement(token)
      | Self::UnknownStatement(token)
      | Self::InvalidArrayElement(token)
      | Self::InvalidArgument(token)
      | Self::UnmatchedBrace(token) => *token,
    }
  }

  /// The line and column of the error
  pub fn position(&self) -> Position {
    self.token().position()
  }

  /// Was the error found whilst tokenising, rather than parsing?
  #[must_use]
  pub fn is_lexical(&self) -> bool {
    matches!(self, Self::UnknownCharacter(_) | Self::UnterminatedString(_))
  }

  /// Does the error stop the source being parsed at all?
  #[must_use]
  pub fn is_fatal(&self) -> bool {
    matches!(self, Self::UnterminatedString(_))
  }
}
impl fmt::Display for ParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.title(), self.message())
  }
}
impl error::Error for ParseError {}
