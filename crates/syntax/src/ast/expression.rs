//! # Expressions
//!
//! The pieces of statements which produce values

use crate::{span::Position, tokeniser::TokenKind};
use std::fmt;
use thin_vec::ThinVec;

/// The type of an [`Operand`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandKind {
  /// A string literal, e.g. `"hello"`
  String,
  /// A number literal, e.g. `42` or `2.5`
  Number,
  /// A boolean literal, `true` or `false`
  Boolean,
  /// A variable name, e.g. `x`
  Identifier,
}

/// A literal value or variable name
///
/// For strings the text is the content between the quotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operand<'source> {
  /// What type of operand it is
  pub kind: OperandKind,
  /// The source text of the operand
  pub text: &'source str,
  /// Where the operand is in the source
  pub position: Position,
}

/// A name of a variable, array or function
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Identifier<'source> {
  /// The name
  pub name: &'source str,
  /// Where the name is in the source
  pub position: Position,
}

/// An arithmetic operator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
  /// Addition (`+`)
  Add,
  /// Subtraction (`-`)
  Subtract,
  /// Multiplication (`*`)
  Multiply,
  /// Division (`/`)
  Divide,
}
impl BinaryOperator {
  pub(crate) fn from_token(kind: TokenKind) -> Option<Self> {
    match kind {
      TokenKind::Plus => Some(Self::Add),
      TokenKind::Minus => Some(Self::Subtract),
      TokenKind::Star => Some(Self::Multiply),
      TokenKind::Slash => Some(Self::Divide),
      _ => None,
    }
  }
}
impl fmt::Display for BinaryOperator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Add => write!(f, "+"),
      Self::Subtract => write!(f, "-"),
      Self::Multiply => write!(f, "*"),
      Self::Divide => write!(f, "/"),
    }
  }
}

/// A comparison operator, used in `when` conditions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonOperator {
  /// Greater Than (`>`)
  Greater,
  /// Less Than (`<`)
  Less,
  /// Equal (`==`)
  Equal,
}
impl ComparisonOperator {
  pub(crate) fn from_token(kind: TokenKind) -> Option<Self> {
    match kind {
      TokenKind::Greater => Some(Self::Greater),
      TokenKind::Less => Some(Self::Less),
      TokenKind::EqualEqual => Some(Self::Equal),
      _ => None,
    }
  }
}
impl fmt::Display for ComparisonOperator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Greater => write!(f, ">"),
      Self::Less => write!(f, "<"),
      Self::Equal => write!(f, "=="),
    }
  }
}

/// A binary operation on two values, e.g. `a + 1`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Binary<'source> {
  /// The left side of the operator
  pub left: Operand<'source>,
  /// The operator
  pub operator: BinaryOperator,
  /// The right side of the operator
  pub right: Operand<'source>,
}

/// A value which is printed or returned, either a single operand or a binary operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expression<'source> {
  /// A single value
  Operand(Operand<'source>),
  /// A binary operation
  Binary(Binary<'source>),
}
impl Expression<'_> {
  /// Where the expression starts in the source
  pub fn position(&self) -> Position {
    match self {
      Self::Operand(operand) => operand.position,
      Self::Binary(binary) => binary.left.position,
    }
  }
}

/// An array literal, e.g. `[1, "two", true]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayLiteral<'source> {
  /// The elements, which are all literals
  pub elements: ThinVec<Operand<'source>>,
  /// Where the opening bracket is
  pub position: Position,
}

/// A map over an array, e.g. `numbers.map(* 2)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapExpression<'source> {
  /// The array being mapped over
  pub array: Identifier<'source>,
  /// The operator applied to each element
  pub operator: BinaryOperator,
  /// The number on the right hand side of the operator
  pub operand: Operand<'source>,
}

/// Reading an element of an array, e.g. `numbers[2]`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexAccess<'source> {
  /// The array being indexed
  pub array: Identifier<'source>,
  /// The index, a number literal
  pub index: Operand<'source>,
}

/// A function call, e.g. `greet("World")`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call<'source> {
  /// The function being called
  pub function: Identifier<'source>,
  /// The arguments passed to the function
  pub arguments: ThinVec<Operand<'source>>,
}

/// The right hand side of a `keep` or assignment
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Initializer<'source> {
  /// A single value, e.g. `keep x = 5;`
  Value(Operand<'source>),
  /// An array literal, e.g. `keep x = [1, 2];`
  Array(ArrayLiteral<'source>),
  /// A map over another array, e.g. `keep x = y.map(* 2);`
  Map(MapExpression<'source>),
  /// A binary operation, e.g. `keep x = y + 1;`
  Binary(Binary<'source>),
  /// An element of an array, e.g. `keep x = y[0];`
  Index(IndexAccess<'source>),
  /// The returned value of a function, e.g. `keep x = add(1, 2);`
  Call(Call<'source>),
}

/// The condition of a `when` statement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition<'source> {
  /// A single value which is checked for truthiness
  Truthy(Operand<'source>),
  /// A variable compared against a value
  Comparison {
    /// The variable being compared
    left: Identifier<'source>,
    /// How they are compared
    operator: ComparisonOperator,
    /// The value being compared against
    right: Operand<'source>,
  },
}

/// The single statement allowed within a branch of a `when` statement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action<'source> {
  /// Print a value, e.g. `say(x);`
  Say(Operand<'source>),
  /// Declare a variable, e.g. `keep x = 1;`
  Keep {
    /// The variable name
    name: Identifier<'source>,
    /// The value to store
    value: Operand<'source>,
  },
}
