//! # Statements

use super::expression::{
  Action, Call, Condition, Expression, Identifier, IndexAccess, Initializer, MapExpression,
};
use crate::span::Position;
use thin_vec::ThinVec;

/// A statement in the source code.
/// They don't produce a value, and are delimited by semicolons.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum Statement<'source> {
  /// Print a value, e.g. `say("Hello");`
  Say(Say<'source>),
  /// Print an element of an array, e.g. `say(numbers[0]);`
  SayIndexed(SayIndexed<'source>),
  /// Declare a variable or array, e.g. `keep x = 1;`
  Keep(Keep<'source>),
  /// Update a variable or array, e.g. `x = 2;`
  Assign(Assign<'source>),
  /// A conditional, e.g. `when (x > 5) { say(x); } else { say(0); }`
  When(When<'source>),
  /// Map an array in place, e.g. `numbers.map(+ 1);`
  Map(MapStatement<'source>),
  /// A function declaration, e.g. `do greet(name) { say(name); }`
  FunctionDecl(FunctionDecl<'source>),
  /// A function call on its own, e.g. `greet("World");`
  FunctionCall(FunctionCall<'source>),
  /// A return from a function, e.g. `return x + 1;`
  Return(Return<'source>),
}
impl Statement<'_> {
  /// The location of the start of the statement
  pub fn position(&self) -> Position {
    match self {
      Self::Say(say) => say.position,
      Self::SayIndexed(say) => say.position,
      Self::Keep(keep) => keep.position,
      Self::Assign(assign) => assign.name.position,
      Self::When(when) => when.position,
      Self::Map(map) => map.expression.array.position,
      Self::FunctionDecl(function) => function.position,
      Self::FunctionCall(call) => call.call.function.position,
      Self::Return(return_) => return_.position,
    }
  }
}

/// Print a value, e.g. `say("Hello");` or `say(x + 1);`
#[derive(Clone, Debug, PartialEq)]
pub struct Say<'source> {
  /// The value to print
  pub value: Expression<'source>,
  /// The location of the `say` keyword
  pub position: Position,
}

/// Print an element of an array, e.g. `say(numbers[0]);`
#[derive(Clone, Debug, PartialEq)]
pub struct SayIndexed<'source> {
  /// The array and index to print
  pub access: IndexAccess<'source>,
  /// The location of the `say` keyword
  pub position: Position,
}

/// Declare a variable or array, e.g. `keep x = 1;`
#[derive(Clone, Debug, PartialEq)]
pub struct Keep<'source> {
  /// The name being declared
  pub name: Identifier<'source>,
  /// The value to store
  pub initializer: Initializer<'source>,
  /// The location of the `keep` keyword
  pub position: Position,
}

/// Update a variable or array, e.g. `x = 2;`
#[derive(Clone, Debug, PartialEq)]
pub struct Assign<'source> {
  /// The name being assigned to
  pub name: Identifier<'source>,
  /// The value to store
  pub initializer: Initializer<'source>,
}

/// A conditional with a single action in each branch
#[derive(Clone, Debug, PartialEq)]
pub struct When<'source> {
  /// The condition to check
  pub condition: Condition<'source>,
  /// Run if the condition is true
  pub then_branch: Action<'source>,
  /// Run if the condition is false
  pub else_branch: Option<Action<'source>>,
  /// The location of the `when` keyword
  pub position: Position,
}

/// Map an array in place, e.g. `numbers.map(+ 1);`
#[derive(Clone, Debug, PartialEq)]
pub struct MapStatement<'source> {
  /// The map being applied
  pub expression: MapExpression<'source>,
}

/// A function declaration, e.g. `do add(a, b) { return a + b; }`
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl<'source> {
  /// The name of the function
  pub name: Identifier<'source>,
  /// The names of the parameters
  pub parameters: ThinVec<Identifier<'source>>,
  /// The statements in the function body
  pub body: Vec<Statement<'source>>,
  /// The location of the `do` keyword
  pub position: Position,
}

/// A function call as a statement, e.g. `greet("World");`
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall<'source> {
  /// The call
  pub call: Call<'source>,
}

/// A return from a function, e.g. `return;` or `return a + b;`
#[derive(Clone, Debug, PartialEq)]
pub struct Return<'source> {
  /// The value returned, if there is one
  pub value: Option<Expression<'source>>,
  /// The location of the `return` keyword
  pub position: Position,
}
