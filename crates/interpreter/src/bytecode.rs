use crate::{collections::String, value::Value};
use jech_syntax::{Position, ast::BinaryOperator, ast::ComparisonOperator};
use std::{fmt, rc::Rc};

/// A value used by an instruction, either known when compiling or looked up when run
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
  /// A literal value
  Literal(Value),
  /// The name of a variable
  Variable(String),
}
impl fmt::Display for Operand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Literal(Value::String(string)) => write!(f, "\"{string}\""),
      Self::Literal(value) => write!(f, "{value}"),
      Self::Variable(name) => write!(f, "{name}"),
    }
  }
}

/// An arithmetic operation on two operands
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryOperation {
  /// The left hand side
  pub left: Operand,
  /// The operator
  pub operator: BinaryOperator,
  /// The right hand side
  pub right: Operand,
}
impl fmt::Display for BinaryOperation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {} {}", self.left, self.operator, self.right)
  }
}

/// A value which is printed or returned
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
  /// A single operand
  Operand(Operand),
  /// A binary operation
  Binary(BinaryOperation),
}
impl fmt::Display for Expression {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Operand(operand) => write!(f, "{operand}"),
      Self::Binary(binary) => write!(f, "{binary}"),
    }
  }
}

/// Where the result of an instruction is stored
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
  /// Declare a new binding in the current scope
  Keep(String),
  /// Update the innermost existing binding
  Assign(String),
}
impl Target {
  /// The name of the variable being stored to
  #[must_use]
  pub fn name(&self) -> &str {
    match self {
      Self::Keep(name) | Self::Assign(name) => name,
    }
  }
}
impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Keep(name) => write!(f, "keep {name}"),
      Self::Assign(name) => write!(f, "{name}"),
    }
  }
}

/// A comparison between a variable and a value
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
  /// The variable being compared
  pub left: String,
  /// How they are compared
  pub operator: ComparisonOperator,
  /// The value it is compared against
  pub right: Operand,
}
impl fmt::Display for Comparison {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {} {}", self.left, self.operator, self.right)
  }
}

/// The single action run by a branch of a conditional
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
  /// Print a value
  Say(Operand),
  /// Declare a variable
  Keep {
    /// The variable name
    name: String,
    /// The value to store
    value: Operand,
  },
}
impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Say(value) => write!(f, "say {value}"),
      Self::Keep { name, value } => write!(f, "keep {name} = {value}"),
    }
  }
}

/// A compiled function
#[derive(Debug, PartialEq)]
pub struct Function {
  /// The name of the function
  pub name: String,
  /// The names of the parameters, in order
  pub parameters: Vec<String>,
  /// The compiled body of the function
  pub body: Chunk,
}
impl Function {
  /// The number of parameters the function takes
  #[must_use]
  pub fn arity(&self) -> usize {
    self.parameters.len()
  }
}
impl fmt::Display for Function {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}({})", self.name, self.parameters.join(", "))
  }
}

/// A single bytecode instruction
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
  /// Print a value
  Say(Expression),
  /// Print an element of an array
  SayIndexed {
    /// The array
    array: String,
    /// The index of the element
    index: usize,
  },
  /// Create an empty array
  ArrayNew(Target),
  /// Append a value to an array
  ArrayPush {
    /// The array
    array: String,
    /// The value to append
    value: Value,
  },
  /// Declare a variable
  Keep {
    /// The variable name
    name: String,
    /// The value to store
    value: Operand,
  },
  /// Update a variable
  Assign {
    /// The variable name
    name: String,
    /// The value to store
    value: Operand,
  },
  /// Read an element of an array into a variable
  IndexGet {
    /// Where to store the element
    target: Target,
    /// The array
    array: String,
    /// The index of the element
    index: usize,
  },
  /// Store the result of an arithmetic operation
  BinaryOp {
    /// Where to store the result
    target: Target,
    /// The operation
    operation: BinaryOperation,
  },
  /// Run an action depending on a comparison
  When {
    /// The condition
    comparison: Comparison,
    /// Run if the condition is true
    then_branch: Action,
    /// Run if the condition is false
    else_branch: Option<Action>,
  },
  /// Run an action depending on the truthiness of a value
  WhenBoolean {
    /// The condition
    condition: Operand,
    /// Run if the condition is true
    then_branch: Action,
    /// Run if the condition is false
    else_branch: Option<Action>,
  },
  /// Apply an operation to every element of an array
  Map {
    /// Where to store the new array
    target: Target,
    /// The array being mapped over
    source: String,
    /// The operator applied to each element
    operator: BinaryOperator,
    /// The right hand side of the operator
    operand: f64,
  },
  /// Define a function
  FunctionDecl(Rc<Function>),
  /// Call a function
  FunctionCall {
    /// The function name
    function: String,
    /// The arguments passed to the function
    arguments: Vec<Operand>,
    /// Where to store the returned value, if anywhere
    target: Option<Target>,
  },
  /// Return from the current function
  Return(Option<Expression>),
  /// Stop execution
  End,
}
impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Say(expression) => write!(f, "Say {expression}"),
      Self::SayIndexed { array, index } => write!(f, "SayIndexed {array}[{index}]"),
      Self::ArrayNew(target) => write!(f, "ArrayNew {target}"),
      Self::ArrayPush { array, value } => {
        write!(f, "ArrayPush {array} {}", Operand::Literal(value.clone()))
      }
      Self::Keep { name, value } => write!(f, "Keep {name} = {value}"),
      Self::Assign { name, value } => write!(f, "Assign {name} = {value}"),
      Self::IndexGet {
        target,
        array,
        index,
      } => write!(f, "IndexGet {target} = {array}[{index}]"),
      Self::BinaryOp { target, operation } => write!(f, "BinaryOp {target} = {operation}"),
      Self::When {
        comparison,
        then_branch,
        else_branch,
      } => {
        write!(f, "When {comparison} then {then_branch}")?;
        match else_branch {
          Some(else_branch) => write!(f, " else {else_branch}"),
          None => Ok(()),
        }
      }
      Self::WhenBoolean {
        condition,
        then_branch,
        else_branch,
      } => {
        write!(f, "WhenBoolean {condition} then {then_branch}")?;
        match else_branch {
          Some(else_branch) => write!(f, " else {else_branch}"),
          None => Ok(()),
        }
      }
      Self::Map {
        target,
        source,
        operator,
        operand,
      } => write!(f, "Map {target} = {source}.map({operator} {operand})"),
      Self::FunctionDecl(function) => write!(f, "FunctionDecl {function}"),
      Self::FunctionCall {
        function,
        arguments,
        target,
      } => {
        if let Some(target) = target {
          write!(f, "FunctionCall {target} = {function}(")?;
        } else {
          write!(f, "FunctionCall {function}(")?;
        }
        for (index, argument) in arguments.iter().enumerate() {
          if index > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{argument}")?;
        }
        write!(f, ")")
      }
      Self::Return(Some(expression)) => write!(f, "Return {expression}"),
      Self::Return(None) => write!(f, "Return"),
      Self::End => write!(f, "End"),
    }
  }
}

/// A chunk of bytecode, the main program or the body of a function
///
/// Each instruction has the position in the source it was compiled from.
/// A finished chunk always ends with a single [`Instruction::End`].
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
  /// The name of the chunk
  pub name: String,
  code: Vec<Instruction>,
  positions: Vec<Position>,
}
impl Chunk {
  pub(crate) fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      code: Vec::new(),
      positions: Vec::new(),
    }
  }

  pub(crate) fn add(&mut self, instruction: Instruction, position: Position) {
    self.code.push(instruction);
    self.positions.push(position);
  }

  /// The number of instructions in the chunk
  #[must_use]
  pub fn len(&self) -> usize {
    self.code.len()
  }

  /// Is the chunk empty?
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.code.is_empty()
  }

  /// Get an instruction
  #[must_use]
  pub fn get(&self, index: usize) -> Option<&Instruction> {
    self.code.get(index)
  }

  /// Get the source position of an instruction
  pub fn position(&self, index: usize) -> Position {
    self.positions.get(index).copied().unwrap_or_default()
  }

  /// The instructions in the chunk
  pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
    self.code.iter()
  }

  /// The chunks of the functions defined in this chunk
  pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
    self.code.iter().filter_map(|instruction| match instruction {
      Instruction::FunctionDecl(function) => Some(&function.body),
      _ => None,
    })
  }
}
impl fmt::Display for Chunk {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "      ╭─[Bytecode: {}]", self.name)?;

    for (position, instruction) in self.code.iter().enumerate() {
      writeln!(f, " {position:0>4} │ {instruction}")?;
    }

    write!(f, "──────╯")
  }
}
