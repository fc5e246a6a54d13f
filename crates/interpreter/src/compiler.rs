use crate::{
  Config,
  bytecode::{
    Action, BinaryOperation, Chunk, Comparison, Expression, Function, Instruction, Operand, Target,
  },
  collections::String,
  value::Value,
};
use jech_syntax::{
  AST, Position,
  ast::{self, Initializer, OperandKind, Statement, statement},
};
use std::{error, fmt, rc::Rc};

/// The most parameters a function can have, and the most arguments it can be called with
pub const MAX_PARAMETERS: usize = 8;

/// The result of compiling an AST
#[derive(Debug)]
pub struct Compilation {
  /// The compiled program
  pub chunk: Chunk,
  /// Errors found whilst compiling, the nodes with errors are not in the chunk
  pub errors: Vec<CompileError>,
}
impl Compilation {
  /// Was the AST compiled without errors?
  #[must_use]
  pub fn is_valid(&self) -> bool {
    self.errors.is_empty()
  }
}

/// Compiles statements into a [Chunk] of bytecode
///
/// Each root statement is compiled into a pending list of instructions first, and only
/// added to the chunk if it compiled and fits under the instruction limit. So a chunk
/// never contains part of a statement.
pub struct Compiler<'config> {
  chunk: Chunk,
  pending: Vec<(Instruction, Position)>,
  errors: Vec<CompileError>,
  config: &'config Config,
  in_function: bool,
}
impl<'config> Compiler<'config> {
  fn new(name: &str, config: &'config Config, in_function: bool) -> Self {
    Self {
      chunk: Chunk::new(name),
      pending: Vec::new(),
      errors: Vec::new(),
      config,
      in_function,
    }
  }

  /// Compile statements into the chunk, stopping when the instruction limit is reached
  fn compile_statements(&mut self, statements: &[Statement]) {
    for statement in statements {
      self.pending.clear();

      if let Err(error) = statement.compile(self) {
        self.errors.push(error);
        continue;
      }

      if self.chunk.len() + self.pending.len() > self.config.instruction_limit {
        self.errors.push(CompileError::TooManyInstructions {
          limit: self.config.instruction_limit,
          position: statement.position(),
        });
        break;
      }

      for (instruction, position) in self.pending.drain(..) {
        self.chunk.add(instruction, position);
      }
    }
  }

  fn finish(mut self) -> (Chunk, Vec<CompileError>) {
    let position = match self.chunk.len() {
      0 => Position::default(),
      length => self.chunk.position(length - 1),
    };
    self.chunk.add(Instruction::End, position);

    (self.chunk, self.errors)
  }

  fn emit(&mut self, instruction: Instruction, position: Position) {
    self.pending.push((instruction, position));
  }
}

/// Compile an AST into a bytecode chunk, collecting any errors found
pub(crate) fn compile(ast: &AST, config: &Config) -> Compilation {
  let mut compiler = Compiler::new("main", config, false);
  compiler.compile_statements(&ast.root_statements);
  let (chunk, errors) = compiler.finish();

  Compilation { chunk, errors }
}

trait Compile {
  fn compile(&self, compiler: &mut Compiler) -> Result<(), CompileError>;
}

impl Compile for Statement<'_> {
  fn compile(&self, compiler: &mut Compiler) -> Result<(), CompileError> {
    match self {
      Self::Say(say) => say.compile(compiler),
      Self::SayIndexed(say) => say.compile(compiler),
      Self::Keep(keep) => {
        let target = Target::Keep(keep.name.name.into());
        compile_initializer(compiler, target, &keep.initializer, keep.position)
      }
      Self::Assign(assign) => {
        let target = Target::Assign(assign.name.name.into());
        compile_initializer(compiler, target, &assign.initializer, assign.name.position)
      }
      Self::When(when) => when.compile(compiler),
      Self::Map(map) => {
        let target = Target::Assign(map.expression.array.name.into());
        compile_map(compiler, target, &map.expression)
      }
      Self::FunctionDecl(function) => function.compile(compiler),
      Self::FunctionCall(call) => compile_call(compiler, &call.call, None),
      Self::Return(return_) => return_.compile(compiler),
    }
  }
}

impl Compile for statement::Say<'_> {
  fn compile(&self, compiler: &mut Compiler) -> Result<(), CompileError> {
    let value = expression(&self.value)?;
    compiler.emit(Instruction::Say(value), self.position);
    Ok(())
  }
}

impl Compile for statement::SayIndexed<'_> {
  fn compile(&self, compiler: &mut Compiler) -> Result<(), CompileError> {
    let instruction = Instruction::SayIndexed {
      array: self.access.array.name.into(),
      index: index(&self.access.index)?,
    };
    compiler.emit(instruction, self.position);
    Ok(())
  }
}

impl Compile for statement::When<'_> {
  fn compile(&self, compiler: &mut Compiler) -> Result<(), CompileError> {
    let then_branch = action(&self.then_branch)?;
    let else_branch = self.else_branch.as_ref().map(action).transpose()?;

    let instruction = match &self.condition {
      ast::Condition::Truthy(condition) => Instruction::WhenBoolean {
        condition: operand(condition)?,
        then_branch,
        else_branch,
      },
      ast::Condition::Comparison {
        left,
        operator,
        right,
      } => Instruction::When {
        comparison: Comparison {
          left: left.name.into(),
          operator: *operator,
          right: operand(right)?,
        },
        then_branch,
        else_branch,
      },
    };

    compiler.emit(instruction, self.position);
    Ok(())
  }
}

impl Compile for statement::FunctionDecl<'_> {
  fn compile(&self, compiler: &mut Compiler) -> Result<(), CompileError> {
    if self.parameters.len() > MAX_PARAMETERS {
      return Err(CompileError::TooManyParameters {
        function: self.name.name.into(),
        position: self.name.position,
      });
    }

    let mut function_compiler = Compiler::new(self.name.name, compiler.config, true);
    function_compiler.compile_statements(&self.body);
    let (body, errors) = function_compiler.finish();
    compiler.errors.extend(errors);

    let function = Function {
      name: self.name.name.into(),
      parameters: self.parameters.iter().map(|p| p.name.into()).collect(),
      body,
    };
    compiler.emit(Instruction::FunctionDecl(Rc::new(function)), self.position);
    Ok(())
  }
}

impl Compile for statement::Return<'_> {
  fn compile(&self, compiler: &mut Compiler) -> Result<(), CompileError> {
    if !compiler.in_function {
      return Err(CompileError::ReturnOutsideFunction(self.position));
    }

    let value = self.value.as_ref().map(expression).transpose()?;
    compiler.emit(Instruction::Return(value), self.position);
    Ok(())
  }
}

fn compile_initializer(
  compiler: &mut Compiler,
  target: Target,
  initializer: &Initializer,
  position: Position,
) -> Result<(), CompileError> {
  match initializer {
    Initializer::Value(value) => {
      let value = operand(value)?;
      let instruction = match target {
        Target::Keep(name) => Instruction::Keep { name, value },
        Target::Assign(name) => Instruction::Assign { name, value },
      };
      compiler.emit(instruction, position);
    }
    Initializer::Array(array) => {
      let name: String = target.name().into();
      let elements = array
        .elements
        .iter()
        .map(literal)
        .collect::<Result<Vec<_>, _>>()?;

      compiler.emit(Instruction::ArrayNew(target), position);
      for (element, value) in array.elements.iter().zip(elements) {
        let instruction = Instruction::ArrayPush {
          array: name.clone(),
          value,
        };
        compiler.emit(instruction, element.position);
      }
    }
    Initializer::Map(map) => compile_map(compiler, target, map)?,
    Initializer::Binary(binary) => {
      let instruction = Instruction::BinaryOp {
        target,
        operation: binary_operation(binary)?,
      };
      compiler.emit(instruction, position);
    }
    Initializer::Index(access) => {
      let instruction = Instruction::IndexGet {
        target,
        array: access.array.name.into(),
        index: index(&access.index)?,
      };
      compiler.emit(instruction, position);
    }
    Initializer::Call(call) => compile_call(compiler, call, Some(target))?,
  }

  Ok(())
}

fn compile_map(
  compiler: &mut Compiler,
  target: Target,
  map: &ast::MapExpression,
) -> Result<(), CompileError> {
  let Some(Value::Number(operand)) = Value::from_number_literal(map.operand.text) else {
    return Err(CompileError::InvalidNumber {
      text: map.operand.text.into(),
      position: map.operand.position,
    });
  };

  let instruction = Instruction::Map {
    target,
    source: map.array.name.into(),
    operator: map.operator,
    operand,
  };
  compiler.emit(instruction, map.array.position);
  Ok(())
}

fn compile_call(
  compiler: &mut Compiler,
  call: &ast::Call,
  target: Option<Target>,
) -> Result<(), CompileError> {
  if call.arguments.len() > MAX_PARAMETERS {
    return Err(CompileError::TooManyArguments {
      function: call.function.name.into(),
      position: call.function.position,
    });
  }

  let arguments = call
    .arguments
    .iter()
    .map(operand)
    .collect::<Result<Vec<_>, _>>()?;

  let instruction = Instruction::FunctionCall {
    function: call.function.name.into(),
    arguments,
    target,
  };
  compiler.emit(instruction, call.function.position);
  Ok(())
}

fn operand(operand: &ast::Operand) -> Result<Operand, CompileError> {
  match operand.kind {
    OperandKind::Identifier => Ok(Operand::Variable(operand.text.into())),
    _ => literal(operand).map(Operand::Literal),
  }
}

fn literal(operand: &ast::Operand) -> Result<Value, CompileError> {
  match operand.kind {
    OperandKind::String => Ok(Value::from(operand.text)),
    OperandKind::Boolean => Ok(Value::from(operand.text == "true")),
    OperandKind::Number => {
      Value::from_number_literal(operand.text).ok_or_else(|| CompileError::InvalidNumber {
        text: operand.text.into(),
        position: operand.position,
      })
    }
    OperandKind::Identifier => Err(CompileError::InvalidNumber {
      text: operand.text.into(),
      position: operand.position,
    }),
  }
}

fn index(operand: &ast::Operand) -> Result<usize, CompileError> {
  operand
    .text
    .parse()
    .map_err(|_| CompileError::InvalidIndex {
      text: operand.text.into(),
      position: operand.position,
    })
}

fn binary_operation(binary: &ast::Binary) -> Result<BinaryOperation, CompileError> {
  Ok(BinaryOperation {
    left: operand(&binary.left)?,
    operator: binary.operator,
    right: operand(&binary.right)?,
  })
}

fn expression(expression: &ast::Expression) -> Result<Expression, CompileError> {
  match expression {
    ast::Expression::Operand(value) => operand(value).map(Expression::Operand),
    ast::Expression::Binary(binary) => binary_operation(binary).map(Expression::Binary),
  }
}

fn action(action: &ast::Action) -> Result<Action, CompileError> {
  match action {
    ast::Action::Say(value) => Ok(Action::Say(operand(value)?)),
    ast::Action::Keep { name, value } => Ok(Action::Keep {
      name: name.name.into(),
      value: operand(value)?,
    }),
  }
}

/// An error whilst compiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
  /// Too many instructions for a chunk
  TooManyInstructions {
    /// The maximum number of instructions
    limit: usize,
    /// The statement which didn't fit
    position: Position,
  },
  /// Function has too many parameters
  TooManyParameters {
    /// The function name
    function: String,
    /// Where the function is declared
    position: Position,
  },
  /// Function is called with too many arguments
  TooManyArguments {
    /// The function name
    function: String,
    /// Where the function is called
    position: Position,
  },
  /// A return statement which is not in a function
  ReturnOutsideFunction(Position),
  /// An array index which is not a whole number
  InvalidIndex {
    /// The text of the index
    text: String,
    /// Where the index is
    position: Position,
  },
  /// A number which can't be represented
  InvalidNumber {
    /// The text of the number
    text: String,
    /// Where the number is
    position: Position,
  },
}
impl CompileError {
  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> &'static str {
    match self {
      Self::TooManyInstructions { .. } => "Too Many Instructions",
      Self::TooManyParameters { .. } => "Too Many Parameters",
      Self::TooManyArguments { .. } => "Too Many Arguments",
      Self::ReturnOutsideFunction(_) => "Return Outside of Function",
      Self::InvalidIndex { .. } => "Invalid Index",
      Self::InvalidNumber { .. } => "Invalid Number",
    }
  }

  /// The body of the error message describing what has gone wrong
  #[must_use]
  pub fn message(&self) -> std::string::String {
    match self {
      Self::TooManyInstructions { limit, .. } => {
        format!("the program needs more than {limit} instructions, statements from here are not run")
      }
      Self::TooManyParameters { function, .. } => {
        format!("function `{function}` has more than {MAX_PARAMETERS} parameters")
      }
      Self::TooManyArguments { function, .. } => {
        format!("function `{function}` is called with more than {MAX_PARAMETERS} arguments")
      }
      Self::ReturnOutsideFunction(_) => "can only return a value from a function".into(),
      Self::InvalidIndex { text, .. } => {
        format!("array index `{text}` must be a whole number, starting from 0")
      }
      Self::InvalidNumber { text, .. } => format!("`{text}` can't be represented as a number"),
    }
  }

  /// The location of the error
  pub fn position(&self) -> Position {
    match self {
      Self::TooManyInstructions { position, .. }
      | Self::TooManyParameters { position, .. }
      | Self::TooManyArguments { position, .. }
      | Self::ReturnOutsideFunction(position)
      | Self::InvalidIndex { position, .. }
      | Self::InvalidNumber { position, .. } => *position,
    }
  }
}
impl fmt::Display for CompileError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.title(), self.message())
  }
}
impl error::Error for CompileError {}
