use crate::{
  Config,
  bytecode::{
    Action, BinaryOperation, Chunk, Comparison, Expression, Function, Instruction, Operand, Target,
  },
  collections::String,
  context::{Context, Diagnostic},
  environment::{Environment, Scope},
  value::{DisplayArray, Value},
};
use jech_syntax::{
  Position,
  ast::{BinaryOperator, ComparisonOperator},
};
use std::{error, fmt, rc::Rc};

/// The state of the VM
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
  /// Executing instructions
  Running,
  /// Stopped, either by reaching the end or by an unrecoverable error
  Halted,
}

/// What to do after an instruction
enum Step {
  Continue,
  Return(Option<Value>),
}

/// A function call in progress
#[derive(Debug)]
struct Frame {
  function: Rc<Function>,
  ip: usize,
  scope: Scope,
  /// Where the return value is stored in the caller
  target: Option<Target>,
  call_position: Position,
}

/// A virtual machine to execute compiled bytecode
///
/// Instructions are run in order, conditions are checked against the environment at the
/// time they are reached. An error in an instruction is reported and the instruction has
/// no effect, then execution continues with the next instruction.
///
/// Function calls push a frame rather than recursing, so the call depth is bounded
/// only by the configured limit.
#[derive(Debug)]
pub struct VM {
  frames: Vec<Frame>,
  call_depth_limit: usize,
  state: State,
  errors: usize,
}
impl VM {
  /// Create a new VM
  #[must_use]
  pub fn new(config: &Config) -> Self {
    Self {
      frames: Vec::with_capacity(16),
      call_depth_limit: config.call_depth_limit,
      state: State::Halted,
      errors: 0,
    }
  }

  /// The current state of the VM
  #[must_use]
  pub fn state(&self) -> State {
    self.state
  }

  /// Run a chunk of bytecode
  ///
  /// Returns the number of runtime errors reported to the context
  pub fn run(
    &mut self,
    chunk: &Chunk,
    environment: &mut Environment,
    context: &mut dyn Context,
  ) -> usize {
    self.frames.clear();
    self.state = State::Running;
    self.errors = 0;

    self.execute(chunk, environment, context);

    self.frames.clear();
    self.state = State::Halted;
    self.errors
  }

  fn execute(&mut self, chunk: &Chunk, environment: &mut Environment, context: &mut dyn Context) {
    let mut main_ip = 0;

    while self.state == State::Running {
      let function = self.frames.last().map(|frame| Rc::clone(&frame.function));
      let current = function.as_ref().map_or(chunk, |function| &function.body);

      let ip = match self.frames.last_mut() {
        Some(frame) => &mut frame.ip,
        None => &mut main_ip,
      };
      let index = *ip;
      *ip += 1;

      let position = current.position(index);
      let step = match current.get(index) {
        Some(instruction) => self.step(instruction, position, environment, context),
        None => Ok(Step::Return(None)),
      };

      match step {
        Ok(Step::Continue) => {}
        Ok(Step::Return(value)) => self.finish_call(environment, context, value),
        Err(kind) => {
          let is_fatal = kind.is_fatal();
          let function = function.map(|function| function.name.clone());
          self.report(context, kind, position, function);

          if is_fatal {
            self.state = State::Halted;
          }
        }
      }
    }
  }

  /// Leave the current function, or halt if at the top level
  fn finish_call(
    &mut self,
    environment: &mut Environment,
    context: &mut dyn Context,
    value: Option<Value>,
  ) {
    let Some(frame) = self.frames.pop() else {
      self.state = State::Halted;
      return;
    };

    let Some(target) = frame.target else {
      return;
    };

    match value {
      Some(value) => self.store(environment, &target, value),
      None => {
        let caller = self.frames.last().map(|caller| caller.function.name.clone());
        let error = ErrorKind::NoReturnValue(frame.function.name.clone());
        self.report(context, error, frame.call_position, caller);
      }
    }
  }

  fn report(
    &mut self,
    context: &mut dyn Context,
    kind: ErrorKind,
    position: Position,
    function: Option<String>,
  ) {
    self.errors += 1;

    context.report(Diagnostic::Runtime(RuntimeError {
      kind,
      position,
      function,
    }));
  }

  fn step(
    &mut self,
    instruction: &Instruction,
    position: Position,
    environment: &mut Environment,
    context: &mut dyn Context,
  ) -> Result<Step, ErrorKind> {
    match instruction {
      Instruction::Say(expression) => {
        let text = self.describe(environment, expression)?;
        context.say(&text);
      }
      Instruction::SayIndexed { array, index } => {
        let text = self.element(environment, array, *index)?.to_string();
        context.say(&text);
      }
      Instruction::ArrayNew(target) => self.store_array(environment, target, Vec::new()),
      Instruction::ArrayPush { array, value } => {
        self
          .array_mut(environment, array)
          .ok_or_else(|| ErrorKind::UndefinedArray(array.clone()))?
          .push(value.clone());
      }
      Instruction::Keep { name, value } => {
        let value = self.resolve(environment, value)?;
        self.current_scope(environment).set_variable(name, value);
      }
      Instruction::Assign { name, value } => {
        let value = self.resolve(environment, value)?;
        self
          .binding_scope(environment, name)
          .set_variable(name, value);
      }
      Instruction::IndexGet {
        target,
        array,
        index,
      } => {
        let value = self.element(environment, array, *index)?.clone();
        self.store(environment, target, value);
      }
      Instruction::BinaryOp { target, operation } => {
        let value = self.binary(environment, operation)?;
        self.store(environment, target, value);
      }
      Instruction::When {
        comparison,
        then_branch,
        else_branch,
      } => {
        let condition = self.compare(environment, comparison)?;
        self.branch(environment, context, condition, then_branch, else_branch.as_ref())?;
      }
      Instruction::WhenBoolean {
        condition,
        then_branch,
        else_branch,
      } => {
        let condition = self.truthy(environment, condition)?;
        self.branch(environment, context, condition, then_branch, else_branch.as_ref())?;
      }
      Instruction::Map {
        target,
        source,
        operator,
        operand,
      } => {
        let values = self.map(environment, source, *operator, *operand)?;
        self.store_array(environment, target, values);
      }
      Instruction::FunctionDecl(function) => environment.define_function(Rc::clone(function)),
      Instruction::FunctionCall {
        function,
        arguments,
        target,
      } => self.call(environment, function, arguments, target.as_ref(), position)?,
      Instruction::Return(value) => {
        let value = match value {
          Some(expression) => Some(self.evaluate(environment, expression)?),
          None => None,
        };
        return Ok(Step::Return(value));
      }
      Instruction::End => return Ok(Step::Return(None)),
    }

    Ok(Step::Continue)
  }

  /// Start a call by pushing a frame, the next instruction run is the start of the function
  fn call(
    &mut self,
    environment: &Environment,
    name: &String,
    arguments: &[Operand],
    target: Option<&Target>,
    call_position: Position,
  ) -> Result<(), ErrorKind> {
    let function = environment
      .get_function(name)
      .cloned()
      .ok_or_else(|| ErrorKind::UndefinedFunction(name.clone()))?;

    if arguments.len() != function.arity() {
      return Err(ErrorKind::ArityMismatch {
        function: name.clone(),
        expected: function.arity(),
        got: arguments.len(),
      });
    }

    let values = arguments
      .iter()
      .map(|argument| self.resolve(environment, argument))
      .collect::<Result<Vec<_>, _>>()?;

    if self.frames.len() >= self.call_depth_limit {
      return Err(ErrorKind::CallDepthExceeded(self.call_depth_limit));
    }

    let mut scope = Scope::default();
    for (parameter, value) in function.parameters.iter().zip(values) {
      scope.set_variable(parameter, value);
    }

    self.frames.push(Frame {
      function,
      ip: 0,
      scope,
      target: target.cloned(),
      call_position,
    });

    Ok(())
  }

  fn branch(
    &mut self,
    environment: &mut Environment,
    context: &mut dyn Context,
    condition: bool,
    then_branch: &Action,
    else_branch: Option<&Action>,
  ) -> Result<(), ErrorKind> {
    let action = if condition {
      Some(then_branch)
    } else {
      else_branch
    };

    match action {
      Some(Action::Say(value)) => {
        let text = self.describe_operand(environment, value)?;
        context.say(&text);
      }
      Some(Action::Keep { name, value }) => {
        let value = self.resolve(environment, value)?;
        self.current_scope(environment).set_variable(name, value);
      }
      None => {}
    }

    Ok(())
  }
}

/// Variable lookup and storage
impl VM {
  fn variable<'a>(&'a self, environment: &'a Environment, name: &str) -> Option<&'a Value> {
    match self.frames.last() {
      Some(frame) if frame.scope.contains(name) => frame.scope.get_variable(name),
      _ => environment.globals.get_variable(name),
    }
  }

  fn array<'a>(&'a self, environment: &'a Environment, name: &str) -> Option<&'a [Value]> {
    match self.frames.last() {
      Some(frame) if frame.scope.contains(name) => frame.scope.get_array(name),
      _ => environment.globals.get_array(name),
    }
  }

  fn array_mut<'a>(
    &'a mut self,
    environment: &'a mut Environment,
    name: &str,
  ) -> Option<&'a mut Vec<Value>> {
    match self.frames.last_mut() {
      Some(frame) if frame.scope.contains(name) => frame.scope.get_array_mut(name),
      _ => environment.globals.get_array_mut(name),
    }
  }

  /// The scope new bindings are made in, the function scope or the globals
  fn current_scope<'a>(&'a mut self, environment: &'a mut Environment) -> &'a mut Scope {
    match self.frames.last_mut() {
      Some(frame) => &mut frame.scope,
      None => &mut environment.globals,
    }
  }

  /// The innermost scope with a binding for the name, or the current scope if there is none
  fn binding_scope<'a>(&'a mut self, environment: &'a mut Environment, name: &str) -> &'a mut Scope {
    match self.frames.last_mut() {
      Some(frame) if !frame.scope.contains(name) && environment.globals.contains(name) => {
        &mut environment.globals
      }
      Some(frame) => &mut frame.scope,
      None => &mut environment.globals,
    }
  }

  fn store(&mut self, environment: &mut Environment, target: &Target, value: Value) {
    match target {
      Target::Keep(name) => self.current_scope(environment).set_variable(name, value),
      Target::Assign(name) => self.binding_scope(environment, name).set_variable(name, value),
    }
  }

  fn store_array(&mut self, environment: &mut Environment, target: &Target, values: Vec<Value>) {
    match target {
      Target::Keep(name) => self.current_scope(environment).set_array(name, values),
      Target::Assign(name) => self.binding_scope(environment, name).set_array(name, values),
    }
  }
}

/// Evaluating values
impl VM {
  fn resolve(&self, environment: &Environment, operand: &Operand) -> Result<Value, ErrorKind> {
    match operand {
      Operand::Literal(value) => Ok(value.clone()),
      Operand::Variable(name) => self
        .variable(environment, name)
        .cloned()
        .ok_or_else(|| ErrorKind::UndefinedVariable(name.clone())),
    }
  }

  fn evaluate(&self, environment: &Environment, expression: &Expression) -> Result<Value, ErrorKind> {
    match expression {
      Expression::Operand(operand) => self.resolve(environment, operand),
      Expression::Binary(operation) => self.binary(environment, operation),
    }
  }

  /// The text printed for a value, arrays are printed in full
  fn describe(
    &self,
    environment: &Environment,
    expression: &Expression,
  ) -> Result<std::string::String, ErrorKind> {
    match expression {
      Expression::Operand(operand) => self.describe_operand(environment, operand),
      Expression::Binary(operation) => Ok(self.binary(environment, operation)?.to_string()),
    }
  }

  fn describe_operand(
    &self,
    environment: &Environment,
    operand: &Operand,
  ) -> Result<std::string::String, ErrorKind> {
    if let Operand::Variable(name) = operand {
      if let Some(values) = self.array(environment, name) {
        return Ok(DisplayArray(values).to_string());
      }
    }

    Ok(self.resolve(environment, operand)?.to_string())
  }

  fn element<'a>(
    &'a self,
    environment: &'a Environment,
    array: &String,
    index: usize,
  ) -> Result<&'a Value, ErrorKind> {
    let values = self
      .array(environment, array)
      .ok_or_else(|| ErrorKind::UndefinedArray(array.clone()))?;

    values
      .get(index)
      .ok_or_else(|| ErrorKind::IndexOutOfBounds {
        array: array.clone(),
        index,
        length: values.len(),
      })
  }

  fn binary(&self, environment: &Environment, operation: &BinaryOperation) -> Result<Value, ErrorKind> {
    let left = self.resolve(environment, &operation.left)?;
    let right = self.resolve(environment, &operation.right)?;

    match (&left, &right) {
      (Value::Number(left), Value::Number(right)) => {
        arithmetic(*left, operation.operator, *right).map(Value::Number)
      }
      _ if operation.operator == BinaryOperator::Add && (left.is_string() || right.is_string()) => {
        Ok(Value::String(format!("{left}{right}").into()))
      }
      _ => Err(ErrorKind::TypeErrorBinary {
        operator: operation.operator,
        left: left.get_type(),
        right: right.get_type(),
      }),
    }
  }

  fn compare(&self, environment: &Environment, comparison: &Comparison) -> Result<bool, ErrorKind> {
    let left = self
      .variable(environment, &comparison.left)
      .cloned()
      .ok_or_else(|| ErrorKind::UndefinedVariable(comparison.left.clone()))?;
    let right = self.resolve(environment, &comparison.right)?;

    match (comparison.operator, &left, &right) {
      (ComparisonOperator::Equal, _, _) => Ok(left == right),
      (ComparisonOperator::Greater, Value::Number(left), Value::Number(right)) => Ok(left > right),
      (ComparisonOperator::Less, Value::Number(left), Value::Number(right)) => Ok(left < right),
      (operator, left, right) => Err(ErrorKind::TypeErrorComparison {
        operator,
        left: left.get_type(),
        right: right.get_type(),
      }),
    }
  }

  fn truthy(&self, environment: &Environment, condition: &Operand) -> Result<bool, ErrorKind> {
    if let Operand::Variable(name) = condition {
      if let Some(values) = self.array(environment, name) {
        return Ok(!values.is_empty());
      }
    }

    Ok(self.resolve(environment, condition)?.is_truthy())
  }

  fn map(
    &self,
    environment: &Environment,
    source: &String,
    operator: BinaryOperator,
    operand: f64,
  ) -> Result<Vec<Value>, ErrorKind> {
    let values = self
      .array(environment, source)
      .ok_or_else(|| ErrorKind::UndefinedArray(source.clone()))?;

    values
      .iter()
      .map(|value| match value {
        Value::Number(number) => arithmetic(*number, operator, operand).map(Value::Number),
        value => Err(ErrorKind::TypeError {
          expected: "number",
          got: value.get_type(),
        }),
      })
      .collect()
  }
}

/// Results which are too large to represent are an error, never infinity
fn arithmetic(left: f64, operator: BinaryOperator, right: f64) -> Result<f64, ErrorKind> {
  let result = match operator {
    BinaryOperator::Add => left + right,
    BinaryOperator::Subtract => left - right,
    BinaryOperator::Multiply => left * right,
    BinaryOperator::Divide if right == 0.0 => return Err(ErrorKind::DivisionByZero),
    BinaryOperator::Divide => left / right,
  };

  if result.is_finite() {
    Ok(result)
  } else {
    Err(ErrorKind::NumberOverflow(operator))
  }
}

/// An error whilst executing bytecode
#[derive(Debug, Clone)]
pub struct RuntimeError {
  kind: ErrorKind,
  position: Position,
  function: Option<String>,
}
impl RuntimeError {
  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> &'static str {
    self.kind.title()
  }

  /// The body of the error message describing what has gone wrong
  #[must_use]
  pub fn message(&self) -> std::string::String {
    self.kind.message()
  }

  /// The location of the instruction which failed
  pub fn position(&self) -> Position {
    self.position
  }

  /// The function the error occurred in, if not at the top level
  #[must_use]
  pub fn function(&self) -> Option<&str> {
    self.function.as_deref()
  }

  /// Does the error stop the program?
  #[must_use]
  pub fn is_fatal(&self) -> bool {
    self.kind.is_fatal()
  }
}
impl fmt::Display for RuntimeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message())
  }
}
impl error::Error for RuntimeError {}

#[derive(Debug, Clone)]
enum ErrorKind {
  UndefinedVariable(String),
  UndefinedArray(String),
  UndefinedFunction(String),
  IndexOutOfBounds {
    array: String,
    index: usize,
    length: usize,
  },
  DivisionByZero,
  NumberOverflow(BinaryOperator),
  TypeError {
    expected: &'static str,
    got: &'static str,
  },
  TypeErrorBinary {
    operator: BinaryOperator,
    left: &'static str,
    right: &'static str,
  },
  TypeErrorComparison {
    operator: ComparisonOperator,
    left: &'static str,
    right: &'static str,
  },
  ArityMismatch {
    function: String,
    expected: usize,
    got: usize,
  },
  NoReturnValue(String),
  CallDepthExceeded(usize),
}
impl ErrorKind {
  fn is_fatal(&self) -> bool {
    matches!(self, Self::CallDepthExceeded(_))
  }

  fn title(&self) -> &'static str {
    match self {
      Self::UndefinedVariable(_) => "Undefined Variable",
      Self::UndefinedArray(_) => "Undefined Array",
      Self::UndefinedFunction(_) => "Undefined Function",
      Self::IndexOutOfBounds { .. } => "Index Out of Bounds",
      Self::DivisionByZero => "Division by Zero",
      Self::NumberOverflow(_) => "Number Overflow",
      Self::TypeError { .. } | Self::TypeErrorBinary { .. } | Self::TypeErrorComparison { .. } => {
        "Type Error"
      }
      Self::ArityMismatch { .. } => "Wrong Number of Arguments",
      Self::NoReturnValue(_) => "No Return Value",
      Self::CallDepthExceeded(_) => "Call Depth Exceeded",
    }
  }

  fn message(&self) -> std::string::String {
    match self {
      Self::UndefinedVariable(name) => format!("variable `{name}` is not defined"),
      Self::UndefinedArray(name) => format!("array `{name}` is not defined"),
      Self::UndefinedFunction(name) => format!("function `{name}` is not defined"),
      Self::IndexOutOfBounds {
        array,
        index,
        length,
      } => format!("index {index} is out of bounds for array `{array}` of length {length}"),
      Self::DivisionByZero => "cannot divide by zero".into(),
      Self::NumberOverflow(operator) => {
        format!("the result of `{operator}` is too large to be a number")
      }
      Self::TypeError { expected, got } => format!("expected `{expected}`, got `{got}`"),
      Self::TypeErrorBinary {
        operator,
        left,
        right,
      } => format!("cannot apply `{operator}` to `{left}` and `{right}`"),
      Self::TypeErrorComparison {
        operator,
        left,
        right,
      } => format!("cannot compare `{left}` and `{right}` with `{operator}`"),
      Self::ArityMismatch {
        function,
        expected,
        got,
      } => format!("function `{function}` expects {expected} arguments, but got {got}"),
      Self::NoReturnValue(function) => {
        format!("function `{function}` did not return a value to store")
      }
      Self::CallDepthExceeded(limit) => {
        format!("more than {limit} nested function calls, the program was stopped")
      }
    }
  }
}
