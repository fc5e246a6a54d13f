//! # Session
//!
//! Runs source code through the whole pipeline, keeping the environment between runs

use crate::{
  Config,
  compiler::compile,
  context::{Context, Diagnostic},
  environment::Environment,
  vm::VM,
};
use jech_syntax::parse;

/// How evaluating some source code went
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
  /// Ran without any problems
  Completed,
  /// Ran, but problems were reported
  CompletedWithErrors,
  /// No statements could be parsed, so nothing was run
  NothingToRun,
  /// A fatal error was found, so the source wasn't parsed
  Aborted,
}

/// A session of running code, where variables live between each evaluation
#[derive(Debug)]
pub struct Session {
  vm: VM,
  environment: Environment,
  config: Config,
}
impl Session {
  /// Create a new session with an empty environment
  #[must_use]
  pub fn new(config: Config) -> Self {
    Self {
      vm: VM::new(&config),
      environment: Environment::new(),
      config,
    }
  }

  /// The variables, arrays and functions defined so far
  #[must_use]
  pub fn environment(&self) -> &Environment {
    &self.environment
  }

  /// The limits the session was created with
  #[must_use]
  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Remove everything defined so far
  pub fn clear(&mut self) {
    self.environment.clear();
  }

  /// Parse, compile and run some source code
  ///
  /// Output and diagnostics are sent to the context as they happen.
  pub fn evaluate(&mut self, source: &str, context: &mut dyn Context) -> Outcome {
    let ast = parse(source);
    let mut reported = !ast.errors.is_empty();

    for error in &ast.errors {
      context.report(Diagnostic::Syntax(error.clone()));
    }
    if ast.has_fatal_error() {
      return Outcome::Aborted;
    }
    if ast.is_empty() {
      return Outcome::Completed;
    }
    if ast.root_statements.is_empty() {
      context.report(Diagnostic::NoInstructions);
      return Outcome::NothingToRun;
    }

    let compilation = compile(&ast, &self.config);
    reported |= !compilation.errors.is_empty();
    for error in compilation.errors {
      context.report(Diagnostic::Compile(error));
    }

    let runtime_errors = self
      .vm
      .run(&compilation.chunk, &mut self.environment, context);
    reported |= runtime_errors > 0;

    if reported {
      Outcome::CompletedWithErrors
    } else {
      Outcome::Completed
    }
  }
}
impl Default for Session {
  fn default() -> Self {
    Self::new(Config::default())
  }
}
