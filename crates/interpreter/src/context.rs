use crate::{compiler::CompileError, vm::RuntimeError};
use jech_syntax::{ParseError, Position};
use std::fmt;

/// A context is the host in which a program runs.
///
/// It receives the output of `say` statements, and the diagnostics found whilst
/// parsing, compiling, and running a program.
pub trait Context {
  /// Print a line of output
  fn say(&mut self, text: &str);

  /// Report a problem with the program
  fn report(&mut self, diagnostic: Diagnostic);
}

/// A problem found at any stage of running a program
#[derive(Debug, Clone)]
pub enum Diagnostic {
  /// An error whilst tokenising or parsing
  Syntax(ParseError),
  /// The source had no statements which could be run
  NoInstructions,
  /// An error whilst compiling
  Compile(CompileError),
  /// An error whilst running
  Runtime(RuntimeError),
}
impl Diagnostic {
  /// Which stage of the pipeline the problem was found in
  #[must_use]
  pub fn category(&self) -> &'static str {
    match self {
      Self::Syntax(error) if error.is_lexical() => "Lexical Error",
      Self::Syntax(_) | Self::NoInstructions => "Syntax Error",
      Self::Compile(_) => "Compile Error",
      Self::Runtime(_) => "Runtime Error",
    }
  }

  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> String {
    match self {
      Self::Syntax(error) => error.title(),
      Self::NoInstructions => "No Valid Instructions".into(),
      Self::Compile(error) => error.title().into(),
      Self::Runtime(error) => error.title().into(),
    }
  }

  /// The body of the error message describing what has gone wrong
  #[must_use]
  pub fn message(&self) -> String {
    match self {
      Self::Syntax(error) => error.message(),
      Self::NoInstructions => "no valid instructions found".into(),
      Self::Compile(error) => error.message(),
      Self::Runtime(error) => error.message(),
    }
  }

  /// A suggestion for how to fix the problem
  #[must_use]
  pub fn hint(&self) -> Option<String> {
    match self {
      Self::Syntax(error) => error.suggestion(),
      _ => None,
    }
  }

  /// Where in the source the problem is
  #[must_use]
  pub fn position(&self) -> Option<Position> {
    match self {
      Self::Syntax(error) => Some(error.position()),
      Self::NoInstructions => None,
      Self::Compile(error) => Some(error.position()),
      Self::Runtime(error) => Some(error.position()),
    }
  }

  /// Where the problem is, described for a person
  #[must_use]
  pub fn location(&self) -> Option<String> {
    let position = self.position()?;

    match self {
      Self::Runtime(error) => match error.function() {
        Some(function) => Some(format!("in function '{function}' at {position}")),
        None => Some(format!("at {position}")),
      },
      _ => Some(format!("at {position}")),
    }
  }
}
impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}]", self.category())?;
    if let Some(location) = self.location() {
      write!(f, " {location}")?;
    }
    write!(f, ": {}", self.message())
  }
}

/// A context which collects the output and diagnostics
#[derive(Debug, Default)]
pub struct Captured {
  /// The output, each line ending in a newline
  pub output: String,
  /// The diagnostics reported
  pub diagnostics: Vec<Diagnostic>,
}
impl Captured {
  /// Create a new, empty context
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }
}
impl Context for Captured {
  fn say(&mut self, text: &str) {
    self.output.push_str(text);
    self.output.push('\n');
  }

  fn report(&mut self, diagnostic: Diagnostic) {
    self.diagnostics.push(diagnostic);
  }
}
