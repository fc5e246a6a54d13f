//! # Embedded
//!
//! A simple string in, string out interface for hosting the interpreter in another program

use crate::{
  Config,
  context::{Context, Diagnostic},
  session::{Outcome, Session},
};

/// The maximum number of bytes of output kept from a single run
pub const OUTPUT_CAPACITY: usize = 16384;

/// Collects output up to a fixed size, and the rendered diagnostics
#[derive(Debug)]
struct Buffer {
  output: String,
  capacity: usize,
  diagnostics: Vec<String>,
}
impl Buffer {
  fn push(&mut self, text: &str) {
    let remaining = self.capacity - self.output.len();

    if text.len() <= remaining {
      self.output.push_str(text);
      return;
    }

    let mut end = remaining;
    while !text.is_char_boundary(end) {
      end -= 1;
    }
    self.output.push_str(&text[..end]);
  }

  fn clear(&mut self) {
    self.output.clear();
    self.diagnostics.clear();
  }
}
impl Context for Buffer {
  fn say(&mut self, text: &str) {
    self.push(text);
    self.push("\n");
  }

  fn report(&mut self, diagnostic: Diagnostic) {
    self.diagnostics.push(diagnostic.to_string());
  }
}

/// An interpreter which takes source code and returns what it printed
///
/// # Examples
/// ```
/// use jech_interpreter::Embedded;
///
/// let mut interpreter = Embedded::new();
/// assert_eq!(interpreter.execute("keep x = 2; say(x * 3);"), "6\n");
/// assert_eq!(interpreter.execute("say(x);"), "2\n");
/// ```
#[derive(Debug)]
pub struct Embedded {
  session: Session,
  buffer: Buffer,
}
impl Embedded {
  /// Create an interpreter with the default limits
  #[must_use]
  pub fn new() -> Self {
    Self::with_capacity(Config::default(), OUTPUT_CAPACITY)
  }

  /// Create an interpreter with the given limits and output capacity in bytes
  #[must_use]
  pub fn with_capacity(config: Config, capacity: usize) -> Self {
    Self {
      session: Session::new(config),
      buffer: Buffer {
        output: String::with_capacity(capacity),
        capacity,
        diagnostics: Vec::new(),
      },
    }
  }

  /// Run source code, returning everything it printed
  ///
  /// Variables defined are kept for the next call.
  pub fn execute(&mut self, source: &str) -> String {
    self.buffer.clear();

    if source.is_empty() {
      return "Error: Empty source code".into();
    }

    match self.session.evaluate(source, &mut self.buffer) {
      Outcome::NothingToRun | Outcome::Aborted => "Error: Failed to parse code".into(),
      Outcome::Completed | Outcome::CompletedWithErrors => self.buffer.output.clone(),
    }
  }

  /// The diagnostics reported by the last call to [`Embedded::execute`]
  #[must_use]
  pub fn diagnostics(&self) -> &[String] {
    &self.buffer.diagnostics
  }

  /// Forget all variables, arrays and functions, and the last output
  pub fn clear_state(&mut self) {
    self.session.clear();
    self.buffer.clear();
  }

  /// The version of the interpreter
  #[must_use]
  pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
  }
}
impl Default for Embedded {
  fn default() -> Self {
    Self::new()
  }
}
