//! # Interpreter
//! Bytecode compiler and virtual machine for running Jech code.
//!
//! An [AST](jech_syntax::AST) is compiled into a [`Chunk`] of flat instructions, which
//! the [`VM`] runs against an [`Environment`]. Output and problems are sent to a
//! [`Context`]. A [`Session`] runs the whole pipeline, and [`Embedded`] wraps it for use
//! from other programs.

mod bytecode;
mod compiler;
mod context;
mod embed;
mod environment;
mod session;
mod value;
mod vm;

/// More efficient datastructures than in standard library
pub(crate) mod collections {
  pub use rustc_hash::FxHashMap as HashMap;
  pub use smartstring::alias::String;
}


/// Limits on the size of a program and how deep it can recurse
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
  /// The maximum number of instructions in a chunk, not counting the final `End`
  pub instruction_limit: usize,
  /// The maximum number of nested function calls
  pub call_depth_limit: usize,
}
impl Default for Config {
  fn default() -> Self {
    Self {
      instruction_limit: 4096,
      call_depth_limit: 256,
    }
  }
}

/// Compile an AST into a bytecode chunk
///
/// Statements which fail to compile are left out, and the errors are returned
/// alongside the chunk.
///
/// # Examples
/// ```
/// use jech_interpreter::{Config, compile};
/// use jech_syntax::parse;
///
/// let ast = parse("keep x = 5 + 3;");
/// let compilation = compile(&ast, &Config::default());
///
/// assert!(compilation.is_valid());
/// assert_eq!(compilation.chunk.len(), 2);
/// ```
#[must_use]
pub fn compile(ast: &jech_syntax::AST, config: &Config) -> Compilation {
  compiler::compile(ast, config)
}

pub use bytecode::{
  Action, BinaryOperation, Chunk, Comparison, Expression, Function, Instruction, Operand, Target,
};
pub use compiler::{Compilation, CompileError, MAX_PARAMETERS};
pub use context::{Captured, Context, Diagnostic};
pub use embed::{Embedded, OUTPUT_CAPACITY};
pub use environment::{Environment, Scope};
pub use session::{Outcome, Session};
pub use value::Value;
pub use vm::{RuntimeError, State, VM};
