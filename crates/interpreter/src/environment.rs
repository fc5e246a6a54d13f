//! # Environment
//!
//! The variables, arrays and functions which live between runs of the VM

use crate::{
  bytecode::Function,
  collections::{HashMap, String},
  value::{DisplayArray, Value},
};
use std::{fmt, rc::Rc};

/// A set of variable and array bindings
///
/// A name is either a variable or an array, never both. Storing a variable with the
/// name of an array replaces the array, and vice versa.
#[derive(Debug, Default)]
pub struct Scope {
  variables: HashMap<String, Value>,
  arrays: HashMap<String, Vec<Value>>,
}
impl Scope {
  /// Get the value of a variable
  #[must_use]
  pub fn get_variable(&self, name: &str) -> Option<&Value> {
    self.variables.get(name)
  }

  /// Get the elements of an array
  #[must_use]
  pub fn get_array(&self, name: &str) -> Option<&[Value]> {
    self.arrays.get(name).map(Vec::as_slice)
  }

  pub(crate) fn get_array_mut(&mut self, name: &str) -> Option<&mut Vec<Value>> {
    self.arrays.get_mut(name)
  }

  /// Is the name bound to a variable or an array?
  #[must_use]
  pub fn contains(&self, name: &str) -> bool {
    self.variables.contains_key(name) || self.arrays.contains_key(name)
  }

  /// Bind a variable, replacing any variable or array with the same name
  pub fn set_variable(&mut self, name: &str, value: Value) {
    self.arrays.remove(name);
    self.variables.insert(name.into(), value);
  }

  /// Bind an array, replacing any variable or array with the same name
  pub fn set_array(&mut self, name: &str, values: Vec<Value>) {
    self.variables.remove(name);
    self.arrays.insert(name.into(), values);
  }

  /// Does the scope have no bindings?
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.variables.is_empty() && self.arrays.is_empty()
  }

  /// Remove all bindings
  pub fn clear(&mut self) {
    self.variables.clear();
    self.arrays.clear();
  }
}

/// The global state of a program, which lasts between runs
///
/// Holds the global scope and the defined functions.
#[derive(Debug, Default)]
pub struct Environment {
  pub(crate) globals: Scope,
  functions: HashMap<String, Rc<Function>>,
}
impl Environment {
  /// Create a new, empty environment
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Remove all variables, arrays and functions
  pub fn clear(&mut self) {
    self.globals.clear();
    self.functions.clear();
  }

  /// Is the environment empty?
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.globals.is_empty() && self.functions.is_empty()
  }

  /// The global scope
  #[must_use]
  pub fn globals(&self) -> &Scope {
    &self.globals
  }

  /// Get the value of a global variable
  #[must_use]
  pub fn get_variable(&self, name: &str) -> Option<&Value> {
    self.globals.get_variable(name)
  }

  /// Get the elements of a global array
  #[must_use]
  pub fn get_array(&self, name: &str) -> Option<&[Value]> {
    self.globals.get_array(name)
  }

  /// Get a defined function
  #[must_use]
  pub fn get_function(&self, name: &str) -> Option<&Rc<Function>> {
    self.functions.get(name)
  }

  pub(crate) fn define_function(&mut self, function: Rc<Function>) {
    self.functions.insert(function.name.clone(), function);
  }
}
impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut variables: Vec<_> = self.globals.variables.iter().collect();
    variables.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
    let mut arrays: Vec<_> = self.globals.arrays.iter().collect();
    arrays.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
    let mut functions: Vec<_> = self.functions.values().collect();
    functions.sort_unstable_by(|a, b| a.name.cmp(&b.name));

    writeln!(f, "╭─[Environment]")?;
    for (name, value) in variables {
      match value {
        Value::String(string) => writeln!(f, "│ {name} = \"{string}\"")?,
        value => writeln!(f, "│ {name} = {value}")?,
      }
    }
    for (name, values) in arrays {
      writeln!(f, "│ {name} = {}", DisplayArray(values))?;
    }
    for function in functions {
      writeln!(f, "│ do {function}")?;
    }
    write!(f, "╯")
  }
}
