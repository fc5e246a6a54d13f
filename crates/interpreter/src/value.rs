use crate::collections::String;
use std::fmt;

/// A value which can be stored in a variable or an array.
///
/// It can be:
/// - Number (f64)
/// - String
/// - Boolean
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
  /// A number
  Number(f64),
  /// A string
  String(String),
  /// A boolean
  Boolean(bool),
}
impl Value {
  /// Parse the text of a number literal
  ///
  /// Literals too large to be represented give `None`
  #[must_use]
  pub fn from_number_literal(text: &str) -> Option<Self> {
    text
      .parse::<f64>()
      .ok()
      .filter(|number| number.is_finite())
      .map(Self::Number)
  }

  /// Get the type of the value as a string
  #[must_use]
  pub fn get_type(&self) -> &'static str {
    match self {
      Self::Number(_) => "number",
      Self::String(_) => "string",
      Self::Boolean(_) => "boolean",
    }
  }

  /// Is the value truthy?
  ///
  /// Numbers are truthy if they are not zero, strings if they are not empty
  #[must_use]
  pub fn is_truthy(&self) -> bool {
    match self {
      Self::Number(number) => *number != 0.0,
      Self::String(string) => !string.is_empty(),
      Self::Boolean(boolean) => *boolean,
    }
  }

  /// Is the [Value] a string?
  #[must_use]
  pub fn is_string(&self) -> bool {
    matches!(self, Self::String(_))
  }
}
impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Number(number) => write!(f, "{number}"),
      Self::String(string) => write!(f, "{string}"),
      Self::Boolean(boolean) => write!(f, "{boolean}"),
    }
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Self::Number(value)
  }
}
impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Self::Boolean(value)
  }
}
impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Self::String(value.into())
  }
}
impl From<String> for Value {
  fn from(value: String) -> Self {
    Self::String(value)
  }
}

/// Display a list of values as an array, e.g. `[1, two, true]`
pub(crate) struct DisplayArray<'a>(pub &'a [Value]);
impl fmt::Display for DisplayArray<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[")?;
    for (index, value) in self.0.iter().enumerate() {
      if index > 0 {
        write!(f, ", ")?;
      }
      write!(f, "{value}")?;
    }
    write!(f, "]")
  }
}
