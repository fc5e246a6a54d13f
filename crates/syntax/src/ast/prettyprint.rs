//! Pretty-print the AST into a human readable format.
//!
//! Based upon this [blog post](https://www.georgevreilly.com/blog/2023/01/24/TreeInRust2PrintingTrees.html)

use super::{AST, expression::*, statement::*};
use std::fmt;

impl fmt::Display for AST<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for statement in &self.root_statements {
      statement.pretty(f, "", false)?;
    }

    Ok(())
  }
}

const OTHER_CHILD: &str = "│  ";
const OTHER_ENTRY: &str = "├─ ";
const FINAL_CHILD: &str = "   ";
const FINAL_ENTRY: &str = "╰─ ";

/// Write the line for a node, and get the prefix for its children
fn node(
  f: &mut fmt::Formatter,
  prefix: &str,
  last: bool,
  label: fmt::Arguments,
) -> Result<String, fmt::Error> {
  let connector = if last { FINAL_ENTRY } else { OTHER_ENTRY };
  writeln!(f, "{prefix}{connector}{label}")?;

  Ok(format!("{prefix}{}", if last { FINAL_CHILD } else { OTHER_CHILD }))
}

/// Print a list of children, with the final one marked as last
fn children<T: PrettyPrint>(f: &mut fmt::Formatter, prefix: &str, items: &[T]) -> fmt::Result {
  if let Some((last_item, items)) = items.split_last() {
    for item in items {
      item.pretty(f, prefix, false)?;
    }
    last_item.pretty(f, prefix, true)?;
  }

  Ok(())
}

trait PrettyPrint {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result;
}

impl PrettyPrint for Statement<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    match self {
      Self::Say(x) => x.pretty(f, prefix, last),
      Self::SayIndexed(x) => x.pretty(f, prefix, last),
      Self::Keep(x) => x.pretty(f, prefix, last),
      Self::Assign(x) => x.pretty(f, prefix, last),
      Self::When(x) => x.pretty(f, prefix, last),
      Self::Map(x) => x.expression.pretty(f, prefix, last),
      Self::FunctionDecl(x) => x.pretty(f, prefix, last),
      Self::FunctionCall(x) => x.call.pretty(f, prefix, last),
      Self::Return(x) => x.pretty(f, prefix, last),
    }
  }
}
impl PrettyPrint for Say<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let prefix = node(f, prefix, last, format_args!("Say"))?;
    self.value.pretty(f, &prefix, true)
  }
}
impl PrettyPrint for SayIndexed<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let prefix = node(f, prefix, last, format_args!("Say"))?;
    self.access.pretty(f, &prefix, true)
  }
}
impl PrettyPrint for Keep<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let prefix = node(f, prefix, last, format_args!("Keep ({})", self.name.name))?;
    self.initializer.pretty(f, &prefix, true)
  }
}
impl PrettyPrint for Assign<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let prefix = node(f, prefix, last, format_args!("Assign ({})", self.name.name))?;
    self.initializer.pretty(f, &prefix, true)
  }
}
impl PrettyPrint for When<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let prefix = node(f, prefix, last, format_args!("When"))?;

    let condition_prefix = node(f, &prefix, false, format_args!("Condition"))?;
    self.condition.pretty(f, &condition_prefix, true)?;

    let has_else = self.else_branch.is_some();
    let then_prefix = node(f, &prefix, !has_else, format_args!("Then"))?;
    self.then_branch.pretty(f, &then_prefix, true)?;

    if let Some(else_branch) = &self.else_branch {
      let else_prefix = node(f, &prefix, true, format_args!("Else"))?;
      else_branch.pretty(f, &else_prefix, true)?;
    }

    Ok(())
  }
}
impl PrettyPrint for FunctionDecl<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let prefix = node(f, prefix, last, format_args!("Function ({})", self.name.name))?;

    let parameters_prefix = node(f, &prefix, false, format_args!("Parameters"))?;
    children(f, &parameters_prefix, &self.parameters)?;

    let body_prefix = node(f, &prefix, true, format_args!("Body"))?;
    children(f, &body_prefix, &self.body)
  }
}
impl PrettyPrint for Return<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let prefix = node(f, prefix, last, format_args!("Return"))?;

    match &self.value {
      Some(value) => value.pretty(f, &prefix, true),
      None => Ok(()),
    }
  }
}

impl PrettyPrint for Operand<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let text = self.text;
    match self.kind {
      OperandKind::String => node(f, prefix, last, format_args!("String \"{text}\""))?,
      OperandKind::Number => node(f, prefix, last, format_args!("Number ({text})"))?,
      OperandKind::Boolean => node(f, prefix, last, format_args!("Boolean ({text})"))?,
      OperandKind::Identifier => node(f, prefix, last, format_args!("Variable ({text})"))?,
    };

    Ok(())
  }
}
impl PrettyPrint for Identifier<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    node(f, prefix, last, format_args!("Variable ({})", self.name))?;
    Ok(())
  }
}
impl PrettyPrint for Binary<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let prefix = node(f, prefix, last, format_args!("Binary ({})", self.operator))?;
    self.left.pretty(f, &prefix, false)?;
    self.right.pretty(f, &prefix, true)
  }
}
impl PrettyPrint for Expression<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    match self {
      Self::Operand(x) => x.pretty(f, prefix, last),
      Self::Binary(x) => x.pretty(f, prefix, last),
    }
  }
}
impl PrettyPrint for ArrayLiteral<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let prefix = node(f, prefix, last, format_args!("Array"))?;
    children(f, &prefix, &self.elements)
  }
}
impl PrettyPrint for MapExpression<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let prefix = node(f, prefix, last, format_args!("Map ({})", self.operator))?;
    self.array.pretty(f, &prefix, false)?;
    self.operand.pretty(f, &prefix, true)
  }
}
impl PrettyPrint for IndexAccess<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let prefix = node(f, prefix, last, format_args!("Index"))?;
    self.array.pretty(f, &prefix, false)?;
    self.index.pretty(f, &prefix, true)
  }
}
impl PrettyPrint for Call<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let prefix = node(f, prefix, last, format_args!("Call ({})", self.function.name))?;
    children(f, &prefix, &self.arguments)
  }
}
impl PrettyPrint for Initializer<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    match self {
      Self::Value(x) => x.pretty(f, prefix, last),
      Self::Array(x) => x.pretty(f, prefix, last),
      Self::Map(x) => x.pretty(f, prefix, last),
      Self::Binary(x) => x.pretty(f, prefix, last),
      Self::Index(x) => x.pretty(f, prefix, last),
      Self::Call(x) => x.pretty(f, prefix, last),
    }
  }
}
impl PrettyPrint for Condition<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    match self {
      Self::Truthy(operand) => operand.pretty(f, prefix, last),
      Self::Comparison {
        left,
        operator,
        right,
      } => {
        let prefix = node(f, prefix, last, format_args!("Comparison ({operator})"))?;
        left.pretty(f, &prefix, false)?;
        right.pretty(f, &prefix, true)
      }
    }
  }
}
impl PrettyPrint for Action<'_> {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    match self {
      Self::Say(value) => {
        let prefix = node(f, prefix, last, format_args!("Say"))?;
        value.pretty(f, &prefix, true)
      }
      Self::Keep { name, value } => {
        let prefix = node(f, prefix, last, format_args!("Keep ({})", name.name))?;
        value.pretty(f, &prefix, true)
      }
    }
  }
}
