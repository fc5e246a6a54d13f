use jech_interpreter::Diagnostic;
use jech_syntax::{LineIndex, Span, TokenKind, tokenise};
use owo_colors::{OwoColorize, Style};
use std::fmt;

#[derive(Debug)]
pub enum Severity {
  Error,
  Warning,
}
pub struct Message {
  pub title: String,
  pub body: String,
  pub hint: Option<String>,
  pub category: Option<&'static str>,
  pub severity: Severity,
}
impl Message {
  pub fn error(message: String) -> Self {
    Self {
      title: message,
      body: String::new(),
      hint: None,
      category: None,
      severity: Severity::Error,
    }
  }
  pub fn warning(message: String) -> Self {
    Self {
      title: message,
      body: String::new(),
      hint: None,
      category: None,
      severity: Severity::Warning,
    }
  }
}
impl fmt::Display for Message {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.severity {
      Severity::Error => write!(f, "{}", "✕".bold().red())?,
      Severity::Warning => write!(f, "{}", "⚠".bold().yellow())?,
    }
    match (&self.severity, self.category) {
      (Severity::Error, Some(category)) => write!(f, " {}", category.bold().red()),
      (Severity::Error, None) => write!(f, " {}", "Error".bold().red()),
      (Severity::Warning, _) => write!(f, " {}", "Warning".bold().yellow()),
    }?;
    writeln!(f, "{} {}", ":".bold(), &self.title.bold())?;

    if !self.body.is_empty() {
      writeln!(f, "{}", &self.body)?;
    }

    if let Some(hint) = &self.hint {
      writeln!(f, "{} {}", "hint:".italic().cyan(), hint)?;
    }

    Ok(())
  }
}
impl From<&Diagnostic> for Message {
  fn from(diagnostic: &Diagnostic) -> Self {
    Self {
      title: diagnostic.title(),
      body: diagnostic.message(),
      hint: diagnostic.hint(),
      category: Some(diagnostic.category()),
      severity: Severity::Error,
    }
  }
}

/// A line of source code, with a title of where it is from
pub struct CodeFrame<'a> {
  title: &'a str,
  line: usize,
  text: &'a str,
}
impl<'a> CodeFrame<'a> {
  /// Create a frame for a line, if the line exists in the source
  pub fn new(title: &'a str, source: &'a str, lines: &LineIndex, line: usize) -> Option<Self> {
    let text = lines.line_span(line)?.source_text(source);

    Some(Self {
      title: if title == "-" { "STDIN" } else { title },
      line,
      text: text.trim_end_matches(['\n', '\r']),
    })
  }
}
impl fmt::Display for CodeFrame<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
      f,
      "    {}{}{}{}{}",
      "╭─[".dimmed(),
      self.title,
      ":".dimmed(),
      self.line,
      "]".dimmed()
    )?;

    write!(f, "{:>3} {}", self.line, "│".dimmed())?;
    if !self.text.is_empty() {
      write!(f, " ")?;
    }
    highlight_source(f, self.text)?;
    writeln!(f)?;

    write!(f, "{}", "────╯".dimmed())
  }
}

/// Write source code with syntax highlighting
///
/// The text between tokens (whitespace and comments) is written as it is.
pub fn highlight_source(output: &mut dyn fmt::Write, source: &str) -> fmt::Result {
  let mut last = 0;
  for token in tokenise(source) {
    let start = token.start as usize;
    if start > last {
      write!(output, "{}", (&source[last..start]).dimmed())?;
    }

    let style = match token.kind {
      TokenKind::Number | TokenKind::True | TokenKind::False => Style::new().blue(),
      TokenKind::String | TokenKind::UnterminatedString => Style::new().green(),
      TokenKind::When | TokenKind::Else | TokenKind::Return | TokenKind::Map => {
        Style::new().cyan()
      }
      TokenKind::Keep | TokenKind::Do | TokenKind::Say => Style::new().magenta(),
      TokenKind::Unknown => Style::new().red(),
      _ => Style::new(),
    };
    let token_text = Span::from(token).source_text(source);
    write!(output, "{}", token_text.style(style))?;

    last = start + token_text.len();
  }

  if last < source.len() {
    write!(output, "{}", (&source[last..]).dimmed())?;
  }

  Ok(())
}
