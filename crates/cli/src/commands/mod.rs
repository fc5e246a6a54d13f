use super::diagnostics::{CodeFrame, Message, Severity};

use jech_interpreter::{Chunk, Config, Context, Diagnostic, Outcome, Session};
use jech_syntax::{AST, LineIndex, tokenise};

use anstream::{eprintln, println};
use std::{fmt::Write, fs, path::Path};

const USAGE: &str = "usage: jech run <file.jc>";

pub enum CommandStatus {
  /// Command was successful, no errors or warnings occurred
  Success,
  /// Command was successful, but errors were reported
  Failure,
}

fn read_file(filename: &str) -> Result<String, Message> {
  if filename == "-" {
    return read_stdin();
  }

  match fs::read_to_string(filename) {
    Ok(file) if file.is_empty() => Err(Message::warning(format!("Empty file `{filename}`"))),
    Ok(file) if file.len() >= u32::MAX as usize => {
      Err(Message::error("File too large - max size 4GB".into()))
    }
    Ok(file) => Ok(file),
    Err(_) => Err(Message::error(format!("File not found `{filename}`"))),
  }
}

fn read_stdin() -> Result<String, Message> {
  use std::io::{self, Read};

  let mut buffer = String::new();
  let mut stdin = io::stdin().lock();

  match stdin.read_to_string(&mut buffer) {
    Ok(_) if buffer.len() >= u32::MAX as usize => {
      Err(Message::error("File too large - max size 4GB".into()))
    }
    Ok(_) => Ok(buffer),
    Err(_) => Err(Message::error("Problem Reading from STDIN".into())),
  }
}

fn report(message: &Message) {
  eprintln!("{message}");
}

fn display_name(filename: &str) -> &str {
  if filename == "-" { "STDIN" } else { filename }
}

/// Sends output to stdout, and diagnostics with a code frame to stderr
pub struct Terminal<'a> {
  filename: &'a str,
  source: &'a str,
  lines: LineIndex,
}
impl<'a> Terminal<'a> {
  pub fn new(filename: &'a str, source: &'a str) -> Self {
    Self {
      filename,
      source,
      lines: LineIndex::from_source(source),
    }
  }
}
impl Context for Terminal<'_> {
  fn say(&mut self, text: &str) {
    println!("{text}");
  }

  fn report(&mut self, diagnostic: Diagnostic) {
    eprintln!("{}", Message::from(&diagnostic));

    let Some(position) = diagnostic.position() else {
      return;
    };

    let frame = usize::try_from(position.line)
      .ok()
      .and_then(|line| CodeFrame::new(self.filename, self.source, &self.lines, line));
    if let Some(frame) = frame {
      eprintln!("{frame}");
    }
    if let Some(location) = diagnostic.location() {
      eprintln!("\n{location}");
    }
  }
}

pub fn run(filename: &str, debug: bool, config: Config) -> Result<CommandStatus, ()> {
  let is_jech_file = Path::new(filename)
    .extension()
    .is_some_and(|extension| extension == "jc");

  if filename != "-" && !is_jech_file {
    report(&Message {
      title: format!("Can't run `{filename}`"),
      body: "Jech programs are files ending in `.jc`".into(),
      hint: Some(USAGE.into()),
      category: None,
      severity: Severity::Error,
    });
    return Err(());
  }

  let source = read_file(filename).map_err(|mut message| {
    message.hint = Some(USAGE.into());
    report(&message);
  })?;

  if debug {
    let ast = jech_syntax::parse(&source);
    let compilation = jech_interpreter::compile(&ast, &config);

    eprintln!("{}", token_table(filename, &source));
    eprintln!("{}", syntax_tree(filename, &ast));
    eprintln!("{}", chunk_listing(&compilation.chunk));
  }

  let mut session = Session::new(config);
  let mut terminal = Terminal::new(filename, &source);
  let outcome = session.evaluate(&source, &mut terminal);

  if debug {
    eprintln!("{}", session.environment());
  }

  match outcome {
    Outcome::Completed => Ok(CommandStatus::Success),
    Outcome::CompletedWithErrors | Outcome::NothingToRun => Ok(CommandStatus::Failure),
    Outcome::Aborted => Err(()),
  }
}

pub fn print_tokens(filename: &str) -> Result<CommandStatus, ()> {
  let source = read_file(filename).map_err(|message| report(&message))?;

  println!("{}", token_table(filename, &source));

  Ok(CommandStatus::Success)
}

pub fn print_ast(filename: &str) -> Result<CommandStatus, ()> {
  let source = read_file(filename).map_err(|message| report(&message))?;
  let ast = jech_syntax::parse(&source);

  if !ast.is_valid() {
    let mut terminal = Terminal::new(filename, &source);
    for error in &ast.errors {
      terminal.report(Diagnostic::Syntax(error.clone()));
    }
    println!();
  }

  println!("{}", syntax_tree(filename, &ast));

  Ok(CommandStatus::Success)
}

pub fn print_chunk(filename: &str) -> Result<CommandStatus, ()> {
  let source = read_file(filename).map_err(|message| report(&message))?;
  let ast = jech_syntax::parse(&source);
  let mut terminal = Terminal::new(filename, &source);

  if !ast.is_valid() {
    for error in &ast.errors {
      terminal.report(Diagnostic::Syntax(error.clone()));
    }
    return Err(());
  }

  let compilation = jech_interpreter::compile(&ast, &Config::default());
  let is_valid = compilation.is_valid();
  for error in compilation.errors.iter().cloned() {
    terminal.report(Diagnostic::Compile(error));
  }

  println!("{}", chunk_listing(&compilation.chunk));

  if is_valid {
    Ok(CommandStatus::Success)
  } else {
    Ok(CommandStatus::Failure)
  }
}

fn token_table(filename: &str, source: &str) -> String {
  let mut table = format!("        ╭─[Tokens: {}]\n", display_name(filename));

  for token in tokenise(source) {
    let position = format!("{}:{}", token.line, token.column);
    _ = write!(table, "{position:>7} │ {}", token.kind);
    if !token.kind.has_fixed_length() {
      _ = write!(table, " ({})", token.text(source));
    }
    table.push('\n');
  }
  table.push_str("────────╯");

  table
}

fn syntax_tree(filename: &str, ast: &AST) -> String {
  format!(
    "╭─[Abstract Syntax Tree: {}]\n{ast}╯",
    display_name(filename)
  )
}

fn chunk_listing(chunk: &Chunk) -> String {
  let mut listing = chunk.to_string();

  for sub_chunk in chunk.chunks() {
    listing.push('\n');
    listing.push_str(&chunk_listing(sub_chunk));
  }

  listing
}

mod repl;
pub use repl::repl;
