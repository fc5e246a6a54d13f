use super::{CommandStatus, Terminal, report};
use crate::diagnostics::Message;

use jech_interpreter::Session;

use anstream::println;
use owo_colors::OwoColorize;
use rustyline::{DefaultEditor, error::ReadlineError};

const HELP: &str = "\
say(value);                       print a value, or `say(list[0]);` for an element
keep name = value;                declare a variable, array, or map result
name = value;                     update a variable
when (x > 1) { say(x); } else { say(0); }
do name(a, b) { return a + b; }   declare a function
clear                             forget all variables, arrays and functions
exit, quit                        leave the shell";

pub fn repl() -> Result<CommandStatus, ()> {
  println!(
    "{} {}",
    "Jech Interactive Shell".bold(),
    concat!("v", env!("CARGO_PKG_VERSION")).dimmed()
  );
  println!(
    "{}",
    "type `help` for help, exit using `exit`, ctrl+d, or ctrl+c".dimmed()
  );

  let mut editor = DefaultEditor::new().map_err(|_| {
    report(&Message::error("Problem starting the interactive shell".into()));
  })?;
  let mut session = Session::default();
  let mut buffer = String::new();

  loop {
    let prompt = if buffer.is_empty() { ">>> " } else { "... " };

    match editor.readline(prompt) {
      Ok(line) => {
        if buffer.is_empty() {
          match line.trim() {
            "exit" | "quit" => break,
            "help" => {
              println!("{HELP}");
              continue;
            }
            "clear" => {
              session.clear();
              println!("All variables and arrays cleared.");
              continue;
            }
            "" => continue,
            _ => {}
          }
        }

        buffer.push_str(&line);
        buffer.push('\n');
        if !is_balanced(&buffer) {
          continue;
        }

        _ = editor.add_history_entry(buffer.trim_end());
        session.evaluate(&buffer, &mut Terminal::new("REPL", &buffer));
        buffer.clear();
      }
      Err(ReadlineError::Interrupted) if !buffer.is_empty() => buffer.clear(),
      Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
      Err(_) => {
        report(&Message::error("Problem reading input".into()));
        return Err(());
      }
    }
  }

  println!("Goodbye!");
  Ok(CommandStatus::Success)
}

/// Are all brackets closed, so the input can be run?
///
/// Brackets in strings and comments are ignored. If an unmatched closing bracket is
/// found, it is balanced so the error can be reported.
fn is_balanced(source: &str) -> bool {
  let mut depth: i32 = 0;
  let mut in_string = false;
  let mut chars = source.chars().peekable();

  while let Some(character) = chars.next() {
    if in_string {
      match character {
        '\\' => {
          chars.next();
        }
        '"' => in_string = false,
        _ => {}
      }
      continue;
    }

    match character {
      '"' => in_string = true,
      '#' => skip_line(&mut chars),
      '/' if chars.peek() == Some(&'/') => skip_line(&mut chars),
      '(' | '{' | '[' => depth += 1,
      ')' | '}' | ']' => depth -= 1,
      _ => {}
    }
  }

  !in_string && depth <= 0
}

fn skip_line(chars: &mut impl Iterator<Item = char>) {
  for character in chars {
    if character == '\n' {
      break;
    }
  }
}
