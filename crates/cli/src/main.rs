//! # Jech
//! A tiny scripting language of `say`, `keep`, `when` and `do`.
//!
//! Source is tokenised, parsed into statements, compiled to flat bytecode, and run by a
//! small virtual machine. Run a file, or explore in the interactive shell.

#![allow(clippy::print_stdout)]

mod commands;
mod diagnostics;

use clap::builder::styling::{AnsiColor, Style, Styles};
use clap::{Args, Parser, Subcommand};
use commands::CommandStatus;
use owo_colors::*;
use std::process;

const STYLES: Styles = Styles::styled()
  .usage(Style::new().italic())
  .header(AnsiColor::BrightYellow.on_default().bold());

fn coloured_header() -> String {
  format!(
    "{} {}",
    "Jech".fg::<owo_colors::colors::css::Orange>().bold(),
    concat!("(v", env!("CARGO_PKG_VERSION"), ")").italic().dimmed()
  )
}

fn about() -> String {
  format!(
    "{}\nA tiny scripting language, compiled to bytecode and interpreted.",
    coloured_header()
  )
}

#[derive(Parser)]
#[clap(
  name = "jech",
  version,
  about = about(),
  styles = STYLES,
  disable_help_subcommand = true,
)]
struct App {
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Runs a Jech program
  Run(RunOptions),

  /// Start an interactive shell (the default)
  Repl,

  /// Prints debugging information
  Print {
    #[command(subcommand)]
    command: PrintCommand,
  },
}

#[derive(Args)]
struct RunOptions {
  /// The file to run, ending in `.jc`. Use `-` to read from stdin
  file: String,
  /// Print the tokens, syntax tree, bytecode and final variables
  #[clap(long)]
  debug: bool,

  /// Maximum number of instructions in a chunk
  #[clap(long, default_value_t = 4096, help_heading = "Limits")]
  instruction_limit: usize,
  /// Maximum number of nested function calls
  #[clap(long, default_value_t = 256, help_heading = "Limits")]
  call_depth_limit: usize,
}
impl RunOptions {
  fn config(&self) -> jech_interpreter::Config {
    jech_interpreter::Config {
      instruction_limit: self.instruction_limit,
      call_depth_limit: self.call_depth_limit,
    }
  }
}

#[derive(Subcommand)]
enum PrintCommand {
  /// Displays the tokens in the file
  Tokens {
    /// The file to print
    file: String,
  },
  /// Displays the Abstract Syntax Tree
  Ast {
    /// The file to print
    file: String,
  },
  /// Displays the bytecode
  Bytecode {
    /// The file to print
    file: String,
  },
}

fn main() -> process::ExitCode {
  let args = App::parse();

  let result = match args.command {
    Some(Command::Run(options)) => commands::run(&options.file, options.debug, options.config()),
    Some(Command::Repl) | None => commands::repl(),
    Some(Command::Print { command }) => match command {
      PrintCommand::Tokens { file } => commands::print_tokens(&file),
      PrintCommand::Ast { file } => commands::print_ast(&file),
      PrintCommand::Bytecode { file } => commands::print_chunk(&file),
    },
  };

  match result {
    Ok(CommandStatus::Success) => process::ExitCode::from(0),
    Ok(CommandStatus::Failure) => process::ExitCode::from(1),
    Err(()) => process::ExitCode::from(2),
  }
}
