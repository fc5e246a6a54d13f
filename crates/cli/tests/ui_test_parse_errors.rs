//! # UI Tests for Parse Errors
#![cfg(not(miri))]

use assert_cmd::Command;
use indoc::indoc;

fn run(file: &str) -> (Option<i32>, String, String) {
  let output = Command::cargo_bin(env!("CARGO_PKG_NAME"))
    .unwrap()
    .args(["run", "-"])
    .write_stdin(file)
    .output()
    .unwrap();

  (
    output.status.code(),
    String::from_utf8(output.stdout).unwrap(),
    String::from_utf8(output.stderr).unwrap(),
  )
}

#[test]
fn expected_semicolon() {
  let (status, stdout, stderr) = run("say(5) say(6);");

  assert_eq!(status, Some(1));
  assert!(stdout.is_empty());
  assert_eq!(stderr, indoc! {"
    ✕ Syntax Error: Expected ;
    expected `;` after `say` statement but got `say`

        ╭─[STDIN:1]
      1 │ say(5) say(6);
    ────╯

    at line 1, column 8
    ✕ Syntax Error: No Valid Instructions
    no valid instructions found

  "});
}

#[test]
fn statements_before_error_run() {
  let (status, stdout, stderr) = run(indoc! {"
    say(1);
    keep = 5;
    say(2);
  "});

  assert_eq!(status, Some(1));
  assert_eq!(stdout, "1\n");
  assert_eq!(stderr, indoc! {"
    ✕ Syntax Error: Expected Identifier
    expected an identifier for the variable name after `keep` but got `=`

        ╭─[STDIN:2]
      2 │ keep = 5;
    ────╯

    at line 2, column 6
  "});
}

#[test]
fn unknown_statement() {
  let (status, _, stderr) = run("x;\n");

  assert_eq!(status, Some(1));
  assert_eq!(stderr, indoc! {"
    ✕ Syntax Error: Unknown Statement
    an identifier on its own is not a statement
    hint: did you mean to call it as a function `name(...);` or assign a value `name = ...;`?

        ╭─[STDIN:1]
      1 │ x;
    ────╯

    at line 1, column 1
    ✕ Syntax Error: No Valid Instructions
    no valid instructions found

  "});
}

#[test]
fn unknown_character() {
  let (status, stdout, stderr) = run("say(1); @\n");

  assert_eq!(status, Some(1));
  assert_eq!(stdout, "1\n");
  assert_eq!(stderr, indoc! {"
    ✕ Lexical Error: Unknown Character
    got unknown character

        ╭─[STDIN:1]
      1 │ say(1); @
    ────╯

    at line 1, column 9
  "});
}

#[test]
fn unterminated_string() {
  let (status, stdout, stderr) = run("say(1);\nsay(\"hello);\n");

  assert_eq!(status, Some(2));
  assert!(stdout.is_empty());
  assert_eq!(stderr, indoc! {r#"
    ✕ Lexical Error: Unterminated String
    missing closing quote for string

        ╭─[STDIN:2]
      2 │ say("hello);
    ────╯

    at line 2, column 5
  "#});
}

#[test]
fn empty_program() {
  let (status, stdout, stderr) = run("# nothing to see here\n");

  assert_eq!(status, Some(0));
  assert!(stdout.is_empty());
  assert!(stderr.is_empty());
}
