//! # UI Tests for Debug Print Commands
#![cfg(not(miri))]

use assert_cmd::Command;
use indoc::indoc;

fn print(kind: &str, file: &str) -> String {
  let output = Command::cargo_bin(env!("CARGO_PKG_NAME"))
    .unwrap()
    .args(["print", kind, file])
    .output()
    .unwrap();

  assert!(output.status.success());
  assert!(output.stderr.is_empty());
  String::from_utf8(output.stdout).unwrap()
}

#[test]
fn tokens_hello_example() {
  let output = print("tokens", "../../demos/hello.jc");

  assert_eq!(output, indoc! {r#"
            ╭─[Tokens: ../../demos/hello.jc]
        1:1 │ say
        1:4 │ (
        1:5 │ String ("Hello, World!")
       1:20 │ )
       1:21 │ ;
        2:1 │ End of File
    ────────╯
  "#});
}

#[test]
fn ast_hello_example() {
  let output = print("ast", "../../demos/hello.jc");

  assert_eq!(output, indoc! {r#"
    ╭─[Abstract Syntax Tree: ../../demos/hello.jc]
    ├─ Say
    │  ╰─ String "Hello, World!"
    ╯
  "#});
}

#[test]
fn ast_functions_example() {
  let output = print("ast", "../../demos/functions.jc");

  assert!(output.contains("├─ Function (square)"));
  assert!(output.contains("├─ Keep (result)"));
  assert!(output.contains("Call (sumOfSquares)"));
}

#[test]
fn bytecode_hello_example() {
  let output = print("bytecode", "../../demos/hello.jc");

  assert_eq!(output, indoc! {r#"
          ╭─[Bytecode: main]
     0000 │ Say "Hello, World!"
     0001 │ End
    ──────╯
  "#});
}

#[test]
fn bytecode_functions_example() {
  let output = print("bytecode", "../../demos/functions.jc");

  assert!(output.contains("╭─[Bytecode: main]"));
  assert!(output.contains("FunctionDecl square(n)"));
  assert!(output.contains("FunctionCall keep result = sumOfSquares(3, 4)"));
  assert!(output.contains("╭─[Bytecode: square]"));
  assert!(output.contains("Return n * n"));
  assert!(output.contains("╭─[Bytecode: greet]"));
}

#[test]
fn print_stdin() {
  let output = Command::cargo_bin(env!("CARGO_PKG_NAME"))
    .unwrap()
    .args(["print", "bytecode", "-"])
    .write_stdin("keep a = [1, 2]; keep b = a.map(* 2);")
    .output()
    .unwrap();

  assert!(output.status.success());
  assert_eq!(String::from_utf8(output.stdout).unwrap(), indoc! {"
          ╭─[Bytecode: main]
     0000 │ ArrayNew keep a
     0001 │ ArrayPush a 1
     0002 │ ArrayPush a 2
     0003 │ Map keep b = a.map(* 2)
     0004 │ End
    ──────╯
  "});
}
