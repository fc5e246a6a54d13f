//! # Runtime Tests
//!
//! Check that the output of the interpreted code is correct.

use indoc::indoc;
use jech_interpreter::{Captured, Config, Embedded, OUTPUT_CAPACITY, Outcome, Session};

fn run(source: &str) -> Result<String, Captured> {
  let mut session = Session::new(Config::default());
  let mut context = Captured::new();

  match session.evaluate(source, &mut context) {
    Outcome::Completed => Ok(context.output),
    _ => Err(context),
  }
}

#[test]
fn hello_world() {
  assert_eq!(run("say(\"Hello, World!\");").unwrap(), "Hello, World!\n");
}

#[test]
fn variables() {
  assert_eq!(
    run("keep x = 10; keep y = 20; say(x); say(y);").unwrap(),
    "10\n20\n"
  );
}

#[test]
fn array_indexing() {
  assert_eq!(
    run("keep arr = [100, 200, 300]; say(arr[0]); say(arr[1]); say(arr[2]);").unwrap(),
    "100\n200\n300\n"
  );
}

#[test]
fn mixed_arrays() {
  assert_eq!(
    run("keep mixed = [42, \"text\", true]; say(mixed[0]); say(mixed[1]); say(mixed[2]);")
      .unwrap(),
    "42\ntext\ntrue\n"
  );
}

#[test]
fn reassignment() {
  assert_eq!(
    run("keep x = 1; say(x); x = 2; say(x); x = 3; say(x);").unwrap(),
    "1\n2\n3\n"
  );
}

#[test]
fn multiline_program() {
  let source = indoc! {r#"
    # a small program
    keep prices = [10, 20, 30];
    keep taxed = prices.map(* 2);   // doubled
    say(taxed);

    do describe(price) {
      when (price > 15) { say("expensive"); } else { say("cheap"); }
      return;
    }

    keep first = prices[0];
    describe(first);
    keep last = taxed[2];
    describe(last);
  "#};

  assert_eq!(run(source).unwrap(), "[20, 40, 60]\ncheap\nexpensive\n");
}

#[test]
fn nested_calls() {
  let source = indoc! {"
    do square(n) {
      return n * n;
    }
    do sumOfSquares(a, b) {
      keep x = square(a);
      keep y = square(b);
      return x + y;
    }
    keep result = sumOfSquares(3, 4);
    say(result);
  "};

  assert_eq!(run(source).unwrap(), "25\n");
}

#[test]
fn unbounded_recursion_stops() {
  let context = run("do forever(n) { forever(n); } forever(1); say(2);").unwrap_err();

  assert_eq!(context.output, "");
  assert_eq!(context.diagnostics.len(), 1);
  assert_eq!(
    context.diagnostics[0].location().unwrap(),
    "in function 'forever' at line 1, column 17"
  );
}

#[test]
fn runtime_error_continues() {
  let context = run("say(1); say(missing); say(2);").unwrap_err();

  assert_eq!(context.output, "1\n2\n");
  assert_eq!(context.diagnostics.len(), 1);
  assert_eq!(
    context.diagnostics[0].to_string(),
    "[Runtime Error] at line 1, column 9: variable `missing` is not defined"
  );
}

#[test]
fn lexical_errors() {
  let context = run("say(1); @ say(2);").unwrap_err();
  assert_eq!(context.output, "1\n");
  assert_eq!(context.diagnostics[0].category(), "Lexical Error");

  let context = run("say(\"unterminated);").unwrap_err();
  assert_eq!(context.output, "");
  assert_eq!(context.diagnostics.len(), 1);
}

#[test]
fn embedded() {
  let mut interpreter = Embedded::new();

  assert_eq!(interpreter.execute("say(\"Hello, World!\");"), "Hello, World!\n");
  assert_eq!(interpreter.execute(""), "Error: Empty source code");
  assert_eq!(interpreter.execute("say 5"), "Error: Failed to parse code");
  assert!(!interpreter.diagnostics().is_empty());

  assert_eq!(interpreter.execute("keep x = 3;"), "");
  assert!(interpreter.diagnostics().is_empty());
  assert_eq!(interpreter.execute("say(x);"), "3\n");

  interpreter.clear_state();
  assert_eq!(interpreter.execute("say(x);"), "");
  assert_eq!(
    interpreter.diagnostics(),
    ["[Runtime Error] at line 1, column 1: variable `x` is not defined"]
  );

  assert_eq!(Embedded::version(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn embedded_output_is_capped() {
  let mut interpreter = Embedded::new();

  let source = "say(\"0123456789\");\n".repeat(2000);
  let output = interpreter.execute(&source);
  assert_eq!(output.len(), OUTPUT_CAPACITY);

  let mut interpreter = Embedded::with_capacity(Config::default(), 5);
  assert_eq!(interpreter.execute("say(\"añb\");"), "añb\n");
  assert_eq!(interpreter.execute("say(\"aaaañ\");"), "aaaa");
}
