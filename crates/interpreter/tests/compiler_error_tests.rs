//! # Compiler Error Tests
//!
//! Generates inputs (generally pathlogical input cases) which results in statements
//! failing to compile, and checks the rest of the program still compiles.

use jech_interpreter::{CompileError, Config, Instruction, MAX_PARAMETERS, compile};
use jech_syntax::parse;

fn integer_to_identifier(integer: u32) -> String {
  fn to_char(integer: u32) -> char {
    char::from_u32(u32::from('a') + integer).unwrap()
  }

  if integer >= 26 {
    let prefix = integer_to_identifier(integer / 26 - 1);
    format!("{prefix}{}", to_char(integer % 26))
  } else {
    to_char(integer).to_string()
  }
}

fn generate_says(count: usize) -> String {
  let mut source = String::new();
  for i in 0..count {
    source.push_str(&format!("say({i});\n"));
  }
  source
}

#[test]
#[cfg_attr(miri, ignore)] // reason: test has pathological input, so are very slow
fn too_many_instructions() {
  let limit = Config::default().instruction_limit;

  let source = generate_says(limit);
  let ast = parse(&source);
  let compilation = compile(&ast, &Config::default());
  assert!(compilation.is_valid());
  assert_eq!(compilation.chunk.len(), limit + 1);

  let source = generate_says(limit + 10);
  let ast = parse(&source);
  let compilation = compile(&ast, &Config::default());
  match compilation.errors.as_slice() {
    [CompileError::TooManyInstructions { position, .. }] => {
      assert_eq!(position.line, u32::try_from(limit).unwrap() + 1);
    }
    errors => panic!("Expected TooManyInstructions, got {errors:?}"),
  }
  assert_eq!(compilation.chunk.len(), limit + 1);
  assert_eq!(
    compilation.chunk.instructions().last(),
    Some(&Instruction::End)
  );
}

#[test]
fn too_many_instructions_keeps_whole_statements() {
  let config = Config {
    instruction_limit: 5,
    ..Config::default()
  };

  // the array needs four instructions, so the second doesn't fit
  let ast = parse("say(1); keep a = [1, 2, 3]; keep b = [4, 5, 6]; say(2);");
  let compilation = compile(&ast, &config);

  assert_eq!(compilation.errors.len(), 1);
  assert_eq!(compilation.chunk.len(), 6);
  assert!(matches!(
    compilation.chunk.get(4),
    Some(Instruction::ArrayPush { .. })
  ));
  assert_eq!(compilation.chunk.get(5), Some(&Instruction::End));
}

#[test]
fn too_many_parameters() {
  fn generate_function(count: u32) -> String {
    let parameters: Vec<_> = (0..count).map(integer_to_identifier).collect();
    format!("do f({}) {{ return; }}", parameters.join(", "))
  }

  let max = u32::try_from(MAX_PARAMETERS).unwrap();

  let source = generate_function(max);
  let ast = parse(&source);
  assert!(ast.is_valid());
  assert!(compile(&ast, &Config::default()).is_valid());

  let source = generate_function(max + 1);
  let ast = parse(&source);
  assert!(ast.is_valid());
  let compilation = compile(&ast, &Config::default());
  match compilation.errors.as_slice() {
    [CompileError::TooManyParameters { function, .. }] => assert_eq!(function, "f"),
    errors => panic!("Expected TooManyParameters, got {errors:?}"),
  }
  assert_eq!(compilation.chunk.len(), 1);
}

#[test]
fn too_many_arguments() {
  let arguments: Vec<_> = (0..=MAX_PARAMETERS).map(|i| i.to_string()).collect();
  let source = format!("f({}); say(1);", arguments.join(", "));

  let ast = parse(&source);
  assert!(ast.is_valid());
  let compilation = compile(&ast, &Config::default());
  match compilation.errors.as_slice() {
    [CompileError::TooManyArguments { function, .. }] => assert_eq!(function, "f"),
    errors => panic!("Expected TooManyArguments, got {errors:?}"),
  }
  assert!(matches!(compilation.chunk.get(0), Some(Instruction::Say(_))));
}

#[test]
fn return_outside_function() {
  let ast = parse("return 5;");
  let compilation = compile(&ast, &Config::default());

  match compilation.errors.as_slice() {
    [CompileError::ReturnOutsideFunction(position)] => assert_eq!(position.column, 1),
    errors => panic!("Expected ReturnOutsideFunction, got {errors:?}"),
  }
  assert_eq!(compilation.chunk.len(), 1);
}

#[test]
fn invalid_index() {
  let ast = parse("keep a = [1, 2]; say(a[1.5]);");
  let compilation = compile(&ast, &Config::default());

  match compilation.errors.as_slice() {
    [error @ CompileError::InvalidIndex { .. }] => {
      assert_eq!(error.title(), "Invalid Index");
      assert_eq!(
        error.message(),
        "array index `1.5` must be a whole number, starting from 0"
      );
    }
    errors => panic!("Expected InvalidIndex, got {errors:?}"),
  }
}

#[test]
fn number_too_large() {
  let huge = "1".repeat(400);
  let source = format!("keep x = {huge}; say(1); keep a = [1]; keep b = a.map(* {huge});");
  let ast = parse(&source);
  let compilation = compile(&ast, &Config::default());

  assert_eq!(compilation.errors.len(), 2);
  for error in &compilation.errors {
    assert!(matches!(error, CompileError::InvalidNumber { .. }));
    assert_eq!(error.title(), "Invalid Number");
  }
  assert_eq!(
    compilation.errors[0].message(),
    format!("`{huge}` can't be represented as a number")
  );

  // say, ArrayNew, ArrayPush, End
  assert_eq!(compilation.chunk.len(), 4);
}

#[test]
fn errors_in_function_bodies() {
  let ast = parse("do f() { say(a[0.5]); return; } f();");
  let compilation = compile(&ast, &Config::default());

  assert_eq!(compilation.errors.len(), 1);
  let function = compilation.chunk.chunks().next().unwrap();
  assert_eq!(function.len(), 2);
  assert!(matches!(function.get(0), Some(Instruction::Return(None))));
}
