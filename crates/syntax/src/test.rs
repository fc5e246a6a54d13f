use crate::{
  ParseError, Position, Token, TokenKind,
  ast::{AST, Statement},
};
use indoc::indoc;

fn parse(source: &str) -> AST<'_> {
  crate::parse(source)
}
impl AST<'_> {
  fn is_ok(&self) -> bool {
    self.errors.is_empty()
  }

  fn is_err(&self) -> bool {
    !self.is_ok()
  }
}

fn parse_to_string(source: &str) -> String {
  crate::parse(source).to_string()
}

fn kinds(source: &str) -> Vec<TokenKind> {
  crate::lex(source).into_iter().map(|token| token.kind).collect()
}

mod tokeniser {
  use super::*;

  #[test]
  fn always_ends_with_single_end_of_file() {
    for source in ["", "   ", "say(1);", "# comment", "\"unterminated", "¬¬"] {
      let tokens: Vec<Token> = crate::tokenise(source).collect();

      assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfFile));
      assert_eq!(
        tokens
          .iter()
          .filter(|t| t.kind == TokenKind::EndOfFile)
          .count(),
        1
      );
      assert!(
        tokens
          .iter()
          .all(|t| t.length > 0 || t.kind == TokenKind::EndOfFile)
      );
    }
  }

  #[test]
  fn keywords_and_identifiers() {
    assert_eq!(
      kinds("say keep when else map do return true false sayx x1"),
      vec![
        TokenKind::Say,
        TokenKind::Keep,
        TokenKind::When,
        TokenKind::Else,
        TokenKind::Map,
        TokenKind::Do,
        TokenKind::Return,
        TokenKind::True,
        TokenKind::False,
        TokenKind::Identifier,
        TokenKind::Identifier,
        TokenKind::EndOfFile,
      ]
    );
  }

  #[test]
  fn punctuation_and_operators() {
    assert_eq!(
      kinds("( ) { } [ ] , . ; + - * / = == > <"),
      vec![
        TokenKind::LeftParen,
        TokenKind::RightParen,
        TokenKind::LeftCurly,
        TokenKind::RightCurly,
        TokenKind::LeftSquare,
        TokenKind::RightSquare,
        TokenKind::Comma,
        TokenKind::Dot,
        TokenKind::Semicolon,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Equal,
        TokenKind::EqualEqual,
        TokenKind::Greater,
        TokenKind::Less,
        TokenKind::EndOfFile,
      ]
    );
  }

  #[test]
  fn numbers() {
    let source = "42 2.5 1. 3.14.15";
    let tokens: Vec<Token> = crate::tokenise(source).collect();
    let texts: Vec<&str> = tokens.iter().map(|t| t.text(source)).collect();

    assert_eq!(texts, vec!["42", "2.5", "1", ".", "3.14", ".", "15", ""]);
  }

  #[test]
  fn strings_span_lines_without_escapes() {
    let source = "\"hello\nworld\" \"a\\\"";
    let tokens: Vec<Token> = crate::tokenise(source).collect();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text(source), "\"hello\nworld\"");
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].text(source), "\"a\\\"");
  }

  #[test]
  fn comments_are_skipped() {
    assert_eq!(
      kinds("# a comment\nsay // another\n;"),
      vec![TokenKind::Say, TokenKind::Semicolon, TokenKind::EndOfFile]
    );
  }

  #[test]
  fn lines_and_columns() {
    let tokens: Vec<Token> = crate::tokenise("keep x = 1;\n  say(x);").collect();

    assert_eq!(tokens[0].position(), Position::new(1, 1));
    assert_eq!(tokens[1].position(), Position::new(1, 6));
    assert_eq!(tokens[4].position(), Position::new(1, 11));
    assert_eq!(tokens[5].position(), Position::new(2, 3));
    assert_eq!(tokens[6].position(), Position::new(2, 6));
  }

  #[test]
  fn columns_count_characters() {
    let tokens: Vec<Token> = crate::tokenise("\"é\" ¬ x").collect();

    assert_eq!(tokens[1].kind, TokenKind::Unknown);
    assert_eq!(tokens[1].position(), Position::new(1, 5));
    assert_eq!(tokens[2].position(), Position::new(1, 7));
  }

  #[test]
  fn unknown_characters_continue() {
    assert_eq!(
      kinds("say $ 🤗 ;"),
      vec![
        TokenKind::Say,
        TokenKind::Unknown,
        TokenKind::Unknown,
        TokenKind::Semicolon,
        TokenKind::EndOfFile
      ]
    );
  }
}

#[test]
fn empty_source() {
  assert!(parse("").is_ok());
  assert!(parse("   \n\n  ").is_ok());
  assert!(parse("# just a comment").is_ok());
  assert!(parse("").is_empty());
  assert!(parse("").root_statements.is_empty());
}

#[test]
fn unterminated_string() {
  let ast = parse("say(\"unterminated);");
  assert!(ast.is_err());
  assert!(ast.has_fatal_error());
  assert!(ast.root_statements.is_empty());
  assert!(matches!(ast.errors[0], ParseError::UnterminatedString(_)));

  assert!(parse("say(\"\");").is_ok());
}

#[test]
fn unknown_character() {
  let ast = parse("say(1); $ say(2);");
  assert!(ast.is_err());
  assert!(!ast.has_fatal_error());
  assert_eq!(ast.errors.len(), 1);
  assert!(ast.errors[0].is_lexical());
  assert_eq!(ast.root_statements.len(), 1);

  // Having unknown characters in strings are fine
  assert!(parse("say(\"¬\");").is_ok());
  assert!(parse("say(\"🤗\");").is_ok());
}

#[test]
fn say() {
  let ast = parse_to_string("say(\"Hello, World!\");");
  let expected = indoc! {r#"
    ├─ Say
    │  ╰─ String "Hello, World!"
  "#};
  assert_eq!(ast, expected);

  let ast = parse_to_string("say(42); say(true); say(x);");
  let expected = indoc! {"
    ├─ Say
    │  ╰─ Number (42)
    ├─ Say
    │  ╰─ Boolean (true)
    ├─ Say
    │  ╰─ Variable (x)
  "};
  assert_eq!(ast, expected);
}

#[test]
fn say_binary() {
  let ast = parse_to_string("say(a * 2.5);");
  let expected = indoc! {"
    ├─ Say
    │  ╰─ Binary (*)
    │     ├─ Variable (a)
    │     ╰─ Number (2.5)
  "};
  assert_eq!(ast, expected);
}

#[test]
fn say_indexed() {
  let ast = parse("say(numbers[2]);");
  assert!(matches!(ast.root_statements[0], Statement::SayIndexed(_)));

  let expected = indoc! {"
    ├─ Say
    │  ╰─ Index
    │     ├─ Variable (numbers)
    │     ╰─ Number (2)
  "};
  assert_eq!(ast.to_string(), expected);
}

#[test]
fn say_missing_parts() {
  assert!(parse("say 5;").is_err());
  assert!(parse("say(5;").is_err());
  assert!(parse("say(5)").is_err());
  assert!(parse("say();").is_err());
  assert!(parse("say(a[x]);").is_err());
  assert!(parse("say(1 +);").is_err());
}

#[test]
fn keep() {
  let ast = parse_to_string("keep x = 10; keep name = \"Jech\";");
  let expected = indoc! {r#"
    ├─ Keep (x)
    │  ╰─ Number (10)
    ├─ Keep (name)
    │  ╰─ String "Jech"
  "#};
  assert_eq!(ast, expected);
}

#[test]
fn keep_array() {
  let ast = parse_to_string("keep mixed = [42, \"text\", true]; keep empty = [];");
  let expected = indoc! {r#"
    ├─ Keep (mixed)
    │  ╰─ Array
    │     ├─ Number (42)
    │     ├─ String "text"
    │     ╰─ Boolean (true)
    ├─ Keep (empty)
    │  ╰─ Array
  "#};
  assert_eq!(ast, expected);
}

#[test]
fn keep_array_errors() {
  let ast = parse("keep a = [1 2];");
  assert!(matches!(ast.errors[0], ParseError::ExpectedSeparator { .. }));

  let ast = parse("keep a = [1, x];");
  assert!(matches!(ast.errors[0], ParseError::InvalidArrayElement(_)));

  let ast = parse("keep a = [1,];");
  assert!(matches!(ast.errors[0], ParseError::InvalidArrayElement(_)));
}

#[test]
fn keep_initializers() {
  let ast = parse_to_string(indoc! {"
    keep a = b + 1;
    keep c = d.map(* 2);
    keep e = f[0];
    keep g = add(1, h);
  "});
  let expected = indoc! {"
    ├─ Keep (a)
    │  ╰─ Binary (+)
    │     ├─ Variable (b)
    │     ╰─ Number (1)
    ├─ Keep (c)
    │  ╰─ Map (*)
    │     ├─ Variable (d)
    │     ╰─ Number (2)
    ├─ Keep (e)
    │  ╰─ Index
    │     ├─ Variable (f)
    │     ╰─ Number (0)
    ├─ Keep (g)
    │  ╰─ Call (add)
    │     ├─ Number (1)
    │     ╰─ Variable (h)
  "};
  assert_eq!(ast, expected);
}

#[test]
fn keep_missing_parts() {
  assert!(parse("keep = 5;").is_err());
  assert!(parse("keep x 5;").is_err());
  assert!(parse("keep x = ;").is_err());
  assert!(parse("keep x = 5").is_err());
  assert!(parse("keep x = y.map(2);").is_err());
  assert!(parse("keep x = y.map(+ z);").is_err());
}

#[test]
fn assignment() {
  let ast = parse_to_string("x = 2; list = [1];");
  let expected = indoc! {"
    ├─ Assign (x)
    │  ╰─ Number (2)
    ├─ Assign (list)
    │  ╰─ Array
    │     ╰─ Number (1)
  "};
  assert_eq!(ast, expected);
}

#[test]
fn when() {
  let ast = parse_to_string("when (x > 5) { say(x); } else { say(0); }");
  let expected = indoc! {"
    ├─ When
    │  ├─ Condition
    │  │  ╰─ Comparison (>)
    │  │     ├─ Variable (x)
    │  │     ╰─ Number (5)
    │  ├─ Then
    │  │  ╰─ Say
    │  │     ╰─ Variable (x)
    │  ╰─ Else
    │     ╰─ Say
    │        ╰─ Number (0)
  "};
  assert_eq!(ast, expected);
}

#[test]
fn when_truthy_without_else() {
  let ast = parse_to_string("when (ready) { keep y = 1; }");
  let expected = indoc! {"
    ├─ When
    │  ├─ Condition
    │  │  ╰─ Variable (ready)
    │  ╰─ Then
    │     ╰─ Keep (y)
    │        ╰─ Number (1)
  "};
  assert_eq!(ast, expected);

  assert!(parse("when (true) { say(1); }").is_ok());
  assert!(parse("when (x == \"a\") { say(1); }").is_ok());
}

#[test]
fn when_errors() {
  let ast = parse("when (5) { say(1); }");
  assert!(matches!(ast.errors[0], ParseError::ExpectedCondition(_)));

  let ast = parse("when (x) { x = 1; }");
  assert!(matches!(ast.errors[0], ParseError::ExpectedAction(_)));

  assert!(parse("when (x) { say(1); say(2); }").is_err());
  assert!(parse("when (x) say(1);").is_err());
  assert!(parse("when x { say(1); }").is_err());
}

#[test]
fn map_statement() {
  let ast = parse_to_string("numbers.map(+ 1);");
  let expected = indoc! {"
    ├─ Map (+)
    │  ├─ Variable (numbers)
    │  ╰─ Number (1)
  "};
  assert_eq!(ast, expected);

  let ast = parse("numbers.map(% 1);");
  assert!(ast.is_err());
}

#[test]
fn function_declaration() {
  let ast = parse_to_string(indoc! {"
    do add(a, b) {
      keep total = a + b;
      return total;
    }
  "});
  let expected = indoc! {"
    ├─ Function (add)
    │  ├─ Parameters
    │  │  ├─ Variable (a)
    │  │  ╰─ Variable (b)
    │  ╰─ Body
    │     ├─ Keep (total)
    │     │  ╰─ Binary (+)
    │     │     ├─ Variable (a)
    │     │     ╰─ Variable (b)
    │     ╰─ Return
    │        ╰─ Variable (total)
  "};
  assert_eq!(ast, expected);
}

#[test]
fn function_declaration_empty() {
  let ast = parse("do nothing() {} say(1);");
  assert!(ast.is_ok());
  assert_eq!(ast.root_statements.len(), 2);

  let Statement::FunctionDecl(function) = &ast.root_statements[0] else {
    panic!("expected function declaration");
  };
  assert!(function.parameters.is_empty());
  assert!(function.body.is_empty());
}

#[test]
fn function_declaration_nested_braces() {
  let ast = parse("do check(x) { when (x) { say(1); } say(2); } say(3);");
  assert!(ast.is_ok());
  assert_eq!(ast.root_statements.len(), 2);

  let Statement::FunctionDecl(function) = &ast.root_statements[0] else {
    panic!("expected function declaration");
  };
  assert_eq!(function.body.len(), 2);
}

#[test]
fn function_declaration_errors() {
  let ast = parse("do broken(a) { say(a);");
  assert!(matches!(ast.errors[0], ParseError::UnmatchedBrace(_)));

  let ast = parse("do f(1) {}");
  assert!(matches!(ast.errors[0], ParseError::Expected { .. }));

  let ast = parse("say(0); do f() { say(1) } say(2);");
  assert_eq!(ast.errors.len(), 1);
  assert_eq!(ast.root_statements.len(), 1);
  assert_eq!(ast.errors[0].token().kind, TokenKind::RightCurly);
}

#[test]
fn function_body_errors_name_the_closing_brace() {
  let ast = parse("do f() { say(1) }");
  assert_eq!(ast.errors[0].position(), Position::new(1, 17));
  assert_eq!(
    ast.errors[0].message(),
    "expected `;` after `say` statement but got `}`"
  );

  let ast = parse("do f() { keep x = }");
  assert_eq!(
    ast.errors[0].message(),
    "expected a string, number, boolean or variable but got `}`"
  );

  let ast = parse("do f() {\n  do g() { say(1);\n}");
  assert!(matches!(ast.errors[0], ParseError::UnmatchedBrace(_)));
}

#[test]
fn function_call() {
  let ast = parse_to_string("greet(\"World\"); tick();");
  let expected = indoc! {r#"
    ├─ Call (greet)
    │  ╰─ String "World"
    ├─ Call (tick)
  "#};
  assert_eq!(ast, expected);

  let ast = parse("greet([1]);");
  assert!(matches!(ast.errors[0], ParseError::InvalidArgument(_)));

  assert!(parse("greet(1)").is_err());
}

#[test]
fn return_statement() {
  let ast = parse_to_string("return; return 1; return a - b;");
  let expected = indoc! {"
    ├─ Return
    ├─ Return
    │  ╰─ Number (1)
    ├─ Return
    │  ╰─ Binary (-)
    │     ├─ Variable (a)
    │     ╰─ Variable (b)
  "};
  assert_eq!(ast, expected);

  assert!(parse("return )").is_err());
  assert!(parse("return 1").is_err());
}

#[test]
fn unknown_statement() {
  let ast = parse("x;");
  assert!(matches!(ast.errors[0], ParseError::UnknownStatement(_)));
  assert!(ast.errors[0].suggestion().is_some());

  let ast = parse("5;");
  assert!(matches!(ast.errors[0], ParseError::ExpectedStatement(_)));
}

#[test]
fn parsing_stops_at_first_error() {
  let ast = parse("say(1); say(2) say(3);");

  assert_eq!(ast.root_statements.len(), 1);
  assert_eq!(ast.errors.len(), 1);
  assert_eq!(ast.errors[0].position(), Position::new(1, 16));
  assert_eq!(
    ast.errors[0].message(),
    "expected `;` after `say` statement but got `say`"
  );
}

#[test]
fn error_positions() {
  let ast = parse("keep x = 1;\nkeep y = ;");

  assert_eq!(ast.errors[0].position(), Position::new(2, 10));
  assert_eq!(ast.errors[0].title(), "Expected Value");
}

#[test]
fn deterministic() {
  let source = "keep a = [1, 2]; a.map(* 3); when (a) { say(a); }";
  assert_eq!(parse(source).root_statements, parse(source).root_statements);
}
