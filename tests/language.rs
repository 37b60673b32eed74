use lispy::{Builtin, Interpreter, Repl, Value};
use pretty_assertions::assert_eq;

fn eval_all(lines: &[&str]) -> Vec<String> {
    let mut interpreter = Interpreter::new();
    lines
        .iter()
        .map(|line| match interpreter.eval_line(line) {
            Ok(value) => value.to_string(),
            Err(e) => format!("parse error: {e}"),
        })
        .collect()
}

#[test]
fn documented_examples() {
    assert_eq!(
        eval_all(&[
            "(+ 1 2 3)",
            "(- 5)",
            "(- 5 3 1)",
            "(/ 1 0)",
            "(list 1 2 3)",
            "(head {1 2 3})",
            "(tail {1 2 3})",
            "(join {1 2} {3 4})",
            "(eval (list + 1 2))",
        ]),
        vec![
            "6",
            "-5",
            "1",
            "Error: Divsion By Zero!",
            "{1 2 3}",
            "{1}",
            "{2 3}",
            "{1 2 3 4}",
            "3",
        ]
    );
}

#[test]
fn builtin_errors_keep_their_wording() {
    assert_eq!(
        eval_all(&[
            "head {}",
            "tail {}",
            "eval {}",
            "head 1",
            "tail (list 1) 2",
            "eval 3",
            "join {1} 2",
            "+ 1 {2}",
            "foo",
            "(1 2)",
            "+ 1 123456789012345678901234567890",
        ]),
        vec![
            "Error: Function 'head' passed {}!",
            "Error: Function 'tail' passed {}!",
            "Error: Function 'eval' passed {}!",
            "Error: Function 'head' passed incorrect type!",
            "Error: Function 'tail' passed too many arguments!",
            "Error: Function 'eval' passed incorrect type!",
            "Error: Function 'join' passed incorrect type.",
            "Error: Cannot operate on non_number!",
            "Error: unbound symbol!",
            "Error: first element is not a function",
            "Error: invalid number",
        ]
    );
}

#[test]
fn quoted_code_is_data_until_evaluated() {
    assert_eq!(
        eval_all(&[
            "{+ 1 (undefined)}",
            "eval {+ 1 (* 2 3)}",
            "eval (join {+} {1 2} (list (- 10 4)))",
            "head (list head tail)",
            "eval (join (head (list head tail)) {{4 5}})",
        ]),
        vec!["{+ 1 (undefined)}", "7", "9", "{<function>}", "{4}"]
    );
}

#[test]
fn parse_failures_are_reported_separately() {
    let results = eval_all(&["(+ 1 2", "1 2)", "#", ""]);
    assert!(results.iter().all(|result| result.starts_with("parse error")));
}

#[test]
fn interpreter_environment_is_shared_across_lines() {
    let mut interpreter = Interpreter::new();
    interpreter
        .environment_mut()
        .put("xs", &Value::QExpr(vec![Value::Number(4), Value::Number(2)]));

    assert_eq!(interpreter.eval_line("head xs").expect("parses").to_string(), "{4}");
    assert_eq!(interpreter.eval_line("tail xs").expect("parses").to_string(), "{2}");
    assert_eq!(interpreter.eval_line("xs").expect("parses").to_string(), "{4 2}");
    assert_eq!(
        interpreter.environment().get("head"),
        Value::Function(Builtin::Head)
    );
}

#[test]
fn repl_session() {
    let input = "list 1 2\n(tail {1})\n(+ 1\neval {- 5}\n";
    let mut repl = Repl::new(input.as_bytes(), Vec::new());
    repl.run().expect("in-memory io");

    assert_eq!(repl.history().len(), 4);
    assert_eq!(repl.interpreter().environment().len(), Builtin::ALL.len());

    let output = String::from_utf8(repl.into_output()).expect("utf-8 output");
    assert!(output.starts_with("Lispy Version 0.1\nPress Ctrl+c to Exit\n\n"));
    assert!(output.contains("Lispy> {1 2}\n"));
    assert!(output.contains("Lispy> {}\n"));
    assert!(output.contains("Lispy> -5\n"));
    assert_eq!(output.matches("Lispy> ").count(), 5);
}
