use crate::{
    parse::{Ast, Tag},
    value::Value,
};

/// Converts a parse tree into a value tree.
///
/// The root and every `(...)` become S-Expressions, `{...}` becomes a
/// Q-Expression, and bracket or anchor nodes are dropped.
pub fn read(ast: &Ast<'_>) -> Value {
    match ast.tag {
        Tag::Number => read_number(ast.contents),
        Tag::Symbol => Value::symbol(ast.contents),
        Tag::Root | Tag::SExpr => read_children(Value::sexpr(), ast),
        Tag::QExpr => read_children(Value::qexpr(), ast),
        // syntax carries nothing; reading it on its own yields ()
        Tag::Delimiter | Tag::Anchor => Value::sexpr(),
    }
}

fn read_children(list: Value, ast: &Ast<'_>) -> Value {
    ast.children
        .iter()
        .filter(|child| !child.is_syntax())
        .fold(list, |list, child| list.push(read(child)))
}

/// Base-10 signed integer; anything out of `i64` range is an error value.
pub fn read_number(text: &str) -> Value {
    match text.parse::<i64>() {
        Ok(n) => Value::Number(n),
        Err(_) => Value::error("invalid number"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::Parser;

    fn read_str(input: &str) -> Value {
        read(&Parser::new(None, input).parse().expect("parses"))
    }

    #[test]
    fn root_becomes_sexpr() {
        assert_eq!(
            read_str("+ 1 -2"),
            Value::SExpr(vec![
                Value::symbol("+"),
                Value::Number(1),
                Value::Number(-2)
            ])
        );
    }

    #[test]
    fn nesting_and_order() {
        assert_eq!(
            read_str("(head {1 (x)})"),
            Value::SExpr(vec![Value::SExpr(vec![
                Value::symbol("head"),
                Value::QExpr(vec![
                    Value::Number(1),
                    Value::SExpr(vec![Value::symbol("x")]),
                ]),
            ])])
        );
    }

    #[test]
    fn overflow_is_an_error_value() {
        assert_eq!(read_number("9223372036854775807"), Value::Number(i64::MAX));
        assert_eq!(read_number("-9223372036854775808"), Value::Number(i64::MIN));
        assert_eq!(
            read_number("9223372036854775808"),
            Value::error("invalid number")
        );
        assert_eq!(
            read_str("(+ 1 99999999999999999999)").to_string(),
            "((+ 1 Error: invalid number))"
        );
    }

    #[test]
    fn delimiters_read_alone_are_empty() {
        let ast = Parser::new(None, "()").parse().expect("parses");
        assert_eq!(read(&ast.children[0]), Value::sexpr());
    }

    proptest! {
        #[test]
        fn every_i64_reads_back(n in any::<i64>()) {
            prop_assert_eq!(read_number(&n.to_string()), Value::Number(n));
        }
    }
}
