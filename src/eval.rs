use miette::Error;

use crate::{Parser, env::Environment, read::read, value::Value};

/// Reduces `value` to normal form.
///
/// Symbols are looked up, S-Expressions are applied, and everything else,
/// Q-Expressions included, is already reduced.
pub fn eval(env: &mut Environment, value: Value) -> Value {
    match value {
        Value::Symbol(name) => env.get(&name),
        Value::SExpr(cells) => eval_sexpr(env, cells),
        other => other,
    }
}

#[tracing::instrument(level = "trace", skip_all, fields(len = cells.len()))]
fn eval_sexpr(env: &mut Environment, cells: Vec<Value>) -> Value {
    let cells = cells.into_iter().map(|cell| eval(env, cell)).collect();
    let mut v = Value::SExpr(cells);

    let error_at = v.cells().and_then(|cells| cells.iter().position(Value::is_error));
    if let Some(error) = error_at.and_then(|i| v.extract(i)) {
        return error;
    }

    let Some(first) = v.extract(0) else {
        return v;
    };
    if v.count() == 0 {
        return first;
    }

    match first {
        Value::Function(builtin) => builtin.apply(env, v),
        _ => Value::error("first element is not a function"),
    }
}

/// Owns the global environment for the lifetime of a session.
pub struct Interpreter {
    environment: Environment,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            environment: Environment::with_builtins(),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Parses, reads and evaluates one line. `Err` only ever carries a
    /// parse diagnostic; evaluation failures come back as error values.
    pub fn eval_line(&mut self, line: &str) -> Result<Value, Error> {
        let ast = Parser::new(Some("<stdin>"), line).parse()?;
        Ok(eval(&mut self.environment, read(&ast)))
    }
}
