use std::{fmt::Display, str::FromStr};

use thiserror::Error;

use crate::{
    env::Environment,
    eval::eval,
    value::Value,
};

/// Returns an error value, discarding `args`, when `cond` does not hold.
macro_rules! ensure {
    ($args:ident, $cond:expr, $err:expr) => {
        if !($cond) {
            drop($args);
            return Value::error($err);
        }
    };
}

/// The closed set of primitive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    List,
    Head,
    Tail,
    Eval,
    Join,
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no builtin named `{0}`")]
pub struct UnknownBuiltin(pub String);

impl Builtin {
    pub const ALL: [Builtin; 9] = [
        Builtin::List,
        Builtin::Head,
        Builtin::Tail,
        Builtin::Eval,
        Builtin::Join,
        Builtin::Add,
        Builtin::Sub,
        Builtin::Mul,
        Builtin::Div,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::List => "list",
            Builtin::Head => "head",
            Builtin::Tail => "tail",
            Builtin::Eval => "eval",
            Builtin::Join => "join",
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::Div => "/",
        }
    }

    pub fn lookup(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    /// Applies the builtin to an argument list. The arguments are consumed
    /// whether or not the call succeeds.
    pub fn apply(self, env: &mut Environment, args: Value) -> Value {
        tracing::debug!(builtin = self.name(), %args, "apply");
        match self {
            Builtin::List => list(env, args),
            Builtin::Head => head(env, args),
            Builtin::Tail => tail(env, args),
            Builtin::Eval => eval_builtin(env, args),
            Builtin::Join => join(env, args),
            Builtin::Add | Builtin::Sub | Builtin::Mul | Builtin::Div => op(env, args, self),
        }
    }
}

impl FromStr for Builtin {
    type Err = UnknownBuiltin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Builtin::lookup(s).ok_or_else(|| UnknownBuiltin(s.to_string()))
    }
}

impl Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Dispatches by name through the builtin table.
pub fn call(env: &mut Environment, name: &str, args: Value) -> Value {
    match name.parse::<Builtin>() {
        Ok(builtin) => builtin.apply(env, args),
        Err(_) => Value::error("Unknown Function!"),
    }
}

pub fn list(_: &mut Environment, args: Value) -> Value {
    args.into_qexpr()
}

pub fn head(_: &mut Environment, args: Value) -> Value {
    ensure!(args, args.count() == 1, "Function 'head' passed too many arguments!");
    ensure!(
        args,
        args.cells().is_some_and(|cells| cells[0].is_qexpr()),
        "Function 'head' passed incorrect type!"
    );
    ensure!(
        args,
        args.cells().is_some_and(|cells| cells[0].count() != 0),
        "Function 'head' passed {}!"
    );

    let Some(mut v) = args.take(0) else {
        return Value::error("Function 'head' passed {}!");
    };
    if let Some(cells) = v.cells_mut() {
        cells.truncate(1);
    }
    v
}

pub fn tail(_: &mut Environment, args: Value) -> Value {
    ensure!(args, args.count() == 1, "Function 'tail' passed too many arguments!");
    ensure!(
        args,
        args.cells().is_some_and(|cells| cells[0].is_qexpr()),
        "Function 'tail' passed incorrect type!"
    );
    ensure!(
        args,
        args.cells().is_some_and(|cells| cells[0].count() != 0),
        "Function 'tail' passed {}!"
    );

    let Some(mut v) = args.take(0) else {
        return Value::error("Function 'tail' passed {}!");
    };
    v.extract(0);
    v
}

pub fn eval_builtin(env: &mut Environment, args: Value) -> Value {
    ensure!(args, args.count() == 1, "Function 'eval' passed too many arguments!");
    ensure!(
        args,
        args.cells().is_some_and(|cells| cells[0].is_qexpr()),
        "Function 'eval' passed incorrect type!"
    );
    ensure!(
        args,
        args.cells().is_some_and(|cells| cells[0].count() != 0),
        "Function 'eval' passed {}!"
    );

    match args.take(0) {
        Some(x) => eval(env, x.into_sexpr()),
        None => Value::error("Function 'eval' passed {}!"),
    }
}

pub fn join(_: &mut Environment, mut args: Value) -> Value {
    ensure!(
        args,
        args.cells()
            .is_some_and(|cells| cells.iter().all(Value::is_qexpr)),
        "Function 'join' passed incorrect type."
    );

    let Some(mut x) = args.extract(0) else {
        return Value::error("Function 'join' passed no arguments!");
    };
    while let Some(y) = args.extract(0) {
        x = x.join(y);
    }
    x
}

fn op(_: &mut Environment, mut args: Value, builtin: Builtin) -> Value {
    ensure!(
        args,
        args.cells()
            .is_some_and(|cells| cells.iter().all(|cell| matches!(cell, Value::Number(_)))),
        "Cannot operate on non_number!"
    );

    let Some(Value::Number(mut x)) = args.extract(0) else {
        return Value::error(format!("Function '{builtin}' passed no arguments!"));
    };

    if builtin == Builtin::Sub && args.count() == 0 {
        x = x.wrapping_neg();
    }

    while let Some(Value::Number(y)) = args.extract(0) {
        x = match builtin {
            Builtin::Add => x.wrapping_add(y),
            Builtin::Sub => x.wrapping_sub(y),
            Builtin::Mul => x.wrapping_mul(y),
            Builtin::Div => {
                if y == 0 {
                    return Value::error("Divsion By Zero!");
                }
                x.wrapping_div(y)
            }
            _ => unreachable!("only arithmetic builtins fold numbers"),
        };
    }

    Value::Number(x)
}
