use std::fmt::Display;

use crate::builtin::Builtin;

/// Every datum the language can express or produce.
///
/// Sequences own their cells outright, so handing a value to two parents
/// requires an explicit [`Clone`], which is always a deep copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Error(String),
    Number(i64),
    Symbol(String),
    Function(Builtin),
    /// Evaluated by application.
    SExpr(Vec<Value>),
    /// Left untouched by evaluation.
    QExpr(Vec<Value>),
}

impl Value {
    pub fn error(message: impl Into<String>) -> Self {
        Value::Error(message.into())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn sexpr() -> Self {
        Value::SExpr(Vec::new())
    }

    pub fn qexpr() -> Self {
        Value::QExpr(Vec::new())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_qexpr(&self) -> bool {
        matches!(self, Value::QExpr(_))
    }

    pub fn cells(&self) -> Option<&[Value]> {
        match self {
            Value::SExpr(cells) | Value::QExpr(cells) => Some(cells),
            _ => None,
        }
    }

    pub fn cells_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::SExpr(cells) | Value::QExpr(cells) => Some(cells),
            _ => None,
        }
    }

    /// Number of cells; zero for anything that is not a sequence.
    pub fn count(&self) -> usize {
        self.cells().map_or(0, <[Value]>::len)
    }

    /// Appends `value` as the last cell. Scalars are returned unchanged.
    pub fn push(mut self, value: Value) -> Self {
        if let Some(cells) = self.cells_mut() {
            cells.push(value);
        }
        self
    }

    /// Removes the cell at `index`, shifting the later cells down.
    ///
    /// The container stays alive and one cell shorter. Returns `None` when
    /// `self` is not a sequence or `index` is out of range.
    pub fn extract(&mut self, index: usize) -> Option<Value> {
        let cells = self.cells_mut()?;
        (index < cells.len()).then(|| cells.remove(index))
    }

    /// Like [`Value::extract`], but consumes the container.
    pub fn take(mut self, index: usize) -> Option<Value> {
        self.extract(index)
    }

    /// Moves every cell of `other` onto the end of `self`.
    pub fn join(mut self, mut other: Value) -> Value {
        if let (Some(into), Some(from)) = (self.cells_mut(), other.cells_mut()) {
            into.append(from);
        }
        self
    }

    /// Relabels an S-Expression as a Q-Expression; cells are untouched.
    pub fn into_qexpr(self) -> Value {
        match self {
            Value::SExpr(cells) => Value::QExpr(cells),
            other => other,
        }
    }

    /// Relabels a Q-Expression as an S-Expression; cells are untouched.
    pub fn into_sexpr(self) -> Value {
        match self {
            Value::QExpr(cells) => Value::SExpr(cells),
            other => other,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<Builtin> for Value {
    fn from(builtin: Builtin) -> Self {
        Value::Function(builtin)
    }
}

struct Cells<'a>(&'a [Value], char, char);

impl Display for Cells<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Cells(cells, open, close) = self;
        write!(f, "{open}")?;
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{cell}")?;
        }
        write!(f, "{close}")
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Error(message) => write!(f, "Error: {message}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Symbol(name) => write!(f, "{name}"),
            Value::Function(_) => write!(f, "<function>"),
            Value::SExpr(cells) => write!(f, "{}", Cells(cells, '(', ')')),
            Value::QExpr(cells) => write!(f, "{}", Cells(cells, '{', '}')),
        }
    }
}
