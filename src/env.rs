use std::collections::BTreeMap;

use crate::{builtin::Builtin, value::Value};

/// The single flat scope symbols resolve against.
///
/// Values cross this boundary by copy in both directions, so a binding is
/// never shared with a value that is still being evaluated.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    bindings: BTreeMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// An environment with every builtin bound under its name.
    pub fn with_builtins() -> Self {
        let mut env = Self::new();
        for builtin in Builtin::ALL {
            env.put(builtin.name(), &Value::from(builtin));
        }
        env
    }

    pub fn get(&self, name: &str) -> Value {
        match self.bindings.get(name) {
            Some(value) => value.clone(),
            None => Value::error("unbound symbol!"),
        }
    }

    /// Binds a copy of `value`; the last write to a name wins.
    pub fn put(&mut self, name: &str, value: &Value) {
        let previous = self.bindings.insert(name.to_string(), value.clone());
        tracing::debug!(name, %value, overwritten = previous.is_some(), "put");
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}
