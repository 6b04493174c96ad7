//! Session environment
//!
//! A flat, last-write-wins map from identifier to value. Bindings live for
//! the whole interpreter session; nothing is ever removed, only overwritten.
//! Function calls do not push entries here — the evaluator layers the single
//! parameter binding over this map instead.

use std::collections::HashMap;

use crate::value::Value;

/// Identifier → value bindings for one interpreter session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn insert(&mut self, name: String, value: Value) {
        self.bindings.insert(name, value);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings sorted by name, for stable listings.
    pub fn iter_sorted(&self) -> Vec<(&str, &Value)> {
        let mut entries: Vec<_> = self
            .bindings
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        entries.sort_by_key(|(name, _)| *name);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut env = Environment::new();
        env.insert("x".into(), Value::from_integer(1));
        env.insert("x".into(), Value::from_integer(2));
        assert_eq!(env.get("x"), Some(&Value::from_integer(2)));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn sorted_listing() {
        let mut env = Environment::new();
        env.insert("b".into(), Value::from_integer(1));
        env.insert("a".into(), Value::from_integer(2));
        let names: Vec<_> = env.iter_sorted().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
