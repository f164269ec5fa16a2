//! Lexical scope: a name-to-value mapping with an optional read-only
//! fallback chain, searched on a local miss.

use indexmap::IndexMap;

use crate::error::{FrostError, Result};
use crate::value::ValueRef;

/// Anything that can answer a name lookup. Implemented by [`SymbolTable`];
/// kept as a trait so a fallback chain can cross an owned capture table
/// without threading its lifetime parameter through every frame above it.
pub trait Scope {
    fn lookup(&self, name: &str) -> Result<ValueRef>;
    fn has(&self, name: &str) -> bool;
}

/// One frame of the scope chain. A new frame is opened for the program
/// root, for each closure invocation, and for each block the evaluator
/// treats as a fresh scope.
#[derive(Debug, Default)]
pub struct SymbolTable<'a> {
    table: IndexMap<String, ValueRef>,
    fallback: Option<&'a dyn Scope>,
}

impl<'a> SymbolTable<'a> {
    pub fn new() -> Self {
        Self { table: IndexMap::new(), fallback: None }
    }

    pub fn with_fallback(fallback: &'a dyn Scope) -> Self {
        Self { table: IndexMap::new(), fallback: Some(fallback) }
    }

    /// Binds `name` in this frame. Redefining a name already present in
    /// this frame (not a parent) is an unrecoverable error.
    pub fn define(&mut self, name: &str, value: ValueRef) -> Result<()> {
        if self.table.contains_key(name) {
            return Err(FrostError::unrecoverable(format!(
                "Redefinition of '{name}' in the same scope"
            )));
        }
        self.table.insert(name.to_string(), value);
        Ok(())
    }

    /// Local-only membership test, for callers that must not consult the
    /// fallback chain (e.g. duplicate-parameter checks).
    pub fn has_local(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn debug_table(&self) -> &IndexMap<String, ValueRef> {
        &self.table
    }
}

impl<'a> Scope for SymbolTable<'a> {
    fn lookup(&self, name: &str) -> Result<ValueRef> {
        if let Some(value) = self.table.get(name) {
            return Ok(value.clone());
        }
        if let Some(fallback) = self.fallback {
            return fallback.lookup(name);
        }
        Err(FrostError::recoverable(format!("No definition found for symbol {name}")))
    }

    fn has(&self, name: &str) -> bool {
        self.has_local(name) || self.fallback.is_some_and(|f| f.has(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::rc::Rc;

    fn val(i: i64) -> ValueRef {
        Rc::new(Value::Int(i))
    }

    #[test]
    fn lookup_falls_back_to_parent_scope() {
        let mut parent = SymbolTable::new();
        parent.define("x", val(1)).unwrap();
        let child = SymbolTable::with_fallback(&parent);
        assert_eq!(child.lookup("x").unwrap().as_ref(), &Value::Int(1));
    }

    #[test]
    fn local_shadows_parent() {
        let mut parent = SymbolTable::new();
        parent.define("x", val(1)).unwrap();
        let mut child = SymbolTable::with_fallback(&parent);
        child.define("x", val(2)).unwrap();
        assert_eq!(child.lookup("x").unwrap().as_ref(), &Value::Int(2));
    }

    #[test]
    fn redefinition_in_same_frame_is_unrecoverable() {
        let mut table = SymbolTable::new();
        table.define("x", val(1)).unwrap();
        let err = table.define("x", val(2)).unwrap_err();
        assert_eq!(err.severity, crate::error::Severity::Unrecoverable);
    }

    #[test]
    fn missing_symbol_is_recoverable() {
        let table = SymbolTable::new();
        let err = table.lookup("missing").unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn has_consults_fallback_chain() {
        let mut parent = SymbolTable::new();
        parent.define("x", val(1)).unwrap();
        let child = SymbolTable::with_fallback(&parent);
        assert!(child.has("x"));
        assert!(!child.has("y"));
    }
}
