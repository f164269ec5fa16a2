//! Built-in surface: native-backed callables injected into the root
//! symbol table (§4.6 of the design).
//!
//! Contracts beyond arity are intentionally thin: the interpreter's job is
//! to enforce declared arity and let value-level errors (from `frost_core`
//! operator implementations) pass through unchanged.

mod combinators;
mod io;
mod json;
mod math;
mod operators;
mod predicates;
mod sequence;
mod text;

use std::fmt;
use std::rc::Rc;

use frost_core::error::{FrostError, Result};
use frost_core::symbol_table::SymbolTable;
use frost_core::value::{Callable, Value, ValueRef};

/// Declared arity of a builtin: `min` required arguments and an optional
/// `max` (`None` for unbounded, e.g. `zip`).
#[derive(Debug, Clone, Copy)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exact(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    fn check(&self, name: &str, nargs: usize) -> Result<()> {
        let ok = nargs >= self.min && match self.max {
            Some(m) => nargs <= m,
            None => true,
        };
        if ok {
            return Ok(());
        }
        let expect = match self.max {
            Some(m) if m == self.min => format!("exactly {}", self.min),
            Some(m) => format!("between {} and {m}", self.min),
            None => format!("at least {}", self.min),
        };
        Err(FrostError::recoverable(format!(
            "Function {name} called with {nargs} argument{} but expects {expect}",
            if nargs == 1 { "" } else { "s" }
        )))
    }
}

/// A stateless native function: a name (for arity errors and its lexical
/// form `<name>`), a declared arity, and a plain function pointer.
pub struct NativeFn {
    name: &'static str,
    arity: Arity,
    func: fn(&[ValueRef]) -> Result<ValueRef>,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").field("name", &self.name).finish()
    }
}

impl Callable for NativeFn {
    fn call(&self, args: &[ValueRef]) -> Result<ValueRef> {
        self.arity.check(self.name, args.len())?;
        (self.func)(args)
    }

    fn debug_dump(&self) -> String {
        format!("<{}>", self.name)
    }
}

/// Builds a [`Value::Function`] wrapping a stateless native callable.
fn native(name: &'static str, arity: Arity, func: fn(&[ValueRef]) -> Result<ValueRef>) -> ValueRef {
    Rc::new(Value::Function(Rc::new(NativeFn { name, arity, func })))
}

/// Defines every builtin name in `table`. Called once to build the root
/// scope a program (and every closure, transitively) sees as its
/// fallback chain.
pub fn install(table: &mut SymbolTable) -> Result<()> {
    predicates::install(table)?;
    operators::install(table)?;
    math::install(table)?;
    sequence::install(table)?;
    text::install(table)?;
    json::install(table)?;
    io::install(table)?;
    combinators::install(table)?;
    Ok(())
}

/// Narrows `v` to an array slice, or reports the type-mismatch error the
/// calling builtin should raise.
fn expect_array<'v>(v: &'v Value, who: &str) -> Result<&'v [ValueRef]> {
    match v {
        Value::Array(a) => Ok(a),
        other => Err(FrostError::recoverable(format!(
            "Function {who} expects an Array, got {}",
            frost_core::value::type_name(other)
        ))),
    }
}

fn expect_int(v: &Value, who: &str) -> Result<i64> {
    match v {
        Value::Int(i) => Ok(*i),
        other => Err(FrostError::recoverable(format!(
            "Function {who} expects an Int, got {}",
            frost_core::value::type_name(other)
        ))),
    }
}

fn expect_string<'v>(v: &'v Value, who: &str) -> Result<&'v str> {
    match v {
        Value::String(s) => Ok(s),
        other => Err(FrostError::recoverable(format!(
            "Function {who} expects a String, got {}",
            frost_core::value::type_name(other)
        ))),
    }
}
