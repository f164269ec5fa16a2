#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Value model, lexical scope, and error taxonomy shared by the Frost
//! parser, evaluator and CLI.

pub mod error;
pub mod symbol_table;
pub mod value;

pub use error::{FrostError, Result, Severity};
pub use symbol_table::{Scope, SymbolTable};
pub use value::{deep_equal, type_name, Callable, FrostMap, Value, ValueRef};
