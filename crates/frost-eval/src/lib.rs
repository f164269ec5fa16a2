#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Tree-walking evaluator, closures, and the built-in surface for Frost.

pub mod builtins;
pub mod closure;
pub mod evaluator;

pub use closure::Closure;
pub use evaluator::{
    call_function, evaluate, evaluate_body, execute_program, execute_statement, values_equal,
    ProgramOutcome, StatementOutcome,
};
