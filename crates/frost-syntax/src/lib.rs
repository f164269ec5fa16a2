//! Lexer, AST, parser and free-variable analysis for Frost source text.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod ast;
pub mod free_vars;
pub mod lexer;
pub mod parser;

pub use ast::{Expr, ExprKind, Program};
pub use free_vars::{action_stream, analyze_closure, SymbolAction};
pub use parser::{parse_expr, parse_program};
