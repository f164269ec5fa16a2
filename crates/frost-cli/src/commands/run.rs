//! Evaluate a program and print its result and exports.
//!
//! `PARSE_TREE=true` switches this driver to dumping the parse tree
//! instead of evaluating it, per the env var documented for the debug
//! driver.

use std::rc::Rc;

use frost_core::symbol_table::SymbolTable;
use frost_core::value::{FrostMap, Value};
use frost_eval::{builtins, execute_program};
use frost_syntax::parser::parse_program;

use crate::cli::SourceArgs;
use crate::util::load_source;

pub fn run(args: SourceArgs) {
    let source = load_source(args.path.as_deref(), args.text.as_deref());
    tracing::debug!(bytes = source.len(), "loaded source");

    let program = match parse_program(&source) {
        Ok(program) => program,
        Err(e) => {
            tracing::warn!(severity = %e.severity, "parse failed");
            eprintln!("error: {}", e.message);
            std::process::exit(1);
        }
    };

    if std::env::var("PARSE_TREE").as_deref() == Ok("true") {
        tracing::debug!("PARSE_TREE=true, dumping parse tree instead of evaluating");
        super::tree::dump(&program);
        return;
    }

    let mut root = SymbolTable::new();
    if let Err(e) = builtins::install(&mut root) {
        eprintln!("error: {}", e.message);
        std::process::exit(1);
    }

    match execute_program(&program, &mut root) {
        Ok(outcome) => {
            println!("{}", outcome.value.to_internal_string(args.pretty));
            if !outcome.exports.is_empty() {
                let mut export_map = FrostMap::new();
                for (name, value) in outcome.exports {
                    export_map
                        .insert(Rc::new(Value::String(Rc::from(name.as_str()))), value)
                        .expect("export names are always string keys");
                }
                let exports = Value::Map(Rc::new(export_map));
                println!("{}", exports.to_internal_string(args.pretty));
            }
        }
        Err(e) => {
            tracing::warn!(severity = %e.severity, "evaluation failed");
            eprintln!("error: {}", e.message);
            std::process::exit(1);
        }
    }
}
