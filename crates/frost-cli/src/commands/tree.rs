//! Dump a program's parsed tree, one node per line, child-indented.

use frost_syntax::ast::{Expr, Program};
use frost_syntax::parser::parse_program;

use crate::cli::SourceArgs;
use crate::util::load_source;

pub fn run(args: SourceArgs) {
    let source = load_source(args.path.as_deref(), args.text.as_deref());
    match parse_program(&source) {
        Ok(program) => dump(&program),
        Err(e) => {
            eprintln!("error: {}", e.message);
            std::process::exit(1);
        }
    }
}

pub fn dump(program: &Program) {
    for stmt in &program.statements {
        print_node(stmt, 0);
    }
}

fn print_node(expr: &Expr, depth: usize) {
    println!("{}{}", "  ".repeat(depth), expr.label());
    for child in expr.children() {
        print_node(child, depth + 1);
    }
}
