//! Parse a program and report errors, without evaluating it.

use frost_syntax::parser::parse_program;

use crate::cli::SourceArgs;
use crate::util::load_source;

pub fn run(args: SourceArgs) {
    let source = load_source(args.path.as_deref(), args.text.as_deref());
    if let Err(e) = parse_program(&source) {
        eprintln!("error: {}", e.message);
        std::process::exit(1);
    }
    // Silent on success, like cargo check.
}
