//! Argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "frost", about = "Interpreter for the Frost expression language")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a program and print its result and exports.
    Run(SourceArgs),
    /// Parse a program and report errors, without evaluating it.
    Check(SourceArgs),
    /// Dump a program's parsed tree.
    Tree(SourceArgs),
}

#[derive(clap::Args)]
pub struct SourceArgs {
    /// Source file, or '-' for stdin.
    pub path: Option<PathBuf>,

    /// Inline program text, instead of a file.
    #[arg(long)]
    pub text: Option<String>,

    /// Use the pretty multi-line form for printed values.
    #[arg(long)]
    pub pretty: bool,
}
