//! Source loading: a file path, `-` for stdin, or an inline `--text` flag.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

pub fn load_source(path: Option<&Path>, text: Option<&str>) -> String {
    if let Some(text) = text {
        return text.to_string();
    }
    match path {
        Some(path) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .expect("failed to read stdin");
            buf
        }
        Some(path) => fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("error: could not read {}: {e}", path.display());
            std::process::exit(2);
        }),
        None => {
            eprintln!("error: provide a source file, '-' for stdin, or --text");
            std::process::exit(2);
        }
    }
}
