//! docstore CLI entry point
//!
//! Parses arguments, dispatches to the CLI module, and on failure prints a
//! JSON error response and exits non-zero. All logic lives in `cli`.

use docstore::cli;

fn main() {
    if let Err(e) = cli::run() {
        if cli::write_error(e.code_str(), e.message()).is_err() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
