//! Lintel - Plugin-driven static analysis for source code

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = lintel::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
