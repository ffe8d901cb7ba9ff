//! Test-only binary for CLI integration tests. Tracing isn't initialized here,
//! so stderr contains only the error chain and tests can match it exactly.

use doccgen_cli::{Args, print_error};
use std::process::ExitCode;

fn main() -> ExitCode {
    match Args::parse().execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print_error(&error);
            ExitCode::FAILURE
        }
    }
}
