//! gh-template CLI entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    match gh_template::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
