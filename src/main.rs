//! Planline - timeline and rollup views for local project snapshots

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = planline::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
