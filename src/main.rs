//! apodcache - Content-Addressed APOD Image Cache
//!
//! Entry point for the apodcache CLI application.

use apodcache::{cli::Cli, error::ExitCode};
use clap::Parser;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Run the application logic
    match apodcache::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
