//! closurec CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, compile once,
//! and exit with the appropriate status. For programmatic use, prefer the
//! library API (`closurec::api`).

use std::process::ExitCode;

use clap::Parser;

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = cli::CliArgs::parse();
    match cli::run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("closurec: {}", e);
            ExitCode::FAILURE
        }
    }
}
