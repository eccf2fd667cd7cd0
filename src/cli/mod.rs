//! Command Line Interface (CLI) layer for closurec.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`): read inputs, compile once, print
//! diagnostics to stderr and code to stdout, and pick the exit status.
//!
//! If you are embedding closurec into another application, prefer using
//! the high-level `closurec::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
