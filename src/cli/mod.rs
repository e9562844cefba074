//! Line-oriented shell over [`ExpenseTracker`](crate::core::tracker::ExpenseTracker).

pub mod output;
pub mod shell;
pub mod shell_context;
pub mod table;
pub mod views;

use thiserror::Error;

use crate::errors::LedgerError;

pub use shell::run_cli;
pub use shell_context::{CliMode, LoopControl, ShellContext};

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
