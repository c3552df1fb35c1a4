//! # Command Runner
//!
//! Synchronous shell execution for the devstack CLI.
//!
//! This crate provides a clonable [`Command`] builder with two execution
//! modes (captured output and interactive passthrough) plus the
//! environment-file injection used to run service commands with their
//! per-service `.env` loaded.

#![warn(missing_docs)]

use thiserror::Error;

mod command;
mod env;

pub use command::Command;
pub use env::exec_with_env;

/// Command execution error types
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to spawn or wait for the process
    #[error("Failed to execute '{command}': {source}")]
    Io {
        /// Rendered command line
        command: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Process exited with a non-zero status
    #[error("Command '{command}' exited with status {code}")]
    NonZeroExit {
        /// Rendered command line
        command: String,
        /// Exit code (-1 when terminated by signal)
        code: i32,
    },

    /// Captured output was not valid UTF-8
    #[error("Command '{command}' produced non-UTF-8 output")]
    InvalidOutput {
        /// Rendered command line
        command: String,
    },
}

/// Result type for command execution
pub type Result<T> = std::result::Result<T, Error>;
