//! Error type shared by both binaries.
//!
//! Every failure is folded into [`ToolError`] and reported once by
//! [`report`], which also picks the process exit code.

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Process exit codes, one per error category.
pub mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const VALIDATION: u8 = 2;
    pub const CHILD_PROCESS: u8 = 3;
    pub const TRANSFER: u8 = 4;
    pub const CONFIG: u8 = 5;
    pub const IO: u8 = 6;
}

#[derive(Error, Debug)]
pub enum ToolError {
    /// Bad command-line input: unknown keyword, missing option, bad platform.
    #[error("{0}")]
    Validation(String),

    /// A build script could not be started or exited unsuccessfully.
    #[error("script {script} {reason}")]
    ChildProcess { script: String, reason: String },

    /// A remote storage or chat API call failed.
    #[error("{operation} failed: {message}")]
    Transfer {
        operation: &'static str,
        message: String,
    },

    /// Missing or malformed settings and credentials.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = ToolError> = std::result::Result<T, E>;

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation(message.into())
    }

    pub fn transfer(operation: &'static str, message: impl Into<String>) -> Self {
        ToolError::Transfer {
            operation,
            message: message.into(),
        }
    }

    pub fn child_process(script: &str, reason: impl Into<String>) -> Self {
        ToolError::ChildProcess {
            script: script.to_string(),
            reason: reason.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::Validation(_) => exit_codes::VALIDATION,
            ToolError::ChildProcess { .. } => exit_codes::CHILD_PROCESS,
            ToolError::Transfer { .. } => exit_codes::TRANSFER,
            ToolError::Config(_) => exit_codes::CONFIG,
            ToolError::Io { .. } => exit_codes::IO,
        }
    }
}

/// Top-level handler: prints the error to stderr and maps it to an exit code.
pub fn report(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("❌ {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
