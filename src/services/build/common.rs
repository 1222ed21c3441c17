// Common build utilities
use crate::error::{Result, ToolError};
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Execute a command and check its status, returning an error if it fails
pub fn execute_command(mut cmd: Command, script: &str) -> Result<()> {
    tracing::debug!(command = ?cmd, "spawning build script");
    let status = cmd
        .status()
        .map_err(|e| ToolError::child_process(script, format!("could not be started: {}", e)))?;

    tracing::info!(script, status = %status, "build script finished");
    if !status.success() {
        return Err(ToolError::child_process(script, describe_failure(status)));
    }
    Ok(())
}

/// Check that a script exists before handing it to the shell
pub fn ensure_script_exists(path: &Path, script: &str) -> Result<()> {
    if !path.is_file() {
        return Err(ToolError::child_process(
            script,
            format!("not found at {}", path.display()),
        ));
    }
    Ok(())
}

fn describe_failure(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exited with code {}", code),
        None => "was terminated by a signal".to_string(),
    }
}
