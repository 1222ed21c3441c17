// Build keywords and the shell scripts behind them
use crate::error::{Result, ToolError};
use crate::services::build::common::{ensure_script_exists, execute_command};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildCommand {
    MakeSdk,
    MakeProject,
    MakeIpa,
    LoadDropbox,
}

impl BuildCommand {
    pub fn all() -> impl Iterator<Item = BuildCommand> {
        [
            BuildCommand::MakeSdk,
            BuildCommand::MakeProject,
            BuildCommand::MakeIpa,
            BuildCommand::LoadDropbox,
        ]
        .into_iter()
    }

    pub fn keyword(self) -> &'static str {
        match self {
            BuildCommand::MakeSdk => "make_sdk",
            BuildCommand::MakeProject => "make_project",
            BuildCommand::MakeIpa => "make_ipa",
            BuildCommand::LoadDropbox => "load_dropbox",
        }
    }

    /// Script run for this keyword, relative to the scripts directory.
    /// `None` marks a recognised keyword that has no action yet.
    pub fn script(self) -> Option<&'static str> {
        match self {
            BuildCommand::MakeSdk => Some("build.sh"),
            BuildCommand::MakeProject => Some("makeProject.sh"),
            BuildCommand::MakeIpa => Some("arcApp.sh"),
            BuildCommand::LoadDropbox => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BuildCommand::MakeSdk => "Build the SDK artifact ready to hand over to a merchant",
            BuildCommand::MakeProject => "Generate the project file and resources",
            BuildCommand::MakeIpa => "Archive the test application with the SDK into an .ipa",
            BuildCommand::LoadDropbox => {
                "Send build files to Dropbox (not implemented, use spay-upload)"
            }
        }
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for BuildCommand {
    type Err = ToolError;

    fn from_str(keyword: &str) -> Result<Self> {
        BuildCommand::all()
            .find(|command| command.keyword() == keyword)
            .ok_or_else(|| {
                ToolError::validation(format!(
                    "Invalid command '{}', run spay-build --help for the list of commands",
                    keyword
                ))
            })
    }
}

/// Runs one named build script. Implemented by the shell runner and by test mocks.
#[cfg_attr(test, mockall::automock)]
pub trait ScriptRunner {
    fn run(&self, script: &str) -> Result<()>;
}

/// Runs `sh ./<script>` inside a scripts directory, inheriting stdio
pub struct ShellScriptRunner {
    dir: PathBuf,
}

impl ShellScriptRunner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ScriptRunner for ShellScriptRunner {
    fn run(&self, script: &str) -> Result<()> {
        ensure_script_exists(&self.dir.join(script), script)?;

        let shell = which::which("sh").map_err(|e| {
            ToolError::child_process(script, format!("could not be started: sh not found ({})", e))
        })?;

        let mut cmd = Command::new(shell);
        cmd.arg(format!("./{}", script)).current_dir(&self.dir);
        execute_command(cmd, script)
    }
}
