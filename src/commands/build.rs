// Build command handler - delegates to the build script services
use crate::error::{Result, ToolError};
use crate::services::build::{BuildCommand, ScriptRunner, ShellScriptRunner};
use clap::Parser;
use std::path::PathBuf;

const LONG_ABOUT: &str = "Utility for working with the SPay SDK.

Commands:
  make_sdk      Build the SDK artifact ready to hand over to a merchant
  make_project  Generate the project file and resources
  make_ipa      Archive the test application with the SDK into an .ipa
  load_dropbox  Send build files to Dropbox (not implemented, use spay-upload)";

#[derive(Parser, Debug)]
#[command(name = "spay-build", version)]
#[command(about = "Run SPay SDK build scripts", long_about = LONG_ABOUT)]
pub struct BuildCli {
    /// Command keyword: make_sdk, make_project, make_ipa or load_dropbox
    #[arg(required_unless_present = "list")]
    pub command: Option<String>,

    /// Directory containing build.sh, makeProject.sh and arcApp.sh
    #[arg(long, env = "SPAY_SCRIPTS_DIR", default_value = ".")]
    pub scripts_dir: PathBuf,

    /// Print the command keywords and the scripts they run
    #[arg(long)]
    pub list: bool,
}

pub fn handle_build(cli: BuildCli) -> Result<()> {
    if cli.list {
        print_commands();
        return Ok(());
    }

    let keyword = cli
        .command
        .ok_or_else(|| ToolError::validation("No command given, run spay-build --help"))?;
    let runner = ShellScriptRunner::new(cli.scripts_dir);
    dispatch(&keyword, &runner)
}

/// Resolve the keyword and run at most one script for it
pub fn dispatch(keyword: &str, runner: &dyn ScriptRunner) -> Result<()> {
    let command: BuildCommand = keyword.parse()?;

    match command.script() {
        Some(script) => {
            println!("🚀 Run {}", script);
            runner.run(script)?;
            println!("✓ {} complete", command);
        }
        None => {
            tracing::warn!(command = %command, "command has no implementation");
            println!("⚠️  {} is not implemented yet", command);
        }
    }

    Ok(())
}

fn print_commands() {
    for command in BuildCommand::all() {
        let script = command.script().unwrap_or("-");
        println!("{:<14} {:<16} {}", command.keyword(), script, command.description());
    }
}
