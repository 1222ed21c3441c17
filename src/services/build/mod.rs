// Build script services

pub mod common;
pub mod scripts;

pub use scripts::{BuildCommand, ScriptRunner, ShellScriptRunner};

#[cfg(test)]
pub use scripts::MockScriptRunner;
