// SPay SDK release tooling
// Build script dispatch and artifact transfer, shared by the spay-build and spay-upload binaries

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod services;
pub mod transfer;

pub use error::{Result, ToolError};
