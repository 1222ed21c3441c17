//! spay-build
//! Runs the SPay SDK build scripts by keyword

use clap::Parser;
use spay_tools::commands::build::{BuildCli, handle_build};
use std::process::ExitCode;

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    spay_tools::logging::init();

    let cli = BuildCli::parse();
    spay_tools::error::report(handle_build(cli))
}
