//! spay-upload
//! Publishes SPay SDK build files to Dropbox and the team chat

use clap::Parser;
use spay_tools::commands::upload::{UploadCli, handle_upload};
use std::process::ExitCode;

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    spay_tools::logging::init();

    let cli = UploadCli::parse();
    spay_tools::error::report(handle_upload(cli))
}
