// Command handlers, one module per binary
//
// spay-build  -> build::handle_build
// spay-upload -> upload::handle_upload

pub mod build;
pub mod upload;
