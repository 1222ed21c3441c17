//! Remote artifact storage.
//!
//! [`Storage`] is the seam between the transfer workflow and the provider
//! API, so the workflow can be exercised against a mock.

pub mod dropbox;

use crate::error::Result;

pub use dropbox::DropboxClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
    Deleted,
}

/// One entry of a remote folder listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub path_display: String,
    pub kind: EntryKind,
}

/// Metadata of a file after a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub path_display: String,
    pub size: u64,
}

#[cfg_attr(test, mockall::automock)]
pub trait Storage {
    /// Store `contents` at `remote_path`. An existing file is never overwritten.
    fn upload(&self, remote_path: &str, contents: Vec<u8>) -> Result<UploadedFile>;

    /// List every entry directly under `remote_path`.
    fn list_folder(&self, remote_path: &str) -> Result<Vec<RemoteEntry>>;

    /// Issue a time-limited download link for `remote_path`.
    fn temporary_link(&self, remote_path: &str) -> Result<String>;
}
