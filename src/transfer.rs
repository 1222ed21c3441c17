//! Artifact transfer workflow: where an artifact goes and what happens
//! around the upload.

use crate::error::{Result, ToolError};
use crate::services::notify::Notifier;
use crate::services::storage::{RemoteEntry, Storage, UploadedFile};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Target mobile OS; namespaces remote storage paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    IOS,
}

impl Platform {
    /// Name used in remote paths
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::IOS => "iOS",
        }
    }

    /// Remote folder holding every version for this platform
    pub fn folder(self) -> String {
        format!("/{}", self.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ToolError;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("android") {
            Ok(Platform::Android)
        } else if value.eq_ignore_ascii_case("ios") {
            Ok(Platform::IOS)
        } else {
            Err(ToolError::validation(format!(
                "Invalid OS name '{}', expected android or iOS (see --help)",
                value
            )))
        }
    }
}

/// One artifact upload: local file, platform and version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    local_path: PathBuf,
    platform: Platform,
    version: String,
    file_name: String,
}

impl TransferRequest {
    pub fn new(local_path: impl Into<PathBuf>, platform: Platform, version: &str) -> Result<Self> {
        let local_path = local_path.into();

        let version = version.trim();
        if version.is_empty() {
            return Err(ToolError::validation("Version must not be empty"));
        }
        if version.contains('/') || version == "." || version == ".." {
            return Err(ToolError::validation(format!(
                "Version '{}' must be a single path segment",
                version
            )));
        }

        let file_name = base_name(&local_path).ok_or_else(|| {
            ToolError::validation(format!(
                "Path '{}' does not name a file",
                local_path.display()
            ))
        })?;

        Ok(TransferRequest {
            local_path,
            platform,
            version: version.to_string(),
            file_name,
        })
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Destination in storage: `/<platform>/<version>/<basename>`
    pub fn remote_path(&self) -> String {
        format!("/{}/{}/{}", self.platform, self.version, self.file_name)
    }
}

/// Last component of the normalized path; trailing separators and `.` are ignored
fn base_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub uploaded: UploadedFile,
    pub destination: String,
    pub link: String,
}

/// Read the artifact, upload it, then fetch one temporary link for the fresh destination
pub fn upload_and_link(storage: &dyn Storage, request: &TransferRequest) -> Result<UploadOutcome> {
    let contents = std::fs::read(request.local_path()).map_err(|source| ToolError::Io {
        path: request.local_path().to_path_buf(),
        source,
    })?;

    let destination = request.remote_path();
    tracing::info!(
        local = %request.local_path().display(),
        destination = %destination,
        bytes = contents.len(),
        "uploading artifact"
    );

    let uploaded = storage.upload(&destination, contents)?;
    let link = storage.temporary_link(&destination)?;

    Ok(UploadOutcome {
        uploaded,
        destination,
        link,
    })
}

/// Everything uploaded for a platform
pub fn list_platform(storage: &dyn Storage, platform: Platform) -> Result<Vec<RemoteEntry>> {
    let folder = platform.folder();
    tracing::info!(folder = %folder, "listing platform folder");
    storage.list_folder(&folder)
}

/// Temporary link for an arbitrary remote path
pub fn link_for(storage: &dyn Storage, remote_path: &str) -> Result<String> {
    let remote_path = remote_path.trim();
    if remote_path.is_empty() {
        return Err(ToolError::validation("Remote path must not be empty"));
    }
    storage.temporary_link(remote_path)
}

pub fn notify(notifier: &dyn Notifier, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(ToolError::validation("Notification text must not be empty"));
    }
    notifier.send(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notify::MockNotifier;
    use crate::services::storage::{EntryKind, MockStorage};
    use mockall::Sequence;
    use std::io::Write;

    const DESTINATION: &str = "/android/1.2.3/app.ipa";

    fn uploaded(path: &str) -> UploadedFile {
        UploadedFile {
            name: "app.ipa".to_string(),
            path_display: path.to_string(),
            size: 7,
        }
    }

    fn artifact(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_remote_path_layout() {
        let request = TransferRequest::new("/tmp/app.ipa", Platform::Android, "1.2.3").unwrap();
        assert_eq!(request.remote_path(), DESTINATION);

        let request = TransferRequest::new("build/out/SPaySDK.xcframework.zip", Platform::IOS, "2.0")
            .unwrap();
        assert_eq!(request.remote_path(), "/iOS/2.0/SPaySDK.xcframework.zip");
    }

    #[test]
    fn test_remote_path_ignores_trailing_separator() {
        let request = TransferRequest::new("/tmp/builds/app.ipa/", Platform::Android, "1.2.3").unwrap();
        assert_eq!(request.remote_path(), DESTINATION);
    }

    #[test]
    fn test_request_validation() {
        assert!(matches!(
            TransferRequest::new("/tmp/app.ipa", Platform::IOS, "  "),
            Err(ToolError::Validation(_))
        ));
        assert!(matches!(
            TransferRequest::new("/tmp/app.ipa", Platform::IOS, "1/2"),
            Err(ToolError::Validation(_))
        ));
        for version in [".", "..", " .. "] {
            let err = TransferRequest::new("/tmp/app.ipa", Platform::Android, version).unwrap_err();
            assert!(matches!(err, ToolError::Validation(_)), "{version:?}");
        }
        assert!(TransferRequest::new("/tmp/app.ipa", Platform::Android, "1..2").is_ok());
        assert!(matches!(
            TransferRequest::new("/", Platform::IOS, "1.0"),
            Err(ToolError::Validation(_))
        ));
        assert!(matches!(
            TransferRequest::new("..", Platform::IOS, "1.0"),
            Err(ToolError::Validation(_))
        ));
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!("android".parse::<Platform>().unwrap(), Platform::Android);
        assert_eq!("Android".parse::<Platform>().unwrap(), Platform::Android);
        assert_eq!("iOS".parse::<Platform>().unwrap(), Platform::IOS);
        assert_eq!("ios".parse::<Platform>().unwrap(), Platform::IOS);
        assert_eq!(Platform::IOS.folder(), "/iOS");

        let err = "windows".parse::<Platform>().unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
    }

    /// The old guard required one string to equal both "android" and "iOS",
    /// so upload and list could never run. Platform resolves each on its own.
    #[test]
    fn test_dual_equality_guard_never_held() {
        let legacy_guard = |os: &str| os == "android" && os == "iOS";
        for os in ["android", "iOS", "ios", "Android", "", "androidiOS"] {
            assert!(!legacy_guard(os), "guard unexpectedly held for {os:?}");
        }

        assert!("android".parse::<Platform>().is_ok());
        assert!("iOS".parse::<Platform>().is_ok());
    }

    #[test]
    fn test_upload_then_exactly_one_link_for_destination() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("app.ipa");
        std::fs::write(&local, b"payload").unwrap();
        let request = TransferRequest::new(&local, Platform::Android, "1.2.3").unwrap();

        let mut storage = MockStorage::new();
        let mut seq = Sequence::new();
        storage
            .expect_upload()
            .withf(|path, contents| path.to_string() == DESTINATION && contents.as_slice() == b"payload")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|path, _| Ok(uploaded(path)));
        storage
            .expect_temporary_link()
            .withf(|path| path.to_string() == DESTINATION)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("https://dl.dropboxusercontent.com/apitl/1/abc".to_string()));
        storage.expect_list_folder().never();

        let outcome = upload_and_link(&storage, &request).unwrap();
        assert_eq!(outcome.destination, DESTINATION);
        assert_eq!(outcome.link, "https://dl.dropboxusercontent.com/apitl/1/abc");
        assert_eq!(outcome.uploaded.path_display, DESTINATION);
    }

    #[test]
    fn test_failed_upload_skips_link_and_returns_transfer_error() {
        let file = artifact(b"payload");
        let request = TransferRequest::new(file.path(), Platform::IOS, "1.0.0").unwrap();

        let mut storage = MockStorage::new();
        storage
            .expect_upload()
            .times(1)
            .returning(|_, _| Err(ToolError::transfer("upload", "HTTP 409: path/conflict/file/..")));
        storage.expect_temporary_link().never();

        let err = upload_and_link(&storage, &request).unwrap_err();
        assert!(matches!(err, ToolError::Transfer { .. }));
        assert_eq!(err.exit_code(), crate::error::exit_codes::TRANSFER);
        assert!(err.to_string().contains("path/conflict/file"));
    }

    #[test]
    fn test_missing_local_file_is_io_error_without_remote_calls() {
        let request =
            TransferRequest::new("/nonexistent/spay/app.ipa", Platform::Android, "1.2.3").unwrap();

        let mut storage = MockStorage::new();
        storage.expect_upload().never();
        storage.expect_temporary_link().never();

        let err = upload_and_link(&storage, &request).unwrap_err();
        assert!(matches!(err, ToolError::Io { .. }));
    }

    #[test]
    fn test_list_platform_uses_platform_folder() {
        let mut storage = MockStorage::new();
        storage
            .expect_list_folder()
            .withf(|path| path.to_string() == "/iOS")
            .times(1)
            .returning(|_| {
                Ok(vec![RemoteEntry {
                    name: "1.2.3".to_string(),
                    path_display: "/iOS/1.2.3".to_string(),
                    kind: EntryKind::Folder,
                }])
            });

        let entries = list_platform(&storage, Platform::IOS).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "1.2.3");
    }

    #[test]
    fn test_link_for_rejects_empty_path() {
        let mut storage = MockStorage::new();
        storage.expect_temporary_link().never();
        assert!(matches!(link_for(&storage, " "), Err(ToolError::Validation(_))));
    }

    #[test]
    fn test_link_for_passes_remote_path_through() {
        let mut storage = MockStorage::new();
        storage
            .expect_temporary_link()
            .withf(|path| path.to_string() == "/iOS/2.0/SPaySDK.zip")
            .times(1)
            .returning(|_| Ok("https://link".to_string()));
        assert_eq!(link_for(&storage, "/iOS/2.0/SPaySDK.zip").unwrap(), "https://link");
    }

    #[test]
    fn test_notify_sends_once() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .withf(|text| text.to_string() == "SDK 1.2.3 uploaded")
            .times(1)
            .returning(|_| Ok(()));
        notify(&notifier, "SDK 1.2.3 uploaded").unwrap();

        let mut silent = MockNotifier::new();
        silent.expect_send().never();
        assert!(matches!(notify(&silent, ""), Err(ToolError::Validation(_))));
    }
}
