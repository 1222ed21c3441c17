// Dropbox HTTP API v2 client
use crate::config::Config;
use crate::error::{Result, ToolError};
use crate::services::storage::{EntryKind, RemoteEntry, Storage, UploadedFile};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Largest body accepted by `files/upload`; bigger files go through an upload session
pub const SINGLE_UPLOAD_LIMIT: usize = 150 * 1024 * 1024;
pub const SESSION_CHUNK_SIZE: usize = 32 * 1024 * 1024;

pub struct DropboxClient {
    client: Client,
    token: String,
    api_url: String,
    content_url: String,
}

#[derive(Serialize)]
struct CommitInfo<'a> {
    path: &'a str,
    mode: &'static str,
    autorename: bool,
    mute: bool,
}

impl<'a> CommitInfo<'a> {
    fn add(path: &'a str) -> Self {
        CommitInfo {
            path,
            mode: "add",
            autorename: false,
            mute: false,
        }
    }
}

#[derive(Serialize)]
struct PathArg<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct ContinueArg<'a> {
    cursor: &'a str,
}

#[derive(Serialize)]
struct SessionStartArg {
    close: bool,
}

#[derive(Serialize)]
struct SessionCursor<'a> {
    session_id: &'a str,
    offset: u64,
}

#[derive(Serialize)]
struct SessionAppendArg<'a> {
    cursor: SessionCursor<'a>,
    close: bool,
}

#[derive(Serialize)]
struct SessionFinishArg<'a> {
    cursor: SessionCursor<'a>,
    commit: CommitInfo<'a>,
}

#[derive(Deserialize)]
struct SessionStartResult {
    session_id: String,
}

#[derive(Deserialize)]
struct FileMetadata {
    name: String,
    #[serde(default)]
    path_display: Option<String>,
    #[serde(default)]
    size: u64,
}

#[derive(Deserialize)]
struct EntryFields {
    name: String,
    #[serde(default)]
    path_display: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = ".tag", rename_all = "lowercase")]
enum Metadata {
    File(EntryFields),
    Folder(EntryFields),
    Deleted(EntryFields),
}

impl From<Metadata> for RemoteEntry {
    fn from(metadata: Metadata) -> Self {
        let (kind, fields) = match metadata {
            Metadata::File(fields) => (EntryKind::File, fields),
            Metadata::Folder(fields) => (EntryKind::Folder, fields),
            Metadata::Deleted(fields) => (EntryKind::Deleted, fields),
        };
        RemoteEntry {
            path_display: fields.path_display.unwrap_or_else(|| fields.name.clone()),
            name: fields.name,
            kind,
        }
    }
}

#[derive(Deserialize)]
struct ListFolderResult {
    entries: Vec<Metadata>,
    cursor: String,
    has_more: bool,
}

#[derive(Deserialize)]
struct TemporaryLinkResult {
    link: String,
}

#[derive(Deserialize)]
struct ApiError {
    error_summary: String,
}

impl DropboxClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.dropbox_token()?.to_string();
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ToolError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(DropboxClient {
            client,
            token,
            api_url: config.dropbox_api_url.clone(),
            content_url: config.dropbox_content_url.clone(),
        })
    }

    /// JSON-body call against the RPC host
    fn rpc<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        endpoint: &str,
        arg: &impl Serialize,
    ) -> Result<T> {
        let url = format!("{}/2/{}", self.api_url, endpoint);
        tracing::debug!(operation, url = %url, "dropbox rpc request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(arg)
            .send()
            .map_err(|e| ToolError::transfer(operation, e.to_string()))?;

        handle_response(operation, response)
    }

    /// Octet-stream call against the content host, arguments in the `Dropbox-API-Arg` header
    fn content<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        endpoint: &str,
        arg: &impl Serialize,
        body: Vec<u8>,
    ) -> Result<T> {
        let url = format!("{}/2/{}", self.content_url, endpoint);
        let header = header_safe_json(arg)
            .map_err(|e| ToolError::transfer(operation, format!("failed to encode arguments: {}", e)))?;
        tracing::debug!(operation, url = %url, bytes = body.len(), "dropbox content request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Dropbox-API-Arg", header)
            .header("Content-Type", "application/octet-stream")
            .body(body)
            .send()
            .map_err(|e| ToolError::transfer(operation, e.to_string()))?;

        handle_response(operation, response)
    }

    fn upload_single(&self, remote_path: &str, contents: Vec<u8>) -> Result<FileMetadata> {
        self.content("upload", "files/upload", &CommitInfo::add(remote_path), contents)
    }

    fn upload_session(&self, remote_path: &str, contents: Vec<u8>) -> Result<FileMetadata> {
        let mut chunks: Vec<&[u8]> = contents.chunks(SESSION_CHUNK_SIZE).collect();
        let last: &[u8] = chunks.pop().unwrap_or_default();
        let first: &[u8] = if chunks.is_empty() { &[] } else { chunks.remove(0) };
        let middle: &[&[u8]] = &chunks;

        let started: SessionStartResult = self.content(
            "upload",
            "files/upload_session/start",
            &SessionStartArg { close: false },
            first.to_vec(),
        )?;
        let mut offset = first.len() as u64;
        tracing::info!(
            session_id = %started.session_id,
            total = contents.len(),
            chunks = middle.len() + 2,
            "upload session started"
        );

        for chunk in middle {
            let arg = SessionAppendArg {
                cursor: SessionCursor {
                    session_id: &started.session_id,
                    offset,
                },
                close: false,
            };
            let () = self.content("upload", "files/upload_session/append_v2", &arg, chunk.to_vec())?;
            offset += chunk.len() as u64;
        }

        let arg = SessionFinishArg {
            cursor: SessionCursor {
                session_id: &started.session_id,
                offset,
            },
            commit: CommitInfo::add(remote_path),
        };
        self.content("upload", "files/upload_session/finish", &arg, last.to_vec())
    }
}

impl Storage for DropboxClient {
    fn upload(&self, remote_path: &str, contents: Vec<u8>) -> Result<UploadedFile> {
        let size = contents.len();
        let metadata = if size <= SINGLE_UPLOAD_LIMIT {
            self.upload_single(remote_path, contents)?
        } else {
            self.upload_session(remote_path, contents)?
        };

        Ok(UploadedFile {
            path_display: metadata
                .path_display
                .unwrap_or_else(|| remote_path.to_string()),
            name: metadata.name,
            size: if metadata.size > 0 { metadata.size } else { size as u64 },
        })
    }

    fn list_folder(&self, remote_path: &str) -> Result<Vec<RemoteEntry>> {
        let mut page: ListFolderResult =
            self.rpc("list folder", "files/list_folder", &PathArg { path: remote_path })?;
        let mut entries: Vec<RemoteEntry> = Vec::new();

        loop {
            entries.extend(page.entries.into_iter().map(RemoteEntry::from));
            if !page.has_more {
                break;
            }
            tracing::debug!(fetched = entries.len(), "listing has more entries");
            page = self.rpc(
                "list folder",
                "files/list_folder/continue",
                &ContinueArg {
                    cursor: &page.cursor,
                },
            )?;
        }

        Ok(entries)
    }

    fn temporary_link(&self, remote_path: &str) -> Result<String> {
        let result: TemporaryLinkResult = self.rpc(
            "temporary link",
            "files/get_temporary_link",
            &PathArg { path: remote_path },
        )?;
        Ok(result.link)
    }
}

fn handle_response<T: DeserializeOwned>(operation: &'static str, response: Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| ToolError::transfer(operation, format!("failed to read response: {}", e)))?;
    tracing::debug!(operation, status = status.as_u16(), "dropbox response");

    if !status.is_success() {
        return Err(ToolError::transfer(
            operation,
            format!("HTTP {}: {}", status.as_u16(), error_summary(&body)),
        ));
    }

    serde_json::from_str(&body)
        .map_err(|e| ToolError::transfer(operation, format!("unexpected response: {}", e)))
}

/// Pull `error_summary` out of an API error body, falling back to the raw text
fn error_summary(body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(error) => error.error_summary,
        Err(_) if body.trim().is_empty() => "no details".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// Serialize to JSON that is safe inside an HTTP header: non-ASCII is `\u` escaped
fn header_safe_json(value: &impl Serialize) -> serde_json::Result<String> {
    let json = serde_json::to_string(value)?;
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    Ok(escaped)
}
