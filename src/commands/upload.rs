// Upload command handler - artifact transfer and chat notifications
use crate::config::Config;
use crate::error::{Result, ToolError};
use crate::services::notify::TelegramNotifier;
use crate::services::storage::{DropboxClient, EntryKind};
use crate::transfer::{self, Platform, TransferRequest};
use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const LONG_ABOUT: &str = "Utility for publishing SPay SDK build files.

Methods:
  load    Upload --path to Dropbox under /<mob-os>/<v>/ and print a temporary link
  v       Show every uploaded version for --mob-os
  link    Print a temporary link for the remote --path
  notify  Post the --notify text to the team chat

Credentials are read from DROPBOX_ACCESS_TOKEN, TELEGRAM_BOT_TOKEN and
TELEGRAM_CHAT_ID (a .env file in the working directory is loaded first).";

#[derive(Parser, Debug)]
#[command(name = "spay-upload", version)]
#[command(about = "Publish SPay SDK build files", long_about = LONG_ABOUT)]
pub struct UploadCli {
    /// Method: load, v, link or notify
    pub method: String,

    /// Local file to upload (load) or remote path (link)
    #[arg(long)]
    pub path: Option<String>,

    /// OS: android or iOS
    #[arg(long = "mob-os")]
    pub mob_os: Option<String>,

    /// Application version
    #[arg(long = "v", value_name = "VERSION")]
    pub app_version: Option<String>,

    /// Message to post to the team chat (notify, or after a successful load)
    #[arg(long)]
    pub notify: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMethod {
    Load,
    Versions,
    Link,
    Notify,
}

impl TransferMethod {
    pub fn keyword(self) -> &'static str {
        match self {
            TransferMethod::Load => "load",
            TransferMethod::Versions => "v",
            TransferMethod::Link => "link",
            TransferMethod::Notify => "notify",
        }
    }
}

impl fmt::Display for TransferMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for TransferMethod {
    type Err = ToolError;

    fn from_str(keyword: &str) -> Result<Self> {
        match keyword {
            "load" => Ok(TransferMethod::Load),
            "v" => Ok(TransferMethod::Versions),
            "link" => Ok(TransferMethod::Link),
            "notify" => Ok(TransferMethod::Notify),
            other => Err(ToolError::validation(format!(
                "Invalid method '{}', run spay-upload --help for the list of methods",
                other
            ))),
        }
    }
}

/// A fully validated request, built before any file or network access
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadAction {
    /// Upload, then post the optional message once the link is known
    Load(TransferRequest, Option<String>),
    List(Platform),
    Link(String),
    /// `None` keeps the method a no-op
    Notify(Option<String>),
}

impl TryFrom<&UploadCli> for UploadAction {
    type Error = ToolError;

    fn try_from(cli: &UploadCli) -> Result<Self> {
        let method: TransferMethod = cli.method.parse()?;

        match method {
            TransferMethod::Load => {
                let path = required(&cli.path, "--path", method)?;
                let platform = platform(cli, method)?;
                let version = required(&cli.app_version, "--v", method)?;
                let request = TransferRequest::new(PathBuf::from(path), platform, version)?;
                Ok(UploadAction::Load(request, message(cli)))
            }
            TransferMethod::Versions => {
                reject_notify(cli, method)?;
                Ok(UploadAction::List(platform(cli, method)?))
            }
            TransferMethod::Link => {
                reject_notify(cli, method)?;
                let path = required(&cli.path, "--path", method)?;
                Ok(UploadAction::Link(path.to_string()))
            }
            TransferMethod::Notify => Ok(UploadAction::Notify(message(cli))),
        }
    }
}

fn message(cli: &UploadCli) -> Option<String> {
    cli.notify
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

// Only load and notify post to the chat
fn reject_notify(cli: &UploadCli, method: TransferMethod) -> Result<()> {
    match cli.notify {
        Some(_) => Err(ToolError::validation(format!(
            "Method '{}' does not accept --notify",
            method
        ))),
        None => Ok(()),
    }
}

fn required<'a>(value: &'a Option<String>, flag: &str, method: TransferMethod) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ToolError::validation(format!("Method '{}' requires {}", method, flag)))
}

fn platform(cli: &UploadCli, method: TransferMethod) -> Result<Platform> {
    required(&cli.mob_os, "--mob-os", method)?.parse()
}

pub fn handle_upload(cli: UploadCli) -> Result<()> {
    let action = UploadAction::try_from(&cli)?;

    if let UploadAction::Notify(None) = action {
        tracing::info!("notify called without a message, nothing to send");
        return Ok(());
    }

    let config = Config::from_env()?;
    execute(action, &config)
}

/// Run a validated action against the live services
pub fn execute(action: UploadAction, config: &Config) -> Result<()> {
    match action {
        UploadAction::Load(request, message) => {
            let storage = DropboxClient::from_config(config)?;
            let notifier = match message {
                Some(_) => Some(TelegramNotifier::from_config(config)?),
                None => None,
            };
            println!("✅ Connected to Dropbox");
            let outcome = transfer::upload_and_link(&storage, &request)?;
            println!(
                "🌐 Uploaded {} ({} bytes) to {}",
                request.local_path().display(),
                outcome.uploaded.size,
                outcome.destination
            );
            println!("🔗 Link: {}", outcome.link);

            if let (Some(notifier), Some(text)) = (notifier, message) {
                transfer::notify(&notifier, &text)?;
                println!("✓ Notification sent");
            }
        }
        UploadAction::List(platform) => {
            let storage = DropboxClient::from_config(config)?;
            let entries = transfer::list_platform(&storage, platform)?;
            println!("Platform: {}", platform);
            for entry in entries.iter().filter(|entry| entry.kind != EntryKind::Deleted) {
                println!("  {:<24} {}", entry.name, entry.path_display);
            }
            if entries.is_empty() {
                println!("  (no uploads yet)");
            }
        }
        UploadAction::Link(remote_path) => {
            let storage = DropboxClient::from_config(config)?;
            let link = transfer::link_for(&storage, &remote_path)?;
            println!("🔗 Link: {}", link);
        }
        UploadAction::Notify(Some(text)) => {
            let notifier = TelegramNotifier::from_config(config)?;
            transfer::notify(&notifier, &text)?;
            println!("✓ Notification sent");
        }
        UploadAction::Notify(None) => {}
    }

    Ok(())
}
