// Chat notifications

pub mod telegram;

use crate::error::Result;

pub use telegram::TelegramNotifier;

#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    /// Post `text` to the configured chat
    fn send(&self, text: &str) -> Result<()>;
}
