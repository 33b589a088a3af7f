// Outbound delivery of the rendered report
pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

pub use telegram::TelegramNotifier;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;

    /// A unique identifier for this implementation, used in logs.
    fn signature(&self) -> &'static str;
}

/// Prints the message instead of delivering it (`--dry-run`).
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }

    fn signature(&self) -> &'static str {
        "stdout"
    }
}
