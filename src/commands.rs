//! Async commands for side effects.
//!
//! Services return commands from `update()`. The App spawns each one on the
//! tokio runtime and hands it a [`CommandEnv`]; results flow back to the
//! service through its own message channel.

mod clipboard;
mod env;

use async_trait::async_trait;
pub use clipboard::CopyToClipboardCmd;
use color_eyre::Result;
pub use env::CommandEnv;

#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for logs, e.g. "Deleting Careers #4".
    fn name(&self) -> String;

    async fn execute(self: Box<Self>, env: CommandEnv) -> Result<()>;
}
