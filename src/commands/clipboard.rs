use async_trait::async_trait;
use color_eyre::Result;

use crate::commands::{Command, CommandEnv};
use crate::ui::ToastType;

/// Copies text to the system clipboard and confirms with a toast.
pub struct CopyToClipboardCmd {
    text: String,
    what: String,
}

impl CopyToClipboardCmd {
    /// `what` names the copied content in the toast, e.g. "Partners #3".
    pub fn new(text: impl Into<String>, what: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            what: what.into(),
        }
    }
}

#[async_trait]
impl Command for CopyToClipboardCmd {
    fn name(&self) -> String {
        format!("Copying {}", self.what)
    }

    async fn execute(self: Box<Self>, env: CommandEnv) -> Result<()> {
        env.set_clipboard(&self.text)?;
        env.show_toast(format!("Copied {}", self.what), ToastType::Success);
        Ok(())
    }
}
