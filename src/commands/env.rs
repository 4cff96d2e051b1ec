use std::sync::{Arc, Mutex};

use arboard::Clipboard;
use color_eyre::eyre::eyre;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;
use crate::ui::ToastType;

/// Shared environment handed to every command.
///
/// Cloning is cheap; the clipboard handle is shared.
#[derive(Clone)]
pub struct CommandEnv {
    clipboard: Arc<Mutex<Option<Clipboard>>>,
    app_tx: UnboundedSender<AppMessage>,
}

impl CommandEnv {
    pub fn new(app_tx: UnboundedSender<AppMessage>) -> Self {
        Self {
            clipboard: Arc::new(Mutex::new(None)),
            app_tx,
        }
    }

    /// Copy text to the system clipboard.
    ///
    /// The clipboard is created on first use and kept for the lifetime of
    /// the app, since on Linux the owning process must stay alive to serve it.
    pub fn set_clipboard(&self, text: &str) -> color_eyre::Result<()> {
        let mut guard = self
            .clipboard
            .lock()
            .map_err(|e| eyre!("Failed to lock clipboard: {e}"))?;
        if guard.is_none() {
            *guard = Some(Clipboard::new()?);
        }
        if let Some(clipboard) = guard.as_mut() {
            clipboard.set_text(text)?;
        }
        Ok(())
    }

    pub fn show_toast(&self, message: impl Into<String>, toast_type: ToastType) {
        let message = message.into();
        if self
            .app_tx
            .send(AppMessage::ShowToast {
                message: message.clone(),
                toast_type,
            })
            .is_err()
        {
            tracing::debug!(message, "Toast dropped, app channel closed");
        }
    }
}
