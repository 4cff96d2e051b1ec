pub mod components;
pub mod widgets;

mod error_dialog;
mod help;
mod status_bar;
mod toast;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub use color_eyre::Result;

use crate::Theme;

pub use components::{
    ColumnPicker, ColumnPickerEvent, ConfirmDialog, ConfirmEvent, Form, FormEvent, FormField,
    List, ListEvent, ListRow, Table, TableEvent, TextInput, TextInputEvent,
};
pub use widgets::Spinner;

pub use error_dialog::{ErrorDialog, ErrorDialogEvent};
pub use help::{HelpEvent, HelpOverlay, Keybinding, KeybindingSection};
pub use status_bar::StatusBar;
pub use toast::{Toast, ToastManager, ToastType};

/// Result of handling an input event.
///
/// - `Ignored`: the handler did not recognize the input, the parent should process it
/// - `Consumed`: the input was handled and produced nothing
/// - `Event(E)`: the input was handled and produced an output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    Ignored,
    Consumed,
    Event(E),
}

impl<E> EventResult<E> {
    /// Returns true if the input was consumed (either with or without an event).
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// Interactive UI building block.
///
/// Components are reusable widgets that handle input and emit generic
/// outputs. They know nothing about records or the API.
pub trait Component {
    type Output;

    /// Handle a key event.
    ///
    /// Returns `Ignored` when the parent should process the key.
    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        _ = key;
        Ok(EventResult::Ignored)
    }

    /// Called on each tick for animations and time-based updates.
    fn handle_tick(&mut self) {}

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

/// Ephemeral overlay that captures all input until dismissed.
///
/// Record forms and confirmations are modals.
pub trait Modal {
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>>;

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Keybindings shown while the modal is open.
    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }
}

/// Full-page view that translates component events into domain messages.
pub trait Screen {
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>>;

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    fn handle_tick(&mut self) {}

    /// Returns the keybindings for this screen.
    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }
}
