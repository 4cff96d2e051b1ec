use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{
    DialogAction, FormAction, GlobalAction, NavAction, RecordAction, SearchAction, TableAction,
};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to configured actions and renders their key hints.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Help => &kb.help,
            GlobalAction::Back => &kb.back,
        }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global(action).display()
    }

    fn nav(&self, action: NavAction) -> &KeyBinding {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => &kb.up,
            NavAction::Down => &kb.down,
            NavAction::PageUp => &kb.page_up,
            NavAction::PageDown => &kb.page_down,
            NavAction::Home => &kb.home,
            NavAction::End => &kb.end,
            NavAction::Select => &kb.select,
        }
    }

    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav(action).display()
    }

    fn search(&self, action: SearchAction) -> &KeyBinding {
        let kb = &self.keybindings.search;
        match action {
            SearchAction::Toggle => &kb.toggle,
            SearchAction::Exit => &kb.exit,
        }
    }

    pub fn matches_search(&self, event: &KeyEvent, action: SearchAction) -> bool {
        self.search(action).matches(event)
    }

    pub fn display_search(&self, action: SearchAction) -> String {
        self.search(action).display()
    }

    fn table(&self, action: TableAction) -> &KeyBinding {
        let kb = &self.keybindings.table;
        match action {
            TableAction::NextPage => &kb.next_page,
            TableAction::PreviousPage => &kb.previous_page,
            TableAction::RowsPerPage => &kb.rows_per_page,
            TableAction::Columns => &kb.columns,
            TableAction::Status => &kb.status,
            TableAction::ToggleColumn => &kb.toggle_column,
        }
    }

    pub fn matches_table(&self, event: &KeyEvent, action: TableAction) -> bool {
        self.table(action).matches(event)
    }

    pub fn display_table(&self, action: TableAction) -> String {
        self.table(action).display()
    }

    fn record(&self, action: RecordAction) -> &KeyBinding {
        let kb = &self.keybindings.records;
        match action {
            RecordAction::New => &kb.new,
            RecordAction::Edit => &kb.edit,
            RecordAction::Delete => &kb.delete,
            RecordAction::Accept => &kb.accept,
            RecordAction::Decline => &kb.decline,
            RecordAction::Open => &kb.open,
            RecordAction::Copy => &kb.copy,
            RecordAction::Download => &kb.download,
            RecordAction::Reload => &kb.reload,
        }
    }

    pub fn matches_record(&self, event: &KeyEvent, action: RecordAction) -> bool {
        self.record(action).matches(event)
    }

    pub fn display_record(&self, action: RecordAction) -> String {
        self.record(action).display()
    }

    fn form(&self, action: FormAction) -> &KeyBinding {
        let kb = &self.keybindings.form;
        match action {
            FormAction::NextField => &kb.next_field,
            FormAction::PreviousField => &kb.previous_field,
            FormAction::Submit => &kb.submit,
        }
    }

    pub fn matches_form(&self, event: &KeyEvent, action: FormAction) -> bool {
        self.form(action).matches(event)
    }

    pub fn display_form(&self, action: FormAction) -> String {
        self.form(action).display()
    }

    fn dialog(&self, action: DialogAction) -> &KeyBinding {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Confirm => &kb.confirm,
            DialogAction::Cancel => &kb.cancel,
            DialogAction::Dismiss => &kb.dismiss,
        }
    }

    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        self.dialog(action).matches(event)
    }

    pub fn display_dialog(&self, action: DialogAction) -> String {
        self.dialog(action).display()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_table_bindings() {
        let resolver = KeyResolver::default();
        assert!(resolver.matches_table(&key(KeyCode::Char(']')), TableAction::NextPage));
        assert!(resolver.matches_table(&key(KeyCode::Char('[')), TableAction::PreviousPage));
        assert!(resolver.matches_table(&key(KeyCode::Char('p')), TableAction::RowsPerPage));
        assert!(!resolver.matches_table(&key(KeyCode::Char('p')), TableAction::Columns));
        assert_eq!(resolver.display_table(TableAction::NextPage), "]/Right");
    }

    #[test]
    fn test_form_submit_needs_ctrl() {
        let resolver = KeyResolver::default();
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(resolver.matches_form(&ctrl_s, FormAction::Submit));
        assert!(!resolver.matches_form(&key(KeyCode::Char('s')), FormAction::Submit));

        let back_tab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert!(resolver.matches_form(&back_tab, FormAction::PreviousField));
    }
}
