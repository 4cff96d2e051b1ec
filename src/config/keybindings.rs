use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub back: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationKeybindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub page_up: KeyBinding,
    pub page_down: KeyBinding,
    pub home: KeyBinding,
    pub end: KeyBinding,
    pub select: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchKeybindings {
    pub toggle: KeyBinding,
    pub exit: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableKeybindings {
    pub next_page: KeyBinding,
    pub previous_page: KeyBinding,
    pub rows_per_page: KeyBinding,
    pub columns: KeyBinding,
    pub status: KeyBinding,
    pub toggle_column: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordKeybindings {
    pub new: KeyBinding,
    pub edit: KeyBinding,
    pub delete: KeyBinding,
    pub accept: KeyBinding,
    pub decline: KeyBinding,
    pub open: KeyBinding,
    pub copy: KeyBinding,
    pub download: KeyBinding,
    pub reload: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormKeybindings {
    pub next_field: KeyBinding,
    pub previous_field: KeyBinding,
    pub submit: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogKeybindings {
    pub confirm: KeyBinding,
    pub cancel: KeyBinding,
    pub dismiss: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub global: GlobalKeybindings,
    pub navigation: NavigationKeybindings,
    pub search: SearchKeybindings,
    pub table: TableKeybindings,
    pub records: RecordKeybindings,
    pub form: FormKeybindings,
    pub dialog: DialogKeybindings,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::new(KeyCode::Char('q')).into(),
            help: Key::new(KeyCode::Char('?')).into(),
            back: Key::new(KeyCode::Esc).into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: KeyBinding::multiple(vec![Key::new(KeyCode::Char('k')), Key::new(KeyCode::Up)]),
            down: KeyBinding::multiple(vec![Key::new(KeyCode::Char('j')), Key::new(KeyCode::Down)]),
            page_up: Key::new(KeyCode::PageUp).into(),
            page_down: Key::new(KeyCode::PageDown).into(),
            home: KeyBinding::multiple(vec![Key::new(KeyCode::Char('g')), Key::new(KeyCode::Home)]),
            end: KeyBinding::multiple(vec![Key::new(KeyCode::Char('G')), Key::new(KeyCode::End)]),
            select: Key::new(KeyCode::Enter).into(),
        }
    }
}

impl Default for SearchKeybindings {
    fn default() -> Self {
        Self {
            toggle: Key::new(KeyCode::Char('/')).into(),
            exit: Key::new(KeyCode::Esc).into(),
        }
    }
}

impl Default for TableKeybindings {
    fn default() -> Self {
        Self {
            next_page: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char(']')),
                Key::new(KeyCode::Right),
            ]),
            previous_page: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('[')),
                Key::new(KeyCode::Left),
            ]),
            rows_per_page: Key::new(KeyCode::Char('p')).into(),
            columns: Key::new(KeyCode::Char('c')).into(),
            status: Key::new(KeyCode::Char('s')).into(),
            toggle_column: Key::new(KeyCode::Char(' ')).into(),
        }
    }
}

impl Default for RecordKeybindings {
    fn default() -> Self {
        Self {
            new: Key::new(KeyCode::Char('n')).into(),
            edit: Key::new(KeyCode::Char('e')).into(),
            delete: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('d')),
                Key::new(KeyCode::Delete),
            ]),
            accept: Key::new(KeyCode::Char('a')).into(),
            decline: Key::new(KeyCode::Char('x')).into(),
            open: Key::new(KeyCode::Char('o')).into(),
            copy: Key::new(KeyCode::Char('y')).into(),
            download: Key::new(KeyCode::Char('w')).into(),
            reload: Key::new(KeyCode::Char('r')).into(),
        }
    }
}

impl Default for FormKeybindings {
    fn default() -> Self {
        Self {
            next_field: Key::new(KeyCode::Tab).into(),
            previous_field: Key::with_shift(KeyCode::BackTab).into(),
            submit: Key::with_ctrl(KeyCode::Char('s')).into(),
        }
    }
}

impl Default for DialogKeybindings {
    fn default() -> Self {
        Self {
            confirm: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('y')),
                Key::new(KeyCode::Char('Y')),
                Key::new(KeyCode::Enter),
            ]),
            cancel: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('n')),
                Key::new(KeyCode::Char('N')),
                Key::new(KeyCode::Esc),
            ]),
            dismiss: KeyBinding::multiple(vec![
                Key::new(KeyCode::Enter),
                Key::new(KeyCode::Esc),
                Key::new(KeyCode::Char('q')),
            ]),
        }
    }
}
