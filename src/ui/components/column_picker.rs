use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver, NavAction, TableAction};
use crate::ui::{Component, EventResult, Result};

pub enum ColumnPickerEvent {
    Toggled(&'static str),
    Closed,
}

struct Entry {
    key: &'static str,
    label: &'static str,
    visible: bool,
}

/// Multi-select popup listing the table columns with their visibility.
pub struct ColumnPicker {
    entries: Vec<Entry>,
    state: ListState,
    resolver: Arc<KeyResolver>,
}

impl ColumnPicker {
    /// `columns` yields `(key, label, visible)` in display order.
    pub fn new(
        columns: impl IntoIterator<Item = (&'static str, &'static str, bool)>,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        let entries: Vec<Entry> = columns
            .into_iter()
            .map(|(key, label, visible)| Entry {
                key,
                label,
                visible,
            })
            .collect();
        let mut state = ListState::default();
        if !entries.is_empty() {
            state.select(Some(0));
        }
        Self {
            entries,
            state,
            resolver,
        }
    }

    pub fn visible_keys(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|e| e.visible)
            .map(|e| e.key)
            .collect()
    }

    fn move_by(&mut self, delta: isize) {
        let Some(last) = self.entries.len().checked_sub(1) else {
            return;
        };
        let current = self.state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.state.select(Some(next));
    }
}

impl Component for ColumnPicker {
    type Output = ColumnPickerEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_nav(&key, NavAction::Down) {
            self.move_by(1);
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_nav(&key, NavAction::Up) {
            self.move_by(-1);
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_table(&key, TableAction::ToggleColumn) {
            let Some(entry) = self
                .state
                .selected()
                .and_then(|i| self.entries.get_mut(i))
            else {
                return Ok(EventResult::Consumed);
            };
            entry.visible = !entry.visible;
            return Ok(ColumnPickerEvent::Toggled(entry.key).into());
        }
        if self.resolver.matches_nav(&key, NavAction::Select)
            || self.resolver.matches_global(&key, GlobalAction::Back)
            || self.resolver.matches_table(&key, TableAction::Columns)
        {
            return Ok(ColumnPickerEvent::Closed.into());
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let height = u16::try_from(self.entries.len() + 2).unwrap_or(u16::MAX);
        let popup = area.centered(Constraint::Length(36), Constraint::Length(height));
        frame.render_widget(Clear, popup);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let (mark, color) = if entry.visible {
                    ("[x]", theme.green())
                } else {
                    ("[ ]", theme.overlay0())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, Style::default().fg(color)),
                    Span::raw(" "),
                    Span::styled(entry.label, Style::default().fg(theme.text())),
                ]))
            })
            .collect();

        let title = format!(
            " Columns ({} toggle, {} close) ",
            self.resolver.display_table(TableAction::ToggleColumn),
            self.resolver.display_nav(NavAction::Select)
        );
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .title_style(
                        Style::default()
                            .fg(theme.mauve())
                            .add_modifier(Modifier::BOLD),
                    )
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme.lavender()))
                    .style(Style::default().bg(theme.base())),
            )
            .highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(list, popup, &mut self.state);
    }
}
