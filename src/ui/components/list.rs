use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{List as RatatuiList, ListItem, ListState};

use crate::Theme;
use crate::config::{KeyResolver, NavAction};
use crate::ui::{Component, EventResult, Result};

const PAGE_STEP: usize = 5;

pub enum ListEvent<T> {
    Changed(T),
    Activated(T),
}

pub trait ListRow {
    fn render_row(&self, theme: &Theme) -> ListItem<'static>;
}

/// Selectable vertical list.
pub struct List<T: ListRow + Clone> {
    items: Vec<T>,
    state: ListState,
    resolver: Arc<KeyResolver>,
}

impl<T: ListRow + Clone> List<T> {
    pub fn new(items: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }
        Self {
            items,
            state,
            resolver,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        match self.state.selected() {
            _ if self.items.is_empty() => self.state.select(None),
            Some(i) if i >= self.items.len() => self.state.select(Some(self.items.len() - 1)),
            Some(_) => {}
            None => self.state.select(Some(0)),
        }
    }

    fn select(&mut self, index: usize) {
        if !self.items.is_empty() {
            self.state.select(Some(index.min(self.items.len() - 1)));
        }
    }

    fn change_event(&self, before: Option<usize>) -> EventResult<ListEvent<T>> {
        match self.state.selected() {
            Some(i) if Some(i) != before => self
                .items
                .get(i)
                .map_or(EventResult::Consumed, |item| ListEvent::Changed(item.clone()).into()),
            _ => EventResult::Consumed,
        }
    }
}

impl<T: ListRow + Clone> Component for List<T> {
    type Output = ListEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let before = self.state.selected();
        let current = before.unwrap_or(0);

        if self.resolver.matches_nav(&key, NavAction::Down) {
            self.select(before.map_or(0, |i| i + 1));
        } else if self.resolver.matches_nav(&key, NavAction::Up) {
            self.select(current.saturating_sub(1));
        } else if self.resolver.matches_nav(&key, NavAction::Home) {
            self.select(0);
        } else if self.resolver.matches_nav(&key, NavAction::End) {
            self.select(usize::MAX);
        } else if self.resolver.matches_nav(&key, NavAction::PageDown) {
            self.select(current + PAGE_STEP);
        } else if self.resolver.matches_nav(&key, NavAction::PageUp) {
            self.select(current.saturating_sub(PAGE_STEP));
        } else if self.resolver.matches_nav(&key, NavAction::Select) {
            return Ok(self
                .selected()
                .map_or(EventResult::Ignored, |item| ListEvent::Activated(item.clone()).into()));
        } else {
            return Ok(EventResult::Ignored);
        }

        Ok(self.change_event(before))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let items: Vec<ListItem> = self.items.iter().map(|i| i.render_row(theme)).collect();
        let list = RatatuiList::new(items)
            .highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, area, &mut self.state);
    }
}
