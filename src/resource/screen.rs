use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;
use crate::config::{KeyResolver, RecordAction};
use crate::resource::{Resource, ResourceMsg, RowAction};
use crate::table::{DataTable, RowsPerPage};
use crate::ui::{Component, EventResult, Keybinding, Result, Screen, Table, TableEvent};

/// Table page of one resource.
///
/// The table handles search, paging and selection; everything it ignores is
/// matched against the record keybindings of the selected row.
pub struct RecordScreen<R: Resource> {
    table: Table<R>,
    resolver: Arc<KeyResolver>,
}

impl<R: Resource> RecordScreen<R> {
    pub fn new(rows: Vec<R>, rows_per_page: RowsPerPage, resolver: Arc<KeyResolver>) -> Self {
        let mut data = DataTable::new(R::columns(), rows)
            .with_label(R::TITLE)
            .with_description(R::DESCRIPTION)
            .with_rows_per_page(rows_per_page);
        if let Some((column, options)) = R::status_filter() {
            data = data.with_status_filter(column, options);
        }
        Self {
            table: Table::new(data, resolver.clone()),
            resolver,
        }
    }

    /// Replace the rows after a refresh, keeping search and paging.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.table.set_data(rows);
    }

    pub fn selected(&self) -> Option<&R> {
        self.table.selected_item()
    }

    pub const fn table(&self) -> &Table<R> {
        &self.table
    }

    /// Message for a row action, if the record offers it.
    fn dispatch(record: &R, action: RowAction) -> Option<ResourceMsg<R>> {
        if !record.actions().contains(&action) {
            return None;
        }
        Some(match action {
            RowAction::Open => ResourceMsg::Open(record.clone()),
            RowAction::Edit | RowAction::Reply => ResourceMsg::StartEdit(record.clone(), action),
            RowAction::Delete => ResourceMsg::ConfirmDelete(record.clone()),
            RowAction::Accept | RowAction::Decline => ResourceMsg::SetStatus {
                record: record.clone(),
                action,
            },
            RowAction::Download => ResourceMsg::Download(record.clone()),
        })
    }

    /// Enter opens a nested page if there is one, otherwise the form.
    fn default_action(record: &R) -> Option<ResourceMsg<R>> {
        [RowAction::Open, RowAction::Edit, RowAction::Reply]
            .into_iter()
            .find_map(|action| Self::dispatch(record, action))
    }

    fn record_action(&self, key: &KeyEvent) -> Option<RecordAction> {
        [
            RecordAction::Reload,
            RecordAction::New,
            RecordAction::Edit,
            RecordAction::Delete,
            RecordAction::Accept,
            RecordAction::Decline,
            RecordAction::Open,
            RecordAction::Copy,
            RecordAction::Download,
        ]
        .into_iter()
        .find(|action| self.resolver.matches_record(key, *action))
    }
}

impl<R: Resource> Screen for RecordScreen<R> {
    type Output = ResourceMsg<R>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let result = self.table.handle_key(key)?;
        if let EventResult::Event(TableEvent::Activated(record)) = result {
            return Ok(Self::default_action(&record).map_or(EventResult::Consumed, Into::into));
        }
        if result.is_consumed() {
            return Ok(EventResult::Consumed);
        }

        let Some(action) = self.record_action(&key) else {
            return Ok(EventResult::Ignored);
        };
        let msg = match action {
            RecordAction::Reload => Some(ResourceMsg::Load),
            RecordAction::New => R::can_create().then_some(ResourceMsg::StartCreate),
            RecordAction::Copy => self.selected().map(|r| ResourceMsg::Copy(r.clone())),
            RecordAction::Edit => self.selected().and_then(|r| {
                Self::dispatch(r, RowAction::Edit).or_else(|| Self::dispatch(r, RowAction::Reply))
            }),
            RecordAction::Delete => self.selected().and_then(|r| Self::dispatch(r, RowAction::Delete)),
            RecordAction::Accept => self.selected().and_then(|r| Self::dispatch(r, RowAction::Accept)),
            RecordAction::Decline => {
                self.selected().and_then(|r| Self::dispatch(r, RowAction::Decline))
            }
            RecordAction::Open => self.selected().and_then(|r| Self::dispatch(r, RowAction::Open)),
            RecordAction::Download => {
                self.selected().and_then(|r| Self::dispatch(r, RowAction::Download))
            }
        };
        Ok(msg.map_or(EventResult::Ignored, Into::into))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.table.render(frame, area, theme);
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        let mut bindings = Vec::new();
        if R::can_create() {
            bindings.push(Keybinding::hint(r.display_record(RecordAction::New), "New"));
        }
        if let Some(record) = self.selected() {
            for action in record.actions() {
                let key = match action {
                    RowAction::Open => RecordAction::Open,
                    RowAction::Edit | RowAction::Reply => RecordAction::Edit,
                    RowAction::Delete => RecordAction::Delete,
                    RowAction::Accept => RecordAction::Accept,
                    RowAction::Decline => RecordAction::Decline,
                    RowAction::Download => RecordAction::Download,
                };
                bindings.push(Keybinding::hint(r.display_record(key), action.label()));
            }
            bindings.push(Keybinding::new(r.display_record(RecordAction::Copy), "Copy as JSON"));
        }
        bindings.extend(self.table.keybindings());
        bindings.push(Keybinding::new(r.display_record(RecordAction::Reload), "Reload"));
        bindings
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::resource::testing::Note;
    use crate::ui::testing::key;

    fn screen() -> RecordScreen<Note> {
        RecordScreen::new(
            vec![Note::new(1, "Pending note", "Pending"), Note::new(2, "Done note", "Done")],
            RowsPerPage::Five,
            Arc::new(KeyResolver::default()),
        )
    }

    fn press(screen: &mut RecordScreen<Note>, code: KeyCode) -> EventResult<ResourceMsg<Note>> {
        screen.handle_key(key(code)).unwrap()
    }

    #[test]
    fn test_record_keys_map_to_messages() {
        let mut screen = screen();
        assert!(matches!(
            press(&mut screen, KeyCode::Char('n')),
            EventResult::Event(ResourceMsg::StartCreate)
        ));
        assert!(matches!(
            press(&mut screen, KeyCode::Char('e')),
            EventResult::Event(ResourceMsg::StartEdit(n, RowAction::Edit)) if n.id == 1
        ));
        assert!(matches!(
            press(&mut screen, KeyCode::Char('d')),
            EventResult::Event(ResourceMsg::ConfirmDelete(n)) if n.id == 1
        ));
        assert!(matches!(
            press(&mut screen, KeyCode::Char('r')),
            EventResult::Event(ResourceMsg::Load)
        ));
        assert!(matches!(
            press(&mut screen, KeyCode::Char('y')),
            EventResult::Event(ResourceMsg::Copy(n)) if n.id == 1
        ));
    }

    #[test]
    fn test_status_actions_follow_record_state() {
        let mut screen = screen();
        assert!(matches!(
            press(&mut screen, KeyCode::Char('a')),
            EventResult::Event(ResourceMsg::SetStatus { record, action: RowAction::Accept }) if record.id == 1
        ));

        press(&mut screen, KeyCode::Down);
        assert_eq!(screen.selected().map(|n| n.id), Some(2));
        assert!(!press(&mut screen, KeyCode::Char('x')).is_consumed());
        assert!(matches!(press(&mut screen, KeyCode::Char('a')), EventResult::Ignored));
    }

    #[test]
    fn test_enter_runs_default_action() {
        let mut screen = screen();
        assert!(matches!(
            press(&mut screen, KeyCode::Enter),
            EventResult::Event(ResourceMsg::StartEdit(_, RowAction::Edit))
        ));
    }

    #[test]
    fn test_unbound_keys_bubble_up() {
        let mut screen = screen();
        assert!(matches!(press(&mut screen, KeyCode::Char('q')), EventResult::Ignored));
    }

    #[test]
    fn test_keybindings_follow_selected_row() {
        let screen = screen();
        let descriptions: Vec<_> = screen
            .keybindings()
            .into_iter()
            .map(|k| k.description)
            .collect();
        assert!(descriptions.contains(&"New".to_string()));
        assert!(descriptions.contains(&"Accept".to_string()));
        assert!(descriptions.contains(&"Reload".to_string()));
    }
}
