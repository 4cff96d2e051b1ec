use std::marker::PhantomData;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;
use crate::config::{FormAction, GlobalAction, KeyResolver};
use crate::resource::{RecordId, Resource, ResourceMsg, RowAction};
use crate::ui::{
    Component, ConfirmDialog, ConfirmEvent, EventResult, Form, FormEvent, Keybinding, Modal,
    Result,
};

/// Create or update form of a record.
pub struct RecordForm<R> {
    id: Option<RecordId>,
    form: Form,
    resolver: Arc<KeyResolver>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> RecordForm<R> {
    pub fn create(resolver: Arc<KeyResolver>) -> Self {
        let form = Form::new(format!("New {}", R::ITEM), R::form_fields(), resolver.clone());
        Self {
            id: None,
            form,
            resolver,
            _resource: PhantomData,
        }
    }

    pub fn edit(record: &R, action: RowAction, resolver: Arc<KeyResolver>) -> Self {
        let verb = if action == RowAction::Reply { "Reply to" } else { "Edit" };
        let form = Form::new(
            format!("{verb} {}", record.name()),
            R::form_fields(),
            resolver.clone(),
        )
        .with_values(record.form_values());
        Self {
            id: Some(record.id()),
            form,
            resolver,
            _resource: PhantomData,
        }
    }

    pub const fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    pub fn title(&self) -> &str {
        self.form.title()
    }

    /// Show a submission error below the fields; the form stays open.
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.form.set_error(error);
    }

    pub fn error(&self) -> Option<&str> {
        self.form.error()
    }
}

impl<R: Resource> Modal for RecordForm<R> {
    type Output = ResourceMsg<R>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match self.form.handle_key(key)? {
            EventResult::Event(FormEvent::Submitted(fields)) => ResourceMsg::Submit {
                id: self.id.clone(),
                fields,
            }
            .into(),
            EventResult::Event(FormEvent::Cancelled) => ResourceMsg::DialogCancelled.into(),
            _ => EventResult::Consumed,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.form.render(frame, area, theme);
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        vec![
            Keybinding::hint(r.display_form(FormAction::Submit), "Save"),
            Keybinding::hint(r.display_form(FormAction::NextField), "Next field"),
            Keybinding::new(r.display_form(FormAction::PreviousField), "Previous field"),
            Keybinding::hint(r.display_global(GlobalAction::Back), "Cancel"),
        ]
    }
}

/// Danger confirmation before deleting a record.
pub struct DeleteDialog<R> {
    record: R,
    dialog: ConfirmDialog,
}

impl<R: Resource> DeleteDialog<R> {
    pub fn new(record: R, resolver: Arc<KeyResolver>) -> Self {
        let dialog = ConfirmDialog::new(
            format!("Delete {} '{}'? This cannot be undone.", R::ITEM, record.name()),
            resolver,
        )
        .with_title(format!("Delete {}", R::ITEM))
        .with_confirm_text("Delete")
        .danger();
        Self { record, dialog }
    }
}

impl<R: Resource> Modal for DeleteDialog<R> {
    type Output = ResourceMsg<R>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match self.dialog.handle_key(key)? {
            EventResult::Event(ConfirmEvent::Confirmed) => {
                ResourceMsg::Delete(self.record.clone()).into()
            }
            EventResult::Event(ConfirmEvent::Cancelled) => ResourceMsg::DialogCancelled.into(),
            _ => EventResult::Consumed,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.dialog.render(frame, area, theme);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::resource::testing::Note;
    use crate::ui::testing::{chars, ctrl, key};

    fn resolver() -> Arc<KeyResolver> {
        Arc::new(KeyResolver::default())
    }

    #[test]
    fn test_create_form_submits_without_id() {
        let mut form = RecordForm::<Note>::create(resolver());
        assert_eq!(form.title(), "New Note");
        for k in chars("Groceries") {
            form.handle_key(k).unwrap();
        }
        match form.handle_key(key(KeyCode::Enter)).unwrap() {
            EventResult::Event(ResourceMsg::Submit { id, fields }) => {
                assert_eq!(id, None);
                assert_eq!(fields, vec![("title".to_string(), "Groceries".to_string())]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_edit_form_is_prefilled_and_carries_id() {
        let note = Note::new(4, "Draft", "Done");
        let mut form = RecordForm::edit(&note, RowAction::Edit, resolver());
        assert_eq!(form.title(), "Edit Draft");
        assert_eq!(form.id(), Some(&RecordId::Number(4)));

        match form.handle_key(ctrl('s')).unwrap() {
            EventResult::Event(ResourceMsg::Submit { id, fields }) => {
                assert_eq!(id, Some(RecordId::Number(4)));
                assert_eq!(fields[0].1, "Draft");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_empty_required_field_blocks_submit() {
        let mut form = RecordForm::<Note>::create(resolver());
        assert!(matches!(
            form.handle_key(ctrl('s')).unwrap(),
            EventResult::Consumed
        ));
        assert_eq!(form.error(), Some("Title is required"));
    }

    #[test]
    fn test_reply_title_and_cancel() {
        let note = Note::new(4, "Question", "Pending");
        let mut form = RecordForm::edit(&note, RowAction::Reply, resolver());
        assert_eq!(form.title(), "Reply to Question");
        assert!(matches!(
            form.handle_key(key(KeyCode::Esc)).unwrap(),
            EventResult::Event(ResourceMsg::DialogCancelled)
        ));
    }

    #[test]
    fn test_delete_dialog_confirms_record() {
        let mut dialog = DeleteDialog::new(Note::new(9, "Old", "Done"), resolver());
        assert!(matches!(
            dialog.handle_key(key(KeyCode::Char('y'))).unwrap(),
            EventResult::Event(ResourceMsg::Delete(n)) if n.id == 9
        ));
        assert!(matches!(
            dialog.handle_key(key(KeyCode::Char('n'))).unwrap(),
            EventResult::Event(ResourceMsg::DialogCancelled)
        ));
    }
}
