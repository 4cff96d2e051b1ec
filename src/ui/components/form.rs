use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::Theme;
use crate::config::{FormAction, GlobalAction, KeyResolver};
use crate::ui::{Component, EventResult, Result, TextInput};

/// Field of a record form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
}

impl FormField {
    pub const fn required(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            required: true,
        }
    }

    pub const fn optional(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            required: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// Validated `(key, value)` pairs in field order.
    Submitted(Vec<(String, String)>),
    Cancelled,
}

pub struct Form {
    title: String,
    fields: Vec<(FormField, TextInput)>,
    focus: usize,
    error: Option<String>,
    resolver: Arc<KeyResolver>,
}

impl Form {
    pub fn new(title: impl Into<String>, fields: &[FormField], resolver: Arc<KeyResolver>) -> Self {
        let fields = fields
            .iter()
            .map(|field| (*field, TextInput::new(field.label)))
            .collect();
        let mut form = Self {
            title: title.into(),
            fields,
            focus: 0,
            error: None,
            resolver,
        };
        form.sync_focus();
        form
    }

    /// Prefill inputs by field key. Unknown keys are ignored.
    #[must_use]
    pub fn with_values<K, V>(mut self, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in values {
            if let Some((_, input)) = self.fields.iter_mut().find(|(f, _)| f.key == key.as_ref()) {
                input.set_value(value);
            }
        }
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Show a message under the fields, e.g. after a rejected submit.
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn values(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(field, input)| (field.key.to_string(), input.value().trim().to_string()))
            .collect()
    }

    fn sync_focus(&mut self) {
        for (i, (_, input)) in self.fields.iter_mut().enumerate() {
            input.set_focused(i == self.focus);
        }
    }

    fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
            self.sync_focus();
        }
    }

    fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
            self.sync_focus();
        }
    }

    fn submit(&mut self) -> EventResult<FormEvent> {
        let missing = self
            .fields
            .iter()
            .position(|(field, input)| field.required && input.value().trim().is_empty());
        if let Some(index) = missing {
            self.error = Some(format!("{} is required", self.fields[index].0.label));
            self.focus = index;
            self.sync_focus();
            return EventResult::Consumed;
        }
        self.error = None;
        FormEvent::Submitted(self.values()).into()
    }
}

impl Component for Form {
    type Output = FormEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_global(&key, GlobalAction::Back) {
            return Ok(FormEvent::Cancelled.into());
        }
        if self.resolver.matches_form(&key, FormAction::Submit) {
            return Ok(self.submit());
        }
        if self.resolver.matches_form(&key, FormAction::NextField) {
            self.focus_next();
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_form(&key, FormAction::PreviousField) {
            self.focus_previous();
            return Ok(EventResult::Consumed);
        }
        if key.code == KeyCode::Enter {
            if self.focus + 1 >= self.fields.len() {
                return Ok(self.submit());
            }
            self.focus_next();
            return Ok(EventResult::Consumed);
        }

        if let Some((_, input)) = self.fields.get_mut(self.focus) {
            input.handle_key(key)?;
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let height = u16::try_from(self.fields.len() * 3 + 4).unwrap_or(u16::MAX);
        let popup = area.centered(Constraint::Percentage(60), Constraint::Length(height));
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.lavender()))
            .style(Style::default().bg(theme.base()));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut constraints = vec![Constraint::Length(3); self.fields.len()];
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
        let areas = Layout::vertical(constraints).split(inner);

        for ((_, input), field_area) in self.fields.iter_mut().zip(areas.iter()) {
            input.render(frame, *field_area, theme);
        }

        let footer = if let Some(error) = &self.error {
            Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(theme.red()).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(Span::styled(
                format!(
                    "{} next field · {} save · {} cancel",
                    self.resolver.display_form(FormAction::NextField),
                    self.resolver.display_form(FormAction::Submit),
                    self.resolver.display_global(GlobalAction::Back)
                ),
                Style::default().fg(theme.overlay1()),
            ))
        };
        if let Some(footer_area) = areas.last() {
            frame.render_widget(Paragraph::new(footer), *footer_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::testing::{chars, ctrl, key, render_to_string};

    const FIELDS: [FormField; 2] = [
        FormField::required("name", "Name"),
        FormField::optional("notes", "Notes"),
    ];

    fn form() -> Form {
        Form::new("New Certificate", &FIELDS, Arc::new(KeyResolver::default()))
    }

    #[test]
    fn test_required_field_blocks_submit() {
        let mut form = form();
        assert!(matches!(form.handle_key(ctrl('s')).unwrap(), EventResult::Consumed));
        assert_eq!(form.error(), Some("Name is required"));

        for k in chars("   ") {
            form.handle_key(k).unwrap();
        }
        form.handle_key(ctrl('s')).unwrap();
        assert_eq!(form.error(), Some("Name is required"));
    }

    #[test]
    fn test_submit_returns_trimmed_values_in_order() {
        let mut form = form();
        for k in chars(" ISO 9001 ") {
            form.handle_key(k).unwrap();
        }
        assert!(matches!(form.handle_key(key(KeyCode::Enter)).unwrap(), EventResult::Consumed));
        for k in chars("renewed") {
            form.handle_key(k).unwrap();
        }

        let result = form.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            result,
            EventResult::Event(FormEvent::Submitted(vec![
                ("name".to_string(), "ISO 9001".to_string()),
                ("notes".to_string(), "renewed".to_string()),
            ]))
        );
        assert_eq!(form.error(), None);
    }

    #[test]
    fn test_tab_cycles_focus_and_prefill() {
        let mut form = form().with_values([("notes", "kept"), ("unknown", "x")]);
        form.handle_key(key(KeyCode::Tab)).unwrap();
        form.handle_key(key(KeyCode::Tab)).unwrap();
        for k in chars("Safety") {
            form.handle_key(k).unwrap();
        }
        assert_eq!(
            form.values(),
            vec![
                ("name".to_string(), "Safety".to_string()),
                ("notes".to_string(), "kept".to_string()),
            ]
        );
    }

    #[test]
    fn test_escape_cancels() {
        let mut form = form();
        assert_eq!(
            form.handle_key(key(KeyCode::Esc)).unwrap(),
            EventResult::Event(FormEvent::Cancelled)
        );
    }

    #[test]
    fn test_renders_labels_and_error() {
        let mut form = form();
        form.set_error("Something went wrong.");
        let screen = render_to_string(&mut form, 100, 20);
        assert!(screen.contains("New Certificate"));
        assert!(screen.contains("Notes"));
        assert!(screen.contains("Something went wrong."));
    }
}
