use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::Theme;
use crate::ui::{Component, EventResult, Result};

pub enum TextInputEvent {
    Submitted(String),
    Cancelled,
}

/// Single-line editable text field.
///
/// The cursor is a character index, so multi-byte input edits cleanly.
pub struct TextInput {
    label: String,
    value: String,
    cursor: usize,
    placeholder: Option<String>,
    focused: bool,
}

impl TextInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            cursor: 0,
            placeholder: None,
            focused: true,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.len();
    }

    pub const fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    fn delete_before_cursor(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    fn delete_at_cursor(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    fn delete_word_before_cursor(&mut self) {
        let chars: Vec<char> = self.value.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1] == ' ' {
            start -= 1;
        }
        while start > 0 && chars[start - 1] != ' ' {
            start -= 1;
        }
        let (from, to) = (self.byte_index(start), self.byte_index(self.cursor));
        self.value.drain(from..to);
        self.cursor = start;
    }

    fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

impl Component for TextInput {
    type Output = TextInputEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => TextInputEvent::Submitted(self.value.clone()).into(),
            (KeyCode::Esc, _) => TextInputEvent::Cancelled.into(),

            (KeyCode::Backspace, KeyModifiers::ALT) | (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                self.delete_word_before_cursor();
                EventResult::Consumed
            }
            (KeyCode::Backspace, _) => {
                self.delete_before_cursor();
                EventResult::Consumed
            }
            (KeyCode::Delete, _) => {
                self.delete_at_cursor();
                EventResult::Consumed
            }
            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                EventResult::Consumed
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.len());
                EventResult::Consumed
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                EventResult::Consumed
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.len();
                EventResult::Consumed
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.clear();
                EventResult::Consumed
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let text_style = Style::default().fg(theme.text());
        let cursor_style = Style::default()
            .fg(theme.base())
            .bg(theme.text())
            .add_modifier(Modifier::BOLD);

        let line = match (&self.placeholder, self.value.is_empty(), self.focused) {
            (Some(placeholder), true, focused) => {
                let mut spans = Vec::with_capacity(2);
                if focused {
                    spans.push(Span::styled(" ", cursor_style));
                }
                spans.push(Span::styled(
                    placeholder.clone(),
                    Style::default().fg(theme.overlay0()),
                ));
                Line::from(spans)
            }
            (_, _, false) => Line::from(Span::styled(self.value.clone(), text_style)),
            (_, _, true) => {
                let before: String = self.value.chars().take(self.cursor).collect();
                let mut rest = self.value.chars().skip(self.cursor);
                let at = rest.next().unwrap_or(' ');
                let after: String = rest.collect();
                Line::from(vec![
                    Span::styled(before, text_style),
                    Span::styled(at.to_string(), cursor_style),
                    Span::styled(after, text_style),
                ])
            }
        };

        let border = if self.focused {
            theme.lavender()
        } else {
            theme.border()
        };
        let block = Block::default()
            .title(format!(" {} ", self.label))
            .title_style(
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme.base()));

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::testing::{chars, ctrl, key};

    fn type_text(input: &mut TextInput, text: &str) {
        for k in chars(text) {
            input.handle_key(k).unwrap();
        }
    }

    #[test]
    fn test_edits_multibyte_text_by_character() {
        let mut input = TextInput::new("Name");
        type_text(&mut input, "José");
        input.handle_key(key(KeyCode::Left)).unwrap();
        input.handle_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(input.value(), "Joé");

        input.handle_key(key(KeyCode::Home)).unwrap();
        input.handle_key(key(KeyCode::Delete)).unwrap();
        assert_eq!(input.value(), "oé");

        input.handle_key(key(KeyCode::End)).unwrap();
        type_text(&mut input, "!");
        assert_eq!(input.value(), "oé!");
    }

    #[test]
    fn test_word_delete_and_clear() {
        let mut input = TextInput::new("Search").with_value("senior rust  ");
        input.handle_key(ctrl('w')).unwrap();
        assert_eq!(input.value(), "senior ");

        input.handle_key(ctrl('u')).unwrap();
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_enter_submits_current_value() {
        let mut input = TextInput::new("Reply").with_value("Thanks");
        assert!(matches!(
            input.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event(TextInputEvent::Submitted(v)) if v == "Thanks"
        ));
        assert!(matches!(
            input.handle_key(key(KeyCode::Esc)).unwrap(),
            EventResult::Event(TextInputEvent::Cancelled)
        ));
    }

    #[test]
    fn test_unhandled_keys_bubble_up() {
        let mut input = TextInput::new("Name");
        assert!(!input.handle_key(key(KeyCode::Tab)).unwrap().is_consumed());
        assert!(!input.handle_key(ctrl('s')).unwrap().is_consumed());
    }
}
