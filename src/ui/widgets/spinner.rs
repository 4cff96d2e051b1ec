use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use throbber_widgets_tui::WhichUse::Spin;
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, ThrobberState};

use crate::Theme;
use crate::ui::Component;

/// Centered loading indicator with an optional label.
#[derive(Default)]
pub struct Spinner {
    state: ThrobberState,
    label: Option<String>,
}

impl Spinner {
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            state: ThrobberState::default(),
            label: Some(label.into()),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Component for Spinner {
    type Output = ();

    fn handle_tick(&mut self) {
        self.state.calc_next();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut throbber = Throbber::default()
            .throbber_set(BRAILLE_SIX)
            .use_type(Spin)
            .throbber_style(Style::default().fg(theme.lavender()))
            .style(Style::default().fg(theme.subtext1()));

        let mut width = 1usize;
        if let Some(label) = &self.label {
            throbber = throbber.label(label.as_str());
            width += label.chars().count() + 1;
        }

        let width = u16::try_from(width).unwrap_or(area.width).min(area.width);
        let area = area.centered(Constraint::Length(width), Constraint::Length(1));
        frame.render_stateful_widget(throbber, area, &mut self.state);
    }
}
