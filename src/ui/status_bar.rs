use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver, NavAction};
use crate::ui::Keybinding;

const LOGO: &[&str] = &[
    r"  _                   ",
    r" | |  __ _ ___ _  _   ",
    r" | |_/ _` |_ /| || |  ",
    r" |____\__,_/__|\_, |  ",
    r"  admin        |__/   ",
];

/// Bottom panel with connection details, key hints and the logo.
pub struct StatusBar {
    base_url: String,
    authenticated: bool,
    resource: Option<String>,
    resolver: Arc<KeyResolver>,
}

impl StatusBar {
    pub fn new(base_url: impl Into<String>, authenticated: bool, resolver: Arc<KeyResolver>) -> Self {
        Self {
            base_url: base_url.into(),
            authenticated,
            resource: None,
            resolver,
        }
    }

    pub fn set_resource(&mut self, resource: Option<String>) {
        self.resource = resource;
    }

    pub fn render_with_keybindings(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        local_keybindings: &[Keybinding],
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [status, hints, logo] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(42),
                Constraint::Min(20),
                Constraint::Length(23),
            ])
            .areas(inner);

        self.render_status(frame, status, theme);
        self.render_hints(frame, hints, theme, local_keybindings);
        Self::render_logo(frame, logo, theme);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let width = usize::from(area.width);
        let label_style = Style::default().fg(theme.overlay1());
        let value_style = Style::default().fg(theme.text());

        let title = self.resource.as_deref().unwrap_or("Resources");
        let auth = if self.authenticated {
            ("bearer token", Style::default().fg(theme.green()))
        } else {
            ("anonymous", Style::default().fg(theme.peach()))
        };

        let lines = vec![
            Line::from(Span::styled(
                truncate(title, width),
                Style::default()
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            status_line("api", &self.base_url, width, label_style, value_style),
            status_line("auth", auth.0, width, label_style, auth.1),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_hints(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        local_keybindings: &[Keybinding],
    ) {
        let global = self.global_keybindings();
        let hints: Vec<&Keybinding> = local_keybindings
            .iter()
            .chain(global.iter())
            .filter(|kb| kb.hint)
            .collect();
        if hints.is_empty() || area.height == 0 {
            return;
        }

        let key_width = hints.iter().map(|kb| kb.key.chars().count()).max().unwrap_or(1);
        let desc_width = hints
            .iter()
            .map(|kb| kb.description.chars().count())
            .max()
            .unwrap_or(1);
        let col_width = u16::try_from(key_width + desc_width + 5).unwrap_or(u16::MAX);
        let num_cols = usize::from((area.width / col_width).max(1));
        let num_rows = usize::from(area.height);

        let mut columns: Vec<Vec<Line>> = vec![Vec::new(); num_cols];
        for (i, kb) in hints.iter().enumerate() {
            let Some(column) = columns.get_mut(i / num_rows) else {
                break;
            };
            column.push(Line::from(vec![
                Span::styled(
                    format!("{:>key_width$}", kb.key),
                    Style::default().fg(theme.peach()),
                ),
                Span::styled(" │ ", Style::default().fg(theme.surface2())),
                Span::styled(kb.description.clone(), Style::default().fg(theme.subtext0())),
            ]));
        }

        let areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Length(col_width); num_cols])
            .split(area);
        for (lines, column_area) in columns.into_iter().zip(areas.iter()) {
            frame.render_widget(Paragraph::new(lines), *column_area);
        }
    }

    fn render_logo(frame: &mut Frame, area: Rect, theme: &Theme) {
        let style = Style::default()
            .fg(theme.mauve())
            .add_modifier(Modifier::BOLD);
        let lines: Vec<Line> = LOGO
            .iter()
            .map(|line| Line::from(Span::styled(*line, style)))
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    /// Keybindings that work on every screen.
    pub fn global_keybindings(&self) -> Vec<Keybinding> {
        vec![
            Keybinding::hint(self.resolver.display_global(GlobalAction::Help), "Help"),
            Keybinding::hint(self.resolver.display_global(GlobalAction::Back), "Back"),
            Keybinding::new(self.resolver.display_global(GlobalAction::Quit), "Quit"),
            Keybinding::new(self.resolver.display_nav(NavAction::Select), "Select"),
            Keybinding::new(
                format!(
                    "{}/{}",
                    self.resolver.display_nav(NavAction::Up),
                    self.resolver.display_nav(NavAction::Down)
                ),
                "Navigate",
            ),
        ]
    }
}

fn status_line<'a>(
    label: &'a str,
    value: &str,
    max_width: usize,
    label_style: Style,
    value_style: Style,
) -> Line<'a> {
    const LABEL_W: usize = 6;
    let available = max_width.saturating_sub(LABEL_W + 1);
    Line::from(vec![
        Span::styled(format!("{label:>LABEL_W$}"), label_style),
        Span::raw(" "),
        Span::styled(truncate(value, available), value_style),
    ])
}

/// Shorten `s` to at most `max_width` characters, ending in "..." when cut.
fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return s.chars().take(max_width).collect();
    }
    let mut out: String = s.chars().take(max_width - 3).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("https://example.com/api", 10), "https:/...");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_renders_connection_and_hints() {
        let mut bar = StatusBar::new(
            "https://api.example.com",
            true,
            Arc::new(KeyResolver::default()),
        );
        bar.set_resource(Some("Careers".to_string()));

        let mut terminal = Terminal::new(TestBackend::new(140, 7)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|frame| {
                bar.render_with_keybindings(
                    frame,
                    frame.area(),
                    &theme,
                    &[Keybinding::hint("n", "New record")],
                );
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Careers"));
        assert!(text.contains("https://api.example.com"));
        assert!(text.contains("bearer token"));
        assert!(text.contains("New record"));
    }
}
