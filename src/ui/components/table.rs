use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Paragraph, Row, Table as RatatuiTable, TableState,
};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver, NavAction, SearchAction, TableAction};
use crate::table::DataTable;
use crate::ui::{
    ColumnPicker, ColumnPickerEvent, Component, EventResult, Keybinding, Result, TextInput,
    TextInputEvent,
};

pub enum TableEvent<T> {
    Activated(T),
}

/// Interactive view over a [`DataTable`].
///
/// Adds row selection within the current page, a search bar and the
/// column picker popup on top of the engine's filtering and paging.
pub struct Table<T: Clone> {
    data: DataTable<T>,
    state: TableState,
    searching: bool,
    search: TextInput,
    picker: Option<ColumnPicker>,
    resolver: Arc<KeyResolver>,
}

impl<T: Clone> Table<T> {
    pub fn new(data: DataTable<T>, resolver: Arc<KeyResolver>) -> Self {
        let mut table = Self {
            data,
            state: TableState::default(),
            searching: false,
            search: TextInput::new("Search").with_placeholder("type to filter rows"),
            picker: None,
            resolver,
        };
        table.clamp_selection();
        table
    }

    pub const fn data(&self) -> &DataTable<T> {
        &self.data
    }

    pub const fn is_searching(&self) -> bool {
        self.searching
    }

    /// Whether a popup or the search bar is capturing keys.
    pub const fn is_capturing_input(&self) -> bool {
        self.searching || self.picker.is_some()
    }

    pub fn set_data(&mut self, rows: Vec<T>) {
        self.data.set_data(rows);
        self.clamp_selection();
    }

    pub fn selected_item(&self) -> Option<&T> {
        let index = self.state.selected()?;
        self.data.page_rows().get(index).copied()
    }

    fn page_len(&self) -> usize {
        self.data.page_rows().len()
    }

    fn clamp_selection(&mut self) {
        let len = self.page_len();
        let selected = match self.state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.state.select(selected);
    }

    fn reset_selection(&mut self) {
        self.state.select(None);
        self.clamp_selection();
    }

    fn select(&mut self, index: usize) {
        let len = self.page_len();
        if len > 0 {
            self.state.select(Some(index.min(len - 1)));
        }
    }

    fn open_picker(&mut self) {
        let columns = self
            .data
            .columns()
            .iter()
            .map(|c| (c.key(), c.label(), self.data.is_visible(c.key())));
        self.picker = Some(ColumnPicker::new(columns, self.resolver.clone()));
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> Result<EventResult<TableEvent<T>>> {
        let Some(picker) = self.picker.as_mut() else {
            return Ok(EventResult::Ignored);
        };
        match picker.handle_key(key)? {
            EventResult::Event(ColumnPickerEvent::Toggled(column)) => {
                self.data.toggle_column(column);
                self.clamp_selection();
            }
            EventResult::Event(ColumnPickerEvent::Closed) => self.picker = None,
            EventResult::Consumed | EventResult::Ignored => {}
        }
        Ok(EventResult::Consumed)
    }

    fn clear_search(&mut self) {
        self.searching = false;
        self.search.set_value("");
        if !self.data.state().search_term().is_empty() {
            self.data.set_search_term("");
            self.reset_selection();
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<EventResult<TableEvent<T>>> {
        if self.resolver.matches_search(&key, SearchAction::Exit) {
            self.clear_search();
            return Ok(EventResult::Consumed);
        }
        match self.search.handle_key(key)? {
            EventResult::Event(TextInputEvent::Submitted(_)) => self.searching = false,
            EventResult::Event(TextInputEvent::Cancelled) => self.clear_search(),
            EventResult::Consumed => {
                if self.search.value() != self.data.state().search_term() {
                    self.data.set_search_term(self.search.value());
                    self.reset_selection();
                }
            }
            EventResult::Ignored => {}
        }
        Ok(EventResult::Consumed)
    }

    /// Keybindings offered by the table itself.
    pub fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        let mut bindings = vec![
            Keybinding::hint(r.display_search(SearchAction::Toggle), "Search"),
            Keybinding::hint(
                format!(
                    "{}/{}",
                    r.display_table(TableAction::PreviousPage),
                    r.display_table(TableAction::NextPage)
                ),
                "Page",
            ),
            Keybinding::new(r.display_table(TableAction::RowsPerPage), "Rows per page"),
        ];
        if self.data.has_column_filter() {
            bindings.push(Keybinding::hint(r.display_table(TableAction::Columns), "Columns"));
        }
        if !self.data.status_options().is_empty() {
            bindings.push(Keybinding::hint(r.display_table(TableAction::Status), "Status"));
        }
        bindings
    }

    fn render_heading(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut spans = vec![Span::styled(
            self.data.label().to_string(),
            Style::default()
                .fg(theme.mauve())
                .add_modifier(Modifier::BOLD),
        )];
        if !self.data.description().is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                self.data.description().to_string(),
                Style::default().fg(theme.subtext0()),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_grid(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border()));

        let widths: Vec<Constraint> = self
            .data
            .visible_columns()
            .map(|c| c.constraint())
            .collect();
        let header = Row::new(
            self.data
                .headers()
                .into_iter()
                .map(|h| Cell::from(h).style(Style::default().fg(theme.header()))),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = self.data.render_page();
        if rows.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(
                RatatuiTable::new(Vec::<Row>::new(), widths)
                    .header(header)
                    .block(block)
                    .column_spacing(2),
                area,
            );
            let [_, body] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
            let message = Paragraph::new("No data found")
                .style(Style::default().fg(theme.overlay1()))
                .alignment(Alignment::Center);
            let center = body.centered(Constraint::Percentage(100), Constraint::Length(1));
            frame.render_widget(message, center);
            return;
        }

        let body = rows.into_iter().map(|cells| {
            Row::new(cells.into_iter().map(Cell::from)).style(Style::default().fg(theme.text()))
        });

        let grid = RatatuiTable::new(body, widths)
            .header(header)
            .block(block)
            .column_spacing(2)
            .row_highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(grid, area, &mut self.state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let label = Style::default().fg(theme.overlay1());
        let value = Style::default().fg(theme.text());
        let sep = Span::styled("  │  ", Style::default().fg(theme.surface2()));

        let mut spans = vec![Span::styled(self.data.summary(), value), sep.clone()];
        if !self.data.status_options().is_empty() {
            spans.push(Span::styled("Status: ", label));
            spans.push(Span::styled(self.data.status_label().to_string(), value));
            spans.push(sep.clone());
        }
        spans.push(Span::styled("Rows per page: ", label));
        spans.push(Span::styled(
            self.data.state().rows_per_page().to_string(),
            value,
        ));
        spans.push(sep);
        let total_pages = self.data.total_pages();
        let page = if total_pages == 0 {
            0
        } else {
            self.data.current_page()
        };
        spans.push(Span::styled(format!("Page {page}/{total_pages}"), value));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl<T: Clone> Component for Table<T> {
    type Output = TableEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.picker.is_some() {
            return self.handle_picker_key(key);
        }
        if self.searching {
            return self.handle_search_key(key);
        }

        let r = self.resolver.clone();
        let current = self.state.selected().unwrap_or(0);

        if r.matches_search(&key, SearchAction::Toggle) {
            self.searching = true;
        } else if r.matches_nav(&key, NavAction::Down) {
            self.select(self.state.selected().map_or(0, |i| i + 1));
        } else if r.matches_nav(&key, NavAction::Up) {
            self.select(current.saturating_sub(1));
        } else if r.matches_nav(&key, NavAction::Home) {
            self.select(0);
        } else if r.matches_nav(&key, NavAction::End) {
            self.select(usize::MAX);
        } else if r.matches_table(&key, TableAction::NextPage)
            || r.matches_nav(&key, NavAction::PageDown)
        {
            self.data.next_page();
            self.reset_selection();
        } else if r.matches_table(&key, TableAction::PreviousPage)
            || r.matches_nav(&key, NavAction::PageUp)
        {
            self.data.previous_page();
            self.reset_selection();
        } else if r.matches_table(&key, TableAction::RowsPerPage) {
            self.data.cycle_rows_per_page();
            self.reset_selection();
        } else if r.matches_table(&key, TableAction::Columns) && self.data.has_column_filter() {
            self.open_picker();
        } else if r.matches_table(&key, TableAction::Status)
            && !self.data.status_options().is_empty()
        {
            self.data.cycle_status_filter();
            self.reset_selection();
        } else if r.matches_nav(&key, NavAction::Select) {
            return Ok(self
                .selected_item()
                .cloned()
                .map_or(EventResult::Ignored, |item| TableEvent::Activated(item).into()));
        } else if r.matches_global(&key, GlobalAction::Back)
            && !self.data.state().search_term().is_empty()
        {
            self.clear_search();
        } else {
            return Ok(EventResult::Ignored);
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let show_search = self.searching || !self.search.value().is_empty();
        let [heading, grid, search, footer] = Layout::vertical([
            Constraint::Length(u16::from(!self.data.label().is_empty())),
            Constraint::Min(3),
            Constraint::Length(if show_search { 3 } else { 0 }),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_heading(frame, heading, theme);
        self.render_grid(frame, grid, theme);
        if show_search {
            self.search.set_focused(self.searching);
            self.search.render(frame, search, theme);
        }
        self.render_footer(frame, footer, theme);

        if let Some(picker) = self.picker.as_mut() {
            picker.render(frame, area, theme);
        }
    }
}
