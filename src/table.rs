//! Generic client-side table engine.
//!
//! [`DataTable`] owns a typed row collection, a column schema and the view
//! state (search term, visible columns, page size, current page). Filtering
//! and pagination are derived from that state; the engine never mutates rows.

mod column;
mod state;
mod value;

pub use column::{CellRenderer, Column, FieldAccessor};
pub use state::{InvalidRowsPerPage, RowsPerPage, ViewState};
pub use value::FieldValue;

/// Option of the status filter drop-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOption {
    pub key: String,
    pub label: String,
}

impl StatusOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Key of the status option that disables status filtering.
const ALL_STATUSES: &str = "all";

pub struct DataTable<T> {
    columns: Vec<Column<T>>,
    rows: Vec<T>,
    label: String,
    description: String,
    filter: bool,
    status_column: Option<&'static str>,
    status_options: Vec<StatusOption>,
    state: ViewState,
    /// Indices into `rows` that pass the current search and status filter.
    filtered: Vec<usize>,
}

impl<T> DataTable<T> {
    /// Create a table with every column visible and the column picker enabled.
    pub fn new(columns: Vec<Column<T>>, rows: Vec<T>) -> Self {
        let state = ViewState::new(columns.iter().map(Column::key));
        let mut table = Self {
            columns,
            rows,
            label: String::new(),
            description: String::new(),
            filter: true,
            status_column: None,
            status_options: Vec::new(),
            state,
            filtered: Vec::new(),
        };
        table.refilter();
        table
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the column-visibility control is offered.
    #[must_use]
    pub const fn with_filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    /// Filter rows by the exact value of `column`, chosen from `options`.
    ///
    /// An option keyed `all` is treated as "no filter".
    #[must_use]
    pub fn with_status_filter(mut self, column: &'static str, options: Vec<StatusOption>) -> Self {
        self.status_column = Some(column);
        self.status_options = options;
        self
    }

    #[must_use]
    pub const fn with_rows_per_page(mut self, rows_per_page: RowsPerPage) -> Self {
        self.state.rows_per_page = rows_per_page;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn has_column_filter(&self) -> bool {
        self.filter
    }

    pub fn status_options(&self) -> &[StatusOption] {
        &self.status_options
    }

    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Replace the rows after a refresh, keeping the view state.
    pub fn set_data(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.refilter();
        self.clamp_page();
    }

    // === Search ===

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
        self.state.current_page = 1;
        self.refilter();
    }

    // === Column visibility ===

    pub fn visible_columns(&self) -> impl Iterator<Item = &Column<T>> {
        self.columns
            .iter()
            .filter(|c| self.state.visible.contains(c.key()))
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.visible_columns().map(Column::label).collect()
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.state.is_visible(key)
    }

    /// Show or hide a column. Unknown keys are ignored.
    pub fn toggle_column(&mut self, key: &str) {
        let Some(key) = self.schema_key(key) else {
            return;
        };
        if !self.state.visible.remove(key) {
            self.state.visible.insert(key);
        }
        self.refilter();
        self.clamp_page();
    }

    /// Replace the visible set. Keys outside the schema are dropped.
    pub fn set_visible_columns<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        self.state.visible = keys
            .into_iter()
            .filter_map(|key| self.schema_key(key))
            .collect();
        self.refilter();
        self.clamp_page();
    }

    fn schema_key(&self, key: &str) -> Option<&'static str> {
        self.columns.iter().map(Column::key).find(|k| *k == key)
    }

    // === Status filter ===

    pub fn set_status_filter(&mut self, status: Option<String>) {
        self.state.status_filter = status.filter(|s| !s.eq_ignore_ascii_case(ALL_STATUSES));
        self.state.current_page = 1;
        self.refilter();
    }

    /// Advance to the next status option, wrapping back to "all".
    pub fn cycle_status_filter(&mut self) {
        let keys: Vec<&str> = self
            .status_options
            .iter()
            .map(|o| o.key.as_str())
            .filter(|k| !k.eq_ignore_ascii_case(ALL_STATUSES))
            .collect();
        let next = match self.state.status_filter.as_deref() {
            None => keys.first(),
            Some(current) => keys
                .iter()
                .position(|k| *k == current)
                .and_then(|i| keys.get(i + 1)),
        }
        .map(|k| (*k).to_string());
        self.set_status_filter(next);
    }

    /// Label of the active status option, "All" when none is selected.
    pub fn status_label(&self) -> &str {
        self.state.status_filter.as_deref().map_or("All", |key| {
            self.status_options
                .iter()
                .find(|o| o.key == key)
                .map_or(key, |o| o.label.as_str())
        })
    }

    // === Pagination ===

    pub fn set_rows_per_page(&mut self, rows_per_page: RowsPerPage) {
        self.state.rows_per_page = rows_per_page;
        self.state.current_page = 1;
    }

    pub fn cycle_rows_per_page(&mut self) {
        self.set_rows_per_page(self.state.rows_per_page.next());
    }

    /// Number of pages of the filtered set; zero when nothing matches.
    pub const fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.state.rows_per_page.get())
    }

    pub const fn current_page(&self) -> usize {
        self.state.current_page
    }

    /// Jump to `page`, clamped to the available pages.
    pub fn set_page(&mut self, page: usize) {
        self.state.current_page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.state.current_page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.state.current_page.saturating_sub(1));
    }

    fn clamp_page(&mut self) {
        self.set_page(self.state.current_page);
    }

    // === Derived rows ===

    pub const fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn filtered_rows(&self) -> impl Iterator<Item = &T> {
        self.filtered.iter().map(|&i| &self.rows[i])
    }

    /// Rows of the current page, taken from the filtered set.
    pub fn page_rows(&self) -> Vec<&T> {
        let per_page = self.state.rows_per_page.get();
        let start = (self.state.current_page - 1) * per_page;
        self.filtered
            .iter()
            .skip(start)
            .take(per_page)
            .map(|&i| &self.rows[i])
            .collect()
    }

    /// Cell text of the current page, one inner vector per row.
    pub fn render_page(&self) -> Vec<Vec<String>> {
        self.page_rows()
            .into_iter()
            .map(|row| self.visible_columns().map(|c| c.cell(row)).collect())
            .collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {} items",
            self.page_rows().len(),
            self.filtered.len()
        )
    }

    fn refilter(&mut self) {
        let needle = self.state.search_term.to_lowercase();
        let status = self
            .status_column
            .and_then(|key| self.columns.iter().find(|c| c.key() == key))
            .zip(self.state.status_filter.as_deref());

        self.filtered = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                status.is_none_or(|(column, wanted)| {
                    column.value(row).display().eq_ignore_ascii_case(wanted)
                })
            })
            .filter(|(_, row)| needle.is_empty() || self.matches_search(row, &needle))
            .map(|(i, _)| i)
            .collect();
    }

    fn matches_search(&self, row: &T, needle: &str) -> bool {
        self.visible_columns().any(|c| c.matches(row, needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Member {
        name: String,
        kind: String,
        secret: Option<String>,
    }

    fn member(name: &str, kind: &str) -> Member {
        Member {
            name: name.to_string(),
            kind: kind.to_string(),
            secret: None,
        }
    }

    fn columns() -> Vec<Column<Member>> {
        vec![
            Column::field("name", "Name", |m: &Member| m.name.as_str().into()),
            Column::field("type", "Type", |m: &Member| m.kind.as_str().into()),
            Column::field("secret", "Secret", |m: &Member| m.secret.clone().into()),
            Column::rendered("actions", "Actions", |_| "[e] Edit".to_string()),
        ]
    }

    fn numbered(count: usize) -> Vec<Member> {
        (1..=count)
            .map(|i| member(&format!("member-{i:02}"), "A"))
            .collect()
    }

    #[test]
    fn test_search_scenario() {
        let mut table = DataTable::new(columns(), vec![member("Alice", "A"), member("Bob", "B")]);
        table.set_search_term("ali");

        let filtered: Vec<_> = table.filtered_rows().collect();
        assert_eq!(filtered, vec![&member("Alice", "A")]);
        assert_eq!(table.total_pages(), 1);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut table = DataTable::new(columns(), vec![member("alice", "A"), member("Bob", "B")]);
        table.set_search_term("ALI");
        assert_eq!(table.filtered_len(), 1);
    }

    #[test]
    fn test_filtered_rows_match_and_excluded_rows_do_not() {
        let rows = vec![
            member("Alice", "Admin"),
            member("Bob", "Agent"),
            member("Carol", "Client"),
            member("Dan", "admin"),
        ];
        let mut table = DataTable::new(columns(), rows.clone());
        table.set_search_term("adm");

        let filtered: Vec<_> = table.filtered_rows().cloned().collect();
        for row in &rows {
            let matches = table
                .visible_columns()
                .any(|c| c.value(row).search_text().is_some_and(|t| t.contains("adm")));
            assert_eq!(filtered.contains(row), matches, "row {row:?}");
        }
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_empty_term_keeps_all_rows() {
        let mut table = DataTable::new(columns(), numbered(7));
        table.set_search_term("");
        assert_eq!(table.filtered_len(), 7);
    }

    #[test]
    fn test_empty_values_never_match() {
        let mut table = DataTable::new(columns(), vec![member("", "")]);
        table.set_search_term("a");
        assert_eq!(table.filtered_len(), 0);
    }

    #[test]
    fn test_render_only_columns_are_not_searched() {
        let mut table = DataTable::new(columns(), vec![member("Alice", "A")]);
        table.set_search_term("edit");
        assert_eq!(table.filtered_len(), 0);
    }

    #[test]
    fn test_hidden_column_is_not_searchable() {
        let mut rows = vec![member("Alice", "A"), member("Bob", "B")];
        rows[1].secret = Some("needle".to_string());
        let mut table = DataTable::new(columns(), rows);

        table.set_search_term("needle");
        assert_eq!(table.filtered_len(), 1);

        table.toggle_column("secret");
        assert_eq!(table.filtered_len(), 0);
        assert!(!table.headers().contains(&"Secret"));

        table.toggle_column("secret");
        assert_eq!(table.filtered_len(), 1);
        assert!(table.headers().contains(&"Secret"));
    }

    #[test]
    fn test_unknown_column_keys_are_ignored() {
        let mut table = DataTable::new(columns(), numbered(1));
        table.toggle_column("nope");
        table.set_visible_columns(["name", "nope"]);

        assert!(table.is_visible("name"));
        assert!(!table.is_visible("nope"));
        assert_eq!(table.headers(), vec!["Name"]);
    }

    #[test]
    fn test_search_resets_page() {
        let mut table = DataTable::new(columns(), numbered(12));
        table.set_page(3);
        assert_eq!(table.current_page(), 3);

        table.set_search_term("member");
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_rows_per_page_change_resets_page() {
        let mut table = DataTable::new(columns(), numbered(12));
        table.set_page(2);
        table.set_rows_per_page(RowsPerPage::Ten);
        assert_eq!(table.current_page(), 1);
        assert_eq!(table.total_pages(), 2);
    }

    #[test]
    fn test_twelve_rows_five_per_page() {
        let mut table = DataTable::new(columns(), numbered(12));
        assert_eq!(table.total_pages(), 3);

        table.set_page(3);
        let page = table.page_rows();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "member-11");
        assert_eq!(page[1].name, "member-12");
    }

    #[test]
    fn test_pages_partition_filtered_rows() {
        for rows_per_page in RowsPerPage::ALL {
            for count in [0, 1, 4, 5, 6, 14, 15, 16, 31] {
                let mut table =
                    DataTable::new(columns(), numbered(count)).with_rows_per_page(rows_per_page);

                let mut seen = Vec::new();
                for page in 1..=table.total_pages() {
                    table.set_page(page);
                    let rows = table.page_rows();
                    assert!(rows.len() <= rows_per_page.get());
                    seen.extend(rows.into_iter().cloned());
                }
                let filtered: Vec<_> = table.filtered_rows().cloned().collect();
                assert_eq!(seen, filtered, "{count} rows at {rows_per_page}");
            }
        }
    }

    #[test]
    fn test_empty_data() {
        let mut table = DataTable::new(columns(), Vec::new());
        assert_eq!(table.total_pages(), 0);
        assert!(table.page_rows().is_empty());
        assert!(table.render_page().is_empty());
        assert_eq!(table.summary(), "Showing 0 of 0 items");

        table.next_page();
        table.previous_page();
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_page_navigation_is_clamped() {
        let mut table = DataTable::new(columns(), numbered(12));
        table.previous_page();
        assert_eq!(table.current_page(), 1);

        table.set_page(99);
        assert_eq!(table.current_page(), 3);

        table.next_page();
        assert_eq!(table.current_page(), 3);
    }

    #[test]
    fn test_set_data_keeps_state_and_clamps_page() {
        let mut table = DataTable::new(columns(), numbered(12));
        table.set_page(3);
        table.set_data(numbered(6));
        assert_eq!(table.current_page(), 2);
        assert_eq!(table.page_rows().len(), 1);
    }

    #[test]
    fn test_render_page_uses_renderer_then_field() {
        let mut table = DataTable::new(columns(), vec![member("Alice", "A")]);
        assert_eq!(
            table.render_page(),
            vec![vec![
                "Alice".to_string(),
                "A".to_string(),
                String::new(),
                "[e] Edit".to_string()
            ]]
        );

        table.toggle_column("type");
        assert_eq!(table.headers(), vec!["Name", "Secret", "Actions"]);
        assert_eq!(table.render_page()[0].len(), 3);
    }

    #[test]
    fn test_status_filter() {
        let rows = vec![member("Alice", "Admin"), member("Bob", "Agent"), member("Carol", "admin")];
        let mut table = DataTable::new(columns(), rows).with_status_filter(
            "type",
            vec![
                StatusOption::new("all", "All"),
                StatusOption::new("admin", "Admins"),
                StatusOption::new("agent", "Agents"),
            ],
        );
        assert_eq!(table.status_label(), "All");

        table.cycle_status_filter();
        assert_eq!(table.status_label(), "Admins");
        assert_eq!(table.filtered_len(), 2);

        table.set_search_term("car");
        assert_eq!(table.filtered_len(), 1);
        table.set_search_term("");

        table.cycle_status_filter();
        assert_eq!(table.status_label(), "Agents");
        assert_eq!(table.filtered_len(), 1);

        table.cycle_status_filter();
        assert_eq!(table.status_label(), "All");
        assert_eq!(table.filtered_len(), 3);
    }

    #[test]
    fn test_summary() {
        let mut table = DataTable::new(columns(), numbered(12));
        table.set_page(3);
        assert_eq!(table.summary(), "Showing 2 of 12 items");
    }
}
