use ratatui::layout::Constraint;

use crate::table::FieldValue;

/// Reads the raw value of one field from a row.
pub type FieldAccessor<T> = fn(&T) -> FieldValue;

/// Produces the cell text for one row, replacing the default field display.
pub type CellRenderer<T> = fn(&T) -> String;

/// Column descriptor for a [`DataTable`](crate::table::DataTable).
///
/// A column is a direct field accessor, a render-only accessor, or a field
/// accessor with a custom renderer. Only columns with a field accessor take
/// part in search. Keys must be unique within a schema; this is not checked.
pub struct Column<T> {
    key: &'static str,
    label: &'static str,
    field: Option<FieldAccessor<T>>,
    render: Option<CellRenderer<T>>,
    width: Constraint,
}

// Manual impls: a derive would require `T: Clone`.
impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Column<T> {}

impl<T> Column<T> {
    /// A column backed by a field of the row.
    pub const fn field(key: &'static str, label: &'static str, field: FieldAccessor<T>) -> Self {
        Self {
            key,
            label,
            field: Some(field),
            render: None,
            width: Constraint::Min(10),
        }
    }

    /// A column that only renders; it never matches a search term.
    pub const fn rendered(key: &'static str, label: &'static str, render: CellRenderer<T>) -> Self {
        Self {
            key,
            label,
            field: None,
            render: Some(render),
            width: Constraint::Min(10),
        }
    }

    /// Replace the default display of the field with a custom renderer.
    #[must_use]
    pub const fn render_with(mut self, render: CellRenderer<T>) -> Self {
        self.render = Some(render);
        self
    }

    #[must_use]
    pub const fn width(mut self, width: Constraint) -> Self {
        self.width = width;
        self
    }

    pub const fn key(&self) -> &'static str {
        self.key
    }

    pub const fn label(&self) -> &'static str {
        self.label
    }

    pub const fn constraint(&self) -> Constraint {
        self.width
    }

    pub const fn is_searchable(&self) -> bool {
        self.field.is_some()
    }

    /// Raw value of this column for `row`, `Empty` for render-only columns.
    pub fn value(&self, row: &T) -> FieldValue {
        self.field.map_or(FieldValue::Empty, |field| field(row))
    }

    /// Cell text: the renderer output if present, otherwise the field display.
    pub fn cell(&self, row: &T) -> String {
        match (self.render, self.field) {
            (Some(render), _) => render(row),
            (None, Some(field)) => field(row).display(),
            (None, None) => String::new(),
        }
    }

    /// Whether this column's raw value contains `needle` (already lower-cased).
    pub(crate) fn matches(&self, row: &T, needle: &str) -> bool {
        self.field
            .and_then(|field| field(row).search_text())
            .is_some_and(|text| text.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Person {
        name: String,
        age: Option<i64>,
    }

    fn alice() -> Person {
        Person {
            name: "Alice".into(),
            age: None,
        }
    }

    #[test]
    fn test_field_column_displays_value() {
        let column = Column::field("name", "Name", |p: &Person| p.name.as_str().into());
        assert_eq!(column.cell(&alice()), "Alice");
        assert!(column.matches(&alice(), "lic"));
    }

    #[test]
    fn test_rendered_column_is_not_searchable() {
        let column = Column::rendered("badge", "Badge", |p: &Person| format!("<{}>", p.name));
        assert_eq!(column.cell(&alice()), "<Alice>");
        assert!(!column.is_searchable());
        assert!(!column.matches(&alice(), "alice"));
    }

    #[test]
    fn test_renderer_overrides_display_but_not_search() {
        let column = Column::field("name", "Name", |p: &Person| p.name.as_str().into())
            .render_with(|_| "hidden".to_string());
        assert_eq!(column.cell(&alice()), "hidden");
        assert!(column.matches(&alice(), "alice"));
        assert!(!column.matches(&alice(), "hidden"));
    }

    #[test]
    fn test_empty_field_renders_blank() {
        let column = Column::field("age", "Age", |p: &Person| p.age.into());
        assert_eq!(column.cell(&alice()), "");
        assert!(!column.matches(&alice(), "a"));
    }
}
