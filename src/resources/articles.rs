use ratatui::layout::Constraint;
use serde::{Deserialize, Serialize};

use super::{file_name, format_date, or_no_message, parse_timestamp};
use crate::resource::{RecordId, Resource, RowAction, actions_column, lenient};
use crate::table::Column;
use crate::ui::FormField;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub content: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub image: Option<String>,
}

impl Resource for Article {
    const KEY: &'static str = "articles";
    const TITLE: &'static str = "Articles";
    const ITEM: &'static str = "Article";
    const DESCRIPTION: &'static str = "Overview of all Articles.";
    const PATH: &'static str = "api/articles";

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.title.clone()
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::field("title", "Title", |a: &Self| a.title.as_str().into())
                .width(Constraint::Min(20)),
            Column::field("date", "Date", |a: &Self| a.date.as_deref().into())
                .render_with(|a: &Self| format_date(a.date.as_deref()))
                .width(Constraint::Length(12)),
            Column::field("content", "Content", |a: &Self| a.content.as_deref().into())
                .render_with(|a: &Self| or_no_message(a.content.as_deref()))
                .width(Constraint::Min(30)),
            Column::field("type", "Type", |a: &Self| a.kind.as_str().into())
                .width(Constraint::Length(12)),
            Column::rendered("image", "Preview", |a: &Self| {
                file_name(a.image.as_deref(), "No media available")
            }),
            actions_column(),
        ]
    }

    fn actions(&self) -> Vec<RowAction> {
        vec![RowAction::Edit, RowAction::Delete]
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("title", "Title"),
            FormField::required("date", "Date"),
            FormField::optional("content", "Content"),
            FormField::required("type", "Type"),
        ];
        FIELDS
    }

    fn form_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("date", self.date.clone().unwrap_or_default()),
            ("content", self.content.clone().unwrap_or_default()),
            ("type", self.kind.clone()),
        ]
    }

    /// Newest first; undated articles last.
    fn prepare(rows: &mut [Self]) {
        rows.sort_by_key(|a| std::cmp::Reverse(a.date.as_deref().and_then(parse_timestamp)));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::table::DataTable;

    fn article(id: i64, title: &str, date: Option<&str>) -> Article {
        serde_json::from_value(json!({
            "id": id,
            "title": title,
            "date": date,
            "content": null,
            "type": "News",
        }))
        .unwrap()
    }

    #[test]
    fn test_sorted_newest_first() {
        let mut rows = vec![
            article(1, "Old", Some("2023-01-01")),
            article(2, "Undated", None),
            article(3, "New", Some("2024-06-30")),
        ];
        Article::prepare(&mut rows);
        let titles: Vec<_> = rows.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old", "Undated"]);
    }

    #[test]
    fn test_cells_use_fallbacks() {
        let table = DataTable::new(Article::columns(), vec![article(1, "Launch", None)]);
        assert_eq!(
            table.render_page()[0],
            vec!["Launch", "N/A", "No message", "News", "No media available", "Edit · Delete"]
        );
    }

    #[test]
    fn test_search_reads_raw_type() {
        let mut table = DataTable::new(
            Article::columns(),
            vec![article(1, "Launch", Some("2024-01-01")), article(2, "Fair", None)],
        );
        table.set_search_term("news");
        assert_eq!(table.filtered_rows().count(), 2);
        table.set_search_term("fair");
        assert_eq!(table.filtered_rows().count(), 1);
    }
}
