use ratatui::layout::Constraint;
use serde::{Deserialize, Serialize};

use super::{file_name, format_date, parse_timestamp};
use crate::resource::{RecordId, Resource, RowAction, actions_column, lenient};
use crate::table::Column;
use crate::ui::FormField;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub image: Option<String>,
}

impl Resource for Certificate {
    const KEY: &'static str = "certificates";
    const TITLE: &'static str = "Certificates";
    const ITEM: &'static str = "Certificate";
    const DESCRIPTION: &'static str = "Overview of all Certificates.";
    const PATH: &'static str = "api/certificates";

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::field("name", "Name", |c: &Self| c.name.as_str().into())
                .width(Constraint::Min(24)),
            Column::field("date", "Date", |c: &Self| c.date.as_deref().into())
                .render_with(|c: &Self| format_date(c.date.as_deref()))
                .width(Constraint::Length(12)),
            Column::rendered("image", "Image", |c: &Self| {
                file_name(c.image.as_deref(), "No image")
            }),
            actions_column(),
        ]
    }

    fn actions(&self) -> Vec<RowAction> {
        vec![RowAction::Edit, RowAction::Delete]
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("name", "Name"),
            FormField::required("date", "Date"),
        ];
        FIELDS
    }

    fn form_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("date", self.date.clone().unwrap_or_default()),
        ]
    }

    fn prepare(rows: &mut [Self]) {
        rows.sort_by_key(|c| std::cmp::Reverse(c.date.as_deref().and_then(parse_timestamp)));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::table::DataTable;

    fn certificates() -> Vec<Certificate> {
        serde_json::from_value(json!([
            { "id": 1, "name": "ISO 9001", "date": "2021-05-04", "image": "certs/iso.jpg" },
            { "id": 2, "name": "DOLE License", "date": "2024-02-10", "image": null }
        ]))
        .unwrap()
    }

    #[test]
    fn test_newest_first_with_formatted_date() {
        let mut rows = certificates();
        Certificate::prepare(&mut rows);
        let table = DataTable::new(Certificate::columns(), rows);
        let page = table.render_page();
        assert_eq!(page[0], vec!["DOLE License", "10-Feb-2024", "No image", "Edit · Delete"]);
        assert_eq!(page[1][2], "iso.jpg");
    }

    #[test]
    fn test_date_search_uses_raw_value() {
        let mut table = DataTable::new(Certificate::columns(), certificates());
        table.set_search_term("2021-05");
        assert_eq!(table.filtered_rows().count(), 1);
        table.set_search_term("may");
        assert_eq!(table.filtered_rows().count(), 0);
    }
}
