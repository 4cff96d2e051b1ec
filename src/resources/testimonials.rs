use ratatui::layout::Constraint;
use serde::{Deserialize, Serialize};

use super::or_no_message;
use crate::resource::{RecordId, Resource, RowAction, actions_column, lenient};
use crate::table::Column;
use crate::ui::FormField;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub message: Option<String>,
}

impl Resource for Testimonial {
    const KEY: &'static str = "testimonials";
    const TITLE: &'static str = "Testimonials";
    const ITEM: &'static str = "Testimonial";
    const DESCRIPTION: &'static str = "Overview of all Testimonials";
    const PATH: &'static str = "api/testimonials";

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::field("first_name", "First Name", |t: &Self| t.first_name.as_str().into())
                .width(Constraint::Length(16)),
            Column::field("last_name", "Last Name", |t: &Self| t.last_name.as_str().into())
                .width(Constraint::Length(16)),
            Column::field("message", "Message", |t: &Self| t.message.as_deref().into())
                .render_with(|t: &Self| or_no_message(t.message.as_deref()))
                .width(Constraint::Min(30)),
            actions_column(),
        ]
    }

    fn actions(&self) -> Vec<RowAction> {
        vec![RowAction::Edit, RowAction::Delete]
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("first_name", "First Name"),
            FormField::required("last_name", "Last Name"),
            FormField::required("message", "Message"),
        ];
        FIELDS
    }

    fn form_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("first_name", self.first_name.clone()),
            ("last_name", self.last_name.clone()),
            ("message", self.message.clone().unwrap_or_default()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::table::DataTable;

    #[test]
    fn test_missing_message_placeholder_is_not_searchable() {
        let rows: Vec<Testimonial> = serde_json::from_value(json!([
            { "id": 1, "first_name": "Lea", "last_name": "Santos", "message": null }
        ]))
        .unwrap();
        let mut table = DataTable::new(Testimonial::columns(), rows);
        assert_eq!(table.render_page()[0][2], "No message");
        table.set_search_term("no message");
        assert_eq!(table.filtered_rows().count(), 0);
    }

    #[test]
    fn test_form_round_trips_names() {
        let t: Testimonial = serde_json::from_value(json!({
            "id": 4, "first_name": "Lea", "last_name": "Santos", "message": "Great"
        }))
        .unwrap();
        assert_eq!(t.name(), "Lea Santos");
        assert_eq!(t.form_values()[2], ("message", "Great".to_string()));
    }
}
