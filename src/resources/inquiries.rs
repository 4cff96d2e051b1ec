use ratatui::layout::Constraint;
use serde::{Deserialize, Serialize};

use super::{UserRef, agent, agent_cell};
use crate::resource::{RecordId, Resource, RowAction, actions_column, lenient};
use crate::table::Column;
use crate::ui::FormField;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: RecordId,
    /// Agent the inquiry is addressed to.
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
}

impl Inquiry {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl Resource for Inquiry {
    const KEY: &'static str = "inquiries";
    const TITLE: &'static str = "Inquiries";
    const ITEM: &'static str = "Inquiry";
    const DESCRIPTION: &'static str = "Overview of all inquiries.";
    const PATH: &'static str = "api/inquiries";

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.full_name()
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::field("user", "Agent", |i: &Self| agent(i.user.as_ref()))
                .render_with(|i: &Self| agent_cell(i.user.as_ref()))
                .width(Constraint::Length(16)),
            Column::field("full_name", "Full Name", |i: &Self| i.full_name().into())
                .width(Constraint::Length(20)),
            Column::field("email", "Email", |i: &Self| i.email.as_str().into()),
            Column::field("phone", "Phone", |i: &Self| i.phone.as_str().into())
                .width(Constraint::Length(14)),
            Column::field("type", "Type", |i: &Self| i.kind.as_str().into())
                .width(Constraint::Length(10)),
            Column::field("message", "Message", |i: &Self| i.message.as_deref().into())
                .width(Constraint::Min(24)),
            Column::field("status", "Status", |i: &Self| i.status.as_str().into())
                .width(Constraint::Length(10)),
            actions_column(),
        ]
    }

    fn actions(&self) -> Vec<RowAction> {
        vec![RowAction::Reply, RowAction::Delete]
    }

    /// Inquiries are submitted by site visitors, never created here.
    fn can_create() -> bool {
        false
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("reply", "Reply"),
            FormField::optional("status", "Status"),
        ];
        FIELDS
    }

    fn form_values(&self) -> Vec<(&'static str, String)> {
        vec![("status", self.status.clone())]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::table::DataTable;

    fn inquiries() -> Vec<Inquiry> {
        serde_json::from_value(json!([
            {
                "id": 1,
                "user": { "id": 9, "name": "Maria Reyes" },
                "first_name": "Ana",
                "last_name": "Cruz",
                "email": "ana@example.com",
                "phone": "0917",
                "type": "Buy",
                "message": "Is it available?",
                "status": "Pending"
            },
            {
                "id": 2,
                "user": null,
                "first_name": "Ben",
                "last_name": "Lim",
                "type": "Rent",
                "status": "Replied"
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_agent_renders_name_or_placeholder() {
        let table = DataTable::new(Inquiry::columns(), inquiries());
        let page = table.render_page();
        assert_eq!(page[0][0], "Maria Reyes");
        assert_eq!(page[0][1], "Ana Cruz");
        assert_eq!(page[1][0], "N/A");
        assert_eq!(page[1][7], "Reply · Delete");
    }

    #[test]
    fn test_search_matches_agent_and_full_name() {
        let mut table = DataTable::new(Inquiry::columns(), inquiries());
        table.set_search_term("reyes");
        assert_eq!(table.filtered_rows().count(), 1);
        table.set_search_term("ben lim");
        assert_eq!(table.filtered_rows().count(), 1);
        table.set_search_term("n/a");
        assert_eq!(table.filtered_rows().count(), 0);
    }

    #[test]
    fn test_name_column_is_keyed_by_the_value_it_searches() {
        let columns = Inquiry::columns();
        let name = columns.iter().find(|c| c.label() == "Full Name").unwrap();
        assert_eq!(name.key(), "full_name");
        assert_eq!(name.value(&inquiries()[1]).display(), "Ben Lim");
        assert!(columns.iter().all(|c| c.key() != "first_name"));

        // hiding the name column drops both name parts from search
        let mut table = DataTable::new(Inquiry::columns(), inquiries());
        table.toggle_column("full_name");
        table.set_search_term("lim");
        assert_eq!(table.filtered_rows().count(), 0);
    }

    #[test]
    fn test_reply_only() {
        assert!(!Inquiry::can_create());
        assert_eq!(inquiries()[0].actions(), vec![RowAction::Reply, RowAction::Delete]);
    }
}
