use chrono::NaiveDateTime;
use ratatui::layout::Constraint;
use serde::{Deserialize, Serialize};

use super::{UserRef, agent, agent_cell, or_no_message, parse_timestamp};
use crate::resource::{RecordId, Resource, RowAction, actions_column, lenient};
use crate::table::{Column, StatusOption};

const PENDING: &str = "Pending";

/// A property viewing requested by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: RecordId,
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
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub time: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub properties: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
}

impl Schedule {
    /// Date and time combined; `None` if either is missing.
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        let (date, time) = (self.date.as_deref()?, self.time.as_deref()?);
        parse_timestamp(&format!("{date} {time}"))
    }

    fn info(&self) -> String {
        [
            format!("{} {}", self.first_name, self.last_name).trim().to_string(),
            self.email.clone(),
            self.phone.clone(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" · ")
    }

    fn date_time_cell(&self) -> String {
        self.starts_at().map_or_else(
            || "No date & time".to_string(),
            |dt| dt.format("%d-%b-%Y %I:%M %p").to_string(),
        )
    }
}

impl Resource for Schedule {
    const KEY: &'static str = "schedules";
    const TITLE: &'static str = "Schedules";
    const ITEM: &'static str = "Schedule";
    const DESCRIPTION: &'static str = "Overview of all Schedules.";
    const PATH: &'static str = "api/schedules";

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::field("user", "Agent", |s: &Self| agent(s.user.as_ref()))
                .render_with(|s: &Self| agent_cell(s.user.as_ref()))
                .width(Constraint::Length(16)),
            Column::field("info", "Info", |s: &Self| s.info().into())
                .width(Constraint::Min(28)),
            Column::field("date", "Date & Time", |s: &Self| s.date.as_deref().into())
                .render_with(Self::date_time_cell)
                .width(Constraint::Length(21)),
            Column::field("type", "Type", |s: &Self| s.kind.as_str().into())
                .width(Constraint::Length(10)),
            Column::field("properties", "Properties", |s: &Self| s.properties.as_str().into()),
            Column::field("message", "Message", |s: &Self| s.message.as_deref().into())
                .render_with(|s: &Self| or_no_message(s.message.as_deref())),
            Column::field("status", "Status", |s: &Self| s.status.as_str().into())
                .width(Constraint::Length(10)),
            actions_column(),
        ]
    }

    /// Only pending requests can be decided.
    fn actions(&self) -> Vec<RowAction> {
        if self.status == PENDING {
            vec![RowAction::Accept, RowAction::Decline]
        } else {
            Vec::new()
        }
    }

    fn status_filter() -> Option<(&'static str, Vec<StatusOption>)> {
        Some((
            "status",
            vec![
                StatusOption::new("all", "All"),
                StatusOption::new(PENDING, "Pending"),
                StatusOption::new("Accepted", "Accepted"),
                StatusOption::new("Declined", "Declined"),
            ],
        ))
    }

    fn prepare(rows: &mut [Self]) {
        rows.sort_by_key(|s| std::cmp::Reverse(s.starts_at()));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::table::DataTable;

    fn schedules() -> Vec<Schedule> {
        serde_json::from_value(json!([
            {
                "id": 1, "first_name": "Ana", "last_name": "Cruz", "email": "ana@example.com",
                "phone": "0917", "date": "2024-05-01", "time": "09:15:00", "type": "Viewing",
                "properties": "Unit 4B", "message": null, "status": "Accepted",
                "user": { "name": "Maria" }
            },
            {
                "id": 2, "first_name": "Ben", "last_name": "Lim", "date": "2024-06-12",
                "time": "14:30", "type": "Viewing", "properties": 12, "status": "Pending"
            },
            { "id": 3, "first_name": "Cy", "last_name": "Tan", "status": "Declined" }
        ]))
        .unwrap()
    }

    #[test]
    fn test_sorted_newest_first_and_formatted() {
        let mut rows = schedules();
        Schedule::prepare(&mut rows);
        let ids: Vec<_> = rows.iter().map(|s| s.id.to_string()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);

        let table = DataTable::new(Schedule::columns(), rows);
        let page = table.render_page();
        assert_eq!(page[0][2], "12-Jun-2024 02:30 PM");
        assert_eq!(page[1][2], "01-May-2024 09:15 AM");
        assert_eq!(page[2][2], "No date & time");
        assert_eq!(page[1][0], "Maria");
        assert_eq!(page[0][0], "N/A");
        assert_eq!(page[1][1], "Ana Cruz · ana@example.com · 0917");
        assert_eq!(page[1][5], "No message");
        assert_eq!(page[0][4], "12");
    }

    #[test]
    fn test_only_pending_offers_decisions() {
        let rows = schedules();
        assert!(rows[0].actions().is_empty());
        assert_eq!(rows[1].actions(), vec![RowAction::Accept, RowAction::Decline]);
    }

    #[test]
    fn test_status_filter() {
        let (column, options) = Schedule::status_filter().unwrap();
        let mut table =
            DataTable::new(Schedule::columns(), schedules()).with_status_filter(column, options);
        table.cycle_status_filter();
        assert_eq!(table.status_label(), "Pending");
        assert_eq!(table.filtered_rows().count(), 1);
        table.cycle_status_filter();
        assert_eq!(table.filtered_rows().count(), 1);
        assert_eq!(table.status_label(), "Accepted");
    }
}
