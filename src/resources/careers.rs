use ratatui::layout::Constraint;
use serde::{Deserialize, Serialize};

use super::{Application, file_name};
use crate::registry::ServiceContext;
use crate::resource::{RecordId, Resource, ResourceService, RowAction, actions_column, lenient};
use crate::service::Service;
use crate::table::Column;
use crate::ui::FormField;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Career {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub slots: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub applications_count: Option<i64>,
}

impl Career {
    /// Endpoint of this career, which embeds its applications.
    pub fn detail_path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

impl Resource for Career {
    const KEY: &'static str = "careers";
    const TITLE: &'static str = "Careers";
    const ITEM: &'static str = "Career";
    const DESCRIPTION: &'static str = "Overview of all Careers";
    const PATH: &'static str = "api/careers";

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.position.clone()
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::field("position", "Position", |c: &Self| c.position.as_str().into())
                .width(Constraint::Min(24)),
            Column::field("slots", "Slots", |c: &Self| c.slots.into())
                .width(Constraint::Length(7)),
            Column::field("applications_count", "Applicants", |c: &Self| {
                c.applications_count.into()
            })
            .render_with(|c: &Self| match c.applications_count.unwrap_or(0) {
                1 => "1 applicant".to_string(),
                n => format!("{n} applicants"),
            })
            .width(Constraint::Length(14)),
            Column::rendered("image", "Image", |c: &Self| {
                file_name(c.image.as_deref(), "No image")
            }),
            actions_column(),
        ]
    }

    fn actions(&self) -> Vec<RowAction> {
        vec![RowAction::Open, RowAction::Edit, RowAction::Delete]
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("position", "Position"),
            FormField::required("slots", "Slots"),
        ];
        FIELDS
    }

    fn form_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("position", self.position.clone()),
            ("slots", self.slots.map(|n| n.to_string()).unwrap_or_default()),
        ]
    }

    fn open(&self, ctx: &ServiceContext) -> Option<Box<dyn Service>> {
        Some(Box::new(ResourceService::<Application>::nested(
            ctx.clone(),
            self.detail_path(),
            vec![
                Self::TITLE.to_string(),
                self.position.clone(),
                Application::TITLE.to_string(),
            ],
        )))
    }
}
