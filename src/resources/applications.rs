use serde::{Deserialize, Serialize};

use super::file_name;
use crate::resource::{Attachment, RecordId, Resource, RowAction, Source, actions_column, lenient};
use crate::table::Column;

/// A job application, listed from the career that received it. Read-only
/// apart from downloading the attached resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub resume: Option<String>,
}

impl Resource for Application {
    const KEY: &'static str = "applications";
    const TITLE: &'static str = "Applications";
    const ITEM: &'static str = "Application";
    const DESCRIPTION: &'static str = "Overview of all Applications";
    const PATH: &'static str = "api/careers";
    const SOURCE: Source = Source::RecordField("applications");

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::field("first_name", "First Name", |a: &Self| a.first_name.as_str().into()),
            Column::field("last_name", "Last Name", |a: &Self| a.last_name.as_str().into()),
            Column::field("email", "Email", |a: &Self| a.email.as_str().into()),
            Column::field("phone", "Phone", |a: &Self| a.phone.as_str().into()),
            Column::field("address", "Address", |a: &Self| a.address.as_str().into()),
            Column::rendered("resume", "Resume", |a: &Self| {
                file_name(a.resume.as_deref(), "No resume")
            }),
            actions_column(),
        ]
    }

    fn actions(&self) -> Vec<RowAction> {
        match self.attachment() {
            Some(_) => vec![RowAction::Download],
            None => Vec::new(),
        }
    }

    /// Resumes are served from `careers/applications/` and saved as
    /// `first_last_resume.ext`.
    fn attachment(&self) -> Option<Attachment> {
        let resume = self.resume.as_deref().map(str::trim).filter(|r| !r.is_empty())?;
        let stem = format!("{}_{}_resume", self.first_name.trim(), self.last_name.trim());
        let extension = resume
            .rsplit('/')
            .next()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty());
        let file_name = match extension {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem,
        };
        Some(Attachment {
            path: format!("careers/applications/{resume}"),
            file_name: file_name.to_lowercase(),
        })
    }
}
