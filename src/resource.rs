//! Generic CRUD page for one REST resource.
//!
//! A [`Resource`] describes a record type: where it lives, how its table
//! looks, which fields its form edits and which row actions a record offers.
//! [`ResourceService`] wires that description to the table component, the
//! API client and the mutation dialogs.

mod commands;
mod dialogs;
pub mod lenient;
mod message;
mod screen;
mod service;

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use commands::fetch_rows;
pub use dialogs::{DeleteDialog, RecordForm};
pub use message::ResourceMsg;
pub use screen::RecordScreen;
pub use service::ResourceService;

use crate::registry::{ServiceContext, ServiceProvider};
use crate::service::Service;
use crate::table::{Column, StatusOption};
use crate::ui::FormField;

/// Primary key as sent by the API, either numeric or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl Default for RecordId {
    fn default() -> Self {
        Self::Number(0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Operation a record offers in its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Open,
    Edit,
    Reply,
    Delete,
    Accept,
    Decline,
    Download,
}

impl RowAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Edit => "Edit",
            Self::Reply => "Reply",
            Self::Delete => "Delete",
            Self::Accept => "Accept",
            Self::Decline => "Decline",
            Self::Download => "Download",
        }
    }

    /// Status value sent for the accept/decline actions.
    pub const fn status(self) -> Option<&'static str> {
        match self {
            Self::Accept => Some("Accepted"),
            Self::Decline => Some("Declined"),
            _ => None,
        }
    }

    /// Whether this action opens the record form.
    pub const fn is_edit(self) -> bool {
        matches!(self, Self::Edit | Self::Reply)
    }
}

/// Where the rows of a collection response are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// `{ records: [...] }`
    Records,
    /// A list field of a single record: `{ record: { <field>: [...] } }`.
    RecordField(&'static str),
}

/// A file attached to a record, fetched by [`RowAction::Download`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Path relative to the API base URL.
    pub path: String,
    /// Name the file is saved under.
    pub file_name: String,
}

/// A record type served by the admin API.
pub trait Resource:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Registry key, also accepted by `--resource`.
    const KEY: &'static str;
    /// Plural display name.
    const TITLE: &'static str;
    /// Singular display name.
    const ITEM: &'static str;
    const DESCRIPTION: &'static str;
    /// Collection endpoint relative to the API base URL.
    const PATH: &'static str;
    const ICON: Option<&'static str> = None;
    const SOURCE: Source = Source::Records;

    fn id(&self) -> RecordId;

    /// Short human name used in dialog titles.
    fn name(&self) -> String;

    fn columns() -> Vec<Column<Self>>;

    /// Actions offered for this record. Derived from its state, never stored.
    fn actions(&self) -> Vec<RowAction> {
        Vec::new()
    }

    /// Fields edited by the create/update form. Empty means read-only.
    fn form_fields() -> &'static [FormField] {
        &[]
    }

    /// Current values of the form fields, keyed by field key.
    fn form_values(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn can_create() -> bool {
        !Self::form_fields().is_empty()
    }

    /// Column and options of the status drop-down, if the page has one.
    fn status_filter() -> Option<(&'static str, Vec<StatusOption>)> {
        None
    }

    /// Reorder freshly fetched rows before display.
    fn prepare(rows: &mut [Self]) {
        _ = rows;
    }

    /// File saved by [`RowAction::Download`].
    fn attachment(&self) -> Option<Attachment> {
        None
    }

    /// Nested page opened by [`RowAction::Open`].
    fn open(&self, ctx: &ServiceContext) -> Option<Box<dyn Service>> {
        _ = ctx;
        None
    }
}

/// The "Actions" column listing what a row offers.
pub fn actions_column<R: Resource>() -> Column<R> {
    Column::rendered("actions", "Actions", render_actions::<R>)
}

fn render_actions<R: Resource>(row: &R) -> String {
    row.actions()
        .iter()
        .map(|action| action.label())
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Registers a [`Resource`] in the resource picker.
pub struct ResourceProvider<R>(PhantomData<fn() -> R>);

impl<R> Default for ResourceProvider<R> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<R: Resource> ServiceProvider for ResourceProvider<R> {
    fn key(&self) -> &'static str {
        R::KEY
    }

    fn display_name(&self) -> &'static str {
        R::TITLE
    }

    fn description(&self) -> &'static str {
        R::DESCRIPTION
    }

    fn icon(&self) -> Option<&'static str> {
        R::ICON
    }

    fn create_service(&self, ctx: &ServiceContext) -> Box<dyn Service> {
        Box::new(ResourceService::<R>::new(ctx.clone()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! A small resource used by the framework tests.

    use serde::{Deserialize, Serialize};

    use super::{Resource, RecordId, RowAction, actions_column};
    use crate::table::{Column, StatusOption};
    use crate::ui::FormField;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Note {
        pub id: i64,
        pub title: String,
        #[serde(default)]
        pub status: String,
    }

    impl Note {
        pub fn new(id: i64, title: &str, status: &str) -> Self {
            Self {
                id,
                title: title.to_string(),
                status: status.to_string(),
            }
        }
    }

    impl Resource for Note {
        const KEY: &'static str = "notes";
        const TITLE: &'static str = "Notes";
        const ITEM: &'static str = "Note";
        const DESCRIPTION: &'static str = "Overview of all Notes";
        const PATH: &'static str = "api/notes";

        fn id(&self) -> RecordId {
            RecordId::Number(self.id)
        }

        fn name(&self) -> String {
            self.title.clone()
        }

        fn columns() -> Vec<Column<Self>> {
            vec![
                Column::field("title", "Title", |n: &Self| n.title.as_str().into()),
                Column::field("status", "Status", |n: &Self| n.status.as_str().into()),
                actions_column(),
            ]
        }

        fn actions(&self) -> Vec<RowAction> {
            if self.status == "Pending" {
                vec![RowAction::Edit, RowAction::Delete, RowAction::Accept, RowAction::Decline]
            } else {
                vec![RowAction::Edit, RowAction::Delete]
            }
        }

        fn form_fields() -> &'static [FormField] {
            const FIELDS: &[FormField] = &[FormField::required("title", "Title")];
            FIELDS
        }

        fn form_values(&self) -> Vec<(&'static str, String)> {
            vec![("title", self.title.clone())]
        }

        fn status_filter() -> Option<(&'static str, Vec<StatusOption>)> {
            Some((
                "status",
                vec![
                    StatusOption::new("all", "All"),
                    StatusOption::new("Pending", "Pending"),
                ],
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::Note;
    use super::*;

    #[test]
    fn test_record_id_accepts_numbers_and_strings() {
        let number: RecordId = serde_json::from_value(json!(7)).unwrap();
        let text: RecordId = serde_json::from_value(json!("a-7")).unwrap();
        assert_eq!(number, RecordId::Number(7));
        assert_eq!(text.to_string(), "a-7");
    }

    #[test]
    fn test_actions_column_lists_row_actions() {
        let column = actions_column::<Note>();
        assert!(!column.is_searchable());
        assert_eq!(column.cell(&Note::new(1, "a", "Done")), "Edit · Delete");
        assert_eq!(
            column.cell(&Note::new(2, "b", "Pending")),
            "Edit · Delete · Accept · Decline"
        );
    }

    #[test]
    fn test_row_action_status_values() {
        assert_eq!(RowAction::Accept.status(), Some("Accepted"));
        assert_eq!(RowAction::Decline.status(), Some("Declined"));
        assert_eq!(RowAction::Delete.status(), None);
        assert!(RowAction::Reply.is_edit());
    }

    #[test]
    fn test_provider_exposes_resource_metadata() {
        let provider = ResourceProvider::<Note>::default();
        assert_eq!(provider.key(), "notes");
        assert_eq!(provider.display_name(), "Notes");
        assert_eq!(provider.description(), "Overview of all Notes");
        assert!(Note::can_create());
    }
}
