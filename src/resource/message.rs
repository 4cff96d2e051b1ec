use crate::resource::{RecordId, RowAction};

/// Messages of a [`ResourceService`](crate::resource::ResourceService).
///
/// User input, dialog results and async command results all flow through
/// this one type.
#[derive(Debug, Clone)]
pub enum ResourceMsg<R> {
    // === Collection ===
    /// Fetch the collection (initial load and refresh)
    Load,
    Loaded(Vec<R>),
    LoadFailed(String),

    // === Mutations ===
    /// Show the empty form
    StartCreate,
    /// Show the form prefilled with a record
    StartEdit(R, RowAction),
    /// Form submitted; `id` is set when updating
    Submit {
        id: Option<RecordId>,
        fields: Vec<(String, String)>,
    },
    ConfirmDelete(R),
    Delete(R),
    SetStatus {
        record: R,
        action: RowAction,
    },
    /// A mutation succeeded; the collection is stale
    Changed,
    MutationFailed(String),

    // === Navigation ===
    Open(R),
    Copy(R),
    /// Save the record's attachment to disk
    Download(R),
    DialogCancelled,
    Close,
}
