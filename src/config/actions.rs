#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    Help,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    Toggle,
    Exit,
}

/// Pagination and column controls of a data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    NextPage,
    PreviousPage,
    RowsPerPage,
    Columns,
    Status,
    ToggleColumn,
}

/// Record operations offered by resource screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    New,
    Edit,
    Delete,
    Accept,
    Decline,
    Open,
    Copy,
    Download,
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    NextField,
    PreviousField,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Confirm,
    Cancel,
    Dismiss,
}
