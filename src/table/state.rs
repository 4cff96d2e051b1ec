use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page sizes offered by the table footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum RowsPerPage {
    #[default]
    Five,
    Ten,
    Fifteen,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("rows per page must be one of 5, 10 or 15, got {0}")]
pub struct InvalidRowsPerPage(pub usize);

impl RowsPerPage {
    pub const ALL: [Self; 3] = [Self::Five, Self::Ten, Self::Fifteen];

    pub const fn get(self) -> usize {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::Fifteen => 15,
        }
    }

    /// The next size in the cycle 5 → 10 → 15 → 5.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Five => Self::Ten,
            Self::Ten => Self::Fifteen,
            Self::Fifteen => Self::Five,
        }
    }
}

impl TryFrom<usize> for RowsPerPage {
    type Error = InvalidRowsPerPage;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(Self::Five),
            10 => Ok(Self::Ten),
            15 => Ok(Self::Fifteen),
            other => Err(InvalidRowsPerPage(other)),
        }
    }
}

impl From<RowsPerPage> for usize {
    fn from(value: RowsPerPage) -> Self {
        value.get()
    }
}

impl fmt::Display for RowsPerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Transient UI state owned by one table instance.
///
/// `visible` only ever holds keys of the table's schema; the owning
/// [`DataTable`](crate::table::DataTable) enforces that on every update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub(super) search_term: String,
    pub(super) current_page: usize,
    pub(super) rows_per_page: RowsPerPage,
    pub(super) visible: BTreeSet<&'static str>,
    pub(super) status_filter: Option<String>,
}

impl ViewState {
    pub(super) fn new(visible: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            search_term: String::new(),
            current_page: 1,
            rows_per_page: RowsPerPage::default(),
            visible: visible.into_iter().collect(),
            status_filter: None,
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    pub const fn rows_per_page(&self) -> RowsPerPage {
        self.rows_per_page
    }

    pub fn status_filter(&self) -> Option<&str> {
        self.status_filter.as_deref()
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_per_page_accepts_only_allowed_sizes() {
        assert_eq!(RowsPerPage::try_from(5), Ok(RowsPerPage::Five));
        assert_eq!(RowsPerPage::try_from(10), Ok(RowsPerPage::Ten));
        assert_eq!(RowsPerPage::try_from(15), Ok(RowsPerPage::Fifteen));
        assert_eq!(RowsPerPage::try_from(0), Err(InvalidRowsPerPage(0)));
        assert_eq!(RowsPerPage::try_from(20), Err(InvalidRowsPerPage(20)));
    }

    #[test]
    fn test_rows_per_page_cycles() {
        assert_eq!(RowsPerPage::Five.next(), RowsPerPage::Ten);
        assert_eq!(RowsPerPage::Ten.next(), RowsPerPage::Fifteen);
        assert_eq!(RowsPerPage::Fifteen.next(), RowsPerPage::Five);
    }

    #[test]
    fn test_new_state_starts_on_first_page() {
        let state = ViewState::new(["name", "type"]);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.rows_per_page(), RowsPerPage::Five);
        assert!(state.is_visible("name"));
        assert!(!state.is_visible("missing"));
    }
}
