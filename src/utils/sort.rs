//! Single-column sort state for the activity table.
//!
//! The state only records which column is active and in which direction;
//! reordering the rows is the caller's job.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Tri-state per click: activating a column starts ascending, clicking it
/// again flips to descending and back. Once a column has been activated the
/// table never returns to the unsorted state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a header click and return the resulting ordering.
    pub fn toggle(&mut self, column: &str) -> (String, SortDirection) {
        let direction = match (&self.column, self.direction) {
            (Some(active), Some(dir)) if active == column => dir.flipped(),
            _ => SortDirection::Ascending,
        };
        self.column = Some(column.to_string());
        self.direction = Some(direction);
        (column.to_string(), direction)
    }

    pub fn order_by(&self) -> Option<(&str, SortDirection)> {
        match (&self.column, self.direction) {
            (Some(column), Some(direction)) => Some((column.as_str(), direction)),
            _ => None,
        }
    }
}
