//! Shared utilities

pub mod error;
pub mod pagination;
pub mod sort;

pub use error::{AppError, AppResult, ErrorResponse};
pub use pagination::{page_window, PageItem, PAGE_WINDOW_DELTA};
pub use sort::{SortDirection, SortState};
