//! Data models

mod activity;
mod security;
mod statistics;

pub use activity::*;
pub use security::*;
pub use statistics::*;
