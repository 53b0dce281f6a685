//! Common test utilities and helpers
//!
//! This module provides shared test infrastructure including:
//! - Test fixtures for admin backend payloads
//! - A test application wrapper backed by a wiremock admin backend

pub mod fixtures;
pub mod test_app;

pub use fixtures::*;
pub use test_app::*;
