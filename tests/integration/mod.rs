//! Integration tests for Audit WebUI
//!
//! These tests verify the behavior of the API endpoints against a mock
//! admin backend.

mod api_tests;
