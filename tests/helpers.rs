//! Test helpers for reinhardt-factories integration tests.
//!
//! This module provides the shared model schemas, registry wiring and
//! in-memory stores used across the integration test files.

#[path = "helpers/test_models.rs"]
pub mod test_models;
