//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims validation test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built claims and submission payloads for each mock scenario
//! - `builders`: Builder patterns for test data construction
//! - `assertions`: Custom assertion helpers for domain types and API envelopes
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
