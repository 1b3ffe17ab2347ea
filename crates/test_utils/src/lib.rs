//! Test Utilities Crate
//!
//! Shared test infrastructure for the identity & token security core.
//!
//! # Modules
//!
//! - `fixtures`: Fixed identity data, records and signing secrets
//! - `builders`: Builder patterns for identity records and principals
//! - `assertions`: Assertion helpers for principals and reference numbers
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
