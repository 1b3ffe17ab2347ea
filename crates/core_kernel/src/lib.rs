//! Core Kernel - Foundational types shared by the identity and token crates
//!
//! This crate provides:
//! - Strongly-typed identifiers (`UserId`)
//! - Business-timezone handling for dated references
//! - Port/adapter infrastructure (`PortError`, `DomainPort`)
//! - Sequenced business reference numbers (`POL-20240315-000001`)

pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod reference;

pub use temporal::{Timezone, TemporalError};
pub use identifiers::UserId;
pub use ports::{PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable};
pub use reference::{
    ReferenceNumberGenerator, ReferenceKind, OpaqueIdKind, ReferenceError, MAX_SEQUENCE,
};
