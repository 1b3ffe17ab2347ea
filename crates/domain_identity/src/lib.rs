//! Identity Domain
//!
//! This crate turns stored identities into request principals and validates
//! the identity data collected from customers.
//!
//! # Components
//!
//! - **Principal**: the immutable identity and role set bound to one request
//! - **IdentityStore**: the port through which stored identities are read
//! - **PrincipalResolver**: resolves a login or id into an active principal,
//!   re-checking the active flag on every call
//! - **IdentityValidator**: total checksum and format validators for national
//!   IDs, mobile numbers, postal codes and license plates
//!
//! # Examples
//!
//! ```rust,ignore
//! use domain_identity::{IdentityRecord, PrincipalResolver, Role};
//! use domain_identity::ports::mock::InMemoryIdentityStore;
//! use std::sync::Arc;
//!
//! let record = IdentityRecord::new("malee", "malee@example.co.th", [Role::Underwriter]);
//! let store = InMemoryIdentityStore::with_records(vec![record]).await;
//! let resolver = PrincipalResolver::new(Arc::new(store));
//!
//! let principal = resolver.resolve("malee@example.co.th").await?;
//! assert!(principal.has_role(Role::Underwriter));
//! ```

pub mod principal;
pub mod error;
pub mod province;
pub mod validation;
pub mod ports;
pub mod resolver;

pub use principal::{Principal, Role, IdentityRecord, UnknownRole};
pub use error::IdentityError;
pub use validation::{IdentityValidator, ValidationIssue, ValidationResult};
pub use ports::IdentityStore;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryIdentityStore;
pub use resolver::PrincipalResolver;
