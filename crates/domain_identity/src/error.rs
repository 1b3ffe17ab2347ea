//! Identity domain errors
//!
//! Lookup failures are surfaced as explicit conditions so the authentication
//! pipeline can turn them into an unauthorized response.

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur while resolving an identity into a principal
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No stored identity matches the lookup key
    #[error("Identity not found: {0}")]
    NotFound(String),

    /// The identity exists but its active flag is false
    #[error("Identity deactivated: {0}")]
    Deactivated(String),

    /// The stored record cannot form a principal (e.g. no roles)
    #[error("Invalid identity record: {0}")]
    InvalidRecord(String),

    /// The identity store itself failed
    #[error("Identity store error: {0}")]
    Store(#[source] PortError),
}

impl IdentityError {
    /// Creates a NotFound error from any lookup key
    pub fn not_found(key: impl std::fmt::Display) -> Self {
        IdentityError::NotFound(key.to_string())
    }

    /// Creates an InvalidRecord error with a message
    pub fn invalid_record(message: impl Into<String>) -> Self {
        IdentityError::InvalidRecord(message.into())
    }

    /// Returns true for failures that mean "reject this login", as opposed
    /// to infrastructure faults
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            IdentityError::NotFound(_) | IdentityError::Deactivated(_) | IdentityError::InvalidRecord(_)
        )
    }
}
