//! Authentication error handling

use thiserror::Error;

use domain_identity::IdentityError;

use crate::token::TokenError;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while authenticating a request or issuing a session
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or invalid Authorization header")]
    MissingCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Expected a {expected} token")]
    WrongTokenType { expected: &'static str },

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl AuthError {
    /// True if the caller should be answered "unauthorized"
    ///
    /// Only store outages and signing failures are server-side faults.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            AuthError::MissingCredentials | AuthError::WrongTokenType { .. } => true,
            AuthError::Token(e) => !matches!(e, TokenError::Signing(_) | TokenError::Configuration(_)),
            AuthError::Identity(e) => e.is_rejection(),
        }
    }
}
