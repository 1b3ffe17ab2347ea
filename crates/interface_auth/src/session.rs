//! Login, refresh and per-request authentication
//!
//! Glues the token service to the principal resolver. Credentials themselves
//! are checked by the caller before [`SessionService::issue`] is invoked.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use domain_identity::{Principal, PrincipalResolver};

use crate::error::AuthError;
use crate::token::TokenService;

const BEARER_PREFIX: &str = "Bearer ";

/// Access and refresh token issued together
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Issues sessions and authenticates requests
#[derive(Debug, Clone)]
pub struct SessionService {
    tokens: Arc<TokenService>,
    resolver: PrincipalResolver,
}

impl SessionService {
    pub fn new(tokens: Arc<TokenService>, resolver: PrincipalResolver) -> Self {
        Self { tokens, resolver }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Issues a token pair for an identity whose credentials were already verified
    pub async fn issue(&self, username_or_email: &str) -> Result<TokenPair, AuthError> {
        let principal = self.resolver.resolve(username_or_email).await?;
        let pair = self.pair_for(&principal)?;
        info!(user_id = %principal.id(), "Issued session");
        Ok(pair)
    }

    /// Exchanges a refresh token for a fresh token pair
    ///
    /// The identity is re-resolved, so a deactivated account cannot refresh.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.tokens.parse(refresh_token)?;
        if !claims.is_refresh() {
            warn!(user_id = %claims.user_id, "Access token presented for refresh");
            return Err(AuthError::WrongTokenType { expected: "refresh" });
        }

        let principal = self.resolver.resolve_by_id(claims.user_id).await?;
        let pair = self.pair_for(&principal)?;
        info!(user_id = %principal.id(), "Refreshed session");
        Ok(pair)
    }

    /// Authenticates a request from its `Authorization` header value
    ///
    /// Accepts only access tokens, then re-checks the identity against the
    /// store so deactivation takes effect on the next request.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, AuthError> {
        let token = bearer_token(authorization).ok_or_else(|| {
            warn!("Missing or invalid Authorization header");
            AuthError::MissingCredentials
        })?;

        let claims = self.tokens.parse(token).map_err(|e| {
            warn!(reason = e.kind(), "Token validation failed");
            e
        })?;
        if claims.is_refresh() {
            warn!(user_id = %claims.user_id, "Refresh token presented as access token");
            return Err(AuthError::WrongTokenType { expected: "access" });
        }

        let principal = self.resolver.resolve_by_id(claims.user_id).await?;
        debug!(user_id = %principal.id(), "Authenticated request");
        Ok(principal)
    }

    fn pair_for(&self, principal: &Principal) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.tokens.generate_access_token(principal)?,
            refresh_token: self.tokens.generate_refresh_token(principal)?,
            token_type: "Bearer",
            expires_in: self.tokens.access_ttl().num_seconds(),
        })
    }
}

/// Extracts the token from a `Bearer` authorization header value
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
