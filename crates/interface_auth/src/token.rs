//! Stateless access and refresh tokens
//!
//! Tokens are HS512-signed JWTs. Verification needs only the shared secret,
//! so any number of service instances can check tokens without a session
//! table. The price is that a token cannot be revoked early: whether its
//! identity is still active is re-checked against the identity store on each
//! request (see [`crate::session::SessionService::authenticate`]).
//!
//! # Claims
//!
//! | claim    | access | refresh |
//! |----------|--------|---------|
//! | `sub`    | username | username |
//! | `userId` | yes    | yes     |
//! | `email`  | yes    | -       |
//! | `roles`  | yes    | -       |
//! | `iat`, `exp` | yes | yes    |
//! | `type`   | -      | `"refresh"` |

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use core_kernel::UserId;
use domain_identity::{Principal, Role};

use crate::config::{AuthConfig, SecretEncoding};

/// Value of the `type` claim on refresh tokens
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// HS512 keys shorter than the hash output are rejected by other verifiers
pub const MIN_SECRET_BYTES: usize = 64;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (username)
    pub sub: String,
    /// Identity id
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// Email address, access tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Role names, access tokens only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// `"refresh"` on refresh tokens, absent on access tokens
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl TokenClaims {
    /// Returns true if these are refresh-token claims
    pub fn is_refresh(&self) -> bool {
        self.token_type.as_deref() == Some(REFRESH_TOKEN_TYPE)
    }

    /// Roles as typed values; names this build does not know are skipped
    pub fn role_set(&self) -> BTreeSet<Role> {
        self.roles.iter().filter_map(|r| r.parse().ok()).collect()
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Token errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,
    #[error("Token signature does not verify")]
    SignatureInvalid,
    #[error("Token expired")]
    Expired,
    #[error("Unsupported token algorithm")]
    UnsupportedAlgorithm,
    #[error("Token signing failed: {0}")]
    Signing(String),
    #[error("Token configuration error: {0}")]
    Configuration(String),
}

impl TokenError {
    /// Short, log-safe name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::SignatureInvalid => "signature_invalid",
            TokenError::Expired => "expired",
            TokenError::UnsupportedAlgorithm => "unsupported_algorithm",
            TokenError::Signing(_) => "signing",
            TokenError::Configuration(_) => "configuration",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => TokenError::UnsupportedAlgorithm,
            _ => TokenError::Malformed,
        }
    }
}

/// Mints and verifies access and refresh tokens
///
/// Holds only read-only key material, so one instance can be shared across
/// threads without locking.
///
/// # Examples
///
/// ```rust,ignore
/// let tokens = TokenService::new(&config)?;
/// let access = tokens.generate_access_token(&principal)?;
/// assert!(tokens.validate(&access));
/// assert!(!tokens.is_refresh_token(&access));
/// ```
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Builds the service from configuration
    ///
    /// # Errors
    ///
    /// `TokenError::Configuration` if the secret cannot be decoded, is shorter
    /// than [`MIN_SECRET_BYTES`], or the TTLs are not `0 < access < refresh`.
    pub fn new(config: &AuthConfig) -> Result<Self, TokenError> {
        let secret = match config.secret_encoding {
            SecretEncoding::Base64 => decode_base64_secret(&config.jwt_secret)?,
            SecretEncoding::Raw => config.jwt_secret.as_bytes().to_vec(),
        };
        Self::from_secret(
            &secret,
            ttl_from_secs(config.access_token_ttl_secs)?,
            ttl_from_secs(config.refresh_token_ttl_secs)?,
        )
    }

    /// Builds the service from raw key bytes
    pub fn from_secret(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(TokenError::Configuration(format!(
                "signing secret is {} bytes, at least {} required",
                secret.len(),
                MIN_SECRET_BYTES
            )));
        }
        if access_ttl <= Duration::zero() || refresh_ttl <= access_ttl {
            return Err(TokenError::Configuration(
                "token TTLs must satisfy 0 < access < refresh".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Creates an access token carrying the principal's id, email and roles
    pub fn generate_access_token(&self, principal: &Principal) -> Result<String, TokenError> {
        let (iat, exp) = issue_window(self.access_ttl)?;
        let claims = TokenClaims {
            sub: principal.username().to_string(),
            user_id: principal.id(),
            email: Some(principal.email().to_string()),
            roles: principal.role_names(),
            iat,
            exp,
            token_type: None,
        };
        self.sign(&claims)
    }

    /// Creates a refresh token carrying only the principal's id and `type="refresh"`
    pub fn generate_refresh_token(&self, principal: &Principal) -> Result<String, TokenError> {
        let (iat, exp) = issue_window(self.refresh_ttl)?;
        let claims = TokenClaims {
            sub: principal.username().to_string(),
            user_id: principal.id(),
            email: None,
            roles: Vec::new(),
            iat,
            exp,
            token_type: Some(REFRESH_TOKEN_TYPE.to_string()),
        };
        self.sign(&claims)
    }

    /// Verifies a token and returns its claims
    ///
    /// # Errors
    ///
    /// * `TokenError::Malformed` - not a decodable JWT with the expected claims
    /// * `TokenError::SignatureInvalid` - signed with a different key
    /// * `TokenError::Expired` - `exp` is now or in the past
    /// * `TokenError::UnsupportedAlgorithm` - header names an algorithm other than
    ///   HS512, including `none` and names unknown to the JWT library
    pub fn parse(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(token, e))?
            .claims;

        // The library only rejects exp < now; a token is dead at exp == now.
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    /// True only for a well-formed, correctly signed, unexpired token with a subject
    pub fn validate(&self, token: &str) -> bool {
        match self.parse(token) {
            Ok(claims) => !claims.sub.trim().is_empty(),
            Err(e) => {
                debug!(reason = e.kind(), "Token rejected");
                false
            }
        }
    }

    /// True if the token is past its expiry or cannot be verified at all
    pub fn is_expired(&self, token: &str) -> bool {
        match self.parse(token) {
            Ok(_) => false,
            Err(e) => {
                debug!(reason = e.kind(), "Treating unverifiable token as expired");
                true
            }
        }
    }

    /// True only for a valid token whose `type` claim is `"refresh"`
    pub fn is_refresh_token(&self, token: &str) -> bool {
        match self.parse(token) {
            Ok(claims) => claims.is_refresh(),
            Err(e) => {
                debug!(reason = e.kind(), "Treating unverifiable token as not a refresh token");
                false
            }
        }
    }

    /// Subject of a valid token
    pub fn username_from_token(&self, token: &str) -> Option<String> {
        self.parse(token).ok().map(|c| c.sub)
    }

    /// Identity id of a valid token
    pub fn user_id_from_token(&self, token: &str) -> Option<UserId> {
        self.parse(token).ok().map(|c| c.user_id)
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS512), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

/// Maps a decode failure, looking past the library's header parsing
///
/// Headers naming `none` or an unknown algorithm fail to deserialize and
/// would otherwise surface as malformed.
fn classify(token: &str, err: jsonwebtoken::errors::Error) -> TokenError {
    match TokenError::from(err) {
        TokenError::Malformed if raw_header_alg(token).is_some_and(|alg| alg != "HS512") => {
            TokenError::UnsupportedAlgorithm
        }
        other => other,
    }
}

/// The `alg` value of the header segment, if it is a JSON object with one
fn raw_header_alg(token: &str) -> Option<String> {
    use base64::Engine;

    let segment = token.split('.').next()?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(segment).ok()?;
    let header: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    header.get("alg")?.as_str().map(str::to_string)
}

/// `(iat, exp)` for a token issued now
fn issue_window(ttl: Duration) -> Result<(i64, i64), TokenError> {
    let now = Utc::now();
    let expires = now
        .checked_add_signed(ttl)
        .ok_or_else(|| TokenError::Signing("token expiry overflows the calendar".to_string()))?;
    Ok((now.timestamp(), expires.timestamp()))
}

fn ttl_from_secs(secs: u64) -> Result<Duration, TokenError> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| TokenError::Configuration(format!("token TTL of {} seconds is out of range", secs)))
}

fn decode_base64_secret(secret: &str) -> Result<Vec<u8>, TokenError> {
    use base64::Engine;

    base64::engine::general_purpose::STANDARD
        .decode(secret.trim())
        .map_err(|e| TokenError::Configuration(format!("signing secret is not valid base64: {}", e)))
}
