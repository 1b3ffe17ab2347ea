//! Token and Session Layer
//!
//! Stateless HS512 session tokens for the back office, plus the glue that
//! binds a verified token to a freshly resolved principal.
//!
//! # Architecture
//!
//! - **Token**: minting and verification of access and refresh tokens
//! - **Session**: login, refresh and per-request authentication
//! - **Config**: secret, TTLs and business timezone from the environment
//! - **Telemetry**: tracing subscriber bootstrap
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_auth::{AuthConfig, SessionService, TokenService};
//!
//! let config = AuthConfig::from_env()?;
//! let tokens = Arc::new(TokenService::new(&config)?);
//! let sessions = SessionService::new(tokens, resolver);
//! let principal = sessions.authenticate(headers.get("Authorization")).await?;
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;
pub mod token;

pub use config::{AuthConfig, SecretEncoding};
pub use error::{AuthError, ConfigError};
pub use session::{bearer_token, SessionService, TokenPair};
pub use token::{TokenClaims, TokenError, TokenService, MIN_SECRET_BYTES, REFRESH_TOKEN_TYPE};
