//! Token inspection tool
//!
//! Verifies a token against the configured secret and prints the verdict as
//! JSON. Exits 0 when the token is valid, 1 otherwise.
//!
//! # Usage
//!
//! ```bash
//! AUTH_JWT_SECRET=... token-inspect eyJhbGciOiJIUzUxMiJ9...
//! echo "$TOKEN" | AUTH_JWT_SECRET=... token-inspect
//! ```
//!
//! # Environment Variables
//!
//! * `AUTH_JWT_SECRET` - Token signing secret (required)
//! * `AUTH_SECRET_ENCODING` - `base64` (default) or `raw`
//! * `AUTH_ACCESS_TOKEN_TTL_SECS` - Access token lifetime (default: 86400)
//! * `AUTH_REFRESH_TOKEN_TTL_SECS` - Refresh token lifetime (default: 604800)
//! * `AUTH_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `AUTH_LOG_JSON` - Emit logs as JSON lines (default: false)

use std::io::Read;
use std::process::ExitCode;

use anyhow::{bail, Context};
use serde::Serialize;

use interface_auth::{AuthConfig, TokenService};

#[derive(Debug, Serialize)]
struct Verdict {
    valid: bool,
    expired: bool,
    refresh: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = AuthConfig::from_env().context("loading AUTH_* configuration")?;
    interface_auth::telemetry::init_tracing(&config.log_level, config.log_json);

    let tokens = TokenService::new(&config).context("building token service")?;
    let token = read_token()?;

    let verdict = inspect(&tokens, &token);
    tracing::info!(valid = verdict.valid, refresh = verdict.refresh, "Token inspected");
    println!("{}", serde_json::to_string_pretty(&verdict)?);

    Ok(if verdict.valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn read_token() -> anyhow::Result<String> {
    let token = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading token from stdin")?;
            buf
        }
    };

    let token = token.trim().to_string();
    if token.is_empty() {
        bail!("no token given on the command line or stdin");
    }
    Ok(token)
}

fn inspect(tokens: &TokenService, token: &str) -> Verdict {
    match tokens.parse(token) {
        Ok(claims) => Verdict {
            valid: tokens.validate(token),
            expired: tokens.is_expired(token),
            refresh: claims.is_refresh(),
            subject: Some(claims.sub.clone()),
            user_id: Some(claims.user_id.to_string()),
            expires_at: claims.expires_at().map(|t| t.to_rfc3339()),
            roles: claims.roles,
            error: None,
        },
        Err(e) => Verdict {
            valid: false,
            expired: tokens.is_expired(token),
            refresh: false,
            subject: None,
            user_id: None,
            roles: Vec::new(),
            expires_at: None,
            error: Some(e.kind()),
        },
    }
}
