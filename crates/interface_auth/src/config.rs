//! Identity core configuration

use serde::Deserialize;

use core_kernel::{ReferenceNumberGenerator, Timezone};

use crate::error::ConfigError;

/// How `jwt_secret` is encoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretEncoding {
    /// Standard Base64
    #[default]
    Base64,
    /// Raw UTF-8 bytes
    Raw,
}

/// Identity core configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Token signing secret
    pub jwt_secret: String,
    /// Encoding of `jwt_secret`
    #[serde(default)]
    pub secret_encoding: SecretEncoding,
    /// Access token lifetime in seconds
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: u64,
    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: u64,
    /// Timezone that decides the date embedded in reference numbers
    #[serde(default)]
    pub business_timezone: Timezone,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
}

fn default_access_ttl() -> u64 {
    86_400
}

fn default_refresh_ttl() -> u64 {
    604_800
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            secret_encoding: SecretEncoding::default(),
            access_token_ttl_secs: default_access_ttl(),
            refresh_token_ttl_secs: default_refresh_ttl(),
            business_timezone: Timezone::default(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl AuthConfig {
    /// Loads configuration from `AUTH_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let config: AuthConfig = config::Config::builder()
            .add_source(config::Environment::with_prefix("AUTH"))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the secret is present and `0 < access TTL < refresh TTL`
    ///
    /// Key length is checked when the token service decodes the secret.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("jwt_secret is required".to_string()));
        }
        if self.access_token_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "access_token_ttl_secs must be positive".to_string(),
            ));
        }
        if self.refresh_token_ttl_secs <= self.access_token_ttl_secs {
            return Err(ConfigError::Invalid(format!(
                "refresh_token_ttl_secs ({}) must exceed access_token_ttl_secs ({})",
                self.refresh_token_ttl_secs, self.access_token_ttl_secs
            )));
        }
        Ok(())
    }

    /// Creates a reference number generator dated in the business timezone
    pub fn reference_generator(&self) -> ReferenceNumberGenerator {
        ReferenceNumberGenerator::new(self.business_timezone)
    }
}
