//! Server configuration from environment variables.

use std::env;
use std::str::FromStr;

use promptgrid_core::{AccountId, VerificationKey};

/// Verification key presented by existing display-layer callers; used when
/// METADATA_KEY is not set so those callers keep working out of the box.
const DEFAULT_METADATA_KEY: &str =
    "9afb95cacc9f95858ec44aa8c3b685511002e30ae54415823f406128b85b238e";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
    /// Account allowed to change listing fees and deactivate any token.
    pub owner_account: AccountId,
    /// Account credited with retained listing fees.
    pub treasury_account: AccountId,
    /// Verification key stored on every minted token.
    pub metadata_key: VerificationKey,
    /// PEM-encoded Ed25519 public key for validating JWT bearer tokens.
    pub jwt_public_key: String,
    /// Whether to accept the X-Account-Id header as caller identity.
    pub allow_dev_identity: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `OWNER_ACCOUNT`: 64-char hex account id of the registry owner
    /// - `TREASURY_ACCOUNT`: 64-char hex account id retaining listing fees
    ///
    /// Optional:
    /// - `PORT`: Server port (default: 3000)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    /// - `METADATA_KEY`: 64-char hex verification key (default: the key
    ///   existing callers present)
    /// - `JWT_PUBLIC_KEY`: PEM Ed25519 public key for bearer tokens
    /// - `ALLOW_DEV_IDENTITY`: accept X-Account-Id header ("true"/"1")
    pub fn from_env() -> Result<Self, ConfigError> {
        let owner_account = require_account("OWNER_ACCOUNT")?;
        let treasury_account = require_account("TREASURY_ACCOUNT")?;

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let cors_allowed_origins =
            env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());

        let metadata_key_hex =
            env::var("METADATA_KEY").unwrap_or_else(|_| DEFAULT_METADATA_KEY.to_string());
        let metadata_key =
            VerificationKey::from_str(&metadata_key_hex).map_err(|e| ConfigError::InvalidValue {
                name: "METADATA_KEY".to_string(),
                reason: e.to_string(),
            })?;

        let jwt_public_key = env::var("JWT_PUBLIC_KEY").unwrap_or_default();

        let allow_dev_identity = env::var("ALLOW_DEV_IDENTITY")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            port,
            log_level,
            cors_allowed_origins,
            owner_account,
            treasury_account,
            metadata_key,
            jwt_public_key,
            allow_dev_identity,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn require_account(name: &'static str) -> Result<AccountId, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
    AccountId::from_str(&value).map_err(|e| ConfigError::InvalidValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}
