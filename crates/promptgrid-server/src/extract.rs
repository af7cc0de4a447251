//! Caller identity extraction from JWT Bearer token or X-Account-Id header
//! (dev mode).

use axum::{extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation};
use promptgrid_core::AccountId;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims structure.
#[derive(Debug, Deserialize)]
pub struct Claims {
    /// Subject: the AccountId as 64-char hex string.
    pub sub: String,
    /// Issuer.
    #[serde(default)]
    pub iss: Option<String>,
}

/// The authenticated caller of a mutating operation.
///
/// Priority:
/// 1. `Authorization: Bearer <jwt>`: validates signature, extracts the `sub`
///    claim as the AccountId.
/// 2. `X-Account-Id` header, only if `allow_dev_identity` is set in config.
/// 3. If neither is present and `allow_dev_identity` is set, the zero account.
/// 4. Otherwise `Unauthenticated`.
pub struct CallerIdentity(pub AccountId);

impl FromRequestParts<AppState> for CallerIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let config = state.config();

        if let Some(auth_header) = parts.headers.get("Authorization") {
            let auth_str = auth_header.to_str().map_err(|_| {
                ApiError::Unauthenticated("Authorization header contains invalid characters".into())
            })?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return extract_from_jwt(token.trim(), config);
            }
        }

        if config.allow_dev_identity {
            return extract_from_dev_header(parts);
        }

        Err(ApiError::Unauthenticated(
            "Missing Authorization: Bearer <jwt> header".into(),
        ))
    }
}

/// Validate a JWT and extract the AccountId from its claims.
fn extract_from_jwt(
    token: &str,
    config: &crate::config::ServerConfig,
) -> Result<CallerIdentity, ApiError> {
    if config.jwt_public_key.is_empty() {
        return Err(ApiError::Internal(
            "JWT_PUBLIC_KEY not configured on server".into(),
        ));
    }

    let key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes()).map_err(|e| {
        tracing::error!(error = %e, "failed to parse JWT public key");
        ApiError::Internal("Invalid JWT public key configuration".into())
    })?;

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_issuer(&["promptgrid-admin"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data: TokenData<Claims> =
        jsonwebtoken::decode(token, &key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "JWT validation failed");
            ApiError::Unauthenticated(format!("Invalid token: {}", e))
        })?;

    let account_id = parse_account_id_hex(&token_data.claims.sub)?;
    Ok(CallerIdentity(account_id))
}

/// Extract the AccountId from the X-Account-Id header (dev mode fallback).
fn extract_from_dev_header(parts: &Parts) -> Result<CallerIdentity, ApiError> {
    let Some(header_value) = parts.headers.get("X-Account-Id") else {
        tracing::warn!("no auth provided, using zero account (dev mode)");
        return Ok(CallerIdentity(AccountId::zero()));
    };

    let hex_str = header_value.to_str().map_err(|_| {
        ApiError::BadRequest("X-Account-Id header contains invalid characters".to_string())
    })?;

    let account_id = parse_account_id_hex(hex_str)?;
    tracing::debug!(account_id = %hex_str, "using dev identity from X-Account-Id header");
    Ok(CallerIdentity(account_id))
}

/// Parse a 64-char hex string into an AccountId.
fn parse_account_id_hex(hex_str: &str) -> Result<AccountId, ApiError> {
    hex_str
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid AccountId: {}", e)))
}
