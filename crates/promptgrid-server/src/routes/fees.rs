//! Listing fee routes.
//!
//! - GET /fees - The full fee schedule in kind order
//! - PUT /fees/{kind} - Owner sets the fee for one kind

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};

use promptgrid_core::{PromptKind, Wei};

use crate::error::ApiResult;
use crate::extract::CallerIdentity;
use crate::routes::prompts::parse_kind;
use crate::state::AppState;

/// One entry in the fee schedule.
#[derive(Debug, Serialize)]
pub struct FeeEntry {
    pub kind: PromptKind,
    pub code: u8,
    pub fee_wei: Wei,
}

/// Response for GET /fees.
#[derive(Debug, Serialize)]
pub struct FeeScheduleResponse {
    pub fees: Vec<FeeEntry>,
}

/// Request body for PUT /fees/{kind}.
#[derive(Debug, Deserialize)]
pub struct UpdateFeeRequest {
    pub fee_wei: Wei,
}

/// GET /fees - Current listing fee for every kind.
async fn get_fees(State(state): State<AppState>) -> Json<FeeScheduleResponse> {
    let ledger = state.ledger().read().await;
    let fees = ledger
        .listing_fees()
        .into_iter()
        .map(|(kind, fee)| FeeEntry {
            kind,
            code: kind.code(),
            fee_wei: fee,
        })
        .collect();
    Json(FeeScheduleResponse { fees })
}

/// PUT /fees/{kind} - Set the listing fee for one kind. Owner only.
///
/// `{kind}` is a kind name ("text") or its integer code. Affects future mints
/// only; already minted tokens keep their prices.
async fn update_fee(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(kind): Path<String>,
    Json(request): Json<UpdateFeeRequest>,
) -> ApiResult<Json<FeeEntry>> {
    let kind = parse_kind(&kind)?;
    let event = {
        let mut ledger = state.ledger().write().await;
        ledger.update_listing_fee(caller, kind, request.fee_wei)?
    };
    state.publish(&event).await;

    tracing::info!(kind = %kind, fee = %request.fee_wei.0, "listing fee updated");

    Ok(Json(FeeEntry {
        kind,
        code: kind.code(),
        fee_wei: request.fee_wei,
    }))
}

/// Build fee routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fees", get(get_fees))
        .route("/fees/{kind}", put(update_fee))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use promptgrid_core::{AccountId, VerificationKey};

    fn test_state() -> AppState {
        AppState::new(crate::config::ServerConfig {
            port: 3000,
            log_level: "info".into(),
            cors_allowed_origins: "*".into(),
            owner_account: AccountId::from_bytes([0xaa; 32]),
            treasury_account: AccountId::from_bytes([0xbb; 32]),
            metadata_key: VerificationKey::from_bytes([0x9a; 32]),
            jwt_public_key: String::new(),
            allow_dev_identity: true,
        })
    }

    #[tokio::test]
    async fn test_fee_schedule_has_defaults() {
        let state = test_state();
        let response = get_fees(State(state)).await;
        assert_eq!(response.fees.len(), 4);
        assert_eq!(response.fees[0].kind, PromptKind::Text);
        assert_eq!(response.fees[0].fee_wei, Wei::from_milliether(5));
        assert_eq!(response.fees[3].kind, PromptKind::Video);
        assert_eq!(response.fees[3].fee_wei, Wei::from_milliether(15));
    }

    #[tokio::test]
    async fn test_owner_updates_fee() {
        let state = test_state();
        let owner = CallerIdentity(AccountId::from_bytes([0xaa; 32]));

        let entry = update_fee(
            State(state.clone()),
            owner,
            Path("image".to_string()),
            Json(UpdateFeeRequest { fee_wei: Wei(42) }),
        )
        .await
        .unwrap();
        assert_eq!(entry.fee_wei, Wei(42));

        let schedule = get_fees(State(state)).await;
        assert_eq!(schedule.fees[1].fee_wei, Wei(42));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update_fee() {
        let state = test_state();
        let stranger = CallerIdentity(AccountId::from_bytes([0x01; 32]));

        let err = update_fee(
            State(state),
            stranger,
            Path("text".to_string()),
            Json(UpdateFeeRequest { fee_wei: Wei(1) }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.code(), "UNAUTHORIZED");
    }
}
