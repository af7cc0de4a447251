//! Marketplace routes: purchases, ratings, and proceeds.
//!
//! - POST /prompts/{id}/purchase - Buy access to a prompt
//! - GET /prompts/{id}/purchases/{account} - Lookup a purchase record
//! - POST /prompts/{id}/ratings - Rate a purchased prompt
//! - GET /prompts/{id}/ratings - Paged rating log as aligned sequences
//! - GET /prompts/{id}/ratings/{account} - Lookup a rating record
//! - GET /prompts/{id}/rating-summary - Running sum, count, and average
//! - GET /accounts/{account}/proceeds - Balance accrued to an account

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use promptgrid_core::{AccountId, TokenId, Wei};
use promptgrid_ledger::LedgerEvent;

use crate::error::{ApiError, ApiResult};
use crate::extract::CallerIdentity;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for POST /prompts/{id}/purchase.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    /// Payment attached; must equal the token price exactly.
    pub paid_wei: Wei,
}

/// Response for POST /prompts/{id}/purchase.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub token_id: TokenId,
    pub buyer: String,
    pub seller: String,
    pub price_wei: Wei,
    pub purchased: DateTime<Utc>,
}

/// Response for GET /prompts/{id}/purchases/{account}.
#[derive(Debug, Serialize)]
pub struct PurchaseStatusResponse {
    pub token_id: TokenId,
    pub account: String,
    pub purchased: bool,
}

/// Request body for POST /prompts/{id}/ratings.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    /// Star rating, 1..=5.
    pub stars: u8,
    /// Free-form review text. May be empty.
    #[serde(default)]
    pub review: String,
}

/// Response for POST /prompts/{id}/ratings.
#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub token_id: TokenId,
    pub stars: u8,
    /// The updated truncating average, scaled by 10.
    pub average_rating_x10: u64,
    pub rating_count: u64,
}

/// Query parameters for GET /prompts/{id}/ratings.
#[derive(Debug, Deserialize)]
pub struct RatingsQuery {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Response for GET /prompts/{id}/ratings.
///
/// Four aligned sequences in submission order: index `i` of each describes
/// the same rating.
#[derive(Debug, Serialize)]
pub struct RatingsResponse {
    pub stars: Vec<u8>,
    pub reviews: Vec<String>,
    pub raters: Vec<String>,
    pub timestamps: Vec<DateTime<Utc>>,
    pub total: u64,
}

/// Response for GET /prompts/{id}/ratings/{account}.
#[derive(Debug, Serialize)]
pub struct RatingStatusResponse {
    pub token_id: TokenId,
    pub account: String,
    pub rated: bool,
}

/// Response for GET /prompts/{id}/rating-summary.
#[derive(Debug, Serialize)]
pub struct RatingSummaryResponse {
    pub token_id: TokenId,
    pub sum: u64,
    pub count: u64,
    pub average_x10: u64,
}

/// Response for GET /accounts/{account}/proceeds.
#[derive(Debug, Serialize)]
pub struct ProceedsResponse {
    pub account: String,
    pub proceeds_wei: Wei,
}

fn parse_account(hex: &str) -> Result<AccountId, ApiError> {
    AccountId::from_str(hex).map_err(|e| ApiError::BadRequest(format!("Invalid account id: {}", e)))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /prompts/{id}/purchase - Buy access to a prompt.
///
/// # Response
///
/// - 201 Created: the purchase record
/// - 402 Payment Required: paid_wei != price
/// - 404 Not Found: no such token
/// - 409 Conflict: token deactivated, or already purchased by this caller
async fn purchase_prompt(
    State(state): State<AppState>,
    CallerIdentity(buyer): CallerIdentity,
    Path(id): Path<u64>,
    Json(request): Json<PurchaseRequest>,
) -> ApiResult<(StatusCode, Json<PurchaseResponse>)> {
    let token_id = TokenId(id);
    let event = {
        let mut ledger = state.ledger().write().await;
        ledger.purchase_prompt(buyer, token_id, request.paid_wei)?
    };
    state.publish(&event).await;

    let LedgerEvent::PromptPurchased {
        seller,
        price,
        timestamp,
        ..
    } = event
    else {
        return Err(ApiError::Internal(
            "unexpected event from purchase".to_string(),
        ));
    };

    tracing::info!(token_id = %token_id, buyer = %buyer, "prompt purchased");

    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            token_id,
            buyer: buyer.to_string(),
            seller: seller.to_string(),
            price_wei: price,
            purchased: timestamp,
        }),
    ))
}

/// GET /prompts/{id}/purchases/{account} - Whether an account holds access.
///
/// A pure lookup: any well-formed account and token id answers, a
/// never-minted token simply reads as not purchased.
async fn get_purchase_status(
    State(state): State<AppState>,
    Path((id, account)): Path<(u64, String)>,
) -> ApiResult<Json<PurchaseStatusResponse>> {
    let token_id = TokenId(id);
    let account = parse_account(&account)?;

    let ledger = state.ledger().read().await;
    Ok(Json(PurchaseStatusResponse {
        token_id,
        account: account.to_string(),
        purchased: ledger.has_purchased(account, token_id),
    }))
}

/// POST /prompts/{id}/ratings - Rate a purchased prompt.
///
/// # Response
///
/// - 201 Created: the updated aggregate
/// - 400 Bad Request: stars outside 1..=5
/// - 409 Conflict: caller never purchased this token, already rated it,
///   or the token is deactivated
async fn rate_prompt(
    State(state): State<AppState>,
    CallerIdentity(rater): CallerIdentity,
    Path(id): Path<u64>,
    Json(request): Json<RateRequest>,
) -> ApiResult<(StatusCode, Json<RateResponse>)> {
    let token_id = TokenId(id);
    let (event, aggregate) = {
        let mut ledger = state.ledger().write().await;
        let event = ledger.rate_prompt(rater, token_id, request.stars, request.review)?;
        (event, ledger.rating_aggregate(token_id))
    };
    state.publish(&event).await;

    tracing::info!(token_id = %token_id, rater = %rater, stars = request.stars, "prompt rated");

    Ok((
        StatusCode::CREATED,
        Json(RateResponse {
            token_id,
            stars: request.stars,
            average_rating_x10: aggregate.average_x10(),
            rating_count: aggregate.count,
        }),
    ))
}

/// GET /prompts/{id}/ratings - Paged chronological rating log.
///
/// Never fails: out-of-range offsets and never-minted tokens both yield
/// empty sequences.
async fn get_ratings(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<RatingsQuery>,
) -> Json<RatingsResponse> {
    let token_id = TokenId(id);
    let ledger = state.ledger().read().await;
    let page = ledger.prompt_ratings(token_id, query.offset, query.limit);
    Json(RatingsResponse {
        stars: page.stars,
        reviews: page.reviews,
        raters: page.raters.iter().map(|r| r.to_string()).collect(),
        timestamps: page.timestamps,
        total: ledger.rating_count(token_id),
    })
}

/// GET /prompts/{id}/ratings/{account} - Whether an account has rated.
///
/// A pure lookup: a never-minted token reads as not rated.
async fn get_rating_status(
    State(state): State<AppState>,
    Path((id, account)): Path<(u64, String)>,
) -> ApiResult<Json<RatingStatusResponse>> {
    let token_id = TokenId(id);
    let account = parse_account(&account)?;

    let ledger = state.ledger().read().await;
    Ok(Json(RatingStatusResponse {
        token_id,
        account: account.to_string(),
        rated: ledger.has_rated(account, token_id),
    }))
}

/// GET /prompts/{id}/rating-summary - Running aggregate and average.
///
/// Never fails: an unrated or never-minted token reads as all zeroes.
async fn get_rating_summary(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Json<RatingSummaryResponse> {
    let token_id = TokenId(id);
    let ledger = state.ledger().read().await;
    let aggregate = ledger.rating_aggregate(token_id);
    Json(RatingSummaryResponse {
        token_id,
        sum: aggregate.sum,
        count: aggregate.count,
        average_x10: aggregate.average_x10(),
    })
}

/// GET /accounts/{account}/proceeds - Balance accrued to an account.
async fn get_proceeds(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> ApiResult<Json<ProceedsResponse>> {
    let account = parse_account(&account)?;
    let ledger = state.ledger().read().await;
    Ok(Json(ProceedsResponse {
        account: account.to_string(),
        proceeds_wei: ledger.proceeds_of(account),
    }))
}

/// Build marketplace routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/prompts/{id}/purchase", post(purchase_prompt))
        .route("/prompts/{id}/purchases/{account}", get(get_purchase_status))
        .route("/prompts/{id}/ratings", get(get_ratings).post(rate_prompt))
        .route("/prompts/{id}/ratings/{account}", get(get_rating_status))
        .route("/prompts/{id}/rating-summary", get(get_rating_summary))
        .route("/accounts/{account}/proceeds", get(get_proceeds))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use promptgrid_core::{PromptKind, VerificationKey};

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

    fn creator() -> AccountId {
        AccountId::from_bytes([0x11; 32])
    }

    fn buyer() -> AccountId {
        AccountId::from_bytes([0x22; 32])
    }

    async fn mint(state: &AppState, price: Wei) -> TokenId {
        let mut ledger = state.ledger().write().await;
        let fee = ledger.listing_fee(PromptKind::Text);
        let event = ledger
            .create_prompt(
                creator(),
                PromptKind::Text,
                "Write a haiku about autumn".to_string(),
                "Poetry".to_string(),
                price,
                "ipfs://QmExample".to_string(),
                fee,
            )
            .unwrap();
        match event {
            LedgerEvent::PromptCreated { token_id, .. } => token_id,
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_purchase_then_rate() {
        let state = test_state();
        let token = mint(&state, Wei(500)).await;

        let (status, purchase) = purchase_prompt(
            State(state.clone()),
            CallerIdentity(buyer()),
            Path(token.0),
            Json(PurchaseRequest { paid_wei: Wei(500) }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(purchase.price_wei, Wei(500));
        assert_eq!(purchase.seller, creator().to_string());

        let (_, rated) = rate_prompt(
            State(state.clone()),
            CallerIdentity(buyer()),
            Path(token.0),
            Json(RateRequest {
                stars: 5,
                review: "Great prompt!".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(rated.average_rating_x10, 50);
        assert_eq!(rated.rating_count, 1);

        let summary = get_rating_summary(State(state), Path(token.0)).await;
        assert_eq!(summary.sum, 5);
        assert_eq!(summary.count, 1);
    }

    #[tokio::test]
    async fn test_purchase_wrong_price_rejected() {
        let state = test_state();
        let token = mint(&state, Wei(500)).await;

        let err = purchase_prompt(
            State(state.clone()),
            CallerIdentity(buyer()),
            Path(token.0),
            Json(PurchaseRequest { paid_wei: Wei(499) }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::PAYMENT_REQUIRED);

        let status = get_purchase_status(
            State(state),
            Path((token.0, buyer().to_string())),
        )
        .await
        .unwrap();
        assert!(!status.purchased);
    }

    #[tokio::test]
    async fn test_lookups_never_fail_for_unminted_tokens() {
        let state = test_state();

        let status = get_purchase_status(
            State(state.clone()),
            Path((42, buyer().to_string())),
        )
        .await
        .unwrap();
        assert!(!status.purchased);

        let rated = get_rating_status(
            State(state.clone()),
            Path((42, buyer().to_string())),
        )
        .await
        .unwrap();
        assert!(!rated.rated);

        let page = get_ratings(
            State(state.clone()),
            Path(42),
            Query(RatingsQuery {
                offset: 0,
                limit: 10,
            }),
        )
        .await;
        assert!(page.stars.is_empty());
        assert_eq!(page.total, 0);

        let summary = get_rating_summary(State(state), Path(42)).await;
        assert_eq!(summary.sum, 0);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average_x10, 0);
    }

    #[tokio::test]
    async fn test_rate_without_purchase_conflicts() {
        let state = test_state();
        let token = mint(&state, Wei(500)).await;

        let err = rate_prompt(
            State(state),
            CallerIdentity(buyer()),
            Path(token.0),
            Json(RateRequest {
                stars: 4,
                review: String::new(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "STATE_CONFLICT");
    }

    #[tokio::test]
    async fn test_ratings_page_is_aligned() {
        let state = test_state();
        let token = mint(&state, Wei(100)).await;

        for (i, stars) in [5u8, 3, 4].into_iter().enumerate() {
            let account = AccountId::from_bytes([0x30 + i as u8; 32]);
            purchase_prompt(
                State(state.clone()),
                CallerIdentity(account),
                Path(token.0),
                Json(PurchaseRequest { paid_wei: Wei(100) }),
            )
            .await
            .unwrap();
            rate_prompt(
                State(state.clone()),
                CallerIdentity(account),
                Path(token.0),
                Json(RateRequest {
                    stars,
                    review: format!("review {i}"),
                }),
            )
            .await
            .unwrap();
        }

        let page = get_ratings(
            State(state.clone()),
            Path(token.0),
            Query(RatingsQuery {
                offset: 1,
                limit: 10,
            }),
        )
        .await;
        assert_eq!(page.stars, vec![3, 4]);
        assert_eq!(page.reviews, vec!["review 1", "review 2"]);
        assert_eq!(page.raters.len(), 2);
        assert_eq!(page.timestamps.len(), 2);
        assert_eq!(page.total, 3);

        // [5, 3, 4] truncates to 4.0.
        let summary = get_rating_summary(State(state), Path(token.0)).await;
        assert_eq!(summary.average_x10, 40);
    }

    #[tokio::test]
    async fn test_proceeds_after_sale() {
        let state = test_state();
        let token = mint(&state, Wei(500)).await;

        purchase_prompt(
            State(state.clone()),
            CallerIdentity(buyer()),
            Path(token.0),
            Json(PurchaseRequest { paid_wei: Wei(500) }),
        )
        .await
        .unwrap();

        let seller = get_proceeds(State(state.clone()), Path(creator().to_string()))
            .await
            .unwrap();
        assert_eq!(seller.proceeds_wei, Wei(500));

        // Treasury holds the listing fee.
        let treasury_hex = AccountId::from_bytes([0xbb; 32]).to_string();
        let treasury = get_proceeds(State(state), Path(treasury_hex)).await.unwrap();
        assert_eq!(treasury.proceeds_wei, Wei::from_milliether(5));
    }
}
