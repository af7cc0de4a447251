//! Registry routes: minting, details, listings, data retrieval, deactivation.
//!
//! - POST /prompts - Mint a new prompt token (pays the listing fee)
//! - GET /prompts - Paged listing of tokens for display grids
//! - GET /prompts/{id} - Stored fields plus rating summary
//! - GET /prompts/{id}/data?key=hex - Verification-key-gated metadata pointer
//! - POST /prompts/{id}/deactivate - Creator/owner closes a token (terminal)
//! - GET /counter - The next id to be minted

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use promptgrid_core::{PromptKind, PromptToken, TokenId, VerificationKey, Wei};
use promptgrid_ledger::LedgerEvent;

use crate::error::{ApiError, ApiResult};
use crate::extract::CallerIdentity;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for POST /prompts.
#[derive(Debug, Deserialize)]
pub struct CreatePromptRequest {
    /// Prompt kind: a name ("text") or the integer wire code (1..=4).
    pub kind: KindField,
    /// The prompt body.
    pub content: String,
    /// Display name / category.
    pub name: String,
    /// Purchase price in wei.
    pub price_wei: Wei,
    /// Opaque metadata pointer. Stored, never interpreted.
    #[serde(default)]
    pub metadata: String,
    /// Payment attached to the mint; must equal the kind's listing fee.
    pub paid_wei: Wei,
}

/// A prompt kind on the wire: either its lowercase name or its integer code.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KindField {
    Code(u8),
    Name(String),
}

impl KindField {
    /// Resolves to the closed kind set, or `InvalidInput`.
    pub fn resolve(&self) -> Result<PromptKind, ApiError> {
        match self {
            Self::Code(code) => PromptKind::from_code(*code).ok_or_else(|| {
                ApiError::BadRequest(format!("unknown prompt kind code {code}, expected 1..=4"))
            }),
            Self::Name(name) => parse_kind(name),
        }
    }
}

/// Parses a kind from its lowercase name or decimal code.
pub(crate) fn parse_kind(s: &str) -> Result<PromptKind, ApiError> {
    if let Ok(code) = s.parse::<u8>() {
        return PromptKind::from_code(code).ok_or_else(|| {
            ApiError::BadRequest(format!("unknown prompt kind code {code}, expected 1..=4"))
        });
    }
    PromptKind::from_str(s).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Response for POST /prompts.
#[derive(Debug, Serialize)]
pub struct CreatePromptResponse {
    /// The newly minted token id.
    pub token_id: TokenId,
    pub kind: PromptKind,
    pub price_wei: Wei,
    pub fee_paid_wei: Wei,
    pub created: DateTime<Utc>,
}

/// One token in the GET /prompts listing.
#[derive(Debug, Serialize)]
pub struct PromptSummary {
    pub id: TokenId,
    pub kind: PromptKind,
    pub name: String,
    pub price_wei: Wei,
    pub creator: String,
    pub active: bool,
    pub rating_count: u64,
    pub average_rating_x10: u64,
}

/// Response for GET /prompts.
#[derive(Debug, Serialize)]
pub struct ListPromptsResponse {
    pub prompts: Vec<PromptSummary>,
    /// The registry counter, i.e. total tokens ever minted.
    pub next_token_id: TokenId,
}

/// Response for GET /prompts/{id}.
#[derive(Debug, Serialize)]
pub struct PromptDetailsResponse {
    pub id: TokenId,
    pub kind: PromptKind,
    pub content: String,
    pub name: String,
    pub price_wei: Wei,
    pub creator: String,
    pub metadata: String,
    pub active: bool,
    pub created: DateTime<Utc>,
    pub rating_count: u64,
    pub average_rating_x10: u64,
}

/// Query parameters for GET /prompts.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Query parameters for GET /prompts/{id}/data.
#[derive(Debug, Deserialize)]
pub struct DataQuery {
    /// 64-char hex verification key.
    pub key: String,
}

/// Response for GET /prompts/{id}/data.
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub token_id: TokenId,
    /// The stored metadata pointer.
    pub data: String,
}

/// Response for GET /counter.
#[derive(Debug, Serialize)]
pub struct CounterResponse {
    pub next_token_id: TokenId,
}

/// Response for POST /prompts/{id}/deactivate.
#[derive(Debug, Serialize)]
pub struct DeactivateResponse {
    pub token_id: TokenId,
    pub active: bool,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /prompts - Mint a new prompt token.
///
/// The caller pays exactly the listing fee for the kind; the fee is retained
/// by the treasury account.
///
/// # Response
///
/// - 201 Created: the new token id
/// - 400 Bad Request: unknown kind or empty content
/// - 402 Payment Required: paid_wei != listing fee
async fn create_prompt(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Json(request): Json<CreatePromptRequest>,
) -> ApiResult<(StatusCode, Json<CreatePromptResponse>)> {
    let kind = request.kind.resolve()?;

    let event = {
        let mut ledger = state.ledger().write().await;
        ledger.create_prompt(
            caller,
            kind,
            request.content,
            request.name,
            request.price_wei,
            request.metadata,
            request.paid_wei,
        )?
    };
    state.publish(&event).await;

    let LedgerEvent::PromptCreated {
        token_id,
        price,
        fee_paid,
        timestamp,
        ..
    } = event
    else {
        return Err(ApiError::Internal("unexpected event from mint".to_string()));
    };

    tracing::info!(token_id = %token_id, creator = %caller, "prompt minted");

    Ok((
        StatusCode::CREATED,
        Json(CreatePromptResponse {
            token_id,
            kind,
            price_wei: price,
            fee_paid_wei: fee_paid,
            created: timestamp,
        }),
    ))
}

fn summarize(ledger: &promptgrid_ledger::Ledger, token: &PromptToken) -> PromptSummary {
    PromptSummary {
        id: token.id,
        kind: token.kind,
        name: token.name.clone(),
        price_wei: token.price,
        creator: token.creator.to_string(),
        active: token.active,
        rating_count: ledger.rating_count(token.id),
        average_rating_x10: ledger.average_rating(token.id),
    }
}

/// GET /prompts - Paged listing of tokens in id order.
async fn list_prompts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListPromptsResponse>> {
    let ledger = state.ledger().read().await;
    let prompts = ledger
        .prompts(query.offset, query.limit)
        .into_iter()
        .map(|token| summarize(&ledger, token))
        .collect();

    Ok(Json(ListPromptsResponse {
        prompts,
        next_token_id: ledger.token_id_counter(),
    }))
}

/// GET /prompts/{id} - Stored fields plus rating summary.
///
/// Deactivated tokens remain readable; only never-minted ids are 404.
async fn get_prompt(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<PromptDetailsResponse>> {
    let token_id = TokenId(id);
    let ledger = state.ledger().read().await;
    let token = ledger.prompt_details(token_id)?;

    Ok(Json(PromptDetailsResponse {
        id: token.id,
        kind: token.kind,
        content: token.content.clone(),
        name: token.name.clone(),
        price_wei: token.price,
        creator: token.creator.to_string(),
        metadata: token.metadata.clone(),
        active: token.active,
        created: token.created,
        rating_count: ledger.rating_count(token_id),
        average_rating_x10: ledger.average_rating(token_id),
    }))
}

/// GET /prompts/{id}/data?key=hex - Verification-key-gated pointer retrieval.
async fn get_prompt_data(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<DataQuery>,
) -> ApiResult<Json<DataResponse>> {
    let token_id = TokenId(id);
    let key = VerificationKey::from_str(&query.key)
        .map_err(|e| ApiError::BadRequest(format!("Invalid verification key: {}", e)))?;

    let ledger = state.ledger().read().await;
    let bytes = ledger.data_for_token_id(token_id, key)?;

    Ok(Json(DataResponse {
        token_id,
        data: String::from_utf8_lossy(bytes).into_owned(),
    }))
}

/// GET /counter - The next id to be minted.
async fn get_counter(State(state): State<AppState>) -> Json<CounterResponse> {
    let ledger = state.ledger().read().await;
    Json(CounterResponse {
        next_token_id: ledger.token_id_counter(),
    })
}

/// POST /prompts/{id}/deactivate - Close a token for purchase. Terminal.
async fn deactivate_prompt(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<u64>,
) -> ApiResult<Json<DeactivateResponse>> {
    let token_id = TokenId(id);
    let event = {
        let mut ledger = state.ledger().write().await;
        ledger.deactivate_prompt(caller, token_id)?
    };
    state.publish(&event).await;

    Ok(Json(DeactivateResponse {
        token_id,
        active: false,
    }))
}

/// Build registry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/prompts", get(list_prompts).post(create_prompt))
        .route("/prompts/{id}", get(get_prompt))
        .route("/prompts/{id}/data", get(get_prompt_data))
        .route("/prompts/{id}/deactivate", post(deactivate_prompt))
        .route("/counter", get(get_counter))
}

// ============================================================================
// Tests
// ============================================================================
