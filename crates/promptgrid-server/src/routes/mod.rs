//! Route definitions for the HTTP API.

pub mod events;
pub mod fees;
pub mod health;
pub mod market;
pub mod prompts;

use axum::Router;

use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(prompts::routes())
        .merge(fees::routes())
        .merge(market::routes())
        .merge(events::routes())
        .with_state(state)
}
