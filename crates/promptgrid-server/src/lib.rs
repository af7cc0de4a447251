//! promptgrid-server: HTTP API server for the PromptGrid marketplace
//!
//! This crate provides:
//! - Registry endpoints (mint, list, details, data, deactivate, fees)
//! - Marketplace endpoints (purchase, rate, rating log, proceeds)
//! - Caller identity extraction (JWT bearer tokens or a dev header)
//! - Server-Sent Events (SSE) for real-time notifications
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request tracing and logging
//! - CORS handling
//! - Request ID generation
//! - JSON error responses
//!
//! All marketplace state lives in one in-memory [`promptgrid_ledger::Ledger`]
//! behind a `RwLock`; every state transition runs one at a time, in full.

pub mod config;
pub mod error;
pub mod events;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use events::EventBroadcaster;
pub use extract::CallerIdentity;
pub use state::AppState;

// Re-export dependent crates
pub use promptgrid_core;
pub use promptgrid_ledger;
