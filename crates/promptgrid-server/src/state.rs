//! Application state shared across handlers.

use std::sync::Arc;

use promptgrid_ledger::{Ledger, LedgerConfig, LedgerEvent};
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::events::EventBroadcaster;

/// Application state shared across all handlers.
///
/// This is cloneable and can be extracted in handlers using `State<AppState>`.
/// The ledger sits behind one `RwLock`: mutating operations take the write
/// guard, lookups the read guard, which serializes state transitions into the
/// "one at a time, in full" order the ledger assumes.
#[derive(Clone)]
pub struct AppState {
    /// The marketplace state machine.
    ledger: Arc<RwLock<Ledger>>,
    /// Server configuration.
    config: Arc<ServerConfig>,
    /// Event broadcaster for SSE notifications.
    broadcaster: Arc<EventBroadcaster>,
}

impl AppState {
    /// Create new application state with an empty ledger.
    pub fn new(config: ServerConfig) -> Self {
        let ledger = Ledger::new(LedgerConfig {
            owner: config.owner_account,
            treasury: config.treasury_account,
            verification_key: config.metadata_key,
        });
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            config: Arc::new(config),
            broadcaster: Arc::new(EventBroadcaster::new()),
        }
    }

    /// Get a reference to the ledger lock.
    pub fn ledger(&self) -> &Arc<RwLock<Ledger>> {
        &self.ledger
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get a reference to the event broadcaster.
    pub fn broadcaster(&self) -> &Arc<EventBroadcaster> {
        &self.broadcaster
    }

    /// Forward a committed ledger event to SSE subscribers.
    pub async fn publish(&self, event: &LedgerEvent) {
        self.broadcaster.publish(event).await;
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
