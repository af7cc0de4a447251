//! Event broadcasting for real-time notifications.
//!
//! This module provides a pub/sub mechanism for forwarding committed ledger
//! events to connected SSE clients. Channels are per token, created lazily on
//! first subscription and cleaned up when all subscribers disconnect.
//! Fee-schedule updates carry no token and go to every open channel.

use std::collections::HashMap;
use std::sync::Arc;

use promptgrid_core::TokenId;
use promptgrid_ledger::LedgerEvent;
use tokio::sync::{RwLock, broadcast};

/// Default channel capacity for broadcast channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Heartbeat interval for SSE connections in seconds.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Manages broadcast channels for ledger events.
#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    /// Map of token id -> broadcast sender.
    channels: Arc<RwLock<HashMap<TokenId, broadcast::Sender<LedgerEvent>>>>,
    /// Channel capacity for new channels.
    capacity: usize,
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBroadcaster {
    /// Create a new event broadcaster with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new event broadcaster with custom capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Subscribe to events for one token.
    ///
    /// Creates the channel if it doesn't exist.
    pub async fn subscribe(&self, token_id: TokenId) -> broadcast::Receiver<LedgerEvent> {
        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(&token_id) {
                return sender.subscribe();
            }
        }

        let mut channels = self.channels.write().await;
        // Check again in case another task created it.
        if let Some(sender) = channels.get(&token_id) {
            return sender.subscribe();
        }

        let (sender, receiver) = broadcast::channel(self.capacity);
        channels.insert(token_id, sender);

        tracing::debug!(token_id = %token_id, capacity = self.capacity, "created event channel");
        receiver
    }

    /// Publish a committed event to its token's subscribers.
    ///
    /// Events without a token (fee-schedule updates) fan out to every open
    /// channel. Returns how many receivers got the event.
    pub async fn publish(&self, event: &LedgerEvent) -> usize {
        let channels = self.channels.read().await;
        match event.token_id() {
            Some(token_id) => channels
                .get(&token_id)
                .map(|sender| sender.send(event.clone()).unwrap_or(0))
                .unwrap_or(0),
            None => channels
                .values()
                .map(|sender| sender.send(event.clone()).unwrap_or(0))
                .sum(),
        }
    }

    /// Get the number of active channels.
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Get the number of subscribers for a token.
    pub async fn subscriber_count(&self, token_id: TokenId) -> usize {
        let channels = self.channels.read().await;
        channels
            .get(&token_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    /// Clean up channels with no subscribers. Returns how many were removed.
    pub async fn cleanup_empty_channels(&self) -> usize {
        let mut channels = self.channels.write().await;
        let before = channels.len();
        channels.retain(|_, sender| sender.receiver_count() > 0);
        before - channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use promptgrid_core::{AccountId, PromptKind, Wei};

    fn purchased(token_id: TokenId) -> LedgerEvent {
        LedgerEvent::PromptPurchased {
            token_id,
            buyer: AccountId::zero(),
            seller: AccountId::from_bytes([1; 32]),
            price: Wei(10),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn subscribe_then_publish() {
        let broadcaster = EventBroadcaster::new();
        let token = TokenId(3);

        let mut receiver = broadcaster.subscribe(token).await;
        assert_eq!(broadcaster.channel_count().await, 1);
        assert_eq!(broadcaster.subscriber_count(token).await, 1);

        let delivered = broadcaster.publish(&purchased(token)).await;
        assert_eq!(delivered, 1);

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.token_id(), Some(token));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_fine() {
        let broadcaster = EventBroadcaster::new();
        let delivered = broadcaster.publish(&purchased(TokenId(9))).await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn fee_updates_fan_out_to_all_channels() {
        let broadcaster = EventBroadcaster::new();
        let mut a = broadcaster.subscribe(TokenId(1)).await;
        let mut b = broadcaster.subscribe(TokenId(2)).await;

        let event = LedgerEvent::ListingFeeUpdated {
            kind: PromptKind::Text,
            fee: Wei(5),
            timestamp: Utc::now(),
        };
        let delivered = broadcaster.publish(&event).await;
        assert_eq!(delivered, 2);
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[tokio::test]
    async fn cleanup_removes_orphaned_channels() {
        let broadcaster = EventBroadcaster::new();
        {
            let _receiver = broadcaster.subscribe(TokenId(1)).await;
            assert_eq!(broadcaster.channel_count().await, 1);
        }
        // receiver dropped

        let cleaned = broadcaster.cleanup_empty_channels().await;
        assert_eq!(cleaned, 1);
        assert_eq!(broadcaster.channel_count().await, 0);
    }
}
