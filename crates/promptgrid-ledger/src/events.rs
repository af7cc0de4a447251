//! Events emitted by successful ledger operations.
//!
//! Every mutating operation returns the event describing what it did. The
//! ledger itself does not deliver events anywhere; the embedding layer (the
//! HTTP server) forwards them to subscribers. An event exists only if its
//! operation committed, so consumers can treat the stream as a faithful
//! journal of state transitions.

use chrono::{DateTime, Utc};
use promptgrid_core::{AccountId, PromptKind, TokenId, Wei};
use serde::{Deserialize, Serialize};

/// A committed state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A prompt token was minted.
    PromptCreated {
        token_id: TokenId,
        creator: AccountId,
        kind: PromptKind,
        price: Wei,
        fee_paid: Wei,
        timestamp: DateTime<Utc>,
    },

    /// The listing fee for one kind changed.
    ListingFeeUpdated {
        kind: PromptKind,
        fee: Wei,
        timestamp: DateTime<Utc>,
    },

    /// A token was deactivated. Terminal.
    PromptDeactivated {
        token_id: TokenId,
        by: AccountId,
        timestamp: DateTime<Utc>,
    },

    /// A buyer paid the exact price for a token.
    PromptPurchased {
        token_id: TokenId,
        buyer: AccountId,
        seller: AccountId,
        price: Wei,
        timestamp: DateTime<Utc>,
    },

    /// A buyer rated a token they purchased.
    PromptRated {
        token_id: TokenId,
        rater: AccountId,
        stars: u8,
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// The token this event concerns, if any.
    ///
    /// Fee-schedule updates are registry-wide and return `None`.
    #[must_use]
    pub fn token_id(&self) -> Option<TokenId> {
        match self {
            Self::PromptCreated { token_id, .. }
            | Self::PromptDeactivated { token_id, .. }
            | Self::PromptPurchased { token_id, .. }
            | Self::PromptRated { token_id, .. } => Some(*token_id),
            Self::ListingFeeUpdated { .. } => None,
        }
    }

    /// Short name used as the SSE event type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PromptCreated { .. } => "prompt_created",
            Self::ListingFeeUpdated { .. } => "listing_fee_updated",
            Self::PromptDeactivated { .. } => "prompt_deactivated",
            Self::PromptPurchased { .. } => "prompt_purchased",
            Self::PromptRated { .. } => "prompt_rated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization_is_tagged() {
        let event = LedgerEvent::PromptPurchased {
            token_id: TokenId(4),
            buyer: AccountId::zero(),
            seller: AccountId::from_bytes([1; 32]),
            price: Wei(100),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"prompt_purchased\""));
        assert!(json.contains("\"token_id\":4"));

        let parsed: LedgerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn token_id_routing() {
        let rated = LedgerEvent::PromptRated {
            token_id: TokenId(2),
            rater: AccountId::zero(),
            stars: 5,
            timestamp: Utc::now(),
        };
        assert_eq!(rated.token_id(), Some(TokenId(2)));
        assert_eq!(rated.name(), "prompt_rated");

        let fee = LedgerEvent::ListingFeeUpdated {
            kind: PromptKind::Text,
            fee: Wei(5),
            timestamp: Utc::now(),
        };
        assert_eq!(fee.token_id(), None);
    }
}
