//! Error types for the ledger state machine.
//!
//! Every variant aborts its operation with no partial effect: the ledger
//! after a failed call is identical to before it. Variants are specific so
//! callers can react ("already purchased" vs "wrong payment amount"), and
//! each classifies into one of the coarse [`ErrorKind`]s that the HTTP layer
//! maps to status codes.

use promptgrid_core::{AccountId, PromptKind, TokenId, Wei};
use thiserror::Error;

/// Result type alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Coarse classification of a ledger error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller lacks the required role.
    Unauthorized,
    /// Out-of-range or malformed input.
    InvalidInput,
    /// Transferred value does not equal the required fee or price.
    PaymentMismatch,
    /// The operation conflicts with recorded state.
    StateConflict,
    /// Reference to a token or pointer key that does not resolve.
    NotFound,
    /// Fixed-width arithmetic guard tripped. Callers treat this as internal.
    Overflow,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Caller lacks the role an operation requires.
    #[error("account {caller} is not allowed to {operation}")]
    Unauthorized {
        caller: AccountId,
        operation: &'static str,
    },

    /// A required text field was empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// Star rating outside 1..=5.
    #[error("stars must be between 1 and 5, got {0}")]
    StarsOutOfRange(u8),

    /// Mint payment does not equal the listing fee for the kind.
    #[error("listing fee for {kind} prompts is {required} wei, got {paid}")]
    ListingFeeMismatch {
        kind: PromptKind,
        required: Wei,
        paid: Wei,
    },

    /// Purchase payment does not equal the token price.
    #[error("token {token} costs {required} wei, got {paid}")]
    PriceMismatch {
        token: TokenId,
        required: Wei,
        paid: Wei,
    },

    /// The token id was never minted.
    #[error("token {0} does not exist")]
    TokenNotFound(TokenId),

    /// The supplied verification key does not match the token's stored key.
    #[error("verification key does not match token {0}")]
    VerificationKeyMismatch(TokenId),

    /// The token has been deactivated.
    #[error("token {0} is no longer active")]
    PromptInactive(TokenId),

    /// The buyer already holds a purchase record for this token.
    #[error("account {buyer} already purchased token {token}")]
    AlreadyPurchased { buyer: AccountId, token: TokenId },

    /// The rater already rated this token.
    #[error("account {rater} already rated token {token}")]
    AlreadyRated { rater: AccountId, token: TokenId },

    /// Rating requires a prior purchase by the same account.
    #[error("account {rater} has not purchased token {token}")]
    NotPurchased { rater: AccountId, token: TokenId },

    /// Checked arithmetic overflowed.
    #[error("arithmetic overflow while {0}")]
    Overflow(&'static str),
}

impl LedgerError {
    /// The coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::EmptyField(_) | Self::StarsOutOfRange(_) => ErrorKind::InvalidInput,
            Self::ListingFeeMismatch { .. } | Self::PriceMismatch { .. } => {
                ErrorKind::PaymentMismatch
            }
            Self::TokenNotFound(_) | Self::VerificationKeyMismatch(_) => ErrorKind::NotFound,
            Self::PromptInactive(_)
            | Self::AlreadyPurchased { .. }
            | Self::AlreadyRated { .. }
            | Self::NotPurchased { .. } => ErrorKind::StateConflict,
            Self::Overflow(_) => ErrorKind::Overflow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_the_taxonomy() {
        let unauthorized = LedgerError::Unauthorized {
            caller: AccountId::zero(),
            operation: "update the listing fee",
        };
        assert_eq!(unauthorized.kind(), ErrorKind::Unauthorized);

        assert_eq!(
            LedgerError::StarsOutOfRange(6).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            LedgerError::PriceMismatch {
                token: TokenId(0),
                required: Wei(10),
                paid: Wei(9),
            }
            .kind(),
            ErrorKind::PaymentMismatch
        );
        assert_eq!(
            LedgerError::TokenNotFound(TokenId(9)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LedgerError::PromptInactive(TokenId(1)).kind(),
            ErrorKind::StateConflict
        );
        assert_eq!(
            LedgerError::Overflow("crediting proceeds").kind(),
            ErrorKind::Overflow
        );
    }

    #[test]
    fn messages_are_distinguishable() {
        let fee = LedgerError::ListingFeeMismatch {
            kind: PromptKind::Text,
            required: Wei(5),
            paid: Wei(4),
        };
        assert_eq!(fee.to_string(), "listing fee for text prompts is 5 wei, got 4");

        let dup = LedgerError::AlreadyPurchased {
            buyer: AccountId::zero(),
            token: TokenId(3),
        };
        assert!(dup.to_string().contains("already purchased token 3"));
    }
}
