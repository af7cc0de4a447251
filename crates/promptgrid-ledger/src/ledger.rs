//! The ledger: one owned state store for the whole system.
//!
//! Wraps the [`Registry`] and [`Market`] together with the proceeds map and
//! routes every operation through a single `&mut self` surface. Nothing
//! outside this crate can reach the underlying maps, which is what makes the
//! atomicity argument local: each operation validates everything first, then
//! performs only infallible writes, so a failed call leaves the ledger
//! exactly as it found it.
//!
//! Value transfer is internal bookkeeping: listing fees credit the treasury
//! account, sale prices credit the creator. On purchase the record is written
//! before the creator is credited (checks-effects-interactions order), so an
//! observer triggered by the payout can never see a paid-but-unrecorded
//! purchase.

use std::collections::HashMap;

use chrono::Utc;
use promptgrid_core::{
    AccountId, PromptKind, PromptToken, RatingAggregate, RatingPage, TokenId, VerificationKey, Wei,
};

use crate::error::{LedgerError, LedgerResult};
use crate::events::LedgerEvent;
use crate::market::Market;
use crate::registry::Registry;

/// Construction parameters for a ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Account allowed to change the fee schedule and deactivate any token.
    pub owner: AccountId,

    /// Account credited with retained listing fees.
    pub treasury: AccountId,

    /// Verification key stored on every minted token.
    pub verification_key: VerificationKey,
}

/// The complete marketplace state machine.
#[derive(Debug, Clone)]
pub struct Ledger {
    registry: Registry,
    market: Market,
    treasury: AccountId,
    /// Accrued balances: treasury fees and creator sale proceeds.
    proceeds: HashMap<AccountId, Wei>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            registry: Registry::new(config.owner, config.verification_key),
            market: Market::new(),
            treasury: config.treasury,
            proceeds: HashMap::new(),
        }
    }

    // ------------------------------------------------------------------
    // Registry operations
    // ------------------------------------------------------------------

    /// Mints a prompt token. `paid` must equal the listing fee for `kind`;
    /// the fee is retained by the treasury account.
    #[allow(clippy::too_many_arguments)]
    pub fn create_prompt(
        &mut self,
        caller: AccountId,
        kind: PromptKind,
        content: String,
        name: String,
        price: Wei,
        metadata: String,
        paid: Wei,
    ) -> LedgerResult<LedgerEvent> {
        let now = Utc::now();
        // Compute the treasury credit before minting so the only write after
        // a successful mint is infallible.
        let treasury_balance = self
            .proceeds_of(self.treasury)
            .checked_add(paid)
            .ok_or(LedgerError::Overflow("crediting the treasury"))?;

        let token_id = self
            .registry
            .mint(caller, kind, content, name, price, metadata, paid, now)?;
        self.proceeds.insert(self.treasury, treasury_balance);

        Ok(LedgerEvent::PromptCreated {
            token_id,
            creator: caller,
            kind,
            price,
            fee_paid: paid,
            timestamp: now,
        })
    }

    /// Sets the listing fee for one kind. Owner only.
    pub fn update_listing_fee(
        &mut self,
        caller: AccountId,
        kind: PromptKind,
        fee: Wei,
    ) -> LedgerResult<LedgerEvent> {
        let now = Utc::now();
        self.registry.update_listing_fee(caller, kind, fee)?;
        Ok(LedgerEvent::ListingFeeUpdated {
            kind,
            fee,
            timestamp: now,
        })
    }

    /// Deactivates a token. Creator or owner only; terminal.
    pub fn deactivate_prompt(
        &mut self,
        caller: AccountId,
        token_id: TokenId,
    ) -> LedgerResult<LedgerEvent> {
        let now = Utc::now();
        self.registry.deactivate(caller, token_id)?;
        Ok(LedgerEvent::PromptDeactivated {
            token_id,
            by: caller,
            timestamp: now,
        })
    }

    /// The stored fields of a token, or `TokenNotFound`.
    pub fn prompt_details(&self, token_id: TokenId) -> LedgerResult<&PromptToken> {
        self.registry.details(token_id)
    }

    /// The metadata pointer bytes, gated by the verification key.
    pub fn data_for_token_id(
        &self,
        token_id: TokenId,
        key: VerificationKey,
    ) -> LedgerResult<&[u8]> {
        self.registry.data_for_token_id(token_id, key)
    }

    /// The next id to be minted.
    #[must_use]
    pub fn token_id_counter(&self) -> TokenId {
        self.registry.token_id_counter()
    }

    /// The fee required to mint a token of `kind`.
    #[must_use]
    pub fn listing_fee(&self, kind: PromptKind) -> Wei {
        self.registry.listing_fee(kind)
    }

    /// The full fee schedule in kind order.
    #[must_use]
    pub fn listing_fees(&self) -> Vec<(PromptKind, Wei)> {
        self.registry.listing_fees()
    }

    /// A page of tokens in id order.
    #[must_use]
    pub fn prompts(&self, offset: usize, limit: usize) -> Vec<&PromptToken> {
        self.registry.prompts(offset, limit)
    }

    /// How many tokens an account has minted.
    #[must_use]
    pub fn creator_prompt_count(&self, creator: AccountId) -> u64 {
        self.registry.creator_prompt_count(creator)
    }

    /// The registry owner.
    #[must_use]
    pub fn owner(&self) -> AccountId {
        self.registry.owner()
    }

    /// The treasury account retaining listing fees.
    #[must_use]
    pub fn treasury(&self) -> AccountId {
        self.treasury
    }

    // ------------------------------------------------------------------
    // Marketplace operations
    // ------------------------------------------------------------------

    /// Purchases a token. `paid` must equal the token price exactly; the
    /// purchase record is written before the creator is credited.
    pub fn purchase_prompt(
        &mut self,
        buyer: AccountId,
        token_id: TokenId,
        paid: Wei,
    ) -> LedgerResult<LedgerEvent> {
        let now = Utc::now();
        let (seller, price) = {
            let token = self.registry.active_token(token_id)?;
            (token.creator, token.price)
        };
        if paid != price {
            return Err(LedgerError::PriceMismatch {
                token: token_id,
                required: price,
                paid,
            });
        }
        let seller_balance = self
            .proceeds_of(seller)
            .checked_add(paid)
            .ok_or(LedgerError::Overflow("crediting the seller"))?;

        // Record first, then pay: a callback observing the payout sees the
        // purchase already on the books.
        self.market.record_purchase(buyer, token_id, now)?;
        self.proceeds.insert(seller, seller_balance);

        Ok(LedgerEvent::PromptPurchased {
            token_id,
            buyer,
            seller,
            price,
            timestamp: now,
        })
    }

    /// Rates a purchased token. Stars in 1..=5, one rating per buyer.
    pub fn rate_prompt(
        &mut self,
        rater: AccountId,
        token_id: TokenId,
        stars: u8,
        review: String,
    ) -> LedgerResult<LedgerEvent> {
        let now = Utc::now();
        // Rating mutates marketplace state, so the active flag applies here
        // just as it does to purchases.
        self.registry.active_token(token_id)?;
        self.market
            .record_rating(rater, token_id, stars, review, now)?;
        Ok(LedgerEvent::PromptRated {
            token_id,
            rater,
            stars,
            timestamp: now,
        })
    }

    /// Whether `account` purchased `token_id`. Never fails.
    #[must_use]
    pub fn has_purchased(&self, account: AccountId, token_id: TokenId) -> bool {
        self.market.has_purchased(account, token_id)
    }

    /// Whether `account` rated `token_id`. Never fails.
    #[must_use]
    pub fn has_rated(&self, account: AccountId, token_id: TokenId) -> bool {
        self.market.has_rated(account, token_id)
    }

    /// Number of ratings for `token_id`. Never fails.
    #[must_use]
    pub fn rating_count(&self, token_id: TokenId) -> u64 {
        self.market.rating_count(token_id)
    }

    /// The raw (sum, count) aggregate, for callers choosing their own
    /// rounding.
    #[must_use]
    pub fn rating_aggregate(&self, token_id: TokenId) -> RatingAggregate {
        self.market.aggregate(token_id)
    }

    /// Average rating scaled by 10, truncating. Zero when unrated.
    #[must_use]
    pub fn average_rating(&self, token_id: TokenId) -> u64 {
        self.market.average_rating(token_id)
    }

    /// A page of the chronological rating log as four aligned sequences.
    #[must_use]
    pub fn prompt_ratings(&self, token_id: TokenId, offset: usize, limit: usize) -> RatingPage {
        self.market.ratings_page(token_id, offset, limit)
    }

    /// Balance accrued to an account (treasury fees or sale proceeds).
    #[must_use]
    pub fn proceeds_of(&self, account: AccountId) -> Wei {
        self.proceeds.get(&account).copied().unwrap_or(Wei::ZERO)
    }
}
