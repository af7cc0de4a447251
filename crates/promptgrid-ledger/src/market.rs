//! Purchase and rating records with per-token aggregates.
//!
//! The market owns three maps: purchase records keyed by (buyer, token),
//! per-token chronological rating logs, and the (sum, count) aggregate kept
//! exactly in step with each log. Existence, active-state, and price checks
//! against the registry are the [`Ledger`](crate::Ledger)'s job; this module
//! enforces the market's own invariants: one purchase per (buyer, token),
//! one rating per (rater, token), rating only after purchase.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use promptgrid_core::{AccountId, Rating, RatingAggregate, RatingPage, TokenId};

use crate::error::{LedgerError, LedgerResult};

/// Purchase records, rating logs, and rating aggregates.
#[derive(Debug, Clone, Default)]
pub struct Market {
    /// (buyer, token) -> purchase timestamp. At most one record per key.
    purchases: HashMap<(AccountId, TokenId), DateTime<Utc>>,

    /// Chronological rating log per token. Append-only.
    ratings: HashMap<TokenId, Vec<Rating>>,

    /// (rater, token) pairs that already rated, for O(1) duplicate checks.
    rated: HashSet<(AccountId, TokenId)>,

    /// Running (sum, count) per token, updated with every append.
    aggregates: HashMap<TokenId, RatingAggregate>,
}

impl Market {
    /// Creates an empty market.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a purchase. Rejects a repeat purchase for the same pair.
    pub fn record_purchase(
        &mut self,
        buyer: AccountId,
        token: TokenId,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        if self.purchases.contains_key(&(buyer, token)) {
            return Err(LedgerError::AlreadyPurchased { buyer, token });
        }
        self.purchases.insert((buyer, token), now);
        tracing::info!(token_id = %token, buyer = %buyer, "purchase recorded");
        Ok(())
    }

    /// Appends a rating and updates the token's aggregate in one step.
    ///
    /// Requires stars in 1..=5, a prior purchase by `rater`, and no prior
    /// rating by `rater`. The new aggregate is computed before anything is
    /// written, so a failure leaves both the log and the aggregate untouched.
    pub fn record_rating(
        &mut self,
        rater: AccountId,
        token: TokenId,
        stars: u8,
        review: String,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        if !(1..=5).contains(&stars) {
            return Err(LedgerError::StarsOutOfRange(stars));
        }
        if !self.purchases.contains_key(&(rater, token)) {
            return Err(LedgerError::NotPurchased { rater, token });
        }
        if self.rated.contains(&(rater, token)) {
            return Err(LedgerError::AlreadyRated { rater, token });
        }
        let current = self.aggregate(token);
        let sum = current
            .sum
            .checked_add(u64::from(stars))
            .ok_or(LedgerError::Overflow("summing stars"))?;
        let count = current
            .count
            .checked_add(1)
            .ok_or(LedgerError::Overflow("counting ratings"))?;

        // All checks passed; writes below cannot fail.
        self.ratings.entry(token).or_default().push(Rating {
            stars,
            review,
            rater,
            timestamp: now,
        });
        self.rated.insert((rater, token));
        self.aggregates.insert(token, RatingAggregate { sum, count });

        tracing::info!(token_id = %token, rater = %rater, stars, "rating recorded");
        Ok(())
    }

    /// Whether `account` holds a purchase record for `token`. Never fails.
    #[must_use]
    pub fn has_purchased(&self, account: AccountId, token: TokenId) -> bool {
        self.purchases.contains_key(&(account, token))
    }

    /// Whether `account` has rated `token`. Never fails.
    #[must_use]
    pub fn has_rated(&self, account: AccountId, token: TokenId) -> bool {
        self.rated.contains(&(account, token))
    }

    /// Number of ratings for `token`. Zero for any unknown token.
    #[must_use]
    pub fn rating_count(&self, token: TokenId) -> u64 {
        self.aggregate(token).count
    }

    /// The (sum, count) aggregate for `token`. Zeroes for any unknown token.
    #[must_use]
    pub fn aggregate(&self, token: TokenId) -> RatingAggregate {
        self.aggregates.get(&token).copied().unwrap_or_default()
    }

    /// Average rating scaled by 10, truncating. Zero when unrated.
    #[must_use]
    pub fn average_rating(&self, token: TokenId) -> u64 {
        self.aggregate(token).average_x10()
    }

    /// A page of the chronological rating log as four aligned sequences.
    ///
    /// Out-of-range offsets yield empty sequences; `limit` clamps to the
    /// remaining length. Never fails for any input.
    #[must_use]
    pub fn ratings_page(&self, token: TokenId, offset: usize, limit: usize) -> RatingPage {
        let mut page = RatingPage::default();
        if let Some(log) = self.ratings.get(&token) {
            for rating in log.iter().skip(offset).take(limit) {
                page.push(rating);
            }
        }
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buyer() -> AccountId {
        AccountId::from_bytes([0x22; 32])
    }

    fn token() -> TokenId {
        TokenId(0)
    }

    fn market_with_purchase() -> Market {
        let mut market = Market::new();
        market.record_purchase(buyer(), token(), Utc::now()).unwrap();
        market
    }

    #[test]
    fn purchase_recorded_once() {
        let mut market = market_with_purchase();
        assert!(market.has_purchased(buyer(), token()));
        assert!(!market.has_purchased(buyer(), TokenId(1)));

        let err = market
            .record_purchase(buyer(), token(), Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::AlreadyPurchased {
                buyer: buyer(),
                token: token(),
            }
        );
    }

    #[test]
    fn rating_requires_purchase() {
        let mut market = Market::new();
        let err = market
            .record_rating(buyer(), token(), 5, "Great".to_string(), Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::NotPurchased {
                rater: buyer(),
                token: token(),
            }
        );
        assert_eq!(market.rating_count(token()), 0);
    }

    #[test]
    fn rating_rejects_out_of_range_stars() {
        let mut market = market_with_purchase();
        for stars in [0u8, 6, 255] {
            let err = market
                .record_rating(buyer(), token(), stars, String::new(), Utc::now())
                .unwrap_err();
            assert_eq!(err, LedgerError::StarsOutOfRange(stars));
        }
        assert_eq!(market.rating_count(token()), 0);
    }

    #[test]
    fn rating_rejects_duplicates() {
        let mut market = market_with_purchase();
        market
            .record_rating(buyer(), token(), 4, "Good".to_string(), Utc::now())
            .unwrap();
        let err = market
            .record_rating(buyer(), token(), 5, "Changed my mind".to_string(), Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::AlreadyRated {
                rater: buyer(),
                token: token(),
            }
        );
        // First rating is immutable.
        let page = market.ratings_page(token(), 0, 10);
        assert_eq!(page.stars, vec![4]);
        assert_eq!(page.reviews, vec!["Good".to_string()]);
    }

    #[test]
    fn aggregate_tracks_log_exactly() {
        let mut market = Market::new();
        let raters = [[0x01u8; 32], [0x02; 32], [0x03; 32]];
        for (bytes, stars) in raters.iter().zip([5u8, 3, 4]) {
            let rater = AccountId::from_bytes(*bytes);
            market.record_purchase(rater, token(), Utc::now()).unwrap();
            market
                .record_rating(rater, token(), stars, String::new(), Utc::now())
                .unwrap();
        }
        assert_eq!(market.rating_count(token()), 3);
        assert_eq!(market.aggregate(token()), RatingAggregate { sum: 12, count: 3 });
        // floor((5 + 3 + 4) * 10 / 3) = 40
        assert_eq!(market.average_rating(token()), 40);
    }

    #[test]
    fn average_is_zero_when_unrated() {
        let market = Market::new();
        assert_eq!(market.average_rating(token()), 0);
        assert_eq!(market.rating_count(token()), 0);
    }

    #[test]
    fn ratings_page_is_chronological_and_clamped() {
        let mut market = Market::new();
        for (i, stars) in [5u8, 3, 4].into_iter().enumerate() {
            let rater = AccountId::from_bytes([i as u8 + 1; 32]);
            market.record_purchase(rater, token(), Utc::now()).unwrap();
            market
                .record_rating(rater, token(), stars, format!("review {i}"), Utc::now())
                .unwrap();
        }

        // Offset 1 over 3 stored ratings returns entries 2 and 3 in order.
        let page = market.ratings_page(token(), 1, 10);
        assert_eq!(page.stars, vec![3, 4]);
        assert_eq!(page.reviews, vec!["review 1".to_string(), "review 2".to_string()]);

        // Out-of-range offset returns empty sequences without failing.
        let page = market.ratings_page(token(), 5, 10);
        assert!(page.is_empty());

        // Unknown token likewise.
        let page = market.ratings_page(TokenId(9), 0, 10);
        assert!(page.is_empty());
    }
}
