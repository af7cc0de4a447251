//! The prompt-token registry.
//!
//! Owns the token map, the monotonic id counter, the type-tiered listing-fee
//! schedule, and the verification key gating metadata retrieval. A leaf
//! component: it knows nothing about purchases or ratings.
//!
//! Mint validation happens before any write, so a failed mint leaves the
//! registry untouched. The id counter only ever increases; ids are never
//! reused, even for deactivated tokens.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use promptgrid_core::{AccountId, PromptKind, PromptToken, TokenId, VerificationKey, Wei};

use crate::error::{LedgerError, LedgerResult};

/// Default listing fees, in wei, recovered from the production fee schedule:
/// text 0.005, image 0.008, audio 0.010, video 0.015 (whole-unit terms).
const DEFAULT_FEES: [(PromptKind, Wei); 4] = [
    (PromptKind::Text, Wei::from_milliether(5)),
    (PromptKind::Image, Wei::from_milliether(8)),
    (PromptKind::Audio, Wei::from_milliether(10)),
    (PromptKind::Video, Wei::from_milliether(15)),
];

/// Registry of minted prompt tokens and the fee schedule.
#[derive(Debug, Clone)]
pub struct Registry {
    /// The account allowed to change the fee schedule (and to deactivate any
    /// token).
    owner: AccountId,

    /// Key every minted token stores; callers must present it to read the
    /// metadata pointer.
    verification_key: VerificationKey,

    /// Minted tokens, ordered by id.
    tokens: BTreeMap<TokenId, PromptToken>,

    /// Next id to assign. Strictly increasing.
    next_id: u64,

    /// Fee required at mint, per kind. Total over the closed set.
    listing_fees: BTreeMap<PromptKind, Wei>,

    /// Tokens minted per creator.
    creator_counts: HashMap<AccountId, u64>,
}

impl Registry {
    /// Creates an empty registry with the default fee schedule.
    #[must_use]
    pub fn new(owner: AccountId, verification_key: VerificationKey) -> Self {
        Self {
            owner,
            verification_key,
            tokens: BTreeMap::new(),
            next_id: 0,
            listing_fees: DEFAULT_FEES.into_iter().collect(),
            creator_counts: HashMap::new(),
        }
    }

    /// The registry owner.
    #[must_use]
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// Mints a new token, returning its id.
    ///
    /// Requires `paid` to equal the listing fee for `kind` exactly and
    /// `content` to be non-empty. The token is stored active with the
    /// registry's verification key.
    #[allow(clippy::too_many_arguments)]
    pub fn mint(
        &mut self,
        creator: AccountId,
        kind: PromptKind,
        content: String,
        name: String,
        price: Wei,
        metadata: String,
        paid: Wei,
        now: DateTime<Utc>,
    ) -> LedgerResult<TokenId> {
        if content.is_empty() {
            return Err(LedgerError::EmptyField("content"));
        }
        let required = self.listing_fee(kind);
        if paid != required {
            return Err(LedgerError::ListingFeeMismatch {
                kind,
                required,
                paid,
            });
        }
        let id = TokenId(self.next_id);
        let next = self
            .next_id
            .checked_add(1)
            .ok_or(LedgerError::Overflow("advancing the token id counter"))?;
        let count = self
            .creator_counts
            .get(&creator)
            .copied()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(LedgerError::Overflow("counting creator prompts"))?;

        // All checks passed; writes below cannot fail.
        self.tokens.insert(
            id,
            PromptToken {
                id,
                kind,
                content,
                name,
                price,
                creator,
                metadata,
                verification_key: self.verification_key,
                active: true,
                created: now,
            },
        );
        self.next_id = next;
        self.creator_counts.insert(creator, count);

        tracing::info!(token_id = %id, creator = %creator, kind = %kind, price = %price, "minted prompt token");
        Ok(id)
    }

    /// Sets the listing fee for one kind. Owner only.
    pub fn update_listing_fee(
        &mut self,
        caller: AccountId,
        kind: PromptKind,
        fee: Wei,
    ) -> LedgerResult<()> {
        if caller != self.owner {
            return Err(LedgerError::Unauthorized {
                caller,
                operation: "update the listing fee",
            });
        }
        self.listing_fees.insert(kind, fee);
        tracing::info!(kind = %kind, fee = %fee, "listing fee updated");
        Ok(())
    }

    /// The fee currently required to mint a token of `kind`.
    #[must_use]
    pub fn listing_fee(&self, kind: PromptKind) -> Wei {
        // The schedule is seeded with every kind and entries are only ever
        // replaced, so the lookup is total.
        self.listing_fees.get(&kind).copied().unwrap_or(Wei::ZERO)
    }

    /// The full fee schedule in kind order.
    #[must_use]
    pub fn listing_fees(&self) -> Vec<(PromptKind, Wei)> {
        PromptKind::ALL
            .into_iter()
            .map(|kind| (kind, self.listing_fee(kind)))
            .collect()
    }

    /// Deactivates a token. Creator or registry owner only; terminal.
    pub fn deactivate(&mut self, caller: AccountId, id: TokenId) -> LedgerResult<()> {
        let token = self
            .tokens
            .get_mut(&id)
            .ok_or(LedgerError::TokenNotFound(id))?;
        if caller != token.creator && caller != self.owner {
            return Err(LedgerError::Unauthorized {
                caller,
                operation: "deactivate this prompt",
            });
        }
        if !token.active {
            return Err(LedgerError::PromptInactive(id));
        }
        token.active = false;
        tracing::info!(token_id = %id, by = %caller, "prompt deactivated");
        Ok(())
    }

    /// The stored fields of a token.
    ///
    /// Existence is explicit: a never-minted id is `TokenNotFound`, never a
    /// zero-valued record. A legitimately zero-priced active token and an
    /// unminted id are therefore impossible to confuse.
    pub fn details(&self, id: TokenId) -> LedgerResult<&PromptToken> {
        self.tokens.get(&id).ok_or(LedgerError::TokenNotFound(id))
    }

    /// Like [`Registry::details`] but also requires the token to be active.
    pub fn active_token(&self, id: TokenId) -> LedgerResult<&PromptToken> {
        let token = self.details(id)?;
        if !token.active {
            return Err(LedgerError::PromptInactive(id));
        }
        Ok(token)
    }

    /// The metadata pointer bytes, gated by the verification key.
    pub fn data_for_token_id(&self, id: TokenId, key: VerificationKey) -> LedgerResult<&[u8]> {
        let token = self.details(id)?;
        if key != token.verification_key {
            return Err(LedgerError::VerificationKeyMismatch(id));
        }
        Ok(token.metadata.as_bytes())
    }

    /// The next id to be minted.
    #[must_use]
    pub fn token_id_counter(&self) -> TokenId {
        TokenId(self.next_id)
    }

    /// A page of tokens in id order. Out-of-range offsets yield an empty
    /// page; `limit` clamps to what remains.
    #[must_use]
    pub fn prompts(&self, offset: usize, limit: usize) -> Vec<&PromptToken> {
        self.tokens.values().skip(offset).take(limit).collect()
    }

    /// How many tokens an account has minted.
    #[must_use]
    pub fn creator_prompt_count(&self, creator: AccountId) -> u64 {
        self.creator_counts.get(&creator).copied().unwrap_or(0)
    }

    /// Total number of minted tokens (active or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether nothing has been minted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> AccountId {
        AccountId::from_bytes([0xaa; 32])
    }

    fn creator() -> AccountId {
        AccountId::from_bytes([0x11; 32])
    }

    fn registry() -> Registry {
        Registry::new(owner(), VerificationKey::from_bytes([0x9a; 32]))
    }

    fn mint_text(reg: &mut Registry) -> TokenId {
        reg.mint(
            creator(),
            PromptKind::Text,
            "Create a futuristic cityscape".to_string(),
            "Image Generation".to_string(),
            Wei(100),
            "ipfs://QmExample".to_string(),
            reg.listing_fee(PromptKind::Text),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn default_fee_schedule_is_total() {
        let reg = registry();
        assert_eq!(reg.listing_fee(PromptKind::Text), Wei::from_milliether(5));
        assert_eq!(reg.listing_fee(PromptKind::Image), Wei::from_milliether(8));
        assert_eq!(reg.listing_fee(PromptKind::Audio), Wei::from_milliether(10));
        assert_eq!(reg.listing_fee(PromptKind::Video), Wei::from_milliether(15));
        assert_eq!(reg.listing_fees().len(), 4);
    }

    #[test]
    fn mint_assigns_sequential_ids() {
        let mut reg = registry();
        assert_eq!(reg.token_id_counter(), TokenId(0));
        let first = mint_text(&mut reg);
        let second = mint_text(&mut reg);
        assert_eq!(first, TokenId(0));
        assert_eq!(second, TokenId(1));
        assert_eq!(reg.token_id_counter(), TokenId(2));
        assert_eq!(reg.creator_prompt_count(creator()), 2);
    }

    #[test]
    fn mint_rejects_wrong_fee() {
        let mut reg = registry();
        let err = reg
            .mint(
                creator(),
                PromptKind::Text,
                "body".to_string(),
                "name".to_string(),
                Wei(100),
                String::new(),
                Wei(1),
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::ListingFeeMismatch { .. }));
        // Nothing written on failure.
        assert_eq!(reg.token_id_counter(), TokenId(0));
        assert!(reg.is_empty());
        assert_eq!(reg.creator_prompt_count(creator()), 0);
    }

    #[test]
    fn mint_rejects_overpayment() {
        let mut reg = registry();
        let fee = reg.listing_fee(PromptKind::Text);
        let overpaid = fee.checked_add(Wei(1)).unwrap();
        let err = reg
            .mint(
                creator(),
                PromptKind::Text,
                "body".to_string(),
                "name".to_string(),
                Wei(100),
                String::new(),
                overpaid,
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::ListingFeeMismatch { .. }));
    }

    #[test]
    fn mint_rejects_empty_content() {
        let mut reg = registry();
        let err = reg
            .mint(
                creator(),
                PromptKind::Text,
                String::new(),
                "name".to_string(),
                Wei(100),
                String::new(),
                reg.listing_fee(PromptKind::Text),
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(err, LedgerError::EmptyField("content"));
    }

    #[test]
    fn zero_fee_kind_requires_zero_payment() {
        let mut reg = registry();
        reg.update_listing_fee(owner(), PromptKind::Text, Wei::ZERO)
            .unwrap();
        let id = reg
            .mint(
                creator(),
                PromptKind::Text,
                "body".to_string(),
                "name".to_string(),
                Wei::ZERO,
                String::new(),
                Wei::ZERO,
                Utc::now(),
            )
            .unwrap();
        // Zero-priced, active token is distinguishable from a missing one.
        assert!(reg.details(id).is_ok());
        assert!(matches!(
            reg.details(TokenId(99)),
            Err(LedgerError::TokenNotFound(_))
        ));
    }

    #[test]
    fn update_listing_fee_is_owner_only() {
        let mut reg = registry();
        let err = reg
            .update_listing_fee(creator(), PromptKind::Text, Wei(1))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { .. }));
        assert_eq!(reg.listing_fee(PromptKind::Text), Wei::from_milliether(5));

        reg.update_listing_fee(owner(), PromptKind::Text, Wei(1))
            .unwrap();
        assert_eq!(reg.listing_fee(PromptKind::Text), Wei(1));
    }

    #[test]
    fn deactivate_is_one_way() {
        let mut reg = registry();
        let id = mint_text(&mut reg);

        reg.deactivate(creator(), id).unwrap();
        assert!(!reg.details(id).unwrap().active);
        assert!(matches!(
            reg.active_token(id),
            Err(LedgerError::PromptInactive(_))
        ));

        // Repeat deactivation conflicts; details stay readable.
        let err = reg.deactivate(creator(), id).unwrap_err();
        assert_eq!(err, LedgerError::PromptInactive(id));
        assert_eq!(reg.details(id).unwrap().id, id);
    }

    #[test]
    fn deactivate_allowed_for_owner_but_not_strangers() {
        let mut reg = registry();
        let id = mint_text(&mut reg);
        let stranger = AccountId::from_bytes([0x77; 32]);

        let err = reg.deactivate(stranger, id).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { .. }));
        assert!(reg.details(id).unwrap().active);

        reg.deactivate(owner(), id).unwrap();
        assert!(!reg.details(id).unwrap().active);
    }

    #[test]
    fn data_requires_matching_key() {
        let mut reg = registry();
        let id = mint_text(&mut reg);

        let data = reg
            .data_for_token_id(id, VerificationKey::from_bytes([0x9a; 32]))
            .unwrap();
        assert_eq!(data, b"ipfs://QmExample");

        let err = reg
            .data_for_token_id(id, VerificationKey::zero())
            .unwrap_err();
        assert_eq!(err, LedgerError::VerificationKeyMismatch(id));

        let err = reg
            .data_for_token_id(TokenId(42), VerificationKey::zero())
            .unwrap_err();
        assert_eq!(err, LedgerError::TokenNotFound(TokenId(42)));
    }

    #[test]
    fn prompt_paging_clamps() {
        let mut reg = registry();
        for _ in 0..3 {
            mint_text(&mut reg);
        }
        assert_eq!(reg.prompts(0, 10).len(), 3);
        assert_eq!(reg.prompts(1, 10).len(), 2);
        assert_eq!(reg.prompts(1, 1).len(), 1);
        assert!(reg.prompts(5, 10).is_empty());
    }
}
