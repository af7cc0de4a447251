//! Core data types for the PromptGrid registry and marketplace.
//!
//! The registry mints `PromptToken` records keyed by a monotonic `TokenId`;
//! the marketplace records purchases and ratings against those tokens. All
//! monetary values are `Wei` (smallest currency unit, fixed-width integer) and
//! all identities are 32-byte `AccountId`s serialized as hex.
//!
//! All types derive `Debug`, `Clone`, `Serialize`, and `Deserialize` for
//! inspection, copying, and JSON serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a minted prompt token.
///
/// Token ids are assigned by the registry counter, starting at zero and
/// strictly increasing. An id is assigned exactly once and never reused,
/// even after the token is deactivated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct TokenId(pub u64);

impl TokenId {
    /// Creates a TokenId from a raw counter value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TokenId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Identity of a caller: creator, buyer, rater, owner, or treasury.
///
/// A 32-byte opaque identifier, serialized as a 64-character lowercase hex
/// string. The core never derives these; they arrive from the caller's
/// authentication layer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// Creates an AccountId from a 32-byte array.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the inner bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The all-zero account, useful as a placeholder in tests and dev mode.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = AccountIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 64 {
            return Err(AccountIdParseError::InvalidLength(s.len()));
        }
        let decoded = hex::decode(s).map_err(|_| AccountIdParseError::InvalidHex)?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

/// Error type for parsing AccountId from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountIdParseError {
    /// The hex string had an invalid length (expected 64 characters).
    InvalidLength(usize),
    /// The string contained invalid hex characters.
    InvalidHex,
}

impl fmt::Display for AccountIdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => {
                write!(
                    f,
                    "invalid AccountId length: expected 64 hex chars, got {}",
                    len
                )
            }
            Self::InvalidHex => write!(f, "invalid hex character in AccountId"),
        }
    }
}

impl std::error::Error for AccountIdParseError {}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Key gating retrieval of a token's metadata pointer.
///
/// A caller must present the matching key to `data_for_token_id`; any other
/// key yields nothing. Serialized as 64-character lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerificationKey(pub [u8; 32]);

impl VerificationKey {
    /// Creates a VerificationKey from a 32-byte array.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the inner bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The all-zero key.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerificationKey({})", self)
    }
}

impl fmt::Display for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for VerificationKey {
    type Err = AccountIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 64 {
            return Err(AccountIdParseError::InvalidLength(s.len()));
        }
        let decoded = hex::decode(s).map_err(|_| AccountIdParseError::InvalidHex)?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl Serialize for VerificationKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VerificationKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Monetary Value
// ============================================================================

/// An amount in the smallest currency unit.
///
/// All fee, price, and proceeds arithmetic goes through the `checked_*`
/// helpers; the ledger treats overflow as a hard error, never as wraparound.
/// Never a float: rounding drift in monetary arithmetic is an invariant
/// violation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Wei(pub u128);

impl Wei {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates a Wei amount from a raw integer.
    #[must_use]
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Converts thousandths of the whole unit (10^15 wei) into Wei.
    /// The default listing fees are all expressible at this granularity.
    #[must_use]
    pub const fn from_milliether(milli: u128) -> Self {
        Self(milli * 1_000_000_000_000_000)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn as_u128(&self) -> u128 {
        self.0
    }

    /// Checked addition; `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Checked subtraction; `None` on underflow.
    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Whether this amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Wei {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

// ============================================================================
// Prompt Kind
// ============================================================================

/// The closed set of prompt kinds.
///
/// The listing-fee schedule is total over this set. Wire code values (1..=4)
/// match the integer constants used by existing off-chain callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    Text,
    Image,
    Audio,
    Video,
}

impl PromptKind {
    /// Every kind, in wire-code order.
    pub const ALL: [Self; 4] = [Self::Text, Self::Image, Self::Audio, Self::Video];

    /// The integer wire code for this kind.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Text => 1,
            Self::Image => 2,
            Self::Audio => 3,
            Self::Video => 4,
        }
    }

    /// Maps an integer wire code back into the closed set.
    ///
    /// Returns `None` for anything outside 1..=4; the ledger turns that into
    /// an invalid-input error rather than ever storing a raw integer.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Text),
            2 => Some(Self::Image),
            3 => Some(Self::Audio),
            4 => Some(Self::Video),
            _ => None,
        }
    }

    /// Lowercase name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptKind {
    type Err = UnknownPromptKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "audio" => Ok(Self::Audio),
            "video" => Ok(Self::Video),
            other => Err(UnknownPromptKind(other.to_string())),
        }
    }
}

/// Error type for parsing PromptKind from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPromptKind(pub String);

impl fmt::Display for UnknownPromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown prompt kind {:?}, expected text, image, audio, or video",
            self.0
        )
    }
}

impl std::error::Error for UnknownPromptKind {}

// ============================================================================
// Core Domain Types
// ============================================================================

/// A minted prompt record and its sale terms.
///
/// Created exactly once by its creator (who pays the listing fee for its
/// kind). The only mutable field is `active`, and its only transition is
/// true -> false. Tokens are never deleted; a deactivated token remains
/// readable forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptToken {
    /// Unique, monotonically assigned identifier.
    pub id: TokenId,

    /// Which of the closed kind set this prompt belongs to.
    pub kind: PromptKind,

    /// The prompt body itself.
    pub content: String,

    /// Display name / category shown in listings.
    pub name: String,

    /// Purchase price in wei. Zero is a legitimate price.
    pub price: Wei,

    /// The account that minted this token.
    pub creator: AccountId,

    /// Opaque pointer to the off-chain metadata document. The core stores
    /// and returns it; it never fetches or interprets it.
    pub metadata: String,

    /// Key a caller must present to retrieve the metadata pointer.
    pub verification_key: VerificationKey,

    /// Whether the token can still be purchased.
    pub active: bool,

    /// When the token was minted.
    pub created: DateTime<Utc>,
}

/// One rating of one token by one buyer.
///
/// Append-only: once recorded, a rating is never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Stars in 1..=5.
    pub stars: u8,

    /// Free-text review.
    pub review: String,

    /// Who rated. At most one rating per (rater, token).
    pub rater: AccountId,

    /// When the rating was recorded.
    pub timestamp: DateTime<Utc>,
}

/// A page of ratings as four aligned sequences.
///
/// This shape mirrors the external operation surface: existing callers
/// consume parallel arrays of stars, reviews, raters, and timestamps in
/// chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingPage {
    pub stars: Vec<u8>,
    pub reviews: Vec<String>,
    pub raters: Vec<AccountId>,
    pub timestamps: Vec<DateTime<Utc>>,
}

impl RatingPage {
    /// Number of ratings in the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    /// Whether the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Appends one rating to all four sequences.
    pub fn push(&mut self, rating: &Rating) {
        self.stars.push(rating.stars);
        self.reviews.push(rating.review.clone());
        self.raters.push(rating.rater);
        self.timestamps.push(rating.timestamp);
    }
}

/// Incrementally maintained (sum, count) pair for one token's ratings.
///
/// Always reflects the token's rating log exactly; the marketplace updates
/// it in the same atomic operation that appends the rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingAggregate {
    /// Running sum of star values.
    pub sum: u64,

    /// Number of ratings recorded.
    pub count: u64,
}

impl RatingAggregate {
    /// Empty aggregate.
    #[must_use]
    pub const fn zero() -> Self {
        Self { sum: 0, count: 0 }
    }

    /// Average scaled by 10 with truncating integer division.
    ///
    /// Zero when unrated. Ratings of [5, 3, 4] yield 40, i.e. 4.0 stars. The
    /// truncation is load-bearing: callers reverse the scaling and expect
    /// this exact rounding. The scaling saturates rather than wrapping so the
    /// arithmetic stays checked even for absurd sums.
    #[must_use]
    pub const fn average_x10(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            self.sum.saturating_mul(10) / self.count
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
