//! promptgrid-core: domain types for the PromptGrid registry and marketplace.
//!
//! This crate defines the vocabulary shared by the ledger state machine, the
//! HTTP server, and the CLI:
//!
//! - Identity and value newtypes (`AccountId`, `TokenId`, `Wei`)
//! - The closed prompt kind set (`PromptKind`)
//! - The minted record itself (`PromptToken`) and its verification key
//! - Rating records, pages, and the fixed-point rating aggregate
//! - Typed models for the off-chain metadata document
//!
//! All wire-facing types derive `Serialize`/`Deserialize`; 32-byte identities
//! serialize as 64-character lowercase hex strings.
//!
//! No state lives here. The ledger crate owns every map and counter; this
//! crate only describes what flows between components.

pub mod metadata;
pub mod types;

pub use metadata::{MetadataAttribute, MetadataImage, PromptMetadata};
pub use types::{
    AccountId, AccountIdParseError, PromptKind, PromptToken, Rating, RatingAggregate, RatingPage,
    TokenId, UnknownPromptKind, VerificationKey, Wei,
};
