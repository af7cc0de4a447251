//! promptgrid-ledger: the deterministic registry-and-marketplace state machine.
//!
//! This crate owns all mutable state:
//!
//! - [`Registry`]: token lifecycle, listing-fee schedule, id counter,
//!   metadata pointers and their verification key
//! - [`Market`]: purchase records, append-only rating logs, O(1) rating
//!   aggregates
//! - [`Ledger`]: the single operation surface combining both, plus proceeds
//!   accounting and [`LedgerEvent`] emission
//!
//! Every operation runs to completion as one unit of work: validation first,
//! infallible writes second. A failed call has no effect at all, which is the
//! property the error taxonomy in [`error`] is built around. Callers needing
//! retry resubmit; nothing retries internally.

pub mod error;
pub mod events;
pub mod ledger;
pub mod market;
pub mod registry;

pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use events::LedgerEvent;
pub use ledger::{Ledger, LedgerConfig};
pub use market::Market;
pub use registry::Registry;

// Re-export the domain vocabulary for downstream crates.
pub use promptgrid_core;
