//! # ariaward Core
//!
//! The reversible-mutation engine shared by every other ariaward crate.
//!
//! ## Components
//!
//! - [`Ledger`] - per-node record of original attribute and style values
//! - [`TrackedWriter`] - the only sanctioned way to mutate the document;
//!   captures originals into the ledger before the first write to a key
//! - [`EngineState`] - the single explicit state value threaded through the
//!   dispatcher, scheduler and watcher
//! - [`RuleError`] - failures a rule may report; always skipped, never fatal

pub mod error;
pub mod ledger;
pub mod state;
pub mod tracked;

pub use error::{RuleError, RuleResult};
pub use ledger::{Ledger, LedgerEntry, OriginalValue, RollbackReport};
pub use state::EngineState;
pub use tracked::TrackedWriter;

/// Owner tag for listeners registered by the engine.
pub const LISTENER_OWNER: &str = "ariaward";
