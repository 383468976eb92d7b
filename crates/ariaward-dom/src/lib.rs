//! # ariaward DOM
//!
//! In-process model of the live document that ariaward augments.
//!
//! The engine never owns the document it works on. This crate gives it a
//! host tree with the properties the engine relies on:
//!
//! - **Generation-checked handles**: [`NodeId`] is an index plus a
//!   generation. Freed slots bump the generation, so a handle held by the
//!   ledger never keeps a node alive and goes stale instead of dangling.
//! - **Connectivity**: [`Document::is_connected`] mirrors `isConnected`.
//! - **Child-list observation**: [`Document::observe`] registers a
//!   subtree-wide observer whose [`MutationRecord`]s are queued until
//!   [`Document::take_records`] delivers them.
//! - **Listeners and focus**: a small registry of who listens to what, and
//!   a single focused node.
//!
//! Element trees can be described with [`ElementSpec`] (serde-friendly) and
//! captured with [`NodeSnapshot`] for comparison and output.

mod document;
mod error;
mod event;
mod node;
mod observer;
mod snapshot;

pub use document::Document;
pub use error::{DomError, DomResult};
pub use event::{DomEvent, EventType, Key, Listener};
pub use node::{ElementData, InlineStyle, NodeId, NodeKind};
pub use observer::{MutationRecord, ObserverId};
pub use snapshot::{ElementSpec, NodeSnapshot};
