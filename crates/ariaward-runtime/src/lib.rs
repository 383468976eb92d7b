//! # ariaward Runtime
//!
//! Wires the ledger, rules and scheduling into a running engine.
//!
//! - [`Dispatcher`] - runs local rules on a subtree root and global rules on
//!   the whole document, and emits the batched announcement
//! - [`Announcer`] - the live region and its delayed text writes
//! - [`singletons`] - stylesheet, skip link and live region management
//! - [`Engine`] - the lifecycle controller: `enable`, `disable`, `tick`
//!
//! The engine never owns the document. Every call borrows it mutably for the
//! duration of one callback turn, which keeps each tracked write atomic.

pub mod announcer;
pub mod dispatcher;
pub mod engine;
pub mod singletons;

pub use announcer::Announcer;
pub use dispatcher::{Dispatcher, PassReport, PassScope};
pub use engine::{Engine, EngineOptions, LifecycleState, TickReport};
pub use ariaward_runloop::MetricsSnapshot;
