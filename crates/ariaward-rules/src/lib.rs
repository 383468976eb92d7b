//! # ariaward Rules
//!
//! The pluggable heuristics that decide *what* to write. Every rule goes
//! through [`RuleContext`], which wraps a tracked writer, so everything a
//! rule changes is recorded in the ledger and can be rolled back.
//!
//! Rules come in two scopes:
//!
//! - **Local** rules act on a subtree root and are safe to run repeatedly:
//!   icon and close-button labels, clickable roles, form labels, dropdown
//!   wiring, slider roles.
//! - **Global** rules need whole-document context: landmarks, tab lists,
//!   dialog focus traps, sticky-header de-duplication, tab-index
//!   normalization.
//!
//! Every rule marks the nodes it enhanced with a private `data-ariaward-*`
//! flag and skips flagged nodes, so a second pass over an unchanged subtree
//! writes nothing.
//!
//! Rules that need to react to input register an explicit
//! [`Interaction`] state object per wired element instead of capturing
//! state in closures.

pub mod announce;
pub mod flags;
pub mod global;
pub mod interaction;
pub mod items;
pub mod local;
pub mod rule;
pub mod ruleset;

pub use announce::items_loaded_message;
pub use global::{skip_target, SKIP_TARGET_ID};
pub use interaction::{DropdownToggle, FocusTrap, Interaction, InteractionRegistry, TabList};
pub use items::ItemClassifier;
pub use rule::{EnhancementRule, RuleContext, RuleScope};
pub use ruleset::RuleSet;
