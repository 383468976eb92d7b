//! The enhancement rule interface.

use serde::{Deserialize, Serialize};

use ariaward_core::{RuleResult, TrackedWriter};
use ariaward_dom::{Document, NodeId};

use crate::interaction::{Interaction, InteractionRegistry};

/// When a rule runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// On every subtree the watcher reports, and over the body on enable.
    Local,
    /// Over the whole document, coalesced to at most once per frame.
    Global,
}

/// Everything a rule may touch while it runs.
pub struct RuleContext<'a> {
    /// Tracked write access to the document.
    pub writer: TrackedWriter<'a>,
    /// Per-element interaction state.
    pub interactions: &'a mut InteractionRegistry,
}

impl<'a> RuleContext<'a> {
    /// Create a context.
    pub fn new(writer: TrackedWriter<'a>, interactions: &'a mut InteractionRegistry) -> Self {
        Self {
            writer,
            interactions,
        }
    }

    /// Read access to the document.
    pub fn doc(&self) -> &Document {
        self.writer.doc()
    }

    /// Register interaction state for `node`. Returns false if one exists.
    pub fn register(&mut self, node: NodeId, interaction: Interaction) -> bool {
        self.interactions.register(node, interaction)
    }
}

/// An idempotent enhancement heuristic.
///
/// Implementations must only mutate the document through the context's
/// writer, and must skip nodes they already flagged.
pub trait EnhancementRule: Send + Sync {
    /// Stable rule name, used in configuration and logs.
    fn name(&self) -> &'static str;

    /// When this rule runs.
    fn scope(&self) -> RuleScope;

    /// Apply the rule to `root` and its matching descendants.
    fn apply(&self, ctx: &mut RuleContext<'_>, root: NodeId) -> RuleResult<()>;
}
