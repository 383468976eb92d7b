//! Engine state.

use serde::Serialize;

use ariaward_dom::NodeId;

/// Process-wide engine state, owned by the lifecycle controller and passed
/// explicitly to every component that reads or updates it.
///
/// Every field is meaningful only while `enabled` is true; disabling calls
/// [`EngineState::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineState {
    /// Whether enhancement is active.
    pub enabled: bool,

    /// Whether the mutation watcher is attached.
    pub watcher_active: bool,

    /// Injected stylesheet element.
    pub stylesheet: Option<NodeId>,

    /// Skip-to-content link.
    pub skip_link: Option<NodeId>,

    /// Announcement live region.
    pub live_region: Option<NodeId>,

    /// Item-like nodes observed since the pending global pass was scheduled.
    pub pending_item_count: u32,

    /// Whether a global pass is waiting for the next frame.
    pub scheduled_global_pass: bool,

    /// Observation batches since the last ledger garbage collection.
    pub mutation_counter: u32,
}

impl EngineState {
    /// Create a disabled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return to the initial disabled state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Take the accumulated item count, leaving zero behind.
    pub fn take_pending_items(&mut self) -> u32 {
        std::mem::take(&mut self.pending_item_count)
    }
}
