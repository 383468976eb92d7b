//! Mutation watcher.
//!
//! Observes child-list changes under the body, turns each delivered batch of
//! records into enhancement roots plus an item count, and signals when the
//! ledger is due for garbage collection.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use ariaward_core::EngineState;
use ariaward_dom::{Document, MutationRecord, NodeId, ObserverId};
use ariaward_rules::flags;
use ariaward_rules::ItemClassifier;

/// Observation batches between ledger garbage collections.
pub const DEFAULT_GC_THRESHOLD: u32 = 80;

/// What one batch of mutation records asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationBatch {
    /// Connected element roots to enhance, outermost only, in record order.
    pub roots: Vec<NodeId>,
    /// Item-like nodes among the insertions.
    pub item_count: u32,
    /// Whether this batch crossed the garbage collection threshold.
    pub gc_due: bool,
    /// Records in the batch.
    pub records: usize,
}

/// `inactive` / `active` observer over the document body.
#[derive(Debug)]
pub struct MutationWatcher {
    observer: Option<ObserverId>,
    classifier: ItemClassifier,
    gc_threshold: u32,
}

impl MutationWatcher {
    pub fn new(classifier: ItemClassifier, gc_threshold: u32) -> Self {
        Self {
            observer: None,
            classifier,
            gc_threshold: gc_threshold.max(1),
        }
    }

    pub fn is_active(&self) -> bool {
        self.observer.is_some()
    }

    pub fn gc_threshold(&self) -> u32 {
        self.gc_threshold
    }

    pub fn classifier(&self) -> &ItemClassifier {
        &self.classifier
    }

    /// Attach a subtree observer to the body. No-op while active.
    pub fn activate(&mut self, doc: &mut Document, state: &mut EngineState) -> bool {
        if self.observer.is_some() {
            return false;
        }
        match doc.observe(doc.body()) {
            Ok(id) => {
                info!(observer = ?id, "Mutation watcher active");
                self.observer = Some(id);
                state.watcher_active = true;
                true
            }
            Err(e) => {
                warn!("Failed to observe document body: {}", e);
                false
            }
        }
    }

    /// Detach and drop the observer. No-op while inactive.
    pub fn deactivate(&mut self, doc: &mut Document, state: &mut EngineState) -> bool {
        let Some(id) = self.observer.take() else {
            return false;
        };
        doc.disconnect(id);
        state.watcher_active = false;
        info!(observer = ?id, "Mutation watcher inactive");
        true
    }

    /// Records queued for delivery.
    pub fn has_pending(&self, doc: &Document) -> bool {
        self.observer
            .is_some_and(|id| doc.pending_records(id) > 0)
    }

    /// Deliver queued records as one batch.
    ///
    /// Returns `None` when inactive or when nothing was recorded.
    pub fn collect(&self, doc: &mut Document, state: &mut EngineState) -> Option<ObservationBatch> {
        let id = self.observer?;
        let records = doc.take_records(id);
        if records.is_empty() {
            return None;
        }
        Some(self.classify(doc, state, &records))
    }

    /// Turn a batch of records into roots and an item count, and advance the
    /// garbage collection counter.
    pub fn classify(
        &self,
        doc: &Document,
        state: &mut EngineState,
        records: &[MutationRecord],
    ) -> ObservationBatch {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut added: Vec<NodeId> = Vec::new();
        for node in records.iter().flat_map(|r| r.added_nodes.iter().copied()) {
            if !doc.is_element(node) || !doc.is_connected(node) {
                continue;
            }
            if doc.has_attribute(node, flags::OWNED) {
                continue;
            }
            if seen.insert(node) {
                added.push(node);
            }
        }

        // A local pass covers descendants, so nested roots are redundant.
        let roots: Vec<NodeId> = added
            .into_iter()
            .filter(|n| !has_ancestor_in(doc, *n, &seen))
            .collect();

        let item_count: u32 = roots
            .iter()
            .map(|root| self.classifier.count_items(doc, *root))
            .sum();

        state.mutation_counter += 1;
        let gc_due = state.mutation_counter >= self.gc_threshold;
        if gc_due {
            state.mutation_counter = 0;
        }

        debug!(
            records = records.len(),
            roots = roots.len(),
            item_count,
            gc_due,
            "Classified mutation batch"
        );
        ObservationBatch {
            roots,
            item_count,
            gc_due,
            records: records.len(),
        }
    }
}

/// Whether a strict ancestor of `node` is in `set`.
fn has_ancestor_in(doc: &Document, node: NodeId, set: &HashSet<NodeId>) -> bool {
    let mut current = doc.parent(node);
    while let Some(parent) = current {
        if set.contains(&parent) {
            return true;
        }
        current = doc.parent(parent);
    }
    false
}

impl Default for MutationWatcher {
    fn default() -> Self {
        Self::new(ItemClassifier::default(), DEFAULT_GC_THRESHOLD)
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
