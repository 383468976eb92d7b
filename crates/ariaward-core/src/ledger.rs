//! The change ledger.
//!
//! One entry per touched node, holding the value each attribute and inline
//! style property had before the engine first wrote it. Entries are keyed by
//! [`NodeId`], which is a weak handle: the ledger never keeps a node alive,
//! and a node that left the document is found by [`Ledger::garbage_collect`].

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use ariaward_dom::{Document, NodeId};

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;

/// Captured original value. `None` means the key was absent.
pub type OriginalValue = Option<String>;

/// Originals captured for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    attributes: BTreeMap<String, OriginalValue>,
    styles: BTreeMap<String, OriginalValue>,
}

impl LedgerEntry {
    /// Captured attributes.
    pub fn attributes(&self) -> &BTreeMap<String, OriginalValue> {
        &self.attributes
    }

    /// Captured inline style properties.
    pub fn styles(&self) -> &BTreeMap<String, OriginalValue> {
        &self.styles
    }

    /// Number of captured keys in both key spaces.
    pub fn key_count(&self) -> usize {
        self.attributes.len() + self.styles.len()
    }
}

/// Outcome of a full rollback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RollbackReport {
    /// Entries replayed onto live nodes (attached or detached).
    pub restored: usize,
    /// Entries whose node slot was already freed.
    pub skipped: usize,
}

/// Per-node record of original values.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: HashMap<NodeId, LedgerEntry>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no node has an entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total captured keys across all entries.
    pub fn tracked_key_count(&self) -> usize {
        self.entries.values().map(LedgerEntry::key_count).sum()
    }

    /// Entry for a node.
    pub fn entry(&self, node: NodeId) -> Option<&LedgerEntry> {
        self.entries.get(&node)
    }

    /// Whether a node has an entry.
    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    /// Nodes with an entry.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.entries.keys().copied().collect()
    }

    /// Captured original of an attribute, if the engine ever wrote it.
    pub fn original_attribute(&self, node: NodeId, name: &str) -> Option<&OriginalValue> {
        self.entries.get(&node).and_then(|e| e.attributes.get(name))
    }

    /// Captured original of a style property, if the engine ever wrote it.
    pub fn original_style(&self, node: NodeId, property: &str) -> Option<&OriginalValue> {
        self.entries.get(&node).and_then(|e| e.styles.get(property))
    }

    /// Record `current` as the original for `(node, name)` unless one exists.
    /// Returns whether a new capture was made.
    pub(crate) fn capture_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        current: OriginalValue,
    ) -> bool {
        let entry = self.entries.entry(node).or_default();
        capture(&mut entry.attributes, name, current)
    }

    /// Record `current` as the original for `(node, property)` unless one exists.
    pub(crate) fn capture_style(
        &mut self,
        node: NodeId,
        property: &str,
        current: OriginalValue,
    ) -> bool {
        let entry = self.entries.entry(node).or_default();
        capture(&mut entry.styles, property, current)
    }

    /// Restore every captured value, then clear the ledger.
    ///
    /// Detached nodes are written like attached ones. Nodes whose slot has
    /// been freed are skipped.
    pub fn rollback_all(&mut self, doc: &mut Document) -> RollbackReport {
        let mut report = RollbackReport::default();

        for (node, entry) in self.entries.drain() {
            if !doc.contains(node) {
                report.skipped += 1;
                continue;
            }

            for (name, original) in &entry.attributes {
                let result = match original {
                    Some(value) => doc.set_attribute(node, name, value),
                    None => doc.remove_attribute(node, name).map(|_| ()),
                };
                if let Err(e) = result {
                    debug!(node = %node, attribute = %name, "Rollback write skipped: {}", e);
                }
            }

            for (property, original) in &entry.styles {
                let result = match original {
                    Some(value) => doc.set_style_property(node, property, value),
                    None => doc.remove_style_property(node, property).map(|_| ()),
                };
                if let Err(e) = result {
                    debug!(node = %node, property = %property, "Rollback write skipped: {}", e);
                }
            }

            report.restored += 1;
        }

        debug!(
            restored = report.restored,
            skipped = report.skipped,
            "Ledger rolled back"
        );
        report
    }

    /// Drop entries for nodes no longer connected to the document.
    /// Returns the number of entries evicted.
    pub fn garbage_collect(&mut self, doc: &Document) -> usize {
        let before = self.entries.len();
        self.entries.retain(|node, _| doc.is_connected(*node));
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.entries.len(), "Ledger garbage collected");
        }
        evicted
    }
}

fn capture(map: &mut BTreeMap<String, OriginalValue>, key: &str, current: OriginalValue) -> bool {
    match map.entry(key.to_string()) {
        Entry::Occupied(_) => false,
        Entry::Vacant(slot) => {
            slot.insert(current);
            true
        }
    }
}
