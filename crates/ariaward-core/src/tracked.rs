//! Tracked writes.
//!
//! Every write captures the original into the ledger first, then mutates
//! the document. Both happen inside one `&mut` borrow, so nothing can
//! observe a captured-but-unwritten key.

use tracing::debug;

use ariaward_dom::{Document, EventType, NodeId};

use crate::ledger::Ledger;
use crate::LISTENER_OWNER;

/// Write access to the document that records originals into a [`Ledger`].
pub struct TrackedWriter<'a> {
    doc: &'a mut Document,
    ledger: &'a mut Ledger,
    writes: u64,
}

impl<'a> TrackedWriter<'a> {
    /// Wrap a document and ledger.
    pub fn new(doc: &'a mut Document, ledger: &'a mut Ledger) -> Self {
        Self {
            doc,
            ledger,
            writes: 0,
        }
    }

    /// Read access to the document.
    pub fn doc(&self) -> &Document {
        &*self.doc
    }

    /// Read access to the ledger.
    pub fn ledger(&self) -> &Ledger {
        &*self.ledger
    }

    /// Number of document writes performed through this writer.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Set an attribute, capturing its original on first write.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        if !self.doc.is_element(node) {
            debug!(node = %node, attribute = name, "Skipping write to non-element");
            return false;
        }
        let current = self.doc.attribute(node, name).map(str::to_string);
        self.ledger.capture_attribute(node, name, current);
        match self.doc.set_attribute(node, name, value) {
            Ok(()) => {
                self.writes += 1;
                true
            }
            Err(e) => {
                debug!(node = %node, attribute = name, "Tracked write skipped: {}", e);
                false
            }
        }
    }

    /// Remove an attribute, capturing its original on first write.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> bool {
        if !self.doc.is_element(node) {
            return false;
        }
        let current = self.doc.attribute(node, name).map(str::to_string);
        self.ledger.capture_attribute(node, name, current);
        match self.doc.remove_attribute(node, name) {
            Ok(_) => {
                self.writes += 1;
                true
            }
            Err(e) => {
                debug!(node = %node, attribute = name, "Tracked removal skipped: {}", e);
                false
            }
        }
    }

    /// Set an inline style property, capturing its original on first write.
    pub fn set_style_property(&mut self, node: NodeId, property: &str, value: &str) -> bool {
        if !self.doc.is_element(node) {
            return false;
        }
        let current = self.doc.style_property(node, property).map(str::to_string);
        self.ledger.capture_style(node, property, current);
        match self.doc.set_style_property(node, property, value) {
            Ok(()) => {
                self.writes += 1;
                true
            }
            Err(e) => {
                debug!(node = %node, property, "Tracked style write skipped: {}", e);
                false
            }
        }
    }

    /// Register an engine-owned listener. Removed wholesale on disable.
    pub fn listen(&mut self, node: NodeId, event_type: EventType) -> bool {
        if self.doc.has_listener(node, event_type, LISTENER_OWNER) {
            return false;
        }
        self.doc
            .add_event_listener(node, event_type, LISTENER_OWNER)
            .is_ok()
    }

    /// Move focus. Focus is transient and not recorded.
    pub fn focus(&mut self, node: NodeId) -> bool {
        self.doc.focus(node)
    }
}
