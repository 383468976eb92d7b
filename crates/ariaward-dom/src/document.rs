//! The document arena.

use tracing::trace;

use crate::error::{DomError, DomResult};
use crate::event::{EventType, Listener};
use crate::node::{ElementData, Node, NodeId, NodeKind};
use crate::observer::{MutationRecord, ObserverId, Registration};
use crate::snapshot::{ElementSpec, NodeSnapshot};

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;

/// Tags that take keyboard focus without a `tabindex`.
const NATIVELY_FOCUSABLE: &[&str] = &["button", "select", "textarea", "input", "summary"];

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A live document tree.
///
/// Nodes live in slots addressed by [`NodeId`]. Removing a node from the
/// tree only detaches it; [`Document::destroy`] frees its slots, which
/// invalidates every outstanding handle to the subtree.
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    observers: Vec<Registration>,
    next_observer: u64,
    listeners: Vec<Listener>,
    focused: Option<NodeId>,
}

impl Document {
    /// Create an empty `html > (head, body)` document.
    pub fn new() -> Self {
        let placeholder = NodeId {
            index: 0,
            generation: 0,
        };
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: placeholder,
            head: placeholder,
            body: placeholder,
            observers: Vec::new(),
            next_observer: 1,
            listeners: Vec::new(),
            focused: None,
        };

        let root = doc.alloc(Node::new(NodeKind::Document));
        let html = doc.create_element("html");
        let head = doc.create_element("head");
        let body = doc.create_element("body");
        doc.link(root, html);
        doc.link(html, head);
        doc.link(html, body);

        doc.root = root;
        doc.head = head;
        doc.body = body;
        doc
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The `head` element.
    pub fn head(&self) -> NodeId {
        self.head
    }

    /// The `body` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    // ========================================================================
    // Slots
    // ========================================================================

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn release(&mut self, id: NodeId) {
        if let Some(slot) = self.slots.get_mut(id.index as usize) {
            if slot.generation == id.generation && slot.node.is_some() {
                slot.node = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
            }
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        let node = self.node_mut(id).ok_or(DomError::StaleNode(id))?;
        node.element_mut().ok_or(DomError::NotAnElement(id))
    }

    /// Raw link used while constructing detached or initial structure.
    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Whether the handle still refers to a live slot.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes (attached or not).
    pub fn live_node_count(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    // ========================================================================
    // Creation and tree structure
    // ========================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::new(NodeKind::Element(ElementData::new(tag))))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(Node::new(NodeKind::Text(text.to_string())))
    }

    /// Node payload.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    /// Element payload, if `id` is a live element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).and_then(|n| n.element())
    }

    /// Whether `id` is a live element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Lowercase tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag())
    }

    /// Whether `id` is an element with the given tag.
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id) == Some(tag)
    }

    /// Parent node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Child nodes (empty for stale handles).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Element children only.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether the node is part of the document tree.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_inclusive_ancestor(self.root, id)
    }

    /// Ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            result.push(parent);
            current = self.parent(parent);
        }
        result
    }

    /// Nearest inclusive ancestor satisfying `predicate`.
    pub fn closest<F>(&self, id: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        let mut current = Some(id);
        while let Some(node) = current {
            if predicate(self, node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Descendants of `root` in tree order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            result.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        result
    }

    /// `root` followed by its descendants.
    pub fn inclusive_descendants(&self, root: NodeId) -> Vec<NodeId> {
        if !self.contains(root) {
            return Vec::new();
        }
        let mut result = vec![root];
        result.extend(self.descendants(root));
        result
    }

    /// Elements in the subtree rooted at `root`, including `root` itself.
    pub fn elements_within(&self, root: NodeId) -> Vec<NodeId> {
        self.inclusive_descendants(root)
            .into_iter()
            .filter(|id| self.is_element(*id))
            .collect()
    }

    /// First connected element whose `id` attribute equals `value`.
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        if value.is_empty() {
            return None;
        }
        self.descendants(self.root)
            .into_iter()
            .find(|id| self.attribute(*id, "id") == Some(value))
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent).ok_or(DomError::StaleNode(parent))?;
        let child_node = self.node(child).ok_or(DomError::StaleNode(child))?;
        let leaf = matches!(parent_node.kind, NodeKind::Text(_));
        let root = matches!(child_node.kind, NodeKind::Document);
        if leaf || root || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    /// Append `child` to `parent`, moving it if already attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or at the end when `None` or not a child).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        self.check_insert(parent, child)?;
        self.detach_internal(child);

        let position =
            reference.and_then(|r| self.children(parent).iter().position(|c| *c == r));
        if let Some(node) = self.node_mut(parent) {
            match position {
                Some(index) => node.children.insert(index, child),
                None => node.children.push(child),
            }
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        self.record(parent, MutationRecord::added(parent, child));
        Ok(())
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let first = self.children(parent).first().copied();
        self.insert_before(parent, child, first)
    }

    /// Detach a node from its parent. The node stays alive.
    pub fn remove(&mut self, id: NodeId) -> DomResult<()> {
        if !self.contains(id) {
            return Err(DomError::StaleNode(id));
        }
        self.detach_internal(id);
        Ok(())
    }

    fn detach_internal(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
        self.record(parent, MutationRecord::removed(parent, child));
    }

    /// Detach a subtree and free its slots. Outstanding handles go stale.
    pub fn destroy(&mut self, id: NodeId) {
        if !self.contains(id) || id == self.root {
            return;
        }
        self.detach_internal(id);
        let subtree = self.inclusive_descendants(id);
        self.listeners.retain(|l| !subtree.contains(&l.node));
        if self.focused.is_some_and(|f| subtree.contains(&f)) {
            self.focused = None;
        }
        for node in subtree {
            self.release(node);
        }
        trace!(node = %id, "Destroyed subtree");
    }

    // ========================================================================
    // Attributes, classes and style
    // ========================================================================

    /// Attribute value, `None` when absent or not an element.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attribute(name))
    }

    /// Whether the attribute is present.
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set an attribute.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(id)?.set_attribute(name, value);
        Ok(())
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        Ok(self.element_mut(id)?.remove_attribute(name))
    }

    /// Attribute names in insertion order.
    pub fn attribute_names(&self, id: NodeId) -> Vec<String> {
        self.element(id)
            .map(|e| e.attributes().map(|(n, _)| n.to_string()).collect())
            .unwrap_or_default()
    }

    /// Whitespace-separated `class` tokens.
    pub fn class_list(&self, id: NodeId) -> Vec<&str> {
        self.attribute(id, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Whether the `class` attribute contains `class` as a token.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.class_list(id).iter().any(|c| *c == class)
    }

    /// Inline style property value.
    pub fn style_property(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.style().get(property))
    }

    /// Set an inline style property. An empty value removes the property.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) -> DomResult<()> {
        self.element_mut(id)?.style.set(property, value);
        Ok(())
    }

    /// Remove an inline style property, returning its previous value.
    pub fn remove_style_property(&mut self, id: NodeId, property: &str) -> DomResult<Option<String>> {
        Ok(self.element_mut(id)?.style.remove(property))
    }

    /// Whether the node or an ancestor is hidden (`hidden` or `display: none`).
    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.closest(id, |doc, n| {
            doc.has_attribute(n, "hidden") || doc.style_property(n, "display") == Some("none")
        })
        .is_some()
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Concatenated text of the subtree.
    pub fn text_content(&self, id: NodeId) -> String {
        self.inclusive_descendants(id)
            .into_iter()
            .filter_map(|n| match self.kind(n) {
                Some(NodeKind::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all children with a single text node (none for empty text).
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        self.element_mut(id)?;

        let removed: Vec<NodeId> = self
            .node_mut(id)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();
        for child in &removed {
            if let Some(node) = self.node_mut(*child) {
                node.parent = None;
            }
        }

        let mut added = Vec::new();
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.link(id, text_node);
            added.push(text_node);
        }

        if !removed.is_empty() || !added.is_empty() {
            self.record(
                id,
                MutationRecord {
                    target: id,
                    added_nodes: added,
                    removed_nodes: removed,
                },
            );
        }
        Ok(())
    }

    // ========================================================================
    // Focus
    // ========================================================================

    /// Move focus to a connected element.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if self.is_connected(id) && self.is_element(id) {
            self.focused = Some(id);
            true
        } else {
            false
        }
    }

    /// Currently focused element.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|id| self.is_connected(*id))
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Whether the element participates in sequential keyboard navigation.
    pub fn is_tabbable(&self, id: NodeId) -> bool {
        let Some(tag) = self.tag_name(id) else {
            return false;
        };
        if self.has_attribute(id, "disabled") || self.is_hidden(id) {
            return false;
        }
        if let Some(index) = self.attribute(id, "tabindex") {
            return index.trim().parse::<i32>().map(|i| i >= 0).unwrap_or(false);
        }
        match tag {
            "a" => self.has_attribute(id, "href"),
            "input" => self.attribute(id, "type") != Some("hidden"),
            _ => NATIVELY_FOCUSABLE.contains(&tag),
        }
    }

    // ========================================================================
    // Event listeners
    // ========================================================================

    /// Register a listener on `node`.
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: EventType,
        owner: &str,
    ) -> DomResult<()> {
        if !self.is_element(node) {
            return Err(DomError::NotAnElement(node));
        }
        self.listeners.push(Listener {
            node,
            event_type,
            owner: owner.to_string(),
        });
        Ok(())
    }

    /// Number of listeners of a type on `node`.
    pub fn listener_count(&self, node: NodeId, event_type: EventType) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.node == node && l.event_type == event_type)
            .count()
    }

    /// Whether `owner` listens for `event_type` on `node`.
    pub fn has_listener(&self, node: NodeId, event_type: EventType, owner: &str) -> bool {
        self.listeners
            .iter()
            .any(|l| l.node == node && l.event_type == event_type && l.owner == owner)
    }

    /// Remove every listener registered by `owner`.
    pub fn remove_listeners_by_owner(&mut self, owner: &str) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.owner != owner);
        before - self.listeners.len()
    }

    // ========================================================================
    // Mutation observers
    // ========================================================================

    /// Observe child-list changes in the subtree rooted at `target`.
    pub fn observe(&mut self, target: NodeId) -> DomResult<ObserverId> {
        if !self.contains(target) {
            return Err(DomError::StaleNode(target));
        }
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push(Registration {
            id,
            target,
            queue: Vec::new(),
        });
        Ok(id)
    }

    /// Stop observing. Undelivered records are dropped.
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|r| r.id != id);
        before != self.observers.len()
    }

    /// Deliver and clear the queued records of an observer.
    pub fn take_records(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| std::mem::take(&mut r.queue))
            .unwrap_or_default()
    }

    /// Number of undelivered records for an observer.
    pub fn pending_records(&self, id: ObserverId) -> usize {
        self.observers
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.queue.len())
            .unwrap_or(0)
    }

    /// Number of attached observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn record(&mut self, parent: NodeId, record: MutationRecord) {
        let matching: Vec<usize> = self
            .observers
            .iter()
            .enumerate()
            .filter(|(_, r)| self.is_inclusive_ancestor(r.target, parent))
            .map(|(i, _)| i)
            .collect();
        for index in matching {
            self.observers[index].queue.push(record.clone());
        }
    }

    // ========================================================================
    // Specs and snapshots
    // ========================================================================

    /// Build `spec` as a detached subtree and append it to `parent` in one insertion.
    pub fn append_spec(&mut self, parent: NodeId, spec: &ElementSpec) -> DomResult<NodeId> {
        let node = self.build_spec(spec)?;
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Build `spec` as a detached subtree.
    pub fn build_spec(&mut self, spec: &ElementSpec) -> DomResult<NodeId> {
        let node = self.create_element(&spec.tag);
        for (name, value) in &spec.attributes {
            self.set_attribute(node, name, value)?;
        }
        for (property, value) in &spec.style {
            self.set_style_property(node, property, value)?;
        }
        if let Some(text) = spec.text.as_deref().filter(|t| !t.is_empty()) {
            let text_node = self.create_text(text);
            self.link(node, text_node);
        }
        for child in &spec.children {
            let child_node = self.build_spec(child)?;
            self.link(node, child_node);
        }
        Ok(node)
    }

    /// Capture the subtree rooted at `id`.
    pub fn snapshot(&self, id: NodeId) -> Option<NodeSnapshot> {
        match self.kind(id)? {
            NodeKind::Text(text) => Some(NodeSnapshot::Text { text: text.clone() }),
            NodeKind::Document => Some(NodeSnapshot::Element {
                tag: "#document".to_string(),
                attributes: Default::default(),
                style: Default::default(),
                children: self.child_snapshots(id),
            }),
            NodeKind::Element(data) => Some(NodeSnapshot::Element {
                tag: data.tag().to_string(),
                attributes: data
                    .attributes()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect(),
                style: data
                    .style()
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect(),
                children: self.child_snapshots(id),
            }),
        }
    }

    fn child_snapshots(&self, id: NodeId) -> Vec<NodeSnapshot> {
        self.children(id)
            .iter()
            .filter_map(|c| self.snapshot(*c))
            .collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
