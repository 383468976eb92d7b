//! Interaction state objects.
//!
//! One explicit state object per wired element. Handlers write through the
//! tracked writer, so toggled attributes and styles roll back like any
//! other enhancement.

use std::collections::HashMap;

use tracing::debug;

use ariaward_core::TrackedWriter;
use ariaward_dom::{Document, DomEvent, Key, NodeId};

#[cfg(test)]
#[path = "interaction_tests.rs"]
mod tests;

/// Disclosure state for a dropdown toggle and its panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownToggle {
    toggle: NodeId,
    panel: NodeId,
    open_display: String,
    expanded: bool,
}

impl DropdownToggle {
    pub fn new(toggle: NodeId, panel: NodeId, open_display: impl Into<String>, expanded: bool) -> Self {
        Self {
            toggle,
            panel,
            open_display: open_display.into(),
            expanded,
        }
    }

    /// Capture the panel's current visibility and display value.
    pub fn from_panel(doc: &Document, toggle: NodeId, panel: NodeId) -> Self {
        let open_display = doc
            .style_property(panel, "display")
            .filter(|display| *display != "none")
            .unwrap_or("block")
            .to_string();
        Self {
            toggle,
            panel,
            open_display,
            expanded: !doc.is_hidden(panel),
        }
    }

    pub fn toggle(&self) -> NodeId {
        self.toggle
    }

    pub fn panel(&self) -> NodeId {
        self.panel
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Display value applied when the panel opens.
    pub fn open_display(&self) -> &str {
        &self.open_display
    }

    /// Write the current state without changing the panel's display.
    pub fn sync(&self, writer: &mut TrackedWriter<'_>) {
        if self.expanded {
            writer.set_attribute(self.toggle, "aria-expanded", "true");
        } else {
            writer.set_attribute(self.toggle, "aria-expanded", "false");
            writer.set_attribute(self.panel, "hidden", "");
        }
    }

    pub fn open(&mut self, writer: &mut TrackedWriter<'_>) {
        writer.set_attribute(self.toggle, "aria-expanded", "true");
        writer.remove_attribute(self.panel, "hidden");
        writer.set_style_property(self.panel, "display", &self.open_display);
        self.expanded = true;
    }

    pub fn close(&mut self, writer: &mut TrackedWriter<'_>) {
        writer.set_attribute(self.toggle, "aria-expanded", "false");
        writer.set_attribute(self.panel, "hidden", "");
        writer.set_style_property(self.panel, "display", "none");
        self.expanded = false;
    }

    fn handle(&mut self, writer: &mut TrackedWriter<'_>, event: DomEvent) -> bool {
        match event {
            DomEvent::Click | DomEvent::KeyDown(Key::Enter) | DomEvent::KeyDown(Key::Space) => {
                if self.expanded {
                    self.close(writer);
                } else {
                    self.open(writer);
                }
                true
            }
            DomEvent::KeyDown(Key::Escape) if self.expanded => {
                self.close(writer);
                writer.focus(self.toggle);
                true
            }
            _ => false,
        }
    }
}

/// Roving selection over a tab list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabList {
    tabs: Vec<NodeId>,
    panels: Vec<Option<NodeId>>,
    selected: usize,
}

impl TabList {
    /// Create a tab list. `panels[i]` belongs to `tabs[i]`.
    pub fn new(tabs: Vec<NodeId>, mut panels: Vec<Option<NodeId>>, selected: usize) -> Self {
        panels.resize(tabs.len(), None);
        let selected = selected.min(tabs.len().saturating_sub(1));
        Self {
            tabs,
            panels,
            selected,
        }
    }

    pub fn tabs(&self) -> &[NodeId] {
        &self.tabs
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select tab `index`, optionally moving focus to it.
    pub fn select(&mut self, writer: &mut TrackedWriter<'_>, index: usize, focus: bool) {
        if index >= self.tabs.len() {
            return;
        }
        for (i, tab) in self.tabs.iter().enumerate() {
            let active = i == index;
            writer.set_attribute(*tab, "aria-selected", if active { "true" } else { "false" });
            writer.set_attribute(*tab, "tabindex", if active { "0" } else { "-1" });
            if let Some(panel) = self.panels[i] {
                if active {
                    writer.remove_attribute(panel, "hidden");
                } else {
                    writer.set_attribute(panel, "hidden", "");
                }
            }
        }
        self.selected = index;
        if focus {
            writer.focus(self.tabs[index]);
        }
    }

    fn handle(&mut self, writer: &mut TrackedWriter<'_>, target: NodeId, event: DomEvent) -> bool {
        let Some(index) = self
            .tabs
            .iter()
            .position(|tab| writer.doc().is_inclusive_ancestor(*tab, target))
        else {
            return false;
        };
        let last = self.tabs.len() - 1;
        let next = match event {
            DomEvent::Click => {
                self.select(writer, index, false);
                return true;
            }
            DomEvent::KeyDown(Key::ArrowRight) => {
                if index == last {
                    0
                } else {
                    index + 1
                }
            }
            DomEvent::KeyDown(Key::ArrowLeft) => {
                if index == 0 {
                    last
                } else {
                    index - 1
                }
            }
            DomEvent::KeyDown(Key::Home) => 0,
            DomEvent::KeyDown(Key::End) => last,
            _ => return false,
        };
        self.select(writer, next, true);
        true
    }
}

/// Keeps Tab / Shift+Tab focus inside a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTrap {
    dialog: NodeId,
}

impl FocusTrap {
    pub fn new(dialog: NodeId) -> Self {
        Self { dialog }
    }

    pub fn dialog(&self) -> NodeId {
        self.dialog
    }

    fn handle(&mut self, writer: &mut TrackedWriter<'_>, event: DomEvent) -> bool {
        let forward = match event {
            DomEvent::KeyDown(Key::Tab) => true,
            DomEvent::KeyDown(Key::ShiftTab) => false,
            _ => return false,
        };

        let doc = writer.doc();
        if doc.is_hidden(self.dialog) {
            return false;
        }
        let focusables: Vec<NodeId> = doc
            .descendants(self.dialog)
            .into_iter()
            .filter(|n| doc.is_tabbable(*n))
            .collect();
        let (Some(&first), Some(&last)) = (focusables.first(), focusables.last()) else {
            writer.focus(self.dialog);
            return true;
        };

        let inside = doc
            .focused()
            .filter(|f| doc.is_inclusive_ancestor(self.dialog, *f));
        let wrap_to = match (forward, inside) {
            (true, Some(current)) if current == last => Some(first),
            (false, Some(current)) if current == first => Some(last),
            (true, None) => Some(first),
            (false, None) => Some(last),
            _ => None,
        };

        match wrap_to {
            Some(target) => {
                writer.focus(target);
                true
            }
            None => false,
        }
    }
}

/// Interaction state registered by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Dropdown(DropdownToggle),
    Tabs(TabList),
    FocusTrap(FocusTrap),
}

impl Interaction {
    fn handle(&mut self, writer: &mut TrackedWriter<'_>, target: NodeId, event: DomEvent) -> bool {
        match self {
            Interaction::Dropdown(dropdown) => dropdown.handle(writer, event),
            Interaction::Tabs(tabs) => tabs.handle(writer, target, event),
            Interaction::FocusTrap(trap) => trap.handle(writer, event),
        }
    }
}

/// Interaction state keyed by the element it was wired on.
#[derive(Debug, Default)]
pub struct InteractionRegistry {
    entries: HashMap<NodeId, Interaction>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register state for `node`. Returns false if `node` already has state.
    pub fn register(&mut self, node: NodeId, interaction: Interaction) -> bool {
        if self.entries.contains_key(&node) {
            return false;
        }
        self.entries.insert(node, interaction);
        true
    }

    pub fn get(&self, node: NodeId) -> Option<&Interaction> {
        self.entries.get(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop state for elements that left the document.
    pub fn retain_connected(&mut self, doc: &Document) -> usize {
        let before = self.entries.len();
        self.entries.retain(|node, _| doc.is_connected(*node));
        before - self.entries.len()
    }

    /// Route an event from `target` up through its ancestors until some
    /// interaction handles it.
    pub fn dispatch(
        &mut self,
        writer: &mut TrackedWriter<'_>,
        target: NodeId,
        event: DomEvent,
    ) -> bool {
        let mut current = Some(target);
        while let Some(node) = current {
            if let Some(interaction) = self.entries.get_mut(&node) {
                if interaction.handle(writer, target, event) {
                    debug!(node = %node, ?event, "Interaction handled event");
                    return true;
                }
            }
            current = writer.doc().parent(node);
        }
        false
    }
}
