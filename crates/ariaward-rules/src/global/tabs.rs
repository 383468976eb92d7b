//! Tab list wiring.

use tracing::debug;

use ariaward_core::RuleResult;
use ariaward_dom::{Document, EventType, NodeId};

use super::has_token;
use crate::flags;
use crate::interaction::{Interaction, TabList};
use crate::rule::{EnhancementRule, RuleContext, RuleScope};

const TABLIST_TOKENS: &[&str] = &["tabs", "nav-tabs", "tab-list", "tablist", "tabs-nav"];

const SELECTED_CLASSES: &[&str] = &["active", "selected", "is-active", "current"];

/// Wires `tablist`/`tab`/`tabpanel` roles, selection state and arrow-key
/// navigation onto tab widgets.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabListRule;

/// A tab list found in the document, before any writes.
#[derive(Debug)]
struct TabWidget {
    container: NodeId,
    /// `li` wrappers that should be presentational.
    wrappers: Vec<NodeId>,
    tabs: Vec<NodeId>,
    panels: Vec<Option<NodeId>>,
    selected: usize,
}

fn is_tablist(doc: &Document, node: NodeId) -> bool {
    !doc.has_attribute(node, flags::TABS)
        && (doc.attribute(node, "role") == Some("tablist") || has_token(doc, node, TABLIST_TOKENS))
}

fn panel_for(doc: &Document, tab: NodeId) -> Option<NodeId> {
    ["aria-controls", "data-target", "data-bs-target", "href"]
        .iter()
        .filter_map(|name| doc.attribute(tab, name))
        .map(|value| value.trim().trim_start_matches('#'))
        .find_map(|id| doc.element_by_id(id))
        .filter(|panel| *panel != tab)
}

fn is_selected(doc: &Document, node: NodeId) -> bool {
    doc.attribute(node, "aria-selected") == Some("true")
        || doc.class_list(node).iter().any(|c| SELECTED_CLASSES.contains(c))
}

fn discover(doc: &Document, container: NodeId) -> Option<TabWidget> {
    let mut wrappers = Vec::new();
    let mut tabs = Vec::new();
    let mut selected = None;
    for child in doc.element_children(container) {
        let tab = if doc.is_tag(child, "li") {
            let inner = doc
                .element_children(child)
                .into_iter()
                .find(|n| doc.is_tag(*n, "a") || doc.is_tag(*n, "button"));
            match inner {
                Some(inner) => {
                    wrappers.push(child);
                    inner
                }
                None => child,
            }
        } else {
            child
        };
        if selected.is_none() && (is_selected(doc, tab) || is_selected(doc, child)) {
            selected = Some(tabs.len());
        }
        tabs.push(tab);
    }
    if tabs.len() < 2 {
        return None;
    }
    let panels = tabs.iter().map(|tab| panel_for(doc, *tab)).collect();
    Some(TabWidget {
        container,
        wrappers,
        tabs,
        panels,
        selected: selected.unwrap_or(0),
    })
}

impl EnhancementRule for TabListRule {
    fn name(&self) -> &'static str {
        "tabs"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Global
    }

    fn apply(&self, ctx: &mut RuleContext<'_>, root: NodeId) -> RuleResult<()> {
        let widgets: Vec<TabWidget> = {
            let doc = ctx.doc();
            doc.elements_within(root)
                .into_iter()
                .filter(|n| is_tablist(doc, *n))
                .filter_map(|n| discover(doc, n))
                .collect()
        };

        for widget in widgets {
            debug!(container = %widget.container, tabs = widget.tabs.len(), "Wiring tab list");
            if ctx.doc().attribute(widget.container, "role") != Some("tablist") {
                ctx.writer.set_attribute(widget.container, "role", "tablist");
            }
            for wrapper in &widget.wrappers {
                ctx.writer.set_attribute(*wrapper, "role", "presentation");
            }
            for (tab, panel) in widget.tabs.iter().zip(&widget.panels) {
                ctx.writer.set_attribute(*tab, "role", "tab");
                let tab_id = flags::ensure_id(ctx, *tab, "tab");
                if let Some(panel) = panel {
                    let panel_id = flags::ensure_id(ctx, *panel, "panel");
                    ctx.writer.set_attribute(*tab, "aria-controls", &panel_id);
                    ctx.writer.set_attribute(*panel, "role", "tabpanel");
                    ctx.writer.set_attribute(*panel, "aria-labelledby", &tab_id);
                }
                ctx.writer.listen(*tab, EventType::Click);
                ctx.writer.listen(*tab, EventType::KeyDown);
            }

            let mut list = TabList::new(widget.tabs, widget.panels, widget.selected);
            list.select(&mut ctx.writer, list.selected(), false);
            ctx.register(widget.container, Interaction::Tabs(list));
            flags::mark(ctx, widget.container, flags::TABS);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::InteractionRegistry;
    use ariaward_core::{Ledger, TrackedWriter};
    use ariaward_dom::{DomEvent, ElementSpec, Key};

    fn fixture(doc: &mut Document) -> (NodeId, Vec<NodeId>, Vec<NodeId>) {
        let body = doc.body();
        let list = doc
            .append_spec(
                body,
                &ElementSpec::new("ul").class("nav-tabs").children(
                    [("home", ""), ("profile", "active"), ("contact", "")]
                        .iter()
                        .map(|(id, class)| {
                            ElementSpec::new("li").class(*class).child(
                                ElementSpec::new("a")
                                    .attr("href", format!("#{}", id))
                                    .text(*id),
                            )
                        }),
                ),
            )
            .unwrap();
        let tabs = doc
            .element_children(list)
            .into_iter()
            .map(|li| doc.element_children(li)[0])
            .collect();
        let panels = ["home", "profile", "contact"]
            .iter()
            .map(|id| doc.append_spec(body, &ElementSpec::new("div").id(*id)).unwrap())
            .collect();
        (list, tabs, panels)
    }

    #[test]
    fn test_tab_roles_and_initial_selection() {
        let mut doc = Document::new();
        let (list, tabs, panels) = fixture(&mut doc);
        let body = doc.body();

        let mut ledger = Ledger::new();
        let mut interactions = InteractionRegistry::new();
        {
            let mut ctx = RuleContext::new(TrackedWriter::new(&mut doc, &mut ledger), &mut interactions);
            TabListRule.apply(&mut ctx, body).unwrap();
        }
        assert_eq!(doc.attribute(list, "role"), Some("tablist"));
        let li = doc.parent(tabs[0]).unwrap();
        assert_eq!(doc.attribute(li, "role"), Some("presentation"));
        assert_eq!(doc.attribute(tabs[1], "role"), Some("tab"));
        assert_eq!(doc.attribute(tabs[1], "aria-selected"), Some("true"));
        assert_eq!(doc.attribute(tabs[0], "tabindex"), Some("-1"));
        assert_eq!(doc.attribute(tabs[1], "aria-controls"), Some("profile"));
        assert_eq!(doc.attribute(panels[1], "role"), Some("tabpanel"));
        assert!(doc.has_attribute(panels[0], "hidden"));
        assert!(!doc.has_attribute(panels[1], "hidden"));
        assert!(interactions.contains(list));

        let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
        assert!(interactions.dispatch(&mut writer, tabs[1], DomEvent::KeyDown(Key::ArrowRight)));
        assert_eq!(writer.doc().attribute(tabs[2], "aria-selected"), Some("true"));
        assert_eq!(writer.doc().focused(), Some(tabs[2]));
    }

    #[test]
    fn test_single_tab_ignored() {
        let mut doc = Document::new();
        let body = doc.body();
        let list = doc
            .append_spec(
                body,
                &ElementSpec::new("div")
                    .attr("role", "tablist")
                    .child(ElementSpec::new("button").text("Only")),
            )
            .unwrap();
        assert!(discover(&doc, list).is_none());
    }

    #[test]
    fn test_rollback_restores_tree() {
        let mut doc = Document::new();
        fixture(&mut doc);
        let before = doc.snapshot(doc.root());
        let body = doc.body();

        let mut ledger = Ledger::new();
        let mut interactions = InteractionRegistry::new();
        {
            let mut ctx = RuleContext::new(TrackedWriter::new(&mut doc, &mut ledger), &mut interactions);
            TabListRule.apply(&mut ctx, body).unwrap();
        }
        ledger.rollback_all(&mut doc);
        assert_eq!(doc.snapshot(doc.root()), before);
    }
}
