//! Dropdown toggle wiring.

use tracing::debug;

use ariaward_core::{RuleError, RuleResult};
use ariaward_dom::{Document, EventType, NodeId};

use crate::flags;
use crate::interaction::{DropdownToggle, Interaction};
use crate::rule::{EnhancementRule, RuleContext, RuleScope};

/// Attributes that may point from a toggle to its panel, in lookup order.
const TARGET_ATTRIBUTES: &[&str] = &["aria-controls", "data-target", "data-bs-target", "href"];

const PANEL_CLASS_HINTS: &[&str] = &["dropdown-menu", "dropdown-content", "submenu"];

const OPEN_CLASSES: &[&str] = &["show", "open", "is-open", "active"];

/// Wires disclosure semantics and keyboard handling onto dropdown toggles.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropdownRule;

fn is_toggle(doc: &Document, node: NodeId) -> bool {
    if doc.has_attribute(node, flags::DROPDOWN) {
        return false;
    }
    let data_toggle = ["data-toggle", "data-bs-toggle"]
        .iter()
        .any(|name| doc.attribute(node, name) == Some("dropdown"));
    data_toggle
        || doc
            .class_list(node)
            .iter()
            .any(|class| class.eq_ignore_ascii_case("dropdown-toggle"))
}

fn is_panel_like(doc: &Document, node: NodeId) -> bool {
    doc.class_list(node).iter().any(|class| {
        let class = class.to_ascii_lowercase();
        PANEL_CLASS_HINTS.iter().any(|hint| class == *hint)
    })
}

/// Find the panel a toggle controls.
pub(crate) fn resolve_panel(doc: &Document, toggle: NodeId) -> Option<NodeId> {
    for name in TARGET_ATTRIBUTES {
        let Some(value) = doc.attribute(toggle, name).map(str::trim) else {
            continue;
        };
        let id = match *name {
            "aria-controls" => Some(value),
            _ => value.strip_prefix('#'),
        };
        if let Some(panel) = id.and_then(|id| doc.element_by_id(id)) {
            if panel != toggle {
                return Some(panel);
            }
        }
    }

    // Bootstrap-style markup: the menu is a later sibling of the toggle.
    let parent = doc.parent(toggle)?;
    let siblings = doc.element_children(parent);
    let position = siblings.iter().position(|s| *s == toggle)?;
    siblings[position + 1..]
        .iter()
        .copied()
        .find(|s| is_panel_like(doc, *s))
}

fn starts_expanded(doc: &Document, toggle: NodeId, panel: NodeId) -> bool {
    if doc.is_hidden(panel) {
        return false;
    }
    doc.attribute(toggle, "aria-expanded") == Some("true")
        || doc.style_property(panel, "display").is_some()
        || doc
            .class_list(panel)
            .iter()
            .any(|class| OPEN_CLASSES.contains(class))
}

impl EnhancementRule for DropdownRule {
    fn name(&self) -> &'static str {
        "dropdowns"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Local
    }

    fn apply(&self, ctx: &mut RuleContext<'_>, root: NodeId) -> RuleResult<()> {
        let toggles: Vec<NodeId> = {
            let doc = ctx.doc();
            doc.elements_within(root)
                .into_iter()
                .filter(|n| is_toggle(doc, *n))
                .collect()
        };

        let mut missing = None;
        for toggle in toggles {
            let Some(panel) = resolve_panel(ctx.doc(), toggle) else {
                debug!(node = %toggle, "Dropdown toggle has no panel");
                missing.get_or_insert(toggle);
                continue;
            };

            let state = {
                let doc = ctx.doc();
                let base = DropdownToggle::from_panel(doc, toggle, panel);
                let expanded = starts_expanded(doc, toggle, panel);
                DropdownToggle::new(toggle, panel, base.open_display(), expanded)
            };

            let panel_id = flags::ensure_id(ctx, panel, "menu");
            if !ctx.doc().is_tag(toggle, "button") && !ctx.doc().has_attribute(toggle, "role") {
                ctx.writer.set_attribute(toggle, "role", "button");
            }
            if !ctx.doc().is_tabbable(toggle) {
                ctx.writer.set_attribute(toggle, "tabindex", "0");
            }
            ctx.writer.set_attribute(toggle, "aria-controls", &panel_id);
            ctx.writer.set_attribute(toggle, "aria-haspopup", "true");
            state.sync(&mut ctx.writer);

            ctx.writer.listen(toggle, EventType::Click);
            ctx.writer.listen(toggle, EventType::KeyDown);
            ctx.register(toggle, Interaction::Dropdown(state));
            flags::mark(ctx, toggle, flags::DROPDOWN);
            debug!(toggle = %toggle, panel = %panel, "Wired dropdown");
        }

        match missing {
            Some(toggle) => Err(RuleError::MissingTarget(format!(
                "dropdown panel for {}",
                toggle
            ))),
            None => Ok(()),
        }
    }
}
