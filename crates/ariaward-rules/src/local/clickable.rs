//! Button semantics for click-only elements.

use tracing::debug;

use ariaward_core::RuleResult;
use ariaward_dom::{Document, NodeId};

use crate::flags;
use crate::rule::{EnhancementRule, RuleContext, RuleScope};

/// Tags that are already interactive and must not be given a role.
const INTERACTIVE_TAGS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "option", "label", "summary", "details",
];

const CLICKABLE_CLASS_HINTS: &[&str] = &["clickable", "btn", "button"];

/// Gives `role="button"` and `tabindex="0"` to non-interactive elements that
/// carry click intent (`onclick`, a clickable class, or `cursor: pointer`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickableRule;

/// Reasons an element looks clickable. Empty when it does not.
pub(crate) fn click_intent(doc: &Document, node: NodeId) -> Vec<&'static str> {
    let mut reasons = Vec::new();
    if doc.has_attribute(node, "onclick") {
        reasons.push("onclick");
    }
    if doc.class_list(node).iter().any(|class| {
        let class = class.to_ascii_lowercase();
        CLICKABLE_CLASS_HINTS
            .iter()
            .any(|hint| class == *hint || class.starts_with(&format!("{}-", hint)))
    }) {
        reasons.push("class");
    }
    if doc.style_property(node, "cursor") == Some("pointer") {
        reasons.push("cursor_pointer");
    }
    reasons
}

impl ClickableRule {
    fn is_candidate(doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag_name(node) else {
            return false;
        };
        !INTERACTIVE_TAGS.contains(&tag)
            && !doc.has_attribute(node, "role")
            && !doc.has_attribute(node, flags::CLICKABLE)
            && !click_intent(doc, node).is_empty()
    }
}

impl EnhancementRule for ClickableRule {
    fn name(&self) -> &'static str {
        "clickable"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Local
    }

    fn apply(&self, ctx: &mut RuleContext<'_>, root: NodeId) -> RuleResult<()> {
        let targets: Vec<NodeId> = {
            let doc = ctx.doc();
            doc.elements_within(root)
                .into_iter()
                .filter(|n| Self::is_candidate(doc, *n))
                .collect()
        };

        for node in targets {
            debug!(node = %node, reasons = ?click_intent(ctx.doc(), node), "Marking clickable element");
            ctx.writer.set_attribute(node, "role", "button");
            if !ctx.doc().has_attribute(node, "tabindex") {
                ctx.writer.set_attribute(node, "tabindex", "0");
            }
            flags::mark(ctx, node, flags::CLICKABLE);
        }
        Ok(())
    }
}
