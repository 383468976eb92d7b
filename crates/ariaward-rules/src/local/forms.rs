//! Names for unlabeled form controls.

use tracing::debug;

use ariaward_core::RuleResult;
use ariaward_dom::{Document, NodeId};

use super::humanize;
use crate::flags;
use crate::rule::{EnhancementRule, RuleContext, RuleScope};

/// Input types that carry their own name or are not user-facing.
const SELF_NAMED_INPUTS: &[&str] = &["hidden", "submit", "button", "reset", "image"];

/// How a control ends up named.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LabelSource {
    /// An adjacent `<label>` without `for`, referenced by id.
    Sibling(NodeId),
    /// Literal text from placeholder, title or name.
    Text(String),
}

/// Names form controls that have no associated `<label>` and no ARIA name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormLabelRule;

fn is_form_control(doc: &Document, node: NodeId) -> bool {
    match doc.tag_name(node) {
        Some("select") | Some("textarea") => true,
        Some("input") => !doc
            .attribute(node, "type")
            .is_some_and(|t| SELF_NAMED_INPUTS.contains(&t.to_ascii_lowercase().as_str())),
        _ => false,
    }
}

fn is_labeled(doc: &Document, node: NodeId) -> bool {
    let non_empty = |name: &str| doc.attribute(node, name).is_some_and(|v| !v.trim().is_empty());
    if non_empty("aria-label") || non_empty("aria-labelledby") {
        return true;
    }
    if doc.ancestors(node).into_iter().any(|a| doc.is_tag(a, "label")) {
        return true;
    }
    match doc.attribute(node, "id").filter(|id| !id.is_empty()) {
        Some(id) => doc
            .descendants(doc.root())
            .into_iter()
            .any(|n| doc.is_tag(n, "label") && doc.attribute(n, "for") == Some(id)),
        None => false,
    }
}

fn label_source(doc: &Document, node: NodeId) -> Option<LabelSource> {
    if let Some(parent) = doc.parent(node) {
        let siblings = doc.element_children(parent);
        let position = siblings.iter().position(|s| *s == node)?;
        if let Some(&previous) = position.checked_sub(1).and_then(|i| siblings.get(i)) {
            if doc.is_tag(previous, "label")
                && !doc.has_attribute(previous, "for")
                && !doc.text_content(previous).trim().is_empty()
            {
                return Some(LabelSource::Sibling(previous));
            }
        }
    }

    for name in ["placeholder", "title"] {
        if let Some(text) = doc.attribute(node, name).map(str::trim).filter(|t| !t.is_empty()) {
            return Some(LabelSource::Text(text.to_string()));
        }
    }

    doc.attribute(node, "name")
        .map(humanize)
        .filter(|text| !text.is_empty())
        .map(LabelSource::Text)
}

impl EnhancementRule for FormLabelRule {
    fn name(&self) -> &'static str {
        "form_labels"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Local
    }

    fn apply(&self, ctx: &mut RuleContext<'_>, root: NodeId) -> RuleResult<()> {
        let targets: Vec<(NodeId, LabelSource)> = {
            let doc = ctx.doc();
            doc.elements_within(root)
                .into_iter()
                .filter(|n| is_form_control(doc, *n))
                .filter(|n| !doc.has_attribute(*n, flags::FORM))
                .filter(|n| !is_labeled(doc, *n))
                .filter_map(|n| label_source(doc, n).map(|source| (n, source)))
                .collect()
        };

        for (node, source) in targets {
            match source {
                LabelSource::Sibling(label) => {
                    let id = flags::ensure_id(ctx, label, "label");
                    debug!(node = %node, label = %id, "Associating sibling label");
                    ctx.writer.set_attribute(node, "aria-labelledby", &id);
                }
                LabelSource::Text(text) => {
                    debug!(node = %node, label = %text, "Naming form control");
                    ctx.writer.set_attribute(node, "aria-label", &text);
                }
            }
            flags::mark(ctx, node, flags::FORM);
        }
        Ok(())
    }
}
