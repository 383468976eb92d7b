//! Dialog semantics and focus traps.

use tracing::debug;

use ariaward_core::RuleResult;
use ariaward_dom::{Document, EventType, NodeId};

use super::has_token;
use crate::flags;
use crate::interaction::{FocusTrap, Interaction};
use crate::rule::{EnhancementRule, RuleContext, RuleScope};

const DIALOG_TOKENS: &[&str] = &["modal", "dialog", "popup", "lightbox", "overlay-dialog"];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Marks modal containers as dialogs, names them from their first heading,
/// and traps Tab focus inside them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogRule;

fn is_dialog(doc: &Document, node: NodeId) -> bool {
    if doc.has_attribute(node, flags::DIALOG) {
        return false;
    }
    doc.is_tag(node, "dialog")
        || matches!(doc.attribute(node, "role"), Some("dialog") | Some("alertdialog"))
        || (!doc.has_attribute(node, "role") && has_token(doc, node, DIALOG_TOKENS))
}

fn title_of(doc: &Document, dialog: NodeId) -> Option<NodeId> {
    doc.descendants(dialog).into_iter().find(|n| {
        doc.tag_name(*n).is_some_and(|t| HEADINGS.contains(&t))
            || has_token(doc, *n, &["modal-title", "dialog-title"])
    })
}

impl EnhancementRule for DialogRule {
    fn name(&self) -> &'static str {
        "dialogs"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Global
    }

    fn apply(&self, ctx: &mut RuleContext<'_>, root: NodeId) -> RuleResult<()> {
        let dialogs: Vec<NodeId> = {
            let doc = ctx.doc();
            doc.elements_within(root)
                .into_iter()
                .filter(|n| is_dialog(doc, *n))
                .collect()
        };

        for dialog in dialogs {
            if !ctx.doc().is_tag(dialog, "dialog") && !ctx.doc().has_attribute(dialog, "role") {
                ctx.writer.set_attribute(dialog, "role", "dialog");
            }
            if !ctx.doc().has_attribute(dialog, "aria-modal") {
                ctx.writer.set_attribute(dialog, "aria-modal", "true");
            }
            let named = ctx.doc().has_attribute(dialog, "aria-label")
                || ctx.doc().has_attribute(dialog, "aria-labelledby");
            if !named {
                if let Some(title) = title_of(ctx.doc(), dialog) {
                    let id = flags::ensure_id(ctx, title, "dialog-title");
                    ctx.writer.set_attribute(dialog, "aria-labelledby", &id);
                }
            }
            if !ctx.doc().has_attribute(dialog, "tabindex") {
                ctx.writer.set_attribute(dialog, "tabindex", "-1");
            }

            ctx.writer.listen(dialog, EventType::KeyDown);
            ctx.register(dialog, Interaction::FocusTrap(FocusTrap::new(dialog)));
            flags::mark(ctx, dialog, flags::DIALOG);
            debug!(node = %dialog, "Wired dialog");
        }
        Ok(())
    }
}
