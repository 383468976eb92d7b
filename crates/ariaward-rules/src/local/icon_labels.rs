//! Labels for icon-only buttons and links.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use ariaward_core::RuleResult;
use ariaward_dom::{Document, NodeId};

use super::has_accessible_name;
use crate::flags;
use crate::rule::{EnhancementRule, RuleContext, RuleScope};

/// Icon keyword patterns, first match wins.
static ICON_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\b(close|dismiss|times|xmark|x-mark)\b", "Close"),
        (r"\b(menu|hamburger|burger|navbar-toggler)\b", "Menu"),
        (r"\b(search|magnify|magnifier)\b", "Search"),
        (r"\b(cart|basket|shopping-bag)\b", "Shopping cart"),
        (r"\b(account|user|profile|avatar)\b", "Account"),
        (r"\b(settings|gear|cog)\b", "Settings"),
        (r"\b(share)\b", "Share"),
        (r"\b(next|chevron-right|arrow-right|forward)\b", "Next"),
        (r"\b(prev|previous|chevron-left|arrow-left|back)\b", "Previous"),
        (r"\b(play)\b", "Play"),
        (r"\b(pause)\b", "Pause"),
        (r"\b(like|heart|favorite|favourite)\b", "Like"),
        (r"\b(delete|trash|bin)\b", "Delete"),
        (r"\b(edit|pencil)\b", "Edit"),
        (r"\b(more|ellipsis|kebab|dots)\b", "More options"),
        (r"\b(home)\b", "Home"),
        (r"\b(download)\b", "Download"),
        (r"\b(bell|notifications?)\b", "Notifications"),
    ]
    .into_iter()
    .filter_map(|(pattern, label)| match Regex::new(pattern) {
        Ok(regex) => Some((regex, label)),
        Err(e) => {
            debug!(pattern, "Invalid icon pattern: {}", e);
            None
        }
    })
    .collect()
});

const ICON_TAGS: &[&str] = &["i", "svg", "span", "img"];

/// Labels `button`, `a` and `role="button"` elements that have no text and
/// no ARIA name, using keywords found in their own or their icon's class,
/// id and title.
#[derive(Debug, Clone, Copy, Default)]
pub struct IconLabelRule;

impl IconLabelRule {
    fn is_candidate(doc: &Document, node: NodeId) -> bool {
        matches!(doc.tag_name(node), Some("button") | Some("a"))
            || doc.attribute(node, "role") == Some("button")
    }
}

/// Keyword text for `node`: class, id, title and data-icon of the node and
/// its icon descendants, lowercased with `_` folded to `-`.
fn icon_signature(doc: &Document, node: NodeId) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for element in doc.elements_within(node) {
        if element != node && !doc.tag_name(element).is_some_and(|t| ICON_TAGS.contains(&t)) {
            continue;
        }
        for name in ["class", "id", "data-icon", "title"] {
            if let Some(value) = doc.attribute(element, name) {
                parts.push(value);
            }
        }
    }
    parts.join(" ").to_lowercase().replace('_', "-")
}

/// Label the icon keywords of `node` map to, falling back to its `title`.
pub fn icon_label_for(doc: &Document, node: NodeId) -> Option<String> {
    let signature = icon_signature(doc, node);
    ICON_PATTERNS
        .iter()
        .find(|(regex, _)| regex.is_match(&signature))
        .map(|(_, label)| label.to_string())
        .or_else(|| {
            doc.attribute(node, "title")
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        })
}

impl EnhancementRule for IconLabelRule {
    fn name(&self) -> &'static str {
        "icon_labels"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Local
    }

    fn apply(&self, ctx: &mut RuleContext<'_>, root: NodeId) -> RuleResult<()> {
        let targets: Vec<(NodeId, String)> = {
            let doc = ctx.doc();
            doc.elements_within(root)
                .into_iter()
                .filter(|n| Self::is_candidate(doc, *n))
                .filter(|n| !doc.has_attribute(*n, flags::LABELED))
                .filter(|n| !has_accessible_name(doc, *n))
                .filter_map(|n| icon_label_for(doc, n).map(|label| (n, label)))
                .collect()
        };

        for (node, label) in targets {
            debug!(node = %node, label = %label, "Labeling icon control");
            ctx.writer.set_attribute(node, "aria-label", &label);
            let icons: Vec<NodeId> = ctx
                .doc()
                .descendants(node)
                .into_iter()
                .filter(|n| matches!(ctx.doc().tag_name(*n), Some("i") | Some("svg")))
                .filter(|n| !ctx.doc().has_attribute(*n, "aria-hidden"))
                .collect();
            for icon in icons {
                ctx.writer.set_attribute(icon, "aria-hidden", "true");
            }
            flags::mark(ctx, node, flags::LABELED);
        }
        Ok(())
    }
}
