//! Sticky header de-duplication.

use std::collections::HashMap;

use tracing::debug;

use ariaward_core::RuleResult;
use ariaward_dom::{Document, NodeId};

use super::name_tokens;
use crate::flags;
use crate::rule::{EnhancementRule, RuleContext, RuleScope};

const STICKY_TOKENS: &[&str] = &["sticky", "is-sticky", "sticky-top", "fixed-top", "sticky-header"];

/// Hides cloned sticky copies of a page header from assistive technology.
///
/// Sites often render the header twice: once in flow and once as a fixed or
/// sticky clone. Headers with identical text are grouped; within a group that
/// contains a sticky copy, every element except the first non-sticky one gets
/// `aria-hidden="true"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StickyHeaderRule;

fn is_header_like(doc: &Document, node: NodeId) -> bool {
    doc.is_tag(node, "header")
        || doc.attribute(node, "role") == Some("banner")
        || name_tokens(doc, node)
            .iter()
            .any(|t| t.contains("header") || t == "navbar")
}

fn is_sticky(doc: &Document, node: NodeId) -> bool {
    matches!(doc.style_property(node, "position"), Some("fixed") | Some("sticky"))
        || name_tokens(doc, node)
            .iter()
            .any(|t| STICKY_TOKENS.contains(&t.as_str()))
}

fn normalized_text(doc: &Document, node: NodeId) -> String {
    doc.text_content(node)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Duplicates to hide, in tree order.
fn duplicates(doc: &Document, root: NodeId) -> Vec<NodeId> {
    let headers: Vec<NodeId> = doc
        .elements_within(root)
        .into_iter()
        .filter(|n| is_header_like(doc, *n))
        .filter(|n| !doc.has_attribute(*n, flags::STICKY))
        .filter(|n| doc.attribute(*n, "aria-hidden") != Some("true"))
        .collect();

    // Nested header-like elements belong to their outermost header.
    let outermost: Vec<NodeId> = headers
        .iter()
        .copied()
        .filter(|n| {
            !headers
                .iter()
                .any(|other| other != n && doc.is_inclusive_ancestor(*other, *n))
        })
        .collect();

    let mut groups: HashMap<String, Vec<NodeId>> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for node in outermost {
        let text = normalized_text(doc, node);
        if text.is_empty() {
            continue;
        }
        if !groups.contains_key(&text) {
            order.push(text.clone());
        }
        groups.entry(text).or_default().push(node);
    }

    let mut hidden = Vec::new();
    for text in order {
        let Some(group) = groups.get(&text) else {
            continue;
        };
        if group.len() < 2 || !group.iter().any(|n| is_sticky(doc, *n)) {
            continue;
        }
        let keep = group
            .iter()
            .copied()
            .find(|n| !is_sticky(doc, *n))
            .unwrap_or(group[0]);
        hidden.extend(group.iter().copied().filter(|n| *n != keep));
    }
    hidden
}

impl EnhancementRule for StickyHeaderRule {
    fn name(&self) -> &'static str {
        "sticky_headers"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Global
    }

    fn apply(&self, ctx: &mut RuleContext<'_>, root: NodeId) -> RuleResult<()> {
        for node in duplicates(ctx.doc(), root) {
            debug!(node = %node, "Hiding duplicate sticky header");
            ctx.writer.set_attribute(node, "aria-hidden", "true");
            flags::mark(ctx, node, flags::STICKY);
        }
        Ok(())
    }
}
