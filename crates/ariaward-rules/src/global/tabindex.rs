//! Positive tab-index normalization.

use tracing::debug;

use ariaward_core::RuleResult;
use ariaward_dom::NodeId;

use crate::rule::{EnhancementRule, RuleContext, RuleScope};

/// Rewrites positive `tabindex` values to `0` so keyboard order follows
/// document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabIndexRule;

impl EnhancementRule for TabIndexRule {
    fn name(&self) -> &'static str {
        "tabindex"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Global
    }

    fn apply(&self, ctx: &mut RuleContext<'_>, root: NodeId) -> RuleResult<()> {
        let positive: Vec<NodeId> = {
            let doc = ctx.doc();
            doc.elements_within(root)
                .into_iter()
                .filter(|n| {
                    doc.attribute(*n, "tabindex")
                        .and_then(|v| v.trim().parse::<i32>().ok())
                        .is_some_and(|v| v > 0)
                })
                .collect()
        };

        if !positive.is_empty() {
            debug!(count = positive.len(), "Normalizing positive tabindex");
        }
        for node in positive {
            ctx.writer.set_attribute(node, "tabindex", "0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::InteractionRegistry;
    use ariaward_core::{Ledger, TrackedWriter};
    use ariaward_dom::{Document, ElementSpec};

    #[test]
    fn test_positive_tabindex_normalized_and_restored() {
        let mut doc = Document::new();
        let body = doc.body();
        let high = doc
            .append_spec(body, &ElementSpec::new("a").attr("href", "/").attr("tabindex", "3"))
            .unwrap();
        let negative = doc
            .append_spec(body, &ElementSpec::new("div").attr("tabindex", "-1"))
            .unwrap();

        let mut ledger = Ledger::new();
        let mut interactions = InteractionRegistry::new();
        {
            let mut ctx = RuleContext::new(TrackedWriter::new(&mut doc, &mut ledger), &mut interactions);
            TabIndexRule.apply(&mut ctx, body).unwrap();
        }
        assert_eq!(doc.attribute(high, "tabindex"), Some("0"));
        assert_eq!(doc.attribute(negative, "tabindex"), Some("-1"));

        ledger.rollback_all(&mut doc);
        assert_eq!(doc.attribute(high, "tabindex"), Some("3"));
    }
}
