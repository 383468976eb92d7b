//! Slider roles for custom range widgets.

use tracing::debug;

use ariaward_core::RuleResult;
use ariaward_dom::{Document, NodeId};

use crate::flags;
use crate::rule::{EnhancementRule, RuleContext, RuleScope};

const THUMB_CLASSES: &[&str] = &["slider-handle", "slider-thumb", "range-thumb", "range-handle"];

const VALUE_ATTRIBUTES: &[&str] = &["data-value", "data-min", "data-max"];

/// Gives `role="slider"` and value attributes to custom range widgets.
///
/// A widget qualifies when it has a thumb class, or a `slider` class plus
/// `data-value`, `data-min` or `data-max`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SliderRule;

fn is_slider(doc: &Document, node: NodeId) -> bool {
    if doc.is_tag(node, "input")
        || doc.has_attribute(node, "role")
        || doc.has_attribute(node, flags::SLIDER)
    {
        return false;
    }
    let classes: Vec<String> = doc
        .class_list(node)
        .iter()
        .map(|class| class.to_ascii_lowercase())
        .collect();
    if classes.iter().any(|c| THUMB_CLASSES.contains(&c.as_str())) {
        return true;
    }
    classes.iter().any(|c| c.contains("slider"))
        && VALUE_ATTRIBUTES.iter().any(|name| doc.has_attribute(node, name))
}

fn numeric(doc: &Document, node: NodeId, name: &str) -> Option<f64> {
    doc.attribute(node, name)?.trim().parse().ok()
}

/// (min, max, now) for the widget, clamped so min <= now <= max.
fn slider_values(doc: &Document, node: NodeId) -> (f64, f64, f64) {
    let min = numeric(doc, node, "data-min").unwrap_or(0.0);
    let max = numeric(doc, node, "data-max").unwrap_or(100.0).max(min);
    let now = numeric(doc, node, "data-value")
        .or_else(|| numeric(doc, node, "aria-valuenow"))
        .unwrap_or(min)
        .clamp(min, max);
    (min, max, now)
}

impl EnhancementRule for SliderRule {
    fn name(&self) -> &'static str {
        "sliders"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Local
    }

    fn apply(&self, ctx: &mut RuleContext<'_>, root: NodeId) -> RuleResult<()> {
        let targets: Vec<NodeId> = {
            let doc = ctx.doc();
            doc.elements_within(root)
                .into_iter()
                .filter(|n| is_slider(doc, *n))
                .collect()
        };

        for node in targets {
            let (min, max, now) = slider_values(ctx.doc(), node);
            debug!(node = %node, min, max, now, "Marking slider");
            ctx.writer.set_attribute(node, "role", "slider");
            if !ctx.doc().is_tabbable(node) {
                ctx.writer.set_attribute(node, "tabindex", "0");
            }
            ctx.writer.set_attribute(node, "aria-valuemin", &min.to_string());
            ctx.writer.set_attribute(node, "aria-valuemax", &max.to_string());
            ctx.writer.set_attribute(node, "aria-valuenow", &now.to_string());
            flags::mark(ctx, node, flags::SLIDER);
        }
        Ok(())
    }
}
