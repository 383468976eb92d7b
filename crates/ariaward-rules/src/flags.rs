//! Private marker attributes.

use ariaward_dom::NodeId;

use crate::rule::RuleContext;

pub const LABELED: &str = "data-ariaward-label";
pub const CLICKABLE: &str = "data-ariaward-clickable";
pub const FORM: &str = "data-ariaward-form";
pub const DROPDOWN: &str = "data-ariaward-dropdown";
pub const SLIDER: &str = "data-ariaward-slider";
pub const TABS: &str = "data-ariaward-tabs";
pub const DIALOG: &str = "data-ariaward-dialog";
pub const STICKY: &str = "data-ariaward-sticky";
pub const LANDMARK: &str = "data-ariaward-landmark";

/// Carried by nodes the engine inserts itself (skip link, live region,
/// stylesheet). The watcher ignores them.
pub const OWNED: &str = "data-ariaward-owned";

/// Whether `node` already carries `flag`.
pub fn is_marked(ctx: &RuleContext<'_>, node: NodeId, flag: &str) -> bool {
    ctx.doc().has_attribute(node, flag)
}

/// Set `flag` on `node` through the tracked writer.
pub fn mark(ctx: &mut RuleContext<'_>, node: NodeId, flag: &str) {
    ctx.writer.set_attribute(node, flag, "true");
}

/// Generated id for a node that needs one. Stable for the node's slot.
pub fn generated_id(prefix: &str, node: NodeId) -> String {
    format!("ariaward-{}-{}", prefix, node.index())
}

/// Return the node's id, assigning a generated one if it has none.
pub fn ensure_id(ctx: &mut RuleContext<'_>, node: NodeId, prefix: &str) -> String {
    if let Some(id) = ctx.doc().attribute(node, "id").filter(|id| !id.is_empty()) {
        return id.to_string();
    }
    let id = generated_id(prefix, node);
    ctx.writer.set_attribute(node, "id", &id);
    id
}
