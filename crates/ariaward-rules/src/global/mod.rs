//! Document-scope rules that need whole-tree context.

mod dialogs;
mod landmarks;
mod sticky;
mod tabindex;
mod tabs;

pub use dialogs::DialogRule;
pub use landmarks::{skip_target, LandmarkRule, SKIP_TARGET_ID};
pub use sticky::StickyHeaderRule;
pub use tabindex::TabIndexRule;
pub use tabs::TabListRule;

use ariaward_dom::{Document, NodeId};

/// Lowercased `id` and `class` tokens of an element.
pub(crate) fn name_tokens(doc: &Document, node: NodeId) -> Vec<String> {
    let mut tokens: Vec<String> = doc
        .class_list(node)
        .iter()
        .map(|class| class.to_ascii_lowercase())
        .collect();
    if let Some(id) = doc.attribute(node, "id").filter(|id| !id.is_empty()) {
        tokens.push(id.to_ascii_lowercase());
    }
    tokens
}

/// Whether any id/class token is in `names`.
pub(crate) fn has_token(doc: &Document, node: NodeId, names: &[&str]) -> bool {
    name_tokens(doc, node)
        .iter()
        .any(|token| names.contains(&token.as_str()))
}
