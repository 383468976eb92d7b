//! Node-scoped rules, safe to run repeatedly on any subtree.

mod clickable;
mod dropdown;
mod forms;
mod icon_labels;
mod sliders;

pub use clickable::ClickableRule;
pub use dropdown::DropdownRule;
pub use forms::FormLabelRule;
pub use icon_labels::{icon_label_for, IconLabelRule};
pub use sliders::SliderRule;

use ariaward_dom::{Document, NodeId};

/// Whether the element already exposes a name to assistive technology.
pub(crate) fn has_accessible_name(doc: &Document, node: NodeId) -> bool {
    let non_empty = |name: &str| doc.attribute(node, name).is_some_and(|v| !v.trim().is_empty());
    non_empty("aria-label") || non_empty("aria-labelledby") || !doc.text_content(node).trim().is_empty()
}

/// Turn `first_name` / `firstName` / `first-name` into `First name`.
pub(crate) fn humanize(raw: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in raw.chars() {
        if ch == '_' || ch == '-' || ch == '.' || ch.is_whitespace() || ch == '[' || ch == ']' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    let joined = words.join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
