//! Item-like node classification.
//!
//! Used by the watcher to size "new items loaded" announcements on feeds
//! and infinite-scroll lists.

use ariaward_dom::{Document, NodeId};

/// Class fragments that mark a feed or list entry.
const DEFAULT_ITEM_FRAGMENTS: &[&str] = &[
    "card", "item", "post", "entry", "tile", "result", "story", "tweet", "product",
];

const ITEM_TAGS: &[&str] = &["li", "article"];

const ITEM_ROLES: &[&str] = &["listitem", "article", "row"];

/// Decides whether an inserted node is a feed/list entry.
#[derive(Debug, Clone)]
pub struct ItemClassifier {
    fragments: Vec<String>,
}

impl ItemClassifier {
    /// Classifier with the built-in class fragments.
    pub fn new() -> Self {
        Self {
            fragments: DEFAULT_ITEM_FRAGMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Add extra class fragments (lowercase substrings of class tokens).
    pub fn with_fragments<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for fragment in fragments {
            let fragment = fragment.into().to_ascii_lowercase();
            if !fragment.is_empty() && !self.fragments.contains(&fragment) {
                self.fragments.push(fragment);
            }
        }
        self
    }

    /// Whether `node` itself looks like an item.
    pub fn is_item_like(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag_name(node) else {
            return false;
        };
        if ITEM_TAGS.contains(&tag) {
            return true;
        }
        if doc
            .attribute(node, "role")
            .is_some_and(|role| ITEM_ROLES.contains(&role))
        {
            return true;
        }
        doc.class_list(node).iter().any(|class| {
            let class = class.to_ascii_lowercase();
            self.fragments.iter().any(|f| class.contains(f.as_str()))
        })
    }

    /// Items contributed by one inserted node: 1 if it is an item itself,
    /// otherwise the number of item-like element children (a batch of
    /// entries wrapped in a container).
    pub fn count_items(&self, doc: &Document, node: NodeId) -> u32 {
        if self.is_item_like(doc, node) {
            return 1;
        }
        doc.element_children(node)
            .into_iter()
            .filter(|child| self.is_item_like(doc, *child))
            .count() as u32
    }
}

impl Default for ItemClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariaward_dom::ElementSpec;

    #[test]
    fn test_item_like() {
        let mut doc = Document::new();
        let body = doc.body();
        let li = doc.append_spec(body, &ElementSpec::new("li")).unwrap();
        let card = doc
            .append_spec(body, &ElementSpec::new("div").class("product-card"))
            .unwrap();
        let role = doc
            .append_spec(body, &ElementSpec::new("div").attr("role", "article"))
            .unwrap();
        let plain = doc
            .append_spec(body, &ElementSpec::new("div").class("wrapper"))
            .unwrap();

        let classifier = ItemClassifier::new();
        assert!(classifier.is_item_like(&doc, li));
        assert!(classifier.is_item_like(&doc, card));
        assert!(classifier.is_item_like(&doc, role));
        assert!(!classifier.is_item_like(&doc, plain));
    }

    #[test]
    fn test_count_items_in_container() {
        let mut doc = Document::new();
        let body = doc.body();
        let container = doc
            .append_spec(
                body,
                &ElementSpec::new("div").children((0..5).map(|_| ElementSpec::new("div").class("card"))),
            )
            .unwrap();

        let classifier = ItemClassifier::new();
        assert_eq!(classifier.count_items(&doc, container), 5);
    }

    #[test]
    fn test_extra_fragments() {
        let mut doc = Document::new();
        let body = doc.body();
        let node = doc
            .append_spec(body, &ElementSpec::new("div").class("Listing-Row"))
            .unwrap();

        assert!(!ItemClassifier::new().is_item_like(&doc, node));
        let classifier = ItemClassifier::new().with_fragments(["listing"]);
        assert!(classifier.is_item_like(&doc, node));
    }
}
