//! Landmark region inference.

use tracing::debug;

use ariaward_core::RuleResult;
use ariaward_dom::{Document, NodeId};

use super::has_token;
use crate::flags;
use crate::rule::{EnhancementRule, RuleContext, RuleScope};

/// Id given to the main region when it has none, so the skip link can
/// point at it.
pub const SKIP_TARGET_ID: &str = "ariaward-main";

/// Sectioning elements that scope `header`/`footer` away from the page.
const SECTIONING: &[&str] = &["article", "aside", "main", "nav", "section"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Landmark {
    Banner,
    Navigation,
    Main,
    Complementary,
    ContentInfo,
    Search,
}

impl Landmark {
    fn role(self) -> &'static str {
        match self {
            Landmark::Banner => "banner",
            Landmark::Navigation => "navigation",
            Landmark::Main => "main",
            Landmark::Complementary => "complementary",
            Landmark::ContentInfo => "contentinfo",
            Landmark::Search => "search",
        }
    }

    /// Landmarks a page should expose at most once.
    fn is_singleton(self) -> bool {
        matches!(self, Landmark::Banner | Landmark::Main | Landmark::ContentInfo)
    }

    fn native_tag(self) -> Option<&'static str> {
        match self {
            Landmark::Main => Some("main"),
            Landmark::Navigation => Some("nav"),
            Landmark::Complementary => Some("aside"),
            _ => None,
        }
    }
}

const ALL: &[Landmark] = &[
    Landmark::Banner,
    Landmark::Navigation,
    Landmark::Main,
    Landmark::Complementary,
    Landmark::ContentInfo,
    Landmark::Search,
];

/// Adds landmark roles to regions identified by tag, id or class, and gives
/// the main region an id and `tabindex="-1"` for the skip link.
#[derive(Debug, Clone, Copy, Default)]
pub struct LandmarkRule;

fn is_page_scoped(doc: &Document, node: NodeId) -> bool {
    !doc
        .ancestors(node)
        .into_iter()
        .any(|a| doc.tag_name(a).is_some_and(|t| SECTIONING.contains(&t)))
}

fn infer(doc: &Document, node: NodeId) -> Option<Landmark> {
    let tag = doc.tag_name(node)?;
    match tag {
        "header" if is_page_scoped(doc, node) => return Some(Landmark::Banner),
        "footer" if is_page_scoped(doc, node) => return Some(Landmark::ContentInfo),
        "form" => {
            let search_input = doc
                .elements_within(node)
                .into_iter()
                .any(|n| doc.is_tag(n, "input") && doc.attribute(n, "type") == Some("search"));
            if search_input || has_token(doc, node, &["search", "search-form", "searchform"]) {
                return Some(Landmark::Search);
            }
            return None;
        }
        "header" | "footer" | "main" | "nav" | "aside" => return None,
        _ => {}
    }
    if has_token(doc, node, &["header", "site-header", "masthead", "page-header", "topbar"]) {
        Some(Landmark::Banner)
    } else if has_token(doc, node, &["nav", "navbar", "navigation", "main-nav", "site-nav"]) {
        Some(Landmark::Navigation)
    } else if has_token(doc, node, &["main", "main-content", "content", "page-content", "primary"]) {
        Some(Landmark::Main)
    } else if has_token(doc, node, &["sidebar", "aside"]) {
        Some(Landmark::Complementary)
    } else if has_token(doc, node, &["footer", "site-footer", "page-footer"]) {
        Some(Landmark::ContentInfo)
    } else {
        None
    }
}

fn exists(doc: &Document, scope: NodeId, landmark: Landmark) -> bool {
    doc.elements_within(scope).into_iter().any(|n| {
        doc.attribute(n, "role") == Some(landmark.role())
            || landmark.native_tag().is_some_and(|tag| doc.is_tag(n, tag))
    })
}

/// The element the skip link should jump to: the first `main` element or
/// `role="main"` region.
pub fn skip_target(doc: &Document) -> Option<NodeId> {
    doc.elements_within(doc.body())
        .into_iter()
        .find(|n| doc.is_tag(*n, "main") || doc.attribute(*n, "role") == Some("main"))
}

impl EnhancementRule for LandmarkRule {
    fn name(&self) -> &'static str {
        "landmarks"
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Global
    }

    fn apply(&self, ctx: &mut RuleContext<'_>, root: NodeId) -> RuleResult<()> {
        let assignments: Vec<(NodeId, Landmark)> = {
            let doc = ctx.doc();
            let mut taken: Vec<Landmark> = ALL
                .iter()
                .copied()
                .filter(|l| l.is_singleton() && exists(doc, root, *l))
                .collect();
            let mut assigned: Vec<(NodeId, Landmark)> = Vec::new();
            for node in doc.elements_within(root) {
                if doc.has_attribute(node, "role") || doc.has_attribute(node, flags::LANDMARK) {
                    continue;
                }
                let Some(landmark) = infer(doc, node) else {
                    continue;
                };
                if landmark.is_singleton() && taken.contains(&landmark) {
                    continue;
                }
                let nested = assigned
                    .iter()
                    .any(|(other, l)| *l == landmark && doc.is_inclusive_ancestor(*other, node));
                if nested {
                    continue;
                }
                if landmark.is_singleton() {
                    taken.push(landmark);
                }
                assigned.push((node, landmark));
            }
            assigned
        };

        for (node, landmark) in assignments {
            debug!(node = %node, role = landmark.role(), "Inferred landmark");
            ctx.writer.set_attribute(node, "role", landmark.role());
            flags::mark(ctx, node, flags::LANDMARK);
        }

        if let Some(target) = skip_target(ctx.doc()) {
            if !ctx.doc().attribute(target, "id").is_some_and(|id| !id.is_empty()) {
                ctx.writer.set_attribute(target, "id", SKIP_TARGET_ID);
            }
            if !ctx.doc().has_attribute(target, "tabindex") {
                ctx.writer.set_attribute(target, "tabindex", "-1");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::InteractionRegistry;
    use ariaward_core::{Ledger, TrackedWriter};
    use ariaward_dom::ElementSpec;

    fn run(doc: &mut Document, ledger: &mut Ledger) -> u64 {
        let mut interactions = InteractionRegistry::new();
        let body = doc.body();
        let mut ctx = RuleContext::new(TrackedWriter::new(doc, ledger), &mut interactions);
        LandmarkRule.apply(&mut ctx, body).unwrap();
        ctx.writer.writes()
    }

    #[test]
    fn test_infers_regions_from_classes() {
        let mut doc = Document::new();
        let body = doc.body();
        let header = doc
            .append_spec(body, &ElementSpec::new("div").class("site-header"))
            .unwrap();
        let nav = doc
            .append_spec(body, &ElementSpec::new("div").class("navbar"))
            .unwrap();
        let main = doc
            .append_spec(body, &ElementSpec::new("div").id("content"))
            .unwrap();
        let footer = doc.append_spec(body, &ElementSpec::new("footer")).unwrap();
        let search = doc
            .append_spec(
                body,
                &ElementSpec::new("form").child(ElementSpec::new("input").attr("type", "search")),
            )
            .unwrap();

        let mut ledger = Ledger::new();
        run(&mut doc, &mut ledger);
        assert_eq!(doc.attribute(header, "role"), Some("banner"));
        assert_eq!(doc.attribute(nav, "role"), Some("navigation"));
        assert_eq!(doc.attribute(main, "role"), Some("main"));
        assert_eq!(doc.attribute(footer, "role"), Some("contentinfo"));
        assert_eq!(doc.attribute(search, "role"), Some("search"));

        // Existing id is kept as the skip target.
        assert_eq!(doc.attribute(main, "id"), Some("content"));
        assert_eq!(doc.attribute(main, "tabindex"), Some("-1"));
        assert_eq!(skip_target(&doc), Some(main));
    }

    #[test]
    fn test_singletons_not_duplicated() {
        let mut doc = Document::new();
        let body = doc.body();
        let native = doc.append_spec(body, &ElementSpec::new("main")).unwrap();
        let other = doc
            .append_spec(body, &ElementSpec::new("div").class("main-content"))
            .unwrap();
        let article_header = doc
            .append_spec(body, &ElementSpec::new("article").child(ElementSpec::new("header")))
            .unwrap();
        let inner_header = doc.element_children(article_header)[0];

        let mut ledger = Ledger::new();
        run(&mut doc, &mut ledger);
        assert!(!doc.has_attribute(other, "role"));
        assert!(!doc.has_attribute(inner_header, "role"));
        assert_eq!(doc.attribute(native, "id"), Some(SKIP_TARGET_ID));
    }

    #[test]
    fn test_second_pass_writes_nothing() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append_spec(body, &ElementSpec::new("header")).unwrap();
        doc.append_spec(body, &ElementSpec::new("div").class("main")).unwrap();

        let mut ledger = Ledger::new();
        assert!(run(&mut doc, &mut ledger) > 0);
        assert_eq!(run(&mut doc, &mut ledger), 0);
    }
}
