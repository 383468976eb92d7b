//! Document-wide singletons inserted by the engine.
//!
//! The stylesheet, skip link and live region are plain elements carrying
//! [`flags::OWNED`]. They are not tracked writes: the engine creates them on
//! enable and destroys them on disable, and the watcher ignores them.

use tracing::{debug, warn};

use ariaward_core::EngineState;
use ariaward_dom::{Document, ElementSpec, NodeId};
use ariaward_rules::{flags, skip_target, SKIP_TARGET_ID};

pub const STYLESHEET_ID: &str = "ariaward-styles";
pub const SKIP_LINK_ID: &str = "ariaward-skip-link";
pub const LIVE_REGION_ID: &str = "ariaward-live-region";

/// Visually hidden but still exposed to assistive technology.
pub const SR_ONLY_CLASS: &str = "ariaward-sr-only";

pub const DEFAULT_SKIP_LINK_TEXT: &str = "Skip to main content";

const STYLESHEET_TEXT: &str = "\
.ariaward-sr-only{position:absolute!important;width:1px!important;height:1px!important;\
padding:0!important;margin:-1px!important;overflow:hidden!important;\
clip:rect(0,0,0,0)!important;white-space:nowrap!important;border:0!important}\
#ariaward-skip-link{position:absolute;left:-9999px;top:0;z-index:2147483647}\
#ariaward-skip-link:focus{left:8px;top:8px;padding:8px 12px;background:#fff;color:#000}\
[data-ariaward-clickable]:focus-visible,[data-ariaward-dropdown]:focus-visible,\
[data-ariaward-slider]:focus-visible{outline:2px solid #1a73e8;outline-offset:2px}";

fn live(doc: &Document, node: Option<NodeId>) -> Option<NodeId> {
    node.filter(|n| doc.is_connected(*n))
}

/// Insert the engine stylesheet into `<head>` unless present.
pub fn inject_stylesheet(doc: &mut Document, state: &mut EngineState) -> Option<NodeId> {
    if let Some(existing) = live(doc, state.stylesheet) {
        return Some(existing);
    }
    let spec = ElementSpec::new("style")
        .id(STYLESHEET_ID)
        .attr(flags::OWNED, "true")
        .text(STYLESHEET_TEXT);
    match doc.append_spec(doc.head(), &spec) {
        Ok(node) => {
            debug!(node = %node, "Injected stylesheet");
            state.stylesheet = Some(node);
            Some(node)
        }
        Err(e) => {
            warn!("Failed to inject stylesheet: {}", e);
            None
        }
    }
}

/// Insert the skip link as the first child of `<body>` unless present.
pub fn inject_skip_link(doc: &mut Document, state: &mut EngineState, text: &str) -> Option<NodeId> {
    if let Some(existing) = live(doc, state.skip_link) {
        return Some(existing);
    }
    let spec = ElementSpec::new("a")
        .id(SKIP_LINK_ID)
        .attr("href", format!("#{}", SKIP_TARGET_ID))
        .attr(flags::OWNED, "true")
        .text(text);
    let node = match doc.build_spec(&spec) {
        Ok(node) => node,
        Err(e) => {
            warn!("Failed to build skip link: {}", e);
            return None;
        }
    };
    if let Err(e) = doc.prepend_child(doc.body(), node) {
        warn!("Failed to insert skip link: {}", e);
        doc.destroy(node);
        return None;
    }
    debug!(node = %node, "Injected skip link");
    state.skip_link = Some(node);
    Some(node)
}

/// Point the skip link at the current main landmark.
///
/// The landmark rule gives the target [`SKIP_TARGET_ID`] when it has no id of
/// its own; a page-supplied id wins.
pub fn sync_skip_link(doc: &mut Document, state: &EngineState) -> bool {
    let Some(link) = live(doc, state.skip_link) else {
        return false;
    };
    let Some(target) = skip_target(doc) else {
        return false;
    };
    let Some(id) = doc.attribute(target, "id").map(str::to_string) else {
        return false;
    };
    let href = format!("#{}", id);
    if doc.attribute(link, "href") == Some(href.as_str()) {
        return false;
    }
    doc.set_attribute(link, "href", &href).is_ok()
}

/// The live region, appended to `<body>` on first use.
pub fn ensure_live_region(doc: &mut Document, state: &mut EngineState) -> Option<NodeId> {
    if let Some(existing) = live(doc, state.live_region) {
        return Some(existing);
    }
    let spec = ElementSpec::new("div")
        .id(LIVE_REGION_ID)
        .class(SR_ONLY_CLASS)
        .attr("role", "status")
        .attr("aria-live", "polite")
        .attr("aria-atomic", "true")
        .attr(flags::OWNED, "true");
    match doc.append_spec(doc.body(), &spec) {
        Ok(node) => {
            debug!(node = %node, "Created live region");
            state.live_region = Some(node);
            Some(node)
        }
        Err(e) => {
            warn!("Failed to create live region: {}", e);
            None
        }
    }
}

/// Destroy every singleton the engine inserted. Returns how many existed.
pub fn remove_singletons(doc: &mut Document, state: &mut EngineState) -> usize {
    let mut removed = 0;
    for slot in [
        &mut state.skip_link,
        &mut state.live_region,
        &mut state.stylesheet,
    ] {
        if let Some(node) = slot.take() {
            if doc.contains(node) {
                doc.destroy(node);
                removed += 1;
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_singleton() {
        let mut doc = Document::new();
        let mut state = EngineState::new();
        let first = inject_stylesheet(&mut doc, &mut state).unwrap();
        let second = inject_stylesheet(&mut doc, &mut state).unwrap();
        assert_eq!(first, second);
        assert_eq!(doc.element_children(doc.head()), vec![first]);
        assert!(doc.text_content(first).contains(SR_ONLY_CLASS));
    }

    #[test]
    fn test_skip_link_is_first_in_body() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append_spec(body, &ElementSpec::new("main")).unwrap();
        let mut state = EngineState::new();

        let link = inject_skip_link(&mut doc, &mut state, DEFAULT_SKIP_LINK_TEXT).unwrap();
        assert_eq!(doc.element_children(body)[0], link);
        assert_eq!(doc.attribute(link, "href"), Some("#ariaward-main"));
        assert!(doc.has_attribute(link, flags::OWNED));
        assert_eq!(doc.text_content(link), DEFAULT_SKIP_LINK_TEXT);
    }

    #[test]
    fn test_sync_skip_link_follows_existing_id() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append_spec(body, &ElementSpec::new("main").id("content"))
            .unwrap();
        let mut state = EngineState::new();
        let link = inject_skip_link(&mut doc, &mut state, "Skip").unwrap();

        assert!(sync_skip_link(&mut doc, &state));
        assert_eq!(doc.attribute(link, "href"), Some("#content"));
        assert!(!sync_skip_link(&mut doc, &state));
    }

    #[test]
    fn test_live_region_attributes() {
        let mut doc = Document::new();
        let mut state = EngineState::new();
        let region = ensure_live_region(&mut doc, &mut state).unwrap();

        assert_eq!(doc.attribute(region, "role"), Some("status"));
        assert_eq!(doc.attribute(region, "aria-live"), Some("polite"));
        assert_eq!(doc.attribute(region, "aria-atomic"), Some("true"));
        assert!(doc.has_class(region, SR_ONLY_CLASS));
        assert_eq!(ensure_live_region(&mut doc, &mut state), Some(region));
    }

    #[test]
    fn test_remove_singletons() {
        let mut doc = Document::new();
        let mut state = EngineState::new();
        let style = inject_stylesheet(&mut doc, &mut state).unwrap();
        let link = inject_skip_link(&mut doc, &mut state, "Skip").unwrap();
        let region = ensure_live_region(&mut doc, &mut state).unwrap();

        assert_eq!(remove_singletons(&mut doc, &mut state), 3);
        assert!(!doc.contains(style));
        assert!(!doc.contains(link));
        assert!(!doc.contains(region));
        assert!(doc.element_children(doc.body()).is_empty());
        assert_eq!(remove_singletons(&mut doc, &mut state), 0);
    }
}
