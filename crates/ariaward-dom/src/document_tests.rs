use super::*;
use crate::event::EventType;

fn card(n: usize) -> ElementSpec {
    ElementSpec::new("div").class("card").text(format!("Card {}", n))
}

#[test]
fn test_new_document_structure() {
    let doc = Document::new();
    assert!(doc.is_connected(doc.body()));
    assert!(doc.is_connected(doc.head()));
    assert_eq!(doc.tag_name(doc.body()), Some("body"));
    assert_eq!(doc.parent(doc.head()), doc.parent(doc.body()));
}

#[test]
fn test_append_and_remove() {
    let mut doc = Document::new();
    let div = doc.create_element("div");
    assert!(!doc.is_connected(div));

    doc.append_child(doc.body(), div).unwrap();
    assert!(doc.is_connected(div));
    assert_eq!(doc.children(doc.body()), &[div]);

    doc.remove(div).unwrap();
    assert!(!doc.is_connected(div));
    assert!(doc.contains(div));
}

#[test]
fn test_destroy_makes_handles_stale() {
    let mut doc = Document::new();
    let div = doc.append_spec(doc.body(), &ElementSpec::new("div").child(ElementSpec::new("span"))).unwrap();
    let span = doc.children(div)[0];

    doc.destroy(div);
    assert!(!doc.contains(div));
    assert!(!doc.contains(span));
    assert_eq!(doc.attribute(div, "id"), None);
    assert_eq!(doc.set_attribute(div, "id", "x"), Err(DomError::StaleNode(div)));

    // Reused slot gets a new generation.
    let fresh = doc.create_element("p");
    assert!(doc.contains(fresh));
    assert!(!doc.contains(div));
    assert_ne!(fresh, div);
}

#[test]
fn test_hierarchy_request() {
    let mut doc = Document::new();
    let outer = doc.append_spec(doc.body(), &ElementSpec::new("div")).unwrap();
    let inner = doc.append_spec(outer, &ElementSpec::new("div")).unwrap();

    let result = doc.append_child(inner, outer);
    assert!(matches!(result, Err(DomError::HierarchyRequest { .. })));

    let text = doc.create_text("x");
    let result = doc.append_child(text, inner);
    assert!(matches!(result, Err(DomError::HierarchyRequest { .. })));
}

#[test]
fn test_attributes_and_classes() {
    let mut doc = Document::new();
    let button = doc
        .append_spec(doc.body(), &ElementSpec::new("button").class("btn btn-close"))
        .unwrap();

    assert!(doc.has_class(button, "btn-close"));
    assert!(!doc.has_class(button, "close"));

    doc.set_attribute(button, "aria-label", "Close").unwrap();
    assert_eq!(doc.attribute(button, "aria-label"), Some("Close"));
    assert_eq!(
        doc.remove_attribute(button, "aria-label").unwrap(),
        Some("Close".to_string())
    );
    assert_eq!(doc.remove_attribute(button, "aria-label").unwrap(), None);
}

#[test]
fn test_text_node_is_not_an_element() {
    let mut doc = Document::new();
    let text = doc.create_text("hello");
    assert_eq!(doc.set_attribute(text, "a", "b"), Err(DomError::NotAnElement(text)));
    assert_eq!(doc.text_content(text), "hello");
}

#[test]
fn test_style_properties() {
    let mut doc = Document::new();
    let panel = doc
        .append_spec(doc.body(), &ElementSpec::new("div").style("display", "none"))
        .unwrap();
    assert!(doc.is_hidden(panel));

    doc.set_style_property(panel, "display", "block").unwrap();
    assert!(!doc.is_hidden(panel));

    doc.set_style_property(panel, "display", "").unwrap();
    assert_eq!(doc.style_property(panel, "display"), None);
}

#[test]
fn test_text_content() {
    let mut doc = Document::new();
    let div = doc
        .append_spec(
            doc.body(),
            &ElementSpec::new("div")
                .text("a")
                .child(ElementSpec::new("span").text("b")),
        )
        .unwrap();
    assert_eq!(doc.text_content(div), "ab");

    doc.set_text_content(div, "c").unwrap();
    assert_eq!(doc.text_content(div), "c");
    assert_eq!(doc.children(div).len(), 1);

    doc.set_text_content(div, "").unwrap();
    assert!(doc.children(div).is_empty());
}

#[test]
fn test_observer_receives_subtree_records() {
    let mut doc = Document::new();
    let observer = doc.observe(doc.body()).unwrap();

    let list = doc.append_spec(doc.body(), &ElementSpec::new("ul")).unwrap();
    for n in 0..3 {
        doc.append_spec(list, &card(n)).unwrap();
    }

    let records = doc.take_records(observer);
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].added_nodes, vec![list]);
    assert!(records[1..].iter().all(|r| r.target == list));
    assert_eq!(doc.pending_records(observer), 0);
}

#[test]
fn test_observer_ignores_outside_changes() {
    let mut doc = Document::new();
    let observer = doc.observe(doc.body()).unwrap();

    let style = doc.create_element("style");
    doc.append_child(doc.head(), style).unwrap();
    assert_eq!(doc.pending_records(observer), 0);

    let detached = doc.create_element("div");
    let child = doc.create_element("span");
    doc.append_child(detached, child).unwrap();
    assert_eq!(doc.pending_records(observer), 0);
}

#[test]
fn test_observer_disconnect() {
    let mut doc = Document::new();
    let observer = doc.observe(doc.body()).unwrap();
    assert_eq!(doc.observer_count(), 1);
    assert!(doc.disconnect(observer));
    assert!(!doc.disconnect(observer));

    doc.append_spec(doc.body(), &card(1)).unwrap();
    assert!(doc.take_records(observer).is_empty());
}

#[test]
fn test_removal_records() {
    let mut doc = Document::new();
    let div = doc.append_spec(doc.body(), &card(1)).unwrap();
    let observer = doc.observe(doc.body()).unwrap();

    doc.remove(div).unwrap();
    let records = doc.take_records(observer);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].removed_nodes, vec![div]);
}

#[test]
fn test_prepend_child() {
    let mut doc = Document::new();
    let first = doc.append_spec(doc.body(), &card(1)).unwrap();
    let link = doc.create_element("a");
    doc.prepend_child(doc.body(), link).unwrap();
    assert_eq!(doc.children(doc.body()), &[link, first]);
}

#[test]
fn test_element_by_id() {
    let mut doc = Document::new();
    let menu = doc
        .append_spec(doc.body(), &ElementSpec::new("div").id("menu"))
        .unwrap();
    assert_eq!(doc.element_by_id("menu"), Some(menu));
    assert_eq!(doc.element_by_id("missing"), None);

    doc.remove(menu).unwrap();
    assert_eq!(doc.element_by_id("menu"), None);
}

#[test]
fn test_tabbable() {
    let mut doc = Document::new();
    let body = doc.body();
    let button = doc.append_spec(body, &ElementSpec::new("button")).unwrap();
    let link = doc.append_spec(body, &ElementSpec::new("a")).unwrap();
    let href = doc.append_spec(body, &ElementSpec::new("a").attr("href", "/")).unwrap();
    let div = doc.append_spec(body, &ElementSpec::new("div").attr("tabindex", "0")).unwrap();
    let skipped = doc.append_spec(body, &ElementSpec::new("div").attr("tabindex", "-1")).unwrap();
    let disabled = doc.append_spec(body, &ElementSpec::new("button").attr("disabled", "")).unwrap();

    assert!(doc.is_tabbable(button));
    assert!(!doc.is_tabbable(link));
    assert!(doc.is_tabbable(href));
    assert!(doc.is_tabbable(div));
    assert!(!doc.is_tabbable(skipped));
    assert!(!doc.is_tabbable(disabled));
}

#[test]
fn test_focus() {
    let mut doc = Document::new();
    let button = doc.append_spec(doc.body(), &ElementSpec::new("button")).unwrap();
    let detached = doc.create_element("button");

    assert!(doc.focus(button));
    assert_eq!(doc.focused(), Some(button));
    assert!(!doc.focus(detached));

    doc.remove(button).unwrap();
    assert_eq!(doc.focused(), None);
}

#[test]
fn test_listeners() {
    let mut doc = Document::new();
    let button = doc.append_spec(doc.body(), &ElementSpec::new("button")).unwrap();

    doc.add_event_listener(button, EventType::Click, "site").unwrap();
    doc.add_event_listener(button, EventType::Click, "engine").unwrap();
    assert_eq!(doc.listener_count(button, EventType::Click), 2);
    assert!(doc.has_listener(button, EventType::Click, "engine"));

    assert_eq!(doc.remove_listeners_by_owner("engine"), 1);
    assert_eq!(doc.listener_count(button, EventType::Click), 1);
}

#[test]
fn test_snapshot_ignores_attribute_order() {
    let mut doc = Document::new();
    let a = doc.append_spec(doc.body(), &ElementSpec::new("div")).unwrap();
    let b = doc.append_spec(doc.body(), &ElementSpec::new("div")).unwrap();

    doc.set_attribute(a, "x", "1").unwrap();
    doc.set_attribute(a, "y", "2").unwrap();
    doc.set_attribute(b, "y", "2").unwrap();
    doc.set_attribute(b, "x", "1").unwrap();

    assert_eq!(doc.snapshot(a), doc.snapshot(b));
}
