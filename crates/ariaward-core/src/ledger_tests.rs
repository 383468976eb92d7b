use super::*;
use crate::tracked::TrackedWriter;
use ariaward_dom::ElementSpec;

fn doc_with(spec: ElementSpec) -> (Document, NodeId) {
    let mut doc = Document::new();
    let body = doc.body();
    let node = doc.append_spec(body, &spec).unwrap();
    (doc, node)
}

#[test]
fn test_first_write_captures_original() {
    let (mut doc, node) = doc_with(ElementSpec::new("div").attr("role", "presentation"));
    let mut ledger = Ledger::new();

    let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
    assert!(writer.set_attribute(node, "role", "button"));
    assert!(writer.set_attribute(node, "tabindex", "0"));
    assert_eq!(writer.writes(), 2);

    assert_eq!(
        ledger.original_attribute(node, "role"),
        Some(&Some("presentation".to_string()))
    );
    assert_eq!(ledger.original_attribute(node, "tabindex"), Some(&None));
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.tracked_key_count(), 2);
}

#[test]
fn test_single_capture_keeps_first_original() {
    let (mut doc, node) = doc_with(ElementSpec::new("div").attr("aria-label", "orig"));
    let mut ledger = Ledger::new();

    let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
    writer.set_attribute(node, "aria-label", "first");
    writer.set_attribute(node, "aria-label", "second");
    writer.remove_attribute(node, "aria-label");
    writer.set_attribute(node, "aria-label", "third");

    assert_eq!(
        ledger.original_attribute(node, "aria-label"),
        Some(&Some("orig".to_string()))
    );
    assert_eq!(doc.attribute(node, "aria-label"), Some("third"));
}

#[test]
fn test_rollback_restores_exact_state() {
    let (mut doc, node) = doc_with(
        ElementSpec::new("div")
            .attr("class", "panel")
            .attr("title", "Panel")
            .style("display", "none"),
    );
    let before = doc.snapshot(node);
    let mut ledger = Ledger::new();

    {
        let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
        writer.set_attribute(node, "title", "Changed");
        writer.remove_attribute(node, "class");
        writer.set_attribute(node, "hidden", "");
        writer.set_style_property(node, "display", "block");
        writer.set_style_property(node, "visibility", "visible");
        writer.set_style_property(node, "display", "flex");
    }
    assert_ne!(doc.snapshot(node), before);

    let report = ledger.rollback_all(&mut doc);
    assert_eq!(report.restored, 1);
    assert!(ledger.is_empty());
    assert_eq!(doc.snapshot(node), before);
}

#[test]
fn test_rollback_removes_attribute_added_from_absent() {
    let (mut doc, node) = doc_with(ElementSpec::new("button").class("btn-close"));
    let names_before = doc.attribute_names(node);
    let mut ledger = Ledger::new();

    TrackedWriter::new(&mut doc, &mut ledger).set_attribute(node, "aria-label", "Close");
    ledger.rollback_all(&mut doc);

    assert!(!doc.has_attribute(node, "aria-label"));
    assert_eq!(doc.attribute_names(node), names_before);
}

#[test]
fn test_rollback_tolerates_detached_and_freed_nodes() {
    let mut doc = Document::new();
    let body = doc.body();
    let detached = doc.append_spec(body, &ElementSpec::new("div")).unwrap();
    let freed = doc.append_spec(body, &ElementSpec::new("div")).unwrap();
    let mut ledger = Ledger::new();

    {
        let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
        writer.set_attribute(detached, "role", "region");
        writer.set_attribute(freed, "role", "region");
    }
    doc.remove(detached).unwrap();
    doc.destroy(freed);

    let report = ledger.rollback_all(&mut doc);
    assert_eq!(report.restored, 1);
    assert_eq!(report.skipped, 1);
    assert!(!doc.has_attribute(detached, "role"));
}

#[test]
fn test_garbage_collect_evicts_disconnected() {
    let mut doc = Document::new();
    let body = doc.body();
    let kept = doc.append_spec(body, &ElementSpec::new("li")).unwrap();
    let removed = doc.append_spec(body, &ElementSpec::new("li")).unwrap();
    let mut ledger = Ledger::new();

    {
        let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
        writer.set_attribute(kept, "role", "listitem");
        writer.set_attribute(removed, "role", "listitem");
    }
    doc.remove(removed).unwrap();

    assert_eq!(ledger.garbage_collect(&doc), 1);
    assert!(ledger.contains(kept));
    assert!(!ledger.contains(removed));

    let report = ledger.rollback_all(&mut doc);
    assert_eq!(report.restored, 1);
}

#[test]
fn test_writes_to_stale_nodes_are_not_recorded() {
    let mut doc = Document::new();
    let body = doc.body();
    let node = doc.append_spec(body, &ElementSpec::new("div")).unwrap();
    doc.destroy(node);
    let mut ledger = Ledger::new();

    let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
    assert!(!writer.set_attribute(node, "role", "button"));
    assert!(!writer.set_style_property(node, "display", "none"));
    assert!(!writer.remove_attribute(node, "hidden"));
    assert!(ledger.is_empty());
}

#[test]
fn test_style_and_attribute_key_spaces_are_independent() {
    let (mut doc, node) = doc_with(ElementSpec::new("div").style("display", "grid"));
    let mut ledger = Ledger::new();

    {
        let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
        writer.set_attribute(node, "display", "attr");
        writer.set_style_property(node, "display", "none");
    }

    assert_eq!(ledger.original_attribute(node, "display"), Some(&None));
    assert_eq!(
        ledger.original_style(node, "display"),
        Some(&Some("grid".to_string()))
    );

    ledger.rollback_all(&mut doc);
    assert_eq!(doc.style_property(node, "display"), Some("grid"));
    assert!(!doc.has_attribute(node, "display"));
}

#[test]
fn test_listen_is_not_duplicated() {
    let (mut doc, node) = doc_with(ElementSpec::new("div"));
    let mut ledger = Ledger::new();

    let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
    assert!(writer.listen(node, ariaward_dom::EventType::Click));
    assert!(!writer.listen(node, ariaward_dom::EventType::Click));
    assert_eq!(doc.listener_count(node, ariaward_dom::EventType::Click), 1);
}
