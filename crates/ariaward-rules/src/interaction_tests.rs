use super::*;
use ariaward_core::Ledger;
use ariaward_dom::ElementSpec;

fn dropdown_doc() -> (Document, NodeId, NodeId, NodeId) {
    let mut doc = Document::new();
    let body = doc.body();
    let toggle = doc
        .append_spec(
            body,
            &ElementSpec::new("div")
                .class("dropdown-toggle")
                .child(ElementSpec::new("span").text("Menu")),
        )
        .unwrap();
    let panel = doc
        .append_spec(body, &ElementSpec::new("ul").style("display", "none"))
        .unwrap();
    let label = doc.element_children(toggle)[0];
    (doc, toggle, panel, label)
}

#[test]
fn test_dropdown_from_hidden_panel() {
    let (doc, toggle, panel, _) = dropdown_doc();
    let dropdown = DropdownToggle::from_panel(&doc, toggle, panel);
    assert!(!dropdown.is_expanded());
    assert_eq!(dropdown.open_display(), "block");
}

#[test]
fn test_dropdown_keeps_visible_display() {
    let mut doc = Document::new();
    let body = doc.body();
    let toggle = doc.append_spec(body, &ElementSpec::new("button")).unwrap();
    let panel = doc
        .append_spec(body, &ElementSpec::new("div").style("display", "flex"))
        .unwrap();
    let dropdown = DropdownToggle::from_panel(&doc, toggle, panel);
    assert!(dropdown.is_expanded());
    assert_eq!(dropdown.open_display(), "flex");
}

#[test]
fn test_click_toggles_and_escape_closes() {
    let (mut doc, toggle, panel, _) = dropdown_doc();
    let mut ledger = Ledger::new();
    let mut registry = InteractionRegistry::new();
    registry.register(
        toggle,
        Interaction::Dropdown(DropdownToggle::from_panel(&doc, toggle, panel)),
    );

    {
        let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
        assert!(registry.dispatch(&mut writer, toggle, DomEvent::Click));
    }
    assert_eq!(doc.attribute(toggle, "aria-expanded"), Some("true"));
    assert_eq!(doc.style_property(panel, "display"), Some("block"));
    assert!(!doc.has_attribute(panel, "hidden"));

    {
        let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
        assert!(!registry.dispatch(&mut writer, panel, DomEvent::KeyDown(Key::Escape)));
        assert!(registry.dispatch(&mut writer, toggle, DomEvent::KeyDown(Key::Escape)));
    }
    assert_eq!(doc.attribute(toggle, "aria-expanded"), Some("false"));
    assert_eq!(doc.style_property(panel, "display"), Some("none"));
    assert!(doc.has_attribute(panel, "hidden"));
    assert_eq!(doc.focused(), Some(toggle));

    ledger.rollback_all(&mut doc);
    assert!(!doc.has_attribute(toggle, "aria-expanded"));
    assert!(!doc.has_attribute(panel, "hidden"));
    assert_eq!(doc.style_property(panel, "display"), Some("none"));
}

#[test]
fn test_event_on_descendant_reaches_toggle() {
    let (mut doc, toggle, panel, label) = dropdown_doc();
    let mut ledger = Ledger::new();
    let mut registry = InteractionRegistry::new();
    registry.register(
        toggle,
        Interaction::Dropdown(DropdownToggle::from_panel(&doc, toggle, panel)),
    );

    let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
    assert!(registry.dispatch(&mut writer, label, DomEvent::KeyDown(Key::Enter)));
    assert_eq!(writer.doc().attribute(toggle, "aria-expanded"), Some("true"));
}

#[test]
fn test_register_is_unique_per_node() {
    let (doc, toggle, panel, _) = dropdown_doc();
    let mut registry = InteractionRegistry::new();
    let state = Interaction::Dropdown(DropdownToggle::from_panel(&doc, toggle, panel));
    assert!(registry.register(toggle, state.clone()));
    assert!(!registry.register(toggle, state));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_retain_connected() {
    let (mut doc, toggle, panel, _) = dropdown_doc();
    let mut registry = InteractionRegistry::new();
    registry.register(
        toggle,
        Interaction::Dropdown(DropdownToggle::from_panel(&doc, toggle, panel)),
    );
    doc.remove(toggle).unwrap();
    assert_eq!(registry.retain_connected(&doc), 1);
    assert!(registry.is_empty());
}

fn tab_doc() -> (Document, Vec<NodeId>, Vec<NodeId>) {
    let mut doc = Document::new();
    let body = doc.body();
    let list = doc
        .append_spec(
            body,
            &ElementSpec::new("div").children(
                ["One", "Two", "Three"]
                    .iter()
                    .map(|label| ElementSpec::new("button").text(*label)),
            ),
        )
        .unwrap();
    let tabs = doc.element_children(list);
    let panels = (0..3)
        .map(|_| doc.append_spec(body, &ElementSpec::new("section")).unwrap())
        .collect();
    (doc, tabs, panels)
}

#[test]
fn test_tab_arrow_navigation_wraps() {
    let (mut doc, tabs, panels) = tab_doc();
    let mut ledger = Ledger::new();
    let mut registry = InteractionRegistry::new();
    let mut list = TabList::new(tabs.clone(), panels.iter().copied().map(Some).collect(), 0);
    {
        let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
        list.select(&mut writer, 0, false);
    }
    let container = doc.parent(tabs[0]).unwrap();
    registry.register(container, Interaction::Tabs(list));

    let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
    assert!(registry.dispatch(&mut writer, tabs[0], DomEvent::KeyDown(Key::ArrowLeft)));
    let doc_ref = writer.doc();
    assert_eq!(doc_ref.attribute(tabs[2], "aria-selected"), Some("true"));
    assert_eq!(doc_ref.attribute(tabs[2], "tabindex"), Some("0"));
    assert_eq!(doc_ref.attribute(tabs[0], "tabindex"), Some("-1"));
    assert!(!doc_ref.has_attribute(panels[2], "hidden"));
    assert!(doc_ref.has_attribute(panels[0], "hidden"));
    assert_eq!(doc_ref.focused(), Some(tabs[2]));
}

#[test]
fn test_tab_home_end_and_click() {
    let (mut doc, tabs, panels) = tab_doc();
    let mut ledger = Ledger::new();
    let mut list = TabList::new(tabs.clone(), panels.iter().copied().map(Some).collect(), 1);
    let mut writer = TrackedWriter::new(&mut doc, &mut ledger);

    assert!(list.handle(&mut writer, tabs[1], DomEvent::KeyDown(Key::End)));
    assert_eq!(list.selected(), 2);
    assert!(list.handle(&mut writer, tabs[2], DomEvent::KeyDown(Key::Home)));
    assert_eq!(list.selected(), 0);
    assert!(list.handle(&mut writer, tabs[1], DomEvent::Click));
    assert_eq!(list.selected(), 1);
    assert!(!list.handle(&mut writer, tabs[1], DomEvent::KeyDown(Key::Escape)));
}

#[test]
fn test_focus_trap_wraps() {
    let mut doc = Document::new();
    let body = doc.body();
    let dialog = doc
        .append_spec(
            body,
            &ElementSpec::new("div")
                .child(ElementSpec::new("button").text("OK"))
                .child(ElementSpec::new("p").text("body"))
                .child(ElementSpec::new("button").text("Cancel")),
        )
        .unwrap();
    let children = doc.element_children(dialog);
    let (first, last) = (children[0], children[2]);

    let mut ledger = Ledger::new();
    let mut trap = FocusTrap::new(dialog);
    let mut writer = TrackedWriter::new(&mut doc, &mut ledger);

    writer.focus(last);
    assert!(trap.handle(&mut writer, DomEvent::KeyDown(Key::Tab)));
    assert_eq!(writer.doc().focused(), Some(first));

    assert!(trap.handle(&mut writer, DomEvent::KeyDown(Key::ShiftTab)));
    assert_eq!(writer.doc().focused(), Some(last));

    // Moving between inner controls is left to the browser.
    writer.focus(first);
    assert!(!trap.handle(&mut writer, DomEvent::KeyDown(Key::Tab)));
}

#[test]
fn test_focus_trap_without_focusables_focuses_dialog() {
    let mut doc = Document::new();
    let body = doc.body();
    let dialog = doc
        .append_spec(body, &ElementSpec::new("div").attr("tabindex", "-1").text("Saved"))
        .unwrap();
    let mut ledger = Ledger::new();
    let mut trap = FocusTrap::new(dialog);
    let mut writer = TrackedWriter::new(&mut doc, &mut ledger);
    assert!(trap.handle(&mut writer, DomEvent::KeyDown(Key::Tab)));
    assert_eq!(writer.doc().focused(), Some(dialog));
}
