//! Hosting the engine: document loading and the frame loop.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use ariaward_config::Config;
use ariaward_dom::{Document, ElementSpec, NodeSnapshot};
use ariaward_runtime::{Engine, EngineOptions, LifecycleState, MetricsSnapshot};

/// Engine options from the `[engine]` and `[rules]` sections.
pub(crate) fn engine_options(config: &Config) -> EngineOptions {
    EngineOptions {
        gc_threshold: config.engine.gc_threshold,
        announce_delay_ms: config.engine.announce_delay_ms,
        skip_link_text: config.rules.skip_link_text.clone(),
        disabled_rules: config.rules.disabled.clone(),
        item_class_patterns: config.rules.item_class_patterns.clone(),
    }
}

/// Build a document from an element tree. A `body` root supplies the body's
/// attributes and children; any other root becomes the body's only child.
pub(crate) fn document_from_spec(spec: &ElementSpec) -> anyhow::Result<Document> {
    let mut doc = Document::new();
    let body = doc.body();

    if spec.tag.eq_ignore_ascii_case("body") {
        for (name, value) in &spec.attributes {
            doc.set_attribute(body, name, value)?;
        }
        for (property, value) in &spec.style {
            doc.set_style_property(body, property, value)?;
        }
        if let Some(text) = &spec.text {
            let node = doc.create_text(text);
            doc.append_child(body, node)?;
        }
        for child in &spec.children {
            doc.append_spec(body, child)?;
        }
    } else {
        doc.append_spec(body, spec)?;
    }
    Ok(doc)
}

pub(crate) fn load_document(path: &Path) -> anyhow::Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document {}", path.display()))?;
    let spec: ElementSpec = serde_json::from_str(&content)
        .with_context(|| format!("Invalid document JSON in {}", path.display()))?;
    document_from_spec(&spec)
}

/// Tick the engine once per frame until it is idle or `max_frames` ran.
/// Returns the number of frames driven.
pub(crate) async fn drive(
    engine: &mut Engine,
    doc: &mut Document,
    frame_interval: Duration,
    max_frames: u64,
) -> u64 {
    let mut interval = tokio::time::interval(frame_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let start = Instant::now();

    let mut frames = 0;
    while frames < max_frames {
        interval.tick().await;
        let now_ms = start.elapsed().as_millis() as u64;
        let report = engine.tick(doc, now_ms);
        frames += 1;
        debug!(frame = frames, now_ms, ?report, "Frame");

        if engine.is_idle(doc) {
            break;
        }
    }
    info!(frames, "Frame loop finished");
    frames
}

/// Output of the `run` command.
#[derive(Debug, Serialize)]
pub(crate) struct RunReport {
    pub state: LifecycleState,
    pub frames: u64,
    pub tracked_nodes: usize,
    pub metrics: MetricsSnapshot,
    pub document: Option<NodeSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restored: Option<NodeSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback_exact: Option<bool>,
}

/// Enhance `doc`, drive it to idle, and optionally disable afterwards.
pub(crate) async fn run_document(
    mut doc: Document,
    config: &Config,
    enabled: bool,
    disable_after: bool,
    max_frames: u64,
) -> RunReport {
    let original = doc.snapshot(doc.body());
    let mut engine = Engine::new(engine_options(config));
    if enabled {
        engine.enable(&mut doc);
    }

    let frame_interval = Duration::from_millis(config.engine.frame_interval_ms.max(1));
    let frames = drive(&mut engine, &mut doc, frame_interval, max_frames).await;
    let tracked_nodes = engine.ledger().len();
    let document = doc.snapshot(doc.body());

    let (restored, rollback_exact) = if disable_after {
        engine.disable(&mut doc);
        let restored = doc.snapshot(doc.body());
        let exact = restored == original;
        (restored, Some(exact))
    } else {
        (None, None)
    };

    RunReport {
        state: engine.state(),
        frames,
        tracked_nodes,
        metrics: engine.metrics(),
        document,
        restored,
        rollback_exact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> ElementSpec {
        ElementSpec::new("body")
            .attr("class", "home")
            .child(
                ElementSpec::new("main")
                    .child(ElementSpec::new("button").class("btn-close"))
                    .child(
                        ElementSpec::new("div")
                            .children((0..3).map(|_| ElementSpec::new("div").class("card"))),
                    ),
            )
    }

    #[test]
    fn test_engine_options_from_config() {
        let mut config = Config::default();
        config.engine.gc_threshold = 12;
        config.rules.disabled = vec!["tabs".to_string()];

        let options = engine_options(&config);
        assert_eq!(options.gc_threshold, 12);
        assert_eq!(options.disabled_rules, vec!["tabs"]);
        assert_eq!(options.skip_link_text, "Skip to main content");
    }

    #[test]
    fn test_body_spec_fills_body() {
        let doc = document_from_spec(&page()).unwrap();
        let body = doc.body();
        assert_eq!(doc.attribute(body, "class"), Some("home"));
        assert!(doc.is_tag(doc.element_children(body)[0], "main"));
    }

    #[test]
    fn test_other_root_is_wrapped() {
        let doc = document_from_spec(&ElementSpec::new("section")).unwrap();
        let children = doc.element_children(doc.body());
        assert_eq!(children.len(), 1);
        assert!(doc.is_tag(children[0], "section"));
    }

    #[test]
    fn test_load_document_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(&path, serde_json::to_string(&page()).unwrap()).unwrap();
        assert!(load_document(&path).is_ok());

        std::fs::write(&path, "{").unwrap();
        assert!(load_document(&path).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_document_rolls_back_exactly() {
        let doc = document_from_spec(&page()).unwrap();
        let report = run_document(doc, &Config::default(), true, true, 100).await;

        assert_eq!(report.state, LifecycleState::Disabled);
        assert!(report.frames >= 1);
        assert!(report.tracked_nodes > 0);
        assert_eq!(report.rollback_exact, Some(true));
        assert_ne!(report.document, report.restored);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drive_stops_when_idle() {
        let mut doc = document_from_spec(&page()).unwrap();
        let mut engine = Engine::default();
        engine.enable(&mut doc);

        let body = doc.body();
        doc.append_spec(
            body,
            &ElementSpec::new("ul").children((0..4).map(|_| ElementSpec::new("li"))),
        )
        .unwrap();

        let frames = drive(&mut engine, &mut doc, Duration::from_millis(16), 100).await;
        assert!(frames > 1);
        assert!(frames < 100);
        assert!(engine.is_idle(&doc));
        assert_eq!(engine.metrics().announcements, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_run_leaves_document_untouched() {
        let doc = document_from_spec(&page()).unwrap();
        let original = doc.snapshot(doc.body());
        let report = run_document(doc, &Config::default(), false, false, 10).await;

        assert_eq!(report.state, LifecycleState::Disabled);
        assert_eq!(report.frames, 1);
        assert_eq!(report.document, original);
        assert!(report.rollback_exact.is_none());
    }
}
