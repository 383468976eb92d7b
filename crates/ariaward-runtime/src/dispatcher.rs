//! Rule dispatch.
//!
//! Runs the local rules over a subtree root and the global rules over the
//! document body. A failing rule is logged, counted and skipped; the rules
//! after it still run.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use ariaward_core::{EngineState, Ledger, RuleError, TrackedWriter};
use ariaward_dom::{Document, NodeId};
use ariaward_rules::{
    items_loaded_message, EnhancementRule, InteractionRegistry, RuleContext, RuleSet,
};
use ariaward_runloop::EngineMetrics;

use crate::announcer::Announcer;
use crate::singletons;

/// Mutable borrows a pass needs, bundled for one callback turn.
pub struct PassScope<'a> {
    pub doc: &'a mut Document,
    pub ledger: &'a mut Ledger,
    pub interactions: &'a mut InteractionRegistry,
}

impl<'a> PassScope<'a> {
    pub fn new(
        doc: &'a mut Document,
        ledger: &'a mut Ledger,
        interactions: &'a mut InteractionRegistry,
    ) -> Self {
        Self {
            doc,
            ledger,
            interactions,
        }
    }
}

/// Outcome of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub rules_run: usize,
    pub writes: u64,
    pub failures: usize,
    pub announced: bool,
}

#[derive(Debug)]
pub struct Dispatcher {
    rules: RuleSet,
    metrics: Arc<EngineMetrics>,
}

impl Dispatcher {
    pub fn new(rules: RuleSet, metrics: Arc<EngineMetrics>) -> Self {
        Self { rules, metrics }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Apply every local rule to `root` and its descendants.
    pub fn run_local_pass(
        &self,
        scope: &mut PassScope<'_>,
        state: &EngineState,
        root: NodeId,
    ) -> PassReport {
        if !state.enabled {
            return PassReport::default();
        }
        if !scope.doc.is_connected(root) {
            debug!(root = %root, "Skipping local pass on detached root");
            return PassReport::default();
        }

        let report = self.apply(scope, self.rules.local(), root);
        self.metrics.record_local_pass();
        debug!(
            root = %root,
            rules = report.rules_run,
            writes = report.writes,
            failures = report.failures,
            "Local pass complete"
        );
        report
    }

    /// Apply every global rule to the document, then announce `item_count`
    /// new items if there are any.
    pub fn run_global_pass(
        &self,
        scope: &mut PassScope<'_>,
        state: &mut EngineState,
        announcer: &mut Announcer,
        now_ms: u64,
        item_count: u32,
    ) -> PassReport {
        if !state.enabled {
            return PassReport::default();
        }

        let body = scope.doc.body();
        let mut report = self.apply(scope, self.rules.global(), body);
        singletons::sync_skip_link(scope.doc, state);

        if item_count > 0 {
            report.announced =
                announcer.announce(scope.doc, state, now_ms, items_loaded_message(item_count));
            if report.announced {
                self.metrics.record_announcement();
            }
        }

        self.metrics.record_global_pass();
        debug!(
            rules = report.rules_run,
            writes = report.writes,
            failures = report.failures,
            item_count,
            "Global pass complete"
        );
        report
    }

    fn apply<'r>(
        &self,
        scope: &mut PassScope<'_>,
        rules: impl Iterator<Item = &'r Arc<dyn EnhancementRule>>,
        root: NodeId,
    ) -> PassReport {
        let mut report = PassReport::default();
        for rule in rules {
            let writer = TrackedWriter::new(&mut *scope.doc, &mut *scope.ledger);
            let mut ctx = RuleContext::new(writer, &mut *scope.interactions);
            let result = rule.apply(&mut ctx, root);
            report.rules_run += 1;
            report.writes += ctx.writer.writes();

            if let Err(e) = result {
                report.failures += 1;
                self.metrics.record_rule_failure();
                match e {
                    RuleError::MissingTarget(_) => {
                        debug!(rule = rule.name(), root = %root, "Rule skipped: {}", e)
                    }
                    RuleError::Dom(_) => {
                        warn!(rule = rule.name(), root = %root, "Rule failed: {}", e)
                    }
                }
            }
        }
        self.metrics.record_writes(report.writes);
        report
    }
}
