//! Lifecycle controller.
//!
//! [`Engine`] owns every piece of engine state and exposes the only
//! transitions that change `enabled`: [`Engine::enable`] and
//! [`Engine::disable`]. The host drives deferred work with [`Engine::tick`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ariaward_core::{EngineState, Ledger, TrackedWriter, LISTENER_OWNER};
use ariaward_dom::{Document, DomEvent, NodeId};
use ariaward_rules::{InteractionRegistry, ItemClassifier, RuleSet};
use ariaward_runloop::{
    EngineMetrics, FrameTask, MetricsSnapshot, MutationWatcher, ObservationBatch, Scheduler,
    DEFAULT_GC_THRESHOLD,
};

use crate::announcer::{Announcer, DEFAULT_ANNOUNCE_DELAY_MS};
use crate::dispatcher::{Dispatcher, PassScope};
use crate::singletons::{self, DEFAULT_SKIP_LINK_TEXT};

/// Engine construction options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Observation batches between ledger garbage collections.
    pub gc_threshold: u32,
    /// Delay between clearing the live region and writing a message.
    pub announce_delay_ms: u64,
    pub skip_link_text: String,
    /// Rule names to leave out of the standard set.
    pub disabled_rules: Vec<String>,
    /// Extra class fragments that mark item-like nodes.
    pub item_class_patterns: Vec<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            gc_threshold: DEFAULT_GC_THRESHOLD,
            announce_delay_ms: DEFAULT_ANNOUNCE_DELAY_MS,
            skip_link_text: DEFAULT_SKIP_LINK_TEXT.to_string(),
            disabled_rules: Vec::new(),
            item_class_patterns: Vec::new(),
        }
    }
}

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Disabled,
    Enabled,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Disabled => write!(f, "disabled"),
            LifecycleState::Enabled => write!(f, "enabled"),
        }
    }
}

/// What one [`Engine::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Mutation records delivered to the watcher.
    pub records: usize,
    /// Enhancement roots found in those records.
    pub roots: usize,
    /// Announcements written to the live region.
    pub announced: usize,
    /// Frame tasks executed.
    pub tasks_run: usize,
    /// Frame tasks that found the engine disabled or came from an earlier
    /// enable session.
    pub tasks_skipped: usize,
}

pub struct Engine {
    options: EngineOptions,
    state: EngineState,
    ledger: Ledger,
    interactions: InteractionRegistry,
    dispatcher: Dispatcher,
    scheduler: Scheduler,
    watcher: MutationWatcher,
    announcer: Announcer,
    metrics: Arc<EngineMetrics>,
    /// Bumped on every enable. Deferred work from an older session is skipped.
    session: u64,
    now_ms: u64,
}

impl Engine {
    /// Engine with the standard rules minus `options.disabled_rules`.
    pub fn new(options: EngineOptions) -> Self {
        let rules = RuleSet::standard().without(options.disabled_rules.as_slice());
        Self::with_rules(options, rules)
    }

    pub fn with_rules(options: EngineOptions, rules: RuleSet) -> Self {
        let metrics = Arc::new(EngineMetrics::new());
        let classifier =
            ItemClassifier::new().with_fragments(options.item_class_patterns.iter().cloned());
        debug!(rules = ?rules.names(), "Engine created");

        Self {
            state: EngineState::new(),
            ledger: Ledger::new(),
            interactions: InteractionRegistry::new(),
            dispatcher: Dispatcher::new(rules, metrics.clone()),
            scheduler: Scheduler::new(),
            watcher: MutationWatcher::new(classifier, options.gc_threshold),
            announcer: Announcer::new(options.announce_delay_ms),
            metrics,
            session: 0,
            now_ms: 0,
            options,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// `Disabled -> Enabled`. Returns false if already enabled.
    pub fn enable(&mut self, doc: &mut Document) -> bool {
        if self.state.enabled {
            debug!("Engine already enabled");
            return false;
        }
        self.state.enabled = true;
        self.session += 1;
        self.scheduler.begin_session(self.session);
        self.announcer.begin_session(self.session);

        singletons::inject_stylesheet(doc, &mut self.state);
        singletons::inject_skip_link(doc, &mut self.state, &self.options.skip_link_text);

        let body = doc.body();
        let mut scope = PassScope::new(doc, &mut self.ledger, &mut self.interactions);
        let local = self
            .dispatcher
            .run_local_pass(&mut scope, &self.state, body);
        let global = self.dispatcher.run_global_pass(
            &mut scope,
            &mut self.state,
            &mut self.announcer,
            self.now_ms,
            0,
        );

        self.watcher.activate(doc, &mut self.state);
        self.metrics.mark_enabled();
        info!(
            session = self.session,
            writes = local.writes + global.writes,
            tracked_nodes = self.ledger.len(),
            "Engine enabled"
        );
        true
    }

    /// `Enabled -> Disabled`: detach, remove singletons and listeners, and
    /// roll every tracked write back. Returns false if already disabled.
    ///
    /// Frame tasks and timers already queued are left in place; they skip
    /// themselves when they run, even if the engine is enabled again first.
    pub fn disable(&mut self, doc: &mut Document) -> bool {
        if !self.state.enabled {
            debug!("Engine already disabled");
            return false;
        }

        self.watcher.deactivate(doc, &mut self.state);
        let singletons = singletons::remove_singletons(doc, &mut self.state);
        let listeners = doc.remove_listeners_by_owner(LISTENER_OWNER);
        self.interactions.clear();
        let report = self.ledger.rollback_all(doc);
        self.state.reset();

        self.metrics.record_rollback();
        self.metrics.mark_disabled();
        info!(
            restored = report.restored,
            skipped = report.skipped,
            singletons,
            listeners,
            "Engine disabled"
        );
        true
    }

    /// Flip the lifecycle state. Returns the new state.
    pub fn toggle(&mut self, doc: &mut Document) -> LifecycleState {
        if self.state.enabled {
            self.disable(doc);
        } else {
            self.enable(doc);
        }
        self.state()
    }

    // ========================================================================
    // Driving
    // ========================================================================

    /// Advance the clock to `now_ms` and run one turn of each queue:
    /// mutation delivery, due timers, then one animation frame.
    pub fn tick(&mut self, doc: &mut Document, now_ms: u64) -> TickReport {
        self.now_ms = self.now_ms.max(now_ms);
        let mut report = TickReport::default();

        if let Some(batch) = self.deliver_mutations(doc) {
            report.records = batch.records;
            report.roots = batch.roots.len();
        }
        report.announced = self.fire_timers(doc);

        let (run, skipped) = self.run_frame(doc);
        report.tasks_run = run;
        report.tasks_skipped = skipped;
        report
    }

    /// Observer callback turn: classify queued records, schedule the local
    /// and global cadences, and collect garbage when due.
    pub fn deliver_mutations(&mut self, doc: &mut Document) -> Option<ObservationBatch> {
        let batch = self.watcher.collect(doc, &mut self.state)?;
        self.metrics.record_batch(batch.item_count);

        if !batch.roots.is_empty() {
            self.scheduler.schedule_local(batch.roots.clone());
            if !self
                .scheduler
                .schedule_global(&mut self.state, batch.item_count)
            {
                self.metrics.record_global_coalesced();
            }
        }

        if batch.gc_due {
            self.garbage_collect(doc);
        }
        Some(batch)
    }

    /// Write announcements whose delay has elapsed.
    pub fn fire_timers(&mut self, doc: &mut Document) -> usize {
        self.announcer.fire_due(doc, &self.state, self.now_ms)
    }

    /// Run every task requested before this frame. Returns (run, skipped).
    pub fn run_frame(&mut self, doc: &mut Document) -> (usize, usize) {
        let tasks = self.scheduler.take_frame();
        if tasks.is_empty() {
            return (0, 0);
        }
        self.metrics.record_frame();

        let mut run = 0;
        let mut skipped = 0;
        for task in tasks {
            if !self.state.enabled || task.session() != self.session {
                debug!(?task, session = self.session, "Skipping stale frame task");
                self.metrics.record_skipped_task();
                skipped += 1;
                continue;
            }

            let mut scope = PassScope::new(doc, &mut self.ledger, &mut self.interactions);
            match task {
                FrameTask::LocalPass { roots, .. } => {
                    for root in roots {
                        self.dispatcher.run_local_pass(&mut scope, &self.state, root);
                    }
                }
                FrameTask::GlobalPass { .. } => {
                    let count = self.scheduler.begin_global(&mut self.state);
                    self.dispatcher.run_global_pass(
                        &mut scope,
                        &mut self.state,
                        &mut self.announcer,
                        self.now_ms,
                        count,
                    );
                }
            }
            run += 1;
        }
        (run, skipped)
    }

    /// Route an input event to the interaction state on `target` or its
    /// ancestors. Ignored while disabled.
    pub fn dispatch_event(&mut self, doc: &mut Document, target: NodeId, event: DomEvent) -> bool {
        if !self.state.enabled {
            return false;
        }
        let mut writer = TrackedWriter::new(doc, &mut self.ledger);
        let handled = self.interactions.dispatch(&mut writer, target, event);
        self.metrics.record_writes(writer.writes());
        if handled {
            self.metrics.record_event_handled();
        }
        handled
    }

    /// Drop ledger entries and interaction state for disconnected nodes.
    pub fn garbage_collect(&mut self, doc: &Document) -> usize {
        let evicted = self.ledger.garbage_collect(doc);
        let interactions = self.interactions.retain_connected(doc);
        self.metrics.record_gc(evicted);
        debug!(evicted, interactions, "Garbage collection complete");
        evicted
    }

    /// Nothing queued: no undelivered records, no frame tasks, no timers.
    pub fn is_idle(&self, doc: &Document) -> bool {
        self.scheduler.is_idle() && self.announcer.pending() == 0 && !self.watcher.has_pending(doc)
    }

    /// Earliest timer deadline, if any timer is pending.
    pub fn next_deadline(&self) -> Option<u64> {
        self.announcer.next_deadline()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> LifecycleState {
        if self.state.enabled {
            LifecycleState::Enabled
        } else {
            LifecycleState::Disabled
        }
    }

    /// Current enable session, zero before the first enable.
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn engine_state(&self) -> &EngineState {
        &self.state
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn interactions(&self) -> &InteractionRegistry {
        &self.interactions
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn rules(&self) -> &RuleSet {
        self.dispatcher.rules()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn metrics_handle(&self) -> Arc<EngineMetrics> {
        self.metrics.clone()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state())
            .field("session", &self.session)
            .field("tracked_nodes", &self.ledger.len())
            .field("interactions", &self.interactions.len())
            .field("pending_tasks", &self.scheduler.pending())
            .field("frames_run", &self.scheduler.frames_run())
            .field("global_requests", &self.scheduler.global_requests())
            .field("global_scheduled", &self.scheduler.global_scheduled())
            .field("rules", &self.dispatcher.rules().names())
            .finish()
    }
}
