//! Engine metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Engine counters.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Animation frames run.
    pub frames: AtomicU64,

    /// Local passes executed (one per batch, plus one on enable).
    pub local_passes: AtomicU64,

    /// Global passes executed.
    pub global_passes: AtomicU64,

    /// Global pass triggers merged into an already pending pass.
    pub global_coalesced: AtomicU64,

    /// Deferred tasks skipped because the engine was disabled.
    pub skipped_tasks: AtomicU64,

    /// Mutation batches delivered to the watcher.
    pub mutation_batches: AtomicU64,

    /// Item-like nodes observed.
    pub items_observed: AtomicU64,

    /// Announcements written to the live region.
    pub announcements: AtomicU64,

    /// Ledger garbage collections.
    pub gc_runs: AtomicU64,

    /// Ledger entries evicted by garbage collection.
    pub gc_evicted: AtomicU64,

    /// Tracked document writes.
    pub tracked_writes: AtomicU64,

    /// Rule applications that reported an error.
    pub rule_failures: AtomicU64,

    /// Input events handled by interaction state.
    pub events_handled: AtomicU64,

    /// Full rollbacks.
    pub rollbacks: AtomicU64,

    /// Time the engine was last enabled.
    enabled_at: parking_lot::RwLock<Option<Instant>>,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the engine as enabled now.
    pub fn mark_enabled(&self) {
        *self.enabled_at.write() = Some(Instant::now());
    }

    /// Clear the enabled timestamp.
    pub fn mark_disabled(&self) {
        *self.enabled_at.write() = None;
    }

    /// Milliseconds since the engine was enabled, zero while disabled.
    pub fn enabled_for_ms(&self) -> u64 {
        self.enabled_at
            .read()
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    pub fn record_frame(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_local_pass(&self) {
        self.local_passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_global_pass(&self) {
        self.global_passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_global_coalesced(&self) {
        self.global_coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped_task(&self) {
        self.skipped_tasks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a mutation batch and the items it carried.
    pub fn record_batch(&self, items: u32) {
        self.mutation_batches.fetch_add(1, Ordering::Relaxed);
        self.items_observed.fetch_add(items as u64, Ordering::Relaxed);
    }

    pub fn record_announcement(&self) {
        self.announcements.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a garbage collection that evicted `evicted` entries.
    pub fn record_gc(&self, evicted: usize) {
        self.gc_runs.fetch_add(1, Ordering::Relaxed);
        self.gc_evicted.fetch_add(evicted as u64, Ordering::Relaxed);
    }

    pub fn record_writes(&self, count: u64) {
        self.tracked_writes.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_rule_failure(&self) {
        self.rule_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event_handled(&self) {
        self.events_handled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rollback(&self) {
        self.rollbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of the metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            enabled_for_ms: self.enabled_for_ms(),
            frames: self.frames.load(Ordering::Relaxed),
            local_passes: self.local_passes.load(Ordering::Relaxed),
            global_passes: self.global_passes.load(Ordering::Relaxed),
            global_coalesced: self.global_coalesced.load(Ordering::Relaxed),
            skipped_tasks: self.skipped_tasks.load(Ordering::Relaxed),
            mutation_batches: self.mutation_batches.load(Ordering::Relaxed),
            items_observed: self.items_observed.load(Ordering::Relaxed),
            announcements: self.announcements.load(Ordering::Relaxed),
            gc_runs: self.gc_runs.load(Ordering::Relaxed),
            gc_evicted: self.gc_evicted.load(Ordering::Relaxed),
            tracked_writes: self.tracked_writes.load(Ordering::Relaxed),
            rule_failures: self.rule_failures.load(Ordering::Relaxed),
            events_handled: self.events_handled.load(Ordering::Relaxed),
            rollbacks: self.rollbacks.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub enabled_for_ms: u64,
    pub frames: u64,
    pub local_passes: u64,
    pub global_passes: u64,
    pub global_coalesced: u64,
    pub skipped_tasks: u64,
    pub mutation_batches: u64,
    pub items_observed: u64,
    pub announcements: u64,
    pub gc_runs: u64,
    pub gc_evicted: u64,
    pub tracked_writes: u64,
    pub rule_failures: u64,
    pub events_handled: u64,
    pub rollbacks: u64,
}

impl MetricsSnapshot {
    /// Average global pass triggers per executed global pass.
    pub fn coalescing_ratio(&self) -> f64 {
        if self.global_passes == 0 {
            return 0.0;
        }
        (self.global_passes + self.global_coalesced) as f64 / self.global_passes as f64
    }

    /// Average tracked writes per pass.
    pub fn writes_per_pass(&self) -> f64 {
        let passes = self.local_passes + self.global_passes;
        if passes == 0 {
            return 0.0;
        }
        self.tracked_writes as f64 / passes as f64
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
