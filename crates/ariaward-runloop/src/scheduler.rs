//! Dual-cadence scheduling.
//!
//! - Local cadence: one [`FrameTask::LocalPass`] per observation batch.
//! - Global cadence: at most one pending [`FrameTask::GlobalPass`]; triggers
//!   that arrive while it is pending only add to the item count.
//!
//! Every task carries the enable session that requested it. Tasks are never
//! cancelled; the engine skips those from an earlier session when they run.

use serde::Serialize;
use tracing::debug;

use ariaward_core::EngineState;
use ariaward_dom::NodeId;

use crate::frame::FrameQueue;

/// Work requested for an animation frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FrameTask {
    /// Run local rules over each root.
    LocalPass { session: u64, roots: Vec<NodeId> },
    /// Run global rules and announce the pending item count.
    GlobalPass { session: u64 },
}

impl FrameTask {
    /// Enable session that requested this task.
    pub fn session(&self) -> u64 {
        match self {
            FrameTask::LocalPass { session, .. } | FrameTask::GlobalPass { session } => *session,
        }
    }
}

/// Owns the frame queue and the coalescing discipline.
#[derive(Debug, Default)]
pub struct Scheduler {
    frames: FrameQueue<FrameTask>,
    session: u64,
    global_requests: u64,
    global_scheduled: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp tasks requested from now on with `session`.
    pub fn begin_session(&mut self, session: u64) {
        debug!(session, "Scheduler session started");
        self.session = session;
    }

    /// Session stamped on new tasks.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Queue a local pass over `roots`. Empty batches queue nothing.
    pub fn schedule_local(&mut self, roots: Vec<NodeId>) -> bool {
        if roots.is_empty() {
            return false;
        }
        debug!(roots = roots.len(), "Scheduled local pass");
        self.frames.request(FrameTask::LocalPass {
            session: self.session,
            roots,
        });
        true
    }

    /// Add `item_count` to the pending count and queue a global pass unless
    /// one is already pending. Returns true if a task was queued.
    pub fn schedule_global(&mut self, state: &mut EngineState, item_count: u32) -> bool {
        self.global_requests += 1;
        state.pending_item_count = state.pending_item_count.saturating_add(item_count);
        if state.scheduled_global_pass {
            debug!(
                pending = state.pending_item_count,
                "Global pass already scheduled, coalescing"
            );
            return false;
        }
        state.scheduled_global_pass = true;
        self.global_scheduled += 1;
        self.frames.request(FrameTask::GlobalPass {
            session: self.session,
        });
        true
    }

    /// Called when a global pass task starts: clears the coalescing flag and
    /// takes the accumulated item count.
    pub fn begin_global(&mut self, state: &mut EngineState) -> u32 {
        state.scheduled_global_pass = false;
        state.take_pending_items()
    }

    /// Tasks for the frame that is starting.
    pub fn take_frame(&mut self) -> Vec<FrameTask> {
        self.frames.begin_frame()
    }

    /// Tasks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.frames.len()
    }

    pub fn is_idle(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames started so far.
    pub fn frames_run(&self) -> u64 {
        self.frames.frames_run()
    }

    /// Global pass triggers received, coalesced or not.
    pub fn global_requests(&self) -> u64 {
        self.global_requests
    }

    /// Global pass tasks actually queued.
    pub fn global_scheduled(&self) -> u64 {
        self.global_scheduled
    }
}
