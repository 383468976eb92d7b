//! Screen reader announcements through a polite live region.
//!
//! The region text is cleared immediately and the message written after a
//! short delay, so repeating the same message is still re-announced.
//! Pending messages belong to the enable session that queued them and are
//! dropped if they come due in a later one.

use tracing::{debug, warn};

use ariaward_core::EngineState;
use ariaward_dom::Document;
use ariaward_runloop::TimerQueue;

use crate::singletons;

pub const DEFAULT_ANNOUNCE_DELAY_MS: u64 = 50;

#[derive(Debug)]
struct PendingAnnouncement {
    session: u64,
    message: String,
}

#[derive(Debug)]
pub struct Announcer {
    delay_ms: u64,
    session: u64,
    timers: TimerQueue<PendingAnnouncement>,
}

impl Announcer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            session: 0,
            timers: TimerQueue::new(),
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Tag announcements queued from now on with `session`.
    pub fn begin_session(&mut self, session: u64) {
        self.session = session;
    }

    /// Clear the live region now and schedule `message` to be written.
    pub fn announce(
        &mut self,
        doc: &mut Document,
        state: &mut EngineState,
        now_ms: u64,
        message: impl Into<String>,
    ) -> bool {
        if !state.enabled {
            return false;
        }
        let Some(region) = singletons::ensure_live_region(doc, state) else {
            return false;
        };
        if let Err(e) = doc.set_text_content(region, "") {
            warn!("Failed to clear live region: {}", e);
            return false;
        }
        let pending = PendingAnnouncement {
            session: self.session,
            message: message.into(),
        };
        debug!(session = pending.session, message = %pending.message, "Announcement scheduled");
        self.timers.schedule(now_ms, self.delay_ms, pending);
        true
    }

    /// Write every message whose delay has elapsed. Skipped while disabled;
    /// messages from an earlier session are dropped.
    pub fn fire_due(&mut self, doc: &mut Document, state: &EngineState, now_ms: u64) -> usize {
        let due = self.timers.take_due(now_ms);
        if due.is_empty() {
            return 0;
        }
        if !state.enabled {
            debug!(dropped = due.len(), "Engine disabled, dropping announcements");
            return 0;
        }
        let Some(region) = state.live_region.filter(|r| doc.is_connected(*r)) else {
            return 0;
        };

        let (current, stale): (Vec<_>, Vec<_>) =
            due.into_iter().partition(|p| p.session == self.session);
        if !stale.is_empty() {
            debug!(dropped = stale.len(), session = self.session, "Dropping stale announcements");
        }

        let mut written = 0;
        for PendingAnnouncement { message, .. } in current {
            match doc.set_text_content(region, &message) {
                Ok(()) => {
                    debug!(%message, "Announced");
                    written += 1;
                }
                Err(e) => warn!("Failed to write announcement: {}", e),
            }
        }
        written
    }

    /// Announcements waiting on their delay.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }
}

impl Default for Announcer {
    fn default() -> Self {
        Self::new(DEFAULT_ANNOUNCE_DELAY_MS)
    }
}
