//! Animation-frame task queue.

use std::collections::VecDeque;

/// Single-consumer queue of tasks for the next animation frame.
///
/// [`FrameQueue::begin_frame`] hands out everything requested so far;
/// tasks requested while those run land in the following frame.
#[derive(Debug)]
pub struct FrameQueue<T> {
    pending: VecDeque<T>,
    frames_run: u64,
}

impl<T> FrameQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            frames_run: 0,
        }
    }

    /// Request `task` on the next frame.
    pub fn request(&mut self, task: T) {
        self.pending.push_back(task);
    }

    /// Take the tasks for this frame, in request order.
    pub fn begin_frame(&mut self) -> Vec<T> {
        self.frames_run += 1;
        self.pending.drain(..).collect()
    }

    /// Tasks waiting for the next frame.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Frames started so far.
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }
}

impl<T> Default for FrameQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
