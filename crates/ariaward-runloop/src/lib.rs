//! # ariaward RunLoop
//!
//! Decides *when* enhancement happens.
//!
//! The host page is single-threaded and cooperative, so suspension points
//! are explicit queues drained by the engine's tick:
//!
//! ```text
//!  mutation records ──► MutationWatcher ──► Scheduler
//!                           │                  ├── FrameTask::LocalPass { roots }   (one per batch)
//!                           │                  └── FrameTask::GlobalPass            (coalesced)
//!                           └── gc_due every N batches
//!
//!  tick(now):  deliver records  →  fire due timers  →  run one frame
//! ```
//!
//! Frames follow `requestAnimationFrame` semantics: anything requested
//! while a frame runs is deferred to the next one.

pub mod frame;
pub mod metrics;
pub mod scheduler;
pub mod timer;
pub mod watcher;

pub use frame::FrameQueue;
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use scheduler::{FrameTask, Scheduler};
pub use timer::{TimerId, TimerQueue};
pub use watcher::{MutationWatcher, ObservationBatch, DEFAULT_GC_THRESHOLD};
