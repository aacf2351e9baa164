//! Platform abstraction for the feedscroll runtime.
//!
//! The host decides when frames are produced; the runtime only asks for one.

/// Schedules work for the runtime.
///
/// Implementations are responsible for triggering frame processing on behalf
/// of the runtime. They must be safe to use from multiple threads because
/// background work wakes the runtime through them.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Scheduler for hosts that pump frames on a fixed cadence anyway.
#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}
