use std::sync::Arc;

use feedscroll_core::{DefaultScheduler, FrameClock, Runtime, RuntimeHandle};

/// Nominal 60 Hz frame step.
pub const FRAME_INTERVAL_NANOS: u64 = 16_000_000;

/// Drives a [`Runtime`] one frame at a time.
///
/// A step drains UI work, runs one frame's callbacks, then drains UI work
/// again so tasks woken by the frame settle before the test looks at state.
pub struct FrameDriver {
    runtime: Runtime,
    frame_time_nanos: u64,
    frames: usize,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            runtime: Runtime::new(Arc::new(DefaultScheduler)),
            frame_time_nanos: 0,
            frames: 0,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn frame_clock(&self) -> FrameClock {
        self.runtime.frame_clock()
    }

    /// Runs spawned tasks and queued UI work without advancing the frame.
    pub fn drain(&self) {
        self.runtime.handle().drain_ui();
    }

    pub fn step(&mut self) {
        let handle = self.runtime.handle();
        handle.drain_ui();
        self.frame_time_nanos += FRAME_INTERVAL_NANOS;
        self.frames += 1;
        handle.drain_frame_callbacks(self.frame_time_nanos);
        handle.drain_ui();
    }

    pub fn steps(&mut self, count: usize) {
        for _ in 0..count {
            self.step();
        }
    }

    pub fn has_pending_frame(&self) -> bool {
        self.runtime.handle().has_frame_callbacks()
    }

    /// Steps until no frame callbacks remain. Returns the frames stepped.
    ///
    /// # Panics
    ///
    /// When the runtime still wants frames after `max_frames`.
    pub fn pump_until_idle(&mut self, max_frames: usize) -> usize {
        self.drain();
        let mut stepped = 0;
        while self.has_pending_frame() {
            assert!(
                stepped < max_frames,
                "runtime still scheduling frames after {max_frames} steps"
            );
            self.step();
            stepped += 1;
        }
        stepped
    }

    /// Frames stepped since construction.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn frame_time_millis(&self) -> f64 {
        self.frame_time_nanos as f64 / 1_000_000.0
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}
