//! Headless stand-in for a windowing host: a frame loop and scroll surfaces
//! that lay records out on a fixed grid.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use feedscroll_core::{FrameClock, Runtime, RuntimeHandle, RuntimeScheduler};
use feedscroll_gestures::{Axis, DragCursor, ScrollGeometry, ScrollSurface};
use web_time::{Duration, Instant};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Default)]
struct HostScheduler {
    requested: AtomicBool,
}

impl RuntimeScheduler for HostScheduler {
    fn schedule_frame(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }
}

/// Pumps the runtime at a nominal 60 Hz.
pub struct FrameLoop {
    runtime: Runtime,
    scheduler: Arc<HostScheduler>,
    started: Instant,
}

impl FrameLoop {
    pub fn new() -> Self {
        let scheduler = Arc::new(HostScheduler::default());
        Self {
            runtime: Runtime::new(scheduler.clone()),
            scheduler,
            started: Instant::now(),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn frame_clock(&self) -> FrameClock {
        self.runtime.frame_clock()
    }

    /// Milliseconds since the loop started; the time base for pointer samples.
    pub fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Runs pending UI work and, when anything asked for one, a frame.
    pub fn tick(&self) {
        let handle = self.runtime.handle();
        handle.drain_ui();
        let requested = self.scheduler.requested.swap(false, Ordering::SeqCst);
        if requested || handle.has_frame_callbacks() {
            let nanos = self.started.elapsed().as_nanos() as u64;
            handle.drain_frame_callbacks(nanos);
            handle.drain_ui();
        }
    }

    pub fn sleep_frame(&self) {
        std::thread::sleep(FRAME_INTERVAL);
    }

    /// Ticks until `done` holds or `max_frames` pass. Returns whether `done` held.
    pub fn run_until(&self, max_frames: usize, mut done: impl FnMut() -> bool) -> bool {
        for _ in 0..max_frames {
            self.tick();
            if done() {
                return true;
            }
            self.sleep_frame();
        }
        done()
    }
}

/// One axis of a list whose items all have the same size.
pub struct HeadlessSurface {
    axis: Axis,
    item_extent: f32,
    viewport: f32,
    position: Cell<f32>,
    extent: Cell<f32>,
    scrolled: Cell<bool>,
}

impl HeadlessSurface {
    pub fn new(axis: Axis, viewport: f32, item_extent: f32) -> Self {
        Self {
            axis,
            item_extent,
            viewport,
            position: Cell::new(0.0),
            extent: Cell::new(0.0),
            scrolled: Cell::new(false),
        }
    }

    pub fn set_item_count(&self, count: usize) {
        self.extent.set(count as f32 * self.item_extent);
        self.move_to(self.position.get());
    }

    /// Wheel-style relative scroll.
    pub fn scroll_by(&self, delta: f32) {
        self.move_to(self.position.get() + delta);
    }

    /// Whether the offset changed since the last call; the host turns this
    /// into a scroll event.
    pub fn take_scrolled(&self) -> bool {
        self.scrolled.replace(false)
    }

    pub fn first_visible_index(&self) -> usize {
        (self.position.get() / self.item_extent).floor() as usize
    }

    pub fn position(&self) -> f32 {
        self.position.get()
    }

    fn move_to(&self, position: f32) {
        let max = (self.extent.get() - self.viewport).max(0.0);
        let clamped = position.clamp(0.0, max);
        if clamped != self.position.get() {
            self.position.set(clamped);
            self.scrolled.set(true);
        }
    }
}

impl ScrollSurface for HeadlessSurface {
    fn geometry(&self, axis: Axis) -> ScrollGeometry {
        if axis != self.axis {
            return ScrollGeometry::new(0.0, 0.0, self.viewport);
        }
        ScrollGeometry::new(self.position.get(), self.extent.get(), self.viewport)
    }

    fn set_scroll_offset(&self, axis: Axis, offset: f32) {
        if axis == self.axis {
            self.move_to(offset);
        }
    }

    fn set_smooth_scrolling(&self, enabled: bool) {
        log::trace!("{:?} smooth scrolling {}", self.axis, if enabled { "on" } else { "off" });
    }

    fn set_cursor(&self, cursor: DragCursor) {
        log::trace!("{:?} cursor {cursor:?}", self.axis);
    }
}
