//! Pointer drag scrolling with momentum on release.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use feedscroll_core::{FrameCallbackRegistration, FrameClock};

use crate::gesture_constants::{
    DRAG_CHECK_INTERVAL, DRAG_GAIN, FRICTION, MOMENTUM_CHECK_INTERVAL, NOMINAL_FRAME_MS,
    VELOCITY_CUTOFF,
};
use crate::geometry::{Axis, DragCursor, ScrollSurface};
use crate::scroll_trigger::ScrollTriggerController;

const AXIS: Axis = Axis::Horizontal;

/// Tuning for [`MomentumDragController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MomentumConfig {
    pub drag_gain: f32,
    pub friction: f32,
    pub velocity_cutoff: f32,
    pub frame_time_ms: f32,
    pub drag_check_interval: u64,
    pub momentum_check_interval: u64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            drag_gain: DRAG_GAIN,
            friction: FRICTION,
            velocity_cutoff: VELOCITY_CUTOFF,
            frame_time_ms: NOMINAL_FRAME_MS,
            drag_check_interval: DRAG_CHECK_INTERVAL,
            momentum_check_interval: MOMENTUM_CHECK_INTERVAL,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    Settling,
}

/// A pointer position along the drag axis, with its timestamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub time_ms: f64,
}

impl PointerSample {
    pub fn new(x: f32, time_ms: f64) -> Self {
        Self { x, time_ms }
    }
}

/// State of one drag, from pointer-down until momentum ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// Pointer position at pointer-down, relative to the surface's leading edge.
    pub anchor_pointer_x: f32,
    pub anchor_scroll_offset: f32,
    pub last_pointer_x: f32,
    pub last_sample_time_ms: f64,
    /// Units per millisecond, pointer direction.
    pub velocity: f32,
}

struct MomentumInner {
    surface: Rc<dyn ScrollSurface>,
    frame_clock: FrameClock,
    config: MomentumConfig,
    edge_check: RefCell<Option<ScrollTriggerController>>,
    phase: Cell<DragPhase>,
    session: Cell<Option<DragSession>>,
    /// Latest drag target, written on the next frame.
    pending_offset: Cell<Option<f32>>,
    frame_count: Cell<u64>,
    drag_frame: RefCell<Option<FrameCallbackRegistration>>,
    momentum_frame: RefCell<Option<FrameCallbackRegistration>>,
}

/// Drag-to-scroll for a horizontal surface.
///
/// While dragging, offset writes are coalesced to one per frame. After
/// release the surface keeps moving with the last pointer velocity, decayed
/// by `friction` each frame, until the velocity drops below
/// `velocity_cutoff`. Native smooth scrolling is off from pointer-down until
/// momentum ends.
///
/// When an edge check is attached it runs every `drag_check_interval` drag
/// frames and every `momentum_check_interval` momentum frames, on a counter
/// shared by both phases.
#[derive(Clone)]
pub struct MomentumDragController {
    inner: Rc<MomentumInner>,
}

impl MomentumDragController {
    pub fn new(surface: Rc<dyn ScrollSurface>, frame_clock: FrameClock, config: MomentumConfig) -> Self {
        Self {
            inner: Rc::new(MomentumInner {
                surface,
                frame_clock,
                config,
                edge_check: RefCell::new(None),
                phase: Cell::new(DragPhase::Idle),
                session: Cell::new(None),
                pending_offset: Cell::new(None),
                frame_count: Cell::new(0),
                drag_frame: RefCell::new(None),
                momentum_frame: RefCell::new(None),
            }),
        }
    }

    pub fn with_edge_check(self, trigger: ScrollTriggerController) -> Self {
        *self.inner.edge_check.borrow_mut() = Some(trigger);
        self
    }

    pub fn pointer_down(&self, sample: PointerSample) {
        let inner = &self.inner;
        if inner.phase.get() == DragPhase::Settling {
            log::trace!("pointer down interrupts momentum");
        }
        inner.cancel_frames();

        let surface = &inner.surface;
        let session = DragSession {
            anchor_pointer_x: sample.x - surface.offset_left(),
            anchor_scroll_offset: surface.geometry(AXIS).position,
            last_pointer_x: sample.x,
            last_sample_time_ms: sample.time_ms,
            velocity: 0.0,
        };
        inner.session.set(Some(session));
        inner.phase.set(DragPhase::Dragging);
        surface.set_smooth_scrolling(false);
        surface.set_cursor(DragCursor::Grabbing);
        log::trace!("drag started at x={} offset={}", sample.x, session.anchor_scroll_offset);
    }

    pub fn pointer_move(&self, sample: PointerSample) {
        let inner = &self.inner;
        if inner.phase.get() != DragPhase::Dragging {
            return;
        }
        let Some(mut session) = inner.session.get() else {
            return;
        };

        let elapsed = sample.time_ms - session.last_sample_time_ms;
        if elapsed > 0.0 {
            session.velocity = (sample.x - session.last_pointer_x) / elapsed as f32;
        }
        session.last_pointer_x = sample.x;
        session.last_sample_time_ms = sample.time_ms;
        inner.session.set(Some(session));

        let pointer = sample.x - inner.surface.offset_left();
        let travel = (pointer - session.anchor_pointer_x) * inner.config.drag_gain;
        inner
            .pending_offset
            .set(Some(session.anchor_scroll_offset - travel));

        if inner.drag_frame.borrow().is_none() {
            let registration = MomentumInner::next_frame(inner, MomentumInner::step_drag);
            *inner.drag_frame.borrow_mut() = Some(registration);
        }
    }

    pub fn pointer_up(&self) {
        let inner = &self.inner;
        if inner.phase.get() != DragPhase::Dragging {
            return;
        }
        inner.surface.set_cursor(DragCursor::Grab);
        // The last move of a drag is dropped if its frame has not run yet.
        inner.drag_frame.borrow_mut().take();
        inner.pending_offset.set(None);

        inner.phase.set(DragPhase::Settling);
        log::trace!("drag released with velocity {}", self.velocity());
        let registration = MomentumInner::next_frame(inner, MomentumInner::step_momentum);
        *inner.momentum_frame.borrow_mut() = Some(registration);
    }

    /// Stops any drag or momentum in progress. Idempotent.
    pub fn teardown(&self) {
        let inner = &self.inner;
        let phase = inner.phase.replace(DragPhase::Idle);
        inner.cancel_frames();
        inner.session.set(None);
        if phase != DragPhase::Idle {
            inner.surface.set_cursor(DragCursor::Grab);
            inner.surface.set_smooth_scrolling(true);
        }
        inner.edge_check.borrow_mut().take();
    }

    pub fn phase(&self) -> DragPhase {
        self.inner.phase.get()
    }

    pub fn session(&self) -> Option<DragSession> {
        self.inner.session.get()
    }

    pub fn velocity(&self) -> f32 {
        self.inner.session.get().map_or(0.0, |session| session.velocity)
    }

    pub fn config(&self) -> MomentumConfig {
        self.inner.config
    }

    /// Frames run since construction, drag and momentum alike.
    pub fn frame_count(&self) -> u64 {
        self.inner.frame_count.get()
    }
}

impl MomentumInner {
    fn next_frame(this: &Rc<Self>, step: fn(&Rc<Self>)) -> FrameCallbackRegistration {
        let weak: Weak<Self> = Rc::downgrade(this);
        this.frame_clock.with_frame_nanos(move |_| {
            if let Some(inner) = weak.upgrade() {
                step(&inner);
            }
        })
    }

    fn step_drag(this: &Rc<Self>) {
        this.drag_frame.borrow_mut().take();
        if this.phase.get() != DragPhase::Dragging {
            return;
        }
        if let Some(offset) = this.pending_offset.take() {
            this.surface.set_scroll_offset(AXIS, offset);
        }
        this.count_frame(this.config.drag_check_interval);
    }

    fn step_momentum(this: &Rc<Self>) {
        this.momentum_frame.borrow_mut().take();
        if this.phase.get() != DragPhase::Settling {
            return;
        }
        let Some(mut session) = this.session.get() else {
            this.finish_settling();
            return;
        };
        if session.velocity.abs() < this.config.velocity_cutoff {
            this.finish_settling();
            return;
        }

        let position = this.surface.geometry(AXIS).position;
        this.surface
            .set_scroll_offset(AXIS, position - session.velocity * this.config.frame_time_ms);
        session.velocity *= this.config.friction;
        this.session.set(Some(session));
        this.count_frame(this.config.momentum_check_interval);

        // The edge check may have torn the controller down.
        if this.phase.get() == DragPhase::Settling {
            let registration = Self::next_frame(this, Self::step_momentum);
            *this.momentum_frame.borrow_mut() = Some(registration);
        }
    }

    fn count_frame(&self, interval: u64) {
        let frame = self.frame_count.get() + 1;
        self.frame_count.set(frame);
        if interval == 0 || frame % interval != 0 {
            return;
        }
        let trigger = self.edge_check.borrow().clone();
        if let Some(trigger) = trigger {
            trigger.check();
        }
    }

    fn finish_settling(&self) {
        self.phase.set(DragPhase::Idle);
        self.session.set(None);
        self.surface.set_smooth_scrolling(true);
        log::trace!("momentum settled after {} frames", self.frame_count.get());
    }

    fn cancel_frames(&self) {
        self.drag_frame.borrow_mut().take();
        self.momentum_frame.borrow_mut().take();
        self.pending_offset.set(None);
    }
}

impl std::fmt::Debug for MomentumDragController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MomentumDragController")
            .field("phase", &self.inner.phase.get())
            .field("session", &self.inner.session.get())
            .field("frame_count", &self.inner.frame_count.get())
            .finish()
    }
}
