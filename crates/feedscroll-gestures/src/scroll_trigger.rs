//! Edge-proximity load trigger.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use feedscroll_core::{FrameCallbackRegistration, FrameClock, Subscription};
use feedscroll_paging::PagingDataStore;

use crate::edge::EdgeThreshold;
use crate::geometry::{Axis, ScrollSurface};

struct TriggerInner {
    store: PagingDataStore,
    surface: Rc<dyn ScrollSurface>,
    axis: Axis,
    threshold: EdgeThreshold,
    frame_clock: FrameClock,
    /// Pending coalesced scroll sample.
    sample_frame: RefCell<Option<FrameCallbackRegistration>>,
    /// Pending release of `awaiting` after a records-changed notification.
    settle_frame: RefCell<Option<FrameCallbackRegistration>>,
    /// Set from a successful check until the resulting page has been applied
    /// and rendered, or the request failed or was cancelled.
    awaiting: Cell<bool>,
    on_records_changed: RefCell<Option<Rc<dyn Fn()>>>,
    subscriptions: RefCell<Vec<Subscription>>,
    torn_down: Cell<bool>,
}

/// Asks the store for another page when a surface nears the end of its content.
///
/// Scroll events are coalesced so at most one proximity check runs per frame.
/// A check fires only when the threshold is met, no load is in flight, the list
/// is not complete, and no earlier request from this trigger is still awaiting
/// its page.
///
/// The trigger is also the view's single "records changed" subscription: the
/// callback given to [`ScrollTriggerController::on_records_changed`] runs on
/// every successful page append, before the awaiting flag is released on the
/// following frame.
#[derive(Clone)]
pub struct ScrollTriggerController {
    inner: Rc<TriggerInner>,
}

impl ScrollTriggerController {
    pub fn new(
        store: PagingDataStore,
        surface: Rc<dyn ScrollSurface>,
        axis: Axis,
        threshold: EdgeThreshold,
        frame_clock: FrameClock,
    ) -> Self {
        let inner = Rc::new(TriggerInner {
            store,
            surface,
            axis,
            threshold,
            frame_clock,
            sample_frame: RefCell::new(None),
            settle_frame: RefCell::new(None),
            awaiting: Cell::new(false),
            on_records_changed: RefCell::new(None),
            subscriptions: RefCell::new(Vec::new()),
            torn_down: Cell::new(false),
        });
        TriggerInner::attach(&inner);
        Self { inner }
    }

    /// Sets the callback run after every successful page append.
    pub fn on_records_changed(self, callback: impl Fn() + 'static) -> Self {
        *self.inner.on_records_changed.borrow_mut() = Some(Rc::new(callback));
        self
    }

    /// Notes a scroll event. The proximity check runs on the next frame; further
    /// events before then are folded into that one check.
    pub fn on_scroll(&self) {
        if self.inner.torn_down.get() || self.inner.sample_frame.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let registration = self.inner.frame_clock.with_frame_nanos(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.sample_frame.borrow_mut().take();
                inner.check();
            }
        });
        *self.inner.sample_frame.borrow_mut() = Some(registration);
    }

    /// Runs the proximity check now. Returns whether a page request was issued.
    pub fn check(&self) -> bool {
        self.inner.check()
    }

    pub fn is_awaiting(&self) -> bool {
        self.inner.awaiting.get()
    }

    pub fn axis(&self) -> Axis {
        self.inner.axis
    }

    pub fn threshold(&self) -> EdgeThreshold {
        self.inner.threshold
    }

    pub fn store(&self) -> &PagingDataStore {
        &self.inner.store
    }

    /// Cancels pending frames and drops every subscription. Idempotent.
    pub fn teardown(&self) {
        let inner = &self.inner;
        if inner.torn_down.replace(true) {
            return;
        }
        inner.sample_frame.borrow_mut().take();
        inner.settle_frame.borrow_mut().take();
        inner.subscriptions.borrow_mut().clear();
        inner.on_records_changed.borrow_mut().take();
        inner.awaiting.set(false);
        log::trace!("scroll trigger on {:?} torn down", inner.axis);
    }
}

impl TriggerInner {
    fn attach(this: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(this);
        let changed = this.store.subscribe_records_changed(move || {
            if let Some(inner) = weak.upgrade() {
                inner.records_changed();
            }
        });

        let weak: Weak<Self> = Rc::downgrade(this);
        let failed = this.store.subscribe_load_failed(move |error| {
            if let Some(inner) = weak.upgrade() {
                log::debug!("page request failed ({error}); trigger re-armed");
                inner.release();
            }
        });

        let weak: Weak<Self> = Rc::downgrade(this);
        let cancelled = this.store.subscribe_load_cancelled(move || {
            if let Some(inner) = weak.upgrade() {
                log::debug!("page request cancelled; trigger re-armed");
                inner.release();
            }
        });

        this.subscriptions
            .borrow_mut()
            .extend([changed, failed, cancelled]);
    }

    fn release(&self) {
        self.settle_frame.borrow_mut().take();
        self.awaiting.set(false);
    }

    fn check(&self) -> bool {
        if self.torn_down.get() {
            return false;
        }
        let geometry = self.surface.geometry(self.axis);
        if !self.threshold.is_near_end(geometry) {
            return false;
        }
        if self.awaiting.get() || self.store.is_loading() || self.store.is_complete() {
            log::trace!(
                "near end on {:?} but suppressed (awaiting={}, loading={}, complete={})",
                self.axis,
                self.awaiting.get(),
                self.store.is_loading(),
                self.store.is_complete()
            );
            return false;
        }

        log::debug!(
            "near end on {:?} at {:.0}/{:.0}; requesting more",
            self.axis,
            geometry.position + geometry.viewport,
            geometry.extent
        );
        self.awaiting.set(true);
        let issued = self.store.load_more();
        if !issued {
            self.awaiting.set(false);
        }
        issued
    }

    fn records_changed(self: Rc<Self>) {
        if self.torn_down.get() {
            return;
        }
        let callback = self.on_records_changed.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }

        if !self.awaiting.get() || self.settle_frame.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(&self);
        let registration = self.frame_clock.with_frame_nanos(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.settle_frame.borrow_mut().take();
                inner.awaiting.set(false);
            }
        });
        *self.settle_frame.borrow_mut() = Some(registration);
    }
}

impl std::fmt::Debug for ScrollTriggerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollTriggerController")
            .field("axis", &self.inner.axis)
            .field("threshold", &self.inner.threshold)
            .field("awaiting", &self.inner.awaiting.get())
            .finish()
    }
}
