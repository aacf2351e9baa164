use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use feedscroll_core::FrameClock;
use feedscroll_gestures::{Axis, EdgeThreshold, ScrollSurface, ScrollTriggerController};
use feedscroll_paging::{PagingDataStore, Record, RecordId};

use crate::image::ImageFallbacks;

struct FooterInner {
    store: PagingDataStore,
    records: RefCell<Rc<Vec<Record>>>,
    revision: Cell<u64>,
    trigger: ScrollTriggerController,
    images: ImageFallbacks,
}

impl FooterInner {
    fn refresh(&self) {
        *self.records.borrow_mut() = self.store.snapshot();
        self.revision.set(self.revision.get() + 1);
    }
}

/// Unfiltered vertical list over the same store as the carousel.
pub struct RecipeFooter {
    inner: Rc<FooterInner>,
}

impl RecipeFooter {
    pub fn new(store: PagingDataStore, surface: Rc<dyn ScrollSurface>, frame_clock: FrameClock) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<FooterInner>| {
            let weak = weak.clone();
            let trigger = ScrollTriggerController::new(
                store.clone(),
                surface,
                Axis::Vertical,
                EdgeThreshold::vertical_list(),
                frame_clock,
            )
            .on_records_changed(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.refresh();
                }
            });
            FooterInner {
                store,
                records: RefCell::new(Rc::new(Vec::new())),
                revision: Cell::new(0),
                trigger,
                images: ImageFallbacks::default(),
            }
        });

        inner.refresh();
        if inner.store.is_empty() {
            inner.store.initialize();
        }
        Self { inner }
    }

    pub fn records(&self) -> Rc<Vec<Record>> {
        Rc::clone(&self.inner.records.borrow())
    }

    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    pub fn on_scroll(&self) {
        self.inner.trigger.on_scroll();
    }

    pub fn image_failed(&self, id: RecordId) {
        self.inner.images.mark_failed(id);
    }

    pub fn image_url<'a>(&self, record: &'a Record) -> &'a str {
        self.inner.images.url_for(record)
    }

    pub fn trigger(&self) -> &ScrollTriggerController {
        &self.inner.trigger
    }

    pub fn teardown(&self) {
        self.inner.trigger.teardown();
    }
}

impl Drop for RecipeFooter {
    fn drop(&mut self) {
        self.teardown();
    }
}
