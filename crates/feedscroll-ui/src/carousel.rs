use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use feedscroll_core::FrameClock;
use feedscroll_gestures::{
    Axis, EdgeThreshold, MomentumConfig, MomentumDragController, PointerSample,
    ScrollSurface, ScrollTriggerController,
};
use feedscroll_paging::{
    project, DifficultySelector, FilterSelectors, MealTypeSelector, PagingDataStore, Record,
    RecordId,
};

use crate::image::ImageFallbacks;

struct CarouselInner {
    store: PagingDataStore,
    selectors: Cell<FilterSelectors>,
    visible: RefCell<Rc<Vec<Record>>>,
    revision: Cell<u64>,
    trigger: ScrollTriggerController,
    drag: MomentumDragController,
    images: ImageFallbacks,
}

impl CarouselInner {
    fn refresh(&self) {
        let selectors = self.selectors.get();
        let visible = project(&self.store.snapshot(), &selectors);
        log::trace!(
            "carousel {selectors}: {} of {} records visible",
            visible.len(),
            self.store.len()
        );
        *self.visible.borrow_mut() = Rc::new(visible);
        self.revision.set(self.revision.get() + 1);
    }
}

/// Filtered horizontal list of records with drag scrolling.
///
/// Loads the first page on creation. The visible list is recomputed whenever
/// the store appends a page or the selectors change.
pub struct RecipeCarousel {
    inner: Rc<CarouselInner>,
}

impl RecipeCarousel {
    pub fn new(
        store: PagingDataStore,
        surface: Rc<dyn ScrollSurface>,
        frame_clock: FrameClock,
        selectors: FilterSelectors,
    ) -> Self {
        Self::with_config(store, surface, frame_clock, selectors, MomentumConfig::default())
    }

    pub fn with_config(
        store: PagingDataStore,
        surface: Rc<dyn ScrollSurface>,
        frame_clock: FrameClock,
        selectors: FilterSelectors,
        momentum: MomentumConfig,
    ) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<CarouselInner>| {
            let weak = weak.clone();
            let trigger = ScrollTriggerController::new(
                store.clone(),
                Rc::clone(&surface),
                Axis::Horizontal,
                EdgeThreshold::carousel(),
                frame_clock.clone(),
            )
            .on_records_changed(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.refresh();
                }
            });
            let drag = MomentumDragController::new(surface, frame_clock, momentum)
                .with_edge_check(trigger.clone());
            CarouselInner {
                store,
                selectors: Cell::new(selectors),
                visible: RefCell::new(Rc::new(Vec::new())),
                revision: Cell::new(0),
                trigger,
                drag,
                images: ImageFallbacks::default(),
            }
        });

        inner.refresh();
        inner.store.initialize();
        Self { inner }
    }

    /// Records currently shown, in canonical order.
    pub fn visible(&self) -> Rc<Vec<Record>> {
        Rc::clone(&self.inner.visible.borrow())
    }

    /// Bumped every time the visible list is recomputed.
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    pub fn selectors(&self) -> FilterSelectors {
        self.inner.selectors.get()
    }

    /// Returns whether anything changed. Setting the current value is a no-op.
    pub fn set_selectors(&self, selectors: FilterSelectors) -> bool {
        if self.inner.selectors.replace(selectors) == selectors {
            return false;
        }
        log::debug!("carousel filter now {selectors}");
        self.inner.refresh();
        true
    }

    pub fn set_difficulty(&self, difficulty: DifficultySelector) -> bool {
        self.set_selectors(FilterSelectors {
            difficulty,
            ..self.selectors()
        })
    }

    pub fn set_meal_type(&self, meal_type: MealTypeSelector) -> bool {
        self.set_selectors(FilterSelectors {
            meal_type,
            ..self.selectors()
        })
    }

    pub fn on_scroll(&self) {
        self.inner.trigger.on_scroll();
    }

    pub fn pointer_down(&self, sample: PointerSample) {
        self.inner.drag.pointer_down(sample);
    }

    pub fn pointer_move(&self, sample: PointerSample) {
        self.inner.drag.pointer_move(sample);
    }

    pub fn pointer_up(&self) {
        self.inner.drag.pointer_up();
    }

    pub fn image_failed(&self, id: RecordId) {
        self.inner.images.mark_failed(id);
    }

    pub fn image_url<'a>(&self, record: &'a Record) -> &'a str {
        self.inner.images.url_for(record)
    }

    pub fn drag(&self) -> &MomentumDragController {
        &self.inner.drag
    }

    pub fn trigger(&self) -> &ScrollTriggerController {
        &self.inner.trigger
    }

    pub fn teardown(&self) {
        self.inner.drag.teardown();
        self.inner.trigger.teardown();
    }
}

impl Drop for RecipeCarousel {
    fn drop(&mut self) {
        self.teardown();
    }
}
