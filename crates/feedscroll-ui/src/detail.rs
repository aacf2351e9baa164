use std::cell::{Cell, RefCell};
use std::rc::Rc;

use feedscroll_core::{RuntimeHandle, TaskHandle};
use feedscroll_paging::{FetchError, FilterSelectors, PagingDataStore, Record, RecordId};

#[derive(Clone, Debug, PartialEq)]
pub enum DetailState {
    Idle,
    Loading(RecordId),
    Loaded(Record),
    Failed(FetchError),
}

struct DetailInner {
    store: PagingDataStore,
    runtime: RuntimeHandle,
    state: RefCell<DetailState>,
    request: RefCell<Option<TaskHandle>>,
    generation: Cell<u64>,
    on_leave: RefCell<Option<Rc<dyn Fn(FilterSelectors)>>>,
    image_failed: Cell<bool>,
}

impl DetailInner {
    fn begin(&self) -> u64 {
        if let Some(previous) = self.request.borrow_mut().take() {
            log::trace!("superseding detail request {}", previous.id());
            previous.cancel();
        }
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.image_failed.set(false);
        generation
    }

    fn finish(&self, generation: u64, result: Result<Record, FetchError>) {
        if self.generation.get() != generation {
            return;
        }
        self.request.borrow_mut().take();
        match result {
            Ok(record) => {
                log::debug!("detail loaded record {}", record.id);
                *self.state.borrow_mut() = DetailState::Loaded(record);
            }
            Err(error) => self.fail(error),
        }
    }

    fn fail(&self, error: FetchError) {
        log::warn!("detail request failed: {error}");
        *self.state.borrow_mut() = DetailState::Failed(error);
        let leave = self.on_leave.borrow().clone();
        if let Some(leave) = leave {
            leave(FilterSelectors::default());
        }
    }
}

/// Single-record view model.
///
/// Only the most recent [`RecordDetail::show`] counts: starting a new request
/// cancels the previous one, and a result that still arrives for an older
/// request is ignored. Any failure sends the host back to the default list.
pub struct RecordDetail {
    inner: Rc<DetailInner>,
}

impl RecordDetail {
    pub fn new(store: PagingDataStore, runtime: RuntimeHandle) -> Self {
        Self {
            inner: Rc::new(DetailInner {
                store,
                runtime,
                state: RefCell::new(DetailState::Idle),
                request: RefCell::new(None),
                generation: Cell::new(0),
                on_leave: RefCell::new(None),
                image_failed: Cell::new(false),
            }),
        }
    }

    /// Called with the selectors to return to when the record cannot be shown.
    pub fn on_leave(self, callback: impl Fn(FilterSelectors) + 'static) -> Self {
        *self.inner.on_leave.borrow_mut() = Some(Rc::new(callback));
        self
    }

    /// Shows the record named by a route parameter.
    pub fn show(&self, id: &str) {
        match id.parse::<RecordId>() {
            Ok(id) => self.show_id(id),
            Err(_) => {
                self.inner.begin();
                self.inner.fail(FetchError::InvalidId(id.to_string()));
            }
        }
    }

    pub fn show_id(&self, id: RecordId) {
        let inner = &self.inner;
        let generation = inner.begin();
        *inner.state.borrow_mut() = DetailState::Loading(id);

        let fetch = inner.store.get_by_id(id);
        let weak = Rc::downgrade(inner);
        let task = inner.runtime.spawn_ui(async move {
            let result = fetch.await;
            if let Some(inner) = weak.upgrade() {
                inner.finish(generation, result);
            }
        });
        match task {
            Some(task) => *inner.request.borrow_mut() = Some(task),
            None => inner.fail(FetchError::transport("runtime stopped")),
        }
    }

    pub fn state(&self) -> DetailState {
        self.inner.state.borrow().clone()
    }

    pub fn record(&self) -> Option<Record> {
        match &*self.inner.state.borrow() {
            DetailState::Loaded(record) => Some(record.clone()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.inner.state.borrow(), DetailState::Loading(_))
    }

    pub fn image_failed(&self) {
        self.inner.image_failed.set(true);
    }

    /// Image for the loaded record, or the placeholder.
    pub fn image_url(&self) -> Option<String> {
        match &*self.inner.state.borrow() {
            DetailState::Loaded(record) => Some(
                record
                    .image_or_placeholder(self.inner.image_failed.get())
                    .to_string(),
            ),
            _ => None,
        }
    }

    /// Cancels an outstanding request. The state is left as it is.
    pub fn teardown(&self) {
        self.inner.generation.set(self.inner.generation.get() + 1);
        if let Some(task) = self.inner.request.borrow_mut().take() {
            task.cancel();
        }
    }
}

impl Drop for RecordDetail {
    fn drop(&mut self) {
        self.teardown();
    }
}
