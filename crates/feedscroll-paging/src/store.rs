//! The paging data store: canonical list, page cursor and in-flight guard.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use feedscroll_core::{LocalBoxFuture, RuntimeHandle, Signal, Subscription, TaskHandle};

use crate::record::{Record, RecordId};
use crate::source::{FetchError, Page, PageRequest, RecordDataSource};

pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Store configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagingConfig {
    /// Records requested per page. Always at least 1.
    pub page_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PagingConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

#[derive(Default)]
struct PagingState {
    canonical: Rc<Vec<Record>>,
    known_ids: HashSet<RecordId>,
    page_cursor: usize,
    total_count: Option<usize>,
    loading: bool,
    complete: bool,
    /// Bumped by `dispose`; results from an older generation are dropped.
    generation: u64,
}

struct StoreInner {
    source: Rc<dyn RecordDataSource>,
    runtime: RuntimeHandle,
    page_size: usize,
    state: RefCell<PagingState>,
    records_changed: Signal<()>,
    load_failed: Signal<FetchError>,
    load_cancelled: Signal<()>,
    in_flight: RefCell<Option<TaskHandle>>,
}

/// Owns the canonical accumulated list of records.
///
/// Cloning yields another handle to the same store. Reads go through
/// [`PagingDataStore::snapshot`]; the list only changes through
/// [`PagingDataStore::initialize`] and [`PagingDataStore::load_more`].
///
/// At most one page fetch is in flight at any time. The guard is a plain flag:
/// everything runs on the runtime thread, so nothing can interleave between the
/// check and the set.
#[derive(Clone)]
pub struct PagingDataStore {
    inner: Rc<StoreInner>,
}

impl PagingDataStore {
    pub fn new(
        source: Rc<dyn RecordDataSource>,
        runtime: RuntimeHandle,
        config: PagingConfig,
    ) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                source,
                runtime,
                page_size: config.page_size.max(1),
                state: RefCell::new(PagingState::default()),
                records_changed: Signal::new(),
                load_failed: Signal::new(),
                load_cancelled: Signal::new(),
                in_flight: RefCell::new(None),
            }),
        }
    }

    /// Starts the first page load when the canonical list is empty.
    ///
    /// Returns whether a fetch was issued. Calling it again once data exists,
    /// or while the first page is still in flight, does nothing.
    pub fn initialize(&self) -> bool {
        {
            let mut state = self.inner.state.borrow_mut();
            if !state.canonical.is_empty() {
                return false;
            }
            state.page_cursor = 0;
            state.complete = false;
        }
        self.load_more()
    }

    /// Requests the next page unless a load is in flight or the list is complete.
    ///
    /// Returns whether a fetch was issued. The result is applied when the
    /// runtime polls the fetch; success emits "records changed", failure is
    /// logged and reported through [`PagingDataStore::subscribe_load_failed`].
    /// Nothing is retried automatically.
    pub fn load_more(&self) -> bool {
        let (request, generation) = {
            let mut state = self.inner.state.borrow_mut();
            if state.loading || state.complete {
                log::trace!(
                    "load_more ignored (loading={}, complete={})",
                    state.loading,
                    state.complete
                );
                return false;
            }
            state.loading = true;
            let request = PageRequest {
                skip: state.page_cursor * self.inner.page_size,
                limit: self.inner.page_size,
            };
            (request, state.generation)
        };

        log::debug!(
            "requesting page skip={} limit={}",
            request.skip,
            request.limit
        );
        let fetch = self.inner.source.fetch_page(request);
        let weak: Weak<StoreInner> = Rc::downgrade(&self.inner);
        let task = self.inner.runtime.spawn_ui(async move {
            let result = fetch.await;
            if let Some(inner) = weak.upgrade() {
                inner.finish_load(generation, request, result);
            }
        });

        match task {
            Some(handle) => {
                *self.inner.in_flight.borrow_mut() = Some(handle);
                true
            }
            None => {
                log::warn!("runtime is gone; page request at skip {} dropped", request.skip);
                self.inner.state.borrow_mut().loading = false;
                false
            }
        }
    }

    /// Fetches one record straight from the source. Not served from the list.
    pub fn get_by_id(&self, id: RecordId) -> LocalBoxFuture<'static, Result<Record, FetchError>> {
        self.inner.source.fetch_by_id(id)
    }

    /// Cancels an in-flight fetch. Its result, if it still arrives, is ignored.
    ///
    /// When a page was actually in flight, "load cancelled" fires so whoever
    /// asked for it stops waiting.
    pub fn dispose(&self) {
        let was_loading = {
            let mut state = self.inner.state.borrow_mut();
            state.generation += 1;
            std::mem::replace(&mut state.loading, false)
        };
        let task = self.inner.in_flight.borrow_mut().take();
        if let Some(task) = task {
            log::debug!("cancelling in-flight page task {}", task.id());
            task.cancel();
        }
        if was_loading {
            self.inner.load_cancelled.emit(&());
        }
    }

    /// Read-only view of the canonical list at this moment.
    pub fn snapshot(&self) -> Rc<Vec<Record>> {
        Rc::clone(&self.inner.state.borrow().canonical)
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn is_complete(&self) -> bool {
        self.inner.state.borrow().complete
    }

    pub fn page_cursor(&self) -> usize {
        self.inner.state.borrow().page_cursor
    }

    pub fn page_size(&self) -> usize {
        self.inner.page_size
    }

    pub fn total_count(&self) -> Option<usize> {
        self.inner.state.borrow().total_count
    }

    /// Fires after every successful page append, once the list is fully updated.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_records_changed(&self, listener: impl Fn() + 'static) -> Subscription {
        self.inner.records_changed.subscribe(move |_| listener())
    }

    /// Fires when a page fetch fails.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_load_failed(
        &self,
        listener: impl Fn(&FetchError) + 'static,
    ) -> Subscription {
        self.inner.load_failed.subscribe(listener)
    }

    /// Fires when [`PagingDataStore::dispose`] abandons a page in flight.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_load_cancelled(&self, listener: impl Fn() + 'static) -> Subscription {
        self.inner.load_cancelled.subscribe(move |_| listener())
    }
}

impl StoreInner {
    fn finish_load(&self, generation: u64, request: PageRequest, result: Result<Page, FetchError>) {
        if self.state.borrow().generation != generation {
            log::debug!("dropping stale page result for skip {}", request.skip);
            return;
        }
        self.in_flight.borrow_mut().take();

        match result {
            Ok(page) => {
                self.append_page(request, page);
                self.records_changed.emit(&());
            }
            Err(error) => {
                self.state.borrow_mut().loading = false;
                log::error!("failed to load page at skip {}: {error}", request.skip);
                self.load_failed.emit(&error);
            }
        }
    }

    fn append_page(&self, request: PageRequest, page: Page) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let received = page.items.len();
        let total = *state.total_count.get_or_insert(page.total);

        let canonical = Rc::make_mut(&mut state.canonical);
        for record in page.items {
            if state.known_ids.insert(record.id) {
                canonical.push(record);
            } else {
                log::warn!("record {} repeated across pages; keeping the first copy", record.id);
            }
        }
        state.page_cursor += 1;

        if received == 0 && canonical.len() < total {
            log::warn!(
                "empty page at skip {} with {} of {} records loaded; treating list as complete",
                request.skip,
                canonical.len(),
                total
            );
        }
        state.complete = canonical.len() >= total || received == 0;
        state.loading = false;

        log::debug!(
            "page {} applied: {} records, {} of {} loaded{}",
            state.page_cursor,
            received,
            canonical.len(),
            total,
            if state.complete { ", complete" } else { "" }
        );
    }
}

impl std::fmt::Debug for PagingDataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("PagingDataStore")
            .field("len", &state.canonical.len())
            .field("page_cursor", &state.page_cursor)
            .field("page_size", &self.inner.page_size)
            .field("total_count", &state.total_count)
            .field("loading", &state.loading)
            .field("complete", &state.complete)
            .finish()
    }
}
