use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use feedscroll_core::LocalBoxFuture;
use feedscroll_paging::{
    Difficulty, FetchError, Page, PageRequest, Record, RecordDataSource, RecordId,
};

/// How a [`FakeRecordSource`] answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Fetches resolve on their first poll.
    Immediate,
    /// Fetches stay pending until released by the test.
    Manual,
}

/// Record `id` of the generated collection.
///
/// Difficulty cycles easy, medium, hard; meal type cycles breakfast, lunch,
/// dinner, so every third record is breakfast.
pub fn sample_record(id: u64) -> Record {
    let difficulty = match id % 3 {
        1 => Difficulty::Easy,
        2 => Difficulty::Medium,
        _ => Difficulty::Hard,
    };
    let meal_type = match (id / 3) % 3 {
        0 => "Breakfast",
        1 => "Lunch",
        _ => "Dinner",
    };
    let mut record = Record::new(id, format!("Recipe {id}"), difficulty, [meal_type]);
    record.image_url = format!("https://cdn.example/recipes/{id}.webp");
    record
}

struct DeferredState<T> {
    value: Option<T>,
    waker: Option<Waker>,
}

struct Deferred<T> {
    state: Rc<RefCell<DeferredState<T>>>,
}

impl<T> Future for Deferred<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut state = self.state.borrow_mut();
        match state.value.take() {
            Some(value) => Poll::Ready(value),
            None => {
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

fn deferred<T: 'static>(value: T) -> (Deferred<T>, Box<dyn FnOnce()>) {
    let state = Rc::new(RefCell::new(DeferredState {
        value: None,
        waker: None,
    }));
    let resolver_state = Rc::clone(&state);
    let resolve = Box::new(move || {
        let waker = {
            let mut state = resolver_state.borrow_mut();
            state.value = Some(value);
            state.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    });
    (Deferred { state }, resolve)
}

struct FakeInner {
    records: RefCell<Vec<Record>>,
    reported_total: Cell<Option<usize>>,
    resolution: Cell<Resolution>,
    failures: RefCell<VecDeque<FetchError>>,
    page_requests: RefCell<Vec<PageRequest>>,
    id_requests: RefCell<Vec<RecordId>>,
    pending: RefCell<VecDeque<Box<dyn FnOnce()>>>,
}

/// In-memory [`RecordDataSource`].
///
/// Cloning shares the same collection and logs, so a test can hand one clone
/// to the store and keep another to steer it.
#[derive(Clone)]
pub struct FakeRecordSource {
    inner: Rc<FakeInner>,
}

impl FakeRecordSource {
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            inner: Rc::new(FakeInner {
                records: RefCell::new(records),
                reported_total: Cell::new(None),
                resolution: Cell::new(Resolution::Immediate),
                failures: RefCell::new(VecDeque::new()),
                page_requests: RefCell::new(Vec::new()),
                id_requests: RefCell::new(Vec::new()),
                pending: RefCell::new(VecDeque::new()),
            }),
        }
    }

    /// A collection of `total` records built by [`sample_record`], ids from 1.
    pub fn generated(total: usize) -> Self {
        Self::with_records((1..=total as u64).map(sample_record).collect())
    }

    pub fn manual(self) -> Self {
        self.inner.resolution.set(Resolution::Manual);
        self
    }

    /// Reports `total` in every page instead of the real collection size.
    pub fn reporting_total(self, total: usize) -> Self {
        self.inner.reported_total.set(Some(total));
        self
    }

    /// The next fetch, page or record, fails with `error`.
    pub fn fail_next(&self, error: FetchError) {
        self.inner.failures.borrow_mut().push_back(error);
    }

    /// Resolves the oldest pending fetch. Returns false when none is pending.
    pub fn release_next(&self) -> bool {
        let next = self.inner.pending.borrow_mut().pop_front();
        next.map(|resolve| resolve()).is_some()
    }

    /// Resolves the most recent pending fetch.
    pub fn release_newest(&self) -> bool {
        let next = self.inner.pending.borrow_mut().pop_back();
        next.map(|resolve| resolve()).is_some()
    }

    pub fn release_all(&self) -> usize {
        let mut released = 0;
        while self.release_next() {
            released += 1;
        }
        released
    }

    pub fn pending_count(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    pub fn page_requests(&self) -> Vec<PageRequest> {
        self.inner.page_requests.borrow().clone()
    }

    pub fn id_requests(&self) -> Vec<RecordId> {
        self.inner.id_requests.borrow().clone()
    }

    fn page(&self, request: PageRequest) -> Result<Page, FetchError> {
        if let Some(error) = self.inner.failures.borrow_mut().pop_front() {
            return Err(error);
        }
        let records = self.inner.records.borrow();
        let start = request.skip.min(records.len());
        let end = (request.skip + request.limit).min(records.len());
        Ok(Page {
            items: records[start..end].to_vec(),
            total: self.inner.reported_total.get().unwrap_or(records.len()),
        })
    }

    fn record(&self, id: RecordId) -> Result<Record, FetchError> {
        if let Some(error) = self.inner.failures.borrow_mut().pop_front() {
            return Err(error);
        }
        self.inner
            .records
            .borrow()
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(FetchError::NotFound(id))
    }

    fn answer<T: 'static>(&self, result: T) -> LocalBoxFuture<'static, T> {
        match self.inner.resolution.get() {
            Resolution::Immediate => Box::pin(std::future::ready(result)),
            Resolution::Manual => {
                let (future, resolve) = deferred(result);
                self.inner.pending.borrow_mut().push_back(resolve);
                Box::pin(future)
            }
        }
    }
}

impl RecordDataSource for FakeRecordSource {
    fn fetch_page(&self, request: PageRequest) -> LocalBoxFuture<'static, Result<Page, FetchError>> {
        self.inner.page_requests.borrow_mut().push(request);
        let result = self.page(request);
        self.answer(result)
    }

    fn fetch_by_id(&self, id: RecordId) -> LocalBoxFuture<'static, Result<Record, FetchError>> {
        self.inner.id_requests.borrow_mut().push(id);
        let result = self.record(id);
        self.answer(result)
    }
}
