use std::cell::{Cell, RefCell};
use std::rc::Rc;

use feedscroll_paging::{FetchError, PageRequest, PagingConfig, PagingDataStore, Record, RecordId};
use feedscroll_testing::{sample_record, FakeRecordSource, FrameDriver};

fn store_with(source: &FakeRecordSource, driver: &FrameDriver, page_size: usize) -> PagingDataStore {
    PagingDataStore::new(
        Rc::new(source.clone()),
        driver.handle(),
        PagingConfig::default().with_page_size(page_size),
    )
}

fn skips(source: &FakeRecordSource) -> Vec<usize> {
    source.page_requests().iter().map(|request| request.skip).collect()
}

fn ids(store: &PagingDataStore) -> Vec<u64> {
    store.snapshot().iter().map(|record| record.id.0).collect()
}

#[test]
fn initialize_loads_the_first_page() {
    let driver = FrameDriver::new();
    let source = FakeRecordSource::generated(100);
    let store = store_with(&source, &driver, 30);

    let changes = Rc::new(Cell::new(0));
    let changes_seen = Rc::clone(&changes);
    let _sub = store.subscribe_records_changed(move || changes_seen.set(changes_seen.get() + 1));

    assert!(store.initialize());
    assert!(store.is_loading());
    driver.drain();

    assert_eq!(source.page_requests(), vec![PageRequest { skip: 0, limit: 30 }]);
    assert_eq!(store.len(), 30);
    assert_eq!(store.page_cursor(), 1);
    assert_eq!(store.total_count(), Some(100));
    assert!(!store.is_loading());
    assert!(!store.is_complete());
    assert_eq!(changes.get(), 1);
}

#[test]
fn initialize_is_idempotent() {
    let driver = FrameDriver::new();
    let source = FakeRecordSource::generated(100).manual();
    let store = store_with(&source, &driver, 30);

    assert!(store.initialize());
    assert!(!store.initialize());
    driver.drain();
    assert_eq!(source.page_requests().len(), 1);

    source.release_all();
    driver.drain();
    assert_eq!(store.len(), 30);

    assert!(!store.initialize());
    driver.drain();
    assert_eq!(source.page_requests().len(), 1);
    assert_eq!(store.len(), 30);
}

#[test]
fn only_one_fetch_is_in_flight() {
    let driver = FrameDriver::new();
    let source = FakeRecordSource::generated(100).manual();
    let store = store_with(&source, &driver, 30);

    assert!(store.load_more());
    for _ in 0..5 {
        assert!(!store.load_more());
    }
    driver.drain();
    assert_eq!(source.pending_count(), 1);
    assert!(store.is_loading());

    source.release_next();
    driver.drain();
    assert!(!store.is_loading());
    assert!(store.load_more());
    assert_eq!(skips(&source), vec![0, 30]);
}

#[test]
fn pages_accumulate_until_the_total_is_reached() {
    let driver = FrameDriver::new();
    let source = FakeRecordSource::generated(100);
    let store = store_with(&source, &driver, 30);

    store.initialize();
    driver.drain();
    while store.load_more() {
        driver.drain();
    }

    assert_eq!(skips(&source), vec![0, 30, 60, 90]);
    assert_eq!(store.page_cursor(), 4);
    assert_eq!(store.len(), 100);
    assert!(store.is_complete());
    assert_eq!(ids(&store), (1..=100).collect::<Vec<_>>());

    assert!(!store.load_more());
    assert_eq!(source.page_requests().len(), 4);
}

#[test]
fn canonical_list_only_grows() {
    let driver = FrameDriver::new();
    let source = FakeRecordSource::generated(75);
    let store = store_with(&source, &driver, 25);

    let mut previous: Vec<u64> = Vec::new();
    store.initialize();
    loop {
        driver.drain();
        let current = ids(&store);
        assert!(current.len() >= previous.len());
        assert_eq!(&current[..previous.len()], previous.as_slice());
        previous = current;
        if !store.load_more() {
            break;
        }
    }
    assert_eq!(previous.len(), 75);
}

#[test]
fn failed_page_is_retried_from_the_same_offset() {
    let driver = FrameDriver::new();
    let source = FakeRecordSource::generated(100);
    let store = store_with(&source, &driver, 30);

    let failures = Rc::new(RefCell::new(Vec::new()));
    let failures_seen = Rc::clone(&failures);
    let _sub = store.subscribe_load_failed(move |error| failures_seen.borrow_mut().push(error.clone()));
    let changes = Rc::new(Cell::new(0));
    let changes_seen = Rc::clone(&changes);
    let _changed = store.subscribe_records_changed(move || changes_seen.set(changes_seen.get() + 1));

    source.fail_next(FetchError::transport("connection reset"));
    assert!(store.initialize());
    driver.drain();

    assert!(!store.is_loading());
    assert!(store.is_empty());
    assert_eq!(store.page_cursor(), 0);
    assert_eq!(changes.get(), 0);
    assert_eq!(*failures.borrow(), vec![FetchError::transport("connection reset")]);

    assert!(store.load_more());
    driver.drain();
    assert_eq!(skips(&source), vec![0, 0]);
    assert_eq!(store.len(), 30);
    assert_eq!(changes.get(), 1);
}

#[test]
fn disposed_store_ignores_a_late_page() {
    let driver = FrameDriver::new();
    let source = FakeRecordSource::generated(100).manual();
    let store = store_with(&source, &driver, 30);

    let changes = Rc::new(Cell::new(0));
    let changes_seen = Rc::clone(&changes);
    let _sub = store.subscribe_records_changed(move || changes_seen.set(changes_seen.get() + 1));

    store.initialize();
    driver.drain();
    store.dispose();
    assert!(!store.is_loading());

    source.release_all();
    driver.drain();

    assert!(store.is_empty());
    assert_eq!(store.page_cursor(), 0);
    assert_eq!(changes.get(), 0);
}

#[test]
fn dispose_reports_cancellation_only_for_a_page_in_flight() {
    let driver = FrameDriver::new();
    let source = FakeRecordSource::generated(100).manual();
    let store = store_with(&source, &driver, 30);

    let cancelled = Rc::new(Cell::new(0));
    let cancelled_seen = Rc::clone(&cancelled);
    let _sub = store.subscribe_load_cancelled(move || cancelled_seen.set(cancelled_seen.get() + 1));

    store.dispose();
    assert_eq!(cancelled.get(), 0);

    store.initialize();
    driver.drain();
    store.dispose();
    store.dispose();
    assert_eq!(cancelled.get(), 1);
}

#[test]
fn repeated_ids_are_kept_once() {
    let driver = FrameDriver::new();
    let records = vec![sample_record(1), sample_record(2), sample_record(2), sample_record(3)];
    let source = FakeRecordSource::with_records(records);
    let store = store_with(&source, &driver, 2);

    store.initialize();
    driver.drain();
    store.load_more();
    driver.drain();

    assert_eq!(ids(&store), vec![1, 2, 3]);
    assert!(!store.is_complete());

    // The next page comes back empty, which ends the list.
    assert!(store.load_more());
    driver.drain();
    assert!(store.is_complete());
    assert_eq!(skips(&source), vec![0, 2, 4]);
}

#[test]
fn empty_page_completes_the_list() {
    let driver = FrameDriver::new();
    let source = FakeRecordSource::generated(5).reporting_total(50);
    let store = store_with(&source, &driver, 5);

    store.initialize();
    driver.drain();
    assert_eq!(store.len(), 5);
    assert!(!store.is_complete());

    store.load_more();
    driver.drain();
    assert_eq!(store.len(), 5);
    assert!(store.is_complete());
    assert!(!store.load_more());
}

#[test]
fn records_changed_fires_after_the_list_is_updated() {
    let driver = FrameDriver::new();
    let source = FakeRecordSource::generated(40);
    let store = store_with(&source, &driver, 30);

    let observed = Rc::new(RefCell::new(Vec::new()));
    let observed_in_listener = Rc::clone(&observed);
    let listener_store = store.clone();
    let _sub = store.subscribe_records_changed(move || {
        observed_in_listener
            .borrow_mut()
            .push((listener_store.len(), listener_store.is_loading()));
    });

    store.initialize();
    driver.drain();
    store.load_more();
    driver.drain();

    assert_eq!(*observed.borrow(), vec![(30, false), (40, false)]);
}

#[test]
fn snapshots_are_not_affected_by_later_pages() {
    let driver = FrameDriver::new();
    let source = FakeRecordSource::generated(60);
    let store = store_with(&source, &driver, 30);

    store.initialize();
    driver.drain();
    let first = store.snapshot();

    store.load_more();
    driver.drain();

    assert_eq!(first.len(), 30);
    assert_eq!(store.snapshot().len(), 60);
}

#[test]
fn get_by_id_goes_to_the_source() {
    let driver = FrameDriver::new();
    let source = FakeRecordSource::generated(10);
    let store = store_with(&source, &driver, 30);

    let found: Rc<RefCell<Vec<Result<Record, FetchError>>>> = Rc::new(RefCell::new(Vec::new()));
    for id in [RecordId(7), RecordId(99)] {
        let fetch = store.get_by_id(id);
        let found = Rc::clone(&found);
        driver.handle().spawn_ui(async move {
            found.borrow_mut().push(fetch.await);
        });
    }
    driver.drain();

    let found = found.borrow();
    assert_eq!(found[0].as_ref().map(|record| record.id), Ok(RecordId(7)));
    assert_eq!(found[1], Err(FetchError::NotFound(RecordId(99))));
    assert_eq!(source.id_requests(), vec![RecordId(7), RecordId(99)]);
    assert!(source.page_requests().is_empty());
    assert!(store.is_empty());
}
