use std::cell::RefCell;
use std::rc::Rc;

use feedscroll_paging::{FetchError, FilterSelectors, PagingConfig, PagingDataStore, RecordId};
use feedscroll_testing::{FakeRecordSource, FrameDriver};
use feedscroll_ui::{DetailState, RecordDetail};

struct Fixture {
    driver: FrameDriver,
    source: FakeRecordSource,
    detail: RecordDetail,
    left: Rc<RefCell<Vec<FilterSelectors>>>,
}

fn fixture(source: FakeRecordSource) -> Fixture {
    let driver = FrameDriver::new();
    let store = PagingDataStore::new(Rc::new(source.clone()), driver.handle(), PagingConfig::default());
    let left = Rc::new(RefCell::new(Vec::new()));
    let left_seen = Rc::clone(&left);
    let detail = RecordDetail::new(store, driver.handle())
        .on_leave(move |selectors| left_seen.borrow_mut().push(selectors));
    Fixture {
        driver,
        source,
        detail,
        left,
    }
}

#[test]
fn show_loads_the_record() {
    let fx = fixture(FakeRecordSource::generated(10));
    assert_eq!(fx.detail.state(), DetailState::Idle);

    fx.detail.show("7");
    assert_eq!(fx.detail.state(), DetailState::Loading(RecordId(7)));
    fx.driver.drain();

    let record = fx.detail.record().expect("record loaded");
    assert_eq!(record.id, RecordId(7));
    assert_eq!(fx.detail.image_url().as_deref(), Some("https://cdn.example/recipes/7.webp"));
    assert!(fx.left.borrow().is_empty());
}

#[test]
fn latest_show_wins() {
    let fx = fixture(FakeRecordSource::generated(10).manual());

    fx.detail.show("3");
    fx.detail.show("5");
    fx.driver.drain();

    fx.source.release_newest();
    fx.driver.drain();
    assert_eq!(fx.detail.record().map(|record| record.id), Some(RecordId(5)));

    fx.source.release_next();
    fx.driver.drain();
    assert_eq!(fx.detail.record().map(|record| record.id), Some(RecordId(5)));
}

#[test]
fn superseded_failure_does_not_leave() {
    let fx = fixture(FakeRecordSource::generated(10).manual());
    fx.source.fail_next(FetchError::transport("timeout"));

    fx.detail.show("3");
    fx.detail.show("4");
    fx.source.release_all();
    fx.driver.drain();

    assert_eq!(fx.detail.record().map(|record| record.id), Some(RecordId(4)));
    assert!(fx.left.borrow().is_empty());
}

#[test]
fn missing_record_sends_the_host_back_to_the_list() {
    let fx = fixture(FakeRecordSource::generated(10));

    fx.detail.show("99");
    fx.driver.drain();

    assert_eq!(fx.detail.state(), DetailState::Failed(FetchError::NotFound(RecordId(99))));
    assert_eq!(*fx.left.borrow(), vec![FilterSelectors::default()]);
}

#[test]
fn non_numeric_id_fails_without_a_request() {
    let fx = fixture(FakeRecordSource::generated(10));

    fx.detail.show("pancakes");

    assert_eq!(
        fx.detail.state(),
        DetailState::Failed(FetchError::InvalidId("pancakes".into()))
    );
    assert!(fx.source.id_requests().is_empty());
    assert_eq!(fx.left.borrow().len(), 1);
}

#[test]
fn broken_image_uses_the_placeholder() {
    let fx = fixture(FakeRecordSource::generated(10));
    fx.detail.show("2");
    fx.driver.drain();

    fx.detail.image_failed();
    assert_eq!(
        fx.detail.image_url().as_deref(),
        Some(feedscroll_paging::PLACEHOLDER_IMAGE_URL)
    );
}
