use std::cell::RefCell;
use std::collections::HashSet;

use feedscroll_paging::{Record, RecordId};

/// Records whose image failed to load in this view.
#[derive(Default)]
pub struct ImageFallbacks {
    failed: RefCell<HashSet<RecordId>>,
}

impl ImageFallbacks {
    pub fn mark_failed(&self, id: RecordId) {
        if self.failed.borrow_mut().insert(id) {
            log::debug!("image for record {id} failed; using placeholder");
        }
    }

    pub fn url_for<'a>(&self, record: &'a Record) -> &'a str {
        record.image_or_placeholder(self.failed.borrow().contains(&record.id))
    }
}
