//! The remote data source seam.
//!
//! The paging contract is fixed: `skip`/`limit` in, items plus the total count
//! out. Transports live outside this crate and implement
//! [`RecordDataSource`].

use feedscroll_core::LocalBoxFuture;
use serde::Deserialize;

use crate::record::{Record, RecordId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: usize,
    pub limit: usize,
}

/// One page of records as returned by the source.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Page {
    #[serde(alias = "recipes")]
    pub items: Vec<Record>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("record {0} not found")]
    NotFound(RecordId),
    #[error("`{0}` is not a record id")]
    InvalidId(String),
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        FetchError::Transport(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

/// Abstract remote collection of records.
///
/// Futures are local to the runtime thread; implementations that block must
/// hand the blocking part to a worker (see `feedscroll_core::spawn_blocking`).
pub trait RecordDataSource {
    fn fetch_page(&self, request: PageRequest) -> LocalBoxFuture<'static, Result<Page, FetchError>>;

    fn fetch_by_id(&self, id: RecordId) -> LocalBoxFuture<'static, Result<Record, FetchError>>;
}
