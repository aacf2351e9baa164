//! Paged record store and filter projection.
//!
//! [`PagingDataStore`] accumulates pages from a [`RecordDataSource`] into the
//! canonical list; [`project`] derives the filtered view from it.

mod filter;
mod record;
mod source;
mod store;

pub use filter::{project, DifficultySelector, FilterSelectors, MealTypeSelector, SelectorError};
pub use record::{Difficulty, Record, RecordId, UnknownDifficulty, PLACEHOLDER_IMAGE_URL};
pub use source::{FetchError, Page, PageRequest, RecordDataSource};
pub use store::{PagingConfig, PagingDataStore, DEFAULT_PAGE_SIZE};
