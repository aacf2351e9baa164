//! View models wiring the paging store to scroll surfaces.
//!
//! Each view holds a handle to the shared [`PagingDataStore`] and re-reads it
//! when the store reports new records. Dropping a view tears it down.
//!
//! [`PagingDataStore`]: feedscroll_paging::PagingDataStore

mod carousel;
mod detail;
mod footer;
mod image;

pub use carousel::RecipeCarousel;
pub use detail::{DetailState, RecordDetail};
pub use footer::RecipeFooter;
pub use image::ImageFallbacks;
