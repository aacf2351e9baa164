//! Scroll-surface interaction primitives.
//!
//! - [`ScrollTriggerController`] watches a surface and asks the
//!   [`PagingDataStore`](feedscroll_paging::PagingDataStore) for another page
//!   when the viewport nears the end of the content.
//! - [`MomentumDragController`] turns pointer drags into scroll offsets and
//!   keeps scrolling after release with decaying velocity.
//!
//! Neither controller touches a UI toolkit; the host implements
//! [`ScrollSurface`] and forwards raw events.

mod edge;
pub mod gesture_constants;
mod geometry;
mod momentum;
mod scroll_trigger;

pub use edge::EdgeThreshold;
pub use geometry::{Axis, DragCursor, ScrollGeometry, ScrollSurface};
pub use momentum::{DragPhase, DragSession, MomentumConfig, MomentumDragController, PointerSample};
pub use scroll_trigger::ScrollTriggerController;
