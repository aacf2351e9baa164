//! Testing utilities for feedscroll.
//!
//! [`FrameDriver`] owns a runtime and pumps it by hand, [`FakeRecordSource`]
//! serves pages from memory (optionally holding them until released), and
//! [`FakeSurface`] records every write a controller makes.

pub mod frame_driver;
pub mod record_source;
pub mod surface;

pub use frame_driver::{FrameDriver, FRAME_INTERVAL_NANOS};
pub use record_source::{sample_record, FakeRecordSource, Resolution};
pub use surface::FakeSurface;

pub mod prelude {
    pub use crate::frame_driver::*;
    pub use crate::record_source::*;
    pub use crate::surface::*;
}
