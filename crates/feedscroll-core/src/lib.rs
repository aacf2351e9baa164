//! Runtime services shared by the feedscroll crates.
//!
//! Everything here runs on one UI thread: local futures and frame callbacks
//! are driven by the host through [`RuntimeHandle::drain_ui`]
//! and [`RuntimeHandle::drain_frame_callbacks`].

mod background;
mod frame_clock;
mod platform;
mod runtime;
mod signal;

use std::future::Future;
use std::pin::Pin;

pub use background::{spawn_blocking, BackgroundTask, CancelToken, Canceled};
pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use platform::{DefaultScheduler, RuntimeScheduler};
pub use runtime::{Runtime, RuntimeHandle, TaskHandle};
pub use signal::{Signal, Subscription};

pub type FrameCallbackId = u64;

/// A boxed future that stays on the runtime thread.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;
