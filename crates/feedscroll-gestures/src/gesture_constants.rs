//! Shared gesture constants.
//!
//! Units follow the host surface: distances are in its offset units (logical
//! pixels for a typical host), times in milliseconds, velocities in offset
//! units per millisecond. The momentum values are tuned as a set; changing one
//! changes how far and how long a release glides.

/// Multiplier applied to pointer travel while dragging.
pub const DRAG_GAIN: f32 = 1.5;

/// Velocity retained per momentum frame.
pub const FRICTION: f32 = 0.95;

/// Momentum stops once `|velocity|` falls below this (units per ms).
pub const VELOCITY_CUTOFF: f32 = 0.1;

/// Nominal frame duration used to integrate momentum velocity.
pub const NOMINAL_FRAME_MS: f32 = 16.0;

/// Run the edge-proximity check every N drag frames.
pub const DRAG_CHECK_INTERVAL: u64 = 5;

/// Run the edge-proximity check every N momentum frames.
pub const MOMENTUM_CHECK_INTERVAL: u64 = 10;

/// Fraction of the content that must be in or above the viewport before a
/// vertically growing list asks for more.
pub const LOAD_MORE_FRACTION: f32 = 0.8;

/// Remaining distance to the end below which a carousel asks for more.
pub const LOAD_MORE_DISTANCE: f32 = 1500.0;
