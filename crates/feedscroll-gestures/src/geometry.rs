//! Surface geometry and the host surface seam.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Read-only snapshot of one axis of a scrollable surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollGeometry {
    /// Current scroll offset.
    pub position: f32,
    /// Total content size along the axis.
    pub extent: f32,
    /// Visible size along the axis.
    pub viewport: f32,
}

impl ScrollGeometry {
    pub fn new(position: f32, extent: f32, viewport: f32) -> Self {
        Self {
            position,
            extent,
            viewport,
        }
    }

    /// Distance from the trailing edge of the viewport to the end of the content.
    pub fn distance_to_end(&self) -> f32 {
        self.extent - (self.position + self.viewport)
    }

    /// Fraction of the content at or above the trailing edge of the viewport.
    ///
    /// Empty content reports `1.0`: everything there is, is visible.
    pub fn seen_fraction(&self) -> f32 {
        if self.extent <= 0.0 {
            1.0
        } else {
            (self.position + self.viewport) / self.extent
        }
    }

    /// Largest valid scroll offset.
    pub fn max_offset(&self) -> f32 {
        (self.extent - self.viewport).max(0.0)
    }
}

/// Pointer affordance shown by the host while a surface is draggable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragCursor {
    /// Idle, draggable. Text selection enabled.
    Grab,
    /// A drag is in progress. Text selection suppressed.
    Grabbing,
}

/// A scrollable display surface owned by the host.
///
/// The scroll offset is shared with the host's own scrolling; controllers only
/// write it while they hold the drag or momentum phase, and switch native
/// smooth scrolling off for that time.
pub trait ScrollSurface {
    fn geometry(&self, axis: Axis) -> ScrollGeometry;

    /// Moves the scroll offset. Hosts clamp to their valid range.
    fn set_scroll_offset(&self, axis: Axis, offset: f32);

    /// Position of the surface's leading edge in pointer coordinates.
    fn offset_left(&self) -> f32 {
        0.0
    }

    fn set_smooth_scrolling(&self, enabled: bool);

    fn set_cursor(&self, cursor: DragCursor);
}
