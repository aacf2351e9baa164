use std::cell::{Cell, RefCell};

use feedscroll_gestures::{Axis, DragCursor, ScrollGeometry, ScrollSurface};

/// In-memory [`ScrollSurface`] that clamps like a real scroll container and
/// keeps a log of what controllers did to it.
pub struct FakeSurface {
    position: Cell<f32>,
    viewport: Cell<f32>,
    extent: Cell<f32>,
    offset_left: Cell<f32>,
    smooth: Cell<bool>,
    cursor: Cell<DragCursor>,
    writes: RefCell<Vec<(Axis, f32)>>,
    smooth_changes: RefCell<Vec<bool>>,
}

impl FakeSurface {
    pub fn new(viewport: f32, extent: f32) -> Self {
        Self {
            position: Cell::new(0.0),
            viewport: Cell::new(viewport),
            extent: Cell::new(extent),
            offset_left: Cell::new(0.0),
            smooth: Cell::new(true),
            cursor: Cell::new(DragCursor::Grab),
            writes: RefCell::new(Vec::new()),
            smooth_changes: RefCell::new(Vec::new()),
        }
    }

    /// Scrolls as the user would with a wheel; not recorded as a write.
    pub fn scroll_to(&self, position: f32) {
        self.position.set(self.clamp(position));
    }

    pub fn set_extent(&self, extent: f32) {
        self.extent.set(extent);
        self.position.set(self.clamp(self.position.get()));
    }

    pub fn set_offset_left(&self, offset_left: f32) {
        self.offset_left.set(offset_left);
    }

    pub fn position(&self) -> f32 {
        self.position.get()
    }

    pub fn extent(&self) -> f32 {
        self.extent.get()
    }

    pub fn smooth_scrolling(&self) -> bool {
        self.smooth.get()
    }

    pub fn cursor(&self) -> DragCursor {
        self.cursor.get()
    }

    /// Offsets requested through [`ScrollSurface::set_scroll_offset`], unclamped.
    pub fn writes(&self) -> Vec<f32> {
        self.writes.borrow().iter().map(|(_, offset)| *offset).collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }

    pub fn smooth_changes(&self) -> Vec<bool> {
        self.smooth_changes.borrow().clone()
    }

    fn clamp(&self, position: f32) -> f32 {
        let max = (self.extent.get() - self.viewport.get()).max(0.0);
        position.clamp(0.0, max)
    }
}

impl ScrollSurface for FakeSurface {
    fn geometry(&self, _axis: Axis) -> ScrollGeometry {
        ScrollGeometry::new(self.position.get(), self.extent.get(), self.viewport.get())
    }

    fn set_scroll_offset(&self, axis: Axis, offset: f32) {
        self.writes.borrow_mut().push((axis, offset));
        self.position.set(self.clamp(offset));
    }

    fn offset_left(&self) -> f32 {
        self.offset_left.get()
    }

    fn set_smooth_scrolling(&self, enabled: bool) {
        self.smooth.set(enabled);
        self.smooth_changes.borrow_mut().push(enabled);
    }

    fn set_cursor(&self, cursor: DragCursor) {
        self.cursor.set(cursor);
    }
}
