use std::rc::Rc;

use feedscroll_gestures::{
    Axis, DragCursor, DragPhase, EdgeThreshold, MomentumConfig, MomentumDragController,
    PointerSample, ScrollTriggerController,
};
use feedscroll_paging::{PagingConfig, PagingDataStore};
use feedscroll_testing::{FakeRecordSource, FakeSurface, FrameDriver};

fn controller(driver: &FrameDriver, surface: &Rc<FakeSurface>) -> MomentumDragController {
    MomentumDragController::new(surface.clone(), driver.frame_clock(), MomentumConfig::default())
}

fn at(x: f32, time_ms: f64) -> PointerSample {
    PointerSample::new(x, time_ms)
}

#[test]
fn pointer_down_enters_dragging() {
    let driver = FrameDriver::new();
    let surface = Rc::new(FakeSurface::new(400.0, 10_000.0));
    surface.scroll_to(1000.0);
    let drag = controller(&driver, &surface);

    drag.pointer_down(at(500.0, 0.0));

    assert_eq!(drag.phase(), DragPhase::Dragging);
    assert_eq!(surface.cursor(), DragCursor::Grabbing);
    assert!(!surface.smooth_scrolling());
    let session = drag.session().expect("session started");
    assert_eq!(session.anchor_pointer_x, 500.0);
    assert_eq!(session.anchor_scroll_offset, 1000.0);
    assert_eq!(session.velocity, 0.0);
}

#[test]
fn drag_writes_once_per_frame() {
    let mut driver = FrameDriver::new();
    let surface = Rc::new(FakeSurface::new(400.0, 10_000.0));
    surface.scroll_to(1000.0);
    let drag = controller(&driver, &surface);

    drag.pointer_down(at(500.0, 0.0));
    drag.pointer_move(at(480.0, 4.0));
    drag.pointer_move(at(460.0, 8.0));
    drag.pointer_move(at(440.0, 12.0));
    assert_eq!(surface.write_count(), 0);

    driver.step();
    assert_eq!(surface.writes(), vec![1090.0]);
    assert_eq!(drag.velocity(), -5.0);
    assert_eq!(drag.frame_count(), 1);

    driver.step();
    assert_eq!(surface.write_count(), 1);
}

#[test]
fn drag_target_is_relative_to_the_surface_edge() {
    let mut driver = FrameDriver::new();
    let surface = Rc::new(FakeSurface::new(400.0, 10_000.0));
    surface.scroll_to(1000.0);
    surface.set_offset_left(100.0);
    let drag = controller(&driver, &surface);

    drag.pointer_down(at(600.0, 0.0));
    assert_eq!(drag.session().map(|s| s.anchor_pointer_x), Some(500.0));
    drag.pointer_move(at(550.0, 10.0));
    driver.step();

    assert_eq!(surface.writes(), vec![1075.0]);
}

#[test]
fn release_glides_until_velocity_decays() {
    let mut driver = FrameDriver::new();
    let surface = Rc::new(FakeSurface::new(400.0, 100_000.0));
    surface.scroll_to(5000.0);
    let drag = controller(&driver, &surface);

    drag.pointer_down(at(100.0, 0.0));
    drag.pointer_move(at(180.0, 100.0));
    assert!((drag.velocity() - 0.8).abs() < 1e-6);
    drag.pointer_up();
    assert_eq!(drag.phase(), DragPhase::Settling);
    assert_eq!(surface.cursor(), DragCursor::Grab);
    assert!(!surface.smooth_scrolling());

    let stepped = driver.pump_until_idle(200);

    // 0.8 * 0.95^n drops below 0.1 at n = 41.
    assert_eq!(surface.write_count(), 41);
    assert_eq!(stepped, 42);
    let writes = surface.writes();
    assert!((writes[0] - 4987.2).abs() < 1e-3);
    let travelled = 5000.0 - surface.position();
    assert!((travelled - 224.74).abs() < 0.5, "travelled {travelled}");

    assert_eq!(drag.phase(), DragPhase::Idle);
    assert!(drag.session().is_none());
    assert!(surface.smooth_scrolling());
    assert_eq!(surface.smooth_changes(), vec![false, true]);
}

#[test]
fn pending_drag_write_is_dropped_on_release() {
    let mut driver = FrameDriver::new();
    let surface = Rc::new(FakeSurface::new(400.0, 10_000.0));
    surface.scroll_to(1000.0);
    let drag = controller(&driver, &surface);

    drag.pointer_down(at(500.0, 0.0));
    drag.pointer_move(at(520.0, 10.0));
    drag.pointer_up();
    driver.step();

    // The first write is momentum from the undragged offset, not the drag target.
    assert_eq!(surface.writes(), vec![1000.0 - 2.0 * 16.0]);
}

#[test]
fn slow_release_settles_on_the_next_frame() {
    let mut driver = FrameDriver::new();
    let surface = Rc::new(FakeSurface::new(400.0, 10_000.0));
    let drag = controller(&driver, &surface);

    drag.pointer_down(at(500.0, 0.0));
    drag.pointer_move(at(500.5, 10.0));
    drag.pointer_up();
    assert_eq!(drag.phase(), DragPhase::Settling);

    driver.step();
    assert_eq!(drag.phase(), DragPhase::Idle);
    assert_eq!(surface.write_count(), 0);
    assert!(surface.smooth_scrolling());
    assert!(!driver.has_pending_frame());
}

#[test]
fn pointer_down_interrupts_momentum() {
    let mut driver = FrameDriver::new();
    let surface = Rc::new(FakeSurface::new(400.0, 100_000.0));
    surface.scroll_to(5000.0);
    let drag = controller(&driver, &surface);

    drag.pointer_down(at(500.0, 0.0));
    drag.pointer_move(at(530.0, 10.0));
    drag.pointer_up();
    driver.steps(3);
    assert_eq!(surface.write_count(), 3);

    let position = surface.position();
    drag.pointer_down(at(300.0, 100.0));
    assert_eq!(drag.phase(), DragPhase::Dragging);
    assert!(!surface.smooth_scrolling());
    assert_eq!(drag.session().map(|s| s.anchor_scroll_offset), Some(position));

    driver.steps(5);
    assert_eq!(surface.write_count(), 3);
}

#[test]
fn moves_without_a_drag_are_ignored() {
    let mut driver = FrameDriver::new();
    let surface = Rc::new(FakeSurface::new(400.0, 10_000.0));
    let drag = controller(&driver, &surface);

    drag.pointer_move(at(100.0, 0.0));
    drag.pointer_up();
    driver.step();

    assert_eq!(drag.phase(), DragPhase::Idle);
    assert_eq!(surface.write_count(), 0);
    assert!(surface.smooth_changes().is_empty());
}

#[test]
fn teardown_stops_momentum_and_restores_the_surface() {
    let mut driver = FrameDriver::new();
    let surface = Rc::new(FakeSurface::new(400.0, 100_000.0));
    surface.scroll_to(5000.0);
    let drag = controller(&driver, &surface);

    drag.pointer_down(at(500.0, 0.0));
    drag.pointer_move(at(540.0, 10.0));
    drag.pointer_up();
    driver.step();

    drag.teardown();
    assert!(!driver.has_pending_frame());
    driver.steps(3);
    assert_eq!(surface.write_count(), 1);
    assert_eq!(drag.phase(), DragPhase::Idle);
    assert!(surface.smooth_scrolling());
}

struct EdgeFixture {
    driver: FrameDriver,
    source: FakeRecordSource,
    surface: Rc<FakeSurface>,
    drag: MomentumDragController,
}

fn with_edge_check() -> EdgeFixture {
    let driver = FrameDriver::new();
    let source = FakeRecordSource::generated(100);
    let store = PagingDataStore::new(Rc::new(source.clone()), driver.handle(), PagingConfig::default());
    let surface = Rc::new(FakeSurface::new(400.0, 3000.0));
    surface.scroll_to(1200.0);
    let trigger = ScrollTriggerController::new(
        store,
        surface.clone(),
        Axis::Horizontal,
        EdgeThreshold::carousel(),
        driver.frame_clock(),
    );
    let drag = controller(&driver, &surface).with_edge_check(trigger);
    EdgeFixture {
        driver,
        source,
        surface,
        drag,
    }
}

#[test]
fn drag_checks_the_edge_every_fifth_frame() {
    let mut fx = with_edge_check();
    fx.drag.pointer_down(at(500.0, 0.0));

    for frame in 1..=4 {
        fx.drag.pointer_move(at(500.0 - frame as f32, frame as f64 * 16.0));
        fx.driver.step();
    }
    assert!(fx.source.page_requests().is_empty());

    fx.drag.pointer_move(at(495.0, 80.0));
    fx.driver.step();
    assert_eq!(fx.source.page_requests().len(), 1);
    assert_eq!(fx.surface.write_count(), 5);
}

#[test]
fn momentum_checks_the_edge_every_tenth_frame() {
    let mut fx = with_edge_check();
    fx.drag.pointer_down(at(500.0, 0.0));
    fx.drag.pointer_move(at(480.0, 10.0));
    fx.drag.pointer_up();

    fx.driver.steps(9);
    assert!(fx.source.page_requests().is_empty());
    assert_eq!(fx.drag.frame_count(), 9);

    fx.driver.step();
    assert_eq!(fx.source.page_requests().len(), 1);
}
