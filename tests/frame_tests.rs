// Host-side tests for the per-frame driver.
// Time and input are injected, so no browser is needed.

use globe_core::{
    CancelToken, EventQueue, FrameClock, GlobeApp, InputEvent, MarkerOverlay, Viewport, EUROPE,
};
use glam::{Vec2, Vec3};
use std::time::Duration;

const NO_INPUT: [InputEvent; 0] = [];

fn app(w: f32, h: f32) -> GlobeApp {
    GlobeApp::new(Viewport::new(w, h, 1.0).unwrap()).unwrap()
}

#[test]
fn every_marker_gets_an_overlay_each_frame() {
    let mut app = app(800.0, 600.0);
    let mut clock = FrameClock::new();
    let mut sink: Vec<MarkerOverlay> = Vec::new();
    let out = app.step(clock.tick_at(Duration::from_millis(16)), NO_INPUT, &mut sink);
    assert_eq!(sink.len(), EUROPE.len());
    assert!(sink.iter().all(|o| o.visible));
    assert_eq!(out.surface_size, (800, 600));
    assert!(!out.resized);
}

#[test]
fn marker_set_stays_fixed_across_frames() {
    let mut app = app(800.0, 600.0);
    assert!(std::ptr::eq(app.markers(), &EUROPE[..]));
    let mut clock = FrameClock::new();
    let mut sink: Vec<MarkerOverlay> = Vec::new();
    for i in 1..=5u64 {
        sink.clear();
        app.step(clock.tick_at(Duration::from_millis(16 * i)), NO_INPUT, &mut sink);
        assert_eq!(sink.len(), EUROPE.len());
    }
    assert_eq!(app.markers().len(), EUROPE.len());
}

#[test]
fn auto_rotation_moves_labels_between_frames() {
    let mut app = app(800.0, 600.0);
    let mut clock = FrameClock::new();
    let mut first: Vec<MarkerOverlay> = Vec::new();
    let mut later: Vec<MarkerOverlay> = Vec::new();
    let a = app.step(clock.tick_at(Duration::from_millis(16)), NO_INPUT, &mut first);
    for i in 2..30 {
        app.step(clock.tick_at(Duration::from_millis(16 * i)), NO_INPUT, &mut later);
    }
    let b = app.step(clock.tick_at(Duration::from_millis(500)), NO_INPUT, &mut later);
    assert_ne!(a.camera_position, b.camera_position);
    assert!(first[0].offset.distance(later[0].offset) > 0.1);
    assert_eq!(b.time.delta, Duration::from_millis(500 - 16 * 29));
}

#[test]
fn identical_sessions_produce_identical_frames() {
    let script = |app: &mut GlobeApp| {
        let mut clock = FrameClock::new();
        let mut sink: Vec<MarkerOverlay> = Vec::new();
        let mut outputs = Vec::new();
        for i in 1..=20u64 {
            let events = match i {
                3 => vec![InputEvent::PointerDown { x: 400.0, y: 300.0 }],
                4..=8 => vec![InputEvent::PointerMove {
                    x: 400.0 + i as f32 * 12.0,
                    y: 300.0,
                }],
                9 => vec![InputEvent::PointerUp, InputEvent::Wheel { delta_y: -100.0 }],
                _ => Vec::new(),
            };
            outputs.push(app.step(clock.tick_at(Duration::from_millis(i * 16)), events, &mut sink));
        }
        (outputs, sink)
    };
    let a = script(&mut app(800.0, 600.0));
    let b = script(&mut app(800.0, 600.0));
    assert_eq!(a, b);
}

#[test]
fn resize_event_refits_camera_and_surface() {
    let mut app = app(800.0, 600.0);
    let mut q = EventQueue::default();
    q.push(InputEvent::Resize {
        width: 1600.0,
        height: 900.0,
        device_pixel_ratio: 3.0,
    });
    let mut sink: Vec<MarkerOverlay> = Vec::new();
    let out = app.step(FrameClock::new().tick_at(Duration::ZERO), q.drain(), &mut sink);
    assert!(out.resized);
    assert!(q.is_empty());
    assert_eq!(app.camera.aspect, 1600.0 / 900.0);
    // pixel ratio is capped at 2
    assert_eq!(out.surface_size, (3200, 1800));
}

#[test]
fn zero_height_window_keeps_frames_finite() {
    let mut app = app(800.0, 600.0);
    let mut sink: Vec<MarkerOverlay> = Vec::new();
    let out = app.step(
        Default::default(),
        [InputEvent::Resize {
            width: 800.0,
            height: 0.0,
            device_pixel_ratio: 1.0,
        }],
        &mut sink,
    );
    assert!(out.view_projection.is_finite());
    assert_eq!(out.surface_size, (800, 1));
    assert!(sink.iter().all(|o| o.offset.is_finite()));
}

#[test]
fn dragging_rotates_the_view_and_release_resumes() {
    let mut app = app(800.0, 600.0);
    app.controls.enable_damping = false;
    let start = app.camera.position;
    let mut sink: Vec<MarkerOverlay> = Vec::new();
    app.step(
        Default::default(),
        [
            InputEvent::PointerDown { x: 100.0, y: 300.0 },
            InputEvent::PointerMove { x: 250.0, y: 300.0 },
        ],
        &mut sink,
    );
    assert!(app.pointer.down);
    assert!(app.controls.is_dragging());
    // a quarter of the viewport height in x is a quarter turn
    let xz = |v: Vec3| Vec2::new(v.x, v.z);
    let turned = xz(start).angle_between(xz(app.camera.position));
    assert!((turned.abs() - std::f32::consts::FRAC_PI_2).abs() < 1e-3, "{turned}");
    app.step(Default::default(), [InputEvent::PointerUp], &mut sink);
    assert!(!app.controls.is_dragging());
}

#[test]
fn interrupted_drag_resumes_auto_rotation() {
    let mut app = app(800.0, 600.0);
    let mut sink: Vec<MarkerOverlay> = Vec::new();
    app.step(
        Default::default(),
        [InputEvent::PointerDown { x: 400.0, y: 300.0 }],
        &mut sink,
    );
    assert!(app.controls.is_dragging());
    // pointercancel arrives from the page as a release
    app.step(Default::default(), [InputEvent::PointerUp], &mut sink);
    assert!(!app.controls.is_dragging());
    let before = app.camera.position;
    app.step(Default::default(), NO_INPUT, &mut sink);
    assert!(before.distance(app.camera.position) > 1e-5);
}

#[test]
fn cancelled_token_is_seen_by_loop_clones() {
    let token = CancelToken::new();
    let in_loop = token.clone();
    token.cancel();
    assert!(in_loop.is_cancelled());
}
