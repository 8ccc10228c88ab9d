//! Frame driver: owns all per-session state and advances it one frame at a
//! time. The host supplies time, queued input and an overlay sink, then draws
//! using the returned [`FrameOutput`].

use crate::camera::PerspectiveCamera;
use crate::controls::OrbitControls;
use crate::error::Result;
use crate::events::{InputEvent, PointerState};
use crate::markers::{Marker, EUROPE};
use crate::scene::{build_globe_scene, Scene};
use crate::viewport::Viewport;
use crate::visibility::{update_markers, OverlaySink};
use glam::{Mat4, Vec2, Vec3};
use instant::Instant;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    pub elapsed: Duration,
    pub delta: Duration,
}

/// Monotonic clock measured from construction.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    previous: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            previous: Duration::ZERO,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let elapsed = self.start.elapsed();
        self.tick_at(elapsed)
    }

    /// Advances to an externally supplied elapsed time.
    pub fn tick_at(&mut self, elapsed: Duration) -> FrameTime {
        let delta = elapsed.saturating_sub(self.previous);
        self.previous = elapsed;
        FrameTime { elapsed, delta }
    }
}

/// Shared stop flag for the frame loop. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What the renderer needs to issue this frame's draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutput {
    pub time: FrameTime,
    pub view_projection: Mat4,
    pub camera_position: Vec3,
    /// Physical pixel size of the render target.
    pub surface_size: (u32, u32),
    /// Set when a resize was applied during this step.
    pub resized: bool,
}

pub struct GlobeApp {
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub scene: Scene,
    markers: &'static [Marker],
    pub viewport: Viewport,
    pub pointer: PointerState,
}

impl GlobeApp {
    /// The globe page: lit sphere, European markers, auto-rotating camera.
    pub fn new(viewport: Viewport) -> Result<Self> {
        Ok(Self::with_scene(build_globe_scene()?, &EUROPE, viewport))
    }

    pub fn with_scene(scene: Scene, markers: &'static [Marker], viewport: Viewport) -> Self {
        Self {
            camera: PerspectiveCamera::for_globe(viewport.aspect()),
            controls: OrbitControls::for_globe(),
            scene,
            markers,
            viewport,
            pointer: PointerState::default(),
        }
    }

    /// The marker set is fixed for the life of the app.
    #[inline]
    pub fn markers(&self) -> &'static [Marker] {
        self.markers
    }

    /// Runs one frame: applies queued input, advances the controls, then
    /// recomputes every marker overlay into `sink`.
    pub fn step<I, S>(&mut self, time: FrameTime, events: I, sink: &mut S) -> FrameOutput
    where
        I: IntoIterator<Item = InputEvent>,
        S: OverlaySink + ?Sized,
    {
        let resized = self.apply_events(events);
        self.controls.update(&mut self.camera);
        update_markers(
            self.markers,
            &self.camera,
            &self.scene,
            &self.viewport,
            sink,
        );
        FrameOutput {
            time,
            view_projection: self.camera.view_projection(),
            camera_position: self.camera.position,
            surface_size: self.viewport.surface_size(),
            resized,
        }
    }

    fn apply_events<I: IntoIterator<Item = InputEvent>>(&mut self, events: I) -> bool {
        let mut resized = false;
        for ev in events {
            match ev {
                InputEvent::Resize {
                    width,
                    height,
                    device_pixel_ratio,
                } => match Viewport::new(width, height, device_pixel_ratio) {
                    Ok(next) => {
                        self.viewport.resize(next, &mut self.camera);
                        resized = true;
                    }
                    Err(e) => log::warn!("[viewport] ignoring resize: {e}"),
                },
                InputEvent::PointerMove { x, y } => {
                    let client = Vec2::new(x, y);
                    self.pointer.client = client;
                    self.pointer.ndc = self.viewport.client_to_ndc(client);
                    self.controls.drag_to(client, self.viewport.height);
                }
                InputEvent::PointerDown { x, y } => {
                    let client = Vec2::new(x, y);
                    self.pointer.client = client;
                    self.pointer.ndc = self.viewport.client_to_ndc(client);
                    self.pointer.down = true;
                    self.controls.begin_drag(client);
                }
                InputEvent::PointerUp => {
                    self.pointer.down = false;
                    self.controls.end_drag();
                }
                InputEvent::Wheel { delta_y } => self.controls.wheel(delta_y),
            }
        }
        resized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_reports_delta_between_ticks() {
        let mut clock = FrameClock::new();
        let a = clock.tick_at(Duration::from_millis(16));
        let b = clock.tick_at(Duration::from_millis(40));
        assert_eq!(a.delta, Duration::from_millis(16));
        assert_eq!(b.delta, Duration::from_millis(24));
        assert_eq!(b.elapsed, Duration::from_millis(40));
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut clock = FrameClock::new();
        clock.tick_at(Duration::from_millis(50));
        let t = clock.tick_at(Duration::from_millis(10));
        assert_eq!(t.delta, Duration::ZERO);
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn pointer_events_update_cursor_ndc() {
        let vp = Viewport::new(800.0, 600.0, 1.0).unwrap();
        let mut app = GlobeApp::with_scene(Scene::default(), &[], vp);
        let mut sink: Vec<crate::visibility::MarkerOverlay> = Vec::new();
        app.step(
            FrameTime::default(),
            [InputEvent::PointerMove { x: 600.0, y: 150.0 }],
            &mut sink,
        );
        assert_eq!(app.pointer.ndc, Vec2::new(0.5, 0.5));
        assert!(!app.pointer.down);
    }

    #[test]
    fn invalid_resize_is_ignored() {
        let vp = Viewport::new(800.0, 600.0, 1.0).unwrap();
        let mut app = GlobeApp::with_scene(Scene::default(), &[], vp);
        let mut sink: Vec<crate::visibility::MarkerOverlay> = Vec::new();
        let out = app.step(
            FrameTime::default(),
            [InputEvent::Resize {
                width: f32::NAN,
                height: 10.0,
                device_pixel_ratio: 1.0,
            }],
            &mut sink,
        );
        assert!(!out.resized);
        assert_eq!(app.viewport, vp);
    }
}
