//! Orbit controls: damped rotation and dolly around a fixed target, with
//! optional auto-rotation.

use crate::camera::PerspectiveCamera;
use crate::constants::*;
use glam::{Vec2, Vec3};
use std::f32::consts::PI;

const PHI_EPS: f32 = 1e-6;

/// Radius / polar angle (from +Y) / azimuth (from +Z towards +X).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let ring = self.phi.sin() * self.radius;
        Vec3::new(
            ring * self.theta.sin(),
            self.phi.cos() * self.radius,
            ring * self.theta.cos(),
        )
    }

    /// Keeps the camera off the poles so `look_at` never degenerates.
    fn make_safe(&mut self) {
        self.phi = self.phi.clamp(PHI_EPS, PI - PHI_EPS);
    }
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub auto_rotate: bool,
    /// 2.0 is one orbit per 30 seconds at 60 updates per second.
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    delta: Spherical,
    scale: f32,
    dragging: bool,
    drag_last: Vec2,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: false,
            damping_factor: DAMPING_FACTOR,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            rotate_speed: ROTATE_SPEED,
            zoom_speed: ZOOM_SPEED,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            delta: Spherical::default(),
            scale: 1.0,
            dragging: false,
            drag_last: Vec2::ZERO,
        }
    }
}

impl OrbitControls {
    /// Controls as configured for the globe page.
    pub fn for_globe() -> Self {
        Self {
            target: camera_target(),
            enable_damping: ENABLE_DAMPING,
            auto_rotate: AUTO_ROTATE,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Angle added by auto-rotation on every update.
    #[inline]
    pub fn auto_rotation_angle(&self) -> f32 {
        2.0 * PI / 60.0 / 60.0 * self.auto_rotate_speed
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta.phi -= angle;
    }

    pub fn begin_drag(&mut self, at: Vec2) {
        self.dragging = true;
        self.drag_last = at;
    }

    /// Pointer moved to `at` (CSS pixels) while dragging. A full viewport
    /// height of travel turns the camera once around.
    pub fn drag_to(&mut self, at: Vec2, viewport_height: f32) {
        if !self.dragging {
            return;
        }
        let d = (at - self.drag_last) * self.rotate_speed;
        self.drag_last = at;
        let h = viewport_height.max(1.0);
        self.rotate_left(2.0 * PI * d.x / h);
        self.rotate_up(2.0 * PI * d.y / h);
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Wheel input: negative `delta_y` (scroll up) moves the camera closer.
    pub fn wheel(&mut self, delta_y: f32) {
        let step = 0.95_f32.powf(self.zoom_speed);
        if delta_y < 0.0 {
            self.scale *= step;
        } else if delta_y > 0.0 {
            self.scale /= step;
        }
    }

    /// Applies pending rotation/zoom to `camera` and leaves it looking at
    /// the target. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let mut s = Spherical::from_offset(offset);

        if self.auto_rotate && !self.dragging {
            self.rotate_left(self.auto_rotation_angle());
        }

        if self.enable_damping {
            s.theta += self.delta.theta * self.damping_factor;
            s.phi += self.delta.phi * self.damping_factor;
        } else {
            s.theta += self.delta.theta;
            s.phi += self.delta.phi;
        }
        s.phi = s.phi.clamp(self.min_polar_angle, self.max_polar_angle);
        s.make_safe();
        s.radius = (s.radius * self.scale).clamp(self.min_distance, self.max_distance);

        let position = self.target + s.to_offset();
        let moved = position.distance_squared(camera.position) > 1e-12;
        camera.position = position;
        camera.look_at(self.target);

        if self.enable_damping {
            self.delta.theta *= 1.0 - self.damping_factor;
            self.delta.phi *= 1.0 - self.damping_factor;
        } else {
            self.delta = Spherical::default();
        }
        self.scale = 1.0;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn globe_camera() -> PerspectiveCamera {
        PerspectiveCamera::for_globe(1.0)
    }

    #[test]
    fn spherical_round_trips_offsets() {
        let v = Vec3::new(2.0, 2.0, 2.0);
        let back = Spherical::from_offset(v).to_offset();
        assert!((back - v).length() < 1e-5);
    }

    #[test]
    fn auto_rotation_keeps_distance_and_height() {
        let mut cam = globe_camera();
        let mut controls = OrbitControls::for_globe();
        let start = cam.position;
        for _ in 0..120 {
            controls.update(&mut cam);
        }
        assert!((cam.position.length() - start.length()).abs() < 1e-3);
        assert!((cam.position.y - start.y).abs() < 1e-3);
        assert!(cam.position.distance(start) > 1e-3);
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn undamped_auto_rotation_advances_fixed_angle_per_update() {
        let mut cam = globe_camera();
        let mut controls = OrbitControls::for_globe();
        controls.enable_damping = false;
        let theta0 = Spherical::from_offset(cam.position).theta;
        controls.update(&mut cam);
        let theta1 = Spherical::from_offset(cam.position).theta;
        assert!((theta0 - theta1 - controls.auto_rotation_angle()).abs() < 1e-5);
    }

    #[test]
    fn damped_rotation_converges_to_requested_angle() {
        let mut cam = globe_camera();
        let mut controls = OrbitControls::for_globe();
        controls.auto_rotate = false;
        let theta0 = Spherical::from_offset(cam.position).theta;
        controls.rotate_left(0.3);
        for _ in 0..600 {
            controls.update(&mut cam);
        }
        let theta = Spherical::from_offset(cam.position).theta;
        assert!((theta0 - 0.3 - theta).abs() < 1e-3, "{theta0} -> {theta}");
    }

    #[test]
    fn dragging_pauses_auto_rotation() {
        let mut cam = globe_camera();
        let mut controls = OrbitControls::for_globe();
        controls.begin_drag(Vec2::new(100.0, 100.0));
        let start = cam.position;
        controls.update(&mut cam);
        assert!(cam.position.distance(start) < 1e-5);
        controls.end_drag();
        controls.update(&mut cam);
        assert!(cam.position.distance(start) > 1e-6);
    }

    #[test]
    fn vertical_drag_is_clamped_off_the_pole() {
        let mut cam = globe_camera();
        let mut controls = OrbitControls::for_globe();
        controls.enable_damping = false;
        controls.auto_rotate = false;
        controls.begin_drag(Vec2::ZERO);
        controls.drag_to(Vec2::new(0.0, 5000.0), 600.0);
        controls.update(&mut cam);
        let s = Spherical::from_offset(cam.position);
        assert!(s.phi > 0.0 && s.phi < 1e-3);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn wheel_dollies_in_and_out() {
        let mut cam = globe_camera();
        let mut controls = OrbitControls::for_globe();
        controls.auto_rotate = false;
        let r0 = cam.position.length();
        controls.wheel(-120.0);
        controls.update(&mut cam);
        assert!((cam.position.length() - r0 * 0.95).abs() < 1e-4);
        controls.wheel(120.0);
        controls.update(&mut cam);
        assert!((cam.position.length() - r0).abs() < 1e-4);
    }
}
