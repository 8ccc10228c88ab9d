//! Perspective camera with projection helpers for marker placement.

use crate::constants::{camera_start, camera_target, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR};
use crate::raycast::Ray;
use glam::{Mat4, Vec2, Vec3};

/// Depth used when unprojecting a screen point to aim a ray; any value inside
/// the clip range gives the same line through the eye.
const RAY_AIM_DEPTH: f32 = 0.5;

/// Right-handed, Y-up perspective camera. Clip depth maps to [0, 1] as WebGPU
/// expects.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_deg,
            aspect,
            near,
            far,
        }
    }

    /// Camera for the globe page at its starting pose.
    pub fn for_globe(aspect: f32) -> Self {
        let mut cam = Self::new(CAMERA_FOV_DEG, aspect, CAMERA_NEAR, CAMERA_FAR);
        cam.position = camera_start();
        cam.look_at(camera_target());
        cam
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World point to normalized device coordinates (x, y in [-1, 1] when on
    /// screen, z in [0, 1] between the clip planes).
    #[inline]
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection().project_point3(world)
    }

    #[inline]
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.view_projection().inverse().project_point3(ndc)
    }

    /// Ray from the eye through the given NDC screen position.
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Ray {
        let aim = self.unproject(ndc.extend(RAY_AIM_DEPTH));
        Ray::new(self.position, aim - self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_screen_centre() {
        let cam = PerspectiveCamera::for_globe(4.0 / 3.0);
        let ndc = cam.project(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn clip_planes_map_to_depth_range() {
        let mut cam = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        cam.position = Vec3::new(0.0, 0.0, 10.0);
        assert!(cam.project(Vec3::new(0.0, 0.0, 9.9)).z.abs() < 1e-4);
        assert!((cam.project(Vec3::new(0.0, 0.0, -90.0)).z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn unproject_inverts_project() {
        let cam = PerspectiveCamera::for_globe(16.0 / 9.0);
        let p = Vec3::new(0.4, -0.7, 1.1);
        let back = cam.unproject(cam.project(p));
        assert!((back - p).length() < 1e-4, "{back:?}");
    }

    #[test]
    fn ray_through_projected_point_passes_through_it() {
        let cam = PerspectiveCamera::for_globe(1.5);
        let p = Vec3::new(1.039, 1.599, 0.639);
        let ray = cam.ray_through_ndc(cam.project(p).truncate());
        assert_eq!(ray.origin, cam.position);
        let to_p = (p - cam.position).normalize();
        assert!(ray.direction.dot(to_p) > 1.0 - 1e-6);
    }

    #[test]
    fn aspect_change_only_affects_horizontal_projection() {
        let mut cam = PerspectiveCamera::for_globe(1.0);
        let p = Vec3::new(0.5, 0.8, -0.3);
        let before = cam.project(p);
        cam.set_aspect(2.0);
        let after = cam.project(p);
        assert!((after.y - before.y).abs() < 1e-6);
        assert!((after.x * 2.0 - before.x).abs() < 1e-5);
    }
}
