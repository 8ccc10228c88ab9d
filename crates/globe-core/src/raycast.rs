//! Ray primitives used for marker occlusion tests.

use glam::{Mat4, Vec3};
use smallvec::SmallVec;

const EPSILON: f32 = 1e-7;

/// A half-line starting at `origin`. `direction` is kept normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Moves the ray into another space. The direction is renormalized, so
    /// distances measured along the result are in the target space's units.
    pub fn transform(&self, m: &Mat4) -> Self {
        Self::new(m.transform_point3(self.origin), m.transform_vector3(self.direction))
    }
}

/// One ray/geometry intersection, measured in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Distance from the ray origin to `point`.
    pub distance: f32,
    pub point: Vec3,
    /// Depth-first index of the mesh node that was hit.
    pub node: usize,
    /// Triangle index within that mesh (index buffer offset / 3).
    pub triangle: usize,
}

/// Hits sorted nearest first. Most rays cross a convex globe twice at most.
pub type Hits = SmallVec<[Hit; 4]>;

#[inline]
pub fn sort_hits(hits: &mut Hits) {
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

/// Distance along `ray_dir` (unit length) to the first non-negative crossing
/// of the sphere, or `None` when the ray misses it or points away from it.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let near = -b - root;
    if near >= 0.0 {
        return Some(near);
    }
    // origin inside the sphere
    let far = -b + root;
    (far >= 0.0).then_some(far)
}

/// Möller–Trumbore. Returns the distance along the ray when it crosses the
/// triangle in front of its origin. With `cull_back_faces`, triangles whose
/// counter-clockwise winding faces away from the ray are ignored.
#[inline]
pub fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3, cull_back_faces: bool) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);
    if cull_back_faces {
        if det < EPSILON {
            return None;
        }
    } else if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = inv_det * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = inv_det * edge2.dot(q);
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_triangle() -> (Vec3, Vec3, Vec3) {
        (
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert!((ray.at(5.0) - Vec3::new(3.0, 4.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn transform_moves_origin_and_keeps_unit_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let m = Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0))
            * Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2)
            * Mat4::from_scale(Vec3::splat(2.0));
        let moved = ray.transform(&m);
        assert!((moved.origin - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-5);
        assert!((moved.direction - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn sphere_hit_from_outside_reports_near_surface() {
        let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 2.0);
        assert!((t.unwrap() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn sphere_miss_and_behind() {
        assert!(ray_sphere(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 5.0), 2.0).is_none());
        assert!(ray_sphere(Vec3::ZERO, -Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 2.0).is_none());
    }

    #[test]
    fn sphere_hit_from_inside_reports_exit() {
        let center = Vec3::new(0.0, 0.0, 5.0);
        let t = ray_sphere(center, Vec3::X, center, 3.0).unwrap();
        assert!((t - 3.0).abs() < 1e-5);
    }

    #[test]
    fn triangle_front_face_hit_distance() {
        let (a, b, c) = xy_triangle();
        // counter-clockwise seen from +Z, so a ray travelling -Z sees the front
        let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), -Vec3::Z);
        let t = ray_triangle(&ray, a, b, c, true).unwrap();
        assert!((t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn triangle_back_face_is_culled_only_when_requested() {
        let (a, b, c) = xy_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, -5.0), Vec3::Z);
        assert!(ray_triangle(&ray, a, b, c, true).is_none());
        assert!(ray_triangle(&ray, a, b, c, false).is_some());
    }

    #[test]
    fn triangle_misses_outside_and_parallel() {
        let (a, b, c) = xy_triangle();
        let outside = Ray::new(Vec3::new(0.6, 0.6, 1.0), -Vec3::Z);
        let parallel = Ray::new(Vec3::new(0.2, 0.2, 1.0), Vec3::X);
        let behind = Ray::new(Vec3::new(0.25, 0.25, -1.0), -Vec3::Z);
        assert!(ray_triangle(&outside, a, b, c, false).is_none());
        assert!(ray_triangle(&parallel, a, b, c, false).is_none());
        assert!(ray_triangle(&behind, a, b, c, false).is_none());
    }

    #[test]
    fn hits_sort_nearest_first() {
        let mk = |d: f32| Hit {
            distance: d,
            point: Vec3::ZERO,
            node: 0,
            triangle: 0,
        };
        let mut hits: Hits = [mk(4.0), mk(1.5), mk(3.0)].into_iter().collect();
        sort_hits(&mut hits);
        let ds: Vec<f32> = hits.iter().map(|h| h.distance).collect();
        assert_eq!(ds, vec![1.5, 3.0, 4.0]);
    }

    #[test]
    fn sphere_hits_land_on_the_surface_from_any_side() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(11);
        let unit = |rng: &mut StdRng| loop {
            let v = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if v.length_squared() > 0.01 {
                return v.normalize();
            }
        };
        let center = Vec3::new(0.5, -0.25, 1.0);
        let radius = 2.0;
        for _ in 0..100 {
            let origin = center + unit(&mut rng) * rng.gen_range(2.5..10.0);
            let aim = center + unit(&mut rng) * rng.gen_range(0.0..1.5);
            let toward = (aim - origin).normalize();
            let t = ray_sphere(origin, toward, center, radius).expect("aimed inside");
            let on_surface = (origin + toward * t).distance(center);
            assert!((on_surface - radius).abs() < 1e-3, "{on_surface}");
            assert!(t <= origin.distance(aim) + 1e-4);
            assert_eq!(ray_sphere(origin, -toward, center, radius), None);
        }
    }
}
