//! Indexed triangle geometry shared by the renderer and the raycaster.

use crate::error::{GlobeError, Result};
use glam::Vec3;
use std::f32::consts::PI;

/// Interleaved vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Clone, Debug)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Local-space bounding sphere used to reject rays before the triangle loop.
    pub bounds_center: Vec3,
    pub bounds_radius: f32,
}

impl Geometry {
    pub fn from_parts(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let (bounds_center, bounds_radius) = bounding_sphere(&vertices);
        Self {
            vertices,
            indices,
            bounds_center,
            bounds_radius,
        }
    }

    /// UV sphere centred on the origin with poles on the Y axis.
    ///
    /// Rows run from the north pole (`v = 0`) to the south pole (`v = 1`);
    /// longitude zero sits on -X and increases towards +Z. The first and last
    /// rows collapse onto the poles, so those bands emit one triangle per
    /// segment and their UVs are shifted half a segment to centre the cap.
    /// Faces wind counter-clockwise seen from outside.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Result<Self> {
        if width_segments < 3 || height_segments < 2 {
            return Err(GlobeError::InvalidSphere {
                width_segments,
                height_segments,
            });
        }
        let cols = width_segments as usize + 1;
        let mut vertices = Vec::with_capacity(cols * (height_segments as usize + 1));
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let u_offset = if iy == 0 {
                0.5 / width_segments as f32
            } else if iy == height_segments {
                -0.5 / width_segments as f32
            } else {
                0.0
            };
            let theta = v * PI;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let phi = u * PI * 2.0;
                let position = Vec3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                vertices.push(Vertex {
                    position: position.to_array(),
                    normal: position.normalize_or_zero().to_array(),
                    uv: [u + u_offset, v],
                });
            }
        }

        let at = |iy: u32, ix: u32| iy * cols as u32 + ix;
        let mut indices = Vec::with_capacity(width_segments as usize * height_segments as usize * 6);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = at(iy, ix + 1);
                let b = at(iy, ix);
                let c = at(iy + 1, ix);
                let d = at(iy + 1, ix + 1);
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        log::debug!(
            "[scene] sphere r={} {}x{}: {} vertices, {} triangles",
            radius,
            width_segments,
            height_segments,
            vertices.len(),
            indices.len() / 3
        );
        Ok(Self::from_parts(vertices, indices))
    }

    /// Square in the XY plane facing +Z.
    pub fn quad(half_extent: f32) -> Self {
        let e = half_extent;
        let corner = |x: f32, y: f32, u: f32, v: f32| Vertex {
            position: [x, y, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [u, v],
        };
        Self::from_parts(
            vec![
                corner(-e, -e, 0.0, 1.0),
                corner(e, -e, 1.0, 1.0),
                corner(e, e, 1.0, 0.0),
                corner(-e, e, 0.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of triangle `i`.
    #[inline]
    pub fn triangle(&self, i: usize) -> [Vec3; 3] {
        let idx = &self.indices[i * 3..i * 3 + 3];
        [
            Vec3::from_array(self.vertices[idx[0] as usize].position),
            Vec3::from_array(self.vertices[idx[1] as usize].position),
            Vec3::from_array(self.vertices[idx[2] as usize].position),
        ]
    }
}

fn bounding_sphere(vertices: &[Vertex]) -> (Vec3, f32) {
    if vertices.is_empty() {
        return (Vec3::ZERO, 0.0);
    }
    let (min, max) = vertices.iter().fold(
        (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
        |(lo, hi), v| {
            let p = Vec3::from_array(v.position);
            (lo.min(p), hi.max(p))
        },
    );
    let center = (min + max) * 0.5;
    let radius = vertices
        .iter()
        .map(|v| Vec3::from_array(v.position).distance_squared(center))
        .fold(0.0_f32, f32::max)
        .sqrt();
    (center, radius)
}
