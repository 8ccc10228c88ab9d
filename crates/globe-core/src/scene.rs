//! Scene graph: meshes, lights and groups, plus recursive raycasting.

use crate::constants::*;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::raycast::{ray_sphere, ray_triangle, sort_hits, Hit, Hits, Ray};
use glam::{Mat4, Vec3};
use std::sync::Arc;

/// Which faces of a mesh are rendered and hit by rays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub geometry: Arc<Geometry>,
    pub side: Side,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry: Arc::new(geometry),
            side: Side::Front,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// Collects hits of a world-space `ray` against this mesh placed at `world`.
    fn raycast(&self, ray: &Ray, world: &Mat4, node: usize, out: &mut Hits) {
        let local = ray.transform(&world.inverse());
        let geom = &self.geometry;
        if ray_sphere(local.origin, local.direction, geom.bounds_center, geom.bounds_radius)
            .is_none()
        {
            return;
        }
        for triangle in 0..geom.triangle_count() {
            let [a, b, c] = geom.triangle(triangle);
            let t = match self.side {
                Side::Front => ray_triangle(&local, a, b, c, true),
                Side::Back => ray_triangle(&local, c, b, a, true),
                Side::Double => ray_triangle(&local, a, b, c, false),
            };
            if let Some(t) = t {
                let point = world.transform_point3(local.at(t));
                out.push(Hit {
                    distance: point.distance(ray.origin),
                    point,
                    node,
                    triangle,
                });
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Orthographic shadow camera attached to a directional light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowConfig {
    pub map_size: u32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_size: SHADOW_MAP_SIZE,
            left: -SHADOW_EXTENT,
            right: SHADOW_EXTENT,
            bottom: -SHADOW_EXTENT,
            top: SHADOW_EXTENT,
            near: SHADOW_NEAR,
            far: SHADOW_FAR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub shadow: Option<ShadowConfig>,
}

impl DirectionalLight {
    /// Unit vector pointing from the lit surface towards the light.
    pub fn direction(&self) -> Vec3 {
        (self.position - self.target).normalize_or_zero()
    }

    /// World to shadow-map clip transform, if this light casts shadows.
    pub fn shadow_view_projection(&self) -> Option<Mat4> {
        self.shadow.map(|s| {
            let proj = Mat4::orthographic_rh(s.left, s.right, s.bottom, s.top, s.near, s.far);
            proj * Mat4::look_at_rh(self.position, self.target, Vec3::Y)
        })
    }
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Mesh(Mesh),
    Group(Vec<Node>),
    AmbientLight(AmbientLight),
    DirectionalLight(DirectionalLight),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: &'static str,
    /// Local transform relative to the parent node.
    pub transform: Mat4,
    pub kind: NodeKind,
}

impl Node {
    pub fn mesh(name: &'static str, mesh: Mesh) -> Self {
        Self {
            name,
            transform: Mat4::IDENTITY,
            kind: NodeKind::Mesh(mesh),
        }
    }

    pub fn group(name: &'static str, children: Vec<Node>) -> Self {
        Self {
            name,
            transform: Mat4::IDENTITY,
            kind: NodeKind::Group(children),
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }
}

/// Anything a marker's view ray can be blocked by.
pub trait Occluder {
    /// All intersections along `ray`, nearest first.
    fn intersect(&self, ray: &Ray) -> Hits;
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub nodes: Vec<Node>,
}

impl Scene {
    pub fn add(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Meshes with their world transforms, depth first. The position in this
    /// list is the `node` index reported by hits.
    pub fn meshes(&self) -> Vec<(Mat4, &Mesh)> {
        fn walk<'a>(nodes: &'a [Node], parent: Mat4, out: &mut Vec<(Mat4, &'a Mesh)>) {
            for n in nodes {
                let world = parent * n.transform;
                match &n.kind {
                    NodeKind::Mesh(m) => out.push((world, m)),
                    NodeKind::Group(children) => walk(children, world, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.nodes, Mat4::IDENTITY, &mut out);
        out
    }

    pub fn ambient_light(&self) -> Option<AmbientLight> {
        self.lights().find_map(|k| match k {
            NodeKind::AmbientLight(l) => Some(*l),
            _ => None,
        })
    }

    pub fn directional_light(&self) -> Option<DirectionalLight> {
        self.lights().find_map(|k| match k {
            NodeKind::DirectionalLight(l) => Some(*l),
            _ => None,
        })
    }

    fn lights(&self) -> impl Iterator<Item = &NodeKind> {
        // lights are only looked up at the top level
        self.nodes.iter().map(|n| &n.kind)
    }
}

impl Occluder for Scene {
    fn intersect(&self, ray: &Ray) -> Hits {
        let mut hits = Hits::new();
        for (node, (world, mesh)) in self.meshes().into_iter().enumerate() {
            mesh.raycast(ray, &world, node, &mut hits);
        }
        sort_hits(&mut hits);
        hits
    }
}

/// The textured globe with its two lights, as shown on the page.
pub fn build_globe_scene() -> Result<Scene> {
    let mut globe = Mesh::new(Geometry::sphere(
        GLOBE_RADIUS,
        GLOBE_WIDTH_SEGMENTS,
        GLOBE_HEIGHT_SEGMENTS,
    )?);
    globe.cast_shadow = true;
    globe.receive_shadow = true;

    let mut scene = Scene::default();
    scene.add(Node::mesh("globe", globe).with_transform(Mat4::from_rotation_y(GLOBE_YAW)));
    scene.add(Node {
        name: "ambient",
        transform: Mat4::IDENTITY,
        kind: NodeKind::AmbientLight(AmbientLight {
            color: AMBIENT_COLOR,
            intensity: AMBIENT_INTENSITY,
        }),
    });
    scene.add(Node {
        name: "sun",
        transform: Mat4::IDENTITY,
        kind: NodeKind::DirectionalLight(DirectionalLight {
            color: SUN_COLOR,
            intensity: SUN_INTENSITY,
            position: sun_position(),
            target: Vec3::ZERO,
            shadow: Some(ShadowConfig::default()),
        }),
    });
    log::info!("[scene] globe ready ({} nodes)", scene.nodes.len());
    Ok(scene)
}
