pub mod camera;
pub mod constants;
pub mod controls;
pub mod error;
pub mod events;
pub mod frame;
pub mod geometry;
pub mod markers;
pub mod raycast;
pub mod scene;
pub mod texture;
pub mod viewport;
pub mod visibility;

pub static GLOBE_WGSL: &str = include_str!("../../../shaders/globe.wgsl");
pub static SHADOW_WGSL: &str = include_str!("../../../shaders/shadow.wgsl");

pub use camera::*;
pub use controls::*;
pub use error::*;
pub use events::*;
pub use frame::*;
pub use geometry::*;
pub use markers::*;
pub use raycast::*;
pub use scene::*;
pub use texture::*;
pub use viewport::*;
pub use visibility::*;
