use glam::Vec3;

// Shared scene/camera tuning constants used by the web frontend and tests.

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0; // vertical field of view
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_START: [f32; 3] = [2.0, 2.0, 2.0];
pub const CAMERA_TARGET: [f32; 3] = [0.0, 0.0, 0.0];

// Orbit controls
pub const AUTO_ROTATE: bool = true;
pub const AUTO_ROTATE_SPEED: f32 = 0.5; // 30s per orbit at 60fps when 2.0
pub const ENABLE_DAMPING: bool = true;
pub const DAMPING_FACTOR: f32 = 0.05;
pub const ROTATE_SPEED: f32 = 1.0;
pub const ZOOM_SPEED: f32 = 1.0;

// Globe mesh
pub const GLOBE_RADIUS: f32 = 2.0;
pub const GLOBE_WIDTH_SEGMENTS: u32 = 64;
pub const GLOBE_HEIGHT_SEGMENTS: u32 = 64;
pub const GLOBE_YAW: f32 = std::f32::consts::PI * -0.2; // rotation about +Y

// Lights
pub const AMBIENT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const AMBIENT_INTENSITY: f32 = 2.4;
pub const SUN_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const SUN_INTENSITY: f32 = 1.8;
pub const SUN_POSITION: [f32; 3] = [5.0, 5.0, 5.0];

// Shadow camera (orthographic, looking from the sun at the origin)
pub const SHADOW_MAP_SIZE: u32 = 1024;
pub const SHADOW_EXTENT: f32 = 7.0; // left/right/top/bottom = ±extent
pub const SHADOW_NEAR: f32 = 0.5;
pub const SHADOW_FAR: f32 = 15.0;

// Viewport
pub const MAX_PIXEL_RATIO: f32 = 2.0; // bounds GPU cost on dense displays

#[inline]
pub fn camera_start() -> Vec3 {
    Vec3::from_array(CAMERA_START)
}

#[inline]
pub fn camera_target() -> Vec3 {
    Vec3::from_array(CAMERA_TARGET)
}

#[inline]
pub fn sun_position() -> Vec3 {
    Vec3::from_array(SUN_POSITION)
}
