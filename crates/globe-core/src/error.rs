use thiserror::Error;

/// Errors raised while building the globe scene or its inputs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GlobeError {
    #[error("invalid viewport {width}x{height} @ {device_pixel_ratio}x")]
    InvalidViewport {
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
    },
    #[error("sphere needs at least 3x2 segments, got {width_segments}x{height_segments}")]
    InvalidSphere {
        width_segments: u32,
        height_segments: u32,
    },
    #[error("texture {width}x{height} expects {expected} bytes, got {actual}")]
    TextureSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("no overlay element matches `{selector}` (marker `{label}`)")]
    MissingOverlay {
        label: &'static str,
        selector: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, GlobeError>;
