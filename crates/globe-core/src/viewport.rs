use crate::camera::PerspectiveCamera;
use crate::constants::MAX_PIXEL_RATIO;
use crate::error::{GlobeError, Result};
use glam::Vec2;

/// Size of the drawing area in CSS pixels plus the display's pixel density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Result<Self> {
        let valid = |v: f32| v.is_finite() && v >= 0.0;
        if !valid(width) || !valid(height) || !valid(device_pixel_ratio) {
            return Err(GlobeError::InvalidViewport {
                width,
                height,
                device_pixel_ratio,
            });
        }
        Ok(Self {
            width,
            height,
            device_pixel_ratio,
        })
    }

    /// Width over height; a collapsed window counts as one pixel tall.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }

    /// Device pixel ratio used for the render target, capped at 2.
    #[inline]
    pub fn pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
    }

    /// Render target size in physical pixels, never zero.
    pub fn surface_size(&self) -> (u32, u32) {
        let r = self.pixel_ratio();
        (
            ((self.width * r).floor() as u32).max(1),
            ((self.height * r).floor() as u32).max(1),
        )
    }

    /// Pixel offset from the viewport centre for an NDC position. Screen Y
    /// grows downward, NDC Y grows upward.
    #[inline]
    pub fn ndc_to_offset(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(ndc.x * self.width * 0.5, -ndc.y * self.height * 0.5)
    }

    /// Client (CSS pixel) position to NDC.
    #[inline]
    pub fn client_to_ndc(&self, client: Vec2) -> Vec2 {
        Vec2::new(
            client.x / self.width.max(1.0) * 2.0 - 1.0,
            -(client.y / self.height.max(1.0)) * 2.0 + 1.0,
        )
    }

    /// Adopts a new window size and refits the camera's projection to it.
    pub fn resize(&mut self, next: Viewport, camera: &mut PerspectiveCamera) {
        *self = next;
        camera.set_aspect(self.aspect());
        log::debug!(
            "[viewport] {}x{} @{}x -> surface {:?}",
            self.width,
            self.height,
            self.pixel_ratio(),
            self.surface_size()
        );
    }
}
