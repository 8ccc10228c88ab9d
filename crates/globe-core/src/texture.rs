use crate::error::{GlobeError, Result};

/// Tightly packed RGBA8 pixels, row-major from the top-left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(GlobeError::TextureSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// 1x1 image of a single colour, used until the real map arrives.
    pub fn solid(color: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: color.to_vec(),
        }
    }

    #[inline]
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

/// Shrinks `width` x `height` to fit within `max` on both axes, keeping the
/// aspect ratio. Sizes already inside the limit come back unchanged.
pub fn fit_extent(width: u32, height: u32, max: u32) -> (u32, u32) {
    let max = max.max(1);
    let longest = width.max(height);
    if longest <= max {
        return (width, height);
    }
    let scale = |v: u32| ((v as u64 * max as u64) / longest as u64).max(1) as u32;
    (scale(width), scale(height))
}
