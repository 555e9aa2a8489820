//! Image type.

use serde::{Deserialize, Serialize};

use crate::geometry::BBox;

/// A retained raster image with the metadata an external renderer needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Placement box on the page
    pub bbox: BBox,

    /// Pixel width
    pub width: u32,

    /// Pixel height
    pub height: u32,

    /// Bits per component
    pub bits: u8,

    /// Source byte size
    pub srcsize: u64,

    /// Source format, e.g. "jpeg"
    pub format: String,
}

impl Image {
    /// Pixel area of the image.
    pub fn pixel_area(&self) -> f32 {
        self.width as f32 * self.height as f32
    }
}
