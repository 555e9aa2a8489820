//! Raw page primitives consumed by the layout engine.
//!
//! An external extraction collaborator produces these per page from whatever
//! page description format it reads. The engine treats them as immutable
//! input: glyphs with bounding boxes, ruling/curve primitives, and raster
//! images with their metadata.

use serde::{Deserialize, Serialize};

use crate::geometry::{BBox, Point};

/// A single rendered text unit with a bounding box and font size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharPrimitive {
    /// The glyph text (usually one character, ligatures may carry more)
    pub text: String,
    /// Glyph bounding box
    pub bbox: BBox,
    /// Font size in points
    pub size: f32,
}

impl CharPrimitive {
    /// Create a new glyph primitive.
    pub fn new(text: impl Into<String>, bbox: BBox, size: f32) -> Self {
        Self {
            text: text.into(),
            bbox,
            size,
        }
    }
}

/// A raw ruling/curve primitive, before edge normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RulingPrimitive {
    /// A straight segment
    Line {
        /// One endpoint
        p1: Point,
        /// The other endpoint
        p2: Point,
    },
    /// A stroked rectangle; contributes its four border segments
    Rect {
        /// The rectangle outline
        bbox: BBox,
    },
    /// A curved path, given as a polyline approximation
    Curve {
        /// Sampled points along the curve
        points: Vec<Point>,
    },
    /// A dot of a dotted ruling
    Dot {
        /// Dot position
        p: Point,
    },
}

/// A raw embedded raster image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePrimitive {
    /// Placement box on the page
    pub bbox: BBox,
    /// Source byte size (`srcsize` metadata key)
    pub srcsize: u64,
    /// Pixel height (`height` metadata key)
    pub height: u32,
    /// Pixel width (`width` metadata key)
    pub width: u32,
    /// Bits per component (`bits` metadata key)
    pub bits: u8,
    /// Source format, e.g. "jpeg"
    pub format: String,
}

impl ImagePrimitive {
    /// Pixel area of the image.
    pub fn pixel_area(&self) -> f32 {
        self.width as f32 * self.height as f32
    }
}

/// All raw primitives of one page.
///
/// Pages are independent of one another; a `PagePrimitives` value is a
/// read-only snapshot for one page-processing invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagePrimitives {
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Glyphs on the page
    pub chars: Vec<CharPrimitive>,
    /// Ruling/curve primitives on the page
    pub rulings: Vec<RulingPrimitive>,
    /// Embedded raster images on the page
    pub images: Vec<ImagePrimitive>,
}

impl PagePrimitives {
    /// Create an empty primitive set for a page of the given dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Whether the page carries no primitives at all.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty() && self.rulings.is_empty() && self.images.is_empty()
    }
}
