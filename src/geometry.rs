//! Shared geometric primitives.
//!
//! Coordinates follow the extraction convention: the origin is the top-left
//! corner of the page, x grows rightward and y grows downward. All layout
//! passes compare positions through tolerances rather than exact equality.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Area of the box.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Center point of the box.
    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Whether the box has zero (or negative) area.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Whether a point lies inside the box (edges inclusive).
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
    }

    /// Intersection area with another box (0.0 when disjoint).
    pub fn intersection_area(&self, other: &BBox) -> f32 {
        let w = self.x1.min(other.x1) - self.x0.max(other.x0);
        let h = self.y1.min(other.y1) - self.y0.max(other.y0);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    /// Whether the vertical extents of two boxes overlap, with `slack`
    /// widening both bands.
    pub fn vertical_overlap(&self, other: &BBox, slack: f32) -> bool {
        self.y0 - slack <= other.y1 && other.y0 - slack <= self.y1
    }

    /// Smallest box covering both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    /// Box grown by `amount` on every side.
    pub fn expanded(&self, amount: f32) -> BBox {
        BBox::new(
            self.x0 - amount,
            self.y0 - amount,
            self.x1 + amount,
            self.y1 + amount,
        )
    }

    /// Whether two boxes intersect (touching counts).
    pub fn intersects(&self, other: &BBox) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }
}

/// A point on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Orientation of a ruling edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Runs left-to-right; its cross-axis position is a y coordinate
    Horizontal,
    /// Runs top-to-bottom; its cross-axis position is an x coordinate
    Vertical,
}

/// Total order for f32 sort keys. NaN sorts last; positions coming out of
/// the extractor are finite.
pub(crate) fn cmp_f32(a: f32, b: f32) -> std::cmp::Ordering {
    a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_basics() {
        let b = BBox::new(10.0, 20.0, 30.0, 50.0);
        assert_eq!(b.width(), 20.0);
        assert_eq!(b.height(), 30.0);
        assert_eq!(b.area(), 600.0);
        assert_eq!(b.center(), Point::new(20.0, 35.0));
        assert!(!b.is_degenerate());
        assert!(BBox::new(1.0, 1.0, 1.0, 5.0).is_degenerate());
    }

    #[test]
    fn test_intersection_area() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, 5.0, 15.0, 15.0);
        assert_eq!(a.intersection_area(&b), 25.0);

        let c = BBox::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.intersection_area(&c), 0.0);
    }

    #[test]
    fn test_vertical_overlap() {
        let a = BBox::new(0.0, 100.0, 10.0, 110.0);
        let b = BBox::new(50.0, 108.0, 60.0, 118.0);
        let c = BBox::new(50.0, 200.0, 60.0, 210.0);
        assert!(a.vertical_overlap(&b, 0.0));
        assert!(!a.vertical_overlap(&c, 5.0));
    }

    #[test]
    fn test_union_and_expand() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, -5.0, 20.0, 8.0);
        let u = a.union(&b);
        assert_eq!(u, BBox::new(0.0, -5.0, 20.0, 10.0));
        assert_eq!(a.expanded(1.0), BBox::new(-1.0, -1.0, 11.0, 11.0));
    }
}
