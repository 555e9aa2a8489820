//! Paragraph type.

use serde::{Deserialize, Serialize};

use crate::geometry::BBox;

/// A paragraph: an ordered run of merged text lines sharing a font-size
/// band. Never spans a header/footer/page-number exclusion band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text of each constituent line, top to bottom
    pub text_lines: Vec<String>,

    /// Dominant font size of the paragraph in points
    pub font_size: f32,

    /// Bounding box covering every constituent line
    pub bbox: BBox,
}

impl Paragraph {
    /// Build a paragraph from already-joined line texts.
    pub fn from_text_lines(text_lines: Vec<String>, font_size: f32, bbox: BBox) -> Self {
        Self {
            text_lines,
            font_size,
            bbox,
        }
    }

    /// Plain text of the paragraph, lines joined by newlines.
    pub fn plain_text(&self) -> String {
        self.text_lines.join("\n")
    }

    /// Number of lines merged into this paragraph.
    pub fn line_count(&self) -> usize {
        self.text_lines.len()
    }

    /// Whether the paragraph carries no visible text.
    pub fn is_empty(&self) -> bool {
        self.text_lines.iter().all(|l| l.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let p = Paragraph::from_text_lines(
            vec!["first line".to_string(), "second line".to_string()],
            12.0,
            BBox::new(0.0, 0.0, 100.0, 24.0),
        );
        assert_eq!(p.plain_text(), "first line\nsecond line");
        assert_eq!(p.line_count(), 2);
        assert!(!p.is_empty());
    }

    #[test]
    fn test_empty_paragraph() {
        let p = Paragraph::from_text_lines(vec!["  ".to_string()], 12.0, BBox::new(0.0, 0.0, 1.0, 1.0));
        assert!(p.is_empty());
    }
}
