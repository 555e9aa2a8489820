//! Page-level types.

use serde::{Deserialize, Serialize};

use crate::geometry::BBox;

use super::{Image, Paragraph, Table};

/// A single reconstructed page: an ordered top-to-bottom, left-to-right
/// content flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// 0-based page index
    pub index: usize,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Tag inherited from the document's unique prefix, e.g. "report_1a2b_p3"
    pub tag: String,

    /// Content blocks in reading order
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create an empty page.
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            tag: String::new(),
            blocks: Vec::new(),
        }
    }

    /// Stamp the page with the document prefix.
    pub fn with_tag(mut self, prefix: &str) -> Self {
        self.tag = format!("{}_p{}", prefix, self.index);
        self
    }

    /// Whether the page has no content blocks. An empty page is a valid
    /// result, not an error.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Plain text of the page, blocks separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|block| {
                let text = match block {
                    Block::Paragraph(p) => p.plain_text(),
                    Block::Table(t) => t.plain_text(),
                    Block::Image(_) => return None,
                };
                Some(text)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Iterate over the tables on this page.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Iterate over the paragraphs on this page.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Iterate over the images on this page.
    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Image(i) => Some(i),
            _ => None,
        })
    }
}

/// A content block on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A reconstructed table
    Table(Table),

    /// A retained raster image
    Image(Image),
}

impl Block {
    /// Bounding box of the block, used for flow ordering.
    pub fn bbox(&self) -> BBox {
        match self {
            Block::Paragraph(p) => p.bbox,
            Block::Table(t) => t.bbox,
            Block::Image(i) => i.bbox,
        }
    }

    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph(_))
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Check if this block is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, Block::Image(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_new() {
        let page = Page::new(0, 612.0, 792.0).with_tag("doc_1234");
        assert_eq!(page.index, 0);
        assert_eq!(page.tag, "doc_1234_p0");
        assert!(page.is_empty());
    }

    #[test]
    fn test_block_kinds() {
        let p = Paragraph::from_text_lines(vec!["hello".to_string()], 12.0, BBox::new(0.0, 0.0, 10.0, 10.0));
        let block = Block::Paragraph(p);
        assert!(block.is_paragraph());
        assert!(!block.is_table());
        assert_eq!(block.bbox().x1, 10.0);
    }
}
