//! Page flow composition.

use crate::geometry::cmp_f32;
use crate::model::{Block, Image, Paragraph, Table};

/// Merge one page's retained tables, paragraphs, and images into a single
/// flow ordered top to bottom, left to right on ties.
pub fn compose_blocks(
    tables: Vec<Table>,
    paragraphs: Vec<Paragraph>,
    images: Vec<Image>,
) -> Vec<Block> {
    let mut blocks: Vec<Block> =
        Vec::with_capacity(tables.len() + paragraphs.len() + images.len());
    blocks.extend(tables.into_iter().map(Block::Table));
    blocks.extend(paragraphs.into_iter().map(Block::Paragraph));
    blocks.extend(images.into_iter().map(Block::Image));

    blocks.sort_by(|a, b| {
        let (ba, bb) = (a.bbox(), b.bbox());
        cmp_f32(ba.y0, bb.y0).then_with(|| cmp_f32(ba.x0, bb.x0))
    });
    blocks
}
