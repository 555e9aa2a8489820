//! Reconstructed document model.
//!
//! This is the terminal artifact of the engine: an ordered, semantically
//! tagged flow of tables, paragraphs and images per page. All types are
//! immutable once a page-processing pass has produced them and are
//! format-agnostic; an external rendering collaborator maps them onto
//! output markup.

mod document;
mod image;
mod page;
mod paragraph;
mod table;

pub use document::Document;
pub use image::Image;
pub use page::{Block, Page};
pub use paragraph::Paragraph;
pub use table::{Cell, Table};
