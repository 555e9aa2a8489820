//! # pageflow
//!
//! Document layout reconstruction library for Rust.
//!
//! This library turns the geometric primitives of a page — glyphs, ruling
//! lines, embedded images — into an ordered structural model: words, lines,
//! paragraphs, table grids, and page flows, assembled into a [`Document`].
//! Primitive extraction and output rendering live outside the library; the
//! core is a pure in-memory transformation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pageflow::{reconstruct, Config, PagePrimitives};
//!
//! fn main() -> pageflow::Result<()> {
//!     let pages: Vec<PagePrimitives> = load_pages();
//!     let doc = reconstruct("document.pdf", &pages, &Config::default())?;
//!     println!("{}", doc.plain_text());
//!     Ok(())
//! }
//! # fn load_pages() -> Vec<pageflow::PagePrimitives> { vec![] }
//! ```
//!
//! ## Features
//!
//! - **Adaptive tolerances**: clustering thresholds derived per page from
//!   glyph statistics, overridable through [`Config`]
//! - **Table reconstruction**: ruling normalization (dotted, curved, double
//!   lines) and grid cell assignment
//! - **Paragraph assembly**: font-size and gap heuristics with
//!   header/footer/page-number exclusion bands
//! - **Parallel processing**: uses Rayon across pages, with an ordered
//!   streaming mode over crossbeam channels

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod stream;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use geometry::{BBox, Orientation, Point};
pub use input::{CharPrimitive, ImagePrimitive, PagePrimitives, RulingPrimitive};
pub use layout::{Edge, EdgeStyle, Tolerances};
pub use model::{Block, Cell, Document, Image, Page, Paragraph, Table};
pub use pipeline::{assemble, assemble_sequential, process_page};
pub use stream::{stream, OrderedEmitter};

/// Reconstruct a document from per-page primitives.
///
/// Pages are processed in parallel; the result lists them in input order.
/// This is a convenience wrapper around [`pipeline::assemble`].
///
/// # Example
///
/// ```no_run
/// use pageflow::{reconstruct, Config, PagePrimitives};
///
/// let pages = vec![PagePrimitives::new(612.0, 792.0)];
/// let doc = reconstruct("report.pdf", &pages, &Config::default()).unwrap();
/// assert_eq!(doc.page_count(), 1);
/// ```
pub fn reconstruct(
    source_name: &str,
    pages: &[PagePrimitives],
    config: &Config,
) -> Result<Document> {
    pipeline::assemble(source_name, pages, config)
}
