//! Page processing pipeline and document assembly.
//!
//! Pages are independent of one another, so [`assemble`] fans them out over
//! the rayon pool and collects the results back in page-index order. Inside
//! a page, edge detection and image filtering run concurrently; the table
//! builder claims glyphs into cells, and whatever it leaves behind feeds
//! paragraph assembly.

use rayon::prelude::*;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::input::{CharPrimitive, PagePrimitives};
use crate::layout::{cluster, compose, images, paragraph, rulings, table_builder, Tolerances};
use crate::model::{Document, Page};

/// Reconstruct the layout of a single page. Never fails: unrecoverable
/// structure is omitted with a log entry and an empty page is a valid
/// result.
pub fn process_page(index: usize, primitives: &PagePrimitives, config: &Config) -> Page {
    let mut page = Page::new(index, primitives.width, primitives.height);
    if primitives.is_empty() {
        log::debug!("page {} has no primitives", index);
        return page;
    }

    let tol = Tolerances::resolve(&primitives.chars, config);

    // Edge detection and image filtering are independent of each other.
    let (edges, page_images) = rayon::join(
        || {
            if config.table_flag {
                rulings::detect(&primitives.rulings, &tol, config)
            } else {
                vec![]
            }
        },
        || images::filter_images(&primitives.images, primitives.height, config),
    );

    let mut consumed = vec![false; primitives.chars.len()];
    let tables = table_builder::build_tables(&edges, &primitives.chars, &tol, config, &mut consumed);

    // Only the glyphs actually claimed into table cells are withheld from
    // paragraph assembly; everything else clusters into lines, even when it
    // sits next to a table border.
    let free_chars: Vec<CharPrimitive> = primitives
        .chars
        .iter()
        .zip(&consumed)
        .filter(|(_, taken)| !**taken)
        .map(|(c, _)| c.clone())
        .collect();
    let claimed = primitives.chars.len() - free_chars.len();
    if claimed > 0 {
        log::debug!("page {}: {} glyphs claimed by tables", index, claimed);
    }

    let lines = cluster::cluster_lines(&free_chars, &tol, config.char_overlap_size);
    let paragraphs = paragraph::assemble_paragraphs(
        &lines,
        primitives.width,
        primitives.height,
        config,
    );

    page.blocks = compose::compose_blocks(tables, paragraphs, page_images);
    log::debug!(
        "page {} composed: {} blocks",
        index,
        page.blocks.len()
    );
    page
}

/// Reconstruct a whole document, processing pages in parallel. Page order
/// in the result always matches input order regardless of completion order.
pub fn assemble(
    source_name: &str,
    pages: &[PagePrimitives],
    config: &Config,
) -> Result<Document> {
    validate(pages)?;
    let mut document = new_document(source_name, config);
    let prefix = document.unique_prefix.clone();

    let built: Vec<Page> = pages
        .par_iter()
        .enumerate()
        .map(|(index, primitives)| process_page(index, primitives, config).with_tag(&prefix))
        .collect();

    for page in built {
        document.add_page(page);
    }
    Ok(document)
}

/// Single-threaded variant of [`assemble`].
pub fn assemble_sequential(
    source_name: &str,
    pages: &[PagePrimitives],
    config: &Config,
) -> Result<Document> {
    validate(pages)?;
    let mut document = new_document(source_name, config);
    for (index, primitives) in pages.iter().enumerate() {
        let page = process_page(index, primitives, config).with_tag(&document.unique_prefix);
        document.add_page(page);
    }
    Ok(document)
}

fn new_document(source_name: &str, config: &Config) -> Document {
    match &config.unique_prefix {
        Some(prefix) => Document::with_prefix(source_name, prefix.clone()),
        None => Document::new(source_name),
    }
}

/// The unique prefix a document built from this source would carry.
pub(crate) fn new_document_prefix(source_name: &str, config: &Config) -> String {
    new_document(source_name, config).unique_prefix
}

/// Reject a primitive set that is malformed at the system boundary. Page
/// dimensions must be finite and positive; everything else is recovered
/// per page.
pub(crate) fn validate(pages: &[PagePrimitives]) -> Result<()> {
    for (index, page) in pages.iter().enumerate() {
        if !page.width.is_finite() || !page.height.is_finite() || page.width <= 0.0 || page.height <= 0.0 {
            return Err(Error::InvalidPrimitives(format!(
                "page {} has invalid dimensions {}x{}",
                index, page.width, page.height
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BBox, Point};
    use crate::input::{CharPrimitive, RulingPrimitive};

    fn glyph(text: &str, x0: f32, y0: f32) -> CharPrimitive {
        CharPrimitive {
            text: text.to_string(),
            bbox: BBox::new(x0, y0, x0 + 7.0, y0 + 10.0),
            size: 10.0,
        }
    }

    fn text_only_page() -> PagePrimitives {
        let mut page = PagePrimitives::new(600.0, 800.0);
        page.chars = vec![
            glyph("H", 10.0, 100.0),
            glyph("i", 17.0, 100.0),
            glyph("L", 10.0, 200.0),
            glyph("o", 17.0, 200.0),
        ];
        page
    }

    #[test]
    fn test_empty_page_is_valid() {
        let page = process_page(0, &PagePrimitives::new(600.0, 800.0), &Config::default());
        assert!(page.is_empty());
        assert_eq!(page.index, 0);
    }

    #[test]
    fn test_zero_rulings_means_zero_tables() {
        let page = process_page(0, &text_only_page(), &Config::default());
        assert_eq!(page.tables().count(), 0);
        assert_eq!(page.paragraphs().count(), 2);
    }

    #[test]
    fn test_table_flag_disables_detection() {
        let mut prims = text_only_page();
        prims.rulings = vec![
            RulingPrimitive::Rect {
                bbox: BBox::new(0.0, 90.0, 100.0, 130.0),
            },
            RulingPrimitive::Line {
                p1: Point::new(50.0, 90.0),
                p2: Point::new(50.0, 130.0),
            },
        ];
        let with_tables = process_page(0, &prims, &Config::default());
        assert_eq!(with_tables.tables().count(), 1);

        let config = Config::default().without_tables();
        let without = process_page(0, &prims, &config);
        assert_eq!(without.tables().count(), 0);
        // With no table to claim them, both lines become paragraphs.
        assert_eq!(without.paragraphs().count(), 2);
    }

    #[test]
    fn test_glyphs_outside_table_keep_their_paragraph() {
        // "Hell" sits left of a table while the trailing "o" lands inside
        // it. Only the claimed glyph goes to the cell; the rest of the line
        // must still come out as a paragraph.
        let mut prims = PagePrimitives::new(600.0, 800.0);
        prims.rulings = vec![
            RulingPrimitive::Rect {
                bbox: BBox::new(100.0, 90.0, 200.0, 130.0),
            },
            RulingPrimitive::Line {
                p1: Point::new(150.0, 90.0),
                p2: Point::new(150.0, 130.0),
            },
        ];
        prims.chars = vec![
            glyph("H", 10.0, 100.0),
            glyph("e", 18.0, 100.0),
            glyph("l", 26.0, 100.0),
            glyph("l", 34.0, 100.0),
            glyph("o", 110.0, 100.0),
        ];

        let page = process_page(0, &prims, &Config::default());
        let tables: Vec<_> = page.tables().collect();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].cell_at(0, 0).map(|c| c.text.as_str()), Some("o"));

        let paragraphs: Vec<String> = page.paragraphs().map(|p| p.plain_text()).collect();
        assert_eq!(paragraphs, vec!["Hell".to_string()]);
    }

    #[test]
    fn test_assemble_orders_and_tags_pages() {
        let pages: Vec<PagePrimitives> = (0..8).map(|_| text_only_page()).collect();
        let doc = assemble("report.pdf", &pages, &Config::default()).unwrap();
        assert_eq!(doc.page_count(), 8);
        for (i, page) in doc.pages.iter().enumerate() {
            assert_eq!(page.index, i);
            assert_eq!(page.tag, format!("{}_p{}", doc.unique_prefix, i));
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pages: Vec<PagePrimitives> = (0..4).map(|_| text_only_page()).collect();
        let config = Config::default();
        let par = assemble("a.pdf", &pages, &config).unwrap();
        let seq = assemble_sequential("a.pdf", &pages, &config).unwrap();
        assert_eq!(par.plain_text(), seq.plain_text());
        assert_eq!(par.unique_prefix, seq.unique_prefix);
    }

    #[test]
    fn test_invalid_page_dimensions_rejected() {
        let pages = vec![PagePrimitives::new(600.0, f32::NAN)];
        let err = assemble("bad.pdf", &pages, &Config::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidPrimitives(_)));

        let pages = vec![PagePrimitives::new(0.0, 800.0)];
        assert!(assemble_sequential("bad.pdf", &pages, &Config::default()).is_err());
    }

    #[test]
    fn test_configured_prefix_overrides_derivation() {
        let config = Config::default().with_unique_prefix("job42");
        let doc = assemble("report.pdf", &[], &config).unwrap();
        assert_eq!(doc.unique_prefix, "job42");
    }
}
