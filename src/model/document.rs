//! Document-level types.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::Page;

/// A reconstructed document: pages in input order plus a unique identifier
/// derived from the source name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Name of the source the primitives were extracted from
    pub source_name: String,

    /// Unique prefix used for temporary-resource namespacing by external
    /// collaborators
    pub unique_prefix: String,

    /// Pages in page-index order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create an empty document for the given source name, deriving the
    /// unique prefix from it.
    pub fn new(source_name: impl Into<String>) -> Self {
        let source_name = source_name.into();
        let unique_prefix = derive_unique_prefix(&source_name);
        Self {
            source_name,
            unique_prefix,
            pages: Vec::new(),
        }
    }

    /// Create an empty document with an explicit unique prefix.
    pub fn with_prefix(source_name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            unique_prefix: prefix.into(),
            pages: Vec::new(),
        }
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by its 0-based index.
    pub fn get_page(&self, index: usize) -> Option<&Page> {
        self.pages.iter().find(|p| p.index == index)
    }

    /// Add a page. Pages must be appended in index order; the concurrent
    /// assemblers take care of that.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Whether the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Plain text of the whole document, pages separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Derive a deterministic unique prefix from a source name.
///
/// The prefix combines a sanitized stem of the name with a short hash of the
/// full name, so two sources with the same stem in different directories do
/// not collide.
pub fn derive_unique_prefix(source_name: &str) -> String {
    let stem: String = source_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source_name)
        .trim_end_matches(".pdf")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .take(24)
        .collect();

    let mut hasher = DefaultHasher::new();
    source_name.hash(&mut hasher);
    let digest = hasher.finish();

    format!("{}_{:08x}", stem, (digest & 0xffff_ffff) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new("reports/annual.pdf");
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert!(doc.unique_prefix.starts_with("annual_"));
    }

    #[test]
    fn test_prefix_deterministic() {
        let a = derive_unique_prefix("reports/annual.pdf");
        let b = derive_unique_prefix("reports/annual.pdf");
        assert_eq!(a, b);
    }

    #[test]
    fn test_prefix_distinguishes_paths() {
        let a = derive_unique_prefix("2023/annual.pdf");
        let b = derive_unique_prefix("2024/annual.pdf");
        assert_ne!(a, b);
    }

    #[test]
    fn test_prefix_sanitized() {
        let prefix = derive_unique_prefix("My Report (final).pdf");
        let stem = prefix.rsplit_once('_').map(|(s, _)| s).unwrap();
        assert!(stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_explicit_prefix() {
        let doc = Document::with_prefix("a.pdf", "custom");
        assert_eq!(doc.unique_prefix, "custom");
    }
}
