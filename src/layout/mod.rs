//! Layout reconstruction engine.
//!
//! Turns one page's unordered geometric primitives into ordered structure:
//! characters cluster into words and lines, rulings normalize into edges and
//! snap into a cell grid, lines merge into paragraphs, and the survivors
//! compose into a single reading-order flow. Every pass is a pure
//! transformation over immutable collections so that pages can be processed
//! concurrently without shared state.

pub mod cluster;
pub mod compose;
pub mod images;
pub mod paragraph;
pub mod rulings;
pub mod table_builder;
pub mod tolerance;

pub use cluster::{TextLine, Word};
pub use rulings::{Edge, EdgeStyle};
pub use tolerance::Tolerances;
