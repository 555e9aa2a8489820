//! Adaptive tolerance resolution.
//!
//! Tolerances are derived once per page from the page's own glyph
//! statistics, then passed explicitly to every downstream pass — never held
//! as shared mutable state. Explicit configuration overrides win verbatim.

use crate::config::Config;
use crate::geometry::cmp_f32;
use crate::input::CharPrimitive;

/// Effective spatial tolerances for one page-processing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Ruling alignment / snapping tolerance
    pub main_frame: f32,
    /// Word-gap tolerance
    pub x: f32,
    /// Line-band tolerance
    pub y: f32,
}

impl Tolerances {
    /// Resolve tolerances for a page.
    ///
    /// Without overrides, the dominant glyph size (median, clamped to
    /// `[char_size_lower, char_size_upper]`) and the median horizontal gap
    /// between adjacent glyphs drive the result. An empty page degrades to
    /// the global `default_char_size`.
    pub fn resolve(chars: &[CharPrimitive], config: &Config) -> Self {
        let char_size = median_char_size(chars)
            .unwrap_or(config.default_char_size)
            .clamp(config.char_size_lower, config.char_size_upper);
        let median_gap = median_adjacent_gap(chars, char_size).unwrap_or(0.0);

        let main_frame = config.main_frame_tolerance.unwrap_or(char_size / 4.0);
        let x = config
            .x_tolerance
            .unwrap_or_else(|| (char_size / 4.0).max(median_gap * 2.0));
        let y = config.y_tolerance.unwrap_or(char_size / 2.0);

        Self { main_frame, x, y }
    }
}

/// Median of glyph sizes, falling back to bounding-box heights when sizes
/// are zeroed out by the extractor.
fn median_char_size(chars: &[CharPrimitive]) -> Option<f32> {
    let mut sizes: Vec<f32> = chars
        .iter()
        .map(|c| if c.size > 0.0 { c.size } else { c.bbox.height() })
        .filter(|s| *s > 0.0)
        .collect();
    median(&mut sizes)
}

/// Median positive horizontal gap between adjacent glyphs that share a
/// vertical band.
fn median_adjacent_gap(chars: &[CharPrimitive], band: f32) -> Option<f32> {
    let mut sorted: Vec<&CharPrimitive> = chars.iter().collect();
    sorted.sort_by(|a, b| {
        cmp_f32(a.bbox.y0, b.bbox.y0).then_with(|| cmp_f32(a.bbox.x0, b.bbox.x0))
    });

    let mut gaps = Vec::new();
    for pair in sorted.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.bbox.vertical_overlap(&b.bbox, band / 2.0) {
            let gap = b.bbox.x0 - a.bbox.x1;
            if gap > 0.0 && gap < band * 2.0 {
                gaps.push(gap);
            }
        }
    }
    median(&mut gaps)
}

fn median(values: &mut Vec<f32>) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| cmp_f32(*a, *b));
    Some(values[values.len() / 2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BBox;

    fn glyph(x0: f32, y0: f32, w: f32, size: f32) -> CharPrimitive {
        CharPrimitive::new("a", BBox::new(x0, y0, x0 + w, y0 + size), size)
    }

    #[test]
    fn test_overrides_win() {
        let config = Config {
            main_frame_tolerance: Some(1.5),
            x_tolerance: Some(2.5),
            y_tolerance: Some(5.0),
            ..Config::default()
        };
        let tol = Tolerances::resolve(&[], &config);
        assert_eq!(tol.main_frame, 1.5);
        assert_eq!(tol.x, 2.5);
        assert_eq!(tol.y, 5.0);
    }

    #[test]
    fn test_empty_page_uses_defaults() {
        let config = Config::default();
        let tol = Tolerances::resolve(&[], &config);
        assert_eq!(tol.main_frame, config.default_char_size / 4.0);
        assert_eq!(tol.y, config.default_char_size / 2.0);
    }

    #[test]
    fn test_derived_from_glyph_statistics() {
        let chars: Vec<CharPrimitive> =
            (0..10).map(|i| glyph(i as f32 * 10.0, 100.0, 8.0, 10.0)).collect();
        let tol = Tolerances::resolve(&chars, &Config::default());
        // median size 10 -> main_frame 2.5, y 5.0; gaps of 2pt -> x = 4.0
        assert_eq!(tol.main_frame, 2.5);
        assert_eq!(tol.y, 5.0);
        assert_eq!(tol.x, 4.0);
    }

    #[test]
    fn test_clamped_to_char_size_bounds() {
        let chars = vec![glyph(0.0, 0.0, 60.0, 80.0)];
        let config = Config::default();
        let tol = Tolerances::resolve(&chars, &config);
        assert_eq!(tol.main_frame, config.char_size_upper / 4.0);
    }
}
