//! Character clustering: glyphs into words and lines.
//!
//! Two glyphs share a line iff their vertical bands overlap within the y
//! tolerance; within a line, a horizontal gap exceeding the x tolerance
//! breaks word continuity, while bounding-box overlap up to the permitted
//! overlap size (kerning and rendering noise) does not split anything.
//! Deterministic: identical input always yields the identical partition.

use crate::geometry::{cmp_f32, BBox};
use crate::input::CharPrimitive;

use super::tolerance::Tolerances;

/// A word: a maximal run of glyphs with no tolerance-exceeding gap.
#[derive(Debug, Clone)]
pub struct Word {
    /// Joined glyph text
    pub text: String,
    /// Bounding box of the word
    pub bbox: BBox,
}

/// A line of words sharing a vertical band. An intermediate structure:
/// consumed by the paragraph assembler and the table cell filler, never
/// exposed in the output model.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Words ordered left to right
    pub words: Vec<Word>,
    /// Bounding box of the line
    pub bbox: BBox,
    /// Dominant glyph size of the line
    pub font_size: f32,
}

impl TextLine {
    /// Joined text of the line, words separated by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Cluster glyphs into lines ordered top-to-bottom, left-to-right.
///
/// Glyphs with degenerate (zero-area) bounding boxes are recovered by
/// omission: logged and skipped, never a failure.
pub fn cluster_lines(
    chars: &[CharPrimitive],
    tol: &Tolerances,
    char_overlap_size: f32,
) -> Vec<TextLine> {
    let mut usable: Vec<(usize, &CharPrimitive)> = Vec::with_capacity(chars.len());
    for (i, c) in chars.iter().enumerate() {
        if c.bbox.is_degenerate() {
            log::warn!("dropping glyph {:?} with degenerate bbox", c.text);
            continue;
        }
        usable.push((i, c));
    }
    if usable.is_empty() {
        return vec![];
    }

    // Stable sort by top edge, then left edge, then input index.
    usable.sort_by(|(ia, a), (ib, b)| {
        cmp_f32(a.bbox.y0, b.bbox.y0)
            .then_with(|| cmp_f32(a.bbox.x0, b.bbox.x0))
            .then_with(|| ia.cmp(ib))
    });

    // Band clustering on the vertical axis.
    let mut bands: Vec<Vec<(usize, &CharPrimitive)>> = Vec::new();
    let mut band_boxes: Vec<BBox> = Vec::new();
    for (i, c) in usable {
        match band_boxes
            .iter()
            .position(|band| band.vertical_overlap(&c.bbox, tol.y))
        {
            Some(idx) => {
                band_boxes[idx] = band_boxes[idx].union(&c.bbox);
                bands[idx].push((i, c));
            }
            None => {
                band_boxes.push(c.bbox);
                bands.push(vec![(i, c)]);
            }
        }
    }

    let mut lines: Vec<TextLine> = bands
        .into_iter()
        .map(|band| build_line(band, tol, char_overlap_size))
        .collect();
    lines.sort_by(|a, b| cmp_f32(a.bbox.y0, b.bbox.y0).then_with(|| cmp_f32(a.bbox.x0, b.bbox.x0)));
    lines
}

fn build_line(
    mut band: Vec<(usize, &CharPrimitive)>,
    tol: &Tolerances,
    char_overlap_size: f32,
) -> TextLine {
    band.sort_by(|(ia, a), (ib, b)| cmp_f32(a.bbox.x0, b.bbox.x0).then_with(|| ia.cmp(ib)));

    let mut words: Vec<Word> = Vec::new();
    let mut text = String::new();
    let mut word_box: Option<BBox> = None;
    let mut prev_x1 = f32::NEG_INFINITY;

    for (_, c) in &band {
        let gap = c.bbox.x0 - prev_x1;
        // A gap wider than the x tolerance breaks the word; overlap within
        // char_overlap_size is kerning noise and keeps continuity, deeper
        // overlap means the glyphs are not adjacent in the same word.
        let breaks_word =
            word_box.is_some() && (gap > tol.x || gap < -char_overlap_size);
        if breaks_word {
            if let Some(bbox) = word_box.take() {
                words.push(Word {
                    text: std::mem::take(&mut text),
                    bbox,
                });
            }
        }
        text.push_str(&c.text);
        word_box = Some(match word_box {
            Some(bbox) => bbox.union(&c.bbox),
            None => c.bbox,
        });
        prev_x1 = prev_x1.max(c.bbox.x1);
    }
    if let Some(bbox) = word_box {
        words.push(Word { text, bbox });
    }

    let bbox = words
        .iter()
        .map(|w| w.bbox)
        .reduce(|a, b| a.union(&b))
        .unwrap_or(BBox::new(0.0, 0.0, 0.0, 0.0));

    let mut sizes: Vec<f32> = band.iter().map(|(_, c)| c.size).collect();
    sizes.sort_by(|a, b| cmp_f32(*a, *b));
    let font_size = sizes.get(sizes.len() / 2).copied().unwrap_or(0.0);

    TextLine {
        words,
        bbox,
        font_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn glyph(text: &str, x0: f32, y0: f32, w: f32, h: f32) -> CharPrimitive {
        CharPrimitive::new(text, BBox::new(x0, y0, x0 + w, y0 + h), h)
    }

    fn tol(x: f32, y: f32) -> Tolerances {
        Tolerances {
            main_frame: 3.0,
            x,
            y,
        }
    }

    #[test]
    fn test_two_bands_two_lines() {
        // "Hi" at y=100..110 and "Lo" at y=200..210
        let chars = vec![
            glyph("H", 10.0, 100.0, 8.0, 10.0),
            glyph("i", 19.0, 100.0, 4.0, 10.0),
            glyph("L", 10.0, 200.0, 8.0, 10.0),
            glyph("o", 19.0, 200.0, 8.0, 10.0),
        ];
        let lines = cluster_lines(&chars, &tol(3.0, 5.0), 3.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Hi");
        assert_eq!(lines[1].text(), "Lo");
    }

    #[test]
    fn test_word_split_on_wide_gap() {
        let chars = vec![
            glyph("a", 0.0, 0.0, 8.0, 10.0),
            glyph("b", 9.0, 0.0, 8.0, 10.0),
            glyph("c", 40.0, 0.0, 8.0, 10.0),
        ];
        let lines = cluster_lines(&chars, &tol(3.0, 5.0), 3.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].words.len(), 2);
        assert_eq!(lines[0].text(), "ab c");
    }

    #[test]
    fn test_kerning_overlap_kept_in_word() {
        let chars = vec![
            glyph("A", 0.0, 0.0, 10.0, 12.0),
            glyph("V", 8.0, 0.0, 10.0, 12.0), // 2pt bbox overlap
        ];
        let lines = cluster_lines(&chars, &tol(3.0, 6.0), 3.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "AV");
    }

    #[test]
    fn test_degenerate_bbox_dropped() {
        let chars = vec![
            glyph("x", 0.0, 0.0, 8.0, 10.0),
            CharPrimitive::new("!", BBox::new(5.0, 5.0, 5.0, 15.0), 10.0),
        ];
        let lines = cluster_lines(&chars, &tol(3.0, 5.0), 3.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "x");
    }

    #[test]
    fn test_deterministic_partition() {
        let chars: Vec<CharPrimitive> = (0..40)
            .map(|i| glyph("g", (i % 8) as f32 * 9.0, (i / 8) as f32 * 14.0, 8.0, 10.0))
            .collect();
        let t = Tolerances::resolve(&chars, &Config::default());
        let a = cluster_lines(&chars, &t, 3.0);
        let b = cluster_lines(&chars, &t, 3.0);
        assert_eq!(a.len(), b.len());
        for (la, lb) in a.iter().zip(&b) {
            assert_eq!(la.text(), lb.text());
            assert_eq!(la.bbox, lb.bbox);
        }
    }

    #[test]
    fn test_lines_ordered_top_to_bottom() {
        let chars = vec![
            glyph("b", 0.0, 50.0, 8.0, 10.0),
            glyph("a", 0.0, 10.0, 8.0, 10.0),
            glyph("c", 0.0, 90.0, 8.0, 10.0),
        ];
        let lines = cluster_lines(&chars, &tol(3.0, 4.0), 3.0);
        let texts: Vec<String> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
