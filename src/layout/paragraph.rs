//! Paragraph assembly from clustered text lines.
//!
//! Lines falling inside a header, footer, or page-number exclusion band are
//! dropped before merging. Consecutive lines merge into one paragraph when
//! their font sizes sit in the same band and their vertical gap stays within
//! a size-scaled threshold. The merge is idempotent: feeding paragraphs back
//! through as single lines neither splits nor joins them further.

use crate::config::Config;
use crate::geometry::{cmp_f32, BBox};
use crate::model::Paragraph;

use super::cluster::TextLine;

/// Page-fraction regions excluded from paragraph assembly.
#[derive(Debug, Clone, Copy)]
struct ExclusionBands {
    header_y1: Option<f32>,
    footer_y0: Option<f32>,
    page_num: Option<BBox>,
}

impl ExclusionBands {
    fn resolve(page_width: f32, page_height: f32, config: &Config) -> Self {
        let (header_y1, footer_y0) = if config.header_footer_flag {
            let offset = page_height * config.head_tail_page_offset_percent;
            (Some(offset), Some(page_height - offset))
        } else {
            (None, None)
        };

        // The page-number corner: bottom fraction of the page, horizontally
        // centered between the configured fractions.
        let page_num = if config.page_num_top_fraction < 1.0 {
            Some(BBox::new(
                page_width * config.page_num_left_fraction,
                page_height * config.page_num_top_fraction,
                page_width * config.page_num_right_fraction,
                page_height,
            ))
        } else {
            None
        };

        Self {
            header_y1,
            footer_y0,
            page_num,
        }
    }

    fn excludes(&self, bbox: &BBox) -> bool {
        let center = bbox.center();
        if let Some(y) = self.header_y1 {
            if center.y < y {
                return true;
            }
        }
        if let Some(y) = self.footer_y0 {
            if center.y > y {
                return true;
            }
        }
        if let Some(zone) = &self.page_num {
            if zone.contains_point(&center) {
                return true;
            }
        }
        false
    }
}

/// Assemble paragraphs from the lines not claimed by any table.
pub fn assemble_paragraphs(
    lines: &[TextLine],
    page_width: f32,
    page_height: f32,
    config: &Config,
) -> Vec<Paragraph> {
    let bands = ExclusionBands::resolve(page_width, page_height, config);
    let mut retained: Vec<&TextLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if bands.excludes(&line.bbox) {
            log::debug!("line at {:?} falls in an exclusion band", line.bbox);
            continue;
        }
        retained.push(line);
    }
    retained.sort_by(|a, b| cmp_f32(a.bbox.y0, b.bbox.y0).then_with(|| cmp_f32(a.bbox.x0, b.bbox.x0)));

    if !config.paragraph_flag {
        return retained
            .into_iter()
            .map(|line| {
                Paragraph::from_text_lines(vec![line.text()], line.font_size, line.bbox)
            })
            .collect();
    }

    let mut paragraphs: Vec<Paragraph> = Vec::new();
    let mut open: Option<(Paragraph, f32)> = None; // paragraph, last line bottom

    for line in retained {
        let size = if line.font_size > 0.0 {
            line.font_size
        } else {
            config.default_char_size
        };
        match open.take() {
            Some((mut para, last_y1)) if joins(&para, last_y1, line, size) => {
                para.text_lines.push(line.text());
                para.bbox = para.bbox.union(&line.bbox);
                open = Some((para, line.bbox.y1));
            }
            prev => {
                if let Some((para, _)) = prev {
                    paragraphs.push(para);
                }
                let para = Paragraph::from_text_lines(vec![line.text()], size, line.bbox);
                open = Some((para, line.bbox.y1));
            }
        }
    }
    if let Some((para, _)) = open {
        paragraphs.push(para);
    }
    paragraphs
}

/// Whether a line continues the open paragraph: font sizes within half the
/// smaller size of each other, and the vertical gap to the previous line no
/// more than the paragraph's font size.
fn joins(para: &Paragraph, last_y1: f32, line: &TextLine, line_size: f32) -> bool {
    let size_band = para.font_size.min(line_size) * 0.5;
    if (para.font_size - line_size).abs() > size_band {
        return false;
    }
    let gap = line.bbox.y0 - last_y1;
    gap <= para.font_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::cluster::Word;

    fn line(text: &str, y0: f32, y1: f32, size: f32) -> TextLine {
        let bbox = BBox::new(10.0, y0, 200.0, y1);
        TextLine {
            words: vec![Word {
                text: text.to_string(),
                bbox,
            }],
            bbox,
            font_size: size,
        }
    }

    #[test]
    fn test_close_lines_merge() {
        let lines = vec![
            line("first", 100.0, 110.0, 10.0),
            line("second", 114.0, 124.0, 10.0),
        ];
        let paras = assemble_paragraphs(&lines, 600.0, 800.0, &Config::default());
        assert_eq!(paras.len(), 1);
        assert_eq!(paras[0].plain_text(), "first\nsecond");
    }

    #[test]
    fn test_distant_lines_stay_separate() {
        let lines = vec![
            line("Hi", 100.0, 110.0, 10.0),
            line("Lo", 200.0, 210.0, 10.0),
        ];
        let paras = assemble_paragraphs(&lines, 600.0, 800.0, &Config::default());
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0].plain_text(), "Hi");
        assert_eq!(paras[1].plain_text(), "Lo");
    }

    #[test]
    fn test_font_size_break() {
        // A heading twice the body size never merges with its body.
        let lines = vec![
            line("Heading", 100.0, 120.0, 20.0),
            line("body text", 124.0, 134.0, 10.0),
        ];
        let paras = assemble_paragraphs(&lines, 600.0, 800.0, &Config::default());
        assert_eq!(paras.len(), 2);
    }

    #[test]
    fn test_paragraph_flag_short_circuits() {
        let mut config = Config::default();
        config.paragraph_flag = false;
        let lines = vec![
            line("first", 100.0, 110.0, 10.0),
            line("second", 114.0, 124.0, 10.0),
        ];
        let paras = assemble_paragraphs(&lines, 600.0, 800.0, &config);
        assert_eq!(paras.len(), 2);
        assert!(paras.iter().all(|p| p.line_count() == 1));
    }

    #[test]
    fn test_header_footer_exclusion() {
        let mut config = Config::default();
        config.header_footer_flag = true;
        // Default offset is 5% of the page: 40pt bands on an 800pt page.
        let lines = vec![
            line("running header", 10.0, 20.0, 10.0),
            line("body", 400.0, 410.0, 10.0),
            line("running footer", 780.0, 790.0, 10.0),
        ];
        let paras = assemble_paragraphs(&lines, 600.0, 800.0, &config);
        assert_eq!(paras.len(), 1);
        assert_eq!(paras[0].plain_text(), "body");
    }

    #[test]
    fn test_page_number_zone_exclusion() {
        // Default zone: y > 92% of the page, x between 40% and 60%. The
        // header/footer bands are disabled so only the zone applies.
        let mut config = Config::default();
        config.header_footer_flag = false;
        let bbox = BBox::new(290.0, 770.0, 310.0, 780.0);
        let centered = TextLine {
            words: vec![Word {
                text: "7".to_string(),
                bbox,
            }],
            bbox,
            font_size: 10.0,
        };
        let off_bbox = BBox::new(20.0, 770.0, 40.0, 780.0);
        let off_center = TextLine {
            words: vec![Word {
                text: "left margin note".to_string(),
                bbox: off_bbox,
            }],
            bbox: off_bbox,
            font_size: 10.0,
        };
        let paras = assemble_paragraphs(&[centered, off_center], 600.0, 800.0, &config);
        assert_eq!(paras.len(), 1);
        assert_eq!(paras[0].plain_text(), "left margin note");
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let lines = vec![
            line("first", 100.0, 110.0, 10.0),
            line("second", 114.0, 124.0, 10.0),
            line("far away", 300.0, 310.0, 10.0),
        ];
        let config = Config::default();
        let paras = assemble_paragraphs(&lines, 600.0, 800.0, &config);
        assert_eq!(paras.len(), 2);

        // Re-run treating each paragraph as one line.
        let as_lines: Vec<TextLine> = paras
            .iter()
            .map(|p| {
                let bbox = p.bbox;
                TextLine {
                    words: vec![Word {
                        text: p.plain_text(),
                        bbox,
                    }],
                    bbox,
                    font_size: p.font_size,
                }
            })
            .collect();
        let again = assemble_paragraphs(&as_lines, 600.0, 800.0, &config);
        assert_eq!(again.len(), paras.len());
        for (a, b) in again.iter().zip(&paras) {
            assert_eq!(a.bbox, b.bbox);
        }
    }
}
