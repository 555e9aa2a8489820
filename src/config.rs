//! Reconstruction options and configuration.
//!
//! The configuration surface is a flat mapping of named options. Every
//! option has a typed field with a documented default; [`Config::from_map`]
//! accepts the external flat form, warns about unrecognized names and
//! rejects values of the wrong type at the boundary, so the layout pipeline
//! itself never sees malformed configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Options controlling the layout reconstruction engine.
///
/// The three `*_tolerance` options default to `None`, which means "derive
/// from the page's own glyph statistics" (see
/// [`Tolerances`](crate::layout::Tolerances)). Everything else is a plain
/// value applied as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // document
    /// Exclude running header/footer bands from paragraph assembly
    pub header_footer_flag: bool,
    /// Exclude logo-like images overlapping the header band
    pub logo_flag: bool,
    /// Prefix for temporary resources created by external collaborators
    pub temp_dir_prefix: String,
    /// Per-document unique prefix; derived from the source name when unset
    pub unique_prefix: Option<String>,

    // page
    /// Reconstruct tables from rulings
    pub table_flag: bool,
    /// Merge text lines into paragraphs (false: singleton paragraphs)
    pub paragraph_flag: bool,
    /// Keep embedded images
    pub image_flag: bool,
    /// Raster resolution hint (dpi) passed through to external collaborators
    pub resolution: u32,
    /// Ruling alignment tolerance; derived from glyph statistics when `None`
    pub main_frame_tolerance: Option<f32>,
    /// Word-gap tolerance; derived from glyph statistics when `None`
    pub x_tolerance: Option<f32>,
    /// Line-band tolerance; derived from glyph statistics when `None`
    pub y_tolerance: Option<f32>,
    /// Page-number zone starts at this fraction of the page height
    pub page_num_top_fraction: f32,
    /// Left boundary of the page-number zone, as a fraction of page width
    pub page_num_left_fraction: f32,
    /// Right boundary of the page-number zone, as a fraction of page width
    pub page_num_right_fraction: f32,
    /// Normalize dotted rulings into continuous edges
    pub dotted_line_flag: bool,
    /// Linearize near-straight curves by chord approximation
    pub curved_line_flag: bool,

    // chars
    /// Permitted glyph bounding-box overlap (kerning noise) in points
    pub char_overlap_size: f32,
    /// Fallback glyph size when page statistics are unavailable
    pub default_char_size: f32,
    /// Upper clamp for derived tolerances
    pub char_size_upper: f32,
    /// Lower clamp for derived tolerances
    pub char_size_lower: f32,

    // table
    /// Force near-collinear edges onto a shared coordinate
    pub snap_flag: bool,
    /// Synthesize missing outer border edges implied by the grid extent
    pub add_line_flag: bool,
    /// Gaps at or below this never count as a double ruling
    pub min_double_line_tolerance: f32,
    /// Gaps at or above this never count as a double ruling
    pub max_double_line_tolerance: f32,
    /// Extra bound on vertical double-ruling separations
    pub vertical_double_line_tolerance: f32,
    /// Adjacent cells separated by less than this merge into one
    pub table_cell_merge_tolerance: f32,
    /// Discard tables with no populated cell
    pub skip_empty_table: bool,

    // image
    /// Minimum image area in pixels; smaller images are dropped
    pub min_image_size: f32,

    // head & tail
    /// Header/footer band height as a fraction of page height
    pub head_tail_page_offset_percent: f32,

    // log
    /// Emit info-level progress logs
    pub verbose_flag: bool,
    /// Emit debug-level logs
    pub debug_flag: bool,

    // markup class names handed to the external renderer
    /// Class name for text spans
    pub span_class: String,
    /// Class name for paragraphs
    pub paragraph_class: String,
    /// Class name for tables
    pub table_class: String,
    /// Class name for the document wrapper
    pub document_class: String,
    /// Class name for images
    pub image_class: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header_footer_flag: true,
            logo_flag: true,
            temp_dir_prefix: "pageflow".to_string(),
            unique_prefix: None,

            table_flag: true,
            paragraph_flag: true,
            image_flag: true,
            resolution: 144,
            main_frame_tolerance: None,
            x_tolerance: None,
            y_tolerance: None,
            page_num_top_fraction: 0.92,
            page_num_left_fraction: 0.40,
            page_num_right_fraction: 0.60,
            dotted_line_flag: true,
            curved_line_flag: false,

            char_overlap_size: 3.0,
            default_char_size: 12.0,
            char_size_upper: 30.0,
            char_size_lower: 3.0,

            snap_flag: true,
            add_line_flag: false,
            min_double_line_tolerance: 0.5,
            max_double_line_tolerance: 4.0,
            vertical_double_line_tolerance: 6.0,
            table_cell_merge_tolerance: 2.0,
            skip_empty_table: false,

            min_image_size: 80.0,

            head_tail_page_offset_percent: 0.05,

            verbose_flag: false,
            debug_flag: false,

            span_class: "pageflow-span".to_string(),
            paragraph_class: "pageflow-paragraph".to_string(),
            table_class: "pageflow-table".to_string(),
            document_class: "pageflow-document".to_string(),
            image_class: "pageflow-image".to_string(),
        }
    }
}

impl Config {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from a flat option mapping.
    ///
    /// Unrecognized option names are logged and ignored; a recognized name
    /// carrying a value of the wrong type is a hard error.
    pub fn from_map(map: &serde_json::Map<String, Value>) -> Result<Self> {
        let mut config = Self::default();
        config.apply_map(map)?;
        Ok(config)
    }

    /// Build a configuration from an arbitrary JSON value, which must be an
    /// object to be of the recognized shape.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(Error::Configuration(format!(
                "expected an option object, got {}",
                json_type_name(other)
            ))),
        }
    }

    /// Apply a flat option mapping over the current values.
    pub fn apply_map(&mut self, map: &serde_json::Map<String, Value>) -> Result<()> {
        for (key, value) in map {
            self.apply_option(key, value)?;
        }
        Ok(())
    }

    fn apply_option(&mut self, key: &str, value: &Value) -> Result<()> {
        match key {
            "header_footer_flag" => self.header_footer_flag = as_bool(key, value)?,
            "logo_flag" => self.logo_flag = as_bool(key, value)?,
            "temp_dir_prefix" => self.temp_dir_prefix = as_string(key, value)?,
            "unique_prefix" => self.unique_prefix = as_opt_string(key, value)?,

            "table_flag" => self.table_flag = as_bool(key, value)?,
            "paragraph_flag" => self.paragraph_flag = as_bool(key, value)?,
            "image_flag" => self.image_flag = as_bool(key, value)?,
            "resolution" => self.resolution = as_u32(key, value)?,
            "main_frame_tolerance" => self.main_frame_tolerance = as_opt_f32(key, value)?,
            "x_tolerance" => self.x_tolerance = as_opt_f32(key, value)?,
            "y_tolerance" => self.y_tolerance = as_opt_f32(key, value)?,
            "page_num_top_fraction" => self.page_num_top_fraction = as_f32(key, value)?,
            "page_num_left_fraction" => self.page_num_left_fraction = as_f32(key, value)?,
            "page_num_right_fraction" => self.page_num_right_fraction = as_f32(key, value)?,
            "dotted_line_flag" => self.dotted_line_flag = as_bool(key, value)?,
            "curved_line_flag" => self.curved_line_flag = as_bool(key, value)?,

            "char_overlap_size" => self.char_overlap_size = as_f32(key, value)?,
            "default_char_size" => self.default_char_size = as_f32(key, value)?,
            "char_size_upper" => self.char_size_upper = as_f32(key, value)?,
            "char_size_lower" => self.char_size_lower = as_f32(key, value)?,

            "snap_flag" => self.snap_flag = as_bool(key, value)?,
            "add_line_flag" => self.add_line_flag = as_bool(key, value)?,
            "min_double_line_tolerance" => self.min_double_line_tolerance = as_f32(key, value)?,
            "max_double_line_tolerance" => self.max_double_line_tolerance = as_f32(key, value)?,
            "vertical_double_line_tolerance" => {
                self.vertical_double_line_tolerance = as_f32(key, value)?
            }
            "table_cell_merge_tolerance" => self.table_cell_merge_tolerance = as_f32(key, value)?,
            "skip_empty_table" => self.skip_empty_table = as_bool(key, value)?,

            "min_image_size" => self.min_image_size = as_f32(key, value)?,

            "head_tail_page_offset_percent" => {
                self.head_tail_page_offset_percent = as_f32(key, value)?
            }

            "verbose_flag" => self.verbose_flag = as_bool(key, value)?,
            "debug_flag" => self.debug_flag = as_bool(key, value)?,

            "span_class" => self.span_class = as_string(key, value)?,
            "paragraph_class" => self.paragraph_class = as_string(key, value)?,
            "table_class" => self.table_class = as_string(key, value)?,
            "document_class" => self.document_class = as_string(key, value)?,
            "image_class" => self.image_class = as_string(key, value)?,

            _ => {
                log::warn!("config option not recognized, ignoring: {}", key);
            }
        }
        Ok(())
    }

    /// Log level implied by the verbose/debug flags. Installing a logger is
    /// the caller's business; the library only emits through the `log` facade.
    pub fn level_filter(&self) -> log::LevelFilter {
        if self.debug_flag {
            log::LevelFilter::Debug
        } else if self.verbose_flag {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        }
    }

    /// Disable table reconstruction.
    pub fn without_tables(mut self) -> Self {
        self.table_flag = false;
        self
    }

    /// Disable paragraph merging; lines pass through as singleton paragraphs.
    pub fn without_paragraph_merging(mut self) -> Self {
        self.paragraph_flag = false;
        self
    }

    /// Disable image extraction.
    pub fn without_images(mut self) -> Self {
        self.image_flag = false;
        self
    }

    /// Set explicit x/y tolerances, bypassing adaptive derivation.
    pub fn with_tolerances(mut self, x: f32, y: f32) -> Self {
        self.x_tolerance = Some(x);
        self.y_tolerance = Some(y);
        self
    }

    /// Set an explicit unique prefix instead of deriving one.
    pub fn with_unique_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.unique_prefix = Some(prefix.into());
        self
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(key: &str, expected: &'static str, value: &Value) -> Error {
    Error::ConfigurationType {
        key: key.to_string(),
        expected,
        actual: json_type_name(value),
    }
}

fn as_bool(key: &str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| type_error(key, "boolean", value))
}

fn as_f32(key: &str, value: &Value) -> Result<f32> {
    value
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| type_error(key, "number", value))
}

fn as_u32(key: &str, value: &Value) -> Result<u32> {
    value
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| type_error(key, "unsigned integer", value))
}

fn as_opt_f32(key: &str, value: &Value) -> Result<Option<f32>> {
    if value.is_null() {
        Ok(None)
    } else {
        as_f32(key, value).map(Some)
    }
}

fn as_string(key: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| type_error(key, "string", value))
}

fn as_opt_string(key: &str, value: &Value) -> Result<Option<String>> {
    if value.is_null() {
        Ok(None)
    } else {
        as_string(key, value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.table_flag);
        assert!(config.paragraph_flag);
        assert!(config.x_tolerance.is_none());
        assert!(!config.skip_empty_table);
        assert_eq!(config.level_filter(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_from_map_known_keys() {
        let value = json!({
            "x_tolerance": 3.5,
            "skip_empty_table": true,
            "span_class": "txt",
            "resolution": 300,
        });
        let config = Config::from_value(&value).unwrap();
        assert_eq!(config.x_tolerance, Some(3.5));
        assert!(config.skip_empty_table);
        assert_eq!(config.span_class, "txt");
        assert_eq!(config.resolution, 300);
    }

    #[test]
    fn test_from_map_unknown_key_ignored() {
        let value = json!({ "no_such_option": 1, "table_flag": false });
        let config = Config::from_value(&value).unwrap();
        assert!(!config.table_flag);
    }

    #[test]
    fn test_from_map_wrong_type_rejected() {
        let value = json!({ "x_tolerance": "wide" });
        let err = Config::from_value(&value).unwrap_err();
        assert!(matches!(err, Error::ConfigurationType { .. }));
    }

    #[test]
    fn test_resolution_requires_unsigned_integer() {
        for bad in [json!({ "resolution": 72.5 }), json!({ "resolution": -1 })] {
            let err = Config::from_value(&bad).unwrap_err();
            assert!(matches!(err, Error::ConfigurationType { .. }));
        }
        let config = Config::from_value(&json!({ "resolution": 300 })).unwrap();
        assert_eq!(config.resolution, 300);
    }

    #[test]
    fn test_from_value_requires_object() {
        let err = Config::from_value(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_null_resets_to_adaptive() {
        let value = json!({ "y_tolerance": null });
        let config = Config::from_value(&value).unwrap();
        assert!(config.y_tolerance.is_none());
    }

    #[test]
    fn test_builder_setters() {
        let config = Config::new()
            .without_tables()
            .with_tolerances(2.0, 4.0)
            .with_unique_prefix("doc42");
        assert!(!config.table_flag);
        assert_eq!(config.x_tolerance, Some(2.0));
        assert_eq!(config.y_tolerance, Some(4.0));
        assert_eq!(config.unique_prefix.as_deref(), Some("doc42"));
    }

    #[test]
    fn test_level_filter_flags() {
        let mut config = Config::default();
        config.verbose_flag = true;
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
        config.debug_flag = true;
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);
    }
}
