use serde::Deserialize;

use crate::error::Result;
use crate::surface::Color;

/// Horizontal alignment of each line within the fitted text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub(crate) fn factor(self) -> f64 {
        match self {
            TextAlign::Left => 0.0,
            TextAlign::Center => 0.5,
            TextAlign::Right => 1.0,
        }
    }
}

/// Anchor of the fitted text block within its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxAlign {
    TopLeft,
    Top,
    TopRight,
    Left,
    #[default]
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl BoxAlign {
    /// `(horizontal, vertical)` share of the free space placed before the block.
    pub(crate) fn factors(self) -> (f64, f64) {
        match self {
            BoxAlign::TopLeft => (0.0, 0.0),
            BoxAlign::Top => (0.5, 0.0),
            BoxAlign::TopRight => (1.0, 0.0),
            BoxAlign::Left => (0.0, 0.5),
            BoxAlign::Center => (0.5, 0.5),
            BoxAlign::Right => (1.0, 0.5),
            BoxAlign::BottomLeft => (0.0, 1.0),
            BoxAlign::Bottom => (0.5, 1.0),
            BoxAlign::BottomRight => (1.0, 1.0),
        }
    }
}

/// Per-call options for [`crate::Canvas::text`].
///
/// Every field has a default, so JSON configs may name any subset of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Reference font size; the fitter only ever shrinks below it.
    pub size: f64,
    #[serde(alias = "boxAlign")]
    pub box_align: BoxAlign,
    #[serde(alias = "fontFace")]
    pub font_face: Option<String>,
    #[serde(alias = "textAlign")]
    pub text_align: TextAlign,
    /// Allow re-wrapping paragraphs; when off, lines break only at `\n`.
    #[serde(alias = "split")]
    pub wrap: bool,
    pub color: Color,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            size: 40.0,
            box_align: BoxAlign::Center,
            font_face: None,
            text_align: TextAlign::Left,
            wrap: true,
            color: Color::BLACK,
        }
    }
}

impl TextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_box_align(mut self, align: BoxAlign) -> Self {
        self.box_align = align;
        self
    }

    pub fn with_font_face(mut self, face: impl Into<String>) -> Self {
        self.font_face = Some(face.into());
        self
    }

    pub fn with_text_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Bounds of the fit search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTuning {
    /// Smallest per-line character budget the wrap search will try.
    pub character_floor: usize,
    /// Multiplier applied to the character budget at each shrink step.
    pub shrink_factor: f64,
    /// Smallest font size the descent will try.
    pub min_font_size: f64,
}

impl Default for FitTuning {
    fn default() -> Self {
        Self {
            character_floor: 10,
            shrink_factor: 0.9,
            min_font_size: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CanvasError;

    #[test]
    fn defaults_match_documented_values() {
        let options = TextOptions::default();
        assert_eq!(options.size, 40.0);
        assert_eq!(options.box_align, BoxAlign::Center);
        assert_eq!(options.text_align, TextAlign::Left);
        assert!(options.wrap);
        assert_eq!(options.color, Color::BLACK);
        assert_eq!(options.font_face, None);
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let options =
            TextOptions::from_json(r#"{"boxAlign": "bottomright", "color": [10, 20, 30]}"#)
                .unwrap();
        assert_eq!(options.box_align, BoxAlign::BottomRight);
        assert_eq!(options.color, Color::rgb(10, 20, 30));
        assert_eq!(options.size, 40.0);
        assert!(options.wrap);
    }

    #[test]
    fn json_accepts_snake_case_keys() {
        let options =
            TextOptions::from_json(r#"{"text_align": "center", "wrap": false, "size": 12}"#)
                .unwrap();
        assert_eq!(options.text_align, TextAlign::Center);
        assert!(!options.wrap);
        assert_eq!(options.size, 12.0);
    }

    #[test]
    fn unknown_alignment_is_rejected() {
        let err = TextOptions::from_json(r#"{"boxAlign": "middle"}"#).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidOptions(_)));
    }

    #[test]
    fn box_align_grid_covers_three_by_three() {
        assert_eq!(BoxAlign::TopLeft.factors(), (0.0, 0.0));
        assert_eq!(BoxAlign::Center.factors(), (0.5, 0.5));
        assert_eq!(BoxAlign::BottomRight.factors(), (1.0, 1.0));
        assert_eq!(BoxAlign::Top.factors(), (0.5, 0.0));
        assert_eq!(BoxAlign::Left.factors(), (0.0, 0.5));
    }
}
