use serde::Deserialize;

use crate::error::Result;
use crate::geometry::{Point, Rectangle};

/// Font-wide metrics at the current font size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontExtents {
    pub ascent: f64,
    pub descent: f64,
    pub height: f64,
    pub max_x_advance: f64,
}

/// Ink extents of one string at the current font and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtents {
    pub x_bearing: f64,
    pub y_bearing: f64,
    pub width: f64,
    pub height: f64,
    pub x_advance: f64,
    pub y_advance: f64,
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "(u8, u8, u8)")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled into the `0.0..=1.0` range surfaces expect.
    pub fn normalized(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::rgb(r, g, b)
    }
}

/// Text measurement half of the surface capability.
///
/// The fitter only needs this trait, so it can run against a measurer that
/// cannot draw at all.
pub trait TextMeasure {
    fn select_font_face(&mut self, face: &str) -> Result<()>;

    fn set_font_size(&mut self, size: f64) -> Result<()>;

    fn font_extents(&self) -> Result<FontExtents>;

    fn text_extents(&self, text: &str) -> Result<TextExtents>;
}

/// Drawing capability provided by the frame loop.
///
/// Mirrors a cairo-style context: paths are built with [`Surface::rectangle`]
/// and consumed by [`Surface::fill`] / [`Surface::stroke`]; transform and font
/// state are pushed and popped with [`Surface::save`] / [`Surface::restore`].
pub trait Surface: TextMeasure {
    fn rectangle(&mut self, rect: Rectangle) -> Result<()>;

    fn fill(&mut self) -> Result<()>;

    fn stroke(&mut self) -> Result<()>;

    fn save(&mut self) -> Result<()>;

    fn restore(&mut self) -> Result<()>;

    fn translate(&mut self, dx: f64, dy: f64) -> Result<()>;

    fn scale(&mut self, factor: f64) -> Result<()>;

    /// Channels in `0.0..=1.0`.
    fn set_source_rgb(&mut self, r: f64, g: f64, b: f64) -> Result<()>;

    fn move_to(&mut self, point: Point) -> Result<()>;

    fn show_text(&mut self, text: &str) -> Result<()>;
}
