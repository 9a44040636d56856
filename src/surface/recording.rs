use crate::error::{CanvasError, Result};
use crate::geometry::{Point, Rectangle};
use crate::width::display_width;

use super::core::{FontExtents, Surface, TextExtents, TextMeasure};

const DEFAULT_FACE: &str = "sans-serif";
const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Advance per display column, as a fraction of the font size.
const ADVANCE: f64 = 0.6;
const ASCENT: f64 = 0.8;
const DESCENT: f64 = 0.2;
const BEARING: f64 = 0.05;

/// Every call made against a [`RecordingSurface`], in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Rectangle(Rectangle),
    Fill,
    Stroke,
    Save,
    Restore,
    Translate(f64, f64),
    Scale(f64),
    SetSourceRgb(f64, f64, f64),
    SelectFontFace(String),
    SetFontSize(f64),
    MoveTo(Point),
    ShowText(ShownText),
}

/// A `show_text` call resolved to device coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ShownText {
    pub text: String,
    pub face: String,
    /// Font size after the active transform scale is applied.
    pub font_size: f64,
    /// Baseline origin in device coordinates.
    pub origin: Point,
    /// Ink bounds in device coordinates.
    pub ink: Rectangle,
}

#[derive(Debug, Clone, PartialEq)]
struct GraphicsState {
    offset: Point,
    scale: f64,
    face: String,
    font_size: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            offset: Point::ORIGIN,
            scale: 1.0,
            face: DEFAULT_FACE.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// In-memory surface with monospace metrics.
///
/// Each display column advances `0.6 × size`; ascent is `0.8 × size` and
/// descent `0.2 × size`. With pixel snapping enabled every metric is rounded
/// up to a whole unit, which makes measured sizes grow non-linearly with the
/// font size the way hinted fonts do.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    current_point: Option<Point>,
    pixel_snap: bool,
    broken_metrics: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round every metric up to a whole unit.
    pub fn with_pixel_snap(mut self) -> Self {
        self.pixel_snap = true;
        self
    }

    /// Make every measurement query fail, as a surface without a usable font
    /// binding would.
    pub fn with_broken_metrics(mut self) -> Self {
        self.broken_metrics = true;
        self
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Every `show_text` call, in order.
    pub fn shown_text(&self) -> Vec<&ShownText> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::ShowText(shown) => Some(shown),
                _ => None,
            })
            .collect()
    }

    /// Current save/restore nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn font_size(&self) -> f64 {
        self.state.font_size
    }

    pub fn transform(&self) -> (Point, f64) {
        (self.state.offset, self.state.scale)
    }

    fn snap(&self, value: f64) -> f64 {
        if self.pixel_snap { value.ceil() } else { value }
    }

    fn check_metrics(&self) -> Result<()> {
        if self.broken_metrics {
            return Err(CanvasError::MeasurementFailure(format!(
                "no metrics available for face `{}`",
                self.state.face
            )));
        }
        Ok(())
    }

    fn to_device(&self, point: Point) -> Point {
        Point::new(
            self.state.offset.x + point.x * self.state.scale,
            self.state.offset.y + point.y * self.state.scale,
        )
    }
}

impl TextMeasure for RecordingSurface {
    fn select_font_face(&mut self, face: &str) -> Result<()> {
        self.state.face = face.to_string();
        self.ops.push(SurfaceOp::SelectFontFace(face.to_string()));
        Ok(())
    }

    fn set_font_size(&mut self, size: f64) -> Result<()> {
        self.state.font_size = size;
        self.ops.push(SurfaceOp::SetFontSize(size));
        Ok(())
    }

    fn font_extents(&self) -> Result<FontExtents> {
        self.check_metrics()?;
        let size = self.state.font_size;
        let ascent = self.snap(ASCENT * size);
        let descent = self.snap(DESCENT * size);
        Ok(FontExtents {
            ascent,
            descent,
            height: ascent + descent,
            max_x_advance: self.snap(ADVANCE * size),
        })
    }

    fn text_extents(&self, text: &str) -> Result<TextExtents> {
        self.check_metrics()?;
        let size = self.state.font_size;
        let columns = display_width(text) as f64;
        if columns == 0.0 {
            return Ok(TextExtents::default());
        }
        let ascent = self.snap(ASCENT * size);
        let descent = self.snap(DESCENT * size);
        let advance = self.snap(ADVANCE * size * columns);
        let x_bearing = BEARING * size;
        Ok(TextExtents {
            x_bearing,
            y_bearing: -ascent,
            width: advance - x_bearing,
            height: ascent + descent,
            x_advance: advance,
            y_advance: 0.0,
        })
    }
}

impl Surface for RecordingSurface {
    fn rectangle(&mut self, rect: Rectangle) -> Result<()> {
        self.ops.push(SurfaceOp::Rectangle(rect));
        Ok(())
    }

    fn fill(&mut self) -> Result<()> {
        self.ops.push(SurfaceOp::Fill);
        Ok(())
    }

    fn stroke(&mut self) -> Result<()> {
        self.ops.push(SurfaceOp::Stroke);
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.stack.push(self.state.clone());
        self.ops.push(SurfaceOp::Save);
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        let previous = self
            .stack
            .pop()
            .ok_or_else(|| CanvasError::Surface("restore without matching save".to_string()))?;
        self.state = previous;
        self.ops.push(SurfaceOp::Restore);
        Ok(())
    }

    fn translate(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.state.offset = self.to_device(Point::new(dx, dy));
        self.ops.push(SurfaceOp::Translate(dx, dy));
        Ok(())
    }

    fn scale(&mut self, factor: f64) -> Result<()> {
        self.state.scale *= factor;
        self.ops.push(SurfaceOp::Scale(factor));
        Ok(())
    }

    fn set_source_rgb(&mut self, r: f64, g: f64, b: f64) -> Result<()> {
        self.ops.push(SurfaceOp::SetSourceRgb(r, g, b));
        Ok(())
    }

    fn move_to(&mut self, point: Point) -> Result<()> {
        self.current_point = Some(point);
        self.ops.push(SurfaceOp::MoveTo(point));
        Ok(())
    }

    fn show_text(&mut self, text: &str) -> Result<()> {
        let point = self
            .current_point
            .ok_or_else(|| CanvasError::Surface("show_text without current point".to_string()))?;
        let extents = self.text_extents(text)?;
        let scale = self.state.scale;
        let origin = self.to_device(point);
        let ink = Rectangle::new(
            origin.x + extents.x_bearing * scale,
            origin.y + extents.y_bearing * scale,
            extents.width * scale,
            extents.height * scale,
        );
        self.current_point = Some(point.translate(extents.x_advance, extents.y_advance));
        self.ops.push(SurfaceOp::ShowText(ShownText {
            text: text.to_string(),
            face: self.state.face.clone(),
            font_size: self.state.font_size * scale,
            origin,
            ink,
        }));
        Ok(())
    }
}
