use crate::error::{CanvasError, Result};
use crate::surface::{FontExtents, TextMeasure};

/// Gap between consecutive lines of one paragraph, as a share of line height.
const LINE_SPACING: f64 = 0.2;
/// Height of the empty line separating paragraphs, as a share of line height.
const PARAGRAPH_SPACING: f64 = 0.5;

/// How a block of lines was produced, which decides how it is positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Re-wrapped paragraphs; each line is aligned on its own.
    Wrapped,
    /// Input lines kept as written; every line shares one horizontal offset.
    Literal,
}

/// One measured line of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePart {
    /// Shift applied to the pen position so ink starts at the line's left edge.
    pub x_offset: f64,
    /// Baseline, measured down from the top of the block.
    pub baseline: f64,
    pub width: f64,
    pub text: String,
}

/// Measured layout of a block of lines at one font size.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub mode: LineMode,
    pub parts: Vec<LinePart>,
    pub width: f64,
    pub height: f64,
}

impl Metrics {
    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn fits_within(&self, width: f64, height: f64) -> bool {
        self.width <= width && self.height <= height
    }
}

/// Measure wrapped paragraph lines, where an empty line marks a paragraph
/// break and takes reduced spacing.
pub fn measure_wrapped<M>(measurer: &M, lines: &[String]) -> Result<Metrics>
where
    M: TextMeasure + ?Sized,
{
    let font = checked_font_extents(measurer)?;
    let line_height = font.ascent + font.descent;

    let mut parts = Vec::with_capacity(lines.len());
    let mut width: f64 = 0.0;
    let mut y = 0.0;
    let mut after_text = false;

    for line in lines {
        if line.is_empty() {
            y += line_height * PARAGRAPH_SPACING;
            after_text = false;
            continue;
        }
        if after_text {
            y += line_height * LINE_SPACING;
        }

        let extents = measurer.text_extents(line)?;
        check_finite(line, extents.width)?;
        let baseline = y + font.ascent;
        parts.push(LinePart {
            x_offset: -extents.x_bearing,
            baseline,
            width: extents.width,
            text: line.clone(),
        });
        width = width.max(extents.width);
        y = baseline + font.descent;
        after_text = true;
    }

    Ok(Metrics {
        mode: LineMode::Wrapped,
        parts,
        width,
        height: y,
    })
}

/// Measure input lines exactly as given. Blank lines keep a full line of
/// height and all lines share the first inked line's horizontal offset.
pub fn measure_literal<M>(measurer: &M, lines: &[String]) -> Result<Metrics>
where
    M: TextMeasure + ?Sized,
{
    let font = checked_font_extents(measurer)?;
    let line_height = font.ascent + font.descent;

    let mut parts = Vec::with_capacity(lines.len());
    let mut width: f64 = 0.0;
    let mut shared_offset = None;

    for (idx, line) in lines.iter().enumerate() {
        let extents = measurer.text_extents(line)?;
        check_finite(line, extents.width)?;
        if shared_offset.is_none() && !line.trim().is_empty() {
            shared_offset = Some(-extents.x_bearing);
        }
        let top = idx as f64 * line_height * (1.0 + LINE_SPACING);
        parts.push(LinePart {
            x_offset: 0.0,
            baseline: top + font.ascent,
            width: extents.width,
            text: line.clone(),
        });
        width = width.max(extents.width);
    }

    let x_offset = shared_offset.unwrap_or(0.0);
    for part in &mut parts {
        part.x_offset = x_offset;
    }

    let height = match lines.len() {
        0 => 0.0,
        count => count as f64 * line_height + (count - 1) as f64 * line_height * LINE_SPACING,
    };

    Ok(Metrics {
        mode: LineMode::Literal,
        parts,
        width,
        height,
    })
}

/// Measure `lines` in whichever mode produced them.
pub fn measure<M>(measurer: &M, mode: LineMode, lines: &[String]) -> Result<Metrics>
where
    M: TextMeasure + ?Sized,
{
    match mode {
        LineMode::Wrapped => measure_wrapped(measurer, lines),
        LineMode::Literal => measure_literal(measurer, lines),
    }
}

fn checked_font_extents<M>(measurer: &M) -> Result<FontExtents>
where
    M: TextMeasure + ?Sized,
{
    let font = measurer.font_extents()?;
    let line_height = font.ascent + font.descent;
    if !line_height.is_finite() || line_height <= 0.0 {
        return Err(CanvasError::MeasurementFailure(format!(
            "font reports unusable line height {line_height} (ascent {}, descent {})",
            font.ascent, font.descent
        )));
    }
    Ok(font)
}

fn check_finite(line: &str, width: f64) -> Result<()> {
    if width.is_finite() {
        Ok(())
    } else {
        Err(CanvasError::MeasurementFailure(format!(
            "text extents for `{line}` are not finite"
        )))
    }
}
