use crate::error::{CanvasError, Result};
use crate::geometry::{Point, Rectangle};
use crate::surface::TextMeasure;

use super::metrics::{LineMode, Metrics, measure};
use super::options::{FitTuning, TextOptions};
use super::raw::RawText;

/// One line ready to draw: `position` is the pen origin on the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub position: Point,
    pub width: f64,
}

/// Result of fitting text into a box.
#[derive(Debug, Clone, PartialEq)]
pub struct FitPlan {
    /// Font size to draw with.
    pub font_size: f64,
    /// `font_size` relative to the requested reference size (at most 1).
    pub scale: f64,
    /// Top-left corner of the text block.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub mode: LineMode,
    pub lines: Vec<PlacedLine>,
    /// Wrap budgets tried beyond the first.
    pub shrink_steps: usize,
    /// Font sizes tried beyond the first during the integer descent.
    pub descent_steps: usize,
}

impl FitPlan {
    pub fn bounds(&self) -> Rectangle {
        Rectangle::from_parts(self.origin, Point::new(self.width, self.height))
    }
}

struct Candidate {
    lines: Vec<String>,
    metrics: Metrics,
}

/// Fit `text` into `area`.
///
/// Returns `Ok(None)` when there is nothing to draw: an area without positive
/// width and height, or text that is empty after trimming. Leaves the
/// measurer's font size at the chosen size.
pub fn fit_text<M>(
    measurer: &mut M,
    area: Rectangle,
    text: &str,
    options: &TextOptions,
    tuning: &FitTuning,
) -> Result<Option<FitPlan>>
where
    M: TextMeasure + ?Sized,
{
    if area.is_degenerate() || text.trim().is_empty() {
        return Ok(None);
    }

    if let Some(face) = options.font_face.as_deref() {
        measurer.select_font_face(face)?;
    }
    let reference = options.size;
    measurer.set_font_size(reference)?;

    let (candidate, shrink_steps) = if options.wrap {
        best_wrap(measurer, area, text, tuning)?
    } else {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        let metrics = measure(measurer, LineMode::Literal, &lines)?;
        (Candidate { lines, metrics }, 0)
    };

    let scale = fill_scale(&candidate.metrics, area);
    let mut font_size = reference;
    let mut metrics = candidate.metrics;
    let mut descent_steps = 0;

    if scale < 1.0 {
        let floor = tuning.min_font_size;
        font_size = (reference * scale).floor().max(floor).min(reference);
        loop {
            measurer.set_font_size(font_size)?;
            metrics = measure(measurer, metrics.mode, &candidate.lines)?;
            if metrics.fits_within(area.width(), area.height()) || font_size - 1.0 < floor {
                break;
            }
            font_size -= 1.0;
            descent_steps += 1;
        }
    }

    Ok(Some(place(
        metrics,
        area,
        options,
        font_size,
        font_size / reference,
        shrink_steps,
        descent_steps,
    )))
}

/// Try every wrap budget from "no wrapping" down to the floor, keeping the
/// layout whose aspect ratio is closest to the box's. Ratio distance is not
/// monotone in the budget, so the whole sequence is always walked.
fn best_wrap<M>(
    measurer: &M,
    area: Rectangle,
    text: &str,
    tuning: &FitTuning,
) -> Result<(Candidate, usize)>
where
    M: TextMeasure + ?Sized,
{
    let target = area.aspect_ratio();
    let first = RawText::parse(text);
    let seed = evaluate(measurer, &first, target)?;

    let mut budgets = std::iter::successors(first.shrink(tuning), |raw| raw.shrink(tuning));
    let ((_, best), steps) = budgets.try_fold((seed, 0), |(best, steps), raw| {
        let next = evaluate(measurer, &raw, target)?;
        let keep = if next.0 < best.0 { next } else { best };
        Ok::<_, CanvasError>((keep, steps + 1))
    })?;

    Ok((best, steps))
}

/// Measure one wrap budget, returning its distance from the target ratio.
fn evaluate<M>(measurer: &M, raw: &RawText, target: f64) -> Result<(f64, Candidate)>
where
    M: TextMeasure + ?Sized,
{
    let lines = raw.lines();
    let metrics = measure(measurer, LineMode::Wrapped, &lines)?;
    let distance = (metrics.ratio() - target).abs();
    Ok((distance, Candidate { lines, metrics }))
}

/// Largest uniform scale (capped at 1) that keeps `metrics` inside `area`.
fn fill_scale(metrics: &Metrics, area: Rectangle) -> f64 {
    let mut scale = if metrics.width > 0.0 {
        area.width() / metrics.width
    } else {
        f64::INFINITY
    };
    if metrics.height * scale > area.height() {
        scale = area.height() / metrics.height;
    }
    scale.min(1.0)
}

fn place(
    metrics: Metrics,
    area: Rectangle,
    options: &TextOptions,
    font_size: f64,
    scale: f64,
    shrink_steps: usize,
    descent_steps: usize,
) -> FitPlan {
    let (align_x, align_y) = options.box_align.factors();
    let origin = area.pos.translate(
        (area.width() - metrics.width) * align_x,
        (area.height() - metrics.height) * align_y,
    );

    let line_align = match metrics.mode {
        LineMode::Wrapped => options.text_align.factor(),
        LineMode::Literal => 0.0,
    };

    let lines = metrics
        .parts
        .iter()
        .map(|part| PlacedLine {
            text: part.text.clone(),
            position: origin.translate(
                (metrics.width - part.width) * line_align + part.x_offset,
                part.baseline,
            ),
            width: part.width,
        })
        .collect();

    FitPlan {
        font_size,
        scale,
        origin,
        width: metrics.width,
        height: metrics.height,
        mode: metrics.mode,
        lines,
        shrink_steps,
        descent_steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use crate::text::options::{BoxAlign, TextAlign};

    const EPS: f64 = 1e-6;

    fn fit(
        surface: &mut RecordingSurface,
        area: Rectangle,
        text: &str,
        options: &TextOptions,
    ) -> Option<FitPlan> {
        fit_text(surface, area, text, options, &FitTuning::default()).unwrap()
    }

    /// Ink right edge of a placed line, given the monospace bearing.
    fn ink_right(line: &PlacedLine, font_size: f64) -> f64 {
        line.position.x + 0.05 * font_size + line.width
    }

    #[test]
    fn degenerate_box_is_a_no_op() {
        let mut surface = RecordingSurface::new();
        let options = TextOptions::default();
        for area in [
            Rectangle::new(0.0, 0.0, 100.0, 0.0),
            Rectangle::new(0.0, 0.0, 100.0, -5.0),
            Rectangle::new(0.0, 0.0, 0.0, 50.0),
        ] {
            assert!(fit(&mut surface, area, "Hello", &options).is_none());
        }
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn blank_text_is_a_no_op() {
        let mut surface = RecordingSurface::new();
        let area = Rectangle::new(0.0, 0.0, 300.0, 300.0);
        for wrap in [true, false] {
            let options = TextOptions::default().with_wrap(wrap);
            assert!(fit(&mut surface, area, "", &options).is_none());
            assert!(fit(&mut surface, area, "   \n  ", &options).is_none());
        }
    }

    #[test]
    fn hello_world_stays_on_one_line() {
        let mut surface = RecordingSurface::new();
        let area = Rectangle::new(0.0, 0.0, 400.0, 200.0);
        let plan = fit(&mut surface, area, "Hello world", &TextOptions::default()).unwrap();

        assert_eq!(plan.lines.len(), 1);
        assert_eq!(plan.lines[0].text, "Hello world");
        assert_eq!(plan.font_size, 40.0);
        assert_eq!(plan.scale, 1.0);
        assert_eq!(plan.shrink_steps, 0);
        assert!(plan.width <= area.width() && plan.height <= area.height());
        assert!((plan.origin.x - (400.0 - plan.width) / 2.0).abs() < EPS);
    }

    #[test]
    fn large_reference_size_shrinks_to_fill_width() {
        let mut surface = RecordingSurface::new();
        let area = Rectangle::new(0.0, 0.0, 400.0, 200.0);
        let options = TextOptions::default().with_size(100.0);
        let plan = fit(&mut surface, area, "Hello world", &options).unwrap();

        assert_eq!(plan.lines.len(), 1);
        assert_eq!(plan.font_size, 61.0);
        assert!(plan.width <= 400.0);
        assert!(plan.width > 390.0);
        assert!((plan.scale - 0.61).abs() < EPS);
    }

    #[test]
    fn right_alignment_reaches_box_edge() {
        let mut surface = RecordingSurface::new();
        let area = Rectangle::new(20.0, 10.0, 400.0, 200.0);
        let options = TextOptions::default()
            .with_text_align(TextAlign::Right)
            .with_box_align(BoxAlign::Right);
        let plan = fit(&mut surface, area, "Hello world", &options).unwrap();

        let right = ink_right(&plan.lines[0], plan.font_size);
        assert!((right - area.right()).abs() < EPS);
    }

    #[test]
    fn text_alignment_is_relative_to_block() {
        let mut surface = RecordingSurface::new();
        let area = Rectangle::new(0.0, 0.0, 200.0, 400.0);
        let text = "the quick brown fox jumps over the lazy dog";

        let right = fit(
            &mut surface,
            area,
            text,
            &TextOptions::default().with_text_align(TextAlign::Right),
        )
        .unwrap();
        assert!(right.lines.len() > 1);
        let block_right = right.origin.x + right.width;
        for line in &right.lines {
            assert!((ink_right(line, right.font_size) - block_right).abs() < EPS);
        }

        let left = fit(&mut surface, area, text, &TextOptions::default()).unwrap();
        for line in &left.lines {
            let ink_left = line.position.x + 0.05 * left.font_size;
            assert!((ink_left - left.origin.x).abs() < EPS);
        }

        let center = fit(
            &mut surface,
            area,
            text,
            &TextOptions::default().with_text_align(TextAlign::Center),
        )
        .unwrap();
        let mid = center.origin.x + center.width / 2.0;
        for line in &center.lines {
            let ink_left = line.position.x + 0.05 * center.font_size;
            assert!((ink_left + line.width / 2.0 - mid).abs() < EPS);
        }
    }

    #[test]
    fn tall_box_prefers_narrow_wrap() {
        let mut surface = RecordingSurface::new();
        let text = "the quick brown fox jumps over the lazy dog";
        let tall = fit(
            &mut surface,
            Rectangle::new(0.0, 0.0, 100.0, 400.0),
            text,
            &TextOptions::default(),
        )
        .unwrap();
        let wide = fit(
            &mut surface,
            Rectangle::new(0.0, 0.0, 800.0, 100.0),
            text,
            &TextOptions::default(),
        )
        .unwrap();

        assert!(tall.lines.len() > wide.lines.len());
        assert!(tall.shrink_steps > 0);
    }

    #[test]
    fn wrap_search_walks_every_budget() {
        let mut surface = RecordingSurface::new();
        let text = "word ".repeat(20);
        let plan = fit(
            &mut surface,
            Rectangle::new(0.0, 0.0, 500.0, 500.0),
            &text,
            &TextOptions::default(),
        )
        .unwrap();
        assert_eq!(plan.shrink_steps, 18);
    }

    #[test]
    fn fitted_text_never_overflows() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.\n\n\
                    Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";
        let areas = [
            Rectangle::new(0.0, 0.0, 640.0, 480.0),
            Rectangle::new(5.0, 5.0, 90.0, 300.0),
            Rectangle::new(0.0, 0.0, 300.0, 40.0),
            Rectangle::new(0.0, 0.0, 33.0, 33.0),
        ];

        for snap in [false, true] {
            for area in areas {
                for wrap in [true, false] {
                    let mut surface = if snap {
                        RecordingSurface::new().with_pixel_snap()
                    } else {
                        RecordingSurface::new()
                    };
                    let options = TextOptions::default().with_wrap(wrap);
                    let plan = fit(&mut surface, area, text, &options).unwrap();
                    assert!(plan.font_size >= 2.0);
                    if plan.font_size > 2.0 {
                        assert!(plan.width <= area.width() + EPS, "{area:?} wrap={wrap}");
                        assert!(plan.height <= area.height() + EPS, "{area:?} wrap={wrap}");
                    }
                }
            }
        }
    }

    #[test]
    fn descent_corrects_non_linear_metrics() {
        // Snapped metrics at size 21 are 17 + 5 units tall, one more than the
        // linear estimate, so the descent has to take one extra step.
        let mut surface = RecordingSurface::new().with_pixel_snap();
        let area = Rectangle::new(0.0, 0.0, 1000.0, 21.0);
        let plan = fit(&mut surface, area, "abcdefghij", &TextOptions::default()).unwrap();

        assert_eq!(plan.font_size, 20.0);
        assert_eq!(plan.descent_steps, 1);
        assert_eq!(plan.height, 20.0);
        assert_eq!(surface.font_size(), plan.font_size);
    }

    #[test]
    fn font_size_floor_stops_descent() {
        let mut surface = RecordingSurface::new();
        let area = Rectangle::new(0.0, 0.0, 3.0, 1.0);
        let plan = fit(&mut surface, area, "unfittable", &TextOptions::default()).unwrap();
        assert_eq!(plan.font_size, 2.0);
        assert!(plan.width > area.width());
    }

    #[test]
    fn reference_below_floor_is_never_magnified() {
        let mut surface = RecordingSurface::new();
        let area = Rectangle::new(0.0, 0.0, 1.0, 1.0);
        let options = TextOptions::default().with_size(1.0);
        let plan = fit(&mut surface, area, "hello", &options).unwrap();
        assert_eq!(plan.font_size, 1.0);
        assert!(plan.scale <= 1.0);
        assert_eq!(plan.descent_steps, 0);
    }

    #[test]
    fn literal_mode_keeps_input_lines() {
        let mut surface = RecordingSurface::new();
        let area = Rectangle::new(0.0, 0.0, 600.0, 600.0);
        let options = TextOptions::default()
            .with_wrap(false)
            .with_text_align(TextAlign::Right);
        let plan = fit(&mut surface, area, "short\na much longer line\n\nend", &options).unwrap();

        assert_eq!(plan.mode, LineMode::Literal);
        let texts: Vec<&str> = plan.lines.iter().map(|line| line.text.as_str()).collect();
        assert_eq!(texts, vec!["short", "a much longer line", "", "end"]);
        let x = plan.lines[0].position.x;
        assert!(plan.lines.iter().all(|line| (line.position.x - x).abs() < EPS));
        assert_eq!(plan.shrink_steps, 0);
    }

    #[test]
    fn box_alignment_anchors_block() {
        let mut surface = RecordingSurface::new();
        let area = Rectangle::new(10.0, 20.0, 400.0, 300.0);
        let cases = [
            (BoxAlign::TopLeft, 0.0, 0.0),
            (BoxAlign::Center, 0.5, 0.5),
            (BoxAlign::BottomRight, 1.0, 1.0),
            (BoxAlign::Bottom, 0.5, 1.0),
        ];
        for (align, fx, fy) in cases {
            let options = TextOptions::default().with_box_align(align);
            let plan = fit(&mut surface, area, "Hello", &options).unwrap();
            assert!((plan.origin.x - (10.0 + (400.0 - plan.width) * fx)).abs() < EPS);
            assert!((plan.origin.y - (20.0 + (300.0 - plan.height) * fy)).abs() < EPS);
            assert!(area.contains(plan.origin));
        }
    }

    #[test]
    fn measurement_failure_propagates() {
        let mut surface = RecordingSurface::new().with_broken_metrics();
        let err = fit_text(
            &mut surface,
            Rectangle::new(0.0, 0.0, 100.0, 100.0),
            "text",
            &TextOptions::default(),
            &FitTuning::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CanvasError::MeasurementFailure(_)));
    }

    #[test]
    fn font_face_is_selected_when_given() {
        let mut surface = RecordingSurface::new();
        let options = TextOptions::default().with_font_face("Monospace");
        fit(
            &mut surface,
            Rectangle::new(0.0, 0.0, 100.0, 100.0),
            "x",
            &options,
        )
        .unwrap();
        assert_eq!(
            surface.ops()[0],
            crate::surface::SurfaceOp::SelectFontFace("Monospace".to_string())
        );
    }
}
