use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::error::Result;
use crate::geometry::Rectangle;
use crate::layout::{Axis, LayoutItem, Sizing, partition};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::RenderMetrics;
use crate::surface::{Color, Surface};
use crate::text::{FitPlan, FitTuning, TextOptions, fit_text};

const LOG_TARGET: &str = "tickcanvas::canvas";

/// Configuration shared by a canvas and every child canvas derived from it.
#[derive(Debug, Clone, Default)]
pub struct CanvasConfig {
    /// Optional structured logger for fit decisions and layout failures.
    pub logger: Option<Logger>,
    /// Counters updated by every drawing call.
    pub metrics: Option<Arc<Mutex<RenderMetrics>>>,
    /// Bounds of the text fit search.
    pub tuning: FitTuning,
}

impl CanvasConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(RenderMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<RenderMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }

    /// Log the current metrics snapshot, then reset the counters.
    pub fn flush_metrics(&self, target: &str) {
        if let (Some(logger), Some(metrics)) = (self.logger.as_ref(), self.metrics.as_ref()) {
            if let Ok(mut guard) = metrics.lock() {
                let _ = logger.log_event(guard.snapshot().to_log_event(target));
                guard.reset();
            }
        }
    }

    fn record(&self, update: impl FnOnce(&mut RenderMetrics)) {
        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                update(&mut *guard);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: impl FnOnce() -> I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.logger.as_ref().filter(|logger| logger.enabled(level)) {
            let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields()));
        }
    }
}

/// Something that can draw itself into a canvas. Closures with the matching
/// signature implement it.
pub trait Drawable {
    fn draw(&mut self, canvas: &mut Canvas<'_>) -> Result<()>;
}

impl<F> Drawable for F
where
    F: FnMut(&mut Canvas<'_>) -> Result<()>,
{
    fn draw(&mut self, canvas: &mut Canvas<'_>) -> Result<()> {
        self(canvas)
    }
}

/// Boxed draw callback, for item lists mixing different closures.
pub type DrawFn<'f> = Box<dyn FnMut(&mut Canvas<'_>) -> Result<()> + 'f>;

/// Box a closure as a [`DrawFn`], pinning down its argument type.
pub fn draw_fn<'f, F>(draw: F) -> DrawFn<'f>
where
    F: FnMut(&mut Canvas<'_>) -> Result<()> + 'f,
{
    Box::new(draw)
}

/// Proportional layout item (weight 1) drawing with `draw`.
pub fn draw_item<F>(draw: F) -> LayoutItem<F>
where
    F: FnMut(&mut Canvas<'_>) -> Result<()>,
{
    LayoutItem::new(draw)
}

/// Fixed-size layout item drawing with `draw`.
pub fn fixed_item<F>(size: f64, draw: F) -> LayoutItem<F>
where
    F: FnMut(&mut Canvas<'_>) -> Result<()>,
{
    LayoutItem::fixed(size, draw)
}

/// Proportional layout item drawing with `draw`.
pub fn proportion_item<F>(proportion: f64, draw: F) -> LayoutItem<F>
where
    F: FnMut(&mut Canvas<'_>) -> Result<()>,
{
    LayoutItem::proportion(proportion, draw)
}

/// A drawing surface bound to a viewport rectangle.
///
/// The surface is borrowed, never owned: child canvases created by
/// [`Canvas::deflate`], [`Canvas::rows`] and friends reborrow the same surface
/// and only differ in their viewport.
pub struct Canvas<'s> {
    surface: &'s mut dyn Surface,
    rectangle: Rectangle,
    config: CanvasConfig,
}

impl<'s> Canvas<'s> {
    pub fn new(surface: &'s mut dyn Surface, rectangle: Rectangle) -> Self {
        Self::with_config(surface, rectangle, CanvasConfig::default())
    }

    pub fn with_config(
        surface: &'s mut dyn Surface,
        rectangle: Rectangle,
        config: CanvasConfig,
    ) -> Self {
        Self {
            surface,
            rectangle,
            config,
        }
    }

    /// The viewport this canvas draws into.
    pub fn rectangle(&self) -> Rectangle {
        self.rectangle
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Direct access to the underlying surface.
    pub fn surface(&mut self) -> &mut dyn Surface {
        &mut *self.surface
    }

    /// Child canvas on the same surface with the viewport mapped through `map`.
    pub fn with_rectangle(&mut self, map: impl FnOnce(Rectangle) -> Rectangle) -> Canvas<'_> {
        let rectangle = map(self.rectangle);
        self.bind(rectangle)
    }

    pub fn deflate(&mut self, amount: f64) -> Canvas<'_> {
        self.with_rectangle(|rect| rect.deflate(amount))
    }

    pub fn deflate_xy(&mut self, width: f64, height: f64) -> Canvas<'_> {
        self.with_rectangle(|rect| rect.deflate_xy(width, height))
    }

    pub fn fill(&mut self, color: Color) -> Result<()> {
        self.paint_rectangle(color)?;
        self.surface.fill()?;
        self.config.record(RenderMetrics::record_fill);
        Ok(())
    }

    pub fn stroke(&mut self, color: Color) -> Result<()> {
        self.paint_rectangle(color)?;
        self.surface.stroke()?;
        self.config.record(RenderMetrics::record_stroke);
        Ok(())
    }

    /// Fit `content` into the viewport and draw it, one `show_text` per line.
    ///
    /// Transform, color and font changes are wrapped in `save`/`restore`.
    /// Returns `Ok(None)` without touching the surface when the viewport has
    /// no area or the text is blank.
    pub fn text(&mut self, content: &str, options: &TextOptions) -> Result<Option<FitPlan>> {
        if self.rectangle.is_degenerate() || content.trim().is_empty() {
            self.skip_text(content);
            return Ok(None);
        }

        self.surface.save()?;
        let drawn = self.draw_text(content, options);
        let restored = self.surface.restore();
        let plan = drawn?;
        restored?;

        match plan.as_ref() {
            Some(plan) => {
                self.config.record(|metrics| {
                    metrics.record_fit(plan.lines.len(), plan.shrink_steps, plan.descent_steps)
                });
                self.config.log(LogLevel::Debug, "text.fit", || {
                    [
                        json_kv("font_size", json!(plan.font_size)),
                        json_kv("scale", json!(plan.scale)),
                        json_kv("lines", json!(plan.lines.len())),
                        json_kv("shrink_steps", json!(plan.shrink_steps)),
                        json_kv("descent_steps", json!(plan.descent_steps)),
                        json_kv("width", json!(plan.width)),
                        json_kv("height", json!(plan.height)),
                    ]
                });
            }
            None => self.skip_text(content),
        }

        Ok(plan)
    }

    /// Stack `items` top to bottom, drawing each into its own child canvas.
    pub fn rows<D: Drawable>(&mut self, items: Vec<LayoutItem<D>>) -> Result<()> {
        self.split_into(Axis::Vertical, items)
    }

    /// Place `items` left to right, drawing each into its own child canvas.
    pub fn columns<D: Drawable>(&mut self, items: Vec<LayoutItem<D>>) -> Result<()> {
        self.split_into(Axis::Horizontal, items)
    }

    fn split_into<D: Drawable>(&mut self, axis: Axis, items: Vec<LayoutItem<D>>) -> Result<()> {
        let sizings: Vec<Sizing> = items.iter().map(|item| item.sizing).collect();
        let children = match partition(self.rectangle, axis, &sizings) {
            Ok(children) => children,
            Err(err) => {
                let rectangle = self.rectangle;
                self.config.log(LogLevel::Warn, "layout.degenerate", || {
                    [
                        json_kv("axis", json!(format!("{axis:?}"))),
                        json_kv("items", json!(sizings.len())),
                        json_kv("width", json!(rectangle.width())),
                        json_kv("height", json!(rectangle.height())),
                        json_kv("error", json!(err.to_string())),
                    ]
                });
                return Err(err);
            }
        };
        self.config.record(RenderMetrics::record_split);

        for (rectangle, mut item) in children.into_iter().zip(items) {
            let mut child = self.bind(rectangle);
            item.payload.draw(&mut child)?;
        }
        Ok(())
    }

    fn bind(&mut self, rectangle: Rectangle) -> Canvas<'_> {
        Canvas {
            surface: &mut *self.surface,
            rectangle,
            config: self.config.clone(),
        }
    }

    fn paint_rectangle(&mut self, color: Color) -> Result<()> {
        let (r, g, b) = color.normalized();
        self.surface.set_source_rgb(r, g, b)?;
        self.surface.rectangle(self.rectangle)
    }

    fn draw_text(&mut self, content: &str, options: &TextOptions) -> Result<Option<FitPlan>> {
        let (r, g, b) = options.color.normalized();
        self.surface.set_source_rgb(r, g, b)?;

        let tuning = self.config.tuning;
        let Some(plan) = fit_text(&mut *self.surface, self.rectangle, content, options, &tuning)?
        else {
            return Ok(None);
        };

        self.surface.translate(plan.origin.x, plan.origin.y)?;
        self.surface.set_font_size(plan.font_size)?;
        for line in &plan.lines {
            self.surface.move_to(line.position - plan.origin)?;
            self.surface.show_text(&line.text)?;
        }
        Ok(Some(plan))
    }

    fn skip_text(&self, content: &str) {
        self.config.record(RenderMetrics::record_skipped_fit);
        let rectangle = self.rectangle;
        self.config.log(LogLevel::Trace, "text.skipped", || {
            [
                json_kv("chars", json!(content.chars().count())),
                json_kv("width", json!(rectangle.width())),
                json_kv("height", json!(rectangle.height())),
            ]
        });
    }
}

impl std::fmt::Debug for Canvas<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("rectangle", &self.rectangle)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CanvasError;
    use crate::logging::MemorySink;
    use crate::surface::{RecordingSurface, SurfaceOp};
    use crate::text::TextAlign;

    fn painted_rects(surface: &RecordingSurface) -> Vec<Rectangle> {
        surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Rectangle(rect) => Some(*rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn fill_normalizes_color_and_paints_viewport() {
        let mut surface = RecordingSurface::new();
        let area = Rectangle::new(0.0, 0.0, 640.0, 480.0);
        Canvas::new(&mut surface, area)
            .fill(Color::rgb(255, 0, 51))
            .unwrap();

        assert_eq!(
            surface.ops(),
            &[
                SurfaceOp::SetSourceRgb(1.0, 0.0, 0.2),
                SurfaceOp::Rectangle(area),
                SurfaceOp::Fill,
            ]
        );
    }

    #[test]
    fn deflate_binds_child_to_inner_viewport() {
        let mut surface = RecordingSurface::new();
        let mut canvas = Canvas::new(&mut surface, Rectangle::new(0.0, 0.0, 200.0, 100.0));
        canvas.deflate(40.0).stroke(Color::BLACK).unwrap();
        canvas.deflate_xy(0.0, 10.0).stroke(Color::BLACK).unwrap();
        canvas
            .with_rectangle(|rect| rect.move_by(5.0, 5.0))
            .stroke(Color::BLACK)
            .unwrap();
        assert_eq!(canvas.rectangle(), Rectangle::new(0.0, 0.0, 200.0, 100.0));
        drop(canvas);

        assert_eq!(
            painted_rects(&surface),
            vec![
                Rectangle::new(40.0, 40.0, 120.0, 20.0),
                Rectangle::new(0.0, 10.0, 200.0, 80.0),
                Rectangle::new(5.0, 5.0, 200.0, 100.0),
            ]
        );
    }

    #[test]
    fn rows_hand_children_contiguous_viewports() {
        let mut surface = RecordingSurface::new();
        let mut canvas = Canvas::new(&mut surface, Rectangle::new(0.0, 0.0, 120.0, 300.0));
        canvas
            .rows(vec![
                fixed_item(20.0, draw_fn(|canvas| canvas.stroke(Color::BLACK))),
                draw_item(draw_fn(|canvas| canvas.fill(Color::WHITE))),
            ])
            .unwrap();
        drop(canvas);

        assert_eq!(
            painted_rects(&surface),
            vec![
                Rectangle::new(0.0, 0.0, 120.0, 20.0),
                Rectangle::new(0.0, 20.0, 120.0, 280.0),
            ]
        );
    }

    #[test]
    fn nested_layout_runs_depth_first_in_order() {
        let mut surface = RecordingSurface::new();
        let mut canvas = Canvas::new(&mut surface, Rectangle::new(0.0, 0.0, 100.0, 100.0));
        canvas
            .columns(vec![
                draw_item(draw_fn(|canvas| {
                    canvas.rows(vec![
                        draw_item(draw_fn(|canvas| canvas.stroke(Color::BLACK))),
                        draw_item(draw_fn(|canvas| canvas.stroke(Color::BLACK))),
                    ])
                })),
                draw_item(draw_fn(|canvas| canvas.stroke(Color::BLACK))),
            ])
            .unwrap();
        drop(canvas);

        assert_eq!(
            painted_rects(&surface),
            vec![
                Rectangle::new(0.0, 0.0, 50.0, 50.0),
                Rectangle::new(0.0, 50.0, 50.0, 50.0),
                Rectangle::new(50.0, 0.0, 50.0, 100.0),
            ]
        );
    }

    #[test]
    fn homogeneous_items_need_no_boxing() {
        let mut surface = RecordingSurface::new();
        let mut canvas = Canvas::new(&mut surface, Rectangle::new(0.0, 0.0, 90.0, 10.0));
        let items = (0..3)
            .map(|_| draw_item(|canvas| canvas.stroke(Color::BLACK)))
            .collect();
        canvas.columns(items).unwrap();
        drop(canvas);

        let xs: Vec<f64> = painted_rects(&surface).iter().map(|rect| rect.x()).collect();
        assert_eq!(xs, vec![0.0, 30.0, 60.0]);
    }

    #[test]
    fn degenerate_layout_surfaces_error_and_logs() {
        let sink = MemorySink::new();
        let config = CanvasConfig::default().with_logger(Logger::new(sink.clone()));
        let mut surface = RecordingSurface::new();
        let mut canvas =
            Canvas::with_config(&mut surface, Rectangle::new(0.0, 0.0, 50.0, 50.0), config);

        let err = canvas
            .columns(vec![
                proportion_item(0.0, draw_fn(|canvas| canvas.fill(Color::BLACK))),
                fixed_item(10.0, draw_fn(|canvas| canvas.fill(Color::BLACK))),
            ])
            .unwrap_err();
        drop(canvas);

        assert!(matches!(err, CanvasError::DegenerateLayout(_)));
        assert!(surface.ops().is_empty());
        assert_eq!(sink.messages(), vec!["layout.degenerate"]);
        assert_eq!(sink.events()[0].level, LogLevel::Warn);
    }

    #[test]
    fn callback_errors_stop_the_walk() {
        let mut surface = RecordingSurface::new();
        let mut canvas = Canvas::new(&mut surface, Rectangle::new(0.0, 0.0, 50.0, 50.0));
        let err = canvas
            .rows(vec![
                draw_item(draw_fn(|_| Err(CanvasError::Surface("boom".to_string())))),
                draw_item(draw_fn(|canvas| canvas.fill(Color::BLACK))),
            ])
            .unwrap_err();
        drop(canvas);
        assert!(matches!(err, CanvasError::Surface(_)));
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn text_is_isolated_by_save_and_restore() {
        let mut surface = RecordingSurface::new();
        let area = Rectangle::new(10.0, 10.0, 300.0, 300.0);
        let plan = Canvas::new(&mut surface, area)
            .text(
                "first paragraph of words\n\nsecond paragraph",
                &TextOptions::default().with_color(Color::rgb(0, 255, 0)),
            )
            .unwrap()
            .unwrap();

        let ops = surface.ops();
        assert_eq!(ops.first(), Some(&SurfaceOp::Save));
        assert_eq!(ops.last(), Some(&SurfaceOp::Restore));
        assert!(ops.contains(&SurfaceOp::SetSourceRgb(0.0, 1.0, 0.0)));
        assert_eq!(surface.depth(), 0);
        assert_eq!(surface.transform(), (crate::geometry::Point::ORIGIN, 1.0));

        let shown = surface.shown_text();
        assert_eq!(shown.len(), plan.lines.len());
        for (shown, line) in shown.iter().zip(&plan.lines) {
            assert_eq!(shown.text, line.text);
            assert!((shown.origin.x - line.position.x).abs() < 1e-9);
            assert!((shown.origin.y - line.position.y).abs() < 1e-9);
            assert_eq!(shown.font_size, plan.font_size);
            assert!(area.contains(shown.ink.pos));
        }
    }

    #[test]
    fn text_in_collapsed_viewport_draws_nothing() {
        let mut surface = RecordingSurface::new();
        let mut canvas = Canvas::new(&mut surface, Rectangle::new(0.0, 0.0, 100.0, 20.0));
        let plan = canvas
            .deflate_xy(0.0, 15.0)
            .text("12", &TextOptions::default())
            .unwrap();
        assert!(plan.is_none());
        let blank = canvas.text("  \n ", &TextOptions::default()).unwrap();
        assert!(blank.is_none());
        drop(canvas);
        assert!(surface.shown_text().is_empty());
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn measurement_failure_still_restores_surface() {
        let mut surface = RecordingSurface::new().with_broken_metrics();
        let err = Canvas::new(&mut surface, Rectangle::new(0.0, 0.0, 100.0, 100.0))
            .text("hello", &TextOptions::default())
            .unwrap_err();
        assert!(matches!(err, CanvasError::MeasurementFailure(_)));
        assert_eq!(surface.depth(), 0);
        assert_eq!(surface.ops().last(), Some(&SurfaceOp::Restore));
    }

    #[test]
    fn fit_is_logged_and_counted() {
        let sink = MemorySink::new();
        let mut config = CanvasConfig::default().with_logger(Logger::new(sink.clone()));
        config.enable_metrics();
        let metrics = config.metrics_handle().unwrap();

        let mut surface = RecordingSurface::new();
        let mut canvas =
            Canvas::with_config(&mut surface, Rectangle::new(0.0, 0.0, 400.0, 200.0), config);
        canvas.fill(Color::WHITE).unwrap();
        canvas
            .text(
                "Hello world",
                &TextOptions::default().with_text_align(TextAlign::Center),
            )
            .unwrap();
        canvas
            .deflate(150.0)
            .text("hidden", &TextOptions::default())
            .unwrap();

        let snapshot = metrics.lock().unwrap().snapshot();
        assert_eq!(snapshot.fills, 1);
        assert_eq!(snapshot.text_fits, 1);
        assert_eq!(snapshot.lines_drawn, 1);
        assert_eq!(snapshot.skipped_fits, 1);

        let events = sink.events();
        let fit = events.iter().find(|event| event.message == "text.fit").unwrap();
        assert_eq!(fit.level, LogLevel::Debug);
        assert_eq!(fit.fields.get("lines"), Some(&json!(1)));
        assert!(sink.messages().contains(&"text.skipped".to_string()));

        canvas.config().flush_metrics("tickcanvas::metrics");
        assert_eq!(sink.messages().last().map(String::as_str), Some("render_metrics"));
        assert_eq!(metrics.lock().unwrap().snapshot().fills, 0);
    }
}
