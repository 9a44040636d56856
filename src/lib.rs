//! Immediate-mode layout and text fitting.
//!
//! Every frame an [`App`] redraws into a [`Canvas`]: a drawing [`Surface`]
//! bound to one viewport [`Rectangle`]. Canvases split their viewport into
//! rows and columns of fixed or proportional size, and fit text into a box by
//! searching for the line wrapping whose shape best matches the box, then
//! stepping the font size down until the measured block fits.

pub mod app;
pub mod canvas;
pub mod demo;
pub mod error;
pub mod event;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod surface;
pub mod text;
pub mod width;

pub use app::{App, AppControl, step_frame};
pub use canvas::{
    Canvas, CanvasConfig, DrawFn, Drawable, draw_fn, draw_item, fixed_item, proportion_item,
};
pub use error::{CanvasError, Result};
pub use event::{Event, KeyPress};
pub use geometry::{Point, Rectangle};
pub use layout::{Axis, LayoutItem, Sizing, partition, resolve_sizes};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{MetricSnapshot, RenderMetrics};
pub use surface::{Color, FontExtents, RecordingSurface, Surface, TextExtents, TextMeasure};
pub use text::{BoxAlign, FitPlan, FitTuning, TextAlign, TextOptions, fit_text};
pub use width::display_width;
