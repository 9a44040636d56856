//! Drawing surface capability.
//!
//! The canvas never rasterises anything itself; it drives a [`Surface`]
//! implementation supplied by the frame loop. [`RecordingSurface`] is an
//! in-memory implementation with deterministic metrics.

mod core;
mod recording;

pub use core::{Color, FontExtents, Surface, TextExtents, TextMeasure};
pub use recording::{RecordingSurface, ShownText, SurfaceOp};
