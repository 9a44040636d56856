//! Canvas orchestrator.
//!
//! A [`Canvas`] binds a drawing surface to one viewport rectangle. Layout
//! calls hand child canvases, bound to sub-rectangles of the same surface, to
//! caller-supplied [`Drawable`]s.

mod core;

pub use core::{
    Canvas, CanvasConfig, DrawFn, Drawable, draw_fn, draw_item, fixed_item, proportion_item,
};
