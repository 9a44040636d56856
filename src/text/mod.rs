//! Text fitting.
//!
//! [`fit_text`] wraps paragraph text and picks a font size so the block fills
//! a box without overflowing it. The search runs in two stages: a walk over
//! shrinking per-line character budgets ([`RawText`]) that picks the wrap
//! whose aspect ratio best matches the box, then an integer font-size descent
//! that corrects for metrics which do not scale linearly.

mod fit;
mod metrics;
mod options;
mod raw;

pub use fit::{FitPlan, PlacedLine, fit_text};
pub use metrics::{LineMode, LinePart, Metrics, measure, measure_literal, measure_wrapped};
pub use options::{BoxAlign, FitTuning, TextAlign, TextOptions};
pub use raw::RawText;
