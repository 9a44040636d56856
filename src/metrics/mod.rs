use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters for drawing work done through a canvas, usually per frame.
#[derive(Debug, Default, Clone)]
pub struct RenderMetrics {
    fills: u64,
    strokes: u64,
    text_fits: u64,
    skipped_fits: u64,
    lines_drawn: u64,
    shrink_steps: u64,
    descent_steps: u64,
    layout_splits: u64,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fill(&mut self) {
        self.fills = self.fills.saturating_add(1);
    }

    pub fn record_stroke(&mut self) {
        self.strokes = self.strokes.saturating_add(1);
    }

    pub fn record_fit(&mut self, lines: usize, shrink_steps: usize, descent_steps: usize) {
        self.text_fits = self.text_fits.saturating_add(1);
        self.lines_drawn = self.lines_drawn.saturating_add(lines as u64);
        self.shrink_steps = self.shrink_steps.saturating_add(shrink_steps as u64);
        self.descent_steps = self.descent_steps.saturating_add(descent_steps as u64);
    }

    pub fn record_skipped_fit(&mut self) {
        self.skipped_fits = self.skipped_fits.saturating_add(1);
    }

    pub fn record_split(&mut self) {
        self.layout_splits = self.layout_splits.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            fills: self.fills,
            strokes: self.strokes,
            text_fits: self.text_fits,
            skipped_fits: self.skipped_fits,
            lines_drawn: self.lines_drawn,
            shrink_steps: self.shrink_steps,
            descent_steps: self.descent_steps,
            layout_splits: self.layout_splits,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub fills: u64,
    pub strokes: u64,
    pub text_fits: u64,
    pub skipped_fits: u64,
    pub lines_drawn: u64,
    pub shrink_steps: u64,
    pub descent_steps: u64,
    pub layout_splits: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "render_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("fills".to_string(), json!(self.fills));
        map.insert("strokes".to_string(), json!(self.strokes));
        map.insert("text_fits".to_string(), json!(self.text_fits));
        map.insert("skipped_fits".to_string(), json!(self.skipped_fits));
        map.insert("lines_drawn".to_string(), json!(self.lines_drawn));
        map.insert("shrink_steps".to_string(), json!(self.shrink_steps));
        map.insert("descent_steps".to_string(), json!(self.descent_steps));
        map.insert("layout_splits".to_string(), json!(self.layout_splits));
        map
    }
}
