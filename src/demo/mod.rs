//! Film-strip magnifier.
//!
//! Fifty numbered frames sit side by side; the frames under the pointer grow
//! and the rest squeeze together. Moving away from the vertical center of the
//! strip widens the magnified group. `ctrl+q` exits.

use std::time::Duration;

use crate::app::{App, AppControl};
use crate::canvas::{Canvas, draw_fn, fixed_item, proportion_item};
use crate::error::Result;
use crate::event::Event;
use crate::geometry::{Point, Rectangle};
use crate::surface::Color;
use crate::text::TextOptions;

const FRAME_COUNT: usize = 50;
const MAGNIFIED_FRAMES: f64 = 5.0;
const DEFLATION_BASE: f64 = 30.0;
const STRIP_MARGIN: f64 = 40.0;

const BACKGROUND: Color = Color::rgb(255, 0, 100);
const STRIP_OUTLINE: Color = Color::rgb(25, 25, 25);
const FRAME_OUTLINE: Color = Color::rgb(20, 20, 100);

/// Top-level magnifier application.
#[derive(Debug, Default)]
pub struct Magnifier {
    strip: FilmStrip,
}

impl Magnifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strip(&self) -> &FilmStrip {
        &self.strip
    }
}

impl App for Magnifier {
    fn event(&mut self, event: &Event) -> Result<AppControl> {
        if event.key_down("ctrl+q") {
            return Ok(AppControl::Exit);
        }
        self.strip.event(event);
        Ok(AppControl::Continue)
    }

    fn update(&mut self, elapsed: Duration) {
        self.strip.update(elapsed);
    }

    fn draw(&mut self, canvas: &mut Canvas<'_>) -> Result<()> {
        canvas.fill(BACKGROUND)?;
        self.strip.draw(&mut canvas.deflate(STRIP_MARGIN))
    }
}

/// Row of frames with a magnified group around `position`.
#[derive(Debug)]
pub struct FilmStrip {
    frames: Vec<FrameTile>,
    rectangle: Option<Rectangle>,
    position: f64,
    away_from_center: f64,
    magnification: f64,
    before: usize,
    magnified: usize,
}

impl Default for FilmStrip {
    fn default() -> Self {
        let mut strip = Self {
            frames: (0..FRAME_COUNT).map(FrameTile::new).collect(),
            rectangle: None,
            position: FRAME_COUNT as f64 / 2.0,
            away_from_center: 0.0,
            magnification: 0.0,
            before: 0,
            magnified: 0,
        };
        strip.classify();
        strip
    }
}

impl FilmStrip {
    pub fn frames(&self) -> &[FrameTile] {
        &self.frames
    }

    /// Fractional frame index under the pointer.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Share of the strip width given to the magnified group, `0.0..=1.0`.
    pub fn magnification(&self) -> f64 {
        self.magnification
    }

    /// Indices of the magnified frames.
    pub fn magnified(&self) -> std::ops::Range<usize> {
        self.before..self.before + self.magnified
    }

    pub fn event(&mut self, event: &Event) {
        let Some(rectangle) = self.rectangle else {
            return;
        };
        if !event.mouse_motion_inside(&rectangle) {
            return;
        }
        if let Some(point) = event.mouse_point() {
            self.position = self.find_position(point);
            self.away_from_center = 2.0 * (0.5 - rectangle.percent(point).y).abs();
        }
    }

    pub fn update(&mut self, _elapsed: Duration) {
        self.magnification = self.away_from_center;
        self.classify();
    }

    pub fn draw(&mut self, canvas: &mut Canvas<'_>) -> Result<()> {
        let rectangle = canvas.rectangle();
        self.rectangle = Some(rectangle);
        canvas.stroke(STRIP_OUTLINE)?;

        let magnified_width = f64::max(
            2.0 * self.magnified as f64 * rectangle.width() / self.frames.len() as f64,
            rectangle.width() * self.magnification,
        );
        let (before, rest) = self.frames.split_at_mut(self.before);
        let (magnified, after) = rest.split_at_mut(self.magnified);
        let before_weight = before.len() as f64;
        let after_weight = after.len() as f64;

        canvas.columns(vec![
            proportion_item(
                before_weight,
                draw_fn(|canvas| draw_group(canvas, before, false)),
            ),
            fixed_item(
                magnified_width,
                draw_fn(|canvas| draw_group(canvas, magnified, true)),
            ),
            proportion_item(
                after_weight,
                draw_fn(|canvas| draw_group(canvas, after, false)),
            ),
        ])
    }

    /// Split frames into before/magnified/after around `position`. The groups
    /// are contiguous runs of frame numbers.
    fn classify(&mut self) {
        let offset = MAGNIFIED_FRAMES / 2.0;
        let position = self.position;
        self.before = 0;
        self.magnified = 0;

        for frame in &mut self.frames {
            let center = frame.number as f64 + 0.5;
            if center < position - offset {
                frame.deflate_height = DEFLATION_BASE;
                self.before += 1;
            } else if center > position + offset {
                frame.deflate_height = DEFLATION_BASE;
            } else {
                let closeness = 1.0 - (position - center).abs() / offset;
                frame.proportion = 1.0 + (2.0 * closeness).powi(2);
                frame.deflate_height = (1.0 - closeness) * DEFLATION_BASE;
                self.magnified += 1;
            }
        }
    }

    /// Average of `number + horizontal percent` over frames containing the
    /// point; the middle of the strip when none do.
    fn find_position(&self, point: Point) -> f64 {
        let positions: Vec<f64> = self
            .frames
            .iter()
            .filter_map(|frame| {
                let rectangle = frame.rectangle.filter(|rect| rect.contains(point))?;
                Some(frame.number as f64 + rectangle.percent(point).x)
            })
            .collect();
        if positions.is_empty() {
            return self.frames.len() as f64 / 2.0;
        }
        positions.iter().sum::<f64>() / positions.len() as f64
    }
}

fn draw_group(canvas: &mut Canvas<'_>, frames: &mut [FrameTile], magnified: bool) -> Result<()> {
    canvas.columns(
        frames
            .iter_mut()
            .map(|frame| {
                let proportion = if magnified { frame.proportion } else { 1.0 };
                proportion_item(proportion, move |canvas: &mut Canvas<'_>| frame.draw(canvas))
            })
            .collect(),
    )
}

/// One numbered frame of the strip.
#[derive(Debug, Clone)]
pub struct FrameTile {
    number: usize,
    rectangle: Option<Rectangle>,
    deflate_height: f64,
    proportion: f64,
}

impl FrameTile {
    fn new(number: usize) -> Self {
        Self {
            number,
            rectangle: None,
            deflate_height: 0.0,
            proportion: 1.0,
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    /// Viewport from the most recent draw.
    pub fn rectangle(&self) -> Option<Rectangle> {
        self.rectangle
    }

    pub fn proportion(&self) -> f64 {
        self.proportion
    }

    pub fn deflate_height(&self) -> f64 {
        self.deflate_height
    }

    fn draw(&mut self, canvas: &mut Canvas<'_>) -> Result<()> {
        self.rectangle = Some(canvas.rectangle());
        let mut inner = canvas.deflate_xy(0.0, self.deflate_height);
        inner.stroke(FRAME_OUTLINE)?;
        inner.text(&self.number.to_string(), &TextOptions::default())?;
        Ok(())
    }
}
