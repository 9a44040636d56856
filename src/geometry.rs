use std::ops::{Add, Sub};

/// 2D coordinate (or extent, when used as a rectangle size) in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Same point with the horizontal component replaced.
    pub fn with_x(self, x: f64) -> Self {
        Self::new(x, self.y)
    }

    /// Same point with the vertical component replaced.
    pub fn with_y(self, y: f64) -> Self {
        Self::new(self.x, y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        self.translate(rhs.x, rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        self.translate(-rhs.x, -rhs.y)
    }
}

/// Axis-aligned box anchored at `pos` and spanning `size`.
///
/// Width and height are read straight from `size`; they can go negative after
/// deflating a box smaller than the requested padding, so consumers that need
/// a drawable area check [`Rectangle::is_degenerate`] first.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
    pub pos: Point,
    pub size: Point,
}

impl Rectangle {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            pos: Point::new(x, y),
            size: Point::new(width, height),
        }
    }

    pub const fn from_parts(pos: Point, size: Point) -> Self {
        Self { pos, size }
    }

    pub fn x(&self) -> f64 {
        self.pos.x
    }

    pub fn y(&self) -> f64 {
        self.pos.y
    }

    pub fn width(&self) -> f64 {
        self.size.x
    }

    pub fn height(&self) -> f64 {
        self.size.y
    }

    pub fn right(&self) -> f64 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f64 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Point {
        self.pos.translate(self.size.x / 2.0, self.size.y / 2.0)
    }

    /// `width / height`; only meaningful for a non-degenerate box.
    pub fn aspect_ratio(&self) -> f64 {
        self.size.x / self.size.y
    }

    /// True when there is no positive area to draw into.
    pub fn is_degenerate(&self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    /// Inclusive bounds test: points on any edge count as inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x()
            && point.x <= self.right()
            && point.y >= self.y()
            && point.y <= self.bottom()
    }

    /// Map an absolute point to coordinates relative to this box, where the
    /// box itself spans `0.0..=1.0` on both axes.
    pub fn percent(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.pos.x) / self.size.x,
            (point.y - self.pos.y) / self.size.y,
        )
    }

    /// Shrink inward by `amount` on every side.
    pub fn deflate(&self, amount: f64) -> Self {
        self.deflate_xy(amount, amount)
    }

    /// Shrink inward by `width` on the left and right, `height` on the top and
    /// bottom. Negative amounts grow the box.
    pub fn deflate_xy(&self, width: f64, height: f64) -> Self {
        Self::from_parts(
            self.pos.translate(width, height),
            self.size.translate(-2.0 * width, -2.0 * height),
        )
    }

    /// Same position, new extent.
    pub fn resize(&self, size: Point) -> Self {
        Self::from_parts(self.pos, size)
    }

    pub fn with_width(&self, width: f64) -> Self {
        self.resize(self.size.with_x(width))
    }

    pub fn with_height(&self, height: f64) -> Self {
        self.resize(self.size.with_y(height))
    }

    /// Same extent, translated by `(dx, dy)`.
    pub fn move_by(&self, dx: f64, dy: f64) -> Self {
        Self::from_parts(self.pos.translate(dx, dy), self.size)
    }
}
