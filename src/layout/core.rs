use crate::error::{CanvasError, Result};
use crate::geometry::Rectangle;

/// Axis along which a rectangle is partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Children stacked top to bottom (`rows`), splitting the height.
    Vertical,
    /// Children placed left to right (`columns`), splitting the width.
    Horizontal,
}

impl Axis {
    fn extent(self, rect: &Rectangle) -> f64 {
        match self {
            Axis::Vertical => rect.height(),
            Axis::Horizontal => rect.width(),
        }
    }
}

/// Space request for one child along the split axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sizing {
    /// Absolute length in surface units.
    Fixed(f64),
    /// Share of whatever the fixed items leave over.
    Proportion(f64),
}

impl Default for Sizing {
    fn default() -> Self {
        Sizing::Proportion(1.0)
    }
}

/// One entry of a `rows`/`columns` request. The payload rides along untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutItem<P> {
    pub sizing: Sizing,
    pub payload: P,
}

impl<P> LayoutItem<P> {
    /// Proportional item with the default weight of 1.
    pub fn new(payload: P) -> Self {
        Self {
            sizing: Sizing::default(),
            payload,
        }
    }

    pub fn fixed(size: f64, payload: P) -> Self {
        Self {
            sizing: Sizing::Fixed(size),
            payload,
        }
    }

    pub fn proportion(proportion: f64, payload: P) -> Self {
        Self {
            sizing: Sizing::Proportion(proportion),
            payload,
        }
    }
}

/// Remainders this close to zero are treated as exactly zero.
const REMAINING_EPSILON: f64 = 1e-9;

/// Resolve a length for every sizing request, in input order.
///
/// Fixed requests keep their literal length; proportional requests share the
/// space left after all fixed requests in proportion to their weight.
pub fn resolve_sizes(total: f64, sizings: &[Sizing]) -> Result<Vec<f64>> {
    let mut fixed_total = 0.0;
    let mut total_proportion = 0.0;
    let mut has_proportional = false;

    for sizing in sizings {
        match *sizing {
            Sizing::Fixed(size) => fixed_total += size,
            Sizing::Proportion(proportion) => {
                total_proportion += proportion;
                has_proportional = true;
            }
        }
    }

    if has_proportional && !(total_proportion > 0.0) {
        return Err(CanvasError::DegenerateLayout(format!(
            "proportional items share a total proportion of {total_proportion}"
        )));
    }

    // A collapsed extent (deflated past zero) collapses every child.
    if !(total > 0.0) {
        return Ok(vec![0.0; sizings.len()]);
    }

    let mut remaining = total - fixed_total;
    if remaining < 0.0 {
        if remaining < -REMAINING_EPSILON * total.max(1.0) {
            return Err(CanvasError::DegenerateLayout(format!(
                "fixed sizes total {fixed_total} but only {total} is available"
            )));
        }
        remaining = 0.0;
    }

    Ok(sizings
        .iter()
        .map(|sizing| match *sizing {
            Sizing::Fixed(size) => size,
            Sizing::Proportion(proportion) => remaining * proportion / total_proportion,
        })
        .collect())
}

/// Pair every item with its resolved length along an axis of `total` units.
pub fn split<P>(total: f64, items: &[LayoutItem<P>]) -> Result<Vec<(f64, &LayoutItem<P>)>> {
    let sizings: Vec<Sizing> = items.iter().map(|item| item.sizing).collect();
    let sizes = resolve_sizes(total, &sizings)?;
    Ok(sizes.into_iter().zip(items).collect())
}

/// Cut `rect` into contiguous children along `axis`, one per sizing request.
pub fn partition(rect: Rectangle, axis: Axis, sizings: &[Sizing]) -> Result<Vec<Rectangle>> {
    let sizes = resolve_sizes(axis.extent(&rect), sizings)?;
    let mut offset = 0.0;
    let mut children = Vec::with_capacity(sizes.len());

    for size in sizes {
        let child = match axis {
            Axis::Vertical => rect.with_height(size).move_by(0.0, offset),
            Axis::Horizontal => rect.with_width(size).move_by(offset, 0.0),
        };
        children.push(child);
        offset += size;
    }

    Ok(children)
}

/// Stack `items` top to bottom inside `rect`.
pub fn rows<P>(rect: Rectangle, items: &[LayoutItem<P>]) -> Result<Vec<(Rectangle, &P)>> {
    layout_items(rect, Axis::Vertical, items)
}

/// Place `items` left to right inside `rect`.
pub fn columns<P>(rect: Rectangle, items: &[LayoutItem<P>]) -> Result<Vec<(Rectangle, &P)>> {
    layout_items(rect, Axis::Horizontal, items)
}

fn layout_items<P>(
    rect: Rectangle,
    axis: Axis,
    items: &[LayoutItem<P>],
) -> Result<Vec<(Rectangle, &P)>> {
    let sizings: Vec<Sizing> = items.iter().map(|item| item.sizing).collect();
    let children = partition(rect, axis, &sizings)?;
    Ok(children
        .into_iter()
        .zip(items.iter().map(|item| &item.payload))
        .collect())
}
