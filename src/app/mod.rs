//! Application interface driven by a frame loop.
//!
//! A loop feeds input through [`App::event`], advances state with
//! [`App::update`] and redraws with [`App::draw`]. [`step_frame`] runs one
//! such pass against a canvas, which is all a headless host needs.

use std::time::Duration;

use crate::canvas::Canvas;
use crate::error::Result;
use crate::event::Event;

/// What the loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppControl {
    Continue,
    Exit,
}

pub trait App {
    /// React to one input event.
    fn event(&mut self, event: &Event) -> Result<AppControl>;

    /// Advance state by the time elapsed since the previous frame.
    fn update(&mut self, elapsed: Duration);

    /// Redraw the whole viewport.
    fn draw(&mut self, canvas: &mut Canvas<'_>) -> Result<()>;
}

/// Dispatch `events`, update, then draw. Stops at the first event that asks
/// to exit, in which case nothing is updated or drawn.
pub fn step_frame<A: App + ?Sized>(
    app: &mut A,
    events: &[Event],
    elapsed: Duration,
    canvas: &mut Canvas<'_>,
) -> Result<AppControl> {
    for event in events {
        if app.event(event)? == AppControl::Exit {
            return Ok(AppControl::Exit);
        }
    }
    app.update(elapsed);
    app.draw(canvas)?;
    Ok(AppControl::Continue)
}
